//! Centralized error types for mailquote.

use std::path::PathBuf;
use thiserror::Error;

/// All errors produced by the mailquote library.
///
/// Rendering and scanning never fail on message content: malformed or
/// adversarial text degrades to escaped plain text. The only content-facing
/// error is a caller passing an out-of-range offset to
/// [`parse_uri`](crate::parser::uri::parse_uri).
#[derive(Error, Debug)]
pub enum MailQuoteError {
    /// A start offset outside `0..=length` (or not on a character boundary).
    #[error("Invalid start position {position}: must be a character boundary within 0..={length}")]
    InvalidStartPosition { position: String, length: usize },

    /// I/O error with the associated file path.
    #[error("I/O error reading '{path}': {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The specified file does not exist.
    #[error("File not found: {0}")]
    FileNotFound(PathBuf),

    /// A raw message could not be parsed or has no usable body.
    #[error("MIME decoding error: {0}")]
    MimeError(String),
}

/// Convenience alias for `Result<T, MailQuoteError>`.
pub type Result<T> = std::result::Result<T, MailQuoteError>;

impl MailQuoteError {
    /// Create an `Io` variant from a path and an `io::Error`.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Allow `?` on `std::io::Error` when no path context is available
/// (rare, prefer `MailQuoteError::io`).
impl From<std::io::Error> for MailQuoteError {
    fn from(source: std::io::Error) -> Self {
        Self::Io {
            path: PathBuf::from("<unknown>"),
            source,
        }
    }
}
