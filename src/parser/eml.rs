//! Body extraction from raw RFC 5322 messages (`.eml` files or single MBOX entries).

use std::borrow::Cow;
use std::path::Path;

use mail_parser::{MessageParser, PartType};
use tracing::debug;

use crate::error::{MailQuoteError, Result};
use crate::html::html_to_plain_text;

/// The displayable bodies of a parsed message.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MessageBody {
    /// Decoded subject line, if present.
    pub subject: Option<String>,
    /// First `text/plain` body.
    pub text: Option<String>,
    /// First `text/html` body.
    pub html: Option<String>,
}

impl MessageBody {
    /// The plain-text body, converting the HTML body when there is no text part.
    pub fn plain_text(&self) -> Option<Cow<'_, str>> {
        match (&self.text, &self.html) {
            (Some(text), _) => Some(Cow::Borrowed(text.as_str())),
            (None, Some(html)) => Some(Cow::Owned(html_to_plain_text(html))),
            (None, None) => None,
        }
    }
}

/// Parse a raw message and extract its bodies.
///
/// A leading byte-order mark and an MBOX `From ` separator line are skipped.
pub fn parse_message(raw: &[u8]) -> Result<MessageBody> {
    let data = skip_from_line(raw);
    let message = MessageParser::default()
        .parse(data)
        .ok_or_else(|| MailQuoteError::MimeError("not an RFC 5322 message".into()))?;

    // mail-parser converts between the two body kinds when one is missing;
    // only parts of the matching content type count here.
    let text = match message.text_part(0) {
        Some(part) if matches!(part.body, PartType::Text(_)) => {
            message.body_text(0).map(Cow::into_owned)
        }
        _ => None,
    };
    let html = match message.html_part(0) {
        Some(part) if matches!(part.body, PartType::Html(_)) => {
            message.body_html(0).map(Cow::into_owned)
        }
        _ => None,
    };

    if text.is_none() && html.is_none() {
        return Err(MailQuoteError::MimeError("message has no text body".into()));
    }

    debug!(
        has_text = text.is_some(),
        has_html = html.is_some(),
        "Extracted message body"
    );
    Ok(MessageBody {
        subject: message.subject().map(str::to_string),
        text,
        html,
    })
}

/// Read and parse an `.eml` file.
pub fn read_eml(path: impl AsRef<Path>) -> Result<MessageBody> {
    let path = path.as_ref();
    let data = std::fs::read(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            MailQuoteError::FileNotFound(path.to_path_buf())
        } else {
            MailQuoteError::io(path, e)
        }
    })?;
    parse_message(&data)
}

fn skip_from_line(data: &[u8]) -> &[u8] {
    let data = data.strip_prefix(&[0xEF, 0xBB, 0xBF]).unwrap_or(data);

    if data.starts_with(b"From ") {
        if let Some(pos) = data.iter().position(|&b| b == b'\n') {
            return &data[pos + 1..];
        }
    }
    data
}
