//! The URI schemes recognized in message text.

use std::fmt;

use super::opaque::{self, OpaqueRules};

/// A recognized URI scheme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Scheme {
    Http,
    Https,
    Rtsp,
    Mailto,
    Xmpp,
    Matrix,
    Bitcoin,
    Ethereum,
}

/// How the part after `scheme:` is matched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Grammar {
    /// `//authority` followed by path, query and fragment.
    Hierarchical,
    /// Scheme-specific part with the given rules.
    Opaque(OpaqueRules),
}

impl Scheme {
    /// Every scheme, in detection order.
    pub const ALL: [Scheme; 8] = [
        Scheme::Http,
        Scheme::Https,
        Scheme::Rtsp,
        Scheme::Mailto,
        Scheme::Xmpp,
        Scheme::Matrix,
        Scheme::Bitcoin,
        Scheme::Ethereum,
    ];

    /// Lower-case scheme name, without the colon.
    pub fn name(self) -> &'static str {
        match self {
            Scheme::Http => "http",
            Scheme::Https => "https",
            Scheme::Rtsp => "rtsp",
            Scheme::Mailto => "mailto",
            Scheme::Xmpp => "xmpp",
            Scheme::Matrix => "matrix",
            Scheme::Bitcoin => "bitcoin",
            Scheme::Ethereum => "ethereum",
        }
    }

    pub(crate) fn grammar(self) -> Grammar {
        match self {
            Scheme::Http | Scheme::Https | Scheme::Rtsp => Grammar::Hierarchical,
            Scheme::Mailto => Grammar::Opaque(opaque::MAILTO),
            Scheme::Xmpp => Grammar::Opaque(opaque::XMPP),
            Scheme::Matrix => Grammar::Opaque(opaque::MATRIX),
            Scheme::Bitcoin => Grammar::Opaque(opaque::BITCOIN),
            Scheme::Ethereum => Grammar::Opaque(opaque::ETHEREUM),
        }
    }

    /// The scheme whose `name:` prefix starts `text`, ignoring ASCII case.
    pub fn detect(text: &str) -> Option<Scheme> {
        let bytes = text.as_bytes();
        Self::ALL.into_iter().find(|scheme| {
            let name = scheme.name().as_bytes();
            bytes.len() > name.len()
                && bytes[..name.len()].eq_ignore_ascii_case(name)
                && bytes[name.len()] == b':'
        })
    }
}

impl fmt::Display for Scheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
