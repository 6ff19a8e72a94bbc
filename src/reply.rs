//! Helpers for quoting a plain-text message in a reply.

use std::borrow::Cow;

use crate::config::ReplyConfig;
use crate::html::modification::find_signature_start;
use crate::parser::quote::segment_by_quote_depth;

/// Put `prefix` in front of every line of `body`.
///
/// Carriage returns are dropped. A trailing newline does not produce an
/// extra prefixed empty line.
pub fn quote_text(body: &str, prefix: &str) -> String {
    let mut quoted = String::with_capacity(body.len() + body.len() / 16 * prefix.len() + prefix.len());
    let mut lines = body.split('\n').peekable();
    while let Some(line) = lines.next() {
        let last = lines.peek().is_none();
        if last && line.is_empty() && !body.is_empty() {
            break;
        }
        quoted.push_str(prefix);
        quoted.extend(line.chars().filter(|&c| c != '\r'));
        if !last {
            quoted.push('\n');
        }
    }
    quoted
}

/// Remove the signature block from `body`.
///
/// The block starts at the first unquoted line that is exactly `-- ` and runs
/// to the end. A signature that only appears inside quoted text belongs to
/// an earlier message and is kept.
pub fn strip_signature(body: &str) -> Cow<'_, str> {
    for section in segment_by_quote_depth(body) {
        if section.quote_depth() != 0 {
            continue;
        }
        // Unquoted lines are never de-indented, so the section is one segment.
        let Some(segment) = section.segments().first() else {
            continue;
        };
        if let Some(offset) = find_signature_start(&section.text()) {
            return Cow::Borrowed(&body[..segment.start + offset]);
        }
    }
    Cow::Borrowed(body)
}

/// Quote `body` for a reply according to `config`.
pub fn quote_for_reply(body: &str, config: &ReplyConfig) -> String {
    let body = if config.strip_signature {
        strip_signature(body)
    } else {
        Cow::Borrowed(body)
    };
    quote_text(&body, &config.quote_prefix)
}
