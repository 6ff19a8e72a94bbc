//! Detection of URIs embedded in plain text.
//!
//! A URI may only start on a word boundary, where the previous character
//! is neither alphanumeric nor `_`, and must begin with one of the
//! [`Scheme`]s. `(http://…`, `"http://…"`, `[http://…]` and `URL:http://…`
//! all qualify; `xhttp://…` does not. Matching is greedy over the scheme's
//! grammar, after which punctuation that more likely belongs to the
//! surrounding prose is trimmed:
//!
//! - one trailing `.` or `,`;
//! - a trailing `)` without an opening partner inside the match, and then
//!   one `?` or `.` in front of it;
//! - a trailing `'` when the URI is opened by `'`.
//!
//! A URI written as `<uri>` keeps its last character untouched.
//!
//! Scanning never backtracks over text it already accepted, so the cost of
//! [`find_uris`] grows linearly with the input.

mod authority;
mod chars;
mod opaque;
mod scheme;

use std::fmt::Display;

use tracing::trace;

use crate::error::{MailQuoteError, Result};
use crate::model::uri::UriMatch;

pub use scheme::Scheme;
use scheme::Grammar;

/// Find every URI in `text`, in order and without overlaps.
pub fn find_uris(text: &str) -> Vec<UriMatch<'_>> {
    let bytes = text.as_bytes();
    let mut matches = Vec::new();
    let mut pos = 0;

    while pos < bytes.len() {
        if is_candidate(text, pos) {
            if let Some(found) = parse_at(text, pos) {
                pos = found.end_index;
                matches.push(found);
                continue;
            }
        }
        pos += 1;
    }

    trace!(count = matches.len(), "Scanned text for URIs");
    matches
}

/// Whether `text` is exactly one URI and nothing else.
pub fn is_valid_uri(text: &str) -> bool {
    match find_uris(text).as_slice() {
        [only] => only.start_index == 0 && only.end_index == text.len(),
        _ => false,
    }
}

/// Try to match a URI starting exactly at byte offset `start`.
///
/// Unlike [`find_uris`], the character before `start` is not checked.
/// Returns `Ok(None)` when no URI starts there and
/// [`MailQuoteError::InvalidStartPosition`] when `start` is negative, past
/// the end of `text` or inside a multi-byte character.
pub fn parse_uri<P>(text: &str, start: P) -> Result<Option<UriMatch<'_>>>
where
    P: TryInto<usize> + Copy + Display,
{
    let invalid = || MailQuoteError::InvalidStartPosition {
        position: start.to_string(),
        length: text.len(),
    };
    let offset: usize = start.try_into().map_err(|_| invalid())?;
    if offset > text.len() || !text.is_char_boundary(offset) {
        return Err(invalid());
    }
    Ok(parse_at(text, offset))
}

/// A position where a URI may begin: an ASCII letter on a word boundary.
fn is_candidate(text: &str, pos: usize) -> bool {
    if !text.as_bytes()[pos].is_ascii_alphabetic() {
        return false;
    }
    // An ASCII byte is always a char boundary.
    match text[..pos].chars().next_back() {
        None => true,
        Some(c) => !(c.is_alphanumeric() || c == '_'),
    }
}

pub(crate) fn parse_at(text: &str, start: usize) -> Option<UriMatch<'_>> {
    let scheme = Scheme::detect(text.get(start..)?)?;
    let body_start = start + scheme.name().len() + 1;

    let grammar_end = match scheme.grammar() {
        Grammar::Hierarchical => authority::match_hierarchical(text, body_start)?,
        Grammar::Opaque(rules) => opaque::match_opaque(text, body_start, &rules)?,
    };

    let end = trim_trailing(text.as_bytes(), start, body_start, grammar_end);
    (end > body_start).then(|| UriMatch::new(text, start, end))
}

/// Drop trailing punctuation that belongs to the prose around the URI.
fn trim_trailing(bytes: &[u8], start: usize, body_start: usize, end: usize) -> usize {
    let opened_by_angle = start > 0 && bytes[start - 1] == b'<';
    if opened_by_angle && bytes.get(end) == Some(&b'>') {
        return end;
    }

    let mut end = end;
    if end > body_start && matches!(bytes[end - 1], b'.' | b',') {
        end -= 1;
    }
    if end > body_start && bytes[end - 1] == b')' && has_unbalanced_close(&bytes[start..end]) {
        end -= 1;
        if end > body_start && matches!(bytes[end - 1], b'?' | b'.') {
            end -= 1;
        }
    }
    let opened_by_quote = start > 0 && bytes[start - 1] == b'\'';
    if opened_by_quote && end > body_start && bytes[end - 1] == b'\'' {
        end -= 1;
    }
    end
}

fn has_unbalanced_close(uri: &[u8]) -> bool {
    let opens = uri.iter().filter(|&&b| b == b'(').count();
    let closes = uri.iter().filter(|&&b| b == b')').count();
    closes > opens
}
