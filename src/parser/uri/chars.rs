//! RFC 3986 character classes shared by the scheme grammars.

/// `pchar` punctuation: sub-delims plus `:` and `@`.
pub(super) const PCHAR: &[u8] = b"!$&'()*+,;=:@";
/// Path characters: `pchar` plus `/`.
pub(super) const PATH: &[u8] = b"!$&'()*+,;=:@/";
/// Query and fragment characters: `pchar` plus `/` and `?`.
pub(super) const QUERY: &[u8] = b"!$&'()*+,;=:@/?";
/// Userinfo characters: sub-delims plus `:`.
pub(super) const USERINFO: &[u8] = b"!$&'()*+,;=:";

/// Unreserved characters, extended to non-ASCII letters and digits.
pub(super) fn is_unreserved(c: char) -> bool {
    if c.is_ascii() {
        c.is_ascii_alphanumeric() || matches!(c, '-' | '.' | '_' | '~')
    } else {
        c.is_alphanumeric()
    }
}

/// Greedily consume unreserved characters, `%XX` escapes and the ASCII
/// punctuation in `allowed`, starting at `from`. Returns the end offset.
///
/// A `%` that is not followed by two hex digits ends the run in front of it.
pub(super) fn scan(text: &str, from: usize, allowed: &[u8]) -> usize {
    let bytes = text.as_bytes();
    let mut pos = from;
    while let Some(c) = text.get(pos..).and_then(|rest| rest.chars().next()) {
        if c == '%' {
            let escaped = bytes.get(pos + 1..pos + 3);
            match escaped {
                Some(hex) if hex.iter().all(u8::is_ascii_hexdigit) => pos += 3,
                _ => break,
            }
        } else if is_unreserved(c) || (c.is_ascii() && allowed.contains(&(c as u8))) {
            pos += c.len_utf8();
        } else {
            break;
        }
    }
    pos
}
