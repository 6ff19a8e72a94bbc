//! Grammar for hierarchical URIs: `scheme://[userinfo@]host[:port][/path][?query][#fragment]`.

use super::chars::{self, PATH, QUERY, USERINFO};

/// Match the part after `scheme:`, starting at `pos`. Returns the end offset.
pub(super) fn match_hierarchical(text: &str, pos: usize) -> Option<usize> {
    let bytes = text.as_bytes();
    if !bytes.get(pos..)?.starts_with(b"//") {
        return None;
    }
    let authority_start = pos + 2;

    // Userinfo never holds `/`, which keeps this scan inside the authority.
    let userinfo_end = chars::scan(text, authority_start, USERINFO);
    let host_start = if bytes.get(userinfo_end) == Some(&b'@') {
        userinfo_end + 1
    } else {
        authority_start
    };

    let host_end = match_host(bytes, host_start)?;
    let mut end = match_port(bytes, host_end)?;

    if bytes.get(end) == Some(&b'/') {
        end = chars::scan(text, end + 1, PATH);
    }
    if bytes.get(end) == Some(&b'?') {
        end = chars::scan(text, end + 1, QUERY);
    }
    if bytes.get(end) == Some(&b'#') {
        end = chars::scan(text, end + 1, QUERY);
    }
    Some(end)
}

fn is_authority_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b"-._~!$&'()*+,;=:@%[]".contains(&b)
}

fn match_host(bytes: &[u8], pos: usize) -> Option<usize> {
    if bytes.get(pos) == Some(&b'[') {
        let authority_end = bytes[pos..]
            .iter()
            .position(|&b| !is_authority_byte(b))
            .map_or(bytes.len(), |i| pos + i);
        return match_ipv6_literal(&bytes[..authority_end], pos);
    }
    match match_ipv4(bytes, pos) {
        Some(end) if !continues_label(bytes, end) => Some(end),
        _ => match_domain(bytes, pos),
    }
}

/// Whether the host would keep going as a DNS name after `end`.
fn continues_label(bytes: &[u8], end: usize) -> bool {
    match bytes.get(end) {
        Some(b) if b.is_ascii_alphanumeric() || *b == b'-' => true,
        Some(b'.') => bytes.get(end + 1).is_some_and(u8::is_ascii_alphanumeric),
        _ => false,
    }
}

/// Dot-separated labels of letters, digits and inner hyphens.
fn match_domain(bytes: &[u8], pos: usize) -> Option<usize> {
    let mut end = match_label(bytes, pos)?;
    while bytes.get(end) == Some(&b'.') {
        match match_label(bytes, end + 1) {
            Some(label_end) => end = label_end,
            None => break,
        }
    }
    Some(end)
}

fn match_label(bytes: &[u8], pos: usize) -> Option<usize> {
    if !bytes.get(pos)?.is_ascii_alphanumeric() {
        return None;
    }
    let mut end = pos + 1;
    let mut last_alnum = end;
    while let Some(&b) = bytes.get(end) {
        if b.is_ascii_alphanumeric() {
            end += 1;
            last_alnum = end;
        } else if b == b'-' {
            end += 1;
        } else {
            break;
        }
    }
    Some(last_alnum)
}

/// Four decimal octets, each at most 255.
fn match_ipv4(bytes: &[u8], pos: usize) -> Option<usize> {
    let mut end = pos;
    for octet in 0..4 {
        if octet > 0 {
            if bytes.get(end) != Some(&b'.') {
                return None;
            }
            end += 1;
        }
        end = match_octet(bytes, end)?;
    }
    Some(end)
}

fn match_octet(bytes: &[u8], pos: usize) -> Option<usize> {
    let digits = bytes
        .get(pos..)?
        .iter()
        .take(3)
        .take_while(|b| b.is_ascii_digit())
        .count();
    if digits == 0 {
        return None;
    }
    let value = bytes[pos..pos + digits]
        .iter()
        .fold(0u32, |acc, b| acc * 10 + u32::from(b - b'0'));
    (value <= 255).then_some(pos + digits)
}

/// `[` IPv6 address `]`, with at most one `::` and an optional embedded IPv4 tail.
///
/// `bytes` ends at the end of the authority, which bounds the search for `]`.
fn match_ipv6_literal(bytes: &[u8], open: usize) -> Option<usize> {
    let close = open + 1 + bytes[open + 1..].iter().position(|&b| b == b']')?;
    let inner = &bytes[open + 1..close];
    if !inner
        .iter()
        .all(|&b| b.is_ascii_hexdigit() || b == b':' || b == b'.')
    {
        return None;
    }

    let valid = match find_double_colon(inner) {
        Some(i) => {
            let (head, tail) = (&inner[..i], &inner[i + 2..]);
            if find_double_colon(tail).is_some() {
                return None;
            }
            let head_groups = count_groups(head, false)?;
            let tail_groups = count_groups(tail, true)?;
            head_groups + tail_groups <= 7
        }
        None => count_groups(inner, true)? == 8,
    };
    valid.then_some(close + 1)
}

fn find_double_colon(bytes: &[u8]) -> Option<usize> {
    bytes.windows(2).position(|w| w == b"::")
}

/// Count the 16-bit groups in a `:`-separated run. A dotted IPv4 tail counts as two.
fn count_groups(bytes: &[u8], allow_ipv4_tail: bool) -> Option<usize> {
    if bytes.is_empty() {
        return Some(0);
    }
    let parts: Vec<&[u8]> = bytes.split(|&b| b == b':').collect();
    let mut groups = 0;
    for (i, part) in parts.iter().enumerate() {
        let is_last = i + 1 == parts.len();
        if is_last && allow_ipv4_tail && part.contains(&b'.') {
            if match_ipv4(part, 0)? != part.len() {
                return None;
            }
            groups += 2;
        } else if (1..=4).contains(&part.len()) && part.iter().all(u8::is_ascii_hexdigit) {
            groups += 1;
        } else {
            return None;
        }
    }
    Some(groups)
}

/// An optional `:port` of up to five digits not above 65535.
///
/// A colon with no digits ends the URI in front of it; an out-of-range port
/// rejects the whole URI.
fn match_port(bytes: &[u8], host_end: usize) -> Option<usize> {
    if bytes.get(host_end) != Some(&b':') {
        return Some(host_end);
    }
    let digits = bytes[host_end + 1..]
        .iter()
        .take_while(|b| b.is_ascii_digit())
        .count();
    if digits == 0 {
        return Some(host_end);
    }
    if digits > 5 {
        return None;
    }
    let port = bytes[host_end + 1..host_end + 1 + digits]
        .iter()
        .fold(0u32, |acc, b| acc * 10 + u32::from(b - b'0'));
    (port <= 65535).then_some(host_end + 1 + digits)
}
