//! HTML character escaping and entity decoding.

/// How runs of spaces are written.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Whitespace {
    /// Spaces are copied as they are.
    #[default]
    Retain,
    /// In every run of spaces, all but the last become U+00A0 so that the
    /// run survives HTML whitespace collapsing.
    NonBreaking,
}

const NBSP: char = '\u{00A0}';

/// Append `text` as HTML content: `&`, `<` and `>` are escaped, `\n` becomes
/// `<br>` and `\r` is dropped.
pub(crate) fn escape_into(out: &mut String, text: &str, whitespace: Whitespace) {
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '\n' => out.push_str("<br>"),
            '\r' => {}
            ' ' if whitespace == Whitespace::NonBreaking => push_non_breaking_space(out),
            c => out.push(c),
        }
    }
}

/// The space written last becomes U+00A0 once another one follows it. A
/// space that opens a line is always U+00A0, since HTML would drop it.
fn push_non_breaking_space(out: &mut String) {
    if out.ends_with(' ') {
        out.pop();
        out.push(NBSP);
        out.push(' ');
    } else if out.is_empty() || out.ends_with("<br>") || out.ends_with("<hr>") {
        out.push(NBSP);
    } else {
        out.push(' ');
    }
}

/// Append `value` for use inside a double-quoted attribute.
pub(crate) fn escape_attribute_into(out: &mut String, value: &str) {
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            c => out.push(c),
        }
    }
}

/// Decode one entity body (the part between `&` and `;`).
pub fn decode_entity(name: &str) -> Option<char> {
    if let Some(number) = name.strip_prefix('#') {
        let code = match number.strip_prefix(['x', 'X']) {
            Some(hex) => u32::from_str_radix(hex, 16).ok()?,
            None => number.parse::<u32>().ok()?,
        };
        return char::from_u32(code).filter(|&c| c != '\0');
    }
    let c = match name {
        "amp" | "AMP" => '&',
        "lt" | "LT" => '<',
        "gt" | "GT" => '>',
        "quot" | "QUOT" => '"',
        "apos" => '\'',
        "nbsp" => NBSP,
        "copy" => '©',
        "reg" => '®',
        "trade" => '™',
        "hellip" => '…',
        "mdash" => '—',
        "ndash" => '–',
        "lsquo" => '‘',
        "rsquo" => '’',
        "ldquo" => '“',
        "rdquo" => '”',
        "laquo" => '«',
        "raquo" => '»',
        "bull" => '•',
        "middot" => '·',
        "euro" => '€',
        "pound" => '£',
        "yen" => '¥',
        "cent" => '¢',
        "deg" => '°',
        "times" => '×',
        "shy" => '\u{00AD}',
        _ => return None,
    };
    Some(c)
}

/// Replace the entities in `text`. Unknown or unterminated entities are kept verbatim.
pub fn decode_entities(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        let after = &rest[amp + 1..];
        // Entity names are short; bound the search for ';'.
        let decoded = after
            .char_indices()
            .take(32)
            .find(|&(_, c)| c == ';' || c == '&' || c.is_whitespace() || c == '<')
            .filter(|&(_, c)| c == ';')
            .and_then(|(semi, _)| decode_entity(&after[..semi]).map(|c| (c, semi)));
        match decoded {
            Some((c, semi)) => {
                out.push(c);
                rest = &after[semi + 1..];
            }
            None => {
                out.push('&');
                rest = after;
            }
        }
    }
    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn escaped(text: &str, whitespace: Whitespace) -> String {
        let mut out = String::new();
        escape_into(&mut out, text, whitespace);
        out
    }

    #[test]
    fn test_escape_reserved() {
        assert_eq!(
            escaped("a < b && c > d\r\n", Whitespace::Retain),
            "a &lt; b &amp;&amp; c &gt; d<br>"
        );
    }

    #[test]
    fn test_non_breaking_runs() {
        assert_eq!(escaped(" foo", Whitespace::NonBreaking), "\u{00A0}foo");
        assert_eq!(escaped("  foo", Whitespace::NonBreaking), "\u{00A0} foo");
        assert_eq!(escaped("a   b", Whitespace::NonBreaking), "a\u{00A0}\u{00A0} b");
        assert_eq!(escaped("a b", Whitespace::NonBreaking), "a b");
        assert_eq!(escaped("a\n b", Whitespace::NonBreaking), "a<br>\u{00A0}b");
    }

    #[test]
    fn test_non_breaking_runs_ignore_carriage_return() {
        assert_eq!(escaped("a \r b", Whitespace::NonBreaking), "a\u{00A0} b");
        assert_eq!(escaped("a \r\n", Whitespace::NonBreaking), "a <br>");
    }

    #[test]
    fn test_attribute_escape() {
        let mut out = String::new();
        escape_attribute_into(&mut out, "a\"b&c");
        assert_eq!(out, "a&quot;b&amp;c");
    }

    #[test]
    fn test_decode_named_and_numeric() {
        assert_eq!(decode_entities("&lt;p&gt; &amp; &#65;&#x42;"), "<p> & AB");
        assert_eq!(decode_entities("a&nbsp;b"), "a\u{00A0}b");
    }

    #[test]
    fn test_decode_keeps_unknown() {
        assert_eq!(decode_entities("AT&T &bogus; &#xZZ; &"), "AT&T &bogus; &#xZZ; &");
        assert_eq!(decode_entities("&#0;"), "&#0;");
    }
}
