//! Splits a message body into sections of equal quote depth.
//!
//! A line's quote depth is the number of leading `>` markers. Spaces in front
//! of the first marker and between consecutive markers are skipped, so
//! `> > text` and `>   >> text` have depths 2 and 3 with content `text`.
//! Consecutive lines of the same depth form one [`EmailSection`].

use tracing::trace;

use crate::model::section::{Builder, EmailSection};

/// The quote prefix of one physical line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuotePrefix {
    /// Number of `>` markers.
    pub depth: usize,
    /// Byte offset (within the line) just past the last marker, or 0 when unquoted.
    pub content_start: usize,
    /// Spaces between `content_start` and the first content character.
    pub spaces: usize,
}

/// Detect the quote markers at the start of `line`.
///
/// `line` must not contain the terminating `\n`.
pub fn quote_prefix(line: &str) -> QuotePrefix {
    let bytes = line.as_bytes();
    let leading = count_spaces(bytes, 0);

    if bytes.get(leading) != Some(&b'>') {
        return QuotePrefix {
            depth: 0,
            content_start: 0,
            spaces: leading,
        };
    }

    let mut depth = 1;
    let mut pos = leading + 1;
    loop {
        let spaces = count_spaces(bytes, pos);
        if bytes.get(pos + spaces) == Some(&b'>') {
            depth += 1;
            pos += spaces + 1;
        } else {
            return QuotePrefix {
                depth,
                content_start: pos,
                spaces,
            };
        }
    }
}

fn count_spaces(bytes: &[u8], from: usize) -> usize {
    bytes
        .get(from..)
        .map(|rest| rest.iter().take_while(|&&b| b == b' ').count())
        .unwrap_or(0)
}

/// Split `text` into sections of consecutive lines sharing a quote depth.
///
/// Consecutive sections always differ in depth. Quote markers and the
/// indentation shared by a quoted section are left out; every other byte,
/// including each kept line's `\n`, appears in exactly one section. An
/// unterminated quoted last line with no content is dropped, so `"> a\n>"`
/// yields the single section `"a\n"`.
pub fn segment_by_quote_depth(text: &str) -> Vec<EmailSection<'_>> {
    let mut sections = Vec::new();
    let mut builder = Builder::new(text, 0);
    let mut line_start = 0;

    while line_start < text.len() {
        let (line_end, next_start) = match text[line_start..].find('\n') {
            Some(i) => (line_start + i, line_start + i + 1),
            None => (text.len(), text.len()),
        };
        let terminated = next_start > line_end;

        let prefix = quote_prefix(&text[line_start..line_end]);
        let content_start = line_start + prefix.content_start;
        let blank = content_start + prefix.spaces == line_end;

        if blank && !terminated && prefix.depth > 0 {
            line_start = next_start;
            continue;
        }

        if prefix.depth != builder.quote_depth() {
            let finished = std::mem::replace(&mut builder, Builder::new(text, prefix.depth));
            sections.extend(finished.build());
        }

        if blank {
            builder.add_blank_line(content_start, prefix.spaces, next_start);
        } else {
            builder.add_line(content_start, prefix.spaces, next_start);
        }

        line_start = next_start;
    }

    sections.extend(builder.build());
    trace!(sections = sections.len(), "Segmented message body");
    sections
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary(text: &str) -> Vec<(usize, String)> {
        segment_by_quote_depth(text)
            .iter()
            .map(|s| (s.quote_depth(), s.to_string()))
            .collect()
    }

    #[test]
    fn test_quote_prefix_unquoted() {
        let prefix = quote_prefix("  hello");
        assert_eq!(prefix.depth, 0);
        assert_eq!(prefix.spaces, 2);
    }

    #[test]
    fn test_quote_prefix_nested_with_spaces() {
        let prefix = quote_prefix("> > text");
        assert_eq!(prefix.depth, 2);
        assert_eq!(prefix.content_start, 3);
        assert_eq!(prefix.spaces, 1);
    }

    #[test]
    fn test_quote_prefix_wide_gap_between_markers() {
        let prefix = quote_prefix(">  > text");
        assert_eq!(prefix.depth, 2);
        assert_eq!(prefix.content_start, 4);
        assert_eq!(prefix.spaces, 1);

        let prefix = quote_prefix(">   >> text");
        assert_eq!(prefix.depth, 3);
        assert_eq!(prefix.content_start, 6);
    }

    #[test]
    fn test_quote_prefix_leading_spaces() {
        let prefix = quote_prefix("  > ");
        assert_eq!(prefix.depth, 1);
        assert_eq!(prefix.content_start, 3);
        assert_eq!(prefix.spaces, 1);
    }

    #[test]
    fn test_empty_input() {
        assert!(segment_by_quote_depth("").is_empty());
    }

    #[test]
    fn test_unquoted_text_is_one_borrowed_section() {
        let text = "one\n two\n";
        let sections = segment_by_quote_depth(text);
        assert_eq!(sections.len(), 1);
        assert_eq!(sections[0].quote_depth(), 0);
        assert!(matches!(sections[0].text(), std::borrow::Cow::Borrowed(t) if t == text));
    }

    #[test]
    fn test_depth_changes_split_sections() {
        assert_eq!(
            summary("zero\n> one\n>> two\n> one again\nzero"),
            vec![
                (0, "zero\n".to_string()),
                (1, "one\n".to_string()),
                (2, "two\n".to_string()),
                (1, "one again\n".to_string()),
                (0, "zero".to_string()),
            ]
        );
    }

    #[test]
    fn test_spaced_markers_count_toward_depth() {
        assert_eq!(summary(">  > text\n"), vec![(2, "text\n".to_string())]);
        assert_eq!(
            summary("> > a\n>  >  b\n>   >> c\n"),
            vec![(2, "a\n b\n".to_string()), (3, "c\n".to_string())]
        );
    }

    #[test]
    fn test_shared_indent_removed() {
        assert_eq!(
            summary(">   a\n>    b\n"),
            vec![(1, "a\n b\n".to_string())]
        );
    }

    #[test]
    fn test_quoted_blank_line_does_not_lower_indent() {
        assert_eq!(
            summary(">\n>    Quoted text\n>     \n>  \n>    More quoted text\n>\n"),
            vec![(1, "\nQuoted text\n \n\nMore quoted text\n\n".to_string())]
        );
    }

    #[test]
    fn test_carriage_return_counts_as_content() {
        // `>\r` is not blank, so it pins the shared indentation to zero.
        assert_eq!(
            summary("> a\r\n>\r\n> b\r\n"),
            vec![(1, " a\r\n\r\n b\r\n".to_string())]
        );
    }

    #[test]
    fn test_trailing_quoted_blank_line_without_newline() {
        assert_eq!(summary("> a\n>"), vec![(1, "a\n".to_string())]);
        assert_eq!(summary(">"), Vec::<(usize, String)>::new());
    }

    #[test]
    fn test_unterminated_last_line_kept() {
        assert_eq!(summary("a\nb"), vec![(0, "a\nb".to_string())]);
    }

    #[test]
    fn test_blank_unquoted_line_between_quotes() {
        assert_eq!(
            summary("> a\n\n> b\n"),
            vec![
                (1, "a\n".to_string()),
                (0, "\n".to_string()),
                (1, "b\n".to_string()),
            ]
        );
    }

    #[test]
    fn test_consecutive_sections_differ_in_depth() {
        let text = "a\n> b\n> c\n>> d\n\n>> e\n> f\ng\n";
        let sections = segment_by_quote_depth(text);
        for pair in sections.windows(2) {
            assert_ne!(pair[0].quote_depth(), pair[1].quote_depth());
        }
    }
}
