//! A URI found in plain text.

/// A URI located inside a larger text.
///
/// `uri` is exactly `text[start_index..end_index]`, with the scheme's original
/// letter case. A match never spans zero bytes.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct UriMatch<'a> {
    /// Byte offset of the first character of the URI.
    pub start_index: usize,
    /// Byte offset one past the last character of the URI.
    pub end_index: usize,
    /// The matched text.
    pub uri: &'a str,
}

impl<'a> UriMatch<'a> {
    pub(crate) fn new(text: &'a str, start_index: usize, end_index: usize) -> Self {
        Self {
            start_index,
            end_index,
            uri: &text[start_index..end_index],
        }
    }

    /// Length of the match in bytes.
    pub fn len(&self) -> usize {
        self.end_index - self.start_index
    }

    /// Whether the match is empty. Never true for scanner output.
    pub fn is_empty(&self) -> bool {
        self.start_index == self.end_index
    }
}

impl std::fmt::Display for UriMatch<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.uri)
    }
}
