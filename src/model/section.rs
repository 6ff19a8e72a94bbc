//! Zero-copy views over the quote sections of a message body.

use std::borrow::Cow;
use std::fmt;
use std::ops::Range;

/// One contiguous piece of a section, addressed in the original message text.
///
/// `start..end` is the part that belongs to the section; the quote markers
/// and the `stripped` indentation spaces in front of `start` do not.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub struct Segment {
    /// Byte offset of the first kept byte in the source text.
    pub start: usize,
    /// Byte offset one past the last kept byte (after the `\n`, if any).
    pub end: usize,
    /// Indentation spaces removed in front of `start`.
    pub stripped: usize,
}

impl Segment {
    /// Length in bytes.
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    /// Whether the segment addresses no text.
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// A run of consecutive lines that share one quote depth.
///
/// The section borrows the message text and never copies it: its logical
/// text is the concatenation of its [`Segment`]s. Indexing resolves to the
/// right segment, and [`text`](Self::text) only allocates when the section
/// spans more than one segment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailSection<'a> {
    source: &'a str,
    quote_depth: usize,
    segments: Vec<Segment>,
    /// Logical offset at which each segment starts.
    offsets: Vec<usize>,
    len: usize,
}

impl<'a> EmailSection<'a> {
    fn from_segments(source: &'a str, quote_depth: usize, segments: Vec<Segment>) -> Self {
        let mut offsets = Vec::with_capacity(segments.len());
        let mut len = 0;
        for segment in &segments {
            offsets.push(len);
            len += segment.len();
        }
        Self {
            source,
            quote_depth,
            segments,
            offsets,
            len,
        }
    }

    /// Number of leading `>` markers shared by every line of the section.
    pub fn quote_depth(&self) -> usize {
        self.quote_depth
    }

    /// The segments, in source order.
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// The full message text the section points into.
    pub fn source(&self) -> &'a str {
        self.source
    }

    /// Length of the logical text in bytes.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the logical text is empty.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// The text of each segment, in order.
    pub fn pieces(&self) -> impl Iterator<Item = &'a str> + '_ {
        let source = self.source;
        self.segments.iter().map(move |s| &source[s.start..s.end])
    }

    /// The logical text, borrowed straight from the source when possible.
    pub fn text(&self) -> Cow<'a, str> {
        match self.segments.as_slice() {
            [] => Cow::Borrowed(""),
            [only] => Cow::Borrowed(&self.source[only.start..only.end]),
            _ => {
                let mut text = String::with_capacity(self.len);
                for piece in self.pieces() {
                    text.push_str(piece);
                }
                Cow::Owned(text)
            }
        }
    }

    /// Map a logical offset to `(segment index, source offset)`.
    fn locate(&self, index: usize) -> Option<(usize, usize)> {
        if index >= self.len {
            return None;
        }
        let segment = self.offsets.partition_point(|&o| o <= index) - 1;
        let offset = self.segments[segment].start + (index - self.offsets[segment]);
        Some((segment, offset))
    }

    /// The byte at a logical offset.
    pub fn byte_at(&self, index: usize) -> Option<u8> {
        self.locate(index)
            .map(|(_, offset)| self.source.as_bytes()[offset])
    }

    /// The character starting at a logical offset, if `index` is a character boundary.
    pub fn char_at(&self, index: usize) -> Option<char> {
        let (segment, offset) = self.locate(index)?;
        let end = self.segments[segment].end;
        if !self.source.is_char_boundary(offset) {
            return None;
        }
        self.source[offset..end].chars().next()
    }

    /// A sub-range of the logical text as a section of its own.
    ///
    /// Asking for the whole section hands back `self`. Returns `None` when the
    /// range is out of bounds or does not fall on character boundaries.
    pub fn slice(&self, range: Range<usize>) -> Option<Cow<'_, EmailSection<'a>>> {
        if range.start > range.end || range.end > self.len {
            return None;
        }
        if range.start == 0 && range.end == self.len {
            return Some(Cow::Borrowed(self));
        }

        let mut segments = Vec::new();
        for (segment, &offset) in self.segments.iter().zip(&self.offsets) {
            let seg_end = offset + segment.len();
            if seg_end <= range.start || offset >= range.end {
                continue;
            }
            let start = segment.start + range.start.saturating_sub(offset);
            let end = segment.start + (range.end.min(seg_end) - offset);
            if !self.source.is_char_boundary(start) || !self.source.is_char_boundary(end) {
                return None;
            }
            let stripped = if start == segment.start {
                segment.stripped
            } else {
                0
            };
            segments.push(Segment {
                start,
                end,
                stripped,
            });
        }

        Some(Cow::Owned(Self::from_segments(
            self.source,
            self.quote_depth,
            segments,
        )))
    }
}

impl fmt::Display for EmailSection<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for piece in self.pieces() {
            f.write_str(piece)?;
        }
        Ok(())
    }
}

/// A line handed to the [`Builder`], still carrying its indentation.
#[derive(Debug, Clone, Copy)]
struct PendingLine {
    /// Offset just after the quote markers.
    content_start: usize,
    /// Spaces between the markers and the first content character.
    spaces: usize,
    end: usize,
    blank: bool,
}

/// Collects the lines of one section and finalizes them into an [`EmailSection`].
///
/// Quoted sections lose the indentation that all of their non-blank lines
/// share after the quote markers, so `> foo` alone becomes `foo` while
/// `>     code` next to `> text` keeps its relative indentation. Blank quoted
/// lines never lower that shared indentation.
#[derive(Debug)]
pub struct Builder<'a> {
    source: &'a str,
    quote_depth: usize,
    lines: Vec<PendingLine>,
}

impl<'a> Builder<'a> {
    /// Start a section at the given quote depth.
    pub fn new(source: &'a str, quote_depth: usize) -> Self {
        Self {
            source,
            quote_depth,
            lines: Vec::new(),
        }
    }

    /// Quote depth of the section being built.
    pub fn quote_depth(&self) -> usize {
        self.quote_depth
    }

    /// Whether any line was added yet.
    pub fn has_lines(&self) -> bool {
        !self.lines.is_empty()
    }

    /// Append a line with content.
    ///
    /// `content_start` points just past the quote markers, `spaces` counts the
    /// spaces that follow them and `end` is one past the line's `\n` (or the
    /// end of the text).
    pub fn add_line(&mut self, content_start: usize, spaces: usize, end: usize) -> &mut Self {
        self.lines.push(PendingLine {
            content_start,
            spaces,
            end,
            blank: false,
        });
        self
    }

    /// Append a line that holds nothing but spaces after its quote markers.
    pub fn add_blank_line(&mut self, content_start: usize, spaces: usize, end: usize) -> &mut Self {
        self.lines.push(PendingLine {
            content_start,
            spaces,
            end,
            blank: true,
        });
        self
    }

    /// Finalize the section. Returns `None` when nothing was added.
    pub fn build(self) -> Option<EmailSection<'a>> {
        if self.lines.is_empty() {
            return None;
        }

        let indent = if self.quote_depth == 0 {
            0
        } else {
            self.lines
                .iter()
                .filter(|line| !line.blank)
                .map(|line| line.spaces)
                .min()
                .unwrap_or(1)
        };

        let mut segments: Vec<Segment> = Vec::with_capacity(self.lines.len());
        for line in &self.lines {
            let stripped = indent.min(line.spaces);
            let start = line.content_start + stripped;
            if start >= line.end {
                continue;
            }
            match segments.last_mut() {
                Some(last) if last.end == start => last.end = line.end,
                _ => segments.push(Segment {
                    start,
                    end: line.end,
                    stripped,
                }),
            }
        }

        if segments.is_empty() {
            return None;
        }
        Some(EmailSection::from_segments(
            self.source,
            self.quote_depth,
            segments,
        ))
    }
}
