//! Changes applied to a section's text while it is written out as HTML.

use std::ops::Range;

use tracing::debug;

use super::divider::find_divider_runs;
use super::entity::{escape_attribute_into, escape_into, Whitespace};
use super::style::SIGNATURE_CLASS;
use crate::parser::uri::find_uris;

/// What to write in place of a range of the text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModificationKind {
    /// A run of divider lines, written as one `<hr>`.
    Divider,
    /// A URI, written as an anchor to itself.
    Link,
    /// The start of the signature block. Always an empty range.
    SignatureStart,
}

/// One replacement or insertion at a byte range of a section's text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Modification {
    pub range: Range<usize>,
    pub kind: ModificationKind,
}

impl Modification {
    fn new(range: Range<usize>, kind: ModificationKind) -> Self {
        Self { range, kind }
    }

    /// Write the HTML that replaces the range.
    fn write(&self, out: &mut String, text: &str) {
        match self.kind {
            ModificationKind::Divider => out.push_str("<hr>"),
            ModificationKind::Link => {
                let uri = &text[self.range.clone()];
                out.push_str("<a href=\"");
                escape_attribute_into(out, uri);
                out.push_str("\">");
                escape_into(out, uri, Whitespace::Retain);
                out.push_str("</a>");
            }
            ModificationKind::SignatureStart => {
                out.push_str("<div class='");
                out.push_str(SIGNATURE_CLASS);
                out.push_str("'>");
            }
        }
    }
}

/// Offset of the first line of `text` that is exactly `-- ` (a trailing `\r` allowed).
pub fn find_signature_start(text: &str) -> Option<usize> {
    let mut line_start = 0;
    for line in text.split('\n') {
        if line == "-- " || line == "-- \r" {
            return Some(line_start);
        }
        line_start += line.len() + 1;
    }
    None
}

/// Collect the divider runs and links of `text`, plus the signature start
/// when `signature` is set, in text order.
///
/// Modifications that would overlap an earlier one are dropped.
pub fn plan(text: &str, signature: Option<usize>) -> Vec<Modification> {
    let mut planned: Vec<Modification> = find_divider_runs(text)
        .into_iter()
        .map(|range| Modification::new(range, ModificationKind::Divider))
        .chain(find_uris(text).into_iter().map(|m| {
            Modification::new(m.start_index..m.end_index, ModificationKind::Link)
        }))
        .chain(signature.map(|at| Modification::new(at..at, ModificationKind::SignatureStart)))
        .collect();
    planned.sort_by_key(|m| (m.range.start, m.range.end));

    let mut accepted: Vec<Modification> = Vec::with_capacity(planned.len());
    for modification in planned {
        let overlaps = accepted
            .last()
            .is_some_and(|last| modification.range.start < last.range.end);
        if overlaps {
            debug!(
                kind = ?modification.kind,
                start = modification.range.start,
                end = modification.range.end,
                "Skipping overlapping modification"
            );
            continue;
        }
        accepted.push(modification);
    }
    accepted
}

/// Write `text` as HTML with `modifications` applied.
///
/// `on_signature` runs right after the signature container is opened, so the
/// caller can track that it must be closed.
pub fn apply(
    out: &mut String,
    text: &str,
    modifications: &[Modification],
    whitespace: Whitespace,
    mut on_signature: impl FnMut(),
) {
    let mut pos = 0;
    for modification in modifications {
        escape_into(out, &text[pos..modification.range.start], whitespace);
        modification.write(out, text);
        if modification.kind == ModificationKind::SignatureStart {
            on_signature();
        }
        pos = modification.range.end;
    }
    escape_into(out, &text[pos..], whitespace);
}
