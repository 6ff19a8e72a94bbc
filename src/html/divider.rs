//! Recognition of horizontal divider lines such as `-----` or `-- >8 --`.
//!
//! Lines are classified one at a time with small state machines, so the cost
//! is linear in the text length whatever the input looks like.

use std::ops::Range;

/// Whether `line` (without its `\n`) is a divider once surrounding whitespace is trimmed.
///
/// A divider is either at least three characters from `-`, `=` and `_`, or
/// a scissors line: two or more dashes followed by one or more
/// `MARK DASHES` groups, where `MARK` is `>8`, `8<`, `>%` or `%<` with at
/// most one space on either side.
pub fn is_divider_line(line: &str) -> bool {
    let trimmed = line.trim_ascii().as_bytes();
    is_rule(trimmed) || is_scissors(trimmed)
}

fn is_rule(line: &[u8]) -> bool {
    line.len() >= 3 && line.iter().all(|b| matches!(b, b'-' | b'=' | b'_'))
}

fn is_scissors(line: &[u8]) -> bool {
    let mut pos = count_dashes(line, 0);
    if pos < 2 {
        return false;
    }
    loop {
        pos += skip_space(line, pos);
        match line.get(pos..pos + 2) {
            Some(b">8" | b"8<" | b">%" | b"%<") => pos += 2,
            _ => return false,
        }
        pos += skip_space(line, pos);
        let dashes = count_dashes(line, pos);
        if dashes < 2 {
            return false;
        }
        pos += dashes;
        if pos == line.len() {
            return true;
        }
    }
}

fn count_dashes(line: &[u8], from: usize) -> usize {
    line[from..].iter().take_while(|&&b| b == b'-').count()
}

fn skip_space(line: &[u8], at: usize) -> usize {
    usize::from(line.get(at) == Some(&b' '))
}

/// Byte ranges of `text` that each collapse into one `<hr>`.
///
/// A run is a maximal sequence of divider and whitespace-only lines that
/// holds at least one divider. Its range starts at the `\n` in front of the
/// run (or the start of the text) and ends where the next content line
/// starts (or at the end of the text), so neither the line break before nor
/// the one after the divider survives.
pub fn find_divider_runs(text: &str) -> Vec<Range<usize>> {
    let mut runs = Vec::new();
    let mut run_start: Option<usize> = None;
    let mut has_divider = false;
    let mut line_start = 0;

    while line_start < text.len() {
        let (line_end, next_start) = match text[line_start..].find('\n') {
            Some(i) => (line_start + i, line_start + i + 1),
            None => (text.len(), text.len()),
        };
        let line = &text[line_start..line_end];
        let blank = line.trim_ascii().is_empty();

        if blank || is_divider_line(line) {
            run_start.get_or_insert(line_start.saturating_sub(1));
            has_divider |= !blank;
        } else if let Some(start) = run_start.take() {
            if has_divider {
                runs.push(start..line_start);
            }
            has_divider = false;
        }

        line_start = next_start;
    }

    if let Some(start) = run_start {
        if has_divider {
            runs.push(start..text.len());
        }
    }
    runs
}
