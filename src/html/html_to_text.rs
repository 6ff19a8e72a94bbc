//! HTML to plain text, for quoting HTML messages in replies.
//!
//! A single forward pass over the markup: text is entity-decoded and its
//! whitespace collapsed, `<br>` and block elements turn into line breaks,
//! and links keep their target next to the link text.

use tracing::trace;

use super::entity::decode_entities;

/// Rule printed in place of `<hr>`.
const HR_TEXT: &str = "_____________________________________________";

/// Elements whose start and end separate paragraphs.
const BLOCK_ELEMENTS: &[&str] = &[
    "address",
    "article",
    "aside",
    "blockquote",
    "center",
    "dd",
    "div",
    "dl",
    "dt",
    "fieldset",
    "figcaption",
    "figure",
    "footer",
    "form",
    "h1",
    "h2",
    "h3",
    "h4",
    "h5",
    "h6",
    "header",
    "li",
    "main",
    "nav",
    "ol",
    "p",
    "pre",
    "section",
    "table",
    "tr",
    "ul",
];

/// Elements whose content is never shown.
const HIDDEN_ELEMENTS: &[&str] = &["head", "script", "style", "title"];

/// Convert an HTML document or fragment to readable plain text.
///
/// Links whose visible text differs from their target come out as
/// `text <target>`. Never fails: anything that does not parse as markup is
/// kept as text.
pub fn html_to_plain_text(html: &str) -> String {
    let mut converter = Converter::default();
    let mut pos = 0;

    while pos < html.len() {
        let Some(lt) = html[pos..].find('<') else {
            converter.text(&html[pos..]);
            break;
        };
        converter.text(&html[pos..pos + lt]);
        pos += lt;

        match read_markup(html, pos) {
            Markup::Tag(tag) => {
                pos = tag.end;
                let hidden = HIDDEN_ELEMENTS.contains(&tag.name.as_str());
                if hidden && !tag.closing && !tag.self_closing {
                    pos = skip_hidden_content(html, pos, &tag.name);
                    continue;
                }
                converter.tag(&tag);
            }
            Markup::Skipped(end) => pos = end,
            Markup::Text => {
                converter.text("<");
                pos += 1;
            }
            Markup::Unterminated => {
                converter.text(&html[pos..]);
                break;
            }
        }
    }

    let text = converter.finish();
    trace!(input = html.len(), output = text.len(), "Converted HTML to text");
    text
}

#[derive(Debug)]
struct Tag<'a> {
    /// Lower-case element name.
    name: String,
    closing: bool,
    self_closing: bool,
    /// Everything between the name and the closing `>`.
    attributes: &'a str,
    /// Offset just past the `>`.
    end: usize,
}

impl Tag<'_> {
    /// Value of an attribute, entity-decoded.
    fn attribute(&self, wanted: &str) -> Option<String> {
        let bytes = self.attributes.as_bytes();
        let mut pos = 0;
        while pos < bytes.len() {
            while pos < bytes.len() && (bytes[pos].is_ascii_whitespace() || bytes[pos] == b'/') {
                pos += 1;
            }
            let name_start = pos;
            while pos < bytes.len()
                && !bytes[pos].is_ascii_whitespace()
                && !matches!(bytes[pos], b'=' | b'/')
            {
                pos += 1;
            }
            let name = &self.attributes[name_start..pos];
            while pos < bytes.len() && bytes[pos].is_ascii_whitespace() {
                pos += 1;
            }
            if bytes.get(pos) != Some(&b'=') {
                if name.is_empty() {
                    pos += 1;
                }
                continue;
            }
            pos += 1;
            while pos < bytes.len() && bytes[pos].is_ascii_whitespace() {
                pos += 1;
            }
            let (value, next) = match bytes.get(pos) {
                Some(&quote @ (b'"' | b'\'')) => {
                    let start = pos + 1;
                    let end = self.attributes[start..]
                        .find(quote as char)
                        .map_or(bytes.len(), |i| start + i);
                    (&self.attributes[start..end], end + 1)
                }
                _ => {
                    let start = pos;
                    let end = self.attributes[start..]
                        .find(|c: char| c.is_ascii_whitespace())
                        .map_or(bytes.len(), |i| start + i);
                    (&self.attributes[start..end], end)
                }
            };
            if name.eq_ignore_ascii_case(wanted) {
                return Some(decode_entities(value));
            }
            pos = next;
        }
        None
    }
}

enum Markup<'a> {
    Tag(Tag<'a>),
    /// A comment, doctype or processing instruction ending at this offset.
    Skipped(usize),
    /// A `<` that does not start markup.
    Text,
    /// Markup without its closing `>`; nothing after it can be a tag either.
    Unterminated,
}

fn read_markup(html: &str, lt: usize) -> Markup<'_> {
    let rest = &html[lt..];
    let bytes = rest.as_bytes();

    if rest.starts_with("<!--") {
        let end = rest[4..].find("-->").map_or(html.len(), |i| lt + 4 + i + 3);
        return Markup::Skipped(end);
    }
    if matches!(bytes.get(1), Some(b'!' | b'?')) {
        return match rest.find('>') {
            Some(i) => Markup::Skipped(lt + i + 1),
            None => Markup::Unterminated,
        };
    }

    let closing = bytes.get(1) == Some(&b'/');
    let name_start = if closing { 2 } else { 1 };
    if !bytes.get(name_start).is_some_and(u8::is_ascii_alphabetic) {
        return Markup::Text;
    }
    let name_end = name_start
        + bytes[name_start..]
            .iter()
            .take_while(|b| b.is_ascii_alphanumeric())
            .count();

    let Some(gt) = find_tag_end(rest, name_end) else {
        return Markup::Unterminated;
    };
    let inner = &rest[name_end..gt];
    Markup::Tag(Tag {
        name: rest[name_start..name_end].to_ascii_lowercase(),
        closing,
        self_closing: inner.trim_end().ends_with('/'),
        attributes: inner,
        end: lt + gt + 1,
    })
}

/// Offset of the `>` that ends a tag, ignoring any inside quoted attribute values.
fn find_tag_end(tag: &str, from: usize) -> Option<usize> {
    let mut quote: Option<u8> = None;
    for (i, &b) in tag.as_bytes().iter().enumerate().skip(from) {
        match quote {
            Some(q) if b == q => quote = None,
            Some(_) => {}
            None if b == b'"' || b == b'\'' => quote = Some(b),
            None if b == b'>' => return Some(i),
            None => {}
        }
    }
    None
}

/// Offset just past `</name ...>`, or the end of the input.
fn skip_hidden_content(html: &str, from: usize, name: &str) -> usize {
    let bytes = html.as_bytes();
    let mut pos = from;
    while let Some(i) = html[pos..].find("</") {
        let start = pos + i + 2;
        let candidate = bytes.get(start..start + name.len());
        let after = bytes.get(start + name.len());
        if candidate.is_some_and(|c| c.eq_ignore_ascii_case(name.as_bytes()))
            && !after.is_some_and(u8::is_ascii_alphanumeric)
        {
            return html[start..].find('>').map_or(html.len(), |gt| start + gt + 1);
        }
        pos = start;
    }
    html.len()
}

/// An `<a href>` whose text is being collected.
#[derive(Debug)]
struct OpenLink {
    href: String,
    /// Output length when the link opened.
    text_start: usize,
}

#[derive(Debug, Default)]
struct Converter {
    out: String,
    /// A collapsed whitespace run is waiting to be written as one space.
    pending_space: bool,
    /// Nesting level of `<pre>` elements.
    pre: usize,
    link: Option<OpenLink>,
}

impl Converter {
    fn text(&mut self, raw: &str) {
        if raw.is_empty() {
            return;
        }
        let decoded = decode_entities(raw);
        for c in decoded.chars() {
            if self.pre > 0 {
                self.out.push(visible(c));
            } else if c.is_ascii_whitespace() {
                self.pending_space = true;
            } else {
                self.flush_space();
                self.out.push(visible(c));
            }
        }
    }

    fn flush_space(&mut self) {
        if self.pending_space
            && !self.out.is_empty()
            && !self.out.ends_with(['\n', ' '])
        {
            self.out.push(' ');
        }
        self.pending_space = false;
    }

    fn tag(&mut self, tag: &Tag<'_>) {
        match tag.name.as_str() {
            "br" => self.line_break(),
            "hr" => {
                self.paragraph_break();
                self.out.push_str(HR_TEXT);
                self.paragraph_break();
            }
            "a" if tag.closing => self.close_link(),
            "a" => {
                // An anchor never nests; a new one ends the open one.
                self.close_link();
                self.flush_space();
                self.link = tag
                    .attribute("href")
                    .filter(|href| !href.trim().is_empty())
                    .map(|href| OpenLink {
                        href: href.trim().to_string(),
                        text_start: self.out.len(),
                    });
            }
            "pre" => {
                self.paragraph_break();
                if tag.closing {
                    self.pre = self.pre.saturating_sub(1);
                } else if !tag.self_closing {
                    self.pre += 1;
                }
            }
            "td" | "th" | "img" => self.pending_space = true,
            name if BLOCK_ELEMENTS.contains(&name) => self.paragraph_break(),
            _ => {}
        }
    }

    fn close_link(&mut self) {
        let Some(link) = self.link.take() else {
            return;
        };
        let shown = self.out.get(link.text_start..).unwrap_or("").trim();
        if shown == link.href {
            return;
        }
        if shown.is_empty() {
            self.flush_space();
            self.out.push_str(&link.href);
        } else {
            self.pending_space = false;
            self.out.push_str(" <");
            self.out.push_str(&link.href);
            self.out.push('>');
        }
    }

    fn trim_trailing_spaces(&mut self) {
        if self.pre == 0 {
            let trimmed = self.out.trim_end_matches(' ').len();
            self.out.truncate(trimmed);
        }
        self.pending_space = false;
    }

    fn line_break(&mut self) {
        self.trim_trailing_spaces();
        self.out.push('\n');
    }

    /// End the current paragraph with a blank line, unless there is one already.
    fn paragraph_break(&mut self) {
        self.trim_trailing_spaces();
        if self.out.is_empty() || self.out.ends_with("\n\n") {
            return;
        }
        if self.out.ends_with('\n') {
            self.out.push('\n');
        } else {
            self.out.push_str("\n\n");
        }
    }

    fn finish(mut self) -> String {
        self.close_link();
        self.out.trim().to_string()
    }
}

/// Characters that stand in for content the text output cannot show.
fn visible(c: char) -> char {
    match c {
        '\u{00A0}' | '\u{FFFC}' => ' ',
        c => c,
    }
}
