//! Plain text to HTML: quote nesting, dividers, signature and links.

use tracing::trace;

use super::entity::Whitespace;
use super::modification::{self, find_signature_start};
use super::style::{push_blockquote_open, RenderContext, CSS_CLASS};
use crate::parser::quote::segment_by_quote_depth;

/// Where the renderer stands with respect to the signature block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Signature {
    /// No `-- ` line seen yet.
    Pending,
    /// The container is open; it was opened inside this many blockquotes.
    Open(usize),
    /// The container was opened and closed again.
    Closed,
}

struct HtmlWriter {
    out: String,
    whitespace: Whitespace,
    depth: usize,
    signature: Signature,
}

impl HtmlWriter {
    fn new(capacity: usize, whitespace: Whitespace) -> Self {
        Self {
            out: String::with_capacity(capacity),
            whitespace,
            depth: 0,
            signature: Signature::Pending,
        }
    }

    /// Open or close blockquotes until `target` levels are open.
    ///
    /// The signature container is closed before the blockquote that holds it.
    fn set_depth(&mut self, target: usize) {
        while self.depth > target {
            if matches!(self.signature, Signature::Open(at) if at >= self.depth) {
                self.close_signature();
            }
            self.out.push_str("</blockquote>");
            self.depth -= 1;
        }
        while self.depth < target {
            self.depth += 1;
            push_blockquote_open(&mut self.out, self.depth);
        }
    }

    fn close_signature(&mut self) {
        if let Signature::Open(_) = self.signature {
            self.out.push_str("</div>");
            self.signature = Signature::Closed;
        }
    }

    fn write_text(&mut self, text: &str) {
        let signature = match self.signature {
            Signature::Pending => find_signature_start(text),
            _ => None,
        };
        let modifications = modification::plan(text, signature);

        let depth = self.depth;
        let mut opened = false;
        modification::apply(&mut self.out, text, &modifications, self.whitespace, || {
            opened = true
        });
        if opened {
            self.signature = Signature::Open(depth);
        }
    }

    fn finish(mut self) -> String {
        self.set_depth(0);
        self.close_signature();
        self.out
    }
}

/// Render a plain-text message body as a `<pre>` element.
///
/// Quoted sections become nested `<blockquote>` elements colored by depth,
/// divider lines become `<hr>`, URIs become links and everything from the
/// first `-- ` line on is wrapped in a signature `<div>`. A signature that
/// starts inside a quote ends with that quote's `</blockquote>`, so the
/// lines after the quote are left outside the `<div>`. The result holds no
/// stylesheet; see [`render_to_html`].
pub fn text_to_html(text: &str) -> String {
    let mut writer = HtmlWriter::new(text.len() + text.len() / 4 + 64, Whitespace::Retain);
    writer.out.push_str("<pre dir=\"auto\" class=\"");
    writer.out.push_str(CSS_CLASS);
    writer.out.push_str("\">");

    let sections = segment_by_quote_depth(text);
    trace!(sections = sections.len(), "Rendering message body");
    for section in &sections {
        writer.set_depth(section.quote_depth());
        writer.write_text(&section.text());
    }

    let mut html = writer.finish();
    html.push_str("</pre>");
    html
}

/// Render a message body with the stylesheets for `context` in front.
pub fn render_to_html(text: &str, context: &RenderContext) -> String {
    let mut html = context.stylesheets();
    html.push_str(&text_to_html(text));
    html
}

/// Render text as an inline HTML fragment for composing.
///
/// Quote markers are kept as text and there is no `<pre>` around the
/// result, so runs of spaces are protected with non-breaking spaces.
pub fn text_to_html_fragment(text: &str) -> String {
    text_to_html_fragment_with(text, Whitespace::NonBreaking)
}

/// Like [`text_to_html_fragment`], with a choice of space handling.
pub fn text_to_html_fragment_with(text: &str, whitespace: Whitespace) -> String {
    let mut writer = HtmlWriter::new(text.len() + text.len() / 4, whitespace);
    writer.write_text(text);
    writer.finish()
}
