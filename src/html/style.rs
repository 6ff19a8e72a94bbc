//! Render settings, quote colors and the embedded stylesheets.

use serde::{Deserialize, Serialize};

/// CSS class of the root `<pre>` element.
pub const CSS_CLASS: &str = "k9mail";

/// CSS class of the signature container.
pub const SIGNATURE_CLASS: &str = "k9mail-signature";

/// Border colors of nested quotes, by depth (1-based, cycling).
pub const QUOTE_COLORS: [&str; 6] = ["#729fcf", "#ad7fa8", "#8ae234", "#fcaf3e", "#e9b96e", "#ccc"];

/// Settings that affect [`render_to_html`](super::render_to_html) but not the
/// message markup itself.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderContext {
    /// Add the dark-mode stylesheet.
    pub dark_mode: bool,
    /// Use a monospace font instead of sans-serif.
    pub fixed_width_font: bool,
}

impl RenderContext {
    /// Settings with explicit values.
    pub fn new(dark_mode: bool, fixed_width_font: bool) -> Self {
        Self {
            dark_mode,
            fixed_width_font,
        }
    }

    /// The `<style>` blocks that go in front of the rendered message.
    pub fn stylesheets(&self) -> String {
        let font = if self.fixed_width_font {
            "monospace"
        } else {
            "sans-serif"
        };
        let mut css = format!(
            "<style type=\"text/css\"> pre.{CSS_CLASS} {{white-space: pre-wrap; word-wrap:break-word; \
             font-family: {font}; margin-top: 0px}} .{SIGNATURE_CLASS} {{opacity: 0.5}}</style>"
        );
        if self.dark_mode {
            css.push_str(DARK_STYLESHEET);
        }
        css
    }
}

const DARK_STYLESHEET: &str = "<style type=\"text/css\">\
* { background: #121212 !important; color: #F3F3F3 !important }\
:link, :link * { color: #CCFF33 !important }\
:visited, :visited * { color: #551A8B !important }\
</style>";

/// Border color for a quote at `depth` (1 or more).
pub fn quote_color(depth: usize) -> &'static str {
    QUOTE_COLORS[depth.saturating_sub(1) % QUOTE_COLORS.len()]
}

/// Append the opening `<blockquote>` tag for `depth`.
pub(crate) fn push_blockquote_open(out: &mut String, depth: usize) {
    out.push_str(
        "<blockquote class=\"gmail_quote\" style=\"margin: 0pt 0pt 1ex 0.8ex; border-left: 1px solid ",
    );
    out.push_str(quote_color(depth));
    out.push_str("; padding-left: 1ex;\">");
}
