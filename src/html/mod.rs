//! Conversion between plain-text message bodies and HTML.
//!
//! - [`text_to_html`] and [`render_to_html`] for displaying a message
//! - [`text_to_html_fragment`] for inline previews while composing
//! - [`html_to_plain_text`] for quoting HTML messages in plain-text replies

pub mod divider;
pub mod entity;
pub mod html_to_text;
pub mod modification;
pub mod style;
pub mod text_to_html;

pub use entity::Whitespace;
pub use html_to_text::html_to_plain_text;
pub use style::RenderContext;
pub use text_to_html::{render_to_html, text_to_html, text_to_html_fragment, text_to_html_fragment_with};
