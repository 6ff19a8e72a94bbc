//! `mailquote`: quote-aware rendering of plain-text email.
//!
//! This crate turns plain-text message bodies into HTML with nested
//! blockquotes, horizontal rules, a marked signature and clickable links,
//! converts HTML back into quotable plain text, and finds URIs in text.
//!
//! ```
//! let html = mailquote::html::text_to_html("Hi\n> quoted\n");
//! assert!(html.contains("<blockquote"));
//! ```

pub mod config;
pub mod error;
pub mod html;
pub mod model;
pub mod parser;
pub mod reply;

pub use error::{MailQuoteError, Result};
pub use html::{html_to_plain_text, render_to_html, text_to_html, text_to_html_fragment, RenderContext};
pub use model::section::EmailSection;
pub use model::uri::UriMatch;
pub use parser::quote::segment_by_quote_depth;
pub use parser::uri::{find_uris, is_valid_uri, parse_uri};
