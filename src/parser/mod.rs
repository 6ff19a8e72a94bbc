//! Parsing: quote-depth segmentation, URI scanning, and raw message bodies.

pub mod eml;
pub mod quote;
pub mod uri;
