//! Core data model types: quote sections and URI matches.

pub mod section;
pub mod uri;
