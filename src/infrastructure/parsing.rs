//! HTML parsing infrastructure for tyre search-results pages

pub mod error;
pub mod tyre_list_parser;

// Re-export public types
pub use error::{ParseError, ParseResult};
pub use tyre_list_parser::TyreListParser;
