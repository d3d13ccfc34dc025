//! Parsing error types for listing extraction

use thiserror::Error;

pub type ParseResult<T> = Result<T, ParseError>;

/// Failure to extract structured data from a listing container
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("Listing {index} is missing required attribute '{attribute}'")]
    MissingAttribute { index: usize, attribute: &'static str },

    #[error("Listing {index} has no pattern link")]
    MissingPatternLink { index: usize },

    #[error("Listing {index} has unparseable price '{raw}'")]
    InvalidPrice { index: usize, raw: String },
}
