//! Validated search parameters and search URL construction

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::constants::site;
use super::postcode::{is_valid_postcode, normalize_postcode};

/// Rejected user input, recovered locally by re-prompting
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InputError {
    #[error("Width, Aspect Ratio and Rim Size must be integer values")]
    NotAnInteger { field: &'static str, raw: String },

    #[error("Invalid postcode format")]
    InvalidPostcode { normalized: String },
}

/// A validated set of tyre search parameters
///
/// Construction is the only validation point: the postcode is normalized
/// and checked against the UK postcode grammar here, so every existing
/// value is safe to format into a search URL. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchParameters {
    width: u32,
    aspect_ratio: u32,
    rim_size: u32,
    postcode: String,
}

impl SearchParameters {
    /// Validate and normalize raw parameters
    ///
    /// Dimensions arrive already parsed; integer conversion failures are
    /// reported by the prompt layer, never swallowed here.
    pub fn new(
        width: u32,
        aspect_ratio: u32,
        rim_size: u32,
        raw_postcode: &str,
    ) -> Result<Self, InputError> {
        let postcode = normalize_postcode(raw_postcode);
        if !is_valid_postcode(&postcode) {
            return Err(InputError::InvalidPostcode {
                normalized: postcode,
            });
        }
        Ok(Self {
            width,
            aspect_ratio,
            rim_size,
            postcode,
        })
    }

    /// Build the deterministic search-results URL for these parameters
    ///
    /// Pure formatter over already-validated values; identical parameters
    /// yield byte-identical URLs.
    pub fn search_url(&self) -> String {
        format!(
            "{}{}{}-{}-{}?pc={}",
            site::BASE_URL,
            site::SEARCH_PATH_PREFIX,
            self.width,
            self.aspect_ratio,
            self.rim_size,
            self.postcode
        )
    }

    pub fn postcode(&self) -> &str {
        &self.postcode
    }
}
