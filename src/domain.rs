//! Domain module - core entities and business rules for tyre search
//!
//! This module contains the tyre listing entity, validated search
//! parameters, the UK postcode grammar, and site constants. Nothing in
//! this layer performs I/O.

pub mod constants;
pub mod postcode;
pub mod search;
pub mod tyre;

// Re-export commonly used items for convenience
pub use postcode::{is_valid_postcode, normalize_postcode};
pub use search::{InputError, SearchParameters};
pub use tyre::{TyreIdentity, TyreListing};
