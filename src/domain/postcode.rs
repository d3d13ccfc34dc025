//! UK postcode validation
//!
//! Grammar taken from the GOV.UK "Bulk Data Transfer: Additional Validation
//! For CAS Upload" postcode expression, adjusted to match the normalized
//! (space-free) form this crate validates, and anchored over the whole
//! alternation. Includes the reserved all-letter `GIR 0AA` giro code.

use once_cell::sync::Lazy;
use regex::Regex;

static POSTCODE_GRAMMAR: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^(?:GIR0AA|(?:(?:[A-Z][0-9]{1,2})|(?:[A-Z][A-HJ-Y][0-9]{1,2})|(?:[A-Z][0-9][A-Z])|(?:[A-Z][A-HJ-Y][0-9][A-Z]))[0-9][A-Z]{2})$",
    )
    .expect("postcode grammar must compile")
});

/// Normalize raw postcode input: trim, uppercase, strip internal whitespace.
///
/// Normalization happens here, at the input boundary; [`is_valid_postcode`]
/// itself is a pure predicate over the normalized form.
pub fn normalize_postcode(raw: &str) -> String {
    raw.trim()
        .to_uppercase()
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect()
}

/// Check a normalized postcode against the UK postcode grammar.
///
/// Expects the caller to have passed the input through
/// [`normalize_postcode`] first; lowercase letters or embedded spaces fail
/// the match. No correction is attempted.
pub fn is_valid_postcode(normalized: &str) -> bool {
    POSTCODE_GRAMMAR.is_match(normalized)
}
