//! tyre-scout - tyre listing scraper for www.national.co.uk
//!
//! Retrieves tyre listings from search-results pages, validates
//! user-supplied search parameters, extracts per-listing attributes from
//! the markup, persists them to SQLite with identity-tuple deduplication,
//! and mirrors the store to a CSV snapshot after every successful scrape.

// Module declarations
pub mod application;
pub mod domain;
pub mod infrastructure;
