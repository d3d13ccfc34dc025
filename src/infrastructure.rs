//! Infrastructure layer for HTTP retrieval, HTML parsing and storage
//!
//! Provides the SQLite connection and repository, the rate-limited HTTP
//! client, the search-results parser, the CSV exporter, configuration
//! loading, and logging setup.

pub mod config;
pub mod csv_exporter;
pub mod database_connection;
pub mod http_client;
pub mod logging;
pub mod parsing;
pub mod tyre_repository;

// Re-export commonly used items
pub use config::{AppConfig, MalformedListingPolicy};
pub use csv_exporter::CsvExporter;
pub use database_connection::DatabaseConnection;
pub use http_client::{FetchError, HttpClient, ListingFetcher};
pub use parsing::{ParseError, TyreListParser};
pub use tyre_repository::{BatchOutcome, TyreRepository};
