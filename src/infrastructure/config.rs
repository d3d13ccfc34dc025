//! Configuration loading and management
//!
//! Settings are serde-backed with layered defaults: every knob has a
//! compiled-in default from the domain constants, and an optional JSON
//! config file in the working directory overrides them. Missing file means
//! defaults; a present-but-unreadable file is an error rather than a
//! silent fallback.

use std::collections::HashMap;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::domain::constants::{scraping, storage};

/// Default config file name, looked up in the working directory
pub const CONFIG_FILE_NAME: &str = "tyre-scout.json";

/// Complete application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Retrieval settings
    pub scraping: ScrapingConfig,

    /// Storage and export settings
    pub storage: StorageConfig,

    /// Logging configuration
    pub logging: LoggingConfig,
}

/// Retrieval settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScrapingConfig {
    /// Fixed politeness delay before every request, in milliseconds
    pub request_delay_ms: u64,

    /// HTTP request timeout in seconds
    pub request_timeout_seconds: u64,

    /// User-Agent header sent with every request
    pub user_agent: String,

    /// What to do with a listing container missing an expected field
    pub malformed_listing_policy: MalformedListingPolicy,
}

/// Policy for a listing container missing an expected field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MalformedListingPolicy {
    /// Fail the whole extraction batch; nothing from it is persisted
    Abort,
    /// Log and drop the malformed container, keep the rest of the batch
    Skip,
}

/// Storage and export settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// SQLite database file path
    pub database_path: String,

    /// CSV export file path
    pub export_path: String,

    /// Bounded wait for the SQLite write lock, in seconds
    pub busy_timeout_seconds: u64,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level: "error", "warn", "info", "debug", "trace"
    pub level: String,

    /// Module-specific log level filters (e.g. "sqlx": "warn")
    pub module_filters: HashMap<String, String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            scraping: ScrapingConfig::default(),
            storage: StorageConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for ScrapingConfig {
    fn default() -> Self {
        Self {
            request_delay_ms: scraping::DEFAULT_REQUEST_DELAY_MS,
            request_timeout_seconds: scraping::DEFAULT_REQUEST_TIMEOUT_SECONDS,
            user_agent: scraping::DEFAULT_USER_AGENT.to_string(),
            // Strict by default: a partially extracted batch is worse than
            // no batch at all for the dedup guarantees downstream
            malformed_listing_policy: MalformedListingPolicy::Abort,
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_path: storage::DEFAULT_DATABASE_PATH.to_string(),
            export_path: storage::DEFAULT_EXPORT_PATH.to_string(),
            busy_timeout_seconds: storage::DEFAULT_BUSY_TIMEOUT_SECONDS,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            module_filters: {
                let mut filters = HashMap::new();
                filters.insert("sqlx".to_string(), "warn".to_string());
                filters.insert("reqwest".to_string(), "warn".to_string());
                filters.insert("hyper".to_string(), "warn".to_string());
                filters
            },
        }
    }
}

impl AppConfig {
    /// Load configuration from the default file location, falling back to
    /// defaults when no file exists
    pub async fn load() -> Result<Self> {
        Self::load_from(CONFIG_FILE_NAME).await
    }

    /// Load configuration from a specific path
    pub async fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config: Self = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        info!("Loaded configuration from {}", path.display());
        Ok(config)
    }
}
