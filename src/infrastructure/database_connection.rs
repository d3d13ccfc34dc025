//! SQLite connection and schema management
//!
//! One pool per process, opened with `create_if_missing` and a bounded
//! busy timeout so a second process holding the write lock is tolerated
//! briefly rather than failing immediately. Contention beyond the timeout
//! surfaces as a storage error.

use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

use anyhow::{Context, Result};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use tracing::info;

use crate::infrastructure::config::StorageConfig;

pub struct DatabaseConnection {
    pool: SqlitePool,
}

impl DatabaseConnection {
    /// Open (creating if necessary) the SQLite database at the configured path
    pub async fn open(config: &StorageConfig) -> Result<Self> {
        if let Some(parent) = Path::new(&config.database_path).parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await.with_context(|| {
                    format!("Failed to create database directory: {}", parent.display())
                })?;
            }
        }

        let options = SqliteConnectOptions::from_str(&format!("sqlite:{}", config.database_path))
            .with_context(|| format!("Invalid database path: {}", config.database_path))?
            .create_if_missing(true)
            .busy_timeout(Duration::from_secs(config.busy_timeout_seconds));

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await
            .with_context(|| format!("Failed to open database: {}", config.database_path))?;

        info!("Opened database: {}", config.database_path);
        Ok(Self { pool })
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Idempotent schema creation; safe to run on every startup
    ///
    /// The composite unique constraint is what enforces listing dedup; the
    /// repository's insert-if-absent relies on it rather than on
    /// check-then-insert.
    pub async fn ensure_schema(&self) -> Result<()> {
        let create_tyres_sql = r#"
            CREATE TABLE IF NOT EXISTS tyres (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                brand TEXT NOT NULL,
                pattern TEXT NOT NULL,
                grip TEXT NOT NULL,
                fuel_efficiency TEXT NOT NULL,
                seasonality TEXT,
                price REAL NOT NULL,
                date TEXT NOT NULL,
                source TEXT NOT NULL,
                UNIQUE(brand, pattern, seasonality, grip, fuel_efficiency, price)
            )
        "#;

        // SQLite treats NULLs as distinct inside UNIQUE constraints, which
        // would let a nullable seasonality defeat dedup; this expression
        // index makes NULL compare like the empty string for identity.
        let create_identity_index_sql = r#"
            CREATE UNIQUE INDEX IF NOT EXISTS idx_tyres_identity
            ON tyres (brand, pattern, COALESCE(seasonality, ''), grip, fuel_efficiency, price)
        "#;

        sqlx::query(create_tyres_sql)
            .execute(&self.pool)
            .await
            .context("Failed to ensure tyres schema")?;
        sqlx::query(create_identity_index_sql)
            .execute(&self.pool)
            .await
            .context("Failed to ensure tyres identity index")?;

        Ok(())
    }

    /// Close the pool, releasing the database file
    pub async fn close(&self) {
        self.pool.close().await;
    }
}
