//! Tyre listing repository
//!
//! Insert-if-absent semantics over the `tyres` table: `INSERT OR IGNORE`
//! lets the composite unique constraint decide whether a listing is new, so
//! dedup stays atomic per identity tuple even with concurrent writers. A
//! later observation of a known listing is dropped, never updated.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};
use tracing::debug;

use crate::domain::tyre::TyreListing;

/// Result of persisting one extraction batch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BatchOutcome {
    /// Rows actually written
    pub inserted: usize,
    /// Listings whose identity tuple was already present
    pub duplicates: usize,
}

#[derive(Clone)]
pub struct TyreRepository {
    pool: SqlitePool,
}

impl TyreRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Insert a listing unless its identity tuple is already stored
    ///
    /// Returns `true` when a row was written, `false` when the unique
    /// constraint ignored the insert.
    pub async fn insert_if_absent(&self, listing: &TyreListing) -> Result<bool> {
        let result = Self::insert_query(listing)
            .execute(&self.pool)
            .await
            .context("Failed to insert tyre listing")?;
        Ok(result.rows_affected() == 1)
    }

    /// Persist one extraction batch as a single transaction
    ///
    /// All newly-distinct listings become durable together on commit; a
    /// mid-batch failure rolls the whole batch back, leaving only prior
    /// committed batches visible.
    pub async fn insert_batch(&self, listings: &[TyreListing]) -> Result<BatchOutcome> {
        let mut tx = self
            .pool
            .begin()
            .await
            .context("Failed to begin batch transaction")?;

        let mut outcome = BatchOutcome::default();
        for listing in listings {
            let result = Self::insert_query(listing)
                .execute(&mut *tx)
                .await
                .context("Failed to insert tyre listing in batch")?;
            if result.rows_affected() == 1 {
                outcome.inserted += 1;
            } else {
                outcome.duplicates += 1;
            }
        }

        tx.commit().await.context("Failed to commit batch")?;

        debug!(
            "Batch committed: {} inserted, {} duplicates",
            outcome.inserted, outcome.duplicates
        );
        Ok(outcome)
    }

    /// All stored listings in insertion order
    pub async fn list_all(&self) -> Result<Vec<TyreListing>> {
        let rows = sqlx::query(
            r#"
            SELECT id, brand, pattern, grip, fuel_efficiency, seasonality, price, date, source
            FROM tyres
            ORDER BY id ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .context("Failed to list tyre listings")?;

        rows.into_iter().map(Self::listing_from_row).collect()
    }

    /// Number of stored listings
    pub async fn count(&self) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM tyres")
            .fetch_one(&self.pool)
            .await
            .context("Failed to count tyre listings")?;
        Ok(count)
    }

    fn insert_query(
        listing: &TyreListing,
    ) -> sqlx::query::Query<'_, sqlx::Sqlite, sqlx::sqlite::SqliteArguments<'_>> {
        sqlx::query(
            r#"
            INSERT OR IGNORE INTO tyres
            (brand, pattern, grip, fuel_efficiency, seasonality, price, date, source)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&listing.brand)
        .bind(&listing.pattern)
        .bind(&listing.grip)
        .bind(&listing.fuel_efficiency)
        .bind(&listing.seasonality)
        .bind(listing.price)
        .bind(listing.observed_at.to_rfc3339())
        .bind(&listing.source_url)
    }

    fn listing_from_row(row: SqliteRow) -> Result<TyreListing> {
        let date: String = row.get("date");
        let observed_at = DateTime::parse_from_rfc3339(&date)
            .with_context(|| format!("Stored observation date is not RFC 3339: {date}"))?
            .with_timezone(&Utc);

        Ok(TyreListing {
            id: Some(row.get("id")),
            brand: row.get("brand"),
            pattern: row.get("pattern"),
            grip: row.get("grip"),
            fuel_efficiency: row.get("fuel_efficiency"),
            seasonality: row.get("seasonality"),
            price: row.get("price"),
            observed_at,
            source_url: row.get("source"),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::config::StorageConfig;
    use crate::infrastructure::database_connection::DatabaseConnection;
    use tempfile::tempdir;

    async fn test_repository(dir: &tempfile::TempDir) -> Result<TyreRepository> {
        let config = StorageConfig {
            database_path: dir.path().join("test.db").display().to_string(),
            ..Default::default()
        };
        let db = DatabaseConnection::open(&config).await?;
        db.ensure_schema().await?;
        Ok(TyreRepository::new(db.pool().clone()))
    }

    fn listing(brand: &str, price: f64) -> TyreListing {
        TyreListing::observed_now(
            brand,
            "Primacy 4",
            "B",
            "C",
            Some("Summer".to_string()),
            price,
            "https://www.national.co.uk/tyres-search/205-55-16?pc=S434JN",
        )
    }

    #[tokio::test]
    async fn insert_if_absent_reports_true_once_then_false() -> Result<()> {
        let dir = tempdir()?;
        let repo = test_repository(&dir).await?;

        let first = listing("Michelin", 89.99);
        assert!(repo.insert_if_absent(&first).await?);

        // Same identity tuple, different observation metadata
        let mut second = listing("Michelin", 89.99);
        second.source_url = "https://www.national.co.uk/tyres-search/205-55-16?pc=M11AE".into();
        assert!(!repo.insert_if_absent(&second).await?);

        assert_eq!(repo.count().await?, 1);
        Ok(())
    }

    #[tokio::test]
    async fn listings_differing_only_in_price_are_distinct() -> Result<()> {
        let dir = tempdir()?;
        let repo = test_repository(&dir).await?;

        assert!(repo.insert_if_absent(&listing("Michelin", 89.99)).await?);
        assert!(repo.insert_if_absent(&listing("Michelin", 79.99)).await?);
        assert_eq!(repo.count().await?, 2);
        Ok(())
    }

    #[tokio::test]
    async fn batch_counts_inserts_and_duplicates() -> Result<()> {
        let dir = tempdir()?;
        let repo = test_repository(&dir).await?;

        let first_batch = vec![listing("Michelin", 89.99), listing("Pirelli", 75.00)];
        let outcome = repo.insert_batch(&first_batch).await?;
        assert_eq!(outcome, BatchOutcome { inserted: 2, duplicates: 0 });

        // Re-running the same scrape is a no-op on the store
        let outcome = repo.insert_batch(&first_batch).await?;
        assert_eq!(outcome, BatchOutcome { inserted: 0, duplicates: 2 });
        assert_eq!(repo.count().await?, 2);
        Ok(())
    }

    #[tokio::test]
    async fn list_all_preserves_insertion_order_and_fields() -> Result<()> {
        let dir = tempdir()?;
        let repo = test_repository(&dir).await?;

        repo.insert_if_absent(&listing("Michelin", 89.99)).await?;
        repo.insert_if_absent(&listing("Pirelli", 75.00)).await?;

        let all = repo.list_all().await?;
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].id, Some(1));
        assert_eq!(all[0].brand, "Michelin");
        assert_eq!(all[1].id, Some(2));
        assert_eq!(all[1].brand, "Pirelli");
        assert_eq!(all[0].seasonality.as_deref(), Some("Summer"));
        Ok(())
    }

    #[tokio::test]
    async fn null_seasonality_round_trips() -> Result<()> {
        let dir = tempdir()?;
        let repo = test_repository(&dir).await?;

        let mut unspecified = listing("Michelin", 89.99);
        unspecified.seasonality = None;
        repo.insert_if_absent(&unspecified).await?;

        let all = repo.list_all().await?;
        assert_eq!(all[0].seasonality, None);
        Ok(())
    }

    #[tokio::test]
    async fn null_seasonality_does_not_defeat_dedup() -> Result<()> {
        let dir = tempdir()?;
        let repo = test_repository(&dir).await?;

        let mut unspecified = listing("Michelin", 89.99);
        unspecified.seasonality = None;
        assert!(repo.insert_if_absent(&unspecified).await?);
        assert!(!repo.insert_if_absent(&unspecified).await?);
        assert_eq!(repo.count().await?, 1);
        Ok(())
    }
}
