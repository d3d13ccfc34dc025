//! CSV export of the tyre store
//!
//! The export file is always a complete snapshot: it is rebuilt from
//! `list_all()` and written out in full after every successful scrape,
//! never appended to or merged. Header names match the store's column
//! names. Text fields are quoted RFC 4180 style when they contain a
//! delimiter, quote or newline.

use std::path::Path;

use anyhow::{Context, Result};
use tracing::info;

use crate::domain::tyre::TyreListing;
use crate::infrastructure::tyre_repository::TyreRepository;

/// Header row, matching the `tyres` table column names in order
const HEADER: &str = "id,brand,pattern,grip,fuel_efficiency,seasonality,price,date,source";

pub struct CsvExporter;

impl CsvExporter {
    /// Rewrite the export file from the full current store contents
    pub async fn export_all(repo: &TyreRepository, path: impl AsRef<Path>) -> Result<usize> {
        let listings = repo.list_all().await?;
        let path = path.as_ref();

        let content = Self::render(&listings);
        tokio::fs::write(path, content)
            .await
            .with_context(|| format!("Failed to write export file: {}", path.display()))?;

        info!("Exported {} listings to {}", listings.len(), path.display());
        Ok(listings.len())
    }

    /// Render listings to CSV text, header first
    fn render(listings: &[TyreListing]) -> String {
        let mut csv = String::from(HEADER);
        csv.push('\n');

        for listing in listings {
            let id = listing.id.map(|v| v.to_string()).unwrap_or_default();
            csv.push_str(&format!(
                "{},{},{},{},{},{},{},{},{}\n",
                id,
                quote_field(&listing.brand),
                quote_field(&listing.pattern),
                quote_field(&listing.grip),
                quote_field(&listing.fuel_efficiency),
                quote_field(listing.seasonality.as_deref().unwrap_or("")),
                listing.price,
                listing.observed_at.to_rfc3339(),
                quote_field(&listing.source_url),
            ));
        }

        csv
    }
}

/// Quote a field only when it contains a delimiter, quote or newline
fn quote_field(field: &str) -> String {
    if field.contains(',') || field.contains('"') || field.contains('\n') {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}
