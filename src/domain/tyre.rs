//! Tyre listing entity

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One tyre listing as observed on a search-results page
///
/// `id` is assigned by the store on insertion and is `None` for freshly
/// extracted listings. `observed_at` and `source_url` are observation
/// metadata and take no part in listing identity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TyreListing {
    pub id: Option<i64>,
    pub brand: String,
    pub pattern: String,
    pub grip: String,
    pub fuel_efficiency: String,
    pub seasonality: Option<String>,
    pub price: f64,
    pub observed_at: DateTime<Utc>,
    pub source_url: String,
}

impl TyreListing {
    /// Create a listing observed now from the given source URL
    pub fn observed_now(
        brand: impl Into<String>,
        pattern: impl Into<String>,
        grip: impl Into<String>,
        fuel_efficiency: impl Into<String>,
        seasonality: Option<String>,
        price: f64,
        source_url: impl Into<String>,
    ) -> Self {
        Self {
            id: None,
            brand: brand.into(),
            pattern: pattern.into(),
            grip: grip.into(),
            fuel_efficiency: fuel_efficiency.into(),
            seasonality,
            price,
            observed_at: Utc::now(),
            source_url: source_url.into(),
        }
    }

    /// The attribute combination that identifies a logical listing
    pub fn identity(&self) -> TyreIdentity<'_> {
        TyreIdentity {
            brand: &self.brand,
            pattern: &self.pattern,
            seasonality: self.seasonality.as_deref(),
            grip: &self.grip,
            fuel_efficiency: &self.fuel_efficiency,
            price: self.price,
        }
    }
}

/// Borrowed identity tuple of a listing
///
/// Two listings with equal identity are the same logical listing no matter
/// when or from which query they were observed; the store keeps at most one
/// row per identity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TyreIdentity<'a> {
    pub brand: &'a str,
    pub pattern: &'a str,
    pub seasonality: Option<&'a str>,
    pub grip: &'a str,
    pub fuel_efficiency: &'a str,
    pub price: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn listing(source: &str) -> TyreListing {
        TyreListing::observed_now(
            "Michelin",
            "Primacy 4",
            "B",
            "C",
            Some("Summer".to_string()),
            89.99,
            source,
        )
    }

    #[test]
    fn identity_ignores_observation_metadata() {
        let a = listing("https://example.com/a");
        let b = listing("https://example.com/b");
        assert_eq!(a.identity(), b.identity());
    }

    #[test]
    fn identity_distinguishes_price() {
        let a = listing("https://example.com/a");
        let mut b = listing("https://example.com/a");
        b.price = 79.99;
        assert_ne!(a.identity(), b.identity());
    }
}
