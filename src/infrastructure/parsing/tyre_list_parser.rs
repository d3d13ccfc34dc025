//! Tyre listing extraction from search-results markup
//!
//! Each listing is a `div.tyreDisplay` container carrying its attributes as
//! `data-*` values, with the human-readable pattern name in a nested
//! `a.pattern_link` element. A page with zero containers is a normal "no
//! results" outcome, not an error.

use anyhow::Result;
use scraper::{ElementRef, Html, Selector};
use tracing::{debug, warn};

use super::error::{ParseError, ParseResult};
use crate::domain::constants::site;
use crate::domain::tyre::TyreListing;
use crate::infrastructure::config::MalformedListingPolicy;

/// Parser for extracting tyre listings from a search-results page
pub struct TyreListParser {
    container_selector: Selector,
    pattern_link_selector: Selector,
    policy: MalformedListingPolicy,
}

impl TyreListParser {
    /// Create a parser with the given malformed-listing policy
    pub fn new(policy: MalformedListingPolicy) -> Result<Self> {
        let container_selector = Selector::parse(site::TYRE_CONTAINER_SELECTOR)
            .map_err(|e| anyhow::anyhow!("Invalid container selector: {e}"))?;
        let pattern_link_selector = Selector::parse(site::PATTERN_LINK_SELECTOR)
            .map_err(|e| anyhow::anyhow!("Invalid pattern link selector: {e}"))?;

        Ok(Self {
            container_selector,
            pattern_link_selector,
            policy,
        })
    }

    /// Extract every tyre listing from raw markup
    ///
    /// Under [`MalformedListingPolicy::Abort`] the first malformed container
    /// fails the whole batch; under `Skip` it is logged and dropped. An
    /// empty result means the page had no listing containers.
    pub fn parse(&self, markup: &str, source_url: &str) -> ParseResult<Vec<TyreListing>> {
        let document = Html::parse_document(markup);
        let mut listings = Vec::new();

        for (index, element) in document.select(&self.container_selector).enumerate() {
            match self.extract_listing(&element, index, source_url) {
                Ok(listing) => listings.push(listing),
                Err(e) => match self.policy {
                    MalformedListingPolicy::Abort => return Err(e),
                    MalformedListingPolicy::Skip => {
                        warn!("Skipping malformed listing: {}", e);
                    }
                },
            }
        }

        debug!("Extracted {} listings from {}", listings.len(), source_url);
        Ok(listings)
    }

    /// Extract one listing from its container element
    fn extract_listing(
        &self,
        element: &ElementRef,
        index: usize,
        source_url: &str,
    ) -> ParseResult<TyreListing> {
        let grip = Self::required_attr(element, index, "data-grip")?;
        let fuel_efficiency = Self::required_attr(element, index, "data-fuel")?;
        let raw_price = Self::required_attr(element, index, "data-price")?;
        let brand = Self::required_attr(element, index, "data-brand")?;
        // Seasonality is the one nullable field; a missing or empty
        // attribute means "unspecified", not a malformed listing
        let seasonality = element
            .value()
            .attr("data-tyre-season")
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string);

        let price: f64 = raw_price.parse().map_err(|_| ParseError::InvalidPrice {
            index,
            raw: raw_price.clone(),
        })?;

        let pattern = element
            .select(&self.pattern_link_selector)
            .next()
            .map(|link| link.text().collect::<String>().trim().to_string())
            .filter(|text| !text.is_empty())
            .ok_or(ParseError::MissingPatternLink { index })?;

        Ok(TyreListing::observed_now(
            brand,
            pattern,
            grip,
            fuel_efficiency,
            seasonality,
            price,
            source_url,
        ))
    }

    fn required_attr(
        element: &ElementRef,
        index: usize,
        attribute: &'static str,
    ) -> ParseResult<String> {
        element
            .value()
            .attr(attribute)
            .map(|v| v.trim().to_string())
            .ok_or(ParseError::MissingAttribute { index, attribute })
    }
}
