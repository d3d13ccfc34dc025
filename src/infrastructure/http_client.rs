//! HTTP client for listing-page retrieval
//!
//! Wraps `reqwest` with a fixed politeness delay before every request and a
//! stable browser identity header. Transport failures surface as
//! [`FetchError`]; nothing here retries, a failed fetch aborts the current
//! search attempt.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use reqwest::{Client, StatusCode};
use thiserror::Error;
use tracing::{debug, info};

use crate::infrastructure::config::ScrapingConfig;

/// Transport-layer failure while retrieving a page
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("Request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Request to {url} returned status {status}")]
    Status { url: String, status: StatusCode },

    #[error("Failed to read response body from {url}: {source}")]
    Body {
        url: String,
        #[source]
        source: reqwest::Error,
    },
}

/// Capability to fetch a search-results page as raw markup
///
/// The session controller depends on this seam rather than on [`HttpClient`]
/// directly, so tests can drive the pipeline with canned markup.
#[async_trait]
pub trait ListingFetcher: Send + Sync {
    async fn fetch_listing_page(&self, url: &str) -> Result<String, FetchError>;
}

/// HTTP client with a fixed pre-request delay for respectful scraping
pub struct HttpClient {
    client: Client,
    request_delay: Duration,
}

impl HttpClient {
    /// Create a new HTTP client from scraping configuration
    pub fn new(config: &ScrapingConfig) -> anyhow::Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(
            USER_AGENT,
            HeaderValue::from_str(&config.user_agent)
                .map_err(|e| anyhow::anyhow!("Invalid user agent: {e}"))?,
        );

        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_seconds))
            .default_headers(headers)
            .build()
            .map_err(|e| anyhow::anyhow!("Failed to create HTTP client: {e}"))?;

        Ok(Self {
            client,
            request_delay: Duration::from_millis(config.request_delay_ms),
        })
    }
}

#[async_trait]
impl ListingFetcher for HttpClient {
    async fn fetch_listing_page(&self, url: &str) -> Result<String, FetchError> {
        // Unconditional politeness delay, once per invocation
        debug!(
            "Waiting {}ms before requesting {}",
            self.request_delay.as_millis(),
            url
        );
        tokio::time::sleep(self.request_delay).await;

        info!("Fetching listing page: {}", url);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|source| FetchError::Request {
                url: url.to_string(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status,
            });
        }

        let body = response.text().await.map_err(|source| FetchError::Body {
            url: url.to_string(),
            source,
        })?;

        debug!("Fetched {} ({} chars)", url, body.len());
        Ok(body)
    }
}
