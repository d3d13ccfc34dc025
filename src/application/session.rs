//! Session controller - the interactive scrape loop
//!
//! Drives prompt → validate → build query → fetch → extract → persist →
//! export → report as a loop transition machine. Fetch and extraction
//! failures are reported and return the user to the prompt; storage
//! failures are fatal and propagate with previously committed batches
//! intact. Exit is a returned value, never a process call from inside a
//! handler.

use std::io::{BufRead, Write};
use std::path::PathBuf;

use anyhow::Result;
use tracing::{info, warn};

use crate::application::prompt::{Attempt, Prompt};
use crate::domain::search::SearchParameters;
use crate::domain::tyre::TyreListing;
use crate::infrastructure::csv_exporter::CsvExporter;
use crate::infrastructure::http_client::ListingFetcher;
use crate::infrastructure::parsing::TyreListParser;
use crate::infrastructure::tyre_repository::TyreRepository;

pub struct SessionController<F> {
    fetcher: F,
    parser: TyreListParser,
    repository: TyreRepository,
    export_path: PathBuf,
}

impl<F: ListingFetcher> SessionController<F> {
    pub fn new(
        fetcher: F,
        parser: TyreListParser,
        repository: TyreRepository,
        export_path: impl Into<PathBuf>,
    ) -> Self {
        Self {
            fetcher,
            parser,
            repository,
            export_path: export_path.into(),
        }
    }

    /// Run the interactive loop until the user exits
    ///
    /// Returns `Ok(())` on a user-requested exit; the caller owns the
    /// store handle and releases it once after this returns.
    pub async fn run<R: BufRead, W: Write>(&self, prompt: &mut Prompt<R, W>) -> Result<()> {
        prompt.banner()?;

        loop {
            match prompt.next_attempt()? {
                Attempt::Exit => {
                    prompt.report("--Exiting.--")?;
                    info!("User requested exit");
                    return Ok(());
                }
                Attempt::Invalid(e) => {
                    prompt.report(&format!("--{e}.--"))?;
                    continue;
                }
                Attempt::Search(params) => {
                    self.run_search(&params, prompt).await?;
                }
            }
        }
    }

    /// One search attempt, start to finish
    ///
    /// Recoverable failures are reported here and end the attempt; only
    /// storage and terminal I/O errors bubble out.
    async fn run_search<R: BufRead, W: Write>(
        &self,
        params: &SearchParameters,
        prompt: &mut Prompt<R, W>,
    ) -> Result<()> {
        let url = params.search_url();

        let markup = match self.fetcher.fetch_listing_page(&url).await {
            Ok(markup) => markup,
            Err(e) => {
                warn!("Fetch failed: {}", e);
                prompt.report(&format!("--Search failed: {e}.--"))?;
                return Ok(());
            }
        };

        let listings = match self.parser.parse(&markup, &url) {
            Ok(listings) => listings,
            Err(e) => {
                warn!("Extraction failed: {}", e);
                prompt.report(&format!("--Extraction failed: {e}.--"))?;
                return Ok(());
            }
        };

        // Zero listings is a normal outcome, reported distinctly from any
        // failure; the store and export file are left untouched
        if listings.is_empty() {
            info!("No listings found for {}", url);
            prompt.report("\n--No results found.--")?;
            return Ok(());
        }

        let outcome = self.repository.insert_batch(&listings).await?;
        CsvExporter::export_all(&self.repository, &self.export_path).await?;

        info!(
            "Scrape of {} complete: {} new, {} already known",
            url, outcome.inserted, outcome.duplicates
        );

        prompt.report(&format!(
            "\n--{} listings extracted: {} new, {} already stored.--",
            listings.len(),
            outcome.inserted,
            outcome.duplicates
        ))?;
        for listing in self.repository.list_all().await? {
            prompt.report(&format_listing(&listing))?;
        }

        Ok(())
    }
}

/// One stored listing as a stable single-line report
fn format_listing(listing: &TyreListing) -> String {
    format!(
        "{} | {} {} | grip {} | fuel {} | {} | £{:.2} | {} | {}",
        listing.id.unwrap_or_default(),
        listing.brand,
        listing.pattern,
        listing.grip,
        listing.fuel_efficiency,
        listing.seasonality.as_deref().unwrap_or("-"),
        listing.price,
        listing.observed_at.to_rfc3339(),
        listing.source_url
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;
    use std::sync::Mutex;

    use async_trait::async_trait;
    use tempfile::tempdir;

    use crate::infrastructure::config::{MalformedListingPolicy, StorageConfig};
    use crate::infrastructure::database_connection::DatabaseConnection;
    use crate::infrastructure::http_client::FetchError;

    /// Canned fetcher: pops one response per fetch, recording requested URLs
    struct StubFetcher {
        responses: Mutex<Vec<Result<String, FetchError>>>,
        requested: Mutex<Vec<String>>,
    }

    impl StubFetcher {
        fn new(responses: Vec<Result<String, FetchError>>) -> Self {
            Self {
                responses: Mutex::new(responses),
                requested: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl ListingFetcher for StubFetcher {
        async fn fetch_listing_page(&self, url: &str) -> Result<String, FetchError> {
            self.requested.lock().unwrap().push(url.to_string());
            self.responses.lock().unwrap().remove(0)
        }
    }

    const LISTING_PAGE: &str = r#"
        <div class="tyreDisplay" data-grip="B" data-fuel="C" data-price="89.99"
             data-brand="Michelin" data-tyre-season="Summer">
          <a class="pattern_link">Primacy 4</a>
        </div>
    "#;

    async fn controller_in(
        dir: &tempfile::TempDir,
        fetcher: StubFetcher,
    ) -> Result<SessionController<StubFetcher>> {
        let config = StorageConfig {
            database_path: dir.path().join("test.db").display().to_string(),
            export_path: dir.path().join("test.csv").display().to_string(),
            ..Default::default()
        };
        let db = DatabaseConnection::open(&config).await?;
        db.ensure_schema().await?;
        let repository = TyreRepository::new(db.pool().clone());
        Ok(SessionController::new(
            fetcher,
            TyreListParser::new(MalformedListingPolicy::Abort)?,
            repository,
            config.export_path,
        ))
    }

    fn prompt_over(input: &str) -> Prompt<Cursor<Vec<u8>>, Vec<u8>> {
        Prompt::new(Cursor::new(input.as_bytes().to_vec()), Vec::new())
    }

    #[tokio::test]
    async fn exit_choice_ends_the_session() -> Result<()> {
        let dir = tempdir()?;
        let controller = controller_in(&dir, StubFetcher::new(vec![])).await?;
        let mut prompt = prompt_over("0\n");

        controller.run(&mut prompt).await?;
        assert!(controller.fetcher.requested.lock().unwrap().is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn successful_scrape_persists_and_exports() -> Result<()> {
        let dir = tempdir()?;
        let fetcher = StubFetcher::new(vec![Ok(LISTING_PAGE.to_string())]);
        let controller = controller_in(&dir, fetcher).await?;
        let mut prompt = prompt_over("1\n205\n55\n16\nS4 3 4JN\n0\n");

        controller.run(&mut prompt).await?;

        assert_eq!(
            controller.fetcher.requested.lock().unwrap().as_slice(),
            ["https://www.national.co.uk/tyres-search/205-55-16?pc=S434JN"]
        );
        assert_eq!(controller.repository.count().await?, 1);

        let csv = std::fs::read_to_string(dir.path().join("test.csv"))?;
        assert!(csv.contains("Michelin,Primacy 4"));
        Ok(())
    }

    #[tokio::test]
    async fn repeating_the_same_search_stores_nothing_new() -> Result<()> {
        let dir = tempdir()?;
        let fetcher = StubFetcher::new(vec![
            Ok(LISTING_PAGE.to_string()),
            Ok(LISTING_PAGE.to_string()),
        ]);
        let controller = controller_in(&dir, fetcher).await?;
        let mut prompt = prompt_over("1\n205\n55\n16\nS434JN\n1\n205\n55\n16\nS434JN\n0\n");

        controller.run(&mut prompt).await?;
        assert_eq!(controller.repository.count().await?, 1);
        Ok(())
    }

    #[tokio::test]
    async fn no_results_touches_neither_store_nor_export() -> Result<()> {
        let dir = tempdir()?;
        let fetcher = StubFetcher::new(vec![Ok("<html><body></body></html>".to_string())]);
        let controller = controller_in(&dir, fetcher).await?;
        let mut prompt = prompt_over("1\n205\n55\n16\nS434JN\n0\n");

        controller.run(&mut prompt).await?;

        assert_eq!(controller.repository.count().await?, 0);
        assert!(!dir.path().join("test.csv").exists());
        Ok(())
    }

    #[tokio::test]
    async fn fetch_failure_returns_to_the_prompt() -> Result<()> {
        let dir = tempdir()?;
        let fetcher = StubFetcher::new(vec![
            Err(FetchError::Status {
                url: "https://www.national.co.uk/tyres-search/205-55-16?pc=S434JN".to_string(),
                status: reqwest::StatusCode::SERVICE_UNAVAILABLE,
            }),
            Ok(LISTING_PAGE.to_string()),
        ]);
        let controller = controller_in(&dir, fetcher).await?;
        // Second attempt after the failure succeeds, then exit
        let mut prompt = prompt_over("1\n205\n55\n16\nS434JN\n1\n205\n55\n16\nS434JN\n0\n");

        controller.run(&mut prompt).await?;
        assert_eq!(controller.repository.count().await?, 1);
        Ok(())
    }

    #[tokio::test]
    async fn invalid_input_reprompts_without_state_change() -> Result<()> {
        let dir = tempdir()?;
        let controller = controller_in(&dir, StubFetcher::new(vec![])).await?;
        let mut prompt = prompt_over("1\nwide\n0\n");

        controller.run(&mut prompt).await?;

        assert!(controller.fetcher.requested.lock().unwrap().is_empty());
        assert_eq!(controller.repository.count().await?, 0);
        Ok(())
    }

    #[tokio::test]
    async fn strict_extraction_failure_persists_nothing() -> Result<()> {
        let dir = tempdir()?;
        let broken = r#"
            <div class="tyreDisplay" data-grip="B" data-fuel="C" data-brand="Michelin">
              <a class="pattern_link">Primacy 4</a>
            </div>
        "#;
        let fetcher = StubFetcher::new(vec![Ok(broken.to_string())]);
        let controller = controller_in(&dir, fetcher).await?;
        let mut prompt = prompt_over("1\n205\n55\n16\nS434JN\n0\n");

        controller.run(&mut prompt).await?;
        assert_eq!(controller.repository.count().await?, 0);
        Ok(())
    }
}
