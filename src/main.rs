use std::io::BufReader;

use anyhow::Result;
use tracing::info;

use tyre_scout::application::{Prompt, SessionController};
use tyre_scout::infrastructure::{
    config::AppConfig, database_connection::DatabaseConnection, http_client::HttpClient,
    logging::init_logging, parsing::TyreListParser, tyre_repository::TyreRepository,
};

#[tokio::main]
async fn main() -> Result<()> {
    let config = AppConfig::load().await?;
    init_logging(&config.logging)?;

    let db = DatabaseConnection::open(&config.storage).await?;
    db.ensure_schema().await?;

    let controller = SessionController::new(
        HttpClient::new(&config.scraping)?,
        TyreListParser::new(config.scraping.malformed_listing_policy)?,
        TyreRepository::new(db.pool().clone()),
        config.storage.export_path.clone(),
    );

    let mut prompt = Prompt::new(BufReader::new(std::io::stdin()), std::io::stdout());
    let result = controller.run(&mut prompt).await;

    // Single exit point: the store handle is released here on every path,
    // whether the loop ended by user choice or by a fatal storage error
    db.close().await;
    info!("Database closed, shutting down");

    result
}
