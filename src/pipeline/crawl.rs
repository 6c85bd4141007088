// src/pipeline/crawl.rs

//! Branch crawling pipeline.

use std::path::Path;
use std::sync::Arc;

use chrono::Utc;

use crate::error::Result;
use crate::models::Config;
use crate::services::{BranchCrawler, Geocoder};

/// Run the branch crawler and write the collected records as pretty JSON
/// to `output`, or to standard output when no path is given.
pub async fn run_crawler(
    config: Arc<Config>,
    client: reqwest::Client,
    geocoder: Arc<dyn Geocoder>,
    output: Option<&Path>,
) -> Result<()> {
    let start_time = Utc::now();
    log::info!("Crawling {} ...", config.site.start_url);

    let crawler = BranchCrawler::new(Arc::clone(&config), client, geocoder)?;
    let outcome = crawler.run().await?;

    let end_time = Utc::now();
    log::info!(
        "Crawl finished in {}s: {} pages fetched, {} failures",
        (end_time - start_time).num_seconds(),
        outcome.pages_fetched,
        outcome.fetch_failures
    );
    log::info!(
        "Collected {} branches, {} staff rosters attached, {} dropped",
        outcome.branches.len(),
        outcome.staff_attached,
        outcome.staff_dropped
    );

    let json = serde_json::to_string_pretty(&outcome.branches)?;
    match output {
        Some(path) => {
            std::fs::write(path, &json)?;
            log::info!("Branches written to {}", path.display());
        }
        None => println!("{json}"),
    }

    Ok(())
}
