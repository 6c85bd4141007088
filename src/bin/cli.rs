//! branchmap CLI
//!
//! Crawls a branch-locator site into geocoded branch and staff records.

use std::path::PathBuf;
use std::sync::Arc;

use branchmap::{
    error::{AppError, Result},
    models::Config,
    pipeline,
    services::GoogleGeocoder,
    utils::http,
};
use clap::{Parser, Subcommand};

/// branchmap - Branch Locator Crawler
#[derive(Parser, Debug)]
#[command(name = "branchmap", version, about = "Branch locator crawler")]
struct Cli {
    /// Path to the configuration file
    #[arg(short, long, default_value = "branchmap.toml")]
    config: PathBuf,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Crawl the branch locator and emit the collected records
    Crawl {
        /// Write the branch JSON to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Validate the configuration file
    Validate,
}

/// Initialize logging based on verbosity flag.
fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_secs()
        .init();
}

/// Main entry point for the CLI application.
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = Config::load_or_default(&cli.config);
    config.validate()?;

    match cli.command {
        Command::Crawl { output } => {
            // Fail before any crawling if the geocoding credential is absent
            let key_env = &config.geocoder.api_key_env;
            let api_key = std::env::var(key_env).map_err(|_| {
                AppError::config(format!("Environment variable {key_env} is not set"))
            })?;

            let client = http::create_client(&config.crawler)?;
            let geocoder = GoogleGeocoder::new(client.clone(), &config.geocoder, api_key);

            let config = Arc::new(config);
            pipeline::run_crawler(config, client, Arc::new(geocoder), output.as_deref()).await?;

            log::info!("Done!");
        }

        Command::Validate => {
            log::info!("Validating configuration...");
            // validate() above already passed; report what was checked
            log::info!("✓ Config OK (crawler, site selectors, and geocoder settings)");
        }
    }

    Ok(())
}
