mod cli;

use std::io::Write;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{error, info};

use smartphone_scraper_lib::application::{ListingPipeline, ScrapeError};
use smartphone_scraper_lib::infrastructure::{ConfigManager, FileOutputSink, HttpClient, init_logging_with_config};

use crate::cli::Cli;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = ConfigManager::load(cli.config.as_deref()).context("Failed to load configuration")?;
    cli.apply(&mut config);
    config.validate().context("Invalid configuration")?;

    init_logging_with_config(config.logging.clone())?;
    info!("smartphone-scraper {}", env!("CARGO_PKG_VERSION"));

    let fetcher = HttpClient::new(config.http.clone())?;
    let pipeline = ListingPipeline::new(config.pipeline.clone(), &config.selectors, fetcher, FileOutputSink)
        .inspect_err(log_failure)?;

    if cli.dry_run {
        let products = pipeline.collect().await.inspect_err(log_failure)?;
        let json = if config.pipeline.pretty_output {
            products.to_json_pretty()?
        } else {
            products.to_json()?
        };
        let mut stdout = std::io::stdout().lock();
        stdout.write_all(&json)?;
        writeln!(stdout)?;
        info!("Dry run: {} records collected, nothing written", products.len());
        return Ok(());
    }

    let summary = pipeline.run().await.inspect_err(log_failure)?;
    info!(
        "Done: {} records in {}",
        summary.records_written,
        summary.output_path.display()
    );

    Ok(())
}

fn log_failure(e: &ScrapeError) {
    error!("Scrape failed during {} stage: {}", e.stage(), e);
}
