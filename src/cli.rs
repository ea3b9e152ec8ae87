use std::path::PathBuf;

use clap::Parser;

use smartphone_scraper_lib::infrastructure::{AppConfig, FailurePolicy};

/// Scrape every page of a smartphone listing into a JSON file
#[derive(Parser, Debug)]
#[command(name = "smartphone-scraper", version)]
#[command(about = "Scrapes smartphone listings into output.json", long_about = None)]
pub struct Cli {
    /// Configuration file (TOML, JSON or YAML)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// First listing page URL
    #[arg(long)]
    pub base_url: Option<String>,

    /// Where to write the JSON array
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Stop at the first product that cannot be built
    #[arg(long)]
    pub fail_fast: bool,

    /// Pretty-print the JSON
    #[arg(long)]
    pub pretty: bool,

    /// Print the JSON to stdout instead of writing the output file
    #[arg(long)]
    pub dry_run: bool,

    /// Log level: error, warn, info, debug or trace
    #[arg(long)]
    pub log_level: Option<String>,
}

impl Cli {
    /// Apply command line overrides on top of the loaded configuration
    pub fn apply(&self, config: &mut AppConfig) {
        if let Some(base_url) = &self.base_url {
            config.pipeline.base_url.clone_from(base_url);
        }
        if let Some(output) = &self.output {
            config.pipeline.output_path.clone_from(output);
        }
        if self.fail_fast {
            config.pipeline.failure_policy = FailurePolicy::Abort;
        }
        if self.pretty {
            config.pipeline.pretty_output = true;
        }
        if let Some(level) = &self.log_level {
            config.logging.level.clone_from(level);
        }
    }
}
