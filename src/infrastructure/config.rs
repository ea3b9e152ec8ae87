//! Configuration infrastructure
//!
//! Settings are layered: built-in defaults, then an optional config file
//! (format chosen by extension), then `SCRAPER_`-prefixed environment
//! variables using `__` between nested keys, e.g.
//! `SCRAPER_PIPELINE__BASE_URL` or `SCRAPER_HTTP__MAX_REQUESTS_PER_SECOND`.
//! Command line flags are applied on top by the binary.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

use crate::infrastructure::http_client::HttpClientConfig;
use crate::infrastructure::parsing::{ListingSelectors, ProductListParser};

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to load config: {source}")]
    Load {
        #[from]
        source: config::ConfigError,
    },

    #[error("Configuration validation failed: {message}")]
    Validation { message: String },
}

impl ConfigError {
    fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }
}

/// Complete application configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub pipeline: PipelineConfig,
    pub http: HttpClientConfig,
    pub selectors: ListingSelectors,
    pub logging: LoggingConfig,
}

/// What the pipeline does with a product card that cannot be built
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FailurePolicy {
    /// Log the product, count it, and keep going
    #[default]
    Skip,
    /// Stop the run at the first failed product
    Abort,
}

/// Listing pipeline settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// First listing page; further pages are `{base_url}/?page={n}`
    pub base_url: String,

    pub output_path: PathBuf,

    pub failure_policy: FailurePolicy,

    /// Pretty-print the output JSON
    pub pretty_output: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            base_url: defaults::BASE_URL.to_string(),
            output_path: PathBuf::from(defaults::OUTPUT_PATH),
            failure_policy: FailurePolicy::default(),
            pretty_output: false,
        }
    }
}

/// Logging configuration settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level: "error", "warn", "info", "debug", "trace"
    pub level: String,

    /// Enable JSON formatted logs
    pub json_format: bool,

    /// Enable console output (stderr, so `--dry-run` output stays clean)
    pub console_output: bool,

    /// Enable file output
    pub file_output: bool,

    /// Directory for the log file
    pub log_directory: PathBuf,

    pub file_name: String,

    /// Module-specific log level filters (e.g., "reqwest": "info")
    pub module_filters: HashMap<String, String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: defaults::LOG_LEVEL.to_string(),
            json_format: false,
            console_output: true,
            file_output: false,
            log_directory: PathBuf::from(defaults::LOG_DIRECTORY),
            file_name: defaults::LOG_FILE_NAME.to_string(),
            module_filters: HashMap::new(),
        }
    }
}

const LOG_LEVELS: [&str; 5] = ["error", "warn", "info", "debug", "trace"];

impl AppConfig {
    /// Check values that would otherwise fail later, mid-run
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.http.max_requests_per_second == 0 {
            return Err(ConfigError::validation("http.max_requests_per_second must be greater than 0"));
        }

        if self.http.timeout_seconds == 0 {
            return Err(ConfigError::validation("http.timeout_seconds must be greater than 0"));
        }

        url::Url::parse(&self.pipeline.base_url).map_err(|e| {
            ConfigError::validation(format!("pipeline.base_url '{}' is not a valid URL: {}", self.pipeline.base_url, e))
        })?;

        if self.pipeline.output_path.as_os_str().is_empty() {
            return Err(ConfigError::validation("pipeline.output_path must not be empty"));
        }

        if !LOG_LEVELS.contains(&self.logging.level.to_lowercase().as_str()) {
            return Err(ConfigError::validation(format!(
                "logging.level '{}' must be one of {}",
                self.logging.level,
                LOG_LEVELS.join(", ")
            )));
        }

        ProductListParser::with_config(&self.selectors).map_err(|e| ConfigError::validation(e.to_string()))?;

        Ok(())
    }
}

/// Loads [`AppConfig`] from defaults, an optional file and the environment
pub struct ConfigManager;

impl ConfigManager {
    /// Load configuration using the process environment
    pub fn load(path: Option<&Path>) -> Result<AppConfig, ConfigError> {
        Self::load_with_env(path, None)
    }

    /// Load configuration, reading environment variables from `env` instead of
    /// the process environment when given
    pub fn load_with_env(
        path: Option<&Path>,
        env: Option<HashMap<String, String>>,
    ) -> Result<AppConfig, ConfigError> {
        let mut builder = config::Config::builder().add_source(config::Config::try_from(&AppConfig::default())?);

        if let Some(path) = path {
            info!("Loading configuration from {}", path.display());
            builder = builder.add_source(config::File::from(path));
        }

        let settings = builder
            .add_source(
                config::Environment::with_prefix(defaults::ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true)
                    .source(env),
            )
            .build()?;

        let config: AppConfig = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }
}

/// Default configuration values
pub mod defaults {
    /// First page of the smartphone listing
    pub const BASE_URL: &str = "https://www.magpiehq.com/developer-challenge/smartphones";

    pub const OUTPUT_PATH: &str = "output.json";

    pub const USER_AGENT: &str = concat!("smartphone-scraper/", env!("CARGO_PKG_VERSION"));

    /// Default request timeout in seconds
    pub const REQUEST_TIMEOUT_SECONDS: u64 = 30;

    pub const MAX_REQUESTS_PER_SECOND: u32 = 2;

    /// Prefix for environment variable overrides
    pub const ENV_PREFIX: &str = "SCRAPER";

    pub const LOG_LEVEL: &str = "info";
    pub const LOG_DIRECTORY: &str = "logs";
    pub const LOG_FILE_NAME: &str = "smartphone-scraper.log";

    // Listing page markup
    pub const PRODUCT_CONTAINER_SELECTOR: &str = "#products .product";
    pub const VARIANT_SELECTOR: &str = "[data-colour]";
    pub const COLOUR_ATTRIBUTE: &str = "data-colour";
    pub const TITLE_SELECTOR: &str = ".product-name";
    pub const CAPACITY_SELECTOR: &str = ".product-capacity";
    pub const IMAGE_SELECTOR: &str = "img";
    pub const PAGINATION_SELECTOR: &str = "#pages a";
    pub const PRICE_MARKER: &str = "£";
    pub const AVAILABILITY_MARKER: &str = "Availability:";
}
