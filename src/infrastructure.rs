//! Infrastructure layer for fetching, parsing, output and process setup
//!
//! HTML parsing, the HTTP fetcher, the output sink, configuration loading and
//! logging initialization.

pub mod config;
pub mod http_client;
pub mod logging;
pub mod output;
pub mod parsing;
pub mod parsing_error;

// Re-export commonly used items
pub use config::{AppConfig, ConfigError, ConfigManager, FailurePolicy, PipelineConfig};
pub use http_client::{DocumentFetcher, FetchError, FetchedPage, HttpClient, HttpClientConfig};
pub use logging::{init_logging, init_logging_with_config};
pub use output::{FileOutputSink, OutputSink, WriteError};
pub use parsing::{ListingSelectors, ParsingError, ParsingResult, ProductListParser};
