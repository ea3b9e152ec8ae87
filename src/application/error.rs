//! Run-level errors for the listing pipeline

use thiserror::Error;

use crate::infrastructure::http_client::FetchError;
use crate::infrastructure::output::WriteError;
use crate::infrastructure::parsing::ParsingError;

#[derive(Error, Debug)]
pub enum ScrapeError {
    #[error("Failed to fetch listing page: {0}")]
    Fetch(#[from] FetchError),

    #[error("Failed to write output: {0}")]
    Write(#[from] WriteError),

    #[error("Failed to serialize products: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Product {index} on page {page} ('{title}') could not be built: {source}")]
    Extraction {
        page: u32,
        index: usize,
        title: String,
        #[source]
        source: ParsingError,
    },

    #[error("Invalid configuration: {message}")]
    Configuration { message: String },
}

impl ScrapeError {
    /// Pipeline stage the error came from, for logs
    #[must_use]
    pub const fn stage(&self) -> &'static str {
        match self {
            Self::Fetch(_) => "fetch",
            Self::Write(_) => "write",
            Self::Serialization(_) => "serialize",
            Self::Extraction { .. } => "extract",
            Self::Configuration { .. } => "configure",
        }
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }
}
