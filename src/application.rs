//! Application layer module
//!
//! Orchestrates fetching, extraction and output for one scraping run.

pub mod error;
pub mod listing_pipeline;

pub use error::ScrapeError;
pub use listing_pipeline::{ListingPipeline, RunSummary};
