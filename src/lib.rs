//! Smartphone Scraper - listing page scraping library
//!
//! Fetches every page of a smartphone listing site, turns each product card
//! into typed records (one per colour variant), deduplicates them and writes a
//! JSON array.

pub mod application;
pub mod domain;
pub mod infrastructure;
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use application::{ListingPipeline, RunSummary, ScrapeError};
pub use domain::{ProductRecord, ProductSet};
