//! Listing pipeline: fetch every listing page, build records, write JSON
//!
//! Pages are fetched one at a time. The first page is fetched for its
//! pagination links, then pages `1..=count` are fetched as
//! `{base_url}/?page={n}`. Records are deduplicated by structural equality
//! and written once at the end.

use std::path::PathBuf;

use chrono::{Local, NaiveDate};
use tracing::{debug, error, info, warn};
use url::Url;

use crate::application::error::ScrapeError;
use crate::domain::ProductSet;
use crate::infrastructure::config::{FailurePolicy, PipelineConfig};
use crate::infrastructure::http_client::{DocumentFetcher, FetchedPage, parse_url};
use crate::infrastructure::output::OutputSink;
use crate::infrastructure::parsing::{
    ListingDocument, ListingSelectors, PageExtraction, ProductFailure, ProductListParser,
};

/// Outcome of a completed run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub pages_processed: u32,
    pub records_written: usize,
    pub duplicates_skipped: usize,
    pub products_failed: usize,
    pub output_path: PathBuf,
}

#[derive(Debug, Default)]
struct CollectStats {
    pages_processed: u32,
    duplicates_skipped: usize,
    products_failed: usize,
}

pub struct ListingPipeline<F, S> {
    fetcher: F,
    sink: S,
    parser: ProductListParser,
    config: PipelineConfig,
    base_url: Url,
    run_date: NaiveDate,
}

impl<F: DocumentFetcher, S: OutputSink> ListingPipeline<F, S> {
    /// Build a pipeline; relative delivery dates resolve against today's local date
    pub fn new(
        config: PipelineConfig,
        selectors: &ListingSelectors,
        fetcher: F,
        sink: S,
    ) -> Result<Self, ScrapeError> {
        let parser = ProductListParser::with_config(selectors).map_err(|e| ScrapeError::configuration(e.to_string()))?;
        let base_url = Url::parse(&config.base_url)
            .map_err(|e| ScrapeError::configuration(format!("Invalid base URL '{}': {}", config.base_url, e)))?;

        Ok(Self {
            fetcher,
            sink,
            parser,
            config,
            base_url,
            run_date: Local::now().date_naive(),
        })
    }

    #[must_use]
    pub fn with_run_date(mut self, run_date: NaiveDate) -> Self {
        self.run_date = run_date;
        self
    }

    pub const fn fetcher(&self) -> &F {
        &self.fetcher
    }

    pub const fn sink(&self) -> &S {
        &self.sink
    }

    /// URL of listing page `page` (1-based)
    pub fn page_url(&self, page: u32) -> Result<Url, ScrapeError> {
        let url = format!("{}/?page={}", self.config.base_url.trim_end_matches('/'), page);
        Ok(parse_url(&url)?)
    }

    /// Fetch and extract every page, without writing anything
    pub async fn collect(&self) -> Result<ProductSet, ScrapeError> {
        let (products, _) = self.collect_with_stats().await?;
        Ok(products)
    }

    /// Collect every page and write the JSON array to the configured output path
    pub async fn run(&self) -> Result<RunSummary, ScrapeError> {
        info!("Starting listing scrape from {}", self.base_url);

        let (products, stats) = self.collect_with_stats().await?;

        let bytes = if self.config.pretty_output {
            products.to_json_pretty()?
        } else {
            products.to_json()?
        };
        self.sink.write(&self.config.output_path, &bytes).await?;

        let summary = RunSummary {
            pages_processed: stats.pages_processed,
            records_written: products.len(),
            duplicates_skipped: stats.duplicates_skipped,
            products_failed: stats.products_failed,
            output_path: self.config.output_path.clone(),
        };

        info!(
            "Wrote {} records from {} pages to {} ({} duplicates, {} failed products)",
            summary.records_written,
            summary.pages_processed,
            summary.output_path.display(),
            summary.duplicates_skipped,
            summary.products_failed
        );

        Ok(summary)
    }

    async fn collect_with_stats(&self) -> Result<(ProductSet, CollectStats), ScrapeError> {
        let first_page = self.fetcher.fetch(&self.base_url).await?;
        let page_count = self.count_pages(&first_page);

        let mut products = ProductSet::new();
        let mut stats = CollectStats::default();

        if page_count == 0 {
            warn!("No pagination links found at {}; nothing to scrape", self.base_url);
            return Ok((products, stats));
        }

        info!("Found {} listing pages", page_count);

        for page_id in 1..=page_count {
            let url = self.page_url(page_id)?;
            debug!("Fetching page {} of {}: {}", page_id, page_count, url);

            let page = self.fetcher.fetch(&url).await?;
            let extraction = self.extract_page(&page, page_id);

            for failure in extraction.failures {
                self.handle_failure(page_id, failure, &mut stats)?;
            }

            for record in extraction.records {
                if !products.insert(record) {
                    stats.duplicates_skipped += 1;
                    debug!("Skipping duplicate record on page {}", page_id);
                }
            }

            stats.pages_processed += 1;
        }

        Ok((products, stats))
    }

    fn count_pages(&self, page: &FetchedPage) -> u32 {
        let document = ListingDocument::parse(page);
        u32::try_from(self.parser.page_count(document.html())).unwrap_or(u32::MAX)
    }

    fn extract_page(&self, page: &FetchedPage, page_id: u32) -> PageExtraction {
        let document = ListingDocument::parse(page);
        let context = document.context(page_id, self.run_date);
        self.parser.parse_page(document.html(), &context)
    }

    fn handle_failure(
        &self,
        page_id: u32,
        failure: ProductFailure,
        stats: &mut CollectStats,
    ) -> Result<(), ScrapeError> {
        match self.config.failure_policy {
            FailurePolicy::Skip => {
                warn!(
                    "Skipping product {} on page {} ('{}'): {}",
                    failure.index, page_id, failure.title, failure.error
                );
                stats.products_failed += 1;
                Ok(())
            }
            FailurePolicy::Abort => {
                error!(
                    "Aborting on product {} on page {} ('{}'): {}",
                    failure.index, page_id, failure.title, failure.error
                );
                Err(ScrapeError::Extraction {
                    page: page_id,
                    index: failure.index,
                    title: failure.title,
                    source: failure.error,
                })
            }
        }
    }
}
