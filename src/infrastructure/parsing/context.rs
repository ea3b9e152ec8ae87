//! Parsing context for listing page extraction

use chrono::NaiveDate;
use url::Url;

/// Context information for parsing one listing page
#[derive(Debug, Clone)]
pub struct ParseContext {
    /// 1-based page index being parsed
    pub page_id: u32,

    /// URL the page was fetched from; relative links resolve against it
    pub page_url: Url,

    /// Date relative delivery expressions ("tomorrow") resolve against
    pub run_date: NaiveDate,
}

impl ParseContext {
    #[must_use]
    pub const fn new(page_id: u32, page_url: Url, run_date: NaiveDate) -> Self {
        Self {
            page_id,
            page_url,
            run_date,
        }
    }
}
