//! HTML parsing for smartphone listing pages
//!
//! Trait-based parsing: a parser compiles its selector table once and is then
//! applied to each fetched page with a [`ParseContext`].

pub mod config;
pub mod context;
pub mod listing_document;
pub mod product_list_parser;
pub mod shipping;
pub mod shipping_date;

// Re-export public types
pub use crate::infrastructure::parsing_error::{ParsingError, ParsingResult};
pub use config::ListingSelectors;
pub use context::ParseContext;
pub use listing_document::ListingDocument;
pub use product_list_parser::{PageExtraction, ProductFailure, ProductListParser};
pub use shipping::{ShippingExtractor, ShippingInfo};
pub use shipping_date::{DateParseError, parse_delivery_date};

use scraper::Html;

/// Parser trait with context support
pub trait ContextualParser {
    type Output;
    type Context;

    /// Parse HTML with contextual information
    fn parse_with_context(&self, html: &Html, context: &Self::Context) -> ParsingResult<Self::Output>;
}
