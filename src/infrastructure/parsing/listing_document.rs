//! Parsed listing page and element helpers
//!
//! `ListingDocument` pairs a parsed HTML tree with the URL it came from. The
//! free functions below are the element-level capabilities the product list
//! parser builds on: CSS selection, own-text search, text with defaults,
//! attribute reads and relative URL resolution.

use chrono::NaiveDate;
use scraper::{ElementRef, Html, Selector};
use url::Url;

use super::{ParseContext, ParsingError, ParsingResult};
use crate::infrastructure::http_client::FetchedPage;

/// A fetched listing page, parsed
pub struct ListingDocument {
    html: Html,
    url: Url,
}

impl ListingDocument {
    /// Parse the body of a fetched page
    #[must_use]
    pub fn parse(page: &FetchedPage) -> Self {
        Self::from_html(&page.body, page.url.clone())
    }

    #[must_use]
    pub fn from_html(body: &str, url: Url) -> Self {
        Self {
            html: Html::parse_document(body),
            url,
        }
    }

    #[must_use]
    pub const fn html(&self) -> &Html {
        &self.html
    }

    #[must_use]
    pub const fn url(&self) -> &Url {
        &self.url
    }

    /// Number of elements matching `selector` anywhere in the page
    #[must_use]
    pub fn count(&self, selector: &Selector) -> usize {
        self.html.select(selector).count()
    }

    /// Context for extracting page `page_id` of this document
    #[must_use]
    pub fn context(&self, page_id: u32, run_date: NaiveDate) -> ParseContext {
        ParseContext::new(page_id, self.url.clone(), run_date)
    }
}

/// Compile a CSS selector, naming the table entry in the error
pub fn compile_selector(name: &str, selector: &str) -> ParsingResult<Selector> {
    Selector::parse(selector).map_err(|e| ParsingError::invalid_selector(name, selector, &e.to_string()))
}

/// Collapse runs of whitespace into single spaces and trim the ends
#[must_use]
pub fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Text of the first element under `scope` matching `selector`, if it has any
#[must_use]
pub fn select_text(scope: &ElementRef<'_>, selector: &Selector) -> Option<String> {
    scope
        .select(selector)
        .next()
        .map(|element| normalize_whitespace(&element.text().collect::<String>()))
        .filter(|text| !text.is_empty())
}

/// Like [`select_text`], falling back to `default` when nothing matches
#[must_use]
pub fn select_text_or(scope: &ElementRef<'_>, selector: &Selector, default: &str) -> String {
    select_text(scope, selector).unwrap_or_else(|| default.to_string())
}

/// Attribute value of the first element under `scope` matching `selector`
#[must_use]
pub fn select_attr<'a>(scope: &ElementRef<'a>, selector: &Selector, attribute: &str) -> Option<&'a str> {
    scope
        .select(selector)
        .next()
        .and_then(|element| element.value().attr(attribute))
}

/// Text directly owned by `element`, excluding text of its child elements
#[must_use]
pub fn own_text(element: &ElementRef<'_>) -> String {
    let text: String = element
        .children()
        .filter_map(|child| child.value().as_text().map(|text| &**text))
        .collect();
    normalize_whitespace(&text)
}

/// Descendants of `scope` (itself included) whose own text contains `needle`,
/// in document order
pub fn elements_with_own_text<'a>(
    scope: &ElementRef<'a>,
    needle: &'a str,
) -> impl Iterator<Item = ElementRef<'a>> + 'a {
    scope
        .descendants()
        .filter_map(ElementRef::wrap)
        .filter(move |element| own_text(element).contains(needle))
}

/// Full text of every element under `scope` (itself included) that carries
/// text of its own, whitespace-collapsed and in document order.
///
/// Inline children stay attached to their parent's text, so
/// `Delivery by <b>Saturday</b>` yields `"Delivery by Saturday"` followed by
/// `"Saturday"`.
#[must_use]
pub fn text_fragments(scope: &ElementRef<'_>) -> Vec<String> {
    scope
        .descendants()
        .filter_map(ElementRef::wrap)
        .filter(|element| !own_text(element).is_empty())
        .map(|element| normalize_whitespace(&element.text().collect::<String>()))
        .collect()
}

/// Resolve `href` against `base`
pub fn resolve_url(href: &str, base: &Url) -> ParsingResult<Url> {
    base.join(href.trim()).map_err(|e| ParsingError::UrlResolutionFailed {
        url: href.to_string(),
        reason: e.to_string(),
        base_url: Some(base.to_string()),
    })
}
