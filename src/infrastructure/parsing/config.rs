//! Selector table for listing page extraction
//!
//! Every selector and text marker the parser relies on lives here, so markup
//! drift on the site is a configuration change rather than a code change.

use serde::{Deserialize, Serialize};

use crate::infrastructure::config::defaults;

/// CSS selectors and text markers for listing pages
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ListingSelectors {
    /// One element per product card
    pub product_container: String,

    /// Colour variant elements inside a product card
    pub variant: String,

    /// Attribute on the variant element carrying the colour name
    pub colour_attribute: String,

    /// Product title inside a card
    pub title: String,

    /// Capacity text (e.g. "64GB") inside a card
    pub capacity: String,

    /// Product image inside a card; its `src` is resolved against the page URL
    pub image: String,

    /// Pagination links on the first page; their count is the page count
    pub pagination: String,

    /// Text that identifies the price element (matched against an element's own text)
    pub price_marker: String,

    /// Text that identifies the availability element and prefixes its value
    pub availability_marker: String,
}

impl Default for ListingSelectors {
    fn default() -> Self {
        Self {
            product_container: defaults::PRODUCT_CONTAINER_SELECTOR.to_string(),
            variant: defaults::VARIANT_SELECTOR.to_string(),
            colour_attribute: defaults::COLOUR_ATTRIBUTE.to_string(),
            title: defaults::TITLE_SELECTOR.to_string(),
            capacity: defaults::CAPACITY_SELECTOR.to_string(),
            image: defaults::IMAGE_SELECTOR.to_string(),
            pagination: defaults::PAGINATION_SELECTOR.to_string(),
            price_marker: defaults::PRICE_MARKER.to_string(),
            availability_marker: defaults::AVAILABILITY_MARKER.to_string(),
        }
    }
}
