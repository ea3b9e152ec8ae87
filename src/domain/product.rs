//! Smartphone product records
//!
//! A listing card is parsed once into a [`ProductListing`]; each colour variant
//! then becomes its own [`ProductRecord`], which is what gets written out.

use chrono::NaiveDate;
use serde::{Serialize, Serializer};

use super::byte_size::ByteSize;
use super::money::MoneyAmount;

/// Prefix that marks a product as purchasable, e.g. `In Stock (3 left)`
pub const IN_STOCK_PREFIX: &str = "In Stock";

/// Colour-independent fields of one product card.
///
/// Every colour variant of the card shares these values.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ProductListing {
    pub title: String,
    pub price: MoneyAmount,
    pub image_url: String,
    pub capacity: ByteSize,
    pub availability_text: String,
    pub shipping_text: String,
    pub shipping_date: Option<NaiveDate>,
}

impl ProductListing {
    /// One record for the given colour variant of this listing
    #[must_use]
    pub fn variant(&self, colour: &str) -> ProductRecord {
        ProductRecord {
            title: self.title.clone(),
            price: self.price,
            image_url: self.image_url.clone(),
            capacity: self.capacity,
            colour: colour.to_lowercase(),
            is_available: is_in_stock(&self.availability_text),
            availability_text: self.availability_text.clone(),
            shipping_text: self.shipping_text.clone(),
            shipping_date: self.shipping_date,
        }
    }
}

/// `true` when the availability text starts with [`IN_STOCK_PREFIX`]
#[must_use]
pub fn is_in_stock(availability_text: &str) -> bool {
    availability_text.starts_with(IN_STOCK_PREFIX)
}

/// A single purchasable product variant.
///
/// Immutable once built. Equality and hashing are structural over every field,
/// which is what the [`ProductSet`](super::product_set::ProductSet) deduplicates on.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ProductRecord {
    title: String,
    price: MoneyAmount,
    image_url: String,
    capacity: ByteSize,
    colour: String,
    availability_text: String,
    is_available: bool,
    shipping_text: String,
    shipping_date: Option<NaiveDate>,
}

impl ProductRecord {
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub const fn price(&self) -> &MoneyAmount {
        &self.price
    }

    #[must_use]
    pub fn image_url(&self) -> &str {
        &self.image_url
    }

    #[must_use]
    pub const fn capacity(&self) -> &ByteSize {
        &self.capacity
    }

    #[must_use]
    pub fn colour(&self) -> &str {
        &self.colour
    }

    #[must_use]
    pub fn availability_text(&self) -> &str {
        &self.availability_text
    }

    #[must_use]
    pub const fn is_available(&self) -> bool {
        self.is_available
    }

    #[must_use]
    pub fn shipping_text(&self) -> &str {
        &self.shipping_text
    }

    #[must_use]
    pub const fn shipping_date(&self) -> Option<NaiveDate> {
        self.shipping_date
    }
}

/// Wire shape of `output.json` entries.
///
/// `shippingText` and `shippingDate` are omitted entirely when empty.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ProductRecordJson<'a> {
    title: &'a str,
    price: f64,
    image_url: &'a str,
    #[serde(rename = "capacityMB", serialize_with = "serialize_whole_as_integer")]
    capacity_mb: f64,
    colour: &'a str,
    availability_text: &'a str,
    is_available: bool,
    #[serde(skip_serializing_if = "str::is_empty")]
    shipping_text: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    shipping_date: Option<NaiveDate>,
}

impl Serialize for ProductRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        ProductRecordJson {
            title: &self.title,
            price: self.price.major_value(),
            image_url: &self.image_url,
            capacity_mb: self.capacity.megabytes(),
            colour: &self.colour,
            availability_text: &self.availability_text,
            is_available: self.is_available,
            shipping_text: &self.shipping_text,
            shipping_date: self.shipping_date,
        }
        .serialize(serializer)
    }
}

/// Whole megabyte counts are written as integers (`64000`, not `64000.0`).
#[allow(clippy::trivially_copy_pass_by_ref, clippy::cast_possible_truncation)]
fn serialize_whole_as_integer<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    const MAX_EXACT_INTEGER: f64 = 9_007_199_254_740_992.0;

    if value.fract() == 0.0 && value.abs() <= MAX_EXACT_INTEGER {
        serializer.serialize_i64(*value as i64)
    } else {
        serializer.serialize_f64(*value)
    }
}
