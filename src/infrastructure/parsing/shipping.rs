//! Shipping phrase extraction
//!
//! Scans the text fragments of a product card for the first recognised
//! shipping phrase and, when the phrase carries a trailing date expression,
//! resolves it to a calendar date.

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

use super::shipping_date::parse_delivery_date;

/// Recognised shipping phrases, with an optional trailing date expression in group 2.
static SHIPPING_PHRASE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"((?:Free )?Deliver(?:y|ies|s)(?: from| by)?|Order within \d hours and have it|Available on|Free Shipping\s?|Unavailable for delivery\s?)(?:\s(.+))?",
    )
    .expect("shipping phrase pattern is valid")
});

/// Shipping details found on a product card
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShippingInfo {
    /// The matched phrase including any trailing date text; empty when nothing matched
    pub text: String,

    /// Resolved delivery date, when a date expression followed the phrase and parsed
    pub date: Option<NaiveDate>,
}

impl ShippingInfo {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

/// Finds shipping phrases in product card text
#[derive(Debug, Clone, Copy, Default)]
pub struct ShippingExtractor;

impl ShippingExtractor {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Extract shipping details from text fragments in document order.
    ///
    /// The first fragment containing a recognised phrase wins. A date
    /// expression that cannot be parsed leaves the text in place and the date
    /// empty.
    pub fn extract<I, S>(&self, fragments: I, run_date: NaiveDate) -> ShippingInfo
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for fragment in fragments {
            let fragment = fragment.as_ref();
            let Some(captures) = SHIPPING_PHRASE.captures(fragment) else {
                continue;
            };

            let text = captures[0].trim().to_string();
            let date = captures.get(2).and_then(|expression| {
                match parse_delivery_date(expression.as_str(), run_date) {
                    Ok(date) => Some(date),
                    Err(e) => {
                        debug!("Ignoring delivery date in '{}': {}", text, e);
                        None
                    }
                }
            });

            return ShippingInfo { text, date };
        }

        ShippingInfo::default()
    }
}
