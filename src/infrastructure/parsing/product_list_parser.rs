//! Product list parser for smartphone listing pages
//!
//! Turns each product card into one [`ProductListing`] and expands it into one
//! [`ProductRecord`] per colour variant. A card that cannot be built is
//! reported as a [`ProductFailure`] next to the successful records; whether
//! that skips the product or ends the run is the pipeline's decision.

use scraper::{ElementRef, Html, Selector};
use tracing::debug;

use super::config::ListingSelectors;
use super::listing_document::{
    compile_selector, elements_with_own_text, normalize_whitespace, resolve_url, select_attr, select_text_or,
    text_fragments,
};
use super::shipping::ShippingExtractor;
use super::{ContextualParser, ParseContext, ParsingError, ParsingResult};
use crate::domain::{ByteSize, MoneyAmount, ProductListing, ProductRecord};

pub const MISSING_TITLE: &str = "No title found";
pub const MISSING_CAPACITY: &str = "No capacity found";
pub const MISSING_PRICE: &str = "No price found";

/// Records extracted from one page, plus the cards that could not be built
#[derive(Debug, Default)]
pub struct PageExtraction {
    pub records: Vec<ProductRecord>,
    pub failures: Vec<ProductFailure>,
}

/// A product card that failed to build
#[derive(Debug)]
pub struct ProductFailure {
    /// 0-based position of the card on its page
    pub index: usize,

    /// Best-effort title of the card, for logs
    pub title: String,

    pub error: ParsingError,
}

/// Parser for extracting product records from listing pages
pub struct ProductListParser {
    product_container: Selector,
    variant: Selector,
    colour_attribute: String,
    title: Selector,
    capacity: Selector,
    image: Selector,
    pagination: Selector,
    price_marker: String,
    availability_marker: String,
    shipping: ShippingExtractor,
}

impl ProductListParser {
    /// Create a new product list parser with default selectors
    pub fn new() -> ParsingResult<Self> {
        Self::with_config(&ListingSelectors::default())
    }

    /// Create parser with custom selector configuration
    pub fn with_config(selectors: &ListingSelectors) -> ParsingResult<Self> {
        Ok(Self {
            product_container: compile_selector("product_container", &selectors.product_container)?,
            variant: compile_selector("variant", &selectors.variant)?,
            colour_attribute: selectors.colour_attribute.clone(),
            title: compile_selector("title", &selectors.title)?,
            capacity: compile_selector("capacity", &selectors.capacity)?,
            image: compile_selector("image", &selectors.image)?,
            pagination: compile_selector("pagination", &selectors.pagination)?,
            price_marker: selectors.price_marker.clone(),
            availability_marker: selectors.availability_marker.clone(),
            shipping: ShippingExtractor::new(),
        })
    }

    /// Number of listing pages, taken from the pagination links on a page
    #[must_use]
    pub fn page_count(&self, html: &Html) -> usize {
        html.select(&self.pagination).count()
    }

    /// Build the colour-independent fields of one product card
    pub fn parse_listing(&self, card: &ElementRef<'_>, context: &ParseContext) -> ParsingResult<ProductListing> {
        let title = select_text_or(card, &self.title, MISSING_TITLE);

        let price_text = elements_with_own_text(card, &self.price_marker)
            .next()
            .map(|element| normalize_whitespace(&element.text().collect::<String>()))
            .unwrap_or_else(|| MISSING_PRICE.to_string());
        let price = MoneyAmount::parse(&price_text).map_err(|e| ParsingError::invalid_value("price", e))?;

        let capacity_text = select_text_or(card, &self.capacity, MISSING_CAPACITY);
        let capacity = ByteSize::parse(&capacity_text).map_err(|e| ParsingError::invalid_value("capacity", e))?;

        let src = select_attr(card, &self.image, "src")
            .ok_or_else(|| ParsingError::required_field_missing("image", Some(title.as_str())))?;
        let image_url = resolve_url(src, &context.page_url)?;

        let availability_text = self
            .availability_text(card)
            .ok_or_else(|| ParsingError::required_field_missing("availability", Some(title.as_str())))?;

        let shipping = self.shipping.extract(text_fragments(card), context.run_date);

        Ok(ProductListing {
            title,
            price,
            image_url: image_url.to_string(),
            capacity,
            availability_text,
            shipping_text: shipping.text,
            shipping_date: shipping.date,
        })
    }

    /// Colour names of the card's variants, in document order
    pub fn colours<'a>(&'a self, card: &ElementRef<'a>) -> impl Iterator<Item = &'a str> + 'a {
        card.select(&self.variant).filter_map(|variant| {
            let colour = variant.value().attr(&self.colour_attribute);
            if colour.is_none() {
                debug!("Variant without '{}' attribute ignored", self.colour_attribute);
            }
            colour
        })
    }

    fn availability_text(&self, card: &ElementRef<'_>) -> Option<String> {
        let element = elements_with_own_text(card, &self.availability_marker).next()?;
        let text = normalize_whitespace(&element.text().collect::<String>());
        text.split_once(self.availability_marker.as_str())
            .map(|(_, value)| value.trim().to_string())
    }

    /// Extract every product card on a page.
    ///
    /// Never fails as a whole: cards that cannot be built land in
    /// [`PageExtraction::failures`].
    pub fn parse_page(&self, html: &Html, context: &ParseContext) -> PageExtraction {
        let mut extraction = PageExtraction::default();

        for (index, card) in html.select(&self.product_container).enumerate() {
            let listing = match self.parse_listing(&card, context) {
                Ok(listing) => listing,
                Err(error) => {
                    extraction.failures.push(ProductFailure {
                        index,
                        title: select_text_or(&card, &self.title, MISSING_TITLE),
                        error,
                    });
                    continue;
                }
            };

            let before = extraction.records.len();
            extraction
                .records
                .extend(self.colours(&card).map(|colour| listing.variant(colour)));

            if extraction.records.len() == before {
                debug!(
                    "Product '{}' at index {} on page {} has no colour variants",
                    listing.title, index, context.page_id
                );
            }
        }

        debug!(
            "Extracted {} records ({} failed products) from page {}",
            extraction.records.len(),
            extraction.failures.len(),
            context.page_id
        );

        extraction
    }
}

impl ContextualParser for ProductListParser {
    type Output = PageExtraction;
    type Context = ParseContext;

    fn parse_with_context(&self, html: &Html, context: &Self::Context) -> ParsingResult<Self::Output> {
        Ok(self.parse_page(html, context))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use url::Url;

    const PAGE: &str = r#"
        <html><body>
        <div id="products">
          <div class="product">
            <div class="bg-white p-4">
              <img src="../images/iphone-12-pro.png" alt="iPhone 12 Pro 128GB">
              <h3><span class="product-name">iPhone 12 Pro</span> <span class="product-capacity">128GB</span></h3>
              <div><span data-colour="Sky Blue"></span><span data-colour="Black"></span></div>
              <div class="price">£999.99</div>
              <div class="availability">Availability: In Stock</div>
              <div class="shipping">Delivery by Saturday 21st Jan 2023</div>
            </div>
          </div>
          <div class="product">
            <div class="bg-white p-4">
              <img src="../images/nokia-3310.png">
              <h3><span class="product-name">Nokia 3310</span> <span class="product-capacity">16 MB</span></h3>
              <div><span data-colour="Red"></span></div>
              <div class="price">£29.50</div>
              <div class="availability">Availability: Out of Stock</div>
            </div>
          </div>
        </div>
        <div id="pages"><a href="?page=1">1</a><a href="?page=2">2</a><a href="?page=3">3</a></div>
        </body></html>
    "#;

    fn context() -> ParseContext {
        ParseContext::new(
            1,
            Url::parse("https://www.magpiehq.com/developer-challenge/smartphones/?page=1").unwrap(),
            NaiveDate::from_ymd_opt(2023, 1, 19).unwrap(),
        )
    }

    fn parse(body: &str) -> PageExtraction {
        let parser = ProductListParser::new().unwrap();
        parser.parse_page(&Html::parse_document(body), &context())
    }

    #[test]
    fn test_parser_creation() {
        assert!(ProductListParser::new().is_ok());
    }

    #[test]
    fn counts_pagination_links() {
        let parser = ProductListParser::new().unwrap();
        assert_eq!(parser.page_count(&Html::parse_document(PAGE)), 3);
        assert_eq!(parser.page_count(&Html::parse_document("<html></html>")), 0);
    }

    #[test]
    fn one_record_per_colour_variant() {
        let extraction = parse(PAGE);
        assert!(extraction.failures.is_empty());
        assert_eq!(extraction.records.len(), 3);

        let colours: Vec<_> = extraction.records.iter().map(ProductRecord::colour).collect();
        assert_eq!(colours, vec!["sky blue", "black", "red"]);

        let first = &extraction.records[0];
        assert_eq!(first.title(), "iPhone 12 Pro");
        assert_eq!(first.price().minor_units(), 99_999);
        assert_eq!(first.capacity().megabytes(), 128_000.0);
        assert_eq!(
            first.image_url(),
            "https://www.magpiehq.com/developer-challenge/images/iphone-12-pro.png"
        );
        assert_eq!(first.availability_text(), "In Stock");
        assert!(first.is_available());
        assert_eq!(first.shipping_text(), "Delivery by Saturday 21st Jan 2023");
        assert_eq!(first.shipping_date(), NaiveDate::from_ymd_opt(2023, 1, 21));
    }

    #[test]
    fn product_without_shipping_has_empty_shipping_fields() {
        let extraction = parse(PAGE);
        let nokia = &extraction.records[2];
        assert_eq!(nokia.capacity().megabytes(), 16.0);
        assert_eq!(nokia.availability_text(), "Out of Stock");
        assert!(!nokia.is_available());
        assert_eq!(nokia.shipping_text(), "");
        assert_eq!(nokia.shipping_date(), None);
    }

    #[test]
    fn missing_availability_is_reported_without_losing_other_products() {
        let body = PAGE.replace(r#"<div class="availability">Availability: In Stock</div>"#, "");
        let extraction = parse(&body);

        assert_eq!(extraction.records.len(), 1);
        assert_eq!(extraction.failures.len(), 1);
        let failure = &extraction.failures[0];
        assert_eq!(failure.index, 0);
        assert_eq!(failure.title, "iPhone 12 Pro");
        assert_eq!(failure.error.field(), Some("availability"));
    }

    #[test]
    fn missing_price_is_an_invalid_value() {
        let body = PAGE.replace(r#"<div class="price">£29.50</div>"#, "");
        let extraction = parse(&body);

        assert_eq!(extraction.failures.len(), 1);
        assert!(matches!(
            extraction.failures[0].error,
            ParsingError::InvalidValue { ref field, .. } if field == "price"
        ));
    }

    #[test]
    fn missing_capacity_is_an_invalid_value() {
        let body = PAGE.replace(r#"<span class="product-capacity">16 MB</span>"#, "");
        let extraction = parse(&body);

        assert_eq!(extraction.records.len(), 2);
        assert_eq!(extraction.failures.len(), 1);
        let failure = &extraction.failures[0];
        assert_eq!(failure.title, "Nokia 3310");
        assert!(matches!(
            failure.error,
            ParsingError::InvalidValue { ref field, .. } if field == "capacity"
        ));
        assert!(failure.error.to_string().contains("capacity"));
    }

    #[test]
    fn capacity_with_thousands_separator_is_read_in_full() {
        let body = PAGE.replace("16 MB", "1,024 GB");
        let extraction = parse(&body);

        assert_eq!(extraction.records[2].capacity().megabytes(), 1_024_000.0);
    }

    #[test]
    fn price_with_trailing_text_is_rejected() {
        let body = PAGE.replace("£29.50", "£29.50abc");
        let extraction = parse(&body);

        assert_eq!(extraction.failures.len(), 1);
        assert_eq!(extraction.failures[0].error.field(), Some("price"));
    }

    #[test]
    fn shipping_date_inside_inline_markup_is_resolved() {
        let body = PAGE.replace(
            "Delivery by Saturday 21st Jan 2023",
            "Delivery by <strong>Saturday 21st Jan 2023</strong>",
        );
        let extraction = parse(&body);

        let first = &extraction.records[0];
        assert_eq!(first.shipping_text(), "Delivery by Saturday 21st Jan 2023");
        assert_eq!(first.shipping_date(), NaiveDate::from_ymd_opt(2023, 1, 21));
    }

    #[test]
    fn contextual_parse_matches_page_parse() {
        let parser = ProductListParser::new().unwrap();
        let html = Html::parse_document(PAGE);
        let extraction = parser.parse_with_context(&html, &context()).unwrap();
        assert_eq!(extraction.records, parser.parse_page(&html, &context()).records);
    }

    #[test]
    fn missing_image_is_a_required_field() {
        let body = PAGE.replace(r#"<img src="../images/nokia-3310.png">"#, "");
        let extraction = parse(&body);

        assert_eq!(extraction.failures.len(), 1);
        assert_eq!(extraction.failures[0].error.field(), Some("image"));
    }

    #[test]
    fn product_without_variants_yields_no_records() {
        let body = PAGE.replace(r#"<span data-colour="Red"></span>"#, "");
        let extraction = parse(&body);

        assert_eq!(extraction.records.len(), 2);
        assert!(extraction.failures.is_empty());
    }

    #[test]
    fn custom_selectors_are_honoured() {
        let selectors = ListingSelectors {
            product_container: ".card".to_string(),
            title: ".name".to_string(),
            ..ListingSelectors::default()
        };
        let parser = ProductListParser::with_config(&selectors).unwrap();
        let body = r#"
            <div class="card">
              <img src="/a.png"><span class="name">Pixel 7</span>
              <span class="product-capacity">0.5GB</span>
              <span data-colour="White"></span>
              <p>£599</p><p>Availability: In Stock</p>
            </div>
        "#;
        let extraction = parser.parse_page(&Html::parse_document(body), &context());

        assert_eq!(extraction.records.len(), 1);
        assert_eq!(extraction.records[0].title(), "Pixel 7");
        assert_eq!(extraction.records[0].capacity().megabytes(), 500.0);
        assert_eq!(extraction.records[0].image_url(), "https://www.magpiehq.com/a.png");
    }

    #[test]
    fn invalid_selector_fails_construction() {
        let selectors = ListingSelectors {
            variant: "[[".to_string(),
            ..ListingSelectors::default()
        };
        let result = ProductListParser::with_config(&selectors);
        assert!(matches!(result, Err(ParsingError::InvalidSelector { ref name, .. }) if name == "variant"));
    }
}
