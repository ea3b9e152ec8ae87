//! Test utilities for the smartphone scraper
//!
//! In-memory stand-ins for the fetcher and output sink, and a builder for
//! listing page HTML, so pipeline tests run without network or disk.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;
use url::Url;

use crate::infrastructure::http_client::{DocumentFetcher, FetchError, FetchedPage};
use crate::infrastructure::output::{OutputSink, WriteError};

/// Serves canned HTML by URL and records every request.
///
/// Unknown URLs answer with a 404 status error.
#[derive(Debug, Default)]
pub struct MockFetcher {
    pages: HashMap<String, String>,
    statuses: HashMap<String, u16>,
    calls: Mutex<Vec<String>>,
}

impl MockFetcher {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `html` for `url`
    #[must_use]
    pub fn with_page(mut self, url: &str, html: impl Into<String>) -> Self {
        self.pages.insert(url.to_string(), html.into());
        self
    }

    /// Answer `url` with an HTTP error status
    #[must_use]
    pub fn with_status(mut self, url: &str, status: u16) -> Self {
        self.statuses.insert(url.to_string(), status);
        self
    }

    /// URLs requested so far, in order
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }
}

#[async_trait]
impl DocumentFetcher for MockFetcher {
    async fn fetch(&self, url: &Url) -> Result<FetchedPage, FetchError> {
        let key = url.to_string();
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(key.clone());

        if let Some(status) = self.statuses.get(&key) {
            return Err(FetchError::Status {
                url: key,
                status: *status,
            });
        }

        match self.pages.get(&key) {
            Some(body) => Ok(FetchedPage {
                url: url.clone(),
                body: body.clone(),
            }),
            None => Err(FetchError::Status { url: key, status: 404 }),
        }
    }
}

/// Keeps written documents in memory
#[derive(Debug, Default)]
pub struct MemorySink {
    writes: Mutex<Vec<(PathBuf, Vec<u8>)>>,
    fail: bool,
}

impl MemorySink {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A sink whose every write fails
    #[must_use]
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn writes(&self) -> Vec<(PathBuf, Vec<u8>)> {
        self.writes.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    /// Last written document parsed as JSON
    pub fn last_json(&self) -> Option<serde_json::Value> {
        self.writes()
            .last()
            .and_then(|(_, bytes)| serde_json::from_slice(bytes).ok())
    }
}

#[async_trait]
impl OutputSink for MemorySink {
    async fn write(&self, path: &Path, bytes: &[u8]) -> Result<(), WriteError> {
        if self.fail {
            return Err(WriteError::Write {
                path: path.display().to_string(),
                source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "sink is read-only"),
            });
        }
        self.writes
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((path.to_path_buf(), bytes.to_vec()));
        Ok(())
    }
}

/// One product card in a fixture page
#[derive(Debug, Clone)]
pub struct ProductCard {
    title: String,
    capacity: Option<String>,
    price: Option<String>,
    image_src: Option<String>,
    colours: Vec<String>,
    availability: Option<String>,
    shipping: Option<String>,
}

impl ProductCard {
    /// An in-stock card with no colours and no shipping line
    #[must_use]
    pub fn new(title: &str, capacity: &str, price: &str) -> Self {
        let slug = title.to_lowercase().replace(' ', "-");
        Self {
            title: title.to_string(),
            capacity: Some(capacity.to_string()),
            price: Some(price.to_string()),
            image_src: Some(format!("../images/{slug}.png")),
            colours: Vec::new(),
            availability: Some("In Stock".to_string()),
            shipping: None,
        }
    }

    #[must_use]
    pub fn colours(mut self, colours: &[&str]) -> Self {
        self.colours = colours.iter().map(|colour| (*colour).to_string()).collect();
        self
    }

    #[must_use]
    pub fn availability(mut self, availability: &str) -> Self {
        self.availability = Some(availability.to_string());
        self
    }

    #[must_use]
    pub fn shipping(mut self, shipping: &str) -> Self {
        self.shipping = Some(shipping.to_string());
        self
    }

    #[must_use]
    pub fn without_price(mut self) -> Self {
        self.price = None;
        self
    }

    #[must_use]
    pub fn without_capacity(mut self) -> Self {
        self.capacity = None;
        self
    }

    #[must_use]
    pub fn without_image(mut self) -> Self {
        self.image_src = None;
        self
    }

    #[must_use]
    pub fn without_availability(mut self) -> Self {
        self.availability = None;
        self
    }

    fn render(&self, html: &mut String) {
        html.push_str("<div class=\"product\"><div class=\"bg-white p-4 rounded-md\">");
        if let Some(src) = &self.image_src {
            html.push_str(&format!("<img src=\"{src}\" alt=\"{}\">", self.title));
        }
        html.push_str(&format!("<h3><span class=\"product-name\">{}</span>", self.title));
        if let Some(capacity) = &self.capacity {
            html.push_str(&format!(" <span class=\"product-capacity\">{capacity}</span>"));
        }
        html.push_str("</h3>");
        html.push_str("<div><div class=\"flex -mx-2\">");
        for colour in &self.colours {
            html.push_str(&format!(
                "<div class=\"px-2\"><span class=\"border\" data-colour=\"{colour}\"></span></div>"
            ));
        }
        html.push_str("</div></div>");
        if let Some(price) = &self.price {
            html.push_str(&format!("<div class=\"my-8 block text-center text-lg\">{price}</div>"));
        }
        if let Some(availability) = &self.availability {
            html.push_str(&format!(
                "<div class=\"my-4 text-sm block text-center\">Availability: {availability}</div>"
            ));
        }
        if let Some(shipping) = &self.shipping {
            html.push_str(&format!("<div class=\"my-4 text-sm block text-center\">{shipping}</div>"));
        }
        html.push_str("</div></div>");
    }
}

/// Builds listing page HTML in the shape of the live site
#[derive(Debug, Clone, Default)]
pub struct ListingHtmlBuilder {
    cards: Vec<ProductCard>,
    page_links: usize,
}

impl ListingHtmlBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of pagination links to render
    #[must_use]
    pub fn page_links(mut self, count: usize) -> Self {
        self.page_links = count;
        self
    }

    #[must_use]
    pub fn card(mut self, card: ProductCard) -> Self {
        self.cards.push(card);
        self
    }

    #[must_use]
    pub fn build(&self) -> String {
        let mut html = String::from("<!DOCTYPE html><html><head><title>Smartphones</title></head><body>");
        html.push_str("<div id=\"products\" class=\"flex flex-wrap -mx-4\">");
        for card in &self.cards {
            card.render(&mut html);
        }
        html.push_str("</div><div id=\"pages\" class=\"flex justify-center\">");
        for page in 1..=self.page_links {
            html.push_str(&format!("<a href=\"?page={page}\">{page}</a>"));
        }
        html.push_str("</div></body></html>");
        html
    }
}
