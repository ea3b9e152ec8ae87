//! End-to-end pipeline tests against in-memory pages

use chrono::NaiveDate;
use serde_json::{Value, json};
use tempfile::TempDir;

use smartphone_scraper_lib::application::{ListingPipeline, ScrapeError};
use smartphone_scraper_lib::infrastructure::output::FileOutputSink;
use smartphone_scraper_lib::infrastructure::{FailurePolicy, ListingSelectors, PipelineConfig};
use smartphone_scraper_lib::test_utils::{ListingHtmlBuilder, MemorySink, MockFetcher, ProductCard};

const BASE: &str = "https://shop.example.com/smartphones";

fn page_url(page: u32) -> String {
    format!("{BASE}/?page={page}")
}

fn run_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2023, 1, 19).unwrap()
}

fn config(policy: FailurePolicy) -> PipelineConfig {
    PipelineConfig {
        base_url: BASE.to_string(),
        output_path: "output.json".into(),
        failure_policy: policy,
        pretty_output: false,
    }
}

fn pipeline<S>(fetcher: MockFetcher, sink: S, policy: FailurePolicy) -> ListingPipeline<MockFetcher, S>
where
    S: smartphone_scraper_lib::infrastructure::OutputSink,
{
    ListingPipeline::new(config(policy), &ListingSelectors::default(), fetcher, sink)
        .unwrap()
        .with_run_date(run_date())
}

/// Two pages; page 1 holds one product in two colours
fn two_page_site() -> MockFetcher {
    let page_one = ListingHtmlBuilder::new()
        .page_links(2)
        .card(
            ProductCard::new("iPhone 11", "64GB", "£699.99")
                .colours(&["Black", "White"])
                .shipping("Delivery by Saturday 21st Jan 2023"),
        )
        .build();
    let page_two = ListingHtmlBuilder::new().page_links(2).build();

    MockFetcher::new()
        .with_page(BASE, page_one.clone())
        .with_page(&page_url(1), page_one)
        .with_page(&page_url(2), page_two)
}

#[tokio::test]
async fn writes_one_record_per_colour() {
    let pipeline = pipeline(two_page_site(), MemorySink::new(), FailurePolicy::Skip);

    let summary = pipeline.run().await.unwrap();

    assert_eq!(summary.pages_processed, 2);
    assert_eq!(summary.records_written, 2);
    assert_eq!(summary.products_failed, 0);
    assert_eq!(
        pipeline.fetcher().calls(),
        vec![BASE.to_string(), page_url(1), page_url(2)]
    );

    let written = pipeline.sink().last_json().unwrap();
    assert_eq!(
        written,
        json!([
            {
                "title": "iPhone 11",
                "price": 699.99,
                "imageUrl": "https://shop.example.com/images/iphone-11.png",
                "capacityMB": 64000,
                "colour": "black",
                "availabilityText": "In Stock",
                "isAvailable": true,
                "shippingText": "Delivery by Saturday 21st Jan 2023",
                "shippingDate": "2023-01-21"
            },
            {
                "title": "iPhone 11",
                "price": 699.99,
                "imageUrl": "https://shop.example.com/images/iphone-11.png",
                "capacityMB": 64000,
                "colour": "white",
                "availabilityText": "In Stock",
                "isAvailable": true,
                "shippingText": "Delivery by Saturday 21st Jan 2023",
                "shippingDate": "2023-01-21"
            }
        ])
    );
}

#[tokio::test]
async fn duplicates_across_pages_are_written_once() {
    let card = || ProductCard::new("Galaxy S21", "128GB", "£799.00").colours(&["Phantom Grey"]);
    let page = ListingHtmlBuilder::new().page_links(2).card(card()).build();
    let fetcher = MockFetcher::new()
        .with_page(BASE, page.clone())
        .with_page(&page_url(1), page.clone())
        .with_page(&page_url(2), page);

    let pipeline = pipeline(fetcher, MemorySink::new(), FailurePolicy::Skip);
    let summary = pipeline.run().await.unwrap();

    assert_eq!(summary.records_written, 1);
    assert_eq!(summary.duplicates_skipped, 1);
}

#[tokio::test]
async fn shipping_keys_are_omitted_in_the_written_file() {
    let page = ListingHtmlBuilder::new()
        .page_links(1)
        .card(
            ProductCard::new("Nokia 3310", "16MB", "£29.99")
                .colours(&["Red"])
                .availability("Out of Stock"),
        )
        .build();
    let fetcher = MockFetcher::new()
        .with_page(BASE, page.clone())
        .with_page(&page_url(1), page);

    let dir = TempDir::new().unwrap();
    let output_path = dir.path().join("out").join("output.json");
    let config = PipelineConfig {
        output_path: output_path.clone(),
        ..config(FailurePolicy::Skip)
    };
    let pipeline = ListingPipeline::new(config, &ListingSelectors::default(), fetcher, FileOutputSink)
        .unwrap()
        .with_run_date(run_date());

    pipeline.run().await.unwrap();

    let written: Value = serde_json::from_str(&std::fs::read_to_string(&output_path).unwrap()).unwrap();
    let record = written[0].as_object().unwrap();
    assert_eq!(record["isAvailable"], json!(false));
    assert_eq!(record["capacityMB"], json!(16));
    assert!(!record.contains_key("shippingText"));
    assert!(!record.contains_key("shippingDate"));
}

fn site_with_broken_product() -> MockFetcher {
    let page = ListingHtmlBuilder::new()
        .page_links(1)
        .card(ProductCard::new("Pixel 6", "128GB", "£599.00").colours(&["Sorta Seafoam"]))
        .card(ProductCard::new("Mystery Phone", "64GB", "£1.00").colours(&["Blue"]).without_price())
        .card(ProductCard::new("Pixel 7", "256GB", "£699.00").colours(&["Obsidian"]))
        .build();
    MockFetcher::new()
        .with_page(BASE, page.clone())
        .with_page(&page_url(1), page)
}

#[tokio::test]
async fn skip_policy_counts_failed_products_and_keeps_the_rest() {
    let pipeline = pipeline(site_with_broken_product(), MemorySink::new(), FailurePolicy::Skip);

    let summary = pipeline.run().await.unwrap();

    assert_eq!(summary.records_written, 2);
    assert_eq!(summary.products_failed, 1);
    let titles: Vec<_> = pipeline
        .sink()
        .last_json()
        .unwrap()
        .as_array()
        .unwrap()
        .iter()
        .map(|record| record["title"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(titles, vec!["Pixel 6", "Pixel 7"]);
}

#[tokio::test]
async fn product_without_capacity_is_skipped() {
    let page = ListingHtmlBuilder::new()
        .page_links(1)
        .card(ProductCard::new("Galaxy S21", "128GB", "£799.00").colours(&["Phantom Grey"]))
        .card(ProductCard::new("Galaxy A12", "32GB", "£149.00").colours(&["Black"]).without_capacity())
        .build();
    let fetcher = MockFetcher::new().with_page(BASE, page.clone()).with_page(&page_url(1), page);
    let pipeline = pipeline(fetcher, MemorySink::new(), FailurePolicy::Skip);

    let summary = pipeline.run().await.unwrap();

    assert_eq!(summary.records_written, 1);
    assert_eq!(summary.products_failed, 1);
    let written = pipeline.sink().last_json().unwrap();
    assert_eq!(written[0]["title"], "Galaxy S21");
    assert_eq!(written[0]["capacityMB"], 128_000);
}

#[tokio::test]
async fn abort_policy_fails_the_run_without_writing() {
    let pipeline = pipeline(site_with_broken_product(), MemorySink::new(), FailurePolicy::Abort);

    let err = pipeline.run().await.unwrap_err();

    assert_eq!(err.stage(), "extract");
    match err {
        ScrapeError::Extraction { page, index, title, .. } => {
            assert_eq!(page, 1);
            assert_eq!(index, 1);
            assert_eq!(title, "Mystery Phone");
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(pipeline.sink().writes().is_empty());
}

#[tokio::test]
async fn fetch_failure_is_terminal() {
    let fetcher = two_page_site().with_status(&page_url(2), 503);
    let pipeline = pipeline(fetcher, MemorySink::new(), FailurePolicy::Skip);

    let err = pipeline.run().await.unwrap_err();

    assert!(matches!(err, ScrapeError::Fetch(_)));
    assert!(pipeline.sink().writes().is_empty());
}

#[tokio::test]
async fn write_failure_is_reported() {
    let pipeline = pipeline(two_page_site(), MemorySink::failing(), FailurePolicy::Skip);

    let err = pipeline.run().await.unwrap_err();

    assert_eq!(err.stage(), "write");
}

#[tokio::test]
async fn no_pagination_links_writes_an_empty_array() {
    let page = ListingHtmlBuilder::new()
        .card(ProductCard::new("iPhone 11", "64GB", "£699.99").colours(&["Black"]))
        .build();
    let fetcher = MockFetcher::new().with_page(BASE, page);
    let pipeline = pipeline(fetcher, MemorySink::new(), FailurePolicy::Skip);

    let summary = pipeline.run().await.unwrap();

    assert_eq!(summary.pages_processed, 0);
    assert_eq!(summary.records_written, 0);
    assert_eq!(pipeline.fetcher().calls(), vec![BASE.to_string()]);
    assert_eq!(pipeline.sink().writes()[0].1, b"[]".to_vec());
}

#[tokio::test]
async fn collect_does_not_write() {
    let pipeline = pipeline(two_page_site(), MemorySink::new(), FailurePolicy::Skip);

    let products = pipeline.collect().await.unwrap();

    assert_eq!(products.len(), 2);
    assert!(pipeline.sink().writes().is_empty());
}

#[test]
fn page_urls_follow_the_site_scheme() {
    let with_slash = PipelineConfig {
        base_url: format!("{BASE}/"),
        ..config(FailurePolicy::Skip)
    };
    let pipeline = ListingPipeline::new(with_slash, &ListingSelectors::default(), MockFetcher::new(), MemorySink::new())
        .unwrap();

    assert_eq!(pipeline.page_url(3).unwrap().as_str(), page_url(3));
}

#[test]
fn invalid_selectors_are_a_configuration_error() {
    let selectors = ListingSelectors {
        title: ":::".to_string(),
        ..ListingSelectors::default()
    };
    let result = ListingPipeline::new(config(FailurePolicy::Skip), &selectors, MockFetcher::new(), MemorySink::new());

    assert!(matches!(result, Err(ScrapeError::Configuration { .. })));
}
