//! Listing page extraction throughput
//!
//! Parses a synthetic page of 24 product cards, three colours each, the way
//! the pipeline does for every fetched page.

use chrono::NaiveDate;
use criterion::{Criterion, black_box, criterion_group, criterion_main};
use scraper::Html;
use url::Url;

use smartphone_scraper_lib::infrastructure::parsing::{ParseContext, ProductListParser};
use smartphone_scraper_lib::test_utils::{ListingHtmlBuilder, ProductCard};

fn listing_page() -> String {
    (0..24)
        .fold(ListingHtmlBuilder::new().page_links(3), |builder, i| {
            builder.card(
                ProductCard::new(&format!("Phone {i}"), "128GB", "£499.99")
                    .colours(&["Black", "White", "Blue"])
                    .shipping("Delivery by Saturday 21st Jan 2023"),
            )
        })
        .build()
}

fn parsing_benchmark(c: &mut Criterion) {
    let parser = ProductListParser::new().unwrap();
    let body = listing_page();
    let context = ParseContext::new(
        1,
        Url::parse("https://www.magpiehq.com/developer-challenge/smartphones/?page=1").unwrap(),
        NaiveDate::from_ymd_opt(2023, 1, 19).unwrap(),
    );

    c.bench_function("parse listing page (24 cards)", |b| {
        b.iter(|| {
            let html = Html::parse_document(black_box(&body));
            black_box(parser.parse_page(&html, &context))
        })
    });

    let html = Html::parse_document(&body);
    c.bench_function("extract records from parsed page", |b| {
        b.iter(|| black_box(parser.parse_page(black_box(&html), &context)))
    });
}

criterion_group!(benches, parsing_benchmark);
criterion_main!(benches);
