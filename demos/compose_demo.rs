//! Composition walkthrough
//!
//! Run with: cargo run --example compose_demo

use serde_json::json;
use statforge::test_utils::{frozen_composer, rows, sample_today, utc};
use statforge::{classify, Granularity, QueryConfig};

fn main() {
    println!("=== StatForge Composition Demo ===\n");

    println!("1. Classifying referrers:");
    for url in [
        None,
        Some("direct_visit"),
        Some("https://www.bing.com/?q=shoes"),
        Some("https://blog.shop.test/post"),
        Some("https://search.unknown-engine.test/?q=x"),
    ] {
        let parsed = classify(url, Some("shop.test"));
        println!(
            "   {:<45} -> {} / {} / '{}'",
            url.unwrap_or("<none>"),
            parsed.referrer_type,
            parsed.name,
            parsed.domain
        );
    }

    let composer = frozen_composer(utc(2024, 1, 1, 14, 30));

    println!("\n2. Top referrers with auto-detected plugin:");
    let referrers = rows(json!([
        {"name": "direct_visit", "count": 10},
        {"name": "https://www.bing.com/?q=shoes", "count": 4}
    ]));
    let config = QueryConfig::for_template("top_referrers");
    for row in composer.compose_rows(&referrers, &config, Some("shop.test")) {
        println!("   {}", serde_json::Value::Object(row));
    }

    println!("\n3. Folding today's counters into a daily series:");
    let series = rows(json!([
        {"date": "2023-12-31", "visitors": 31},
        {"date": "2024-01-01", "visitors": 5}
    ]));
    let merged = composer.compose_events_by_date(
        &series,
        &QueryConfig::default(),
        None,
        Some(&sample_today()),
        Some(Granularity::Daily),
    );
    for row in merged {
        println!("   {}", serde_json::Value::Object(row));
    }

    println!("\n=== Demo Complete ===");
}
