//! Test utilities for StatForge
//!
//! Row builders, a small deterministic registry and a composer frozen in
//! time.

use chrono::{DateTime, TimeZone, Utc};
use serde_json::Value;
use std::sync::Arc;

use crate::clock::FixedClock;
use crate::compose::ResultComposer;
use crate::models::{Row, TodayData};
use crate::referrer::{ReferrerRecord, ReferrerRegistry, ReferrerType};

/// Build a row from a JSON object literal; anything else gives an empty row
pub fn row(value: Value) -> Row {
    match value {
        Value::Object(map) => map,
        _ => Row::new(),
    }
}

/// Build rows from a JSON array of objects
pub fn rows(value: Value) -> Vec<Row> {
    match value {
        Value::Array(items) => items.into_iter().map(row).collect(),
        _ => Vec::new(),
    }
}

/// Counters used throughout the tests: 20 pageviews, 9 visitors, 7 sessions, 10% bounce
pub fn sample_today() -> TodayData {
    TodayData::new(20, 9, 7, 10.0)
}

/// A UTC instant
pub fn utc(year: i32, month: u32, day: u32, hour: u32, minute: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, hour, minute, 0)
        .single()
        .unwrap_or_default()
}

/// Registry with a handful of well-known entries
pub fn test_registry() -> ReferrerRegistry {
    let entries = [
        ("bing.com", ReferrerType::Search, "Bing"),
        ("google.com", ReferrerType::Search, "Google"),
        ("facebook.com", ReferrerType::Social, "Facebook"),
        ("substack.com", ReferrerType::Email, "Substack"),
    ];

    let mut registry = ReferrerRegistry::new();
    for (domain, referrer_type, name) in entries {
        // entries above are all bare domains
        let _ = registry.insert(domain, ReferrerRecord::new(referrer_type, name));
    }
    registry
}

/// Composer over the built-in registry with the clock frozen at `now`
pub fn frozen_composer(now: DateTime<Utc>) -> ResultComposer {
    ResultComposer::new(
        Arc::new(ReferrerRegistry::builtin().clone()),
        Arc::new(FixedClock(now)),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_row_builders() {
        assert_eq!(row(json!({"a": 1})).len(), 1);
        assert!(row(json!([1])).is_empty());
        assert_eq!(rows(json!([{"a": 1}, {"b": 2}])).len(), 2);
        assert!(rows(json!({"a": 1})).is_empty());
    }

    #[test]
    fn test_registry_and_clock() {
        assert_eq!(test_registry().len(), 4);
        assert_eq!(utc(2024, 1, 1, 0, 0).to_rfc3339(), "2024-01-01T00:00:00+00:00");
    }
}
