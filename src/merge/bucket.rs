//! Bucket keys for the still-open period
//!
//! Every key is computed in UTC. The hourly format here is the one the
//! historical hourly series is keyed with, so keys compare byte-for-byte.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde_json::Value;

use crate::models::Granularity;

/// Daily bucket key format
pub const DAILY_KEY_FORMAT: &str = "%Y-%m-%d";

/// Hourly bucket key format
pub const HOURLY_KEY_FORMAT: &str = "%Y-%m-%d %H:00:00";

const NAIVE_DATETIME_FORMATS: [&str; 4] = [
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
];

/// Key of the bucket containing `at`
pub fn bucket_key(granularity: Granularity, at: DateTime<Utc>) -> String {
    match granularity {
        Granularity::Daily => at.format(DAILY_KEY_FORMAT).to_string(),
        Granularity::Hourly => at.format(HOURLY_KEY_FORMAT).to_string(),
    }
}

/// UTC calendar day a row's date value falls on
///
/// Accepts plain dates, RFC3339 timestamps (converted to UTC), naive
/// timestamps (read as UTC) and numbers as epoch milliseconds.
pub fn utc_day_of(value: &Value) -> Option<NaiveDate> {
    match value {
        Value::String(s) => parse_day(s.trim()),
        Value::Number(n) => n
            .as_i64()
            .and_then(DateTime::from_timestamp_millis)
            .map(|dt| dt.date_naive()),
        _ => None,
    }
}

fn parse_day(s: &str) -> Option<NaiveDate> {
    if let Ok(date) = NaiveDate::parse_from_str(s, DAILY_KEY_FORMAT) {
        return Some(date);
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc).date_naive());
    }

    NAIVE_DATETIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(s, format).ok())
        .map(|dt| dt.date())
}
