//! Date-bucketed array merge

use chrono::{DateTime, Utc};
use serde_json::Value;

use super::bucket::bucket_key;
use crate::models::{BucketKeyField, Granularity, Row, TodayData};

/// Replace (or append) the current bucket with today's counters
///
/// The key field is detected once from the first row and used for the whole
/// batch. A row whose key equals the current bucket key is replaced whole,
/// by index; the first such row wins. Without a match the synthetic bucket
/// is appended at the end, so callers that need chronological order must
/// sort afterwards.
pub fn update_events_with_today_data(
    events: &[Row],
    today: Option<&TodayData>,
    granularity: Granularity,
    now: DateTime<Utc>,
) -> Vec<Row> {
    let Some(today) = today else {
        return events.to_vec();
    };

    let key = bucket_key(granularity, now);
    let field = BucketKeyField::detect(events);
    let synthetic = today_bucket(field, &key, today);

    let mut merged = events.to_vec();
    let position = merged
        .iter()
        .position(|row| field.read_or_date(row).and_then(Value::as_str) == Some(key.as_str()));

    match position {
        Some(index) => {
            tracing::debug!(key = %key, field = field.as_str(), index, "Replacing current bucket");
            merged[index] = synthetic;
        },
        None => {
            tracing::debug!(key = %key, field = field.as_str(), "Appending current bucket");
            merged.push(synthetic);
        },
    }

    merged
}

fn today_bucket(field: BucketKeyField, key: &str, today: &TodayData) -> Row {
    let mut row = Row::new();
    field.write(&mut row, Value::String(key.to_string()));
    for (metric, value) in today.bucket_metrics() {
        row.insert(metric.to_string(), value);
    }
    row
}
