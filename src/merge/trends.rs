//! Flat trend-row merge

use chrono::{DateTime, Utc};

use super::bucket::{bucket_key, utc_day_of};
use crate::models::row::{stringify_key, DATE_FIELD};
use crate::models::{Granularity, Row, TodayData};

/// Overwrite today's metrics on matching trend rows
///
/// Unlike the date-bucketed merge this is a per-field replace: only the five
/// metrics change and every other field on the row survives. Daily rows
/// match on the UTC calendar day of their `date`; hourly rows match when the
/// stringified `date` equals the current hourly key. Every matching row is
/// overwritten.
pub fn merge_today_into_trends(
    rows: &[Row],
    today: Option<&TodayData>,
    granularity: Granularity,
    now: DateTime<Utc>,
) -> Vec<Row> {
    let Some(today) = today else {
        return rows.to_vec();
    };

    let hour_key = bucket_key(Granularity::Hourly, now);
    let current_day = now.date_naive();

    let matches_today = |row: &Row| -> bool {
        let Some(date) = row.get(DATE_FIELD) else {
            return false;
        };
        match granularity {
            Granularity::Daily => utc_day_of(date) == Some(current_day),
            Granularity::Hourly => stringify_key(date).as_deref() == Some(hour_key.as_str()),
        }
    };

    let merged: Vec<Row> = rows
        .iter()
        .map(|row| {
            if !matches_today(row) {
                return row.clone();
            }
            let mut out = row.clone();
            for (metric, value) in today.bucket_metrics() {
                out.insert(metric.to_string(), value);
            }
            out
        })
        .collect();

    tracing::debug!(
        granularity = %granularity,
        rows = rows.len(),
        "Merged today into trends"
    );

    merged
}
