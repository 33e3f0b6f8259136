//! Summary merge

use serde_json::{Map, Value};

use crate::models::{Row, TodayData};

/// Annotate a summary with today's counters
///
/// The historical totals already include today's committed rows, so they are
/// left as they are; the counters go into a separate `today` block for
/// display.
pub fn merge_today_data_into_summary(summary: &Row, today: Option<&TodayData>) -> Row {
    let Some(today) = today else {
        return summary.clone();
    };

    let block: Map<String, Value> = today
        .summary_metrics()
        .into_iter()
        .map(|(field, value)| (field.to_string(), value))
        .collect();

    let mut merged = summary.clone();
    merged.insert("today".to_string(), Value::Object(block));
    merged
}
