//! Dynamically-shaped result rows
//!
//! Rows come straight from the event store query layer, so field names are
//! not stable: the bucket key may be `date`, a dotted `date_range.date`
//! column, or a nested `date_range: { date }` object. [`BucketKeyField`]
//! resolves the shape once per batch so no read site branches on it.

use serde_json::{Map, Number, Value};

/// One raw event-store row: field name to JSON value
pub type Row = Map<String, Value>;

/// Flat bucket key column
pub const DATE_FIELD: &str = "date";

/// Dotted bucket key column emitted by date-range grouped queries
pub const DATE_RANGE_FIELD: &str = "date_range.date";

const DATE_RANGE_OBJECT: &str = "date_range";

/// Where a batch of bucket rows keeps its key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BucketKeyField {
    /// `row["date"]`
    Date,
    /// `row["date_range.date"]`
    DateRangeColumn,
    /// `row["date_range"]["date"]`
    DateRangeNested,
}

impl BucketKeyField {
    /// Detect the key field from the first row of a batch
    ///
    /// Batches are assumed homogeneous. A later row with a different shape is
    /// still found through the flat `date` fallback in [`Self::read_or_date`],
    /// but nothing else about it is reconciled.
    pub fn detect(rows: &[Row]) -> Self {
        match rows.first() {
            Some(row) if row.contains_key(DATE_RANGE_FIELD) => BucketKeyField::DateRangeColumn,
            Some(row)
                if row
                    .get(DATE_RANGE_OBJECT)
                    .and_then(Value::as_object)
                    .is_some_and(|nested| nested.contains_key(DATE_FIELD)) =>
            {
                BucketKeyField::DateRangeNested
            },
            _ => BucketKeyField::Date,
        }
    }

    /// Display name of the field, as used in logs
    pub fn as_str(&self) -> &'static str {
        match self {
            BucketKeyField::Date => DATE_FIELD,
            BucketKeyField::DateRangeColumn | BucketKeyField::DateRangeNested => DATE_RANGE_FIELD,
        }
    }

    /// Read the key from a row
    pub fn read<'a>(&self, row: &'a Row) -> Option<&'a Value> {
        match self {
            BucketKeyField::Date => row.get(DATE_FIELD),
            BucketKeyField::DateRangeColumn => row.get(DATE_RANGE_FIELD),
            BucketKeyField::DateRangeNested => row
                .get(DATE_RANGE_OBJECT)
                .and_then(Value::as_object)
                .and_then(|nested| nested.get(DATE_FIELD)),
        }
    }

    /// Read the key, falling back to flat `date` when this row lacks the field
    pub fn read_or_date<'a>(&self, row: &'a Row) -> Option<&'a Value> {
        self.read(row).or_else(|| row.get(DATE_FIELD))
    }

    /// Write the key into a row in this shape
    pub fn write(&self, row: &mut Row, key: Value) {
        match self {
            BucketKeyField::Date => {
                row.insert(DATE_FIELD.to_string(), key);
            },
            BucketKeyField::DateRangeColumn => {
                row.insert(DATE_RANGE_FIELD.to_string(), key);
            },
            BucketKeyField::DateRangeNested => {
                let mut nested = Map::new();
                nested.insert(DATE_FIELD.to_string(), key);
                row.insert(DATE_RANGE_OBJECT.to_string(), Value::Object(nested));
            },
        }
    }
}

/// String field accessor; non-string values are treated as absent
pub fn str_field<'a>(row: &'a Row, field: &str) -> Option<&'a str> {
    row.get(field).and_then(Value::as_str)
}

/// Stringify a bucket key value the way the query layer would print it
///
/// Only strings and numbers qualify; null, booleans and containers do not.
pub fn stringify_key(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// JSON number for a metric, kept integral when the value is whole
pub fn metric_value(value: f64) -> Value {
    if value.is_finite() && value.fract() == 0.0 && value.abs() < 9_007_199_254_740_992.0 {
        Value::Number(Number::from(value as i64))
    } else {
        Number::from_f64(value)
            .map(Value::Number)
            .unwrap_or(Value::Number(Number::from(0)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn row(value: Value) -> Row {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_detect_flat_date() {
        let rows = vec![row(json!({"date": "2024-01-01", "visitors": 1}))];
        assert_eq!(BucketKeyField::detect(&rows), BucketKeyField::Date);
        assert_eq!(BucketKeyField::detect(&[]), BucketKeyField::Date);
    }

    #[test]
    fn test_detect_date_range_shapes() {
        let dotted = vec![row(json!({"date_range.date": "2024-01-01"}))];
        assert_eq!(BucketKeyField::detect(&dotted), BucketKeyField::DateRangeColumn);

        let nested = vec![row(json!({"date_range": {"date": "2024-01-01"}}))];
        assert_eq!(BucketKeyField::detect(&nested), BucketKeyField::DateRangeNested);

        let nested_without_date = vec![row(json!({"date_range": {"start": "2024-01-01"}}))];
        assert_eq!(BucketKeyField::detect(&nested_without_date), BucketKeyField::Date);
    }

    #[test]
    fn test_detection_uses_first_row_only() {
        let rows = vec![
            row(json!({"date": "2024-01-01"})),
            row(json!({"date_range.date": "2024-01-02"})),
        ];
        assert_eq!(BucketKeyField::detect(&rows), BucketKeyField::Date);
    }

    #[test]
    fn test_read_or_date_fallback() {
        let field = BucketKeyField::DateRangeColumn;
        let flat = row(json!({"date": "2024-01-02"}));
        assert_eq!(field.read(&flat), None);
        assert_eq!(field.read_or_date(&flat), Some(&json!("2024-01-02")));
    }

    #[test]
    fn test_write_round_trips_through_read() {
        for field in [
            BucketKeyField::Date,
            BucketKeyField::DateRangeColumn,
            BucketKeyField::DateRangeNested,
        ] {
            let mut target = Row::new();
            field.write(&mut target, json!("2024-01-01"));
            assert_eq!(field.read(&target), Some(&json!("2024-01-01")));
            assert_eq!(BucketKeyField::detect(&[target]), field);
        }
    }

    #[test]
    fn test_stringify_key() {
        assert_eq!(stringify_key(&json!("2024-01-01")), Some("2024-01-01".to_string()));
        assert_eq!(stringify_key(&json!(1704067200000u64)), Some("1704067200000".to_string()));
        assert_eq!(stringify_key(&json!(null)), None);
        assert_eq!(stringify_key(&json!({"a": 1})), None);
    }

    #[test]
    fn test_metric_value_keeps_integers_integral() {
        assert_eq!(metric_value(10.0), json!(10));
        assert_eq!(metric_value(42.5), json!(42.5));
        assert_eq!(metric_value(f64::NAN), json!(0));
    }
}
