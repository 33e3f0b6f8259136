//! Real-time "today" counters and bucket granularity

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use super::error::{ValidationError, ValidationErrorKind};
use super::row::metric_value;

/// Bucket size of a time series
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum Granularity {
    /// One bucket per calendar day
    Daily,
    /// One bucket per hour
    Hourly,
}

impl Granularity {
    /// Parse granularity from string
    pub fn from_str(s: &str) -> Result<Self, ValidationError> {
        match s.trim().to_lowercase().as_str() {
            "daily" | "day" => Ok(Granularity::Daily),
            "hourly" | "hour" => Ok(Granularity::Hourly),
            _ => Err(ValidationError::with_context(
                ValidationErrorKind::InvalidGranularity,
                "granularity",
                format!("Unknown granularity: {}", s),
            )),
        }
    }

    /// Convert to string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Granularity::Daily => "daily",
            Granularity::Hourly => "hourly",
        }
    }
}

impl TryFrom<String> for Granularity {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Granularity::from_str(&value)
    }
}

impl std::fmt::Display for Granularity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Partial-period counters for the still-open bucket
///
/// Missing, null or non-numeric fields decode as zero so a thin real-time
/// payload never fails the merge.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TodayData {
    #[serde(default, deserialize_with = "lenient_count")]
    pub pageviews: u64,

    #[serde(default, deserialize_with = "lenient_count")]
    pub visitors: u64,

    #[serde(default, deserialize_with = "lenient_count")]
    pub sessions: u64,

    #[serde(default, deserialize_with = "lenient_rate")]
    pub bounce_rate: f64,

    #[serde(
        default,
        deserialize_with = "lenient_optional_rate",
        skip_serializing_if = "Option::is_none"
    )]
    pub avg_session_duration: Option<f64>,
}

impl TodayData {
    /// Create counters without a session duration
    pub fn new(pageviews: u64, visitors: u64, sessions: u64, bounce_rate: f64) -> Self {
        Self {
            pageviews,
            visitors,
            sessions,
            bounce_rate,
            avg_session_duration: None,
        }
    }

    /// The five bucket metrics, with visitors written under both aliases
    pub fn bucket_metrics(&self) -> [(&'static str, Value); 5] {
        [
            ("pageviews", Value::from(self.pageviews)),
            ("unique_visitors", Value::from(self.visitors)),
            ("visitors", Value::from(self.visitors)),
            ("sessions", Value::from(self.sessions)),
            ("bounce_rate", metric_value(self.bounce_rate)),
        ]
    }

    /// The four fields shown in a summary's `today` annotation
    pub fn summary_metrics(&self) -> [(&'static str, Value); 4] {
        [
            ("pageviews", Value::from(self.pageviews)),
            ("visitors", Value::from(self.visitors)),
            ("sessions", Value::from(self.sessions)),
            ("bounce_rate", metric_value(self.bounce_rate)),
        ]
    }
}

fn numeric(value: &Value) -> Option<f64> {
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    parsed.filter(|v| v.is_finite())
}

fn lenient_count<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(numeric(&value).map(|v| v.max(0.0) as u64).unwrap_or(0))
}

fn lenient_rate<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(numeric(&value).unwrap_or(0.0))
}

fn lenient_optional_rate<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(numeric(&value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_granularity_from_str() {
        assert_eq!(Granularity::from_str("daily").unwrap(), Granularity::Daily);
        assert_eq!(Granularity::from_str("Hour").unwrap(), Granularity::Hourly);
        assert_eq!(Granularity::from_str(" HOURLY ").unwrap(), Granularity::Hourly);
        assert!(Granularity::from_str("weekly").is_err());
    }

    #[test]
    fn test_granularity_serde() {
        let parsed: Granularity = serde_json::from_value(json!("day")).unwrap();
        assert_eq!(parsed, Granularity::Daily);
        assert_eq!(serde_json::to_value(Granularity::Hourly).unwrap(), json!("hourly"));
        assert!(serde_json::from_value::<Granularity>(json!("monthly")).is_err());
    }

    #[test]
    fn test_today_data_missing_fields_default_to_zero() {
        let today: TodayData = serde_json::from_value(json!({"visitors": 9})).unwrap();
        assert_eq!(today, TodayData::new(0, 9, 0, 0.0));
    }

    #[test]
    fn test_today_data_tolerates_odd_values() {
        let today: TodayData = serde_json::from_value(json!({
            "pageviews": "20",
            "visitors": 9.0,
            "sessions": null,
            "bounce_rate": "n/a",
            "avg_session_duration": 31.5
        }))
        .unwrap();

        assert_eq!(today.pageviews, 20);
        assert_eq!(today.visitors, 9);
        assert_eq!(today.sessions, 0);
        assert_eq!(today.bounce_rate, 0.0);
        assert_eq!(today.avg_session_duration, Some(31.5));
    }

    #[test]
    fn test_bucket_metrics_alias_visitors() {
        let metrics = TodayData::new(20, 9, 7, 10.0).bucket_metrics();
        assert_eq!(metrics[1], ("unique_visitors", json!(9)));
        assert_eq!(metrics[2], ("visitors", json!(9)));
        assert_eq!(metrics[4], ("bounce_rate", json!(10)));
    }
}
