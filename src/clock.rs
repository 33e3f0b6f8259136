//! Time source for the merge step
//!
//! The merge functions take `now` as an argument; the composer reads it from
//! a [`Clock`] so callers and tests can pin the current bucket.

use chrono::{DateTime, Utc};

/// Source of the current instant
pub trait Clock: Send + Sync {
    /// Current time in UTC
    fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock time
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A clock frozen at one instant
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock(pub DateTime<Utc>);

impl FixedClock {
    /// Freeze at an RFC3339 timestamp, `None` if it does not parse
    pub fn at_rfc3339(timestamp: &str) -> Option<Self> {
        DateTime::parse_from_rfc3339(timestamp)
            .ok()
            .map(|dt| FixedClock(dt.with_timezone(&Utc)))
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}
