//! Today/historical merge
//!
//! Folds a real-time snapshot of the still-open period into a durable
//! aggregate. Every merge replaces; none of them add today's counters to
//! historical values for the same bucket. An absent snapshot returns the
//! input unchanged.

pub mod bucket;
pub mod events;
pub mod summary;
pub mod trends;

pub use bucket::{bucket_key, utc_day_of, DAILY_KEY_FORMAT, HOURLY_KEY_FORMAT};
pub use events::update_events_with_today_data;
pub use summary::merge_today_data_into_summary;
pub use trends::merge_today_into_trends;
