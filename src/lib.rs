//! StatForge Library
//!
//! Turns raw event-store aggregates into the rows a dashboard renders:
//! referrer classification, optional row plugins, and reconciliation of the
//! durable aggregate with the real-time counters of the still-open period.

pub mod clock;
pub mod compose;
pub mod config;
pub mod error;
pub mod logging;
pub mod merge;
pub mod models;
pub mod plugins;
pub mod referrer;
pub mod test_utils;

// Re-export commonly used types at the crate root
pub use config::Config;
pub use error::{Error, Result};

// Re-export model types
pub use models::{Granularity, Plugin, QueryConfig, ReferrerTemplate, Row, TodayData};

// Re-export the composition entry points
pub use clock::{Clock, FixedClock, SystemClock};
pub use compose::{ComposeRequest, ComposeResponse, ResultComposer};
pub use merge::{
    merge_today_data_into_summary, merge_today_into_trends, update_events_with_today_data,
};
pub use plugins::{apply_plugins, PluginPipeline};
pub use referrer::{classify, ParsedReferrer, ReferrerRecord, ReferrerRegistry, ReferrerType};
