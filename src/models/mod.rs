//! Data models for StatForge
//!
//! Row shapes, query configuration, real-time counters and the validation
//! helpers used when requests are decoded.

pub mod error;
pub mod query;
pub mod row;
pub mod today;
pub mod validation;

// Re-export commonly used types
pub use error::{ValidationError, ValidationErrorKind, ValidationResult};
pub use query::{Plugin, QueryConfig, ReferrerTemplate};
pub use row::{BucketKeyField, Row, DATE_FIELD, DATE_RANGE_FIELD};
pub use today::{Granularity, TodayData};
pub use validation::{has_url_scheme, validate_registry_domain, validate_site_domain};
