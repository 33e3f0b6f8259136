//! Referrer classification
//!
//! Maps a raw referrer URL plus the analyzed site's domain to a canonical
//! `{type, name, domain, url}` record, using a static registry of known
//! referring domains.

pub mod classifier;
pub mod registry;

use serde::{Deserialize, Serialize};

use crate::models::{ValidationError, ValidationErrorKind};

pub use classifier::classify;
pub use registry::{ReferrerRecord, ReferrerRegistry};

/// Display name used for every direct (or unattributable) visit
pub const DIRECT_NAME: &str = "Direct";

/// Traffic source category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReferrerType {
    Direct,
    Search,
    Social,
    Email,
    Unknown,
}

impl ReferrerType {
    /// Parse referrer type from string
    pub fn from_str(s: &str) -> Result<Self, ValidationError> {
        match s.trim().to_lowercase().as_str() {
            "direct" => Ok(ReferrerType::Direct),
            "search" => Ok(ReferrerType::Search),
            "social" => Ok(ReferrerType::Social),
            "email" => Ok(ReferrerType::Email),
            "unknown" => Ok(ReferrerType::Unknown),
            _ => Err(ValidationError::with_context(
                ValidationErrorKind::InvalidReferrerType,
                "type",
                format!("Unknown referrer type: {}", s),
            )),
        }
    }

    /// Convert to string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            ReferrerType::Direct => "direct",
            ReferrerType::Search => "search",
            ReferrerType::Social => "social",
            ReferrerType::Email => "email",
            ReferrerType::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for ReferrerType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Classification result for one referrer value
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedReferrer {
    #[serde(rename = "type")]
    pub referrer_type: ReferrerType,
    pub name: String,
    pub domain: String,
    pub url: String,
}

impl ParsedReferrer {
    /// A direct visit; `url` is empty for missing input and self-referrals,
    /// and keeps the raw string for input that failed to parse
    pub fn direct(url: impl Into<String>) -> Self {
        Self {
            referrer_type: ReferrerType::Direct,
            name: DIRECT_NAME.to_string(),
            domain: String::new(),
            url: url.into(),
        }
    }

    /// A referrer named after its own hostname
    pub fn from_host(referrer_type: ReferrerType, host: &str, url: &str) -> Self {
        Self {
            referrer_type,
            name: host.to_string(),
            domain: host.to_string(),
            url: url.to_string(),
        }
    }

    pub fn is_direct(&self) -> bool {
        self.referrer_type == ReferrerType::Direct
    }
}
