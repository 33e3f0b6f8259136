//! Referrer registry: bare domain to `{type, name}`
//!
//! The registry is loaded once and never mutated afterwards, so it is shared
//! freely between threads. A built-in table ships with the crate; a
//! deployment may point `REFERRER_REGISTRY_PATH` at its own JSON file of the
//! same shape.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use std::sync::OnceLock;

use super::ReferrerType;
use crate::error::{Error, Result};
use crate::models::{validate_registry_domain, ValidationResult};

static BUILTIN_REGISTRY_JSON: &str = include_str!("../../data/referrers.json");
static BUILTIN_REGISTRY: OnceLock<ReferrerRegistry> = OnceLock::new();

/// One registry entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferrerRecord {
    #[serde(rename = "type")]
    pub referrer_type: ReferrerType,
    pub name: String,
}

impl ReferrerRecord {
    pub fn new(referrer_type: ReferrerType, name: impl Into<String>) -> Self {
        Self {
            referrer_type,
            name: name.into(),
        }
    }
}

/// Registry file entry before validation
#[derive(Debug, Deserialize)]
struct RawRecord {
    #[serde(rename = "type")]
    referrer_type: String,
    name: String,
}

/// Immutable domain knowledge base
#[derive(Debug, Clone, Default)]
pub struct ReferrerRegistry {
    records: HashMap<String, ReferrerRecord>,
}

impl ReferrerRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// The table embedded in the crate, parsed on first use
    pub fn builtin() -> &'static ReferrerRegistry {
        BUILTIN_REGISTRY.get_or_init(|| {
            ReferrerRegistry::from_json_str(BUILTIN_REGISTRY_JSON)
                .expect("Invalid built-in referrer registry")
        })
    }

    /// Parse a registry from its JSON representation
    pub fn from_json_str(json: &str) -> Result<Self> {
        let raw: HashMap<String, RawRecord> = serde_json::from_str(json)?;
        let mut registry = ReferrerRegistry::new();

        for (domain, record) in raw {
            let referrer_type = ReferrerType::from_str(&record.referrer_type)
                .map_err(|e| Error::registry(format!("{}: {}", domain, e)))?;
            registry
                .insert(&domain, ReferrerRecord::new(referrer_type, record.name))
                .map_err(|e| Error::registry(e.to_string()))?;
        }

        tracing::debug!(entries = registry.len(), "Referrer registry loaded");
        Ok(registry)
    }

    /// Load a registry JSON file
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|e| {
            Error::registry(format!("Failed to read {}: {}", path.display(), e))
        })?;
        Self::from_json_str(&json)
    }

    /// Add an entry; the key must be a bare domain and is stored lowercased
    pub fn insert(&mut self, domain: &str, record: ReferrerRecord) -> ValidationResult<()> {
        let key = validate_registry_domain(domain)?;
        self.records.insert(key, record);
        Ok(())
    }

    /// Exact lookup of a bare domain
    pub fn lookup(&self, domain: &str) -> Option<&ReferrerRecord> {
        self.records.get(domain)
    }

    /// First registered ancestor of `host`
    ///
    /// Candidates run from the nearest parent toward the apex, stopping
    /// before the last label. The host itself is never a candidate, so
    /// `bing.com` does not match a `bing.com` entry while `www.bing.com` does.
    pub fn lookup_ancestor(&self, host: &str) -> Option<&ReferrerRecord> {
        let labels: Vec<&str> = host.split('.').collect();
        (1..labels.len().saturating_sub(1)).find_map(|i| {
            let candidate = labels[i..].join(".");
            let hit = self.lookup(&candidate);
            tracing::trace!(host, candidate = %candidate, hit = hit.is_some(), "Registry lookup");
            hit
        })
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Check if the registry has no entries
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> ReferrerRegistry {
        ReferrerRegistry::from_json_str(
            r#"{
                "bing.com": {"type": "search", "name": "Bing"},
                "google.co.uk": {"type": "search", "name": "Google"},
                "Facebook.com": {"type": "social", "name": "Facebook"}
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn test_builtin_registry_loads() {
        let builtin = ReferrerRegistry::builtin();
        assert!(!builtin.is_empty());
        assert_eq!(
            builtin.lookup("bing.com"),
            Some(&ReferrerRecord::new(ReferrerType::Search, "Bing"))
        );
    }

    #[test]
    fn test_keys_are_lowercased() {
        let registry = registry();
        assert_eq!(registry.len(), 3);
        assert!(registry.lookup("facebook.com").is_some());
        assert!(registry.lookup("Facebook.com").is_none());
    }

    #[test]
    fn test_lookup_ancestor_skips_exact_host() {
        let registry = registry();
        assert_eq!(registry.lookup_ancestor("www.bing.com").unwrap().name, "Bing");
        assert_eq!(registry.lookup_ancestor("a.b.bing.com").unwrap().name, "Bing");
        assert!(registry.lookup_ancestor("bing.com").is_none());
        assert!(registry.lookup_ancestor("com").is_none());
        assert!(registry.lookup_ancestor("").is_none());
    }

    #[test]
    fn test_lookup_ancestor_stops_before_last_label() {
        let mut registry = ReferrerRegistry::new();
        registry
            .insert("co.uk", ReferrerRecord::new(ReferrerType::Search, "Too broad"))
            .unwrap();
        registry.records.insert("uk".to_string(), ReferrerRecord::new(ReferrerType::Search, "TLD"));
        assert!(registry.lookup_ancestor("example.uk").is_none());
        // candidates for www.google.co.uk are google.co.uk and co.uk
        assert_eq!(registry.lookup_ancestor("www.google.co.uk").unwrap().name, "Too broad");
        // for google.co.uk only co.uk is tried
        assert_eq!(registry.lookup_ancestor("google.co.uk").unwrap().name, "Too broad");
        // for bing.com nothing is tried
        assert!(registry.lookup_ancestor("bing.com").is_none());
    }

    #[test]
    fn test_invalid_registry_rejected() {
        let bad_key = ReferrerRegistry::from_json_str(
            r#"{"https://bing.com": {"type": "search", "name": "Bing"}}"#,
        );
        assert!(matches!(bad_key, Err(Error::Registry(_))));

        let bad_type =
            ReferrerRegistry::from_json_str(r#"{"bing.com": {"type": "paid", "name": "Bing"}}"#);
        assert!(matches!(bad_type, Err(Error::Registry(_))));

        let bad_json = ReferrerRegistry::from_json_str("[1, 2]");
        assert!(matches!(bad_json, Err(Error::Serialization(_))));
    }

    #[test]
    fn test_from_path_missing_file() {
        let result = ReferrerRegistry::from_path("/nonexistent/referrers.json");
        assert!(matches!(result, Err(Error::Registry(_))));
    }
}
