//! Validation and normalization helpers for StatForge models
//!
//! Domain and URL-shape checks shared by the registry loader, the config
//! layer and the URL-normalization plugin.

use regex::Regex;
use std::sync::OnceLock;

use super::error::{ValidationError, ValidationErrorKind};

static DOMAIN_REGEX: OnceLock<Regex> = OnceLock::new();
static SCHEME_REGEX: OnceLock<Regex> = OnceLock::new();

/// Get or initialize the bare-domain regex pattern
fn domain_regex() -> &'static Regex {
    DOMAIN_REGEX.get_or_init(|| {
        Regex::new(r"^([a-z0-9]([a-z0-9-]*[a-z0-9])?\.)+[a-z0-9]([a-z0-9-]*[a-z0-9])?$")
            .expect("Invalid domain regex pattern")
    })
}

/// Get or initialize the URL scheme regex pattern
fn scheme_regex() -> &'static Regex {
    SCHEME_REGEX.get_or_init(|| {
        Regex::new(r"^[a-zA-Z][a-zA-Z0-9+.\-]*://").expect("Invalid scheme regex pattern")
    })
}

/// Whether a string starts with a URL scheme such as `https://`
pub fn has_url_scheme(value: &str) -> bool {
    scheme_regex().is_match(value)
}

/// Validate a referrer registry key, returning it lowercased
pub fn validate_registry_domain(domain: &str) -> Result<String, ValidationError> {
    let lowered = domain.trim().to_ascii_lowercase();

    if lowered.is_empty() {
        return Err(ValidationError::new(
            ValidationErrorKind::RequiredField,
            "registry",
        ));
    }

    if !domain_regex().is_match(&lowered) {
        return Err(ValidationError::with_context(
            ValidationErrorKind::InvalidDomain,
            "registry",
            format!("'{}' is not a bare domain", domain),
        ));
    }

    Ok(lowered)
}

/// Normalize a configured site domain
///
/// Trims, lowercases and strips any scheme, port or path so the value can be
/// compared against parsed referrer hostnames. Blank values become `None`.
pub fn validate_site_domain(site_domain: Option<String>) -> Option<String> {
    site_domain.and_then(|raw| {
        let trimmed = raw.trim().to_ascii_lowercase();
        let without_scheme = match trimmed.find("://") {
            Some(pos) if has_url_scheme(&trimmed) => &trimmed[pos + 3..],
            _ => trimmed.as_str(),
        };
        let host = without_scheme
            .split(['/', '?', '#'])
            .next()
            .unwrap_or_default();
        let host = host.split(':').next().unwrap_or_default();

        if host.is_empty() {
            None
        } else {
            Some(host.to_string())
        }
    })
}
