//! Referrer-parsing row transform

use serde_json::Value;

use crate::models::row::{str_field, Row};
use crate::referrer::ReferrerRegistry;

/// Replace a row's referrer display fields with their classification
///
/// The referrer is read from a non-empty `name`, falling back to `referrer`.
/// `name` gets the display name, `referrer` keeps the raw value and `domain`
/// the classified domain. Rows with neither field are returned as they are,
/// as are rows whose `name`/`domain` already match a classification of
/// their `referrer`.
pub fn parse_referrer_row(row: &Row, registry: &ReferrerRegistry, site_domain: Option<&str>) -> Row {
    if is_already_parsed(row, registry, site_domain) {
        return row.clone();
    }

    let raw = match non_empty(row, "name").or_else(|| non_empty(row, "referrer")) {
        Some(raw) => raw.to_string(),
        None => return row.clone(),
    };

    let parsed = registry.classify(Some(&raw), site_domain);

    let mut out = row.clone();
    out.insert("name".to_string(), Value::String(parsed.name));
    out.insert("referrer".to_string(), Value::String(raw));
    out.insert("domain".to_string(), Value::String(parsed.domain));
    out
}

fn non_empty<'a>(row: &'a Row, field: &str) -> Option<&'a str> {
    str_field(row, field).filter(|value| !value.is_empty())
}

/// A previous pass left `name`/`domain` equal to what `referrer` classifies to
fn is_already_parsed(row: &Row, registry: &ReferrerRegistry, site_domain: Option<&str>) -> bool {
    let (Some(name), Some(referrer), Some(domain)) = (
        str_field(row, "name"),
        str_field(row, "referrer"),
        str_field(row, "domain"),
    ) else {
        return false;
    };

    let parsed = registry.classify(Some(referrer), site_domain);
    parsed.name == name && parsed.domain == domain
}
