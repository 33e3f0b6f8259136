//! URL-normalization row transform

use serde_json::Value;
use url::Url;

use crate::models::has_url_scheme;
use crate::models::row::{str_field, Row};

/// Origin used to resolve relative paths; only the pathname is kept
const PLACEHOLDER_ORIGIN: &str = "http://localhost";

/// Pathname of `path`, or `path` itself when it does not parse
pub fn clean_path(path: &str) -> String {
    let parsed = if has_url_scheme(path) {
        Url::parse(path)
    } else {
        Url::parse(PLACEHOLDER_ORIGIN).and_then(|base| base.join(path))
    };

    match parsed {
        Ok(url) => url.path().to_string(),
        Err(e) => {
            tracing::trace!(path, error = %e, "Path kept as-is");
            path.to_string()
        },
    }
}

/// Add `path_clean` to a row that has a string `path`
pub fn normalize_url_row(row: &Row) -> Row {
    let mut out = row.clone();
    if let Some(path) = str_field(row, "path") {
        out.insert("path_clean".to_string(), Value::String(clean_path(path)));
    }
    out
}
