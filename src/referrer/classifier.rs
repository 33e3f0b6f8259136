//! Referrer URL classification
//!
//! `classify` is total: every input, including garbage, maps to a
//! `ParsedReferrer`. Parse failures degrade to a direct visit and are only
//! visible in trace logs.

use url::Url;

use super::{ParsedReferrer, ReferrerRegistry, ReferrerType};

/// Query parameters that mark an unregistered referrer as a search engine
const SEARCH_QUERY_PARAMS: [&str; 3] = ["q", "query", "search"];

/// Classify a referrer against the built-in registry
pub fn classify(referrer_url: Option<&str>, site_domain: Option<&str>) -> ParsedReferrer {
    ReferrerRegistry::builtin().classify(referrer_url, site_domain)
}

impl ReferrerRegistry {
    /// Classify a referrer URL seen on `site_domain`
    ///
    /// Missing input and self-referrals yield a direct result with an empty
    /// `url`; input that does not parse as an absolute URL yields a direct
    /// result that keeps the raw string in `url`.
    pub fn classify(&self, referrer_url: Option<&str>, site_domain: Option<&str>) -> ParsedReferrer {
        let raw = match referrer_url {
            Some(raw) if !raw.is_empty() => raw,
            _ => return ParsedReferrer::direct(""),
        };

        let parsed = match Url::parse(raw) {
            Ok(parsed) => parsed,
            Err(e) => {
                tracing::trace!(referrer = raw, error = %e, "Unparseable referrer treated as direct");
                return ParsedReferrer::direct(raw);
            },
        };

        let host = parsed.host_str().unwrap_or_default();

        if is_self_referral(host, site_domain) {
            return ParsedReferrer::direct("");
        }

        if let Some(record) = self.lookup_ancestor(host) {
            return ParsedReferrer {
                referrer_type: record.referrer_type,
                name: record.name.clone(),
                domain: host.to_string(),
                url: raw.to_string(),
            };
        }

        if has_search_query(&parsed) {
            return ParsedReferrer::from_host(ReferrerType::Search, host, raw);
        }

        ParsedReferrer::from_host(ReferrerType::Unknown, host, raw)
    }
}

/// Host is the site itself or one of its subdomains
fn is_self_referral(host: &str, site_domain: Option<&str>) -> bool {
    let site = match site_domain {
        Some(site) if !site.is_empty() => site.to_ascii_lowercase(),
        _ => return false,
    };

    host == site
        || host
            .strip_suffix(site.as_str())
            .is_some_and(|prefix| prefix.ends_with('.'))
}

fn has_search_query(url: &Url) -> bool {
    url.query_pairs()
        .any(|(key, _)| SEARCH_QUERY_PARAMS.iter().any(|param| key == *param))
}
