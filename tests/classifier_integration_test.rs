//! Integration tests for referrer classification
//!
//! These run against the built-in registry, the same table the CLI uses
//! when no registry path is configured.

use pretty_assertions::assert_eq;
use proptest::prelude::*;
use statforge::{classify, ParsedReferrer, ReferrerRegistry, ReferrerType};

fn direct_empty() -> ParsedReferrer {
    ParsedReferrer {
        referrer_type: ReferrerType::Direct,
        name: "Direct".to_string(),
        domain: String::new(),
        url: String::new(),
    }
}

#[test]
fn test_missing_and_empty_referrers_are_identical() {
    assert_eq!(classify(None, None), direct_empty());
    assert_eq!(classify(Some(""), None), direct_empty());
    assert_eq!(classify(None, None), classify(Some(""), None));
}

#[test]
fn test_subdomain_self_referral() {
    for url in [
        "https://sub.example.com/x",
        "https://sub.example.com/x?q=shoes",
        "https://sub.example.com/deep/path#frag",
    ] {
        assert_eq!(classify(Some(url), Some("example.com")), direct_empty(), "{url}");
    }
}

#[test]
fn test_registered_search_engine() {
    let url = "https://www.bing.com/?q=shoes";
    assert_eq!(
        classify(Some(url), None),
        ParsedReferrer {
            referrer_type: ReferrerType::Search,
            name: "Bing".to_string(),
            domain: "www.bing.com".to_string(),
            url: url.to_string(),
        }
    );
}

#[test]
fn test_unregistered_search_engine() {
    let url = "https://search.unknown-engine.test/?q=x";
    assert_eq!(
        classify(Some(url), None),
        ParsedReferrer {
            referrer_type: ReferrerType::Search,
            name: "search.unknown-engine.test".to_string(),
            domain: "search.unknown-engine.test".to_string(),
            url: url.to_string(),
        }
    );
}

#[test]
fn test_malformed_referrer_keeps_url() {
    assert_eq!(
        classify(Some("not a url"), None),
        ParsedReferrer {
            referrer_type: ReferrerType::Direct,
            name: "Direct".to_string(),
            domain: String::new(),
            url: "not a url".to_string(),
        }
    );
}

#[test]
fn test_social_and_email_entries() {
    let social = classify(Some("https://l.facebook.com/l.php?u=x"), Some("shop.test"));
    assert_eq!(social.referrer_type, ReferrerType::Social);
    assert_eq!(social.name, "Facebook");
    assert_eq!(social.domain, "l.facebook.com");

    let email = classify(Some("https://weekly.substack.com/p/issue-12"), Some("shop.test"));
    assert_eq!(email.referrer_type, ReferrerType::Email);
    assert_eq!(email.name, "Substack");
}

#[test]
fn test_custom_registry_file_shape() {
    let registry = ReferrerRegistry::from_json_str(
        r#"{"example-news.test": {"type": "social", "name": "Example News"}}"#,
    )
    .unwrap();

    let parsed = registry.classify(Some("https://m.example-news.test/story"), None);
    assert_eq!(parsed.name, "Example News");
    assert_eq!(parsed.domain, "m.example-news.test");

    // the built-in entries are not part of a custom table
    let bing = registry.classify(Some("https://www.bing.com/"), None);
    assert_eq!(bing.referrer_type, ReferrerType::Unknown);
}

proptest! {
    #[test]
    fn prop_classify_is_deterministic(
        url in prop_oneof![
            ".*",
            "https?://[a-z]{1,8}(\\.[a-z]{1,8}){0,3}(/[a-z0-9]{0,6})?(\\?(q|query|search|ref)=[a-z]{0,4})?",
        ],
        site in proptest::option::of("[a-z]{1,8}\\.(com|test)"),
    ) {
        let first = classify(Some(&url), site.as_deref());
        let second = classify(Some(&url), site.as_deref());
        prop_assert_eq!(first, second);
    }

    #[test]
    fn prop_direct_results_have_no_domain(url in ".*") {
        let parsed = classify(Some(&url), Some("shop.test"));
        if parsed.referrer_type == ReferrerType::Direct {
            prop_assert_eq!(parsed.name, "Direct");
            prop_assert_eq!(parsed.domain, "");
        }
    }
}
