//! Property-based tests for URL canonicalization
//!
//! Uses proptest to validate:
//! - Canonicalizing a canonical URL changes nothing, entities included
//! - Canonical URLs carry no fragment and no trailing slash past the root
//! - Resolved children of a page stay on the page's origin

use proptest::prelude::*;
use url_scout::{canonicalize, UrlScope};

fn scheme() -> impl Strategy<Value = &'static str> {
    prop::sample::select(vec!["http", "https", "HTTP", "Https"])
}

fn host() -> impl Strategy<Value = String> {
    ("[a-z]{3,10}", prop::sample::select(vec!["com", "org", "net"]), any::<bool>()).prop_map(
        |(name, tld, shout)| {
            let host = format!("{}.{}", name, tld);
            if shout {
                host.to_uppercase()
            } else {
                host
            }
        },
    )
}

fn path() -> impl Strategy<Value = String> {
    prop::collection::vec(prop::sample::select(vec!["a", "b", "..", ".", "", "x1"]), 0..6)
        .prop_map(|segments| format!("/{}", segments.join("/")))
}

fn raw_url() -> impl Strategy<Value = String> {
    (
        scheme(),
        host(),
        prop::option::of(1u16..=65535),
        path(),
        prop::option::of("[a-z0-9=]{0,8}"),
        prop::option::of("[a-z]{0,5}"),
    )
        .prop_map(|(scheme, host, port, path, query, fragment)| {
            let mut raw = format!("{}://{}", scheme, host);
            if let Some(port) = port {
                raw.push_str(&format!(":{}", port));
            }
            raw.push_str(&path);
            if let Some(query) = query {
                raw.push('?');
                raw.push_str(&query);
            }
            if let Some(fragment) = fragment {
                raw.push('#');
                raw.push_str(&fragment);
            }
            raw
        })
}

/// Query strings built from plain pairs and escaped ampersands, some of them
/// escaped twice
fn entity_query() -> impl Strategy<Value = String> {
    prop::collection::vec(
        prop::sample::select(vec!["a=1", "b", "&", "&amp;", "&amp;amp;", "&lt;", "copy=2", ";"]),
        1..6,
    )
    .prop_map(|parts| parts.concat())
}

proptest! {
    /// Property: canonicalize(canonicalize(x)) == canonicalize(x)
    #[test]
    fn prop_canonicalize_is_idempotent(raw in raw_url()) {
        let once = canonicalize(&raw, None).expect("Generated URL should canonicalize");
        let twice = canonicalize(&once.to_string(), None)
            .expect("Canonical URL should canonicalize");

        prop_assert_eq!(&once, &twice);
        prop_assert_eq!(once.to_string(), twice.to_string());
    }

    /// Property: whatever survives entity decoding is already a fixed point
    #[test]
    fn prop_entity_queries_are_stable(host in host(), query in entity_query()) {
        let raw = format!("https://{}/p?{}", host, query);
        if let Ok(once) = canonicalize(&raw, None) {
            let twice = canonicalize(&once.to_string(), None)
                .expect("Canonical URL should canonicalize");
            prop_assert_eq!(once.to_string(), twice.to_string());
        }
    }

    /// Property: no fragment, lowercase host, no trailing slash except root
    #[test]
    fn prop_canonical_form(raw in raw_url()) {
        let url = canonicalize(&raw, None).expect("Generated URL should canonicalize");
        let text = url.to_string();

        prop_assert!(!text.contains('#'));
        prop_assert_eq!(url.host(), url.host().to_lowercase());
        prop_assert!(url.path() == "/" || !url.path().ends_with('/'));
        prop_assert!(!url.path().split('/').any(|s| s == "." || s == ".."));
    }

    /// Property: relative references never leave the base origin
    #[test]
    fn prop_relative_children_stay_on_origin(
        base in raw_url(),
        reference in prop::collection::vec(prop::sample::select(vec!["a", "..", ".", "x1"]), 1..5),
    ) {
        let base = canonicalize(&base, None).expect("Generated URL should canonicalize");
        let child = canonicalize(&reference.join("/"), Some(&base))
            .expect("Relative reference should resolve");

        prop_assert!(UrlScope::origin_of(&base).contains(&child));
    }
}

#[test]
fn test_relative_resolution_examples() {
    let base = canonicalize("https://a.com/b/c/page", None).unwrap();

    let cases = [
        ("../x", "https://a.com/b/x"),
        ("./y", "https://a.com/b/c/y"),
        ("/z", "https://a.com/z"),
        ("y", "https://a.com/b/c/y"),
        ("?q=1", "https://a.com/b/c/page?q=1"),
        ("//other.com/p/", "https://other.com/p"),
        ("../../../../top", "https://a.com/top"),
    ];

    for (reference, expected) in cases {
        let resolved = canonicalize(reference, Some(&base)).unwrap();
        assert_eq!(resolved.to_string(), expected, "resolving {:?}", reference);
    }
}

#[test]
fn test_equivalent_spellings_collapse() {
    let spellings = [
        "https://Example.com/docs/",
        "https://example.com:443/docs",
        "https://example.com/docs#intro",
        "https://user@example.com//docs/./",
        " https://example.com/a/../docs ",
    ];

    let canonical: Vec<String> = spellings
        .iter()
        .map(|raw| canonicalize(raw, None).unwrap().to_string())
        .collect();

    assert!(canonical.iter().all(|url| url == "https://example.com/docs"));
}
