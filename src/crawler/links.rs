//! Link candidate extraction from raw HTML
//!
//! Links are found with an attribute scan rather than a DOM parse, so broken
//! or truncated markup still yields whatever `href` values it contains.
//! Candidates are returned raw; canonicalization and filtering happen
//! downstream.

use regex::Regex;
use std::sync::OnceLock;

/// Matches `href="..."`, `href='...'` and unquoted `href=...`
fn href_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"(?i)href\s*=\s*(?:["']([^"']*)["']|([^\s"'>]+))"#)
            .expect("href regex is valid")
    })
}

/// Lazily yields every `href` value in `html`, in document order
///
/// Empty and whitespace-only values are skipped. Duplicates are kept.
///
/// # Example
///
/// ```
/// use url_scout::crawler::extract_links;
///
/// let html = r#"<a href="/one">1</a> <a href=/two>2</a>"#;
/// let links: Vec<&str> = extract_links(html).collect();
/// assert_eq!(links, vec!["/one", "/two"]);
/// ```
pub fn extract_links(html: &str) -> impl Iterator<Item = &str> + '_ {
    href_regex()
        .captures_iter(html)
        .filter_map(|caps| caps.get(1).or_else(|| caps.get(2)))
        .map(|m| m.as_str())
        .filter(|href| !href.trim().is_empty())
}
