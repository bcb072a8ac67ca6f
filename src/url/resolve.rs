//! Relative reference resolution
//!
//! Splits absolute URLs into parts and resolves relative references against a
//! canonical base. Path normalization happens afterwards, in one place, so the
//! output of this module may still contain dot segments.

use crate::url::{CanonicalUrl, Scheme};
use crate::UrlError;

/// URL components before host and path normalization
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct RawParts {
    pub scheme: Scheme,
    pub authority: String,
    pub path: String,
    pub query: Option<String>,
}

/// Splits an absolute `scheme://authority/path?query` string (no fragment)
pub(crate) fn split_absolute(url: &str) -> Result<RawParts, UrlError> {
    let (scheme, rest) = url
        .split_once(':')
        .ok_or_else(|| UrlError::Malformed(url.to_string()))?;
    let scheme =
        Scheme::parse(scheme).ok_or_else(|| UrlError::UnsupportedScheme(scheme.to_lowercase()))?;

    let rest = rest
        .strip_prefix("//")
        .ok_or_else(|| UrlError::Malformed(format!("expected '//' after scheme in {}", url)))?;

    Ok(split_network_path(scheme, rest))
}

/// Resolves a fragment-free reference against `base`
///
/// | Reference | Result |
/// |-----------|--------|
/// | `//host/path` | base scheme, new authority and path |
/// | `/path` | base scheme and authority |
/// | `?query` | base scheme, authority and path |
/// | empty | the base itself |
/// | `path` | joined onto the directory of the base path |
pub(crate) fn resolve_reference(reference: &str, base: &CanonicalUrl) -> Result<RawParts, UrlError> {
    if let Some(network_path) = reference.strip_prefix("//") {
        return Ok(split_network_path(base.scheme(), network_path));
    }

    let (path, query) = split_query(reference);

    let path = if path.starts_with('/') {
        path.to_string()
    } else if path.is_empty() {
        if query.is_none() {
            return Ok(RawParts {
                scheme: base.scheme(),
                authority: base.authority().to_string(),
                path: base.path().to_string(),
                query: base.query().map(str::to_string),
            });
        }
        base.path().to_string()
    } else {
        format!("{}/{}", base.directory().trim_end_matches('/'), path)
    };

    Ok(RawParts {
        scheme: base.scheme(),
        authority: base.authority().to_string(),
        path,
        query: query.map(str::to_string),
    })
}

/// Splits `authority/path?query` (the part after `//`)
fn split_network_path(scheme: Scheme, rest: &str) -> RawParts {
    let authority_end = rest.find(&['/', '?'][..]).unwrap_or(rest.len());
    let (authority, remainder) = rest.split_at(authority_end);
    let (path, query) = split_query(remainder);

    RawParts {
        scheme,
        authority: authority.to_string(),
        path: path.to_string(),
        query: query.map(str::to_string),
    }
}

fn split_query(reference: &str) -> (&str, Option<&str>) {
    match reference.split_once('?') {
        Some((path, query)) => (path, Some(query)),
        None => (reference, None),
    }
}
