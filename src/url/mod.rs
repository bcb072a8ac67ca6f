//! URL handling module for url-scout
//!
//! This module provides the canonical URL value type, canonicalization of raw
//! link candidates (including relative resolution against a base URL), the
//! crawl scope check, and the page filters shared by the crawler and the
//! sitemap resolver.

mod filter;
mod normalize;
mod resolve;
mod scope;

use std::fmt;

// Re-export main functions
pub use filter::{is_file_url, is_special_protocol, is_page_candidate};
pub use normalize::canonicalize;
pub use scope::UrlScope;

/// URL schemes accepted by the canonicalizer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Scheme {
    Http,
    Https,
}

impl Scheme {
    /// Parses a scheme name case-insensitively
    pub fn parse(name: &str) -> Option<Self> {
        if name.eq_ignore_ascii_case("http") {
            Some(Self::Http)
        } else if name.eq_ignore_ascii_case("https") {
            Some(Self::Https)
        } else {
            None
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Http => "http",
            Self::Https => "https",
        }
    }

    /// The port implied by this scheme when none is given
    pub fn default_port(&self) -> u16 {
        match self {
            Self::Http => 80,
            Self::Https => 443,
        }
    }
}

impl fmt::Display for Scheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A normalized, comparable URL
///
/// Invariants upheld by [`canonicalize`], the only constructor:
/// - the scheme is `http` or `https`
/// - the authority is a lowercase host of at least three characters, with a
///   non-default port appended when present
/// - the path starts with `/`, contains no `.`/`..`/empty segments, and has
///   no trailing slash unless it is exactly `/`
/// - the fragment is gone; the query is kept verbatim when non-empty
///
/// Equality and hashing operate on these parts, so two raw strings that
/// canonicalize to the same value are the same URL for deduplication.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CanonicalUrl {
    scheme: Scheme,
    authority: String,
    path: String,
    query: Option<String>,
}

impl CanonicalUrl {
    pub(crate) fn from_parts(
        scheme: Scheme,
        authority: String,
        path: String,
        query: Option<String>,
    ) -> Self {
        Self {
            scheme,
            authority,
            path,
            query,
        }
    }

    pub fn scheme(&self) -> Scheme {
        self.scheme
    }

    /// Host plus optional port, e.g. `example.com` or `127.0.0.1:8080`
    pub fn authority(&self) -> &str {
        &self.authority
    }

    /// Host without the port
    pub fn host(&self) -> &str {
        match self.authority.rsplit_once(':') {
            Some((host, port)) if port.chars().all(|c| c.is_ascii_digit()) => host,
            _ => &self.authority,
        }
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn query(&self) -> Option<&str> {
        self.query.as_deref()
    }

    pub fn has_query(&self) -> bool {
        self.query.is_some()
    }

    /// The directory relative references are resolved against
    ///
    /// `/b/c/page` gives `/b/c`; a single-segment path or the root gives `/`.
    pub fn directory(&self) -> &str {
        match self.path.rfind('/') {
            Some(0) | None => "/",
            Some(idx) => &self.path[..idx],
        }
    }

    /// Converts to a `url::Url` for use with the HTTP client
    pub fn to_url(&self) -> Result<::url::Url, ::url::ParseError> {
        ::url::Url::parse(&self.to_string())
    }
}

impl fmt::Display for CanonicalUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}://{}{}", self.scheme, self.authority, self.path)?;
        if let Some(query) = &self.query {
            write!(f, "?{}", query)?;
        }
        Ok(())
    }
}

impl std::str::FromStr for CanonicalUrl {
    type Err = crate::UrlError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        canonicalize(s, None)
    }
}
