use crate::url::{canonicalize, CanonicalUrl, Scheme};
use crate::UrlError;
use std::fmt;

/// The origin and path prefix a discovery run is confined to
///
/// A URL is in scope when it has the same scheme and authority as the scope
/// and its path equals the scope path or continues it at a `/` boundary.
/// `https://a.com/blog` therefore contains `https://a.com/blog/post` but not
/// `https://a.com/blogger` or `https://a.com.evil.net/blog`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlScope {
    scheme: Scheme,
    authority: String,
    path_prefix: String,
}

impl UrlScope {
    /// Scopes a crawl to everything at or below the seed
    pub fn from_seed(seed: &CanonicalUrl) -> Self {
        Self {
            scheme: seed.scheme(),
            authority: seed.authority().to_string(),
            path_prefix: seed.path().to_string(),
        }
    }

    /// Scopes a run to the whole origin of `url`
    pub fn origin_of(url: &CanonicalUrl) -> Self {
        Self {
            scheme: url.scheme(),
            authority: url.authority().to_string(),
            path_prefix: "/".to_string(),
        }
    }

    /// Parses a domain filter such as `https://example.com` or
    /// `https://example.com/docs`
    ///
    /// # Examples
    ///
    /// ```
    /// use url_scout::url::UrlScope;
    ///
    /// let scope = UrlScope::parse("https://example.com/docs/").unwrap();
    /// assert!(scope.contains(&"https://example.com/docs/intro".parse().unwrap()));
    /// assert!(!scope.contains(&"https://example.com/blog".parse().unwrap()));
    /// ```
    pub fn parse(filter: &str) -> Result<Self, UrlError> {
        canonicalize(filter, None).map(|url| Self::from_seed(&url))
    }

    /// Checks whether a canonical URL falls inside this scope
    pub fn contains(&self, url: &CanonicalUrl) -> bool {
        if url.scheme() != self.scheme || url.authority() != self.authority {
            return false;
        }

        if self.path_prefix == "/" {
            return true;
        }

        match url.path().strip_prefix(self.path_prefix.as_str()) {
            Some(rest) => rest.is_empty() || rest.starts_with('/'),
            None => false,
        }
    }
}

impl fmt::Display for UrlScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}://{}{}", self.scheme, self.authority, self.path_prefix)
    }
}
