//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the crawler and the sitemap
//! resolver, including:
//! - Building HTTP clients with browser-like headers
//! - Redirect following with a bounded hop count
//! - Classifying responses into a body or a typed failure

use crate::config::HttpConfig;
use crate::url::CanonicalUrl;
use crate::ScoutError;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE};
use reqwest::{redirect::Policy, Client, StatusCode};
use std::fmt;
use std::time::Duration;

const ACCEPT_VALUE: &str = "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8";
const ACCEPT_LANGUAGE_VALUE: &str = "en-US,en;q=0.5";

/// Why a fetch did not produce a document
///
/// Transport failures (DNS, timeout, refused connection, TLS, too many
/// redirects) all collapse into `ConnectionFailed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FetchErrorKind {
    ConnectionFailed,
    NotFound,
    Forbidden,
    ClientError(u16),
    ServerError(u16),
}

impl FetchErrorKind {
    /// Maps a final response status to a failure, or `None` for 1xx-3xx
    pub fn from_status(status: StatusCode) -> Option<Self> {
        match status.as_u16() {
            404 => Some(Self::NotFound),
            403 => Some(Self::Forbidden),
            code @ 400..=499 => Some(Self::ClientError(code)),
            code if code >= 500 => Some(Self::ServerError(code)),
            _ => None,
        }
    }
}

impl fmt::Display for FetchErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ConnectionFailed => write!(f, "Connection failed"),
            Self::NotFound => write!(f, "Page not found (404)"),
            Self::Forbidden => write!(f, "Access forbidden (403)"),
            Self::ClientError(code) => write!(f, "Client error ({})", code),
            Self::ServerError(code) => write!(f, "Server error ({})", code),
        }
    }
}

/// Result of a fetch operation
#[derive(Debug)]
pub enum FetchResult {
    /// The server returned a document
    Success {
        /// Raw response body
        body: Vec<u8>,
        /// Final URL after redirects
        final_url: String,
    },

    /// The fetch failed; nothing to extract
    Failed { reason: FetchErrorKind },
}

impl FetchResult {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    /// The body decoded as UTF-8, with invalid sequences replaced
    pub fn body_text(&self) -> Option<String> {
        match self {
            Self::Success { body, .. } => Some(String::from_utf8_lossy(body).into_owned()),
            Self::Failed { .. } => None,
        }
    }

    pub fn error_kind(&self) -> Option<FetchErrorKind> {
        match self {
            Self::Success { .. } => None,
            Self::Failed { reason } => Some(*reason),
        }
    }
}

/// Builds an HTTP client with proper configuration
///
/// # Arguments
///
/// * `config` - The HTTP configuration
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(reqwest::Error)` - Failed to build client
///
/// # Example
///
/// ```no_run
/// use url_scout::config::HttpConfig;
/// use url_scout::crawler::build_http_client;
///
/// let client = build_http_client(&HttpConfig::default()).unwrap();
/// ```
pub fn build_http_client(config: &HttpConfig) -> Result<Client, reqwest::Error> {
    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, HeaderValue::from_static(ACCEPT_VALUE));
    headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static(ACCEPT_LANGUAGE_VALUE));

    let redirect = if config.max_redirects == 0 {
        Policy::none()
    } else {
        Policy::limited(config.max_redirects)
    };

    Client::builder()
        .user_agent(config.user_agent.clone())
        .default_headers(headers)
        .timeout(Duration::from_secs(config.timeout_secs))
        .redirect(redirect)
        .danger_accept_invalid_certs(config.accept_invalid_certs)
        .gzip(true)
        .brotli(true)
        .build()
}

/// Issues single GET requests and classifies the outcome
///
/// Cloning is cheap; clones share the underlying connection pool.
#[derive(Debug, Clone)]
pub struct Fetcher {
    client: Client,
}

impl Fetcher {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Builds a fetcher with a client configured from `config`
    pub fn from_config(config: &HttpConfig) -> Result<Self, reqwest::Error> {
        Ok(Self::new(build_http_client(config)?))
    }

    /// Fetches a URL
    ///
    /// # Classification
    ///
    /// | Condition | Result |
    /// |-----------|--------|
    /// | 1xx-3xx final status | Success |
    /// | HTTP 404 | NotFound |
    /// | HTTP 403 | Forbidden |
    /// | Other 4xx | ClientError |
    /// | 5xx | ServerError |
    /// | Transport or body read failure | ConnectionFailed |
    ///
    /// Never mutates crawl state; the caller decides what a failure means.
    pub async fn fetch(&self, url: &CanonicalUrl) -> FetchResult {
        let target = url.to_string();

        let response = match self.client.get(&target).send().await {
            Ok(response) => response,
            Err(e) => {
                tracing::debug!("Transport failure for {}: {}", target, e);
                return FetchResult::Failed {
                    reason: FetchErrorKind::ConnectionFailed,
                };
            }
        };

        let status = response.status();
        let final_url = response.url().to_string();

        if let Some(reason) = FetchErrorKind::from_status(status) {
            tracing::debug!("{} returned {}", target, status);
            return FetchResult::Failed { reason };
        }

        match response.bytes().await {
            Ok(body) => {
                tracing::trace!("Fetched {} ({} bytes) from {}", target, body.len(), final_url);
                FetchResult::Success {
                    body: body.to_vec(),
                    final_url,
                }
            }
            Err(e) => {
                tracing::debug!("Failed to read body of {}: {}", target, e);
                FetchResult::Failed {
                    reason: FetchErrorKind::ConnectionFailed,
                }
            }
        }
    }

    /// Checks that `url` answers with a document before a run starts
    ///
    /// This is the only fetch whose failure is fatal.
    pub async fn probe(&self, url: &CanonicalUrl) -> Result<(), ScoutError> {
        match self.fetch(url).await {
            FetchResult::Success { .. } => Ok(()),
            FetchResult::Failed { reason } => Err(ScoutError::Unreachable {
                url: url.to_string(),
                reason,
            }),
        }
    }
}
