//! url-scout: URL discovery for site mirrors
//!
//! This crate discovers every in-domain page of a site, either by following
//! hyperlinks from a seed URL or by recursively resolving sitemap files, and
//! streams a deduplicated, normalized, filtered list of page URLs to a sink.

pub mod config;
pub mod crawler;
pub mod output;
pub mod sitemap;
pub mod state;
pub mod url;

use thiserror::Error;

/// Main error type for url-scout operations
#[derive(Debug, Error)]
pub enum ScoutError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("URL error: {0}")]
    UrlError(#[from] UrlError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("Output error: {0}")]
    Output(#[from] output::OutputError),

    #[error("Could not connect to {url}: {reason}")]
    Unreachable {
        url: String,
        reason: crawler::FetchErrorKind,
    },

    #[error("Invalid state transition: {from:?} -> {to:?}")]
    InvalidTransition {
        from: state::TaskState,
        to: state::TaskState,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),
}

/// Reasons a raw string is rejected by the canonicalizer
///
/// Rejection is a normal filtering outcome during a crawl; these are only
/// surfaced to the user when the seed or sitemap URL itself is rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UrlError {
    #[error("URL is empty")]
    Empty,

    #[error("Looks like embedded script, not a URL: {0}")]
    ScriptLike(String),

    #[error("Illegal character {0:?} in URL")]
    IllegalCharacter(char),

    #[error("Backslash escape sequence in URL")]
    EscapeSequence,

    #[error("Special protocol is not crawlable: {0}")]
    SpecialScheme(String),

    #[error("Only HTTP and HTTPS schemes are supported, got: {0}")]
    UnsupportedScheme(String),

    #[error("Relative URL without a base: {0}")]
    MissingBase(String),

    #[error("Missing host in URL")]
    MissingHost,

    #[error("Host is too short: {0}")]
    HostTooShort(String),

    #[error("Malformed URL: {0}")]
    Malformed(String),
}

/// Result type alias for url-scout operations
pub type Result<T> = std::result::Result<T, ScoutError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for URL operations
pub type UrlResult<T> = std::result::Result<T, UrlError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{CrawlOptions, Crawler};
pub use output::{CrawlSummary, ErrorRecord, UrlSink};
pub use sitemap::SitemapResolver;
pub use state::TaskState;
pub use url::{canonicalize, CanonicalUrl, UrlScope};
