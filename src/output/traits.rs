//! Output sink trait and error types
//!
//! Discovered URLs are handed to a [`UrlSink`] the moment they are accepted,
//! so a run that dies halfway still leaves everything found so far behind.

use crate::url::CanonicalUrl;
use thiserror::Error;

/// Errors that can occur during output operations
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to replace output file: {0}")]
    Persist(#[from] tempfile::PersistError),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;

/// Destination for accepted page URLs
///
/// Implementations must make each accepted URL durable (or at least visible)
/// before returning; the engines call `accept` exactly once per URL.
pub trait UrlSink: Send {
    /// Records one accepted URL
    fn accept(&mut self, url: &CanonicalUrl) -> OutputResult<()>;

    /// Number of URLs accepted so far
    fn accepted(&self) -> usize;
}

/// In-memory sink, mostly useful for tests and library callers
#[derive(Debug, Default, Clone)]
pub struct MemorySink {
    urls: Vec<CanonicalUrl>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// URLs in the order they were accepted
    pub fn urls(&self) -> &[CanonicalUrl] {
        &self.urls
    }

    /// URLs rendered as strings, in acceptance order
    pub fn url_strings(&self) -> Vec<String> {
        self.urls.iter().map(ToString::to_string).collect()
    }

    pub fn into_urls(self) -> Vec<CanonicalUrl> {
        self.urls
    }
}

impl UrlSink for MemorySink {
    fn accept(&mut self, url: &CanonicalUrl) -> OutputResult<()> {
        self.urls.push(url.clone());
        Ok(())
    }

    fn accepted(&self) -> usize {
        self.urls.len()
    }
}
