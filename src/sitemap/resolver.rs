//! Recursive sitemap resolution
//!
//! Walks a sitemap (or sitemap index) depth-first in document order and
//! writes every in-scope page URL to the sink. All state shared across the
//! recursion lives in an explicit [`SitemapWalk`] passed down by reference,
//! so the URL ceiling holds across every sub-sitemap of the run.

use crate::crawler::{FetchResult, Fetcher};
use crate::output::{CrawlSummary, ErrorReason, ErrorRecord, ProgressReporter, UrlSink};
use crate::sitemap::document::SitemapDocument;
use crate::url::{canonicalize, is_page_candidate, CanonicalUrl, UrlScope};
use crate::Result;
use futures::future::BoxFuture;
use std::collections::HashSet;

/// Accumulated state of one sitemap walk
#[derive(Debug, Default)]
pub struct SitemapWalk {
    /// Page URLs already written to the sink
    visited_pages: HashSet<CanonicalUrl>,

    /// Sitemap documents already fetched (cycle guard)
    visited_sitemaps: HashSet<CanonicalUrl>,

    /// Page URLs accepted so far, compared against the ceiling
    accepted: usize,

    /// Sitemap documents fetched
    fetched: usize,

    /// Sitemap documents fetched and parsed
    succeeded: usize,

    errors: Vec<ErrorRecord>,
}

impl SitemapWalk {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn accepted(&self) -> usize {
        self.accepted
    }

    pub fn fetched(&self) -> usize {
        self.fetched
    }

    pub fn errors(&self) -> &[ErrorRecord] {
        &self.errors
    }

    pub fn has_visited_sitemap(&self, url: &CanonicalUrl) -> bool {
        self.visited_sitemaps.contains(url)
    }

    /// Folds the walk into a run summary
    fn into_summary(self, mut summary: CrawlSummary) -> CrawlSummary {
        summary.fetched = self.fetched;
        summary.succeeded = self.succeeded;
        summary.discovered = self.accepted;
        summary.errors = self.errors;
        summary.finish();
        summary
    }
}

/// Sitemap-driven discovery engine
pub struct SitemapResolver {
    fetcher: Fetcher,
    max_depth: u32,
    verbose_errors: bool,
    progress: ProgressReporter,
}

impl SitemapResolver {
    /// Creates a resolver that follows index files at most `max_depth`
    /// levels below the starting sitemap
    pub fn new(fetcher: Fetcher, max_depth: u32) -> Self {
        Self {
            fetcher,
            max_depth,
            verbose_errors: false,
            progress: ProgressReporter::hidden(),
        }
    }

    pub fn with_verbose_errors(mut self, verbose_errors: bool) -> Self {
        self.verbose_errors = verbose_errors;
        self
    }

    pub fn with_progress(mut self, progress: ProgressReporter) -> Self {
        self.progress = progress;
        self
    }

    /// Resolves `url` into page URLs
    ///
    /// Pages must fall inside `scope` and pass the file-extension and
    /// special-protocol filters. At most `max_urls` pages are accepted.
    /// Fetch and parse failures are recorded in the summary and never abort
    /// the walk.
    ///
    /// # Returns
    ///
    /// * `Ok(CrawlSummary)` - The walk finished, possibly with errors
    /// * `Err(ScoutError)` - The sink failed
    pub async fn resolve(
        &self,
        url: &CanonicalUrl,
        scope: &UrlScope,
        max_urls: usize,
        sink: &mut dyn UrlSink,
    ) -> Result<CrawlSummary> {
        let summary = CrawlSummary::start();
        let mut walk = SitemapWalk::new();

        tracing::info!("Resolving sitemap {} (scope {}, max {} URLs)", url, scope, max_urls);

        self.walk(url.clone(), 0, scope, max_urls, &mut walk, sink)
            .await?;

        let summary = walk.into_summary(summary);
        tracing::info!(
            "Sitemap resolution complete: {} sitemaps fetched, {} URLs found, {} errors",
            summary.fetched,
            summary.discovered,
            summary.error_count()
        );

        Ok(summary)
    }

    /// Resolves one sitemap document, recursing into index entries
    fn walk<'a>(
        &'a self,
        url: CanonicalUrl,
        depth: u32,
        scope: &'a UrlScope,
        max_urls: usize,
        walk: &'a mut SitemapWalk,
        sink: &'a mut dyn UrlSink,
    ) -> BoxFuture<'a, Result<()>> {
        Box::pin(async move {
            if walk.accepted >= max_urls {
                return Ok(());
            }

            if !walk.visited_sitemaps.insert(url.clone()) {
                tracing::debug!("Sitemap {} already resolved, skipping", url);
                return Ok(());
            }

            tracing::debug!("Fetching sitemap {} (depth {})", url, depth);
            walk.fetched += 1;

            let document = match self.fetcher.fetch(&url).await {
                FetchResult::Failed { reason } => {
                    self.record_error(walk, &url, reason.into());
                    return Ok(());
                }
                FetchResult::Success { body, .. } => {
                    match SitemapDocument::parse(&String::from_utf8_lossy(&body)) {
                        Ok(document) => document,
                        Err(e) => {
                            tracing::debug!("{}: {}", url, e);
                            self.record_error(walk, &url, ErrorReason::InvalidXml);
                            return Ok(());
                        }
                    }
                }
            };
            walk.succeeded += 1;

            match document {
                SitemapDocument::Index(children) => {
                    tracing::debug!("{} is an index of {} sitemaps", url, children.len());

                    for loc in children {
                        if walk.accepted >= max_urls {
                            break;
                        }

                        let child = match canonicalize(&loc, Some(&url)) {
                            Ok(child) => child,
                            Err(e) => {
                                tracing::debug!("Skipping sitemap entry {:?}: {}", loc, e);
                                continue;
                            }
                        };

                        if depth + 1 > self.max_depth {
                            tracing::warn!(
                                "Not following {}: sitemap nesting exceeds {} levels",
                                child,
                                self.max_depth
                            );
                            continue;
                        }

                        self.walk(child, depth + 1, scope, max_urls, &mut *walk, &mut *sink)
                            .await?;
                    }
                }
                SitemapDocument::UrlSet(pages) => {
                    let before = walk.accepted;

                    for loc in pages {
                        if walk.accepted >= max_urls {
                            break;
                        }

                        let Ok(page) = canonicalize(&loc, Some(&url)) else {
                            continue;
                        };

                        if !is_page_candidate(&page, scope) {
                            continue;
                        }

                        if walk.visited_pages.insert(page.clone()) {
                            sink.accept(&page)?;
                            walk.accepted += 1;
                        }
                    }

                    tracing::debug!("{} added {} URLs", url, walk.accepted - before);
                }
            }

            self.progress
                .update(walk.fetched, 0, walk.accepted, walk.errors.len());
            Ok(())
        })
    }

    fn record_error(&self, walk: &mut SitemapWalk, url: &CanonicalUrl, reason: ErrorReason) {
        if self.verbose_errors {
            self.progress.println(format!("[ERROR] {}: {}", reason, url));
        }
        tracing::debug!("Failed sitemap {}: {}", url, reason);
        walk.errors.push(ErrorRecord::new(url.to_string(), reason));
    }
}
