//! Crawler coordinator - main crawl orchestration logic
//!
//! This module contains the traversal loop that coordinates:
//! - Dispatching frontier tasks to the fetcher
//! - Extracting, canonicalizing and scoping links from fetched pages
//! - Writing accepted URLs through to the sink
//! - Recording per-page failures without stopping the run

use crate::config::CrawlerConfig;
use crate::crawler::fetcher::{FetchResult, Fetcher};
use crate::crawler::frontier::{Admission, CrawlTask, Frontier};
use crate::crawler::links::extract_links;
use crate::output::{CrawlSummary, ErrorRecord, ProgressReporter, UrlSink};
use crate::state::TaskState;
use crate::url::{canonicalize, is_page_candidate, CanonicalUrl, UrlScope};
use crate::Result;
use futures::stream::{FuturesUnordered, StreamExt};

/// Limits and switches for one crawl run
#[derive(Debug, Clone)]
pub struct CrawlOptions {
    /// Hard cap on fetch attempts
    pub max_urls: usize,

    /// Maximum link depth from the seed; unbounded when `None`
    pub max_depth: Option<u32>,

    /// Fetches allowed in flight at once
    pub concurrency: usize,

    /// Print each failure as it happens
    pub verbose_errors: bool,
}

impl Default for CrawlOptions {
    fn default() -> Self {
        Self {
            max_urls: 10_000,
            max_depth: None,
            concurrency: 1,
            verbose_errors: false,
        }
    }
}

impl CrawlOptions {
    pub fn from_config(config: &CrawlerConfig, verbose_errors: bool) -> Self {
        Self {
            max_urls: config.max_urls,
            max_depth: config.max_depth,
            concurrency: config.concurrency,
            verbose_errors,
        }
    }
}

/// Link-following discovery engine
pub struct Crawler {
    fetcher: Fetcher,
    options: CrawlOptions,
    progress: ProgressReporter,
}

impl Crawler {
    /// Creates a crawler with no progress display
    pub fn new(fetcher: Fetcher, options: CrawlOptions) -> Self {
        Self {
            fetcher,
            options,
            progress: ProgressReporter::hidden(),
        }
    }

    pub fn with_progress(mut self, progress: ProgressReporter) -> Self {
        self.progress = progress;
        self
    }

    pub fn options(&self) -> &CrawlOptions {
        &self.options
    }

    /// Crawls every in-scope page reachable from `seed`
    ///
    /// # Algorithm
    ///
    /// 1. Dispatch tasks (most recently found first) while fewer than
    ///    `concurrency` fetches are in flight and the attempt cap allows
    /// 2. On failure, record an error and move on
    /// 3. On success, canonicalize each link against the page URL, keep the
    ///    in-scope non-file ones, and emit + enqueue first sightings
    /// 4. Stop when nothing is pending or in flight
    ///
    /// # Returns
    ///
    /// * `Ok(CrawlSummary)` - The run finished, possibly with page errors
    /// * `Err(ScoutError)` - The sink failed or a task broke its lifecycle
    pub async fn crawl(&self, seed: &CanonicalUrl, sink: &mut dyn UrlSink) -> Result<CrawlSummary> {
        let scope = UrlScope::from_seed(seed);
        let concurrency = self.options.concurrency.max(1);
        let mut frontier = Frontier::new(seed.clone(), self.options.max_depth);
        let mut summary = CrawlSummary::start();

        tracing::info!(
            "Starting crawl of {} (scope {}, max {} URLs)",
            seed,
            scope,
            self.options.max_urls
        );

        let fetcher = &self.fetcher;
        let mut in_flight = FuturesUnordered::new();

        loop {
            while in_flight.len() < concurrency && frontier.fetched() < self.options.max_urls {
                let Some(task) = frontier.next_task()? else {
                    break;
                };
                tracing::debug!("Fetching {} (depth {})", task.url, task.depth);
                in_flight.push(async move {
                    let result = fetcher.fetch(&task.url).await;
                    (task, result)
                });
            }

            let Some((task, result)) = in_flight.next().await else {
                break;
            };

            self.handle_result(task, result, &scope, &mut frontier, &mut summary, sink)?;

            self.progress.update(
                frontier.fetched(),
                frontier.pending_len(),
                frontier.discovered(),
                frontier.errors(),
            );
        }

        if frontier.has_pending() {
            tracing::info!(
                "Reached the limit of {} fetches with {} URLs still pending",
                self.options.max_urls,
                frontier.pending_len()
            );
        }

        summary.fetched = frontier.fetched();
        summary.succeeded = frontier.succeeded();
        summary.discovered = frontier.discovered();
        summary.finish();

        tracing::info!(
            "Crawl complete: {} pages fetched, {} URLs found, {} errors",
            summary.fetched,
            summary.discovered,
            summary.error_count()
        );

        Ok(summary)
    }

    /// Applies one finished fetch to the frontier, sink and summary
    fn handle_result(
        &self,
        mut task: CrawlTask,
        result: FetchResult,
        scope: &UrlScope,
        frontier: &mut Frontier,
        summary: &mut CrawlSummary,
        sink: &mut dyn UrlSink,
    ) -> Result<()> {
        match result {
            FetchResult::Failed { reason } => {
                task.advance(TaskState::Failed)?;
                frontier.record_error();

                if self.options.verbose_errors {
                    self.progress.println(format!("[ERROR] {}: {}", reason, task.url));
                }
                tracing::debug!("Failed {}: {}", task.url, reason);

                summary.errors.push(ErrorRecord::new(task.url.to_string(), reason));
            }
            FetchResult::Success { body, final_url } => {
                task.advance(TaskState::Extracted)?;
                frontier.record_success();

                // Relative links are relative to where the redirects ended
                let base = canonicalize(&final_url, None).unwrap_or_else(|_| task.url.clone());
                let html = String::from_utf8_lossy(&body);

                let mut accepted = 0usize;
                for raw in extract_links(&html) {
                    let candidate = match canonicalize(raw, Some(&base)) {
                        Ok(candidate) => candidate,
                        Err(e) => {
                            tracing::trace!("Rejected link {:?} on {}: {}", raw, task.url, e);
                            continue;
                        }
                    };

                    if !is_page_candidate(&candidate, scope) {
                        continue;
                    }

                    if frontier.offer(&candidate, task.depth) == Admission::Accepted {
                        sink.accept(&candidate)?;
                        accepted += 1;
                    }
                }

                tracing::debug!("Extracted {} new URLs from {}", accepted, task.url);
            }
        }

        Ok(())
    }
}
