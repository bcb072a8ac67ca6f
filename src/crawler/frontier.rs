//! Crawl frontier: pending tasks, the visited set and run counters
//!
//! The frontier is owned by the coordinating task for one run and never
//! shared, so none of its operations need locking. Check-and-mark of the
//! visited set happens in [`Frontier::next_task`], before a fetch is
//! dispatched, which is what keeps a URL from being fetched twice even with
//! several fetches in flight.

use crate::state::TaskState;
use crate::url::CanonicalUrl;
use crate::Result;
use std::collections::HashSet;

/// A URL waiting for (or going through) a fetch
#[derive(Debug, Clone)]
pub struct CrawlTask {
    pub url: CanonicalUrl,

    /// Depth along the path that first discovered it; the seed is depth 0
    ///
    /// Not necessarily the shortest link distance: a later sighting from a
    /// shallower page is a duplicate and does not lower it.
    pub depth: u32,

    state: TaskState,
}

impl CrawlTask {
    pub fn new(url: CanonicalUrl, depth: u32) -> Self {
        Self {
            url,
            depth,
            state: TaskState::Pending,
        }
    }

    pub fn state(&self) -> TaskState {
        self.state
    }

    /// Moves the task to `next`, rejecting transitions the lifecycle forbids
    pub fn advance(&mut self, next: TaskState) -> Result<()> {
        self.state.transition(next)
    }
}

/// Outcome of offering a newly found link to the frontier
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Admission {
    /// First sighting; the caller must emit it to the sink
    Accepted,

    /// Already emitted earlier in this run
    Duplicate,

    /// Beyond the configured maximum depth
    TooDeep,
}

/// Traversal state for one crawl run
#[derive(Debug)]
pub struct Frontier {
    /// Tasks not yet dispatched; popped from the end (LIFO)
    pending: Vec<CrawlTask>,

    /// URLs that were dispatched for fetching; never removed
    visited: HashSet<CanonicalUrl>,

    /// URLs already emitted to the sink
    discovered: HashSet<CanonicalUrl>,

    max_depth: Option<u32>,

    fetched: usize,
    succeeded: usize,
    errors: usize,
}

impl Frontier {
    /// Creates a frontier holding only the seed task
    ///
    /// The seed is not counted as discovered: it is emitted only if some
    /// crawled page links back to it.
    pub fn new(seed: CanonicalUrl, max_depth: Option<u32>) -> Self {
        Self {
            pending: vec![CrawlTask::new(seed, 0)],
            visited: HashSet::new(),
            discovered: HashSet::new(),
            max_depth,
            fetched: 0,
            succeeded: 0,
            errors: 0,
        }
    }

    /// Takes the most recently added unvisited task and marks it visited
    ///
    /// The returned task is already in the `Fetching` state and counts as
    /// one fetch attempt. Returns `Ok(None)` once nothing is pending.
    pub fn next_task(&mut self) -> Result<Option<CrawlTask>> {
        while let Some(mut task) = self.pending.pop() {
            if !self.visited.insert(task.url.clone()) {
                tracing::trace!("Skipping already visited {}", task.url);
                continue;
            }

            task.advance(TaskState::Fetching)?;
            self.fetched += 1;
            return Ok(Some(task));
        }

        Ok(None)
    }

    /// Offers a link found on a page at depth `parent_depth`
    ///
    /// The depth of a URL is fixed by the first offer that accepts it.
    /// An accepted link is recorded as discovered and, unless it was
    /// already visited (only possible for the seed or a page in flight),
    /// queued for fetching.
    pub fn offer(&mut self, url: &CanonicalUrl, parent_depth: u32) -> Admission {
        let depth = parent_depth.saturating_add(1);
        if let Some(max_depth) = self.max_depth {
            if depth > max_depth {
                return Admission::TooDeep;
            }
        }

        if !self.discovered.insert(url.clone()) {
            return Admission::Duplicate;
        }

        if !self.visited.contains(url) {
            self.pending.push(CrawlTask::new(url.clone(), depth));
        }

        Admission::Accepted
    }

    pub fn record_success(&mut self) {
        self.succeeded += 1;
    }

    pub fn record_error(&mut self) {
        self.errors += 1;
    }

    pub fn is_visited(&self, url: &CanonicalUrl) -> bool {
        self.visited.contains(url)
    }

    /// Number of tasks waiting to be dispatched
    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    pub fn has_pending(&self) -> bool {
        !self.pending.is_empty()
    }

    /// Fetch attempts dispatched so far
    pub fn fetched(&self) -> usize {
        self.fetched
    }

    pub fn succeeded(&self) -> usize {
        self.succeeded
    }

    pub fn errors(&self) -> usize {
        self.errors
    }

    pub fn discovered(&self) -> usize {
        self.discovered.len()
    }
}
