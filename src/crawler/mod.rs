//! Crawler module for link-following URL discovery
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching with outcome classification
//! - Link candidate extraction from raw HTML
//! - The frontier (pending tasks, visited set, counters)
//! - Overall crawl coordination

mod coordinator;
mod fetcher;
mod frontier;
mod links;

pub use coordinator::{CrawlOptions, Crawler};
pub use fetcher::{build_http_client, FetchErrorKind, FetchResult, Fetcher};
pub use frontier::{Admission, CrawlTask, Frontier};
pub use links::extract_links;
