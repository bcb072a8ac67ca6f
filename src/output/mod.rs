//! Output module for discovered URLs and run reports
//!
//! This module handles:
//! - Streaming accepted URLs to a sink (file or memory) as they are found
//! - The query-string post-pass over the finished URL file
//! - The live progress line and the post-run error summary

mod file_sink;
mod progress;
mod summary;
mod traits;

pub use file_sink::{
    count_urls, finalize, remove_output, strip_query_urls, FileSink, FinalizeOutcome,
    QueryFilterOutcome,
};
pub use progress::ProgressReporter;
pub use summary::{
    format_error_summary, print_summary, CrawlSummary, ErrorAssessment, ErrorGroup, ErrorReason,
    ErrorRecord,
};
pub use traits::{MemorySink, OutputError, OutputResult, UrlSink};
