//! Run summaries and the categorized error report
//!
//! This module collects per-page failures during a run and renders the
//! post-run report: errors grouped by reason with a few example URLs each,
//! the overall error rate, and a short assessment of what that rate means.

use crate::crawler::FetchErrorKind;
use chrono::{DateTime, Utc};
use std::fmt;

/// Number of example URLs listed per error category
const EXAMPLES_PER_REASON: usize = 3;

/// Why a single URL could not be processed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorReason {
    /// The fetch itself failed
    Fetch(FetchErrorKind),

    /// A sitemap document could not be parsed
    InvalidXml,
}

impl fmt::Display for ErrorReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fetch(kind) => write!(f, "{}", kind),
            Self::InvalidXml => write!(f, "Invalid XML"),
        }
    }
}

impl From<FetchErrorKind> for ErrorReason {
    fn from(kind: FetchErrorKind) -> Self {
        Self::Fetch(kind)
    }
}

/// A failed URL and the reason it failed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorRecord {
    pub url: String,
    pub reason: ErrorReason,
}

impl ErrorRecord {
    pub fn new(url: impl Into<String>, reason: impl Into<ErrorReason>) -> Self {
        Self {
            url: url.into(),
            reason: reason.into(),
        }
    }
}

/// All errors that share one reason
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorGroup {
    pub reason: String,
    pub urls: Vec<String>,
}

/// How worrying the error rate of a run is
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorAssessment {
    /// A handful of errors, whatever the rate
    Negligible,
    /// Under 10%
    Low,
    /// Under 25%
    Moderate,
    /// 25% or more
    High,
}

impl ErrorAssessment {
    pub fn message(&self) -> &'static str {
        match self {
            Self::Negligible => "ℹ️  These errors are normal and can usually be ignored.",
            Self::Low => "ℹ️  Small number of errors - this is normal for most websites.",
            Self::Moderate => {
                "⚠️  Moderate number of errors - the site might have some broken links."
            }
            Self::High => {
                "⚠️  High error rate - there might be connectivity issues or many broken links."
            }
        }
    }

    pub fn is_warning(&self) -> bool {
        matches!(self, Self::Moderate | Self::High)
    }
}

/// Summary statistics for one discovery run
#[derive(Debug, Clone)]
pub struct CrawlSummary {
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,

    /// Fetch attempts, successful or not
    pub fetched: usize,

    /// Fetches that returned a usable document
    pub succeeded: usize,

    /// URLs written to the sink
    pub discovered: usize,

    /// Every per-URL failure, in the order it was recorded
    pub errors: Vec<ErrorRecord>,
}

impl CrawlSummary {
    /// Starts an empty summary stamped with the current time
    pub fn start() -> Self {
        Self {
            started_at: Utc::now(),
            finished_at: None,
            fetched: 0,
            succeeded: 0,
            discovered: 0,
            errors: Vec::new(),
        }
    }

    pub fn finish(&mut self) {
        self.finished_at = Some(Utc::now());
    }

    pub fn duration_seconds(&self) -> Option<i64> {
        self.finished_at
            .map(|finished| (finished - self.started_at).num_seconds())
    }

    pub fn error_count(&self) -> usize {
        self.errors.len()
    }

    /// Error rate in percent: errors over successful fetches plus errors
    pub fn error_rate(&self) -> f64 {
        let attempts = self.succeeded + self.errors.len();
        if attempts == 0 {
            return 0.0;
        }
        (self.errors.len() as f64 / attempts as f64) * 100.0
    }

    pub fn assessment(&self) -> ErrorAssessment {
        let rate = self.error_rate();
        if self.errors.len() < 5 {
            ErrorAssessment::Negligible
        } else if rate < 10.0 {
            ErrorAssessment::Low
        } else if rate < 25.0 {
            ErrorAssessment::Moderate
        } else {
            ErrorAssessment::High
        }
    }

    /// Groups errors by reason, in order of first occurrence
    pub fn error_groups(&self) -> Vec<ErrorGroup> {
        let mut groups: Vec<ErrorGroup> = Vec::new();

        for record in &self.errors {
            let reason = record.reason.to_string();
            match groups.iter_mut().find(|g| g.reason == reason) {
                Some(group) => group.urls.push(record.url.clone()),
                None => groups.push(ErrorGroup {
                    reason,
                    urls: vec![record.url.clone()],
                }),
            }
        }

        groups
    }
}

/// Formats the categorized error report
///
/// Returns an empty string when the run had no errors.
pub fn format_error_summary(summary: &CrawlSummary) -> String {
    if summary.errors.is_empty() {
        return String::new();
    }

    let mut out = String::new();
    out.push_str("--- Error Summary ---\n");

    for group in summary.error_groups() {
        let count = group.urls.len();
        out.push_str(&format!("\n{}: {} page(s)\n", group.reason, count));

        for url in group.urls.iter().take(EXAMPLES_PER_REASON) {
            out.push_str(&format!("  - {}\n", url));
        }

        if count > EXAMPLES_PER_REASON {
            out.push_str(&format!(
                "  ... and {} more\n",
                count - EXAMPLES_PER_REASON
            ));
        }
    }

    let total_errors = summary.errors.len();
    out.push_str(&format!(
        "\nError rate: {:.1}% ({} errors out of {} pages)\n",
        summary.error_rate(),
        total_errors,
        summary.succeeded + total_errors
    ));
    out.push_str(summary.assessment().message());
    out.push('\n');

    out
}

/// Prints run totals and the error report to stdout
pub fn print_summary(summary: &CrawlSummary) {
    println!("Total pages fetched: {}", summary.fetched);
    println!("Total URLs found: {}", summary.discovered);
    println!("Errors encountered: {}", summary.error_count());
    if let Some(seconds) = summary.duration_seconds() {
        println!("Duration: {}s", seconds);
    }

    let report = format_error_summary(summary);
    if !report.is_empty() {
        println!("\n{}", report);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary_with(succeeded: usize, errors: Vec<ErrorRecord>) -> CrawlSummary {
        let mut summary = CrawlSummary::start();
        summary.succeeded = succeeded;
        summary.fetched = succeeded + errors.len();
        summary.errors = errors;
        summary
    }

    fn not_found(path: &str) -> ErrorRecord {
        ErrorRecord::new(
            format!("https://a.com{}", path),
            FetchErrorKind::NotFound,
        )
    }

    #[test]
    fn test_error_rate() {
        let summary = summary_with(90, (0..10).map(|i| not_found(&format!("/{}", i))).collect());
        assert!((summary.error_rate() - 10.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_error_rate_without_attempts() {
        let summary = summary_with(0, vec![]);
        assert_eq!(summary.error_rate(), 0.0);
    }

    #[test]
    fn test_assessment_thresholds() {
        let few = summary_with(0, (0..4).map(|i| not_found(&format!("/{}", i))).collect());
        assert_eq!(few.assessment(), ErrorAssessment::Negligible);

        let low = summary_with(95, (0..5).map(|i| not_found(&format!("/{}", i))).collect());
        assert_eq!(low.assessment(), ErrorAssessment::Low);

        let moderate = summary_with(80, (0..20).map(|i| not_found(&format!("/{}", i))).collect());
        assert_eq!(moderate.assessment(), ErrorAssessment::Moderate);

        let high = summary_with(10, (0..10).map(|i| not_found(&format!("/{}", i))).collect());
        assert_eq!(high.assessment(), ErrorAssessment::High);
        assert!(high.assessment().is_warning());
    }

    #[test]
    fn test_error_groups_keep_first_seen_order() {
        let summary = summary_with(
            1,
            vec![
                ErrorRecord::new("https://a.com/x", FetchErrorKind::ServerError(500)),
                not_found("/a"),
                ErrorRecord::new("https://a.com/y", FetchErrorKind::ServerError(500)),
                ErrorRecord::new("https://a.com/map.xml", ErrorReason::InvalidXml),
            ],
        );

        let groups = summary.error_groups();
        assert_eq!(groups.len(), 3);
        assert_eq!(groups[0].reason, "Server error (500)");
        assert_eq!(groups[0].urls.len(), 2);
        assert_eq!(groups[1].reason, "Page not found (404)");
        assert_eq!(groups[2].reason, "Invalid XML");
    }

    #[test]
    fn test_format_lists_three_examples_and_remainder() {
        let summary = summary_with(5, (0..5).map(|i| not_found(&format!("/{}", i))).collect());
        let report = format_error_summary(&summary);

        assert!(report.contains("Page not found (404): 5 page(s)"));
        assert!(report.contains("  - https://a.com/0\n"));
        assert!(report.contains("  - https://a.com/2\n"));
        assert!(!report.contains("https://a.com/3"));
        assert!(report.contains("... and 2 more"));
        assert!(report.contains("Error rate: 50.0% (5 errors out of 10 pages)"));
    }

    #[test]
    fn test_format_empty_when_no_errors() {
        let summary = summary_with(3, vec![]);
        assert!(format_error_summary(&summary).is_empty());
    }
}
