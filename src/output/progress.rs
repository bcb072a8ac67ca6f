//! Live progress line shown while a run is in flight

use indicatif::{ProgressBar, ProgressStyle};
use std::io::IsTerminal;
use std::time::Duration;

/// Single-line progress counter
///
/// Wraps an optional `indicatif` spinner. When disabled (quiet mode, or
/// stderr is not a terminal) every method is a no-op, except `println`
/// which falls back to plain stderr so verbose errors are still shown.
#[derive(Debug, Clone)]
pub struct ProgressReporter {
    bar: Option<ProgressBar>,
}

impl ProgressReporter {
    /// Creates a spinner unless `quiet` is set or stderr is not a terminal
    pub fn new(quiet: bool) -> Self {
        if quiet || !std::io::stderr().is_terminal() {
            return Self::hidden();
        }

        let bar = ProgressBar::new_spinner();
        bar.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.green} [{elapsed}] {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        bar.enable_steady_tick(Duration::from_millis(120));

        Self { bar: Some(bar) }
    }

    /// A reporter that draws nothing
    pub fn hidden() -> Self {
        Self { bar: None }
    }

    pub fn is_visible(&self) -> bool {
        self.bar.is_some()
    }

    /// Redraws the counter line
    pub fn update(&self, visited: usize, pending: usize, found: usize, errors: usize) {
        if let Some(bar) = &self.bar {
            bar.set_message(format!(
                "Pages visited: {} | Pending: {} | URLs found: {} | Errors: {}",
                visited, pending, found, errors
            ));
        }
    }

    /// Prints a line above the spinner without garbling it
    pub fn println(&self, line: impl AsRef<str>) {
        match &self.bar {
            Some(bar) => bar.println(line.as_ref()),
            None => eprintln!("{}", line.as_ref()),
        }
    }

    /// Clears the spinner once the run is over
    pub fn finish(&self) {
        if let Some(bar) = &self.bar {
            bar.finish_and_clear();
        }
    }
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self::hidden()
    }
}
