/// Crawl task state definitions
///
/// Every task follows `Pending -> Fetching -> {Extracted | Failed}`. There is
/// no way back: a task that left `Pending` is never pending again.
use crate::ScoutError;
use std::fmt;

/// Represents the current state of a crawl task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TaskState {
    // ===== Active States =====
    /// Discovered and waiting in the frontier
    Pending,

    /// Marked visited, fetch in flight
    Fetching,

    // ===== Terminal States =====
    /// Fetched successfully and its links were extracted
    Extracted,

    /// Fetch failed; an error record was written
    Failed,
}

impl TaskState {
    /// Returns true if this is a terminal state (no further processing needed)
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Extracted | Self::Failed)
    }

    /// Returns true if the task may still be processed
    pub fn is_active(&self) -> bool {
        !self.is_terminal()
    }

    /// Checks whether `self -> next` is an allowed transition
    pub fn can_transition_to(&self, next: TaskState) -> bool {
        matches!(
            (self, next),
            (Self::Pending, Self::Fetching)
                | (Self::Fetching, Self::Extracted)
                | (Self::Fetching, Self::Failed)
        )
    }

    /// Performs a transition, or reports it as an invariant violation
    pub fn transition(&mut self, next: TaskState) -> Result<(), ScoutError> {
        if !self.can_transition_to(next) {
            return Err(ScoutError::InvalidTransition {
                from: *self,
                to: next,
            });
        }
        *self = next;
        Ok(())
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Fetching => "fetching",
            Self::Extracted => "extracted",
            Self::Failed => "failed",
        }
    }
}

impl fmt::Display for TaskState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
