//! State module for tracking crawl task progress
//!
//! # Components
//!
//! - `TaskState`: The lifecycle of a single crawl task (pending, fetching,
//!   extracted, failed)

mod task_state;

// Re-export main types
pub use task_state::TaskState;
