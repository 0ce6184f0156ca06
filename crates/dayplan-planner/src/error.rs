//! Error types for the planner.

use thiserror::Error;

/// Errors from the AI sort round trip.
///
/// From the caller's point of view every variant means the same thing: the
/// sort failed and no plan is available. The variants exist so logs can say
/// which leg of the round trip fell over; callers must not branch on them
/// and must leave the task list untouched.
#[derive(Debug, Error)]
pub enum PlannerError {
    /// API key or other required configuration is missing.
    #[error("planner not configured: {0}")]
    Configuration(String),

    /// The completion endpoint could not be reached or rejected the call.
    #[error("completion request failed: {0}")]
    Completion(String),

    /// The model's reply did not contain parseable JSON.
    #[error("model reply was not valid JSON: {0}")]
    UnparseableReply(String),
}

/// Result type for planner operations.
pub type Result<T> = std::result::Result<T, PlannerError>;
