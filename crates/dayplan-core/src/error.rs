//! Error type for engine operations.

use dayplan_planner::PlannerError;
use dayplan_store::StoreError;
use thiserror::Error;

/// Anything a session operation can fail with.
///
/// All variants are user-recoverable: the transport layer maps each to a
/// specific message and re-displays the appropriate controls. The engine
/// never retries on its own and never tears down a session on error.
#[derive(Debug, Error)]
pub enum EngineError {
    /// A session store operation was rejected.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// The AI sort round trip failed; the task list is untouched.
    #[error(transparent)]
    Planner(#[from] PlannerError),
}

/// Result type for engine operations.
pub type Result<T> = std::result::Result<T, EngineError>;
