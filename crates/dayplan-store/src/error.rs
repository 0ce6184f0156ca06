//! Error types for session store operations.

use std::path::PathBuf;
use thiserror::Error;

/// User-recoverable errors raised by session operations.
///
/// None of these are fatal: the presentation layer turns each variant into a
/// specific user-visible message, and the owning session survives every one
/// of them.
#[derive(Debug, Error)]
pub enum StoreError {
    /// No session exists for the owner, or the list is empty where a
    /// non-empty list is required.
    #[error("no active task list")]
    NoActiveSession,

    /// A task index fell outside the current list.
    #[error("task index {index} out of range (list has {len} tasks)")]
    IndexOutOfRange { index: usize, len: usize },

    /// Supplied text trimmed down to nothing.
    #[error("text must not be empty")]
    EmptyText,

    /// Supplied text exceeded the allowed length.
    #[error("text too long (limit {limit} characters)")]
    TextTooLong { limit: usize },

    /// A multi-step operation was expected to be pending, but no edit
    /// buffer was present.
    #[error("no pending operation")]
    NoPendingOperation,
}

/// Result type for session store operations.
pub type Result<T> = std::result::Result<T, StoreError>;

/// Errors from the at-rest JSON layer.
///
/// These never surface to users: persist failures are logged and the
/// in-memory operation succeeds regardless.
#[derive(Debug, Error)]
pub enum SnapshotError {
    /// Failed to read from the file system.
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to write to the file system.
    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to serialize or deserialize JSON.
    #[error("failed to encode or decode JSON: {0}")]
    Json(#[from] serde_json::Error),
}
