//! Per-user sessions and their transient edit state.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::task::TaskRecord;

/// In-progress multi-step input, one variant per non-idle machine state.
///
/// `None` in [`Session::edit_buffer`] is the idle state: plain text input is
/// interpreted as "append a new task". The buffer is cleared after each
/// completed or cancelled multi-step operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum EditBuffer {
    /// A structured-add flow has begun; the next text becomes the task text.
    AwaitingTaskText,
    /// Task text captured; the next input is a duration preset or free text.
    AwaitingTaskTime { text: String },
    /// A task has been selected for rename; the next text replaces it.
    AwaitingRenameText { index: usize },
    /// A quick-list flow has begun; the next message holds many tasks.
    AwaitingBulkTasks,
}

impl EditBuffer {
    /// Short state name for logging.
    pub fn state_name(&self) -> &'static str {
        match self {
            Self::AwaitingTaskText => "awaiting_task_text",
            Self::AwaitingTaskTime { .. } => "awaiting_task_time",
            Self::AwaitingRenameText { .. } => "awaiting_rename_text",
            Self::AwaitingBulkTasks => "awaiting_bulk_tasks",
        }
    }
}

/// The live task list and edit state for one user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    /// Stable external user identifier (Telegram chat id).
    pub owner_id: i64,

    /// Ordered task list. Order is the display/execution order and the thing
    /// AI reordering rewrites.
    #[serde(default)]
    pub tasks: Vec<TaskRecord>,

    /// When the session was started.
    pub created_at: DateTime<Utc>,

    /// Pending multi-step input, if any.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub edit_buffer: Option<EditBuffer>,
}

impl Session {
    /// Creates a fresh empty session for an owner.
    pub fn new(owner_id: i64) -> Self {
        Self {
            owner_id,
            tasks: Vec::new(),
            created_at: Utc::now(),
            edit_buffer: None,
        }
    }

    /// Whether the session has an active (non-empty) list.
    ///
    /// Sort and finish operate on active lists only; an empty session is
    /// treated as having no list at all.
    pub fn has_tasks(&self) -> bool {
        !self.tasks.is_empty()
    }
}
