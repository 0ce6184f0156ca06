//! The session engine: explicit state machine over the session store.
//!
//! Inbound events are either free text or a parsed [`Action`] token; the
//! current [`EditBuffer`] decides what free text means. Every transition is
//! spelled out here; no state is ever inferred from the presence or absence
//! of map keys. The engine returns rendered [`Reply`] values and typed
//! errors; it never talks to the chat platform itself.

use std::sync::Arc;

use dayplan_models::{EditBuffer, TaskRecord};
use dayplan_planner::{request_plan, Completion};
use dayplan_store::{
    validate_text, PlanArchive, PrefsSource, SessionStore, StoreError, MAX_TASK_TEXT_LEN,
};
use tracing::{debug, info, warn};

use crate::action::Action;
use crate::error::Result;
use crate::format;
use crate::reply::{KeyboardId, PickerPurpose, Reply};

/// Splits a bulk message into task texts.
///
/// Newlines win over commas; a message with neither is one task. Blank
/// segments are dropped.
fn split_bulk(text: &str) -> Vec<String> {
    let text = text.trim();
    let parts: Vec<&str> = if text.contains('\n') {
        text.split('\n').collect()
    } else if text.contains(',') {
        text.split(',').collect()
    } else {
        vec![text]
    };

    parts
        .into_iter()
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(str::to_string)
        .collect()
}

/// Drives sessions through their states and renders replies.
pub struct Engine<C> {
    store: Arc<SessionStore>,
    prefs: PrefsSource,
    plans: PlanArchive,
    completion: C,
    model: Option<String>,
}

impl<C: Completion> Engine<C> {
    /// Creates an engine over the given collaborators.
    pub fn new(
        store: Arc<SessionStore>,
        prefs: PrefsSource,
        plans: PlanArchive,
        completion: C,
        model: Option<String>,
    ) -> Self {
        Self {
            store,
            prefs,
            plans,
            completion,
            model,
        }
    }

    /// The underlying session store.
    pub fn store(&self) -> &Arc<SessionStore> {
        &self.store
    }

    /// Starts a fresh list, discarding any previous session for the owner.
    pub async fn start_list(&self, owner_id: i64) -> Reply {
        self.store.start_session(owner_id).await;
        Reply::with_keyboard(format::render_start(), KeyboardId::TaskActions)
    }

    /// Starts the quick bulk-add flow on a fresh session.
    pub async fn begin_quick(&self, owner_id: i64) -> Reply {
        self.store.start_session(owner_id).await;
        if let Err(e) = self
            .store
            .set_edit_buffer(owner_id, EditBuffer::AwaitingBulkTasks)
            .await
        {
            // Only possible if the session vanished between the two calls.
            warn!(owner_id = %owner_id, error = %e, "Could not arm bulk-add flow");
        }
        Reply::text(format::render_quick_prompt())
    }

    /// Shows the current (non-empty) list.
    pub async fn show_list(&self, owner_id: i64) -> Result<Reply> {
        let tasks = self.store.task_snapshot(owner_id).await?;
        Ok(Reply::with_keyboard(
            format::render_list(&tasks),
            KeyboardId::TaskActions,
        ))
    }

    /// Dispatches free text according to the current machine state.
    pub async fn handle_text(&self, owner_id: i64, text: &str) -> Result<Reply> {
        match self.store.edit_buffer(owner_id).await? {
            // Idle: plain text appends a task.
            None => {
                let (position, total) = self.store.add_task(owner_id, text, None).await?;
                Ok(Reply::with_keyboard(
                    format::render_added(position, total),
                    KeyboardId::TaskActions,
                ))
            }

            // Structured add, step 1: capture the task text.
            Some(EditBuffer::AwaitingTaskText) => {
                let captured = validate_text(text, MAX_TASK_TEXT_LEN)?;
                self.store
                    .set_edit_buffer(
                        owner_id,
                        EditBuffer::AwaitingTaskTime {
                            text: captured.clone(),
                        },
                    )
                    .await?;
                Ok(Reply::with_keyboard(
                    format::render_ask_time(&captured),
                    KeyboardId::TimeSuggestions,
                ))
            }

            // Structured add, step 2: free text is a custom estimate.
            // Validation failures keep the buffer so the user can retry.
            Some(EditBuffer::AwaitingTaskTime { text: task_text }) => {
                let (_, total) = self
                    .store
                    .add_task(owner_id, &task_text, Some(text.to_string()))
                    .await?;
                self.store.clear_edit_buffer(owner_id).await;
                Ok(Reply::with_keyboard(
                    format::render_added_with_estimate(&task_text, text.trim(), total),
                    KeyboardId::TaskActions,
                ))
            }

            // Rename: free text replaces the selected task's text.
            Some(EditBuffer::AwaitingRenameText { index }) => {
                let old_text = self.store.rename_task(owner_id, index, text).await?;
                self.store.clear_edit_buffer(owner_id).await;
                Ok(Reply::with_keyboard(
                    format::render_renamed(index + 1, &old_text, text.trim()),
                    KeyboardId::TaskActions,
                ))
            }

            // Quick flow: one message, many tasks.
            Some(EditBuffer::AwaitingBulkTasks) => {
                let parts = split_bulk(text);
                if parts.is_empty() {
                    self.store.clear_edit_buffer(owner_id).await;
                    return Err(StoreError::EmptyText.into());
                }
                let records = parts
                    .into_iter()
                    .map(|part| TaskRecord::new(part, None))
                    .collect();
                self.store.replace_tasks(owner_id, records).await?;
                self.store.clear_edit_buffer(owner_id).await;

                let tasks = self.store.task_snapshot(owner_id).await?;
                Ok(Reply::with_keyboard(
                    format::render_created(&tasks),
                    KeyboardId::TaskActions,
                ))
            }
        }
    }

    /// Dispatches a named action token.
    pub async fn handle_action(&self, owner_id: i64, action: Action) -> Result<Reply> {
        debug!(owner_id = %owner_id, action = %action, "Dispatching action");

        match action {
            Action::FinishList => {
                let tasks = self.store.finish(owner_id).await?;
                Ok(Reply::text(format::render_final(&tasks)))
            }

            Action::ClearList => {
                self.store.clear_tasks(owner_id).await?;
                Ok(Reply::with_keyboard(
                    format::render_cleared(),
                    KeyboardId::TaskActions,
                ))
            }

            Action::ShowList => self.show_list(owner_id).await,

            Action::EditList => {
                // Nothing to edit without tasks.
                self.store.task_snapshot(owner_id).await?;
                Ok(Reply::with_keyboard(
                    format::render_edit_menu(),
                    KeyboardId::EditActions,
                ))
            }

            Action::DeleteList => {
                if !self.store.has_session(owner_id).await {
                    return Err(StoreError::NoActiveSession.into());
                }
                Ok(Reply::with_keyboard(
                    format::render_confirm_delete(),
                    KeyboardId::ConfirmDeleteList,
                ))
            }

            Action::ConfirmDeleteList => {
                if self.store.delete(owner_id).await {
                    Ok(Reply::text(format::render_deleted()))
                } else {
                    Err(StoreError::NoActiveSession.into())
                }
            }

            Action::BackToMain => Ok(Reply::with_keyboard(
                format::render_main_menu(),
                KeyboardId::TaskActions,
            )),

            Action::AddTask => {
                if !self.store.has_session(owner_id).await {
                    return Err(StoreError::NoActiveSession.into());
                }
                // Plain add happens in the idle state; abandon any
                // half-finished flow first.
                self.store.clear_edit_buffer(owner_id).await;
                Ok(Reply::text("Enter the new task:"))
            }

            Action::AddTaskWithTime => {
                self.store
                    .set_edit_buffer(owner_id, EditBuffer::AwaitingTaskText)
                    .await?;
                Ok(Reply::text(format::render_ask_task_text()))
            }

            Action::RemoveTask => self.task_picker(owner_id, PickerPurpose::Remove).await,
            Action::RenameTask => self.task_picker(owner_id, PickerPurpose::Rename).await,

            Action::ShuffleTasks => {
                // An empty list has nothing to shuffle.
                self.store.task_snapshot(owner_id).await?;
                let tasks = self.store.shuffle(owner_id).await?;
                Ok(Reply::with_keyboard(
                    format::render_shuffled(&tasks),
                    KeyboardId::TaskActions,
                ))
            }

            Action::SelectRename(index) => {
                let tasks = self.store.task_snapshot(owner_id).await?;
                let task = tasks.get(index).ok_or(StoreError::IndexOutOfRange {
                    index,
                    len: tasks.len(),
                })?;
                self.store
                    .set_edit_buffer(owner_id, EditBuffer::AwaitingRenameText { index })
                    .await?;
                Ok(Reply::text(format::render_ask_rename(index + 1, &task.text)))
            }

            Action::SelectRemove(index) => {
                let tasks = self.store.task_snapshot(owner_id).await?;
                let task = tasks.get(index).ok_or(StoreError::IndexOutOfRange {
                    index,
                    len: tasks.len(),
                })?;
                Ok(Reply::with_keyboard(
                    format::render_confirm_remove(index + 1, task),
                    KeyboardId::ConfirmRemoveTask { index },
                ))
            }

            Action::ConfirmRemove(index) => {
                let removed = self.store.remove_task(owner_id, index).await?;
                let remaining = self
                    .store
                    .task_snapshot(owner_id)
                    .await
                    .map(|tasks| tasks.len())
                    .unwrap_or(0);
                Ok(Reply::with_keyboard(
                    format::render_removed(index + 1, &removed, remaining),
                    KeyboardId::TaskActions,
                ))
            }

            Action::TimePreset(preset) => match self.store.edit_buffer(owner_id).await? {
                Some(EditBuffer::AwaitingTaskTime { text }) => {
                    let (_, total) = self
                        .store
                        .add_task(owner_id, &text, Some(preset.label().to_string()))
                        .await?;
                    self.store.clear_edit_buffer(owner_id).await;
                    Ok(Reply::with_keyboard(
                        format::render_added_with_estimate(&text, preset.label(), total),
                        KeyboardId::TaskActions,
                    ))
                }
                _ => Err(StoreError::NoPendingOperation.into()),
            },

            Action::TimeCustom => match self.store.edit_buffer(owner_id).await? {
                Some(EditBuffer::AwaitingTaskTime { .. }) => {
                    Ok(Reply::text(format::render_ask_custom_time()))
                }
                _ => Err(StoreError::NoPendingOperation.into()),
            },

            Action::Cancel => {
                let discarded = self.store.clear_edit_buffer(owner_id).await;
                if discarded {
                    info!(owner_id = %owner_id, "Flow cancelled");
                }
                let keyboard = if self.store.has_session(owner_id).await {
                    KeyboardId::TaskActions
                } else {
                    KeyboardId::None
                };
                Ok(Reply::with_keyboard(format::render_cancelled(), keyboard))
            }
        }
    }

    /// Builds the AI day plan for the owner's current list.
    ///
    /// The snapshot read rejects empty lists before any external call is
    /// made; the completion round trip itself holds no store lock, so other
    /// updates proceed while the model thinks. The result is advisory and is
    /// never written back into `tasks`.
    pub async fn build_plan(&self, owner_id: i64) -> Result<Reply> {
        let tasks = self.store.task_snapshot(owner_id).await?;
        let prefs = self.prefs.get_preferences(owner_id);

        info!(owner_id = %owner_id, task_count = tasks.len(), "Requesting AI plan");
        let plan = request_plan(&self.completion, &tasks, &prefs).await?;

        if let Err(e) = self.plans.save_plan(owner_id, plan.clone(), self.model.clone()) {
            warn!(owner_id = %owner_id, error = %e, "Failed to archive plan");
        }

        Ok(Reply::text(format::render_plan(&plan)))
    }

    /// One button per task so the user can pick a rename/remove target.
    async fn task_picker(&self, owner_id: i64, purpose: PickerPurpose) -> Result<Reply> {
        let tasks = self.store.task_snapshot(owner_id).await?;
        let titles = tasks.iter().map(|task| task.text.clone()).collect();
        let text = match purpose {
            PickerPurpose::Rename => "📝 Pick a task to rename:",
            PickerPurpose::Remove => "➖ Pick a task to remove:",
        };
        Ok(Reply::with_keyboard(
            text,
            KeyboardId::TaskPicker { purpose, titles },
        ))
    }
}
