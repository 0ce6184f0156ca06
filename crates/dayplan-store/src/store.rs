//! The live session store.
//!
//! Exclusive owner of all per-user session and edit-buffer state, and the
//! only writer of task ordering. Every mutation is a short critical section
//! under the map's write lock, which serializes mutations for any given
//! owner; different owners never contend on anything longer than the lock
//! itself. Nothing here awaits the network: the planner round trip happens
//! entirely outside this store, against a snapshot.

use std::collections::HashMap;

use dayplan_models::{EditBuffer, Session, TaskRecord};
use rand::seq::SliceRandom;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use crate::error::{Result, StoreError};
use crate::snapshot::SessionSnapshots;

/// Maximum task text length, in characters.
pub const MAX_TASK_TEXT_LEN: usize = 200;

/// Maximum estimate length, in characters.
pub const MAX_ESTIMATE_LEN: usize = 50;

/// Validates user-supplied text: trims it, rejects empty and oversized input.
pub fn validate_text(text: &str, limit: usize) -> Result<String> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(StoreError::EmptyText);
    }
    if trimmed.chars().count() > limit {
        return Err(StoreError::TextTooLong { limit });
    }
    Ok(trimmed.to_string())
}

/// Live per-user sessions, with opportunistic at-rest snapshots.
pub struct SessionStore {
    sessions: RwLock<HashMap<i64, Session>>,
    snapshots: Option<SessionSnapshots>,
}

impl SessionStore {
    /// Creates an in-memory store with no durability.
    pub fn new() -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            snapshots: None,
        }
    }

    /// Creates a store that snapshots sessions under `base_path` and
    /// restores whatever snapshots are already there.
    pub fn with_snapshots(base_path: impl Into<std::path::PathBuf>) -> Self {
        let snapshots = SessionSnapshots::new(base_path);
        let sessions = snapshots.load_all();
        Self {
            sessions: RwLock::new(sessions),
            snapshots: Some(snapshots),
        }
    }

    /// Persist one session to disk, if durability is configured.
    ///
    /// Failure is logged and swallowed: the in-memory state is authoritative
    /// and the triggering operation has already succeeded.
    fn persist(&self, session: &Session) {
        if let Some(snapshots) = &self.snapshots {
            if let Err(e) = snapshots.save(session) {
                warn!(owner_id = %session.owner_id, error = %e, "Failed to snapshot session");
            }
        }
    }

    /// Remove an owner's at-rest record, if durability is configured.
    fn discard_snapshot(&self, owner_id: i64) {
        if let Some(snapshots) = &self.snapshots {
            if let Err(e) = snapshots.remove(owner_id) {
                warn!(owner_id = %owner_id, error = %e, "Failed to remove session snapshot");
            }
        }
    }

    /// Starts a fresh empty session, discarding any previous one.
    pub async fn start_session(&self, owner_id: i64) {
        let session = Session::new(owner_id);
        self.persist(&session);
        let mut sessions = self.sessions.write().await;
        let replaced = sessions.insert(owner_id, session).is_some();
        info!(owner_id = %owner_id, replaced = replaced, "Session started");
    }

    /// Whether any session (even an empty one) exists for the owner.
    pub async fn has_session(&self, owner_id: i64) -> bool {
        self.sessions.read().await.contains_key(&owner_id)
    }

    /// Appends a task, returning its 1-based position and the new total.
    pub async fn add_task(
        &self,
        owner_id: i64,
        text: &str,
        estimate: Option<String>,
    ) -> Result<(usize, usize)> {
        let text = validate_text(text, MAX_TASK_TEXT_LEN)?;
        let estimate = match estimate {
            Some(e) => Some(validate_text(&e, MAX_ESTIMATE_LEN)?),
            None => None,
        };

        let mut sessions = self.sessions.write().await;
        let session = sessions
            .get_mut(&owner_id)
            .ok_or(StoreError::NoActiveSession)?;

        session.tasks.push(TaskRecord::new(text, estimate));
        let total = session.tasks.len();
        self.persist(session);

        debug!(owner_id = %owner_id, position = total, "Task added");
        Ok((total, total))
    }

    /// Replaces the whole list in one go (quick bulk-add flow).
    pub async fn replace_tasks(&self, owner_id: i64, records: Vec<TaskRecord>) -> Result<usize> {
        let mut sessions = self.sessions.write().await;
        let session = sessions
            .get_mut(&owner_id)
            .ok_or(StoreError::NoActiveSession)?;

        let count = records.len();
        session.tasks = records;
        self.persist(session);

        info!(owner_id = %owner_id, count = count, "Task list replaced");
        Ok(count)
    }

    /// Removes the task at `index` (0-based) and returns it.
    pub async fn remove_task(&self, owner_id: i64, index: usize) -> Result<TaskRecord> {
        let mut sessions = self.sessions.write().await;
        let session = sessions
            .get_mut(&owner_id)
            .ok_or(StoreError::NoActiveSession)?;

        let len = session.tasks.len();
        if index >= len {
            return Err(StoreError::IndexOutOfRange { index, len });
        }

        let removed = session.tasks.remove(index);
        self.persist(session);

        debug!(owner_id = %owner_id, index = index, remaining = session.tasks.len(), "Task removed");
        Ok(removed)
    }

    /// Replaces the text of the task at `index`, preserving its estimate
    /// and creation time. Returns the previous text.
    pub async fn rename_task(&self, owner_id: i64, index: usize, new_text: &str) -> Result<String> {
        let new_text = validate_text(new_text, MAX_TASK_TEXT_LEN)?;

        let mut sessions = self.sessions.write().await;
        let session = sessions
            .get_mut(&owner_id)
            .ok_or(StoreError::NoActiveSession)?;

        let len = session.tasks.len();
        let task = session
            .tasks
            .get_mut(index)
            .ok_or(StoreError::IndexOutOfRange { index, len })?;

        let old_text = std::mem::replace(&mut task.text, new_text);
        self.persist(session);

        debug!(owner_id = %owner_id, index = index, "Task renamed");
        Ok(old_text)
    }

    /// Shuffles the list in place and returns the new order. Lists of
    /// length ≤ 1 are returned unchanged.
    pub async fn shuffle(&self, owner_id: i64) -> Result<Vec<TaskRecord>> {
        let mut sessions = self.sessions.write().await;
        let session = sessions
            .get_mut(&owner_id)
            .ok_or(StoreError::NoActiveSession)?;

        if session.tasks.len() > 1 {
            session.tasks.shuffle(&mut rand::rng());
            self.persist(session);
            debug!(owner_id = %owner_id, count = session.tasks.len(), "Tasks shuffled");
        }
        Ok(session.tasks.clone())
    }

    /// Empties the list but keeps the session (and its creation time) alive.
    pub async fn clear_tasks(&self, owner_id: i64) -> Result<()> {
        let mut sessions = self.sessions.write().await;
        let session = sessions
            .get_mut(&owner_id)
            .ok_or(StoreError::NoActiveSession)?;

        session.tasks.clear();
        session.edit_buffer = None;
        self.persist(session);

        info!(owner_id = %owner_id, "Task list cleared");
        Ok(())
    }

    /// Terminates the session, returning the final list for rendering.
    ///
    /// An empty list counts as "no active list": finishing it is an error
    /// rather than a silent no-op.
    pub async fn finish(&self, owner_id: i64) -> Result<Vec<TaskRecord>> {
        let mut sessions = self.sessions.write().await;
        match sessions.remove(&owner_id) {
            Some(session) if session.has_tasks() => {
                drop(sessions);
                self.discard_snapshot(owner_id);
                info!(owner_id = %owner_id, count = session.tasks.len(), "Session finished");
                Ok(session.tasks)
            }
            Some(session) => {
                // Empty list: the session survives the rejected finish.
                sessions.insert(owner_id, session);
                Err(StoreError::NoActiveSession)
            }
            None => Err(StoreError::NoActiveSession),
        }
    }

    /// Discards the session silently. Returns whether one existed.
    pub async fn delete(&self, owner_id: i64) -> bool {
        let existed = self.sessions.write().await.remove(&owner_id).is_some();
        if existed {
            self.discard_snapshot(owner_id);
            info!(owner_id = %owner_id, "Session deleted");
        }
        existed
    }

    /// Read-only copy of the current (non-empty) task list.
    ///
    /// This is what the planner round trip and the selection keyboards work
    /// from, so neither ever holds the store lock.
    pub async fn task_snapshot(&self, owner_id: i64) -> Result<Vec<TaskRecord>> {
        let sessions = self.sessions.read().await;
        let session = sessions.get(&owner_id).ok_or(StoreError::NoActiveSession)?;
        if !session.has_tasks() {
            return Err(StoreError::NoActiveSession);
        }
        Ok(session.tasks.clone())
    }

    /// Installs a pending multi-step operation.
    pub async fn set_edit_buffer(&self, owner_id: i64, buffer: EditBuffer) -> Result<()> {
        let mut sessions = self.sessions.write().await;
        let session = sessions
            .get_mut(&owner_id)
            .ok_or(StoreError::NoActiveSession)?;

        debug!(owner_id = %owner_id, state = buffer.state_name(), "Edit buffer set");
        session.edit_buffer = Some(buffer);
        self.persist(session);
        Ok(())
    }

    /// Current pending operation, if any. Errors when no session exists.
    pub async fn edit_buffer(&self, owner_id: i64) -> Result<Option<EditBuffer>> {
        let sessions = self.sessions.read().await;
        let session = sessions.get(&owner_id).ok_or(StoreError::NoActiveSession)?;
        Ok(session.edit_buffer.clone())
    }

    /// Consumes the pending operation, failing when none is pending.
    pub async fn take_edit_buffer(&self, owner_id: i64) -> Result<EditBuffer> {
        let mut sessions = self.sessions.write().await;
        let session = sessions
            .get_mut(&owner_id)
            .ok_or(StoreError::NoActiveSession)?;

        let buffer = session
            .edit_buffer
            .take()
            .ok_or(StoreError::NoPendingOperation)?;
        self.persist(session);
        Ok(buffer)
    }

    /// Discards any pending operation without touching tasks.
    ///
    /// Returns whether something was discarded. Effective immediately: no
    /// partial task is ever committed from an abandoned flow.
    pub async fn clear_edit_buffer(&self, owner_id: i64) -> bool {
        let mut sessions = self.sessions.write().await;
        let Some(session) = sessions.get_mut(&owner_id) else {
            return false;
        };
        let discarded = session.edit_buffer.take().is_some();
        if discarded {
            self.persist(session);
            debug!(owner_id = %owner_id, "Edit buffer discarded");
        }
        discarded
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_add_preserves_call_order() {
        let store = SessionStore::new();
        store.start_session(1).await;

        store.add_task(1, "first", None).await.unwrap();
        store.add_task(1, "second", None).await.unwrap();
        let (position, total) = store.add_task(1, "third", None).await.unwrap();
        assert_eq!((position, total), (3, 3));

        let tasks = store.task_snapshot(1).await.unwrap();
        let texts: Vec<_> = tasks.iter().map(|t| t.text.as_str()).collect();
        assert_eq!(texts, ["first", "second", "third"]);
    }

    #[tokio::test]
    async fn test_add_without_session_fails() {
        let store = SessionStore::new();
        let err = store.add_task(1, "task", None).await.unwrap_err();
        assert!(matches!(err, StoreError::NoActiveSession));
    }

    #[tokio::test]
    async fn test_add_rejects_empty_and_oversized_text() {
        let store = SessionStore::new();
        store.start_session(1).await;

        let err = store.add_task(1, "   ", None).await.unwrap_err();
        assert!(matches!(err, StoreError::EmptyText));

        let long = "x".repeat(MAX_TASK_TEXT_LEN + 1);
        let err = store.add_task(1, &long, None).await.unwrap_err();
        assert!(matches!(err, StoreError::TextTooLong { limit: MAX_TASK_TEXT_LEN }));

        let long_estimate = "y".repeat(MAX_ESTIMATE_LEN + 1);
        let err = store
            .add_task(1, "ok", Some(long_estimate))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::TextTooLong { limit: MAX_ESTIMATE_LEN }));
    }

    #[tokio::test]
    async fn test_remove_returns_the_removed_record() {
        let store = SessionStore::new();
        store.start_session(1).await;
        store.add_task(1, "keep", None).await.unwrap();
        store
            .add_task(1, "drop", Some("1 hour".into()))
            .await
            .unwrap();

        let removed = store.remove_task(1, 1).await.unwrap();
        assert_eq!(removed.text, "drop");
        assert_eq!(removed.estimate.as_deref(), Some("1 hour"));
        assert_eq!(store.task_snapshot(1).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_remove_out_of_range_leaves_list_intact() {
        let store = SessionStore::new();
        store.start_session(1).await;
        store.add_task(1, "only", None).await.unwrap();

        let err = store.remove_task(1, 5).await.unwrap_err();
        assert!(matches!(err, StoreError::IndexOutOfRange { index: 5, len: 1 }));
        assert_eq!(store.task_snapshot(1).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_rename_preserves_estimate_and_created_at() {
        let store = SessionStore::new();
        store.start_session(1).await;
        store
            .add_task(1, "old name", Some("30 minutes".into()))
            .await
            .unwrap();
        let before = store.task_snapshot(1).await.unwrap()[0].clone();

        let old = store.rename_task(1, 0, "new name").await.unwrap();
        assert_eq!(old, "old name");

        let after = store.task_snapshot(1).await.unwrap();
        assert_eq!(after.len(), 1);
        assert_eq!(after[0].text, "new name");
        assert_eq!(after[0].estimate, before.estimate);
        assert_eq!(after[0].created_at, before.created_at);
    }

    #[tokio::test]
    async fn test_rename_rejects_blank_text() {
        let store = SessionStore::new();
        store.start_session(1).await;
        store.add_task(1, "task", None).await.unwrap();

        let err = store.rename_task(1, 0, "  \n ").await.unwrap_err();
        assert!(matches!(err, StoreError::EmptyText));
        assert_eq!(store.task_snapshot(1).await.unwrap()[0].text, "task");
    }

    #[tokio::test]
    async fn test_shuffle_preserves_the_multiset() {
        let store = SessionStore::new();
        store.start_session(1).await;
        for i in 0..8 {
            store.add_task(1, &format!("task {}", i), None).await.unwrap();
        }

        let before = store.task_snapshot(1).await.unwrap();
        let after = store.shuffle(1).await.unwrap();

        let mut before_texts: Vec<_> = before.into_iter().map(|t| t.text).collect();
        let mut after_texts: Vec<_> = after.into_iter().map(|t| t.text).collect();
        before_texts.sort();
        after_texts.sort();
        assert_eq!(before_texts, after_texts);
    }

    #[tokio::test]
    async fn test_shuffle_single_element_is_noop() {
        let store = SessionStore::new();
        store.start_session(1).await;
        store.add_task(1, "solo", None).await.unwrap();

        let after = store.shuffle(1).await.unwrap();
        assert_eq!(after.len(), 1);
        assert_eq!(after[0].text, "solo");
    }

    #[tokio::test]
    async fn test_clear_keeps_session_alive() {
        let store = SessionStore::new();
        store.start_session(1).await;
        store.add_task(1, "task", None).await.unwrap();

        store.clear_tasks(1).await.unwrap();
        assert!(store.has_session(1).await);
        // Cleared means empty again, which reads as "no active list".
        assert!(matches!(
            store.task_snapshot(1).await.unwrap_err(),
            StoreError::NoActiveSession
        ));
        // And the session accepts new tasks immediately.
        store.add_task(1, "fresh", None).await.unwrap();
    }

    #[tokio::test]
    async fn test_finish_returns_snapshot_and_ends_session() {
        let store = SessionStore::new();
        store.start_session(1).await;
        store.add_task(1, "Buy milk", None).await.unwrap();
        store
            .add_task(1, "Call mom", Some("30 minutes".into()))
            .await
            .unwrap();

        let final_tasks = store.finish(1).await.unwrap();
        assert_eq!(final_tasks.len(), 2);
        assert_eq!(final_tasks[0].text, "Buy milk");
        assert_eq!(final_tasks[1].estimate.as_deref(), Some("30 minutes"));

        let err = store.add_task(1, "too late", None).await.unwrap_err();
        assert!(matches!(err, StoreError::NoActiveSession));
    }

    #[tokio::test]
    async fn test_finish_rejects_empty_list() {
        let store = SessionStore::new();
        store.start_session(1).await;

        let err = store.finish(1).await.unwrap_err();
        assert!(matches!(err, StoreError::NoActiveSession));
        // The (empty) session itself survives the failed finish.
        assert!(store.has_session(1).await);
    }

    #[tokio::test]
    async fn test_delete_is_silent_and_reports_existence() {
        let store = SessionStore::new();
        store.start_session(1).await;

        assert!(store.delete(1).await);
        assert!(!store.delete(1).await);
    }

    #[tokio::test]
    async fn test_start_session_overwrites_previous() {
        let store = SessionStore::new();
        store.start_session(1).await;
        store.add_task(1, "old", None).await.unwrap();

        store.start_session(1).await;
        assert!(matches!(
            store.task_snapshot(1).await.unwrap_err(),
            StoreError::NoActiveSession
        ));
    }

    #[tokio::test]
    async fn test_edit_buffer_lifecycle() {
        let store = SessionStore::new();
        store.start_session(1).await;

        assert!(matches!(
            store.take_edit_buffer(1).await.unwrap_err(),
            StoreError::NoPendingOperation
        ));

        store
            .set_edit_buffer(1, EditBuffer::AwaitingTaskText)
            .await
            .unwrap();
        assert_eq!(
            store.edit_buffer(1).await.unwrap(),
            Some(EditBuffer::AwaitingTaskText)
        );

        let taken = store.take_edit_buffer(1).await.unwrap();
        assert_eq!(taken, EditBuffer::AwaitingTaskText);
        assert_eq!(store.edit_buffer(1).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_clear_edit_buffer_leaves_tasks_alone() {
        let store = SessionStore::new();
        store.start_session(1).await;
        store.add_task(1, "task", None).await.unwrap();
        store
            .set_edit_buffer(1, EditBuffer::AwaitingTaskTime { text: "wip".into() })
            .await
            .unwrap();

        assert!(store.clear_edit_buffer(1).await);
        assert!(!store.clear_edit_buffer(1).await);
        assert_eq!(store.task_snapshot(1).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_snapshots_survive_restart() {
        let dir = tempfile::tempdir().unwrap();

        {
            let store = SessionStore::with_snapshots(dir.path());
            store.start_session(9).await;
            store.add_task(9, "persist me", None).await.unwrap();
        }

        let store = SessionStore::with_snapshots(dir.path());
        let tasks = store.task_snapshot(9).await.unwrap();
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].text, "persist me");
    }
}
