//! At-rest session snapshots.
//!
//! Sessions are stored as individual JSON files keyed by owner:
//! ```text
//! base_path/
//! └── sessions/
//!     ├── 123456.json
//!     └── 789012.json
//! ```
//! Snapshotting is opportunistic: the in-memory store is authoritative and
//! a failed write never fails the operation that triggered it.

use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

use dayplan_models::Session;
use tracing::{error, info};

use crate::atomic::{read_json, write_json};
use crate::error::SnapshotError;

/// Persists sessions under `base_path/sessions/`.
#[derive(Debug, Clone)]
pub struct SessionSnapshots {
    base_path: PathBuf,
}

impl SessionSnapshots {
    /// Creates a snapshot store rooted at `base_path`.
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
        }
    }

    fn sessions_dir(&self) -> PathBuf {
        self.base_path.join("sessions")
    }

    fn session_path(&self, owner_id: i64) -> PathBuf {
        self.sessions_dir().join(format!("{}.json", owner_id))
    }

    /// Writes one session to disk.
    pub fn save(&self, session: &Session) -> Result<(), SnapshotError> {
        write_json(&self.session_path(session.owner_id), session)
    }

    /// Removes the at-rest record for an owner. Missing files are fine.
    pub fn remove(&self, owner_id: i64) -> Result<(), SnapshotError> {
        let path = self.session_path(owner_id);
        if path.exists() {
            fs::remove_file(&path).map_err(|source| SnapshotError::Write { path, source })?;
        }
        Ok(())
    }

    /// Loads every readable session snapshot.
    ///
    /// Unreadable or malformed files are skipped with an error log so one
    /// corrupt snapshot can't block startup.
    pub fn load_all(&self) -> HashMap<i64, Session> {
        let dir = self.sessions_dir();
        if !dir.exists() {
            return HashMap::new();
        }

        let entries = match fs::read_dir(&dir) {
            Ok(entries) => entries,
            Err(e) => {
                error!(error = %e, path = %dir.display(), "Failed to read sessions directory");
                return HashMap::new();
            }
        };

        let mut sessions = HashMap::new();
        for entry in entries.flatten() {
            let path = entry.path();
            if path.extension().map_or(true, |ext| ext != "json") {
                continue;
            }
            match read_json::<Session>(&path) {
                Ok(session) => {
                    sessions.insert(session.owner_id, session);
                }
                Err(e) => {
                    error!(error = %e, path = %path.display(), "Skipping unreadable session snapshot");
                }
            }
        }

        info!(count = sessions.len(), "Loaded session snapshots from disk");
        sessions
    }
}
