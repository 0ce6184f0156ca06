//! Session state and at-rest persistence for Dayplan.
//!
//! The [`SessionStore`] is the single owner of live task-list state:
//! handlers never touch a session directly, they go through the store's
//! typed operations, which serialize per-owner mutation and opportunistically
//! snapshot sessions to disk with atomic writes (write temp file, then
//! rename).
//!
//! # Example
//!
//! ```no_run
//! use dayplan_store::SessionStore;
//!
//! # async fn demo() -> Result<(), dayplan_store::StoreError> {
//! let store = SessionStore::with_snapshots("/home/user/.dayplan");
//! store.start_session(42).await;
//! let (position, total) = store.add_task(42, "Buy milk", None).await?;
//! assert_eq!((position, total), (1, 1));
//! # Ok(())
//! # }
//! ```

pub mod atomic;
pub mod error;
pub mod plans;
pub mod prefs;
pub mod snapshot;
pub mod store;

pub use error::{Result, SnapshotError, StoreError};
pub use plans::{PlanArchive, StoredPlan};
pub use prefs::PrefsSource;
pub use snapshot::SessionSnapshots;
pub use store::{validate_text, SessionStore, MAX_ESTIMATE_LEN, MAX_TASK_TEXT_LEN};
