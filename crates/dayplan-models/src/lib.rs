//! Core data models for Dayplan.
//!
//! This crate defines the types shared across the Dayplan workspace: the
//! task record, the per-user session with its transient edit buffer, and
//! the read-only productivity preferences consumed by the AI planner.

pub mod prefs;
pub mod session;
pub mod task;

pub use prefs::Preferences;
pub use session::{EditBuffer, Session};
pub use task::TaskRecord;
