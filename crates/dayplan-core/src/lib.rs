//! Session engine and presentation for Dayplan.
//!
//! This crate hosts the explicit session state machine (the [`Engine`]),
//! the closed action-token vocabulary inline buttons speak, and the
//! formatter that renders lists and AI plans. The engine consumes the
//! session store and the planner; the chat transport consumes the engine
//! and maps its named keyboard layouts onto real buttons.

pub mod action;
pub mod config;
pub mod engine;
pub mod error;
pub mod format;
pub mod reply;

pub use action::{Action, TimePreset};
pub use engine::Engine;
pub use error::{EngineError, Result};
pub use reply::{KeyboardId, PickerPurpose, Reply};
