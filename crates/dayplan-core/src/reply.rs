//! The outbound reply contract.
//!
//! The core hands the transport a rendered text block plus a *named*
//! keyboard layout; the transport decides what a layout looks like on its
//! platform. Nothing in the core ever emits platform markup beyond plain
//! HTML text.

/// What a task picker is picking for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PickerPurpose {
    Rename,
    Remove,
}

/// Named keyboard layouts the transport knows how to draw.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyboardId {
    /// No keyboard.
    None,
    /// Main list-management actions.
    TaskActions,
    /// Per-task edit actions.
    EditActions,
    /// Duration presets plus custom/cancel.
    TimeSuggestions,
    /// Yes/no confirmation for deleting the whole list.
    ConfirmDeleteList,
    /// Yes/no confirmation for removing one task.
    ConfirmRemoveTask { index: usize },
    /// One button per task, carrying the picked index.
    TaskPicker {
        purpose: PickerPurpose,
        titles: Vec<String>,
    },
}

/// A rendered reply: text plus the keyboard to show with it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub text: String,
    pub keyboard: KeyboardId,
}

impl Reply {
    /// Reply with a keyboard.
    pub fn with_keyboard(text: impl Into<String>, keyboard: KeyboardId) -> Self {
        Self {
            text: text.into(),
            keyboard,
        }
    }

    /// Bare text reply.
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            keyboard: KeyboardId::None,
        }
    }
}
