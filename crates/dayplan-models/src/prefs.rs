//! Productivity preferences consumed by the planner.

use serde::{Deserialize, Serialize};

/// Placeholder used in the sort prompt when a preference is unset.
const UNSET: &str = "not specified";

/// Per-user productivity preferences.
///
/// Read-only from the session core's perspective; the planner embeds them in
/// its prompt. Missing fields render as a placeholder rather than failing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Preferences {
    /// Free-text peak productivity window, e.g. "mornings before 11".
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub peak_time: Option<String>,

    /// Free-form notes about working habits.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub notes: Option<String>,
}

impl Preferences {
    /// Peak productivity window, or a placeholder when unset.
    pub fn peak_time_text(&self) -> &str {
        self.peak_time.as_deref().unwrap_or(UNSET)
    }

    /// Notes, or a placeholder when unset.
    pub fn notes_text(&self) -> &str {
        self.notes.as_deref().unwrap_or(UNSET)
    }
}
