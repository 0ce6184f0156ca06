//! The action-token vocabulary.
//!
//! Every inline button carries one of these tokens as its callback data.
//! Making the alphabet a closed enum (instead of scattered string checks)
//! keeps every state-machine transition enumerable and round-trippable.

use std::fmt;

/// Fixed duration suggestions offered when attaching an estimate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimePreset {
    Minutes15,
    Minutes30,
    Hour1,
    Hours2,
    Hours4,
    Day1,
}

impl TimePreset {
    /// All presets, in keyboard display order.
    pub const ALL: [TimePreset; 6] = [
        TimePreset::Minutes15,
        TimePreset::Minutes30,
        TimePreset::Hour1,
        TimePreset::Hours2,
        TimePreset::Hours4,
        TimePreset::Day1,
    ];

    /// Wire token used in callback data.
    pub fn token(&self) -> &'static str {
        match self {
            Self::Minutes15 => "15m",
            Self::Minutes30 => "30m",
            Self::Hour1 => "1h",
            Self::Hours2 => "2h",
            Self::Hours4 => "4h",
            Self::Day1 => "1d",
        }
    }

    /// Human-readable estimate stored on the task.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Minutes15 => "15 minutes",
            Self::Minutes30 => "30 minutes",
            Self::Hour1 => "1 hour",
            Self::Hours2 => "2 hours",
            Self::Hours4 => "4 hours",
            Self::Day1 => "1 day",
        }
    }

    fn from_token(token: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.token() == token)
    }
}

/// A named user action, parsed from inline-button callback data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Finish the list: render the final snapshot and end the session.
    FinishList,
    /// Empty the list but keep the session.
    ClearList,
    /// Show the current list.
    ShowList,
    /// Open the edit menu.
    EditList,
    /// Ask for confirmation before deleting the whole list.
    DeleteList,
    /// Confirmed: delete the whole list.
    ConfirmDeleteList,
    /// Back to the main action menu.
    BackToMain,
    /// Prompt for a plain task.
    AddTask,
    /// Begin the structured add-with-estimate flow.
    AddTaskWithTime,
    /// Show the task picker for removal.
    RemoveTask,
    /// Show the task picker for renaming.
    RenameTask,
    /// Shuffle the list into a random order.
    ShuffleTasks,
    /// A task was picked for renaming.
    SelectRename(usize),
    /// A task was picked for removal (confirmation follows).
    SelectRemove(usize),
    /// Confirmed: remove the picked task.
    ConfirmRemove(usize),
    /// A duration preset was chosen for the pending task.
    TimePreset(TimePreset),
    /// The user wants to type a custom duration instead.
    TimeCustom,
    /// Abort the current multi-step flow.
    Cancel,
}

impl Action {
    /// Encodes the action as callback data.
    pub fn encode(&self) -> String {
        match self {
            Self::FinishList => "finish_list".to_string(),
            Self::ClearList => "clear_list".to_string(),
            Self::ShowList => "show_list".to_string(),
            Self::EditList => "edit_list".to_string(),
            Self::DeleteList => "delete_list".to_string(),
            Self::ConfirmDeleteList => "confirm_delete".to_string(),
            Self::BackToMain => "back_to_main".to_string(),
            Self::AddTask => "add_task".to_string(),
            Self::AddTaskWithTime => "add_task_with_time".to_string(),
            Self::RemoveTask => "remove_task".to_string(),
            Self::RenameTask => "rename_task".to_string(),
            Self::ShuffleTasks => "shuffle_tasks".to_string(),
            Self::SelectRename(i) => format!("select_rename:{}", i),
            Self::SelectRemove(i) => format!("select_remove:{}", i),
            Self::ConfirmRemove(i) => format!("confirm_remove:{}", i),
            Self::TimePreset(preset) => format!("time:{}", preset.token()),
            Self::TimeCustom => "time:custom".to_string(),
            Self::Cancel => "cancel".to_string(),
        }
    }

    /// Parses callback data back into an action.
    pub fn parse(data: &str) -> Option<Self> {
        if let Some((prefix, rest)) = data.split_once(':') {
            return match prefix {
                "select_rename" => rest.parse().ok().map(Self::SelectRename),
                "select_remove" => rest.parse().ok().map(Self::SelectRemove),
                "confirm_remove" => rest.parse().ok().map(Self::ConfirmRemove),
                "time" if rest == "custom" => Some(Self::TimeCustom),
                "time" => TimePreset::from_token(rest).map(Self::TimePreset),
                _ => None,
            };
        }

        match data {
            "finish_list" => Some(Self::FinishList),
            "clear_list" => Some(Self::ClearList),
            "show_list" => Some(Self::ShowList),
            "edit_list" => Some(Self::EditList),
            "delete_list" => Some(Self::DeleteList),
            "confirm_delete" => Some(Self::ConfirmDeleteList),
            "back_to_main" => Some(Self::BackToMain),
            "add_task" => Some(Self::AddTask),
            "add_task_with_time" => Some(Self::AddTaskWithTime),
            "remove_task" => Some(Self::RemoveTask),
            "rename_task" => Some(Self::RenameTask),
            "shuffle_tasks" => Some(Self::ShuffleTasks),
            "cancel" => Some(Self::Cancel),
            _ => None,
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.encode())
    }
}
