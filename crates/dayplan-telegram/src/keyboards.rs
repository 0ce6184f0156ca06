//! Inline keyboard construction.
//!
//! The engine only names layouts; this module is the one place that knows
//! what each layout looks like as Telegram buttons.

use dayplan_core::{Action, KeyboardId, PickerPurpose, TimePreset};
use teloxide::types::{InlineKeyboardButton, InlineKeyboardMarkup};

/// Longest task title shown on a picker button.
const PICKER_TITLE_CHARS: usize = 32;

fn button(label: &str, action: Action) -> InlineKeyboardButton {
    InlineKeyboardButton::callback(label, action.encode())
}

/// Main list-management actions.
fn task_actions() -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new(vec![
        vec![
            button("✅ Finish list", Action::FinishList),
            button("🔄 Clear list", Action::ClearList),
        ],
        vec![
            button("📋 Show list", Action::ShowList),
            button("✏️ Edit list", Action::EditList),
        ],
        vec![
            button("⏱️ Add task with time", Action::AddTaskWithTime),
            button("🗑️ Delete list", Action::DeleteList),
        ],
    ])
}

/// Per-task edit actions.
fn edit_actions() -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new(vec![
        vec![
            button("➕ Add", Action::AddTask),
            button("➖ Remove", Action::RemoveTask),
        ],
        vec![
            button("✏️ Rename", Action::RenameTask),
            button("🔀 Shuffle", Action::ShuffleTasks),
        ],
        vec![button("🔙 Back", Action::BackToMain)],
    ])
}

/// Duration presets plus custom input and cancel.
fn time_suggestions() -> InlineKeyboardMarkup {
    let mut rows: Vec<Vec<InlineKeyboardButton>> = TimePreset::ALL
        .chunks(2)
        .map(|pair| {
            pair.iter()
                .map(|preset| {
                    button(
                        &format!("⏱️ {}", preset.label()),
                        Action::TimePreset(*preset),
                    )
                })
                .collect()
        })
        .collect();
    rows.push(vec![
        button("✏️ My own time", Action::TimeCustom),
        button("❌ Cancel", Action::Cancel),
    ]);
    InlineKeyboardMarkup::new(rows)
}

/// Yes/no confirmation pair.
fn confirmation(confirm_label: &str, confirm: Action) -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new(vec![vec![
        button(confirm_label, confirm),
        button("❌ Cancel", Action::Cancel),
    ]])
}

/// One button per task, carrying the picked index.
fn task_picker(purpose: PickerPurpose, titles: &[String]) -> InlineKeyboardMarkup {
    let mut rows: Vec<Vec<InlineKeyboardButton>> = titles
        .iter()
        .enumerate()
        .map(|(index, title)| {
            let short: String = title.chars().take(PICKER_TITLE_CHARS).collect();
            let label = format!("{}. {}", index + 1, short);
            let action = match purpose {
                PickerPurpose::Rename => Action::SelectRename(index),
                PickerPurpose::Remove => Action::SelectRemove(index),
            };
            vec![button(&label, action)]
        })
        .collect();
    rows.push(vec![button("❌ Cancel", Action::Cancel)]);
    InlineKeyboardMarkup::new(rows)
}

/// Maps a named layout to actual buttons. `None` means "no keyboard".
pub fn build(keyboard: &KeyboardId) -> Option<InlineKeyboardMarkup> {
    match keyboard {
        KeyboardId::None => None,
        KeyboardId::TaskActions => Some(task_actions()),
        KeyboardId::EditActions => Some(edit_actions()),
        KeyboardId::TimeSuggestions => Some(time_suggestions()),
        KeyboardId::ConfirmDeleteList => Some(confirmation(
            "🗑️ Yes, delete",
            Action::ConfirmDeleteList,
        )),
        KeyboardId::ConfirmRemoveTask { index } => Some(confirmation(
            "➖ Yes, remove",
            Action::ConfirmRemove(*index),
        )),
        KeyboardId::TaskPicker { purpose, titles } => Some(task_picker(*purpose, titles)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use teloxide::types::InlineKeyboardButtonKind;

    fn callback_data(markup: &InlineKeyboardMarkup) -> Vec<String> {
        markup
            .inline_keyboard
            .iter()
            .flatten()
            .filter_map(|b| match &b.kind {
                InlineKeyboardButtonKind::CallbackData(data) => Some(data.clone()),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_every_button_parses_back_to_an_action() {
        let layouts = [
            KeyboardId::TaskActions,
            KeyboardId::EditActions,
            KeyboardId::TimeSuggestions,
            KeyboardId::ConfirmDeleteList,
            KeyboardId::ConfirmRemoveTask { index: 3 },
            KeyboardId::TaskPicker {
                purpose: PickerPurpose::Rename,
                titles: vec!["a".into(), "b".into()],
            },
        ];
        for layout in layouts {
            let markup = build(&layout).unwrap();
            for data in callback_data(&markup) {
                assert!(
                    Action::parse(&data).is_some(),
                    "button data {:?} in {:?} does not parse",
                    data,
                    layout
                );
            }
        }
    }

    #[test]
    fn test_none_layout_has_no_keyboard() {
        assert!(build(&KeyboardId::None).is_none());
    }

    #[test]
    fn test_picker_truncates_long_titles() {
        let long = "x".repeat(100);
        let markup = build(&KeyboardId::TaskPicker {
            purpose: PickerPurpose::Remove,
            titles: vec![long],
        })
        .unwrap();
        let label = &markup.inline_keyboard[0][0].text;
        assert!(label.chars().count() <= PICKER_TITLE_CHARS + 4);
    }

    #[test]
    fn test_picker_indices_match_positions() {
        let markup = build(&KeyboardId::TaskPicker {
            purpose: PickerPurpose::Remove,
            titles: vec!["first".into(), "second".into()],
        })
        .unwrap();
        let data = callback_data(&markup);
        assert_eq!(data[0], "select_remove:0");
        assert_eq!(data[1], "select_remove:1");
    }
}
