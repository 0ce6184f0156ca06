//! Presentation formatting.
//!
//! Renders lists and plans as Telegram-flavored HTML text. The AI plan
//! renderer is deliberately tolerant: models drift between field names and
//! shapes, so it extracts what it recognizes instead of demanding a schema.

use dayplan_models::TaskRecord;
use serde_json::Value;

/// Escape HTML special characters for Telegram HTML mode.
pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// One numbered line per task, estimate suffixed when present.
fn task_lines(tasks: &[TaskRecord]) -> String {
    let mut out = String::new();
    for (i, task) in tasks.iter().enumerate() {
        out.push_str(&format!("{}. {}", i + 1, html_escape(&task.text)));
        if let Some(estimate) = &task.estimate {
            out.push_str(&format!(" ⏱️ {}", html_escape(estimate)));
        }
        out.push('\n');
    }
    out
}

/// Welcome text for a fresh list.
pub fn render_start() -> String {
    "🎯 <b>New task list</b>\n\n\
     📝 Add tasks one at a time: every message becomes a task.\n\n\
     ⚡ Quick commands:\n\
     • /quicklist - add many tasks in one message\n\
     • /list - show the current list\n\
     • /plan - get an AI-sorted day plan\n\n\
     Use the buttons below to manage the list:"
        .to_string()
}

/// Instructions for the quick bulk-add flow.
pub fn render_quick_prompt() -> String {
    "🚀 <b>Quick list</b>\n\n\
     Send all your tasks in one message, separated by new lines or commas.\n\n\
     Example:\n<code>Buy groceries\nDo homework\nCall mom</code>"
        .to_string()
}

/// Confirmation for a plain append.
pub fn render_added(position: usize, total: usize) -> String {
    format!(
        "✅ Task #{} added!\n\nKeep typing tasks or use the buttons below. ({} total)",
        position, total
    )
}

/// Confirmation for an append with an estimate.
pub fn render_added_with_estimate(text: &str, estimate: &str, total: usize) -> String {
    format!(
        "✅ Task added!\n\n📝 {}\n⏱️ Estimate: {}\n📊 Tasks in list: {}",
        html_escape(text),
        html_escape(estimate),
        total
    )
}

/// The current list.
pub fn render_list(tasks: &[TaskRecord]) -> String {
    format!("📋 <b>Current task list</b>\n\n{}", task_lines(tasks))
}

/// Quick-list creation summary.
pub fn render_created(tasks: &[TaskRecord]) -> String {
    format!(
        "✅ Task list created!\n\n{}\n📊 Total tasks: {}",
        task_lines(tasks),
        tasks.len()
    )
}

/// The final list, rendered on finish before the session is discarded.
pub fn render_final(tasks: &[TaskRecord]) -> String {
    let with_estimate = tasks.iter().filter(|t| t.has_estimate()).count();
    let mut out = format!(
        "✅ <b>Your task list is finished!</b>\n\n{}\n📊 Total tasks: {}",
        task_lines(tasks),
        tasks.len()
    );
    if with_estimate > 0 {
        out.push_str(&format!("\n⏱️ With estimates: {}", with_estimate));
    }
    out
}

/// The new order after a shuffle.
pub fn render_shuffled(tasks: &[TaskRecord]) -> String {
    format!("🔄 Tasks shuffled!\n\nNew order:\n{}", task_lines(tasks))
}

/// Removal confirmation with the remaining count.
pub fn render_removed(position: usize, task: &TaskRecord, remaining: usize) -> String {
    format!(
        "✅ Task #{} removed!\n📝 {}\n\n📊 Tasks left: {}",
        position,
        html_escape(&task.text),
        remaining
    )
}

/// Rename confirmation showing both texts.
pub fn render_renamed(position: usize, old_text: &str, new_text: &str) -> String {
    format!(
        "✅ Task #{} renamed!\n\n📝 Was: {}\n📝 Now: {}",
        position,
        html_escape(old_text),
        html_escape(new_text)
    )
}

/// Prompt for the structured-add task text.
pub fn render_ask_task_text() -> String {
    "📝 Enter the task text:\n\nExample: 'Prepare the project report' or 'Study a new topic'"
        .to_string()
}

/// Prompt for a duration, echoing the captured text.
pub fn render_ask_time(text: &str) -> String {
    format!(
        "⏱️ Now pick a time for the task:\n📝 '{}'\n\nChoose a suggestion or type your own:",
        html_escape(text)
    )
}

/// Prompt for a free-text duration.
pub fn render_ask_custom_time() -> String {
    "⏱️ Type your own estimate:\n\nExamples:\n• '30 minutes'\n• '2 hours'\n• '1 day'".to_string()
}

/// Prompt for the replacement text of a rename.
pub fn render_ask_rename(position: usize, current: &str) -> String {
    format!(
        "📝 Editing task #{}:\nCurrent text: {}\n\nEnter the new text:",
        position,
        html_escape(current)
    )
}

/// Confirmation question before removing one task.
pub fn render_confirm_remove(position: usize, task: &TaskRecord) -> String {
    format!(
        "⚠️ Remove task #{}?\n📝 {}",
        position,
        html_escape(&task.text)
    )
}

/// Confirmation question before deleting the whole list.
pub fn render_confirm_delete() -> String {
    "⚠️ Are you sure you want to delete the whole task list?".to_string()
}

/// Flow-abort acknowledgement.
pub fn render_cancelled() -> String {
    "❌ Action cancelled.".to_string()
}

/// List-cleared acknowledgement.
pub fn render_cleared() -> String {
    "📭 List cleared. Starting over!".to_string()
}

/// List-deleted acknowledgement.
pub fn render_deleted() -> String {
    "🗑️ The whole task list was deleted!".to_string()
}

/// Edit-menu header.
pub fn render_edit_menu() -> String {
    "✏️ Editing the task list:".to_string()
}

/// Main-menu header.
pub fn render_main_menu() -> String {
    "⚡ Quick actions:".to_string()
}

/// Traffic-light emoji for a priority value, textual or numeric.
fn priority_emoji(priority: &Value) -> Option<&'static str> {
    if let Some(s) = priority.as_str() {
        return match s.to_ascii_lowercase().as_str() {
            "high" => Some("🔴"),
            "medium" => Some("🟡"),
            "low" => Some("🟢"),
            _ => None,
        };
    }
    match priority.as_u64() {
        Some(1) => Some("🔴"),
        Some(2) => Some("🟡"),
        Some(3) => Some("🟢"),
        _ => None,
    }
}

/// First string found under any of the given keys.
fn field<'a>(entry: &'a Value, keys: &[&str]) -> Option<&'a str> {
    keys.iter().find_map(|k| entry.get(*k).and_then(Value::as_str))
}

/// Renders one plan entry as "title [emoji] [⏰ schedule]".
fn plan_line(index: usize, title: &str, details: Option<&Value>) -> String {
    let mut line = format!("{}. {}", index, html_escape(title));

    if let Some(details) = details {
        if let Some(emoji) = details.get("priority").and_then(|p| priority_emoji(p)) {
            line.push(' ');
            line.push_str(emoji);
        }

        let start = field(details, &["time", "start", "start_time"]);
        let end = field(details, &["end", "end_time"]);
        match (start, end) {
            (Some(start), Some(end)) => {
                line.push_str(&format!(" ⏰ {}–{}", html_escape(start), html_escape(end)));
            }
            (Some(start), None) => line.push_str(&format!(" ⏰ {}", html_escape(start))),
            _ => {}
        }
    }

    line
}

/// Renders an AI plan of whatever shape the model produced.
///
/// Arrays of objects (or strings) become a numbered list; objects keyed by
/// task name are treated the same way; anything else is shown as raw JSON
/// rather than dropped.
pub fn render_plan(plan: &Value) -> String {
    let mut lines = Vec::new();

    match plan {
        Value::Array(entries) => {
            for (i, entry) in entries.iter().enumerate() {
                match entry {
                    Value::String(title) => lines.push(plan_line(i + 1, title, None)),
                    Value::Object(_) => {
                        let title = field(entry, &["title", "name", "task", "text"])
                            .unwrap_or("Untitled task");
                        lines.push(plan_line(i + 1, title, Some(entry)));
                    }
                    other => lines.push(plan_line(i + 1, &other.to_string(), None)),
                }
            }
        }
        Value::Object(map) => {
            for (i, (title, details)) in map.iter().enumerate() {
                lines.push(plan_line(i + 1, title, Some(details)));
            }
        }
        other => {
            return format!(
                "🎯 <b>Your plan:</b>\n\n<pre>{}</pre>",
                html_escape(&serde_json::to_string_pretty(other).unwrap_or_default())
            );
        }
    }

    format!(
        "🎯 <b>Your plan for the day:</b>\n\n{}\n\n✅ Done! {} tasks scheduled.",
        lines.join("\n"),
        lines.len()
    )
}
