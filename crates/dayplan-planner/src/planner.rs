//! The AI sort requester.

use dayplan_models::{Preferences, TaskRecord};
use serde::Serialize;
use tracing::{debug, warn};

use crate::client::Completion;
use crate::error::{PlannerError, Result};
use crate::response::extract_json;

/// System prompt for the plan request.
const SYSTEM_PROMPT: &str = "You are a personal task-planning assistant. \
The user provides their productivity-time preferences and a list of tasks. \
Sort the tasks by priority and by how well each one fits the time of day, \
taking the user's stated peak-productivity window into account.";

/// Prompt-facing encoding of a task.
#[derive(Debug, Serialize)]
struct PromptTask<'a> {
    title: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    estimate: Option<&'a str>,
}

/// Builds the user prompt: preferences plus a JSON encoding of the tasks.
fn build_user_prompt(tasks: &[TaskRecord], prefs: &Preferences) -> String {
    let prompt_tasks: Vec<PromptTask<'_>> = tasks
        .iter()
        .map(|task| PromptTask {
            title: &task.text,
            estimate: task.estimate.as_deref(),
        })
        .collect();
    let tasks_json =
        serde_json::to_string_pretty(&prompt_tasks).unwrap_or_else(|_| "[]".to_string());

    format!(
        "My productivity settings:\n\
         - Peak productivity time: {}\n\
         - Additional notes: {}\n\n\
         Here are my tasks as JSON:\n{}\n\n\
         Sort the tasks by priority and time-of-day fit for my productivity.\n\
         Return the result as a JSON array where every entry has a \"title\" \
         field and may have \"time\" and \"priority\" fields.\n\
         The answer must be valid JSON only, with no extra text.",
        prefs.peak_time_text(),
        prefs.notes_text(),
        tasks_json
    )
}

/// Asks the completion service to reorder `tasks` around `prefs`.
///
/// Returns the parsed reply unchanged; downstream formatting tolerates
/// flexible field names and shapes. Never mutates the session: the ordering
/// is advisory and presentation-only. Network and decode failures both come
/// back as an error the caller renders as "could not build a plan"; there is
/// no automatic retry.
pub async fn request_plan<C: Completion + ?Sized>(
    completion: &C,
    tasks: &[TaskRecord],
    prefs: &Preferences,
) -> Result<serde_json::Value> {
    // The engine rejects empty lists before calling out; this guard keeps
    // the invariant local as well.
    if tasks.is_empty() {
        return Err(PlannerError::Completion(
            "refusing to sort an empty task list".to_string(),
        ));
    }

    let user_prompt = build_user_prompt(tasks, prefs);
    debug!(task_count = tasks.len(), "Requesting AI plan");

    let raw = completion.complete(SYSTEM_PROMPT, &user_prompt).await?;

    match extract_json(&raw) {
        Ok(plan) => Ok(plan),
        Err(e) => {
            warn!(error = %e, reply_chars = raw.len(), "Plan reply failed to parse");
            Err(e)
        }
    }
}
