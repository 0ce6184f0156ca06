//! Task records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single task in a user's list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskRecord {
    /// Task text, trimmed and non-empty.
    pub text: String,

    /// Free-text duration estimate ("30 minutes"). `None` means unscheduled;
    /// an absent estimate is distinct from an empty string.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub estimate: Option<String>,

    /// When the task was created. Set once, never mutated.
    pub created_at: DateTime<Utc>,
}

impl TaskRecord {
    /// Creates a new task record.
    ///
    /// Text and estimate are trimmed; a blank estimate becomes `None`.
    /// Callers are expected to reject empty text before constructing.
    pub fn new(text: impl Into<String>, estimate: Option<String>) -> Self {
        let estimate = estimate
            .map(|e| e.trim().to_string())
            .filter(|e| !e.is_empty());
        Self {
            text: text.into().trim().to_string(),
            estimate,
            created_at: Utc::now(),
        }
    }

    /// Whether the task carries a duration estimate.
    pub fn has_estimate(&self) -> bool {
        self.estimate.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_trims_text() {
        let task = TaskRecord::new("  Buy milk  ", None);
        assert_eq!(task.text, "Buy milk");
        assert!(task.estimate.is_none());
        assert!(!task.has_estimate());
    }

    #[test]
    fn test_blank_estimate_normalized_to_none() {
        let task = TaskRecord::new("Call mom", Some("   ".to_string()));
        assert!(task.estimate.is_none());

        let task = TaskRecord::new("Call mom", Some(" 30 minutes ".to_string()));
        assert_eq!(task.estimate.as_deref(), Some("30 minutes"));
        assert!(task.has_estimate());
    }

    #[test]
    fn test_serde_omits_absent_estimate() {
        let task = TaskRecord::new("Read", None);
        let json = serde_json::to_value(&task).unwrap();
        assert!(json.get("estimate").is_none());

        let task = TaskRecord::new("Read", Some("1 hour".into()));
        let json = serde_json::to_value(&task).unwrap();
        assert_eq!(json["estimate"], "1 hour");
    }
}
