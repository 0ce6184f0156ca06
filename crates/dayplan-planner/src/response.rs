//! Parsing of free-text model replies into JSON.

use regex::Regex;
use std::sync::OnceLock;

use crate::error::{PlannerError, Result};

/// Matches a reply wrapped in a markdown code fence, with or without a
/// `json` language tag.
fn fence_regex() -> &'static Regex {
    static FENCE: OnceLock<Regex> = OnceLock::new();
    FENCE.get_or_init(|| {
        Regex::new(r"(?s)```(?:json)?\s*(.*?)\s*```").expect("fence regex is valid")
    })
}

/// Extracts JSON from a raw model reply.
///
/// Models frequently wrap their output in a ```json fence or pad it with
/// whitespace despite being told not to; both are stripped before parsing.
/// Anything that still fails to parse becomes
/// [`PlannerError::UnparseableReply`], never a panic and never a silently
/// empty plan.
pub fn extract_json(raw: &str) -> Result<serde_json::Value> {
    let trimmed = raw.trim();

    let candidate = match fence_regex().captures(trimmed) {
        Some(captures) => captures.get(1).map_or("", |m| m.as_str()),
        None => trimmed,
    };

    if candidate.is_empty() {
        return Err(PlannerError::UnparseableReply(
            "reply was empty after stripping".to_string(),
        ));
    }

    serde_json::from_str(candidate).map_err(|e| PlannerError::UnparseableReply(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parses_fenced_json() {
        let parsed = extract_json("```json\n[{\"title\":\"A\"}]\n```").unwrap();
        assert_eq!(parsed, json!([{"title": "A"}]));
        assert_eq!(parsed.as_array().unwrap().len(), 1);
    }

    #[test]
    fn test_parses_fence_without_language_tag() {
        let parsed = extract_json("```\n{\"a\": 1}\n```").unwrap();
        assert_eq!(parsed, json!({"a": 1}));
    }

    #[test]
    fn test_parses_bare_json_with_padding() {
        let parsed = extract_json("  \n [1, 2, 3] \n").unwrap();
        assert_eq!(parsed, json!([1, 2, 3]));
    }

    #[test]
    fn test_rejects_non_json() {
        let err = extract_json("not json").unwrap_err();
        assert!(matches!(err, PlannerError::UnparseableReply(_)));
    }

    #[test]
    fn test_rejects_empty_fence() {
        let err = extract_json("```json\n```").unwrap_err();
        assert!(matches!(err, PlannerError::UnparseableReply(_)));
    }

    #[test]
    fn test_rejects_empty_reply() {
        let err = extract_json("   ").unwrap_err();
        assert!(matches!(err, PlannerError::UnparseableReply(_)));
    }
}
