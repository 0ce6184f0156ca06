//! Archive of AI-generated plans.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::atomic::{read_json_optional, write_json};
use crate::error::SnapshotError;

/// A stored plan: the raw parsed model output plus when it was produced.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredPlan {
    /// Parsed model output, shape-flexible.
    pub plan: serde_json::Value,
    /// When the plan was generated.
    pub generated_at: DateTime<Utc>,
    /// Model that produced it, when known.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub model: Option<String>,
}

/// Keeps the most recent AI plan per owner under `base_path/plans/`.
///
/// Purely a convenience archive; the plan is advisory and is never written
/// back into the live task list.
#[derive(Debug, Clone)]
pub struct PlanArchive {
    base_path: PathBuf,
}

impl PlanArchive {
    /// Creates a plan archive rooted at `base_path`.
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
        }
    }

    fn plan_path(&self, owner_id: i64) -> PathBuf {
        self.base_path.join("plans").join(format!("{}.json", owner_id))
    }

    /// Records the latest plan for an owner, replacing any previous one.
    pub fn save_plan(
        &self,
        owner_id: i64,
        plan: serde_json::Value,
        model: Option<String>,
    ) -> Result<(), SnapshotError> {
        let stored = StoredPlan {
            plan,
            generated_at: Utc::now(),
            model,
        };
        write_json(&self.plan_path(owner_id), &stored)
    }

    /// Returns the last stored plan, if any.
    pub fn last_plan(&self, owner_id: i64) -> Result<Option<StoredPlan>, SnapshotError> {
        read_json_optional(&self.plan_path(owner_id))
    }
}
