//! Read-only preferences source.

use std::path::PathBuf;

use dayplan_models::Preferences;
use tracing::warn;

use crate::atomic::read_json_optional;

/// Reads per-owner productivity preferences from `base_path/prefs/`.
///
/// Preferences are maintained outside this service (edited by hand or by a
/// separate onboarding flow); the core only ever reads them. Absent or
/// unreadable files yield defaults so planning always has something to say.
#[derive(Debug, Clone)]
pub struct PrefsSource {
    base_path: PathBuf,
}

impl PrefsSource {
    /// Creates a preferences source rooted at `base_path`.
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
        }
    }

    fn prefs_path(&self, owner_id: i64) -> PathBuf {
        self.base_path.join("prefs").join(format!("{}.json", owner_id))
    }

    /// Returns the owner's preferences, or defaults when absent.
    pub fn get_preferences(&self, owner_id: i64) -> Preferences {
        let path = self.prefs_path(owner_id);
        match read_json_optional::<Preferences>(&path) {
            Ok(Some(prefs)) => prefs,
            Ok(None) => Preferences::default(),
            Err(e) => {
                warn!(owner_id = %owner_id, error = %e, "Failed to read preferences, using defaults");
                Preferences::default()
            }
        }
    }
}
