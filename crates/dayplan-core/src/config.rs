//! Shared configuration for Dayplan.
//!
//! All application data lives under one state directory:
//!
//! ```text
//! ~/.dayplan/
//! ├── sessions/   # live session snapshots
//! ├── prefs/      # per-user productivity preferences
//! └── plans/      # last AI plan per user
//! ```
//!
//! # Environment Variables
//!
//! - `DAYPLAN_STATE_DIR`: override the base state directory

use std::path::PathBuf;
use std::sync::OnceLock;

/// Environment variable for a custom state directory.
pub const STATE_DIR_ENV: &str = "DAYPLAN_STATE_DIR";

/// Default state directory name under home.
const DEFAULT_STATE_DIR: &str = ".dayplan";

static STATE_DIR_CACHE: OnceLock<PathBuf> = OnceLock::new();

/// Get the Dayplan state directory.
///
/// Resolution order:
/// 1. `DAYPLAN_STATE_DIR` environment variable if set
/// 2. `~/.dayplan` if a home directory is available
/// 3. `.dayplan` in the current directory as a fallback
pub fn state_dir() -> PathBuf {
    STATE_DIR_CACHE
        .get_or_init(|| {
            std::env::var(STATE_DIR_ENV)
                .map(PathBuf::from)
                .unwrap_or_else(|_| {
                    dirs::home_dir()
                        .map(|h| h.join(DEFAULT_STATE_DIR))
                        .unwrap_or_else(|| PathBuf::from(DEFAULT_STATE_DIR))
                })
        })
        .clone()
}

/// Ensure the state directory and its subdirectories exist.
pub fn ensure_all_dirs() -> std::io::Result<()> {
    let base = state_dir();
    for sub in ["sessions", "prefs", "plans"] {
        std::fs::create_dir_all(base.join(sub))?;
    }
    Ok(())
}
