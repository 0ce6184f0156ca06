//! Atomic JSON file operations for crash-safe snapshots.

use std::fs;
use std::io::Write;
use std::path::Path;

use crate::error::SnapshotError;

/// Serializes a value and writes it to `path` atomically.
///
/// The JSON is written to a temp file in the target directory first, then
/// renamed over the destination, so the file is never observed half-written
/// even if the process dies mid-write.
pub fn write_json<T: serde::Serialize>(path: &Path, value: &T) -> Result<(), SnapshotError> {
    let json = serde_json::to_string_pretty(value)?;

    if let Some(parent) = path.parent() {
        if !parent.exists() {
            fs::create_dir_all(parent).map_err(|source| SnapshotError::Write {
                path: parent.to_path_buf(),
                source,
            })?;
        }
    }

    // Temp file in the same directory so the rename stays on one filesystem.
    let dir = path.parent().unwrap_or(Path::new("."));
    let mut tmp = tempfile::NamedTempFile::new_in(dir).map_err(|source| SnapshotError::Write {
        path: path.to_path_buf(),
        source,
    })?;
    tmp.write_all(json.as_bytes())
        .and_then(|_| tmp.flush())
        .map_err(|source| SnapshotError::Write {
            path: path.to_path_buf(),
            source,
        })?;
    tmp.persist(path).map_err(|e| SnapshotError::Write {
        path: path.to_path_buf(),
        source: e.error,
    })?;

    Ok(())
}

/// Reads and deserializes JSON from `path`.
pub fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, SnapshotError> {
    let data = fs::read_to_string(path).map_err(|source| SnapshotError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(serde_json::from_str(&data)?)
}

/// Reads JSON from `path`, returning `None` if the file doesn't exist.
pub fn read_json_optional<T: serde::de::DeserializeOwned>(
    path: &Path,
) -> Result<Option<T>, SnapshotError> {
    if !path.exists() {
        return Ok(None);
    }
    read_json(path).map(Some)
}
