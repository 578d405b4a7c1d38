//! The last-session slot.
//!
//! The editor writes its current patch here and starts from it next time.
//! The slot is best-effort on the read side: a missing, unreadable or
//! corrupt file simply means there is no session to restore.

use std::path::{Path, PathBuf};

use bitscape_patch::Patch;

use crate::ConfigError;
use crate::migrate::migrate_value;
use crate::paths;

/// Session file name inside the library directory.
pub const SESSION_FILE: &str = "last_session.json";

/// Path of the session slot in `dir`.
pub fn session_path(dir: &Path) -> PathBuf {
    dir.join(SESSION_FILE)
}

/// Overwrite the session slot with `patch`.
pub fn save_last_session(dir: &Path, patch: &Patch) -> Result<(), ConfigError> {
    paths::ensure_dir(dir)?;
    let path = session_path(dir);
    let content = serde_json::to_string(patch)?;
    std::fs::write(&path, content).map_err(|e| ConfigError::write_file(&path, e))?;
    tracing::debug!(path = %path.display(), "session saved");
    Ok(())
}

/// Read and migrate the session slot.
pub fn load_last_session(dir: &Path) -> Option<Patch> {
    let path = session_path(dir);
    let raw = std::fs::read_to_string(&path).ok()?;

    let patch = serde_json::from_str(&raw)
        .map_err(ConfigError::from)
        .and_then(migrate_value);
    match patch {
        Ok(patch) => {
            tracing::info!(path = %path.display(), "restored last session");
            Some(patch)
        }
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "ignoring corrupt session");
            None
        }
    }
}

/// Remove the session slot. Returns whether a slot existed.
pub fn clear_last_session(dir: &Path) -> Result<bool, ConfigError> {
    let path = session_path(dir);
    if !path.exists() {
        return Ok(false);
    }
    std::fs::remove_file(&path).map_err(|e| ConfigError::write_file(&path, e))?;
    Ok(true)
}
