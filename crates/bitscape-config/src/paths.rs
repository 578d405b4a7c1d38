//! Platform-specific paths for settings, the patch library and the session slot.
//!
//! # Directory Structure
//!
//! - **User config**: `~/.config/bitscape/` (Linux), `~/Library/Application Support/bitscape/` (macOS), `%APPDATA%\bitscape\` (Windows)
//! - **Settings**: `<user config>/settings.toml`
//! - **Library**: `<user config>/library/` holding `library.json` and `last_session.json`
//!
//! The library directory can be moved with `library_dir` in the settings file.
//!
//! # Example
//!
//! ```rust,no_run
//! use bitscape_config::paths;
//!
//! let dir = paths::ensure_dir(&paths::default_library_dir()).unwrap();
//! println!("Library: {:?}", dir);
//! ```

use std::path::{Path, PathBuf};

use crate::ConfigError;

/// Application name used for directory paths.
const APP_NAME: &str = "bitscape";

/// Subdirectory name for the patch library.
const LIBRARY_SUBDIR: &str = "library";

/// Settings file name.
const SETTINGS_FILE: &str = "settings.toml";

/// Returns the user-specific configuration directory.
///
/// # Platform Paths
///
/// - Linux: `~/.config/bitscape/`
/// - macOS: `~/Library/Application Support/bitscape/`
/// - Windows: `%APPDATA%\bitscape\`
///
/// Returns a fallback path if the config directory cannot be determined.
pub fn user_config_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_NAME)
}

/// Returns the default settings file path.
pub fn settings_path() -> PathBuf {
    user_config_dir().join(SETTINGS_FILE)
}

/// Returns the default patch library directory.
pub fn default_library_dir() -> PathBuf {
    user_config_dir().join(LIBRARY_SUBDIR)
}

/// Ensure `dir` exists, creating it and any parents.
pub fn ensure_dir(dir: &Path) -> Result<PathBuf, ConfigError> {
    if !dir.exists() {
        std::fs::create_dir_all(dir).map_err(|e| ConfigError::create_dir(dir, e))?;
    }

    Ok(dir.to_path_buf())
}
