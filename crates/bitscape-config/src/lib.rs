//! Persistence for the Bitscape FM editor.
//!
//! Everything that touches the filesystem lives here; the patch model and
//! sync layer stay pure.
//!
//! # Features
//!
//! - **Library**: named patches in one `library.json` per library directory
//! - **Session slot**: the patch the editor reopens on start
//! - **Transfer**: single-patch JSON export and validated import
//! - **Migration**: upgrades of patches saved by older editor versions
//! - **Validation**: structural checks on patches from outside the reducer
//! - **Settings**: the TOML settings file and platform paths
//!
//! # Example
//!
//! ```rust,no_run
//! use bitscape_config::{PatchLibrary, Settings, load_last_session, paths};
//! use bitscape_patch::Patch;
//!
//! let settings = Settings::load_or_default(paths::settings_path()).unwrap();
//! let dir = settings.library_dir();
//!
//! let patch = load_last_session(&dir).unwrap_or_else(Patch::initial);
//! let mut library = PatchLibrary::open(&dir);
//! library.save("Glass Bell", &patch).unwrap();
//! ```

mod error;
mod library;
pub mod migrate;
mod session;
mod settings;
mod transfer;

/// Platform-specific paths for settings and the patch library.
pub mod paths;

/// Patch validation.
pub mod validation;

pub use error::ConfigError;
pub use library::{LIBRARY_FILE, PatchLibrary, SavedPatch};
pub use migrate::{migrate_value, sanitize_filter};
pub use session::{
    SESSION_FILE, clear_last_session, load_last_session, save_last_session, session_path,
};
pub use settings::Settings;
pub use transfer::{export_patch, import_patch, parse_patch};
pub use validation::{ValidationError, ValidationResult, validate_patch};
