//! Error types for persistence operations.

use std::path::PathBuf;
use thiserror::Error;
use uuid::Uuid;

/// Errors that can occur while reading or writing patches and settings.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read a file
    #[error("failed to read file '{path}': {source}")]
    ReadFile {
        /// Path of the file that could not be read.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to write a file
    #[error("failed to write file '{path}': {source}")]
    WriteFile {
        /// Path of the file that could not be written.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to create directory
    #[error("failed to create directory '{path}': {source}")]
    CreateDir {
        /// Path of the directory that could not be created.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to parse or serialize patch JSON
    #[error("invalid patch JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// Failed to parse TOML
    #[error("failed to parse TOML: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// Failed to serialize TOML
    #[error("failed to serialize TOML: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    /// No library entry with this id
    #[error("patch not found: {0}")]
    EntryNotFound(Uuid),

    /// Library file exists but could not be parsed; writing would overwrite it
    #[error("library file '{0}' is damaged; refusing to overwrite it")]
    DamagedLibrary(PathBuf),

    /// Patch failed validation
    #[error("validation failed: {0}")]
    Validation(#[from] crate::validation::ValidationError),
}

impl ConfigError {
    /// Create a read file error.
    pub fn read_file(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ConfigError::ReadFile {
            path: path.into(),
            source,
        }
    }

    /// Create a write file error.
    pub fn write_file(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ConfigError::WriteFile {
            path: path.into(),
            source,
        }
    }

    /// Create a create directory error.
    pub fn create_dir(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ConfigError::CreateDir {
            path: path.into(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::ValidationError;
    use std::error::Error;

    fn mock_io_err() -> std::io::Error {
        std::io::Error::new(std::io::ErrorKind::NotFound, "mock")
    }

    // --- factory methods ---

    #[test]
    fn read_file_factory_produces_correct_variant() {
        let err = ConfigError::read_file("/some/path", mock_io_err());
        assert!(
            matches!(err, ConfigError::ReadFile { ref path, .. } if path == std::path::Path::new("/some/path"))
        );
    }

    #[test]
    fn write_file_factory_produces_correct_variant() {
        let err = ConfigError::write_file("/out/path", mock_io_err());
        assert!(
            matches!(err, ConfigError::WriteFile { ref path, .. } if path == std::path::Path::new("/out/path"))
        );
    }

    #[test]
    fn create_dir_factory_produces_correct_variant() {
        let err = ConfigError::create_dir("/new/dir", mock_io_err());
        assert!(matches!(err, ConfigError::CreateDir { .. }));
    }

    // --- display ---

    #[test]
    fn io_errors_name_the_path() {
        let err = ConfigError::read_file("/lib/library.json", mock_io_err());
        let msg = err.to_string();
        assert!(msg.contains("/lib/library.json"));
        assert!(msg.contains("mock"));
    }

    #[test]
    fn entry_not_found_names_the_id() {
        let id = Uuid::nil();
        let err = ConfigError::EntryNotFound(id);
        assert_eq!(err.to_string(), format!("patch not found: {id}"));
    }

    #[test]
    fn damaged_library_names_the_path() {
        let err = ConfigError::DamagedLibrary(PathBuf::from("/lib/library.json"));
        assert_eq!(
            err.to_string(),
            "library file '/lib/library.json' is damaged; refusing to overwrite it"
        );
        assert!(err.source().is_none());
    }

    // --- source chain ---

    #[test]
    fn io_variants_expose_source() {
        let err = ConfigError::write_file("/x", mock_io_err());
        assert!(err.source().is_some());
    }

    #[test]
    fn json_error_converts() {
        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err: ConfigError = json_err.into();
        assert!(matches!(err, ConfigError::Json(_)));
        assert!(err.to_string().starts_with("invalid patch JSON"));
    }

    #[test]
    fn validation_error_converts() {
        let err: ConfigError = ValidationError::DuplicateConnection { src: 1, dst: 0 }.into();
        assert!(matches!(err, ConfigError::Validation(_)));
    }
}
