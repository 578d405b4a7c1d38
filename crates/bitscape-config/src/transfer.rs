//! Single-patch file export and import.

use std::path::Path;

use bitscape_patch::Patch;

use crate::ConfigError;
use crate::migrate::migrate_value;
use crate::validation::validate_patch;

/// Write `patch` to `path` as pretty-printed JSON.
pub fn export_patch(patch: &Patch, path: impl AsRef<Path>) -> Result<(), ConfigError> {
    let path = path.as_ref();
    let json = serde_json::to_string_pretty(patch)?;
    std::fs::write(path, json).map_err(|e| ConfigError::write_file(path, e))?;
    tracing::info!(path = %path.display(), "patch exported");
    Ok(())
}

/// Read a patch file: parse, migrate, then validate.
pub fn import_patch(path: impl AsRef<Path>) -> Result<Patch, ConfigError> {
    let path = path.as_ref();
    let raw = std::fs::read_to_string(path).map_err(|e| ConfigError::read_file(path, e))?;
    let patch = parse_patch(&raw)?;
    tracing::info!(path = %path.display(), "patch imported");
    Ok(patch)
}

/// Parse, migrate and validate patch JSON held in memory.
pub fn parse_patch(json: &str) -> Result<Patch, ConfigError> {
    let value = serde_json::from_str(json)?;
    let patch = migrate_value(value)?;
    validate_patch(&patch)?;
    Ok(patch)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ValidationError;
    use bitscape_patch::PatchAction;
    use tempfile::TempDir;

    #[test]
    fn test_export_import() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("bell.json");
        let patch = Patch::initial()
            .apply(&PatchAction::AddConnection { src: 1, dst: 0 })
            .apply(&PatchAction::SetSelfLoop {
                op_index: 1,
                radius: 55.0,
            });

        export_patch(&patch, &path).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.contains('\n'), "export is pretty-printed");

        assert_eq!(import_patch(&path).unwrap(), patch);
    }

    #[test]
    fn test_import_missing_file() {
        let temp_dir = TempDir::new().unwrap();
        let err = import_patch(temp_dir.path().join("nope.json")).unwrap_err();
        assert!(matches!(err, ConfigError::ReadFile { .. }));
    }

    #[test]
    fn test_import_rejects_invalid_json() {
        assert!(matches!(parse_patch("not json"), Err(ConfigError::Json(_))));
    }

    #[test]
    fn test_import_rejects_invalid_patch() {
        let mut v = serde_json::to_value(Patch::initial()).unwrap();
        v["connections"] = serde_json::json!([{ "src": 0, "dst": 9 }]);
        let err = parse_patch(&v.to_string()).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Validation(ValidationError::OperatorOutOfRange { index: 9, .. })
        ));
    }

    #[test]
    fn test_partial_patch_fills_defaults() {
        let patch = parse_patch(r#"{ "masterVolume": 90 }"#).unwrap();
        assert_eq!(patch.master_volume, 90.0);
        assert_eq!(patch.operators, Patch::initial().operators);
    }
}
