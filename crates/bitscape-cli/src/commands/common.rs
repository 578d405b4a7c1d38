//! Shared CLI helpers used across multiple commands.

use anyhow::Context as _;
use bitscape_config::{PatchLibrary, SavedPatch, Settings, import_patch};
use bitscape_patch::Patch;
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// Settings and resolved directories, shared by every command.
pub struct Context {
    /// Loaded settings.
    pub settings: Settings,
    /// Library directory after command-line and settings overrides.
    pub library_dir: PathBuf,
}

impl Context {
    /// Open the library in the resolved directory.
    pub fn library(&self) -> PatchLibrary {
        PatchLibrary::open(&self.library_dir)
    }
}

/// Load, migrate and validate a patch file.
pub fn load_patch(path: &Path) -> anyhow::Result<Patch> {
    import_patch(path).with_context(|| format!("cannot load patch {}", path.display()))
}

/// Find a library entry by id, then by exact name.
pub fn resolve_entry<'a>(library: &'a PatchLibrary, key: &str) -> anyhow::Result<&'a SavedPatch> {
    if let Ok(id) = Uuid::parse_str(key)
        && let Some(entry) = library.get(id)
    {
        return Ok(entry);
    }

    library
        .find_by_name(key)
        .ok_or_else(|| anyhow::anyhow!("no library entry with id or name '{}'", key))
}

/// Format indices as operator labels, e.g. `[C, B1]`.
pub fn labels(indices: &[usize]) -> String {
    let names: Vec<&str> = indices.iter().map(|&i| op_label(i)).collect();
    format!("[{}]", names.join(", "))
}

/// Label of operator `index`, `?` when out of range.
pub fn op_label(index: usize) -> &'static str {
    bitscape_patch::OperatorRole::from_index(index).map_or("?", |r| r.label())
}

/// Format a millisecond epoch timestamp as whole seconds ago.
pub fn age(created_at: u64) -> String {
    let now = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0);
    let secs = now.saturating_sub(created_at) / 1000;
    match secs {
        s if s < 60 => format!("{s}s ago"),
        s if s < 3600 => format!("{}m ago", s / 60),
        s if s < 86_400 => format!("{}h ago", s / 3600),
        s => format!("{}d ago", s / 86_400),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_labels() {
        assert_eq!(labels(&[0, 2, 3]), "[C, B1, B2]");
        assert_eq!(labels(&[]), "[]");
        assert_eq!(op_label(7), "?");
    }

    #[test]
    fn test_resolve_entry_by_id_or_name() {
        let temp_dir = TempDir::new().unwrap();
        let mut library = PatchLibrary::open(temp_dir.path());
        let entry = library.save("pad", &Patch::initial()).unwrap();

        assert_eq!(resolve_entry(&library, &entry.id.to_string()).unwrap().id, entry.id);
        assert_eq!(resolve_entry(&library, "pad").unwrap().id, entry.id);
        assert!(resolve_entry(&library, "lead").is_err());
    }

    #[test]
    fn test_age_buckets() {
        assert_eq!(age(u64::MAX), "0s ago");
        assert!(age(0).ends_with("d ago"));
    }
}
