//! The user's patch library.
//!
//! All saved patches live in one JSON array file, `library.json`, inside the
//! library directory. Entries keep their insertion order; ids are random
//! UUIDs and names need not be unique.
//!
//! Entries this version cannot read (a newer waveform id, a damaged patch)
//! are kept verbatim and written back after the readable ones, so saving
//! never loses them. A library file that is not a JSON array at all is left
//! alone: the library opens empty and refuses to write.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};
use uuid::Uuid;

use bitscape_patch::Patch;

use crate::ConfigError;
use crate::migrate::migrate_value;
use crate::paths;

/// Library file name inside the library directory.
pub const LIBRARY_FILE: &str = "library.json";

/// A named patch in the library.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedPatch {
    /// Random v4 id.
    pub id: Uuid,
    /// Display name.
    pub name: String,
    /// Creation time in milliseconds since the Unix epoch.
    pub created_at: u64,
    /// The stored patch.
    pub patch: Patch,
}

impl SavedPatch {
    /// New entry stamped with a fresh id and the current time.
    pub fn new(name: impl Into<String>, patch: Patch) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            created_at: now_millis(),
            patch,
        }
    }
}

/// Patch library backed by `library.json`.
///
/// Every mutating call rewrites the file before returning.
#[derive(Debug, Clone)]
pub struct PatchLibrary {
    path: PathBuf,
    entries: Vec<SavedPatch>,
    /// Stored entries that did not parse, written back untouched.
    unreadable: Vec<Value>,
    /// The file exists but could not be read as an array.
    damaged: bool,
}

impl PatchLibrary {
    /// Open the library in `dir`.
    ///
    /// A missing file is an empty library. A file that cannot be read or
    /// parsed also reads as empty, with a warning, and the library becomes
    /// read-only. Entries whose patch no longer parses are hidden from
    /// [`entries`](Self::entries) but preserved on disk.
    pub fn open(dir: impl AsRef<Path>) -> Self {
        let path = dir.as_ref().join(LIBRARY_FILE);
        let stored = read_stored(&path);
        let damaged = stored.is_none();

        let mut entries = Vec::new();
        let mut unreadable = Vec::new();
        for value in stored.unwrap_or_default() {
            match read_entry(value.clone()) {
                Ok(entry) => entries.push(entry),
                Err(e) => {
                    tracing::warn!(error = %e, "keeping unreadable library entry as is");
                    unreadable.push(value);
                }
            }
        }

        tracing::debug!(
            path = %path.display(),
            entries = entries.len(),
            unreadable = unreadable.len(),
            "library opened"
        );
        Self {
            path,
            entries,
            unreadable,
            damaged,
        }
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// All entries in insertion order.
    pub fn entries(&self) -> &[SavedPatch] {
        &self.entries
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the library holds no patches.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of stored entries that could not be read.
    pub fn unreadable_count(&self) -> usize {
        self.unreadable.len()
    }

    /// Entry with this id.
    pub fn get(&self, id: Uuid) -> Option<&SavedPatch> {
        self.entries.iter().find(|e| e.id == id)
    }

    /// First entry with this name.
    pub fn find_by_name(&self, name: &str) -> Option<&SavedPatch> {
        self.entries.iter().find(|e| e.name == name)
    }

    /// Append a patch under `name` and persist.
    pub fn save(&mut self, name: &str, patch: &Patch) -> Result<SavedPatch, ConfigError> {
        let entry = SavedPatch::new(name, patch.clone());
        self.entries.push(entry.clone());
        self.write()?;
        tracing::info!(id = %entry.id, name, "patch saved to library");
        Ok(entry)
    }

    /// Rename an entry and persist.
    pub fn rename(&mut self, id: Uuid, name: &str) -> Result<(), ConfigError> {
        let entry = self
            .entries
            .iter_mut()
            .find(|e| e.id == id)
            .ok_or(ConfigError::EntryNotFound(id))?;
        entry.name = name.to_string();
        self.write()?;
        tracing::info!(%id, name, "library entry renamed");
        Ok(())
    }

    /// Remove an entry and persist.
    pub fn delete(&mut self, id: Uuid) -> Result<SavedPatch, ConfigError> {
        let index = self
            .entries
            .iter()
            .position(|e| e.id == id)
            .ok_or(ConfigError::EntryNotFound(id))?;
        let removed = self.entries.remove(index);
        self.write()?;
        tracing::info!(%id, name = %removed.name, "library entry deleted");
        Ok(removed)
    }

    fn write(&self) -> Result<(), ConfigError> {
        if self.damaged {
            return Err(ConfigError::DamagedLibrary(self.path.clone()));
        }
        if let Some(parent) = self.path.parent() {
            paths::ensure_dir(parent)?;
        }

        let mut stored = Vec::with_capacity(self.entries.len() + self.unreadable.len());
        for entry in &self.entries {
            stored.push(serde_json::to_value(entry)?);
        }
        stored.extend(self.unreadable.iter().cloned());

        let content = serde_json::to_string(&stored)?;
        std::fs::write(&self.path, content).map_err(|e| ConfigError::write_file(&self.path, e))
    }
}

/// Raw stored entries; `None` when the file exists but is not a JSON array.
fn read_stored(path: &Path) -> Option<Vec<Value>> {
    if !path.exists() {
        return Some(Vec::new());
    }

    let raw = match std::fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "library unreadable, opening read-only");
            return None;
        }
    };
    match serde_json::from_str(&raw) {
        Ok(values) => Some(values),
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "library corrupt, opening read-only");
            None
        }
    }
}

/// Entries are read field by field so the patch goes through migration.
fn read_entry(mut value: Value) -> Result<SavedPatch, ConfigError> {
    #[derive(Deserialize)]
    #[serde(rename_all = "camelCase")]
    struct Header {
        id: Uuid,
        name: String,
        #[serde(default)]
        created_at: u64,
    }

    let patch = value
        .as_object_mut()
        .and_then(|obj| obj.remove("patch"))
        .unwrap_or(Value::Null);

    let header: Header = serde_json::from_value(value)?;
    Ok(SavedPatch {
        id: header.id,
        name: header.name,
        created_at: header.created_at,
        patch: migrate_value(patch)?,
    })
}

fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}
