//! Integration tests for bitscape-config.
//!
//! These tests drive the library, session slot and file transfer together
//! against temporary directories.

use bitscape_config::{
    ConfigError, PatchLibrary, Settings, export_patch, import_patch, load_last_session,
    save_last_session,
};
use bitscape_patch::{FeedbackSource, Patch, PatchAction, Waveform};
use serde_json::json;
use tempfile::TempDir;

fn bell() -> Patch {
    [
        PatchAction::AddConnection { src: 1, dst: 0 },
        PatchAction::AddConnection { src: 3, dst: 2 },
        PatchAction::SetSelfLoop {
            op_index: 3,
            radius: 45.0,
        },
        PatchAction::SetWaveform {
            op_index: 1,
            waveform: Waveform::Triangle,
        },
        PatchAction::SetFilterCutoff { value: 70.0 },
    ]
    .iter()
    .fold(Patch::initial(), |p, a| p.apply(a))
}

/// Test an edit session: save to the library, export, import back and restore.
#[test]
fn test_library_export_import_cycle() {
    let temp_dir = TempDir::new().unwrap();
    let dir = temp_dir.path();

    let mut library = PatchLibrary::open(dir);
    let entry = library.save("Glass Bell", &bell()).unwrap();

    let exported = dir.join("glass_bell.json");
    export_patch(&library.get(entry.id).unwrap().patch, &exported).unwrap();

    let imported = import_patch(&exported).unwrap();
    assert_eq!(imported, bell());

    let copy = library.save("Glass Bell (copy)", &imported).unwrap();
    let reopened = PatchLibrary::open(dir);
    assert_eq!(reopened.len(), 2);
    assert_eq!(reopened.get(copy.id).unwrap().patch, bell());
}

/// Test that a patch saved by an older editor imports with its waveforms and
/// feedback intact.
#[test]
fn test_import_legacy_file() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("legacy.json");

    let mut v = serde_json::to_value(bell()).unwrap();
    let obj = v.as_object_mut().unwrap();
    obj.remove("feedbackSource");
    obj.insert("algorithmIndex".into(), json!(3));
    obj.insert("operatorWaveforms".into(), json!([0, 3, 0, 2]));
    obj.insert("filterResonance".into(), json!(0.707));
    obj["operatorFeedback"][0] = json!(12.0);
    std::fs::write(&path, v.to_string()).unwrap();

    let patch = import_patch(&path).unwrap();
    assert_eq!(patch.operators[1].waveform, Waveform::Triangle);
    assert_eq!(patch.operators[3].waveform, Waveform::Saw);
    assert_eq!(patch.feedback_source[0], FeedbackSource::Manual);
    assert_eq!(patch.feedback_source[3], FeedbackSource::SelfLoop);
    assert_eq!(patch.operator_feedback[3], bell().operator_feedback[3]);
    // raw Q detected, filter reset
    assert_eq!(patch.filter_resonance, 0.0);
    assert_eq!(patch.filter_cutoff, 127.0);
}

/// Test that invalid imports are rejected with every failure listed.
#[test]
fn test_import_reports_all_failures() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("broken.json");

    let mut v = serde_json::to_value(Patch::initial()).unwrap();
    v["connections"] = json!([{ "src": 1, "dst": 0 }, { "src": 1, "dst": 0 }]);
    v["lfo1Destination"] = json!(40);
    std::fs::write(&path, v.to_string()).unwrap();

    let err = import_patch(&path).unwrap_err();
    let ConfigError::Validation(inner) = err else {
        panic!("expected validation error, got {err:?}");
    };
    let msg = inner.to_string();
    assert!(msg.contains("duplicate connection 1 -> 0"));
    assert!(msg.contains("lfo1 destination 40"));
}

/// Test the session slot honouring the library directory from settings.
#[test]
fn test_session_slot_in_configured_dir() {
    let temp_dir = TempDir::new().unwrap();
    let settings_path = temp_dir.path().join("settings.toml");
    let library_dir = temp_dir.path().join("patches");

    Settings {
        library_dir: Some(library_dir.clone()),
        ..Settings::default()
    }
    .save(&settings_path)
    .unwrap();

    let settings = Settings::load_or_default(&settings_path).unwrap();
    assert_eq!(settings.library_dir(), library_dir);

    assert!(load_last_session(&settings.library_dir()).is_none());
    save_last_session(&settings.library_dir(), &bell()).unwrap();
    assert_eq!(load_last_session(&library_dir), Some(bell()));
}

/// Test that entries written by a newer editor survive saving from this one.
#[test]
fn test_library_keeps_entries_it_cannot_read() {
    let temp_dir = TempDir::new().unwrap();
    let dir = temp_dir.path();

    let mut library = PatchLibrary::open(dir);
    let known = library.save("known", &bell()).unwrap();

    let path = library.path().to_path_buf();
    let mut stored: Vec<serde_json::Value> =
        serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    let mut future = serde_json::to_value(library.get(known.id).unwrap()).unwrap();
    future["id"] = json!("5f0c6a52-3a43-4d8e-9a0e-1c2b3d4e5f60");
    future["name"] = json!("future");
    future["patch"]["operators"][0]["waveform"] = json!(9);
    stored.push(future.clone());
    std::fs::write(&path, serde_json::to_string(&stored).unwrap()).unwrap();

    let mut library = PatchLibrary::open(dir);
    assert_eq!(library.len(), 1);
    assert_eq!(library.unreadable_count(), 1);
    library.save("new", &Patch::initial()).unwrap();

    let stored: Vec<serde_json::Value> =
        serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    let names: Vec<&str> = stored.iter().filter_map(|e| e["name"].as_str()).collect();
    assert_eq!(names, ["known", "new", "future"]);
    assert_eq!(stored[2], future);

    let reopened = PatchLibrary::open(dir);
    assert_eq!(reopened.len(), 2);
    assert_eq!(reopened.unreadable_count(), 1);
}

/// Test that a library file that does not parse is never overwritten.
#[test]
fn test_damaged_library_is_not_overwritten() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("library.json");
    std::fs::write(&path, "[{\"id\": ").unwrap();

    let mut library = PatchLibrary::open(temp_dir.path());
    assert!(library.is_empty());
    assert!(matches!(
        library.save("new", &bell()),
        Err(ConfigError::DamagedLibrary(p)) if p == path
    ));
    assert_eq!(std::fs::read_to_string(&path).unwrap(), "[{\"id\": ");
}
