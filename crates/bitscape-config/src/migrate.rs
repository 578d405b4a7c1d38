//! Upgrading patches written by older editor versions.
//!
//! Older files differ from the current [`Patch`] layout in three ways:
//!
//! - waveforms were kept twice, in each operator and in a parallel
//!   `operatorWaveforms` array that the engine actually followed
//! - there was no `feedbackSource`, so a hand-set feedback value could not be
//!   told apart from one derived from a self-loop
//! - filter cutoff and resonance were stored as raw Hz and Q instead of
//!   0-127 slider positions
//!
//! Migration runs on imported files and on the last-session slot. The reducer
//! never migrates.

use bitscape_patch::constants::{angle_for_snap_index, nearest_snap_index};
use bitscape_patch::{OPERATOR_COUNT, Patch};
use serde_json::{Map, Value};

use crate::ConfigError;

/// Legacy parallel waveform array.
const LEGACY_WAVEFORMS_KEY: &str = "operatorWaveforms";

/// Parse a patch from JSON, upgrading legacy layouts on the way.
pub fn migrate_value(mut value: Value) -> Result<Patch, ConfigError> {
    let mut needs_sources = false;

    if let Some(obj) = value.as_object_mut() {
        fold_legacy_waveforms(obj);
        fill_operator_fields(obj);
        needs_sources = !obj.contains_key("feedbackSource");
    }

    let mut patch: Patch = serde_json::from_value(value)?;

    if needs_sources {
        patch.infer_feedback_sources();
        tracing::debug!(sources = ?patch.feedback_source, "inferred feedback sources");
    }

    sanitize_filter(&mut patch);
    Ok(patch)
}

/// Reset filter cutoff and resonance stored in the old raw units.
///
/// A cutoff above 127 can only be Hz. A resonance strictly between 0 and 0.5
/// can only be a raw Q (the slider moves in whole steps and rests at 0). Both
/// fields return to their initial values since raw units cannot be mapped
/// back onto the slider curves. Returns whether anything changed.
pub fn sanitize_filter(patch: &mut Patch) -> bool {
    let stale_cutoff = patch.filter_cutoff > 127.0;
    let stale_resonance = patch.filter_resonance > 0.0 && patch.filter_resonance < 0.5;
    if !(stale_cutoff || stale_resonance) {
        return false;
    }

    let defaults = Patch::initial();
    tracing::info!(
        cutoff = patch.filter_cutoff,
        resonance = patch.filter_resonance,
        "resetting filter stored in raw units"
    );
    patch.filter_cutoff = defaults.filter_cutoff;
    patch.filter_resonance = defaults.filter_resonance;
    true
}

/// Move `operatorWaveforms[i]` into `operators[i].waveform` and drop the array.
fn fold_legacy_waveforms(obj: &mut Map<String, Value>) {
    let Some(Value::Array(waveforms)) = obj.remove(LEGACY_WAVEFORMS_KEY) else {
        return;
    };
    let Some(Value::Array(operators)) = obj.get_mut("operators") else {
        return;
    };

    for (op, waveform) in operators.iter_mut().zip(waveforms).take(OPERATOR_COUNT) {
        if let Some(op) = op.as_object_mut() {
            op.insert("waveform".to_string(), waveform);
        }
    }
    tracing::debug!("folded legacy operatorWaveforms into operators");
}

/// Give every operator a waveform and a ring angle consistent with its ratio.
fn fill_operator_fields(obj: &mut Map<String, Value>) {
    let Some(Value::Array(operators)) = obj.get_mut("operators") else {
        return;
    };

    for op in operators.iter_mut().filter_map(Value::as_object_mut) {
        op.entry("waveform").or_insert(Value::from(0));
        if !op.contains_key("ringAngle") {
            let ratio = op.get("ratio").and_then(Value::as_f64).unwrap_or(1.0);
            let angle = angle_for_snap_index(nearest_snap_index(ratio as f32));
            op.insert("ringAngle".to_string(), Value::from(angle));
        }
    }
}
