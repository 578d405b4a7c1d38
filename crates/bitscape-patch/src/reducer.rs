//! Patch state machine.
//!
//! [`reduce`] maps `(snapshot, action)` to a new snapshot. It never fails:
//! unknown actions and operator indices outside `0..4` return the input
//! unchanged. Every transition keeps the patch invariants:
//!
//! - connections stay duplicate-free
//! - `ratio` and `ringAngle` always agree
//! - mod depths are recomputed whenever connections or positions change
//! - self-loop edits rebuild feedback for every loop-owned operator

use serde::{Deserialize, Serialize};

use crate::constants::OPERATOR_COUNT;
use crate::graph::{Connection, SelfLoop};
use crate::lfo::{LfoParams, LfoSlot};
use crate::operator::{ModEnvelope, Point, Waveform};
use crate::params::{Adsr, ChorusParams, DelayParams, FeedbackSource, FilterType, ReverbParams};
use crate::patch::Patch;

/// One user edit.
///
/// Serialized with a `"type"` tag in SCREAMING_SNAKE_CASE and camelCase
/// payload keys, e.g. `{"type":"ADD_CONNECTION","src":1,"dst":0}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(
    tag = "type",
    rename_all = "SCREAMING_SNAKE_CASE",
    rename_all_fields = "camelCase"
)]
pub enum PatchAction {
    /// Move an operator node; recomputes mod depths.
    MoveOperator {
        /// Operator to move.
        op_index: usize,
        /// New canvas position.
        position: Point,
    },
    /// Turn an operator's ratio ring; the ratio follows the angle.
    SetRingAngle {
        /// Operator to edit.
        op_index: usize,
        /// Ring angle in radians.
        angle: f32,
    },
    /// Draw a modulation edge. Idempotent.
    AddConnection {
        /// Modulator.
        src: usize,
        /// Modulated operator.
        dst: usize,
    },
    /// Erase a modulation edge.
    RemoveConnection {
        /// Modulator.
        src: usize,
        /// Modulated operator.
        dst: usize,
    },
    /// Create or resize an operator's feedback loop.
    SetSelfLoop {
        /// Operator carrying the loop.
        op_index: usize,
        /// Loop radius in pixels; clamped to the drawable range.
        radius: f32,
    },
    /// Remove an operator's feedback loop.
    RemoveSelfLoop {
        /// Operator carrying the loop.
        op_index: usize,
    },
    /// Set a ratio directly; snaps to the table and moves the ring.
    SetRatio {
        /// Operator to edit.
        op_index: usize,
        /// Requested frequency multiplier.
        ratio: f32,
    },
    /// Set an operator's waveform.
    SetWaveform {
        /// Operator to edit.
        op_index: usize,
        /// New waveform.
        waveform: Waveform,
    },
    /// Set feedback directly, taking ownership from the self-loop.
    SetOperatorFeedback {
        /// Operator to edit.
        op_index: usize,
        /// Feedback, 0-127.
        value: f32,
    },
    /// Set per-operator detune.
    SetOperatorDetune {
        /// Operator to edit.
        op_index: usize,
        /// Detune in cents.
        value: f32,
    },
    /// Set per-operator wave folding.
    SetOperatorHarm {
        /// Operator to edit.
        op_index: usize,
        /// Harm amount.
        value: f32,
    },
    /// Set per-operator output level.
    SetOperatorLevel {
        /// Operator to edit.
        op_index: usize,
        /// Level, 0-127.
        value: f32,
    },
    /// Replace an operator's modulation envelope.
    SetOperatorModEnv {
        /// Operator to edit.
        op_index: usize,
        /// Attack time.
        attack: f32,
        /// Decay time.
        decay: f32,
        /// End level.
        end: f32,
    },
    /// Set global harm.
    SetHarm {
        /// New value.
        value: f32,
    },
    /// Set carrier mix.
    SetCarrierMix {
        /// New value.
        value: f32,
    },
    /// Set every operator's feedback to one value (legacy).
    SetFeedback {
        /// New value.
        value: f32,
    },
    /// Set global detune.
    SetDetune {
        /// New value.
        value: f32,
    },
    /// Replace the amp envelope.
    SetAmpEnv(Adsr),
    /// Set master volume.
    SetMasterVolume {
        /// New value.
        value: f32,
    },
    /// Set master pan.
    SetMasterPan {
        /// New value.
        value: f32,
    },
    /// Set output overdrive.
    SetMasterOverdrive {
        /// New value.
        value: f32,
    },
    /// Set octave shift.
    SetOctave {
        /// New value.
        value: i32,
    },
    /// Set portamento time.
    SetPortamentoTime {
        /// New value.
        value: f32,
    },
    /// Set pitch bend range.
    SetPitchBendRange {
        /// New value.
        value: f32,
    },
    /// Set current pitch bend.
    SetPitchBend {
        /// New value.
        value: f32,
    },
    /// Set filter mode.
    SetFilterType {
        /// New value.
        value: FilterType,
    },
    /// Set filter cutoff (0-127).
    SetFilterCutoff {
        /// New value.
        value: f32,
    },
    /// Set filter resonance (0-127).
    SetFilterResonance {
        /// New value.
        value: f32,
    },
    /// Replace the filter envelope.
    SetFilterEnv(Adsr),
    /// Set filter envelope amount.
    SetFilterEnvAmount {
        /// New value.
        value: f32,
    },
    /// Replace the delay block.
    SetDelay(DelayParams),
    /// Replace the reverb block.
    SetReverb(ReverbParams),
    /// Replace the chorus block.
    SetChorus(ChorusParams),
    /// Replace LFO 1.
    SetLfo1(LfoParams),
    /// Replace LFO 2.
    SetLfo2(LfoParams),
    /// Replace the whole patch.
    LoadPatch {
        /// Incoming patch, taken as-is.
        patch: Box<Patch>,
    },
    /// Unrecognised action type; ignored.
    #[serde(other)]
    Unknown,
}

impl PatchAction {
    /// Wire name of the action.
    pub fn name(&self) -> &'static str {
        match self {
            PatchAction::MoveOperator { .. } => "MOVE_OPERATOR",
            PatchAction::SetRingAngle { .. } => "SET_RING_ANGLE",
            PatchAction::AddConnection { .. } => "ADD_CONNECTION",
            PatchAction::RemoveConnection { .. } => "REMOVE_CONNECTION",
            PatchAction::SetSelfLoop { .. } => "SET_SELF_LOOP",
            PatchAction::RemoveSelfLoop { .. } => "REMOVE_SELF_LOOP",
            PatchAction::SetRatio { .. } => "SET_RATIO",
            PatchAction::SetWaveform { .. } => "SET_WAVEFORM",
            PatchAction::SetOperatorFeedback { .. } => "SET_OPERATOR_FEEDBACK",
            PatchAction::SetOperatorDetune { .. } => "SET_OPERATOR_DETUNE",
            PatchAction::SetOperatorHarm { .. } => "SET_OPERATOR_HARM",
            PatchAction::SetOperatorLevel { .. } => "SET_OPERATOR_LEVEL",
            PatchAction::SetOperatorModEnv { .. } => "SET_OPERATOR_MOD_ENV",
            PatchAction::SetHarm { .. } => "SET_HARM",
            PatchAction::SetCarrierMix { .. } => "SET_CARRIER_MIX",
            PatchAction::SetFeedback { .. } => "SET_FEEDBACK",
            PatchAction::SetDetune { .. } => "SET_DETUNE",
            PatchAction::SetAmpEnv(_) => "SET_AMP_ENV",
            PatchAction::SetMasterVolume { .. } => "SET_MASTER_VOLUME",
            PatchAction::SetMasterPan { .. } => "SET_MASTER_PAN",
            PatchAction::SetMasterOverdrive { .. } => "SET_MASTER_OVERDRIVE",
            PatchAction::SetOctave { .. } => "SET_OCTAVE",
            PatchAction::SetPortamentoTime { .. } => "SET_PORTAMENTO_TIME",
            PatchAction::SetPitchBendRange { .. } => "SET_PITCH_BEND_RANGE",
            PatchAction::SetPitchBend { .. } => "SET_PITCH_BEND",
            PatchAction::SetFilterType { .. } => "SET_FILTER_TYPE",
            PatchAction::SetFilterCutoff { .. } => "SET_FILTER_CUTOFF",
            PatchAction::SetFilterResonance { .. } => "SET_FILTER_RESONANCE",
            PatchAction::SetFilterEnv(_) => "SET_FILTER_ENV",
            PatchAction::SetFilterEnvAmount { .. } => "SET_FILTER_ENV_AMOUNT",
            PatchAction::SetDelay(_) => "SET_DELAY",
            PatchAction::SetReverb(_) => "SET_REVERB",
            PatchAction::SetChorus(_) => "SET_CHORUS",
            PatchAction::SetLfo1(_) => "SET_LFO1",
            PatchAction::SetLfo2(_) => "SET_LFO2",
            PatchAction::LoadPatch { .. } => "LOAD_PATCH",
            PatchAction::Unknown => "UNKNOWN",
        }
    }
}

/// Whether `index` names an operator; logs and rejects anything else.
fn valid_operator(index: usize, action: &PatchAction) -> bool {
    let ok = index < OPERATOR_COUNT;
    if !ok {
        tracing::warn!(action = action.name(), index, "operator index out of range, ignored");
    }
    ok
}

fn log_depths(action: &PatchAction, patch: &Patch) {
    tracing::debug!(
        action = action.name(),
        mod_depth_a = patch.mod_depth_a,
        mod_depth_b = patch.mod_depth_b,
        "mod depths recomputed"
    );
}

/// Apply one action to a snapshot, producing the next snapshot.
pub fn reduce(state: &Patch, action: &PatchAction) -> Patch {
    let mut next = state.clone();

    match action {
        PatchAction::MoveOperator { op_index, position } => {
            if !valid_operator(*op_index, action) {
                return next;
            }
            next.operators[*op_index].position = *position;
            next.recompute_mod_depths();
            log_depths(action, &next);
        }

        PatchAction::SetRingAngle { op_index, angle } => {
            if valid_operator(*op_index, action) {
                next.operators[*op_index].set_ratio_by_angle(*angle);
            }
        }

        PatchAction::AddConnection { src, dst } => {
            if !valid_operator(*src, action) || !valid_operator(*dst, action) {
                return next;
            }
            if next.has_connection(*src, *dst) {
                return next;
            }
            next.connections.push(Connection::new(*src, *dst));
            next.recompute_mod_depths();
            log_depths(action, &next);
        }

        PatchAction::RemoveConnection { src, dst } => {
            next.connections.retain(|c| !(c.src == *src && c.dst == *dst));
            next.recompute_mod_depths();
            log_depths(action, &next);
        }

        PatchAction::SetSelfLoop { op_index, radius } => {
            if !valid_operator(*op_index, action) {
                return next;
            }
            let new_loop = SelfLoop::new(*op_index, *radius);
            match next.self_loops.iter_mut().find(|l| l.op_index == *op_index) {
                Some(existing) => *existing = new_loop,
                None => next.self_loops.push(new_loop),
            }
            next.feedback_source[*op_index] = FeedbackSource::SelfLoop;
            next.rebuild_feedback();
            tracing::debug!(op = op_index, feedback = ?next.operator_feedback, "self-loop set");
        }

        PatchAction::RemoveSelfLoop { op_index } => {
            if !valid_operator(*op_index, action) {
                return next;
            }
            next.self_loops.retain(|l| l.op_index != *op_index);
            next.feedback_source[*op_index] = FeedbackSource::SelfLoop;
            next.rebuild_feedback();
            tracing::debug!(op = op_index, feedback = ?next.operator_feedback, "self-loop removed");
        }

        PatchAction::SetRatio { op_index, ratio } => {
            if valid_operator(*op_index, action) {
                next.operators[*op_index].set_ratio_by_value(*ratio);
            }
        }

        PatchAction::SetWaveform { op_index, waveform } => {
            if valid_operator(*op_index, action) {
                next.operators[*op_index].waveform = *waveform;
            }
        }

        PatchAction::SetOperatorFeedback { op_index, value } => {
            if valid_operator(*op_index, action) {
                next.operator_feedback[*op_index] = *value;
                next.feedback_source[*op_index] = FeedbackSource::Manual;
            }
        }

        PatchAction::SetOperatorDetune { op_index, value } => {
            if valid_operator(*op_index, action) {
                next.operator_detune[*op_index] = *value;
            }
        }

        PatchAction::SetOperatorHarm { op_index, value } => {
            if valid_operator(*op_index, action) {
                next.operator_harm[*op_index] = *value;
            }
        }

        PatchAction::SetOperatorLevel { op_index, value } => {
            if valid_operator(*op_index, action) {
                next.operator_level[*op_index] = *value;
            }
        }

        PatchAction::SetOperatorModEnv {
            op_index,
            attack,
            decay,
            end,
        } => {
            if valid_operator(*op_index, action) {
                next.operator_mod_env[*op_index] = ModEnvelope::new(*attack, *decay, *end);
            }
        }

        PatchAction::SetHarm { value } => next.harm = *value,
        PatchAction::SetCarrierMix { value } => next.carrier_mix = *value,
        PatchAction::SetFeedback { value } => {
            next.operator_feedback = [*value; OPERATOR_COUNT];
            next.feedback_source = [FeedbackSource::Manual; OPERATOR_COUNT];
        }
        PatchAction::SetDetune { value } => next.detune = *value,
        PatchAction::SetAmpEnv(env) => next.set_amp_envelope(*env),
        PatchAction::SetMasterVolume { value } => next.master_volume = *value,
        PatchAction::SetMasterPan { value } => next.master_pan = *value,
        PatchAction::SetMasterOverdrive { value } => next.master_overdrive = *value,
        PatchAction::SetOctave { value } => next.octave = *value,
        PatchAction::SetPortamentoTime { value } => next.portamento_time = *value,
        PatchAction::SetPitchBendRange { value } => next.pitch_bend_range = *value,
        PatchAction::SetPitchBend { value } => next.pitch_bend = *value,
        PatchAction::SetFilterType { value } => next.filter_type = *value,
        PatchAction::SetFilterCutoff { value } => next.filter_cutoff = *value,
        PatchAction::SetFilterResonance { value } => next.filter_resonance = *value,
        PatchAction::SetFilterEnv(env) => next.set_filter_envelope(*env),
        PatchAction::SetFilterEnvAmount { value } => next.filter_env_amount = *value,
        PatchAction::SetDelay(p) => next.set_delay(*p),
        PatchAction::SetReverb(p) => next.set_reverb(*p),
        PatchAction::SetChorus(p) => next.set_chorus(*p),
        PatchAction::SetLfo1(p) => next.set_lfo(LfoSlot::Lfo1, *p),
        PatchAction::SetLfo2(p) => next.set_lfo(LfoSlot::Lfo2, *p),

        PatchAction::LoadPatch { patch } => {
            tracing::debug!(connections = patch.connections.len(), "patch loaded");
            return (**patch).clone();
        }

        PatchAction::Unknown => {}
    }

    next
}

impl Patch {
    /// Snapshot produced by applying `action` to this one.
    pub fn apply(&self, action: &PatchAction) -> Patch {
        reduce(self, action)
    }
}
