//! Snapshot diffing and ordered dispatch.
//!
//! [`EngineSync`] remembers the last snapshot it successfully pushed and, on
//! each pass, sends one call per tracked field that differs from it. With no
//! baseline every field counts as changed.
//!
//! # Ordering
//!
//! The engine applies routing with whatever depths are resident, so a pass
//! that sends routing sends both mod depths first (A, then B), even if they
//! did not change. Depth-only changes send only the changed depths.
//! Routing is resent when the connections or any operator feedback change,
//! since feedback is folded into the edge list as synthetic self-loops.
//!
//! A filter-type change resends cutoff and resonance right after the type.
//! An LFO destination change resends the depth rescaled for the new
//! destination.
//!
//! # Readiness
//!
//! If the engine is not ready the whole pass is skipped and the baseline is
//! left alone, so the next ready pass sends everything that differs.

use bitscape_patch::{LfoSlot, OPERATOR_COUNT, Patch};

use crate::call::EngineCall;
use crate::engine::Engine;
use crate::mapping::{cutoff_hz, resonance_q, scaled_lfo_depth};

/// Result of one sync pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncOutcome {
    /// Engine not ready; nothing sent, baseline unchanged.
    Skipped,
    /// Calls were sent and the baseline advanced.
    Synced {
        /// Number of calls sent.
        calls: usize,
    },
}

impl SyncOutcome {
    /// Number of calls sent by the pass.
    pub fn calls(self) -> usize {
        match self {
            SyncOutcome::Skipped => 0,
            SyncOutcome::Synced { calls } => calls,
        }
    }
}

/// Stateful diff engine holding the last synced snapshot.
#[derive(Debug, Clone, Default)]
pub struct EngineSync {
    baseline: Option<Patch>,
}

impl EngineSync {
    /// A sync with no baseline; its first pass sends every field.
    pub fn new() -> Self {
        Self { baseline: None }
    }

    /// A sync that treats `patch` as already resident in the engine.
    pub fn with_baseline(patch: Patch) -> Self {
        Self {
            baseline: Some(patch),
        }
    }

    /// Last successfully synced snapshot.
    pub fn baseline(&self) -> Option<&Patch> {
        self.baseline.as_ref()
    }

    /// Forget the baseline so the next pass is a full one.
    pub fn reset(&mut self) {
        self.baseline = None;
    }

    /// Calls the next pass would send for `current`, without sending them.
    pub fn plan(&self, current: &Patch) -> Vec<EngineCall> {
        diff_patches(self.baseline.as_ref(), current)
    }

    /// Push the differences between the baseline and `current` to `engine`.
    pub fn sync<E: Engine>(&mut self, current: &Patch, engine: &mut E) -> SyncOutcome {
        if !engine.is_ready() {
            tracing::warn!("engine not ready, sync pass skipped");
            return SyncOutcome::Skipped;
        }

        let calls = self.plan(current);
        let count = calls.len();
        for call in calls {
            tracing::debug!(%call, "engine call");
            engine.send(call);
        }

        self.baseline = Some(current.clone());
        SyncOutcome::Synced { calls: count }
    }
}

/// Ordered calls that bring an engine holding `prev` up to `current`.
///
/// `None` means nothing is known about the engine and every field is sent.
pub fn diff_patches(prev: Option<&Patch>, current: &Patch) -> Vec<EngineCall> {
    let mut diff = Diff {
        prev,
        cur: current,
        out: Vec::new(),
    };
    diff.routing();
    diff.operator_params();
    diff.globals();
    diff.filter();
    diff.effects();
    for slot in LfoSlot::ALL {
        diff.lfo(slot);
    }
    diff.mod_envelopes();
    diff.ratios_and_waveforms();
    diff.out
}

/// Every call needed to bring an unknown engine up to `patch`.
pub fn full_sync(patch: &Patch) -> Vec<EngineCall> {
    diff_patches(None, patch)
}

/// Routing table for a patch: flattened edges and carrier list.
pub fn routing_call(patch: &Patch) -> EngineCall {
    let modulations = patch
        .routing_edges()
        .iter()
        .flat_map(|c| [c.src as u32, c.dst as u32])
        .collect();
    let carriers = patch.carriers().into_iter().map(|i| i as u32).collect();
    EngineCall::CustomRouting {
        modulations,
        carriers,
    }
}

struct Diff<'a> {
    prev: Option<&'a Patch>,
    cur: &'a Patch,
    out: Vec<EngineCall>,
}

impl Diff<'_> {
    fn changed<T: PartialEq>(&self, field: impl Fn(&Patch) -> T) -> bool {
        self.prev.is_none_or(|p| field(p) != field(self.cur))
    }

    fn emit_if<T: PartialEq>(
        &mut self,
        field: impl Fn(&Patch) -> T,
        call: impl FnOnce(T) -> EngineCall,
    ) {
        if self.changed(&field) {
            let value = field(self.cur);
            self.out.push(call(value));
        }
    }

    fn routing(&mut self) {
        let connections_changed = self
            .prev
            .is_none_or(|p| p.connections != self.cur.connections);
        let routing_changed = connections_changed || self.changed(|p| p.operator_feedback);
        let depth_a = routing_changed || self.changed(|p| p.mod_depth_a);
        let depth_b = routing_changed || self.changed(|p| p.mod_depth_b);

        if depth_a {
            self.out.push(EngineCall::ModDepthA(self.cur.mod_depth_a));
        }
        if depth_b {
            self.out.push(EngineCall::ModDepthB(self.cur.mod_depth_b));
        }
        if routing_changed {
            tracing::debug!(
                connections = self.cur.connections.len(),
                carriers = ?self.cur.carriers(),
                "routing changed"
            );
            self.out.push(routing_call(self.cur));
        }
    }

    fn operator_params(&mut self) {
        for op in 0..OPERATOR_COUNT {
            self.emit_if(
                |p| p.operator_feedback[op],
                |value| EngineCall::OperatorFeedback { op, value },
            );
        }
        for op in 0..OPERATOR_COUNT {
            self.emit_if(
                |p| p.operator_detune[op],
                |value| EngineCall::OperatorDetune { op, value },
            );
        }
        for op in 0..OPERATOR_COUNT {
            self.emit_if(
                |p| p.operator_harm[op],
                |value| EngineCall::OperatorHarm { op, value },
            );
        }
        for op in 0..OPERATOR_COUNT {
            self.emit_if(
                |p| p.operator_level[op],
                |value| EngineCall::OperatorLevel { op, value },
            );
        }
    }

    fn globals(&mut self) {
        self.emit_if(|p| p.harm, EngineCall::Harm);
        self.emit_if(|p| p.carrier_mix, EngineCall::CarrierMix);
        self.emit_if(|p| p.detune, EngineCall::Detune);
        self.emit_if(Patch::amp_envelope, |env| EngineCall::AmpEnv {
            attack: env.attack,
            decay: env.decay,
            sustain: env.sustain,
            release: env.release,
        });
        self.emit_if(|p| p.master_volume, EngineCall::Volume);
        self.emit_if(|p| p.master_pan, EngineCall::Pan);
        self.emit_if(|p| p.portamento_time, EngineCall::PortamentoTime);
        self.emit_if(|p| p.pitch_bend_range, EngineCall::PitchBendRange);
        self.emit_if(|p| p.pitch_bend, EngineCall::PitchBend);
        self.emit_if(|p| p.master_overdrive, EngineCall::Overdrive);
        self.emit_if(|p| p.octave, EngineCall::Octave);
    }

    fn filter(&mut self) {
        if self.changed(|p| p.filter_type) {
            // the engine rebuilds coefficients per mode; resend both inputs
            self.out.push(EngineCall::FilterType(self.cur.filter_type.id()));
            self.out.push(EngineCall::FilterCutoff(cutoff_hz(self.cur.filter_cutoff)));
            self.out
                .push(EngineCall::FilterResonance(resonance_q(self.cur.filter_resonance)));
        } else {
            self.emit_if(|p| p.filter_cutoff, |raw| EngineCall::FilterCutoff(cutoff_hz(raw)));
            self.emit_if(
                |p| p.filter_resonance,
                |raw| EngineCall::FilterResonance(resonance_q(raw)),
            );
        }
        self.emit_if(|p| p.filter_env_attack, EngineCall::FilterAttack);
        self.emit_if(|p| p.filter_env_decay, EngineCall::FilterDecay);
        self.emit_if(|p| p.filter_env_sustain, EngineCall::FilterSustain);
        self.emit_if(|p| p.filter_env_release, EngineCall::FilterRelease);
        self.emit_if(|p| p.filter_env_amount, EngineCall::FilterEnvAmount);
    }

    fn effects(&mut self) {
        self.emit_if(|p| p.delay_enabled, EngineCall::DelayEnabled);
        self.emit_if(|p| p.delay_ms, EngineCall::DelayMs);
        self.emit_if(|p| p.delay_feedback, EngineCall::DelayFeedback);
        self.emit_if(|p| p.delay_mix, EngineCall::DelayMix);

        self.emit_if(|p| p.reverb_enabled, EngineCall::ReverbEnabled);
        self.emit_if(|p| p.reverb_decay, EngineCall::ReverbDecay);
        self.emit_if(|p| p.reverb_damping, EngineCall::ReverbDamping);
        self.emit_if(|p| p.reverb_mix, EngineCall::ReverbMix);

        self.emit_if(|p| p.chorus_enabled, EngineCall::ChorusEnabled);
        self.emit_if(|p| p.chorus_depth, EngineCall::ChorusDepth);
        self.emit_if(|p| p.chorus_speed, EngineCall::ChorusSpeed);
        self.emit_if(|p| p.chorus_width, EngineCall::ChorusWidth);
        self.emit_if(|p| p.chorus_hpf_cutoff, EngineCall::ChorusHpfCutoff);
        self.emit_if(|p| p.chorus_delay_ms, EngineCall::ChorusDelayMs);
        self.emit_if(|p| p.chorus_reverb_send, EngineCall::ChorusReverbSend);
    }

    fn lfo(&mut self, slot: LfoSlot) {
        let lfo = self.cur.lfo(slot);
        let destination_changed = self.changed(|p| p.lfo(slot).destination);
        let depth_changed = self.changed(|p| p.lfo(slot).depth);

        self.emit_if(|p| p.lfo(slot).speed, |v| EngineCall::LfoSpeed(slot, v));
        if destination_changed {
            self.out.push(EngineCall::LfoDestination(slot, lfo.destination));
        }
        if destination_changed || depth_changed {
            let depth = scaled_lfo_depth(lfo.depth, lfo.destination);
            self.out.push(EngineCall::LfoDepth(slot, depth));
        }
        self.emit_if(|p| p.lfo(slot).waveform, |v| EngineCall::LfoWaveform(slot, v));
        self.emit_if(|p| p.lfo(slot).mode, |v| EngineCall::LfoMode(slot, v));
        self.emit_if(|p| p.lfo(slot).multiplier, |v| EngineCall::LfoMultiplier(slot, v));
        self.emit_if(|p| p.lfo(slot).fade, |v| EngineCall::LfoFade(slot, v));
    }

    fn mod_envelopes(&mut self) {
        for op in 0..OPERATOR_COUNT {
            self.emit_if(
                |p| p.operator_mod_env[op],
                |env| EngineCall::OperatorModEnv {
                    op,
                    attack: env.attack,
                    decay: env.decay,
                    end: env.end,
                },
            );
        }
    }

    fn ratios_and_waveforms(&mut self) {
        let b_changed =
            self.changed(|p| p.operators[2].ratio) || self.changed(|p| p.operators[3].ratio);

        for op in 0..OPERATOR_COUNT {
            match op {
                0 => self.emit_if(|p| p.operators[0].ratio, EngineCall::RatioC),
                1 => self.emit_if(|p| p.operators[1].ratio, EngineCall::RatioA),
                2 if b_changed => self.out.push(EngineCall::RatioB(
                    self.cur.operators[2].ratio,
                    self.cur.operators[3].ratio,
                )),
                _ => {}
            }
            self.emit_if(
                |p| p.operators[op].waveform,
                |w| EngineCall::OperatorWaveform {
                    op,
                    waveform: w.id(),
                },
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::RecordingEngine;
    use bitscape_patch::{FilterType, PatchAction};

    fn names(calls: &[EngineCall]) -> Vec<&'static str> {
        calls.iter().map(EngineCall::name).collect()
    }

    #[test]
    fn first_pass_sends_every_field_once() {
        let calls = full_sync(&Patch::initial());
        assert_eq!(calls.len(), 78);
        assert_eq!(
            names(&calls[..3]),
            vec!["set_mod_depth_a", "set_mod_depth_b", "set_custom_routing"]
        );
        let ratio_b = calls.iter().filter(|c| c.name() == "set_ratio_b").count();
        assert_eq!(ratio_b, 1);
        assert!(calls.contains(&EngineCall::RatioB(3.0, 4.0)));
    }

    #[test]
    fn identical_snapshots_send_nothing() {
        let p = Patch::initial();
        assert!(diff_patches(Some(&p), &p).is_empty());
    }

    #[test]
    fn volume_change_sends_one_call() {
        let prev = Patch::initial();
        let cur = prev.apply(&PatchAction::SetMasterVolume { value: 80.0 });
        assert_eq!(diff_patches(Some(&prev), &cur), vec![EngineCall::Volume(80.0)]);
    }

    #[test]
    fn add_connection_orders_depths_before_routing() {
        let prev = Patch::initial();
        let cur = prev.apply(&PatchAction::AddConnection { src: 1, dst: 0 });
        assert_eq!(
            diff_patches(Some(&prev), &cur),
            vec![
                EngineCall::ModDepthA(17),
                EngineCall::ModDepthB(0),
                EngineCall::CustomRouting {
                    modulations: vec![1, 0],
                    carriers: vec![0, 2, 3],
                },
            ]
        );
    }

    #[test]
    fn moving_a_node_sends_only_the_changed_depth() {
        let prev = Patch::initial().apply(&PatchAction::AddConnection { src: 1, dst: 0 });
        let cur = prev.apply(&PatchAction::MoveOperator {
            op_index: 1,
            position: bitscape_patch::Point::new(500.0, 500.0),
        });
        assert_eq!(diff_patches(Some(&prev), &cur), vec![EngineCall::ModDepthA(47)]);
    }

    #[test]
    fn feedback_change_resends_routing_with_synthetic_loop() {
        let prev = Patch::initial();
        let cur = prev.apply(&PatchAction::SetOperatorFeedback {
            op_index: 2,
            value: 40.0,
        });
        assert_eq!(
            diff_patches(Some(&prev), &cur),
            vec![
                EngineCall::ModDepthA(0),
                EngineCall::ModDepthB(0),
                EngineCall::CustomRouting {
                    modulations: vec![2, 2],
                    carriers: vec![0, 1, 2, 3],
                },
                EngineCall::OperatorFeedback { op: 2, value: 40.0 },
            ]
        );
    }

    #[test]
    fn filter_type_change_resends_cutoff_and_resonance_once() {
        let prev = Patch::initial();
        let mut cur = prev.apply(&PatchAction::SetFilterType {
            value: FilterType::HighPass,
        });
        cur.filter_cutoff = 0.0;
        let calls = diff_patches(Some(&prev), &cur);
        assert_eq!(
            calls,
            vec![
                EngineCall::FilterType(1),
                EngineCall::FilterCutoff(cutoff_hz(0.0)),
                EngineCall::FilterResonance(0.5),
            ]
        );
    }

    #[test]
    fn lfo_destination_change_rescales_depth() {
        let mut prev = Patch::initial();
        prev.lfo1_depth = 0.5;
        let mut cur = prev.clone();
        cur.lfo1_destination = 19;
        assert_eq!(
            diff_patches(Some(&prev), &cur),
            vec![
                EngineCall::LfoDestination(LfoSlot::Lfo1, 19),
                EngineCall::LfoDepth(LfoSlot::Lfo1, 4000.0),
            ]
        );
    }

    #[test]
    fn lfo_depth_change_alone_sends_scaled_depth() {
        let mut prev = Patch::initial();
        prev.lfo2_destination = 13;
        let mut cur = prev.clone();
        cur.lfo2_depth = 1.0;
        assert_eq!(
            diff_patches(Some(&prev), &cur),
            vec![EngineCall::LfoDepth(LfoSlot::Lfo2, 63.0)]
        );
    }

    #[test]
    fn b_ratios_travel_together() {
        let prev = Patch::initial();
        let cur = prev.apply(&PatchAction::SetRatio {
            op_index: 3,
            ratio: 8.0,
        });
        assert_eq!(
            diff_patches(Some(&prev), &cur),
            vec![EngineCall::RatioB(3.0, 8.0)]
        );
    }

    #[test]
    fn not_ready_pass_keeps_baseline() {
        let mut sync = EngineSync::new();
        let mut engine = RecordingEngine::not_ready();
        let patch = Patch::initial();

        assert_eq!(sync.sync(&patch, &mut engine), SyncOutcome::Skipped);
        assert!(sync.baseline().is_none());
        assert!(engine.calls().is_empty());

        engine.set_ready(true);
        let outcome = sync.sync(&patch, &mut engine);
        assert_eq!(outcome.calls(), 78);
        assert_eq!(sync.baseline(), Some(&patch));
    }

    #[test]
    fn baseline_is_independent_of_later_edits() {
        let mut sync = EngineSync::new();
        let mut engine = RecordingEngine::new();
        let mut live = Patch::initial();
        sync.sync(&live, &mut engine);
        live.master_pan = 10.0;
        assert_eq!(sync.baseline().map(|p| p.master_pan), Some(64.0));
        assert_eq!(sync.plan(&live), vec![EngineCall::Pan(10.0)]);
    }
}
