//! The patch snapshot.
//!
//! A [`Patch`] holds every editable piece of synthesizer state: the four
//! operators and their graph, per-operator parameter arrays, and the flat
//! global parameter set. Values are replaced, never mutated in place, by
//! the reducer in [`crate::reducer`]; an old snapshot stays valid as a diff
//! baseline.
//!
//! The JSON form is field-for-field camelCase. Missing fields take their
//! [`Patch::initial`] values, so patches written by older editors load.

use serde::{Deserialize, Serialize};

use crate::algorithm;
use crate::constants::{DEFAULT_POSITIONS, DEFAULT_RATIOS, OPERATOR_COUNT};
use crate::depth::{ModDepths, compute_mod_depths};
use crate::graph::{self, Connection, SelfLoop};
use crate::lfo::{LfoParams, LfoSlot};
use crate::operator::{ModEnvelope, Operator, Point};
use crate::params::{Adsr, ChorusParams, DelayParams, FeedbackSource, FilterType, ReverbParams};

/// Complete serializable synthesizer configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Patch {
    /// The four operators, indexed by role (C, A, B1, B2).
    pub operators: [Operator; OPERATOR_COUNT],
    /// Directed modulation edges, without duplicates.
    pub connections: Vec<Connection>,
    /// Feedback loops, at most one per operator.
    pub self_loops: Vec<SelfLoop>,

    /// Derived modulation depth for edges sourced at C/A.
    pub mod_depth_a: u8,
    /// Derived modulation depth for edges sourced at B1/B2.
    pub mod_depth_b: u8,

    /// Feedback per operator, 0-127.
    pub operator_feedback: [f32; OPERATOR_COUNT],
    /// Which input method owns each feedback slot.
    pub feedback_source: [FeedbackSource; OPERATOR_COUNT],
    /// Detune per operator, in cents (-100 to 100).
    pub operator_detune: [f32; OPERATOR_COUNT],
    /// Wave folding per operator, -26 to 26.
    pub operator_harm: [f32; OPERATOR_COUNT],
    /// Output level per operator, 0-127.
    pub operator_level: [f32; OPERATOR_COUNT],
    /// Modulation envelope per operator.
    pub operator_mod_env: [ModEnvelope; OPERATOR_COUNT],

    /// Global wave folding (legacy).
    pub harm: f32,
    /// Carrier mix, 0.0-1.0.
    pub carrier_mix: f32,
    /// Global detune, 0-127 (legacy).
    pub detune: f32,

    /// Amp envelope attack.
    pub amp_attack: f32,
    /// Amp envelope decay.
    pub amp_decay: f32,
    /// Amp envelope sustain.
    pub amp_sustain: f32,
    /// Amp envelope release.
    pub amp_release: f32,

    /// Master volume, 0-127.
    pub master_volume: f32,
    /// Master pan, 0-127 (64 centre).
    pub master_pan: f32,
    /// Output overdrive, 0.0-1.0.
    pub master_overdrive: f32,
    /// Octave shift, -2 to 2.
    pub octave: i32,
    /// Portamento time.
    pub portamento_time: f32,
    /// Pitch bend range in semitones.
    pub pitch_bend_range: f32,
    /// Current pitch bend, -1.0 to 1.0.
    pub pitch_bend: f32,

    /// Filter mode.
    pub filter_type: FilterType,
    /// Filter cutoff, 0-127 (mapped to Hz at the engine boundary).
    pub filter_cutoff: f32,
    /// Filter resonance, 0-127 (mapped to Q at the engine boundary).
    pub filter_resonance: f32,
    /// Filter envelope attack.
    pub filter_env_attack: f32,
    /// Filter envelope decay.
    pub filter_env_decay: f32,
    /// Filter envelope sustain.
    pub filter_env_sustain: f32,
    /// Filter envelope release.
    pub filter_env_release: f32,
    /// Filter envelope amount.
    pub filter_env_amount: f32,

    /// Delay on/off.
    pub delay_enabled: bool,
    /// Delay time, ms.
    pub delay_ms: f32,
    /// Delay feedback.
    pub delay_feedback: f32,
    /// Delay wet mix.
    pub delay_mix: f32,

    /// Reverb on/off.
    pub reverb_enabled: bool,
    /// Reverb decay.
    pub reverb_decay: f32,
    /// Reverb damping.
    pub reverb_damping: f32,
    /// Reverb wet mix.
    pub reverb_mix: f32,

    /// Chorus on/off.
    pub chorus_enabled: bool,
    /// Chorus depth.
    pub chorus_depth: f32,
    /// Chorus speed, Hz.
    pub chorus_speed: f32,
    /// Chorus stereo width.
    pub chorus_width: f32,
    /// Chorus wet high-pass cutoff, Hz.
    pub chorus_hpf_cutoff: f32,
    /// Chorus base delay, ms.
    pub chorus_delay_ms: f32,
    /// Chorus send into the reverb.
    pub chorus_reverb_send: f32,

    /// LFO 1 rate.
    pub lfo1_speed: f32,
    /// LFO 1 unscaled depth.
    pub lfo1_depth: f32,
    /// LFO 1 waveform id.
    pub lfo1_waveform: u8,
    /// LFO 1 trigger mode id.
    pub lfo1_mode: u8,
    /// LFO 1 destination id.
    pub lfo1_destination: u8,
    /// LFO 1 rate multiplier.
    pub lfo1_multiplier: i32,
    /// LFO 1 fade.
    pub lfo1_fade: i32,

    /// LFO 2 rate.
    pub lfo2_speed: f32,
    /// LFO 2 unscaled depth.
    pub lfo2_depth: f32,
    /// LFO 2 waveform id.
    pub lfo2_waveform: u8,
    /// LFO 2 trigger mode id.
    pub lfo2_mode: u8,
    /// LFO 2 destination id.
    pub lfo2_destination: u8,
    /// LFO 2 rate multiplier.
    pub lfo2_multiplier: i32,
    /// LFO 2 fade.
    pub lfo2_fade: i32,
}

impl Default for Patch {
    fn default() -> Self {
        Self::initial()
    }
}

impl Patch {
    /// The session-start patch: diamond layout, no connections, everything
    /// audible and every effect off.
    pub fn initial() -> Self {
        let operators =
            core::array::from_fn(|i| Operator::new(DEFAULT_POSITIONS[i], DEFAULT_RATIOS[i]));
        let amp = Adsr::new(30.0, 40.0, 100.0, 50.0);
        let delay = DelayParams::default();
        let reverb = ReverbParams::default();
        let chorus = ChorusParams::default();
        let lfo = LfoParams::default();

        Self {
            operators,
            connections: Vec::new(),
            self_loops: Vec::new(),
            mod_depth_a: 0,
            mod_depth_b: 0,
            operator_feedback: [0.0; OPERATOR_COUNT],
            feedback_source: [FeedbackSource::SelfLoop; OPERATOR_COUNT],
            operator_detune: [0.0; OPERATOR_COUNT],
            operator_harm: [0.0; OPERATOR_COUNT],
            operator_level: [127.0; OPERATOR_COUNT],
            operator_mod_env: [ModEnvelope::default(); OPERATOR_COUNT],
            harm: 0.0,
            carrier_mix: 0.5,
            detune: 0.0,
            amp_attack: amp.attack,
            amp_decay: amp.decay,
            amp_sustain: amp.sustain,
            amp_release: amp.release,
            master_volume: 100.0,
            master_pan: 64.0,
            master_overdrive: 0.0,
            octave: 0,
            portamento_time: 0.0,
            pitch_bend_range: 2.0,
            pitch_bend: 0.0,
            filter_type: FilterType::LowPass,
            filter_cutoff: 127.0,
            filter_resonance: 0.0,
            filter_env_attack: 0.0,
            filter_env_decay: 64.0,
            filter_env_sustain: 127.0,
            filter_env_release: 64.0,
            filter_env_amount: 0.0,
            delay_enabled: delay.enabled,
            delay_ms: delay.ms,
            delay_feedback: delay.feedback,
            delay_mix: delay.mix,
            reverb_enabled: reverb.enabled,
            reverb_decay: reverb.decay,
            reverb_damping: reverb.damping,
            reverb_mix: reverb.mix,
            chorus_enabled: chorus.enabled,
            chorus_depth: chorus.depth,
            chorus_speed: chorus.speed,
            chorus_width: chorus.width,
            chorus_hpf_cutoff: chorus.hpf_cutoff,
            chorus_delay_ms: chorus.delay_ms,
            chorus_reverb_send: chorus.reverb_send,
            lfo1_speed: lfo.speed,
            lfo1_depth: lfo.depth,
            lfo1_waveform: lfo.waveform,
            lfo1_mode: lfo.mode,
            lfo1_destination: lfo.destination,
            lfo1_multiplier: lfo.multiplier,
            lfo1_fade: lfo.fade,
            lfo2_speed: lfo.speed,
            lfo2_depth: lfo.depth,
            lfo2_waveform: lfo.waveform,
            lfo2_mode: lfo.mode,
            lfo2_destination: lfo.destination,
            lfo2_multiplier: lfo.multiplier,
            lfo2_fade: lfo.fade,
        }
    }

    // --- Graph views ---

    /// Operator positions in index order.
    pub fn positions(&self) -> [Point; OPERATOR_COUNT] {
        core::array::from_fn(|i| self.operators[i].position)
    }

    /// Whether the edge `src → dst` is drawn.
    pub fn has_connection(&self, src: usize, dst: usize) -> bool {
        self.connections.iter().any(|c| c.src == src && c.dst == dst)
    }

    /// The self-loop on `op_index`, if any.
    pub fn self_loop(&self, op_index: usize) -> Option<&SelfLoop> {
        self.self_loops.iter().find(|l| l.op_index == op_index)
    }

    /// Closest reference algorithm for the drawn graph. Display only.
    pub fn matched_algorithm(&self) -> usize {
        algorithm::match_algorithm(&self.connections)
    }

    /// Operators sent to the engine as carriers.
    pub fn carriers(&self) -> Vec<usize> {
        graph::transmission_carriers(&self.connections)
    }

    /// Edges sent to the engine, including synthetic feedback loops.
    pub fn routing_edges(&self) -> Vec<Connection> {
        graph::routing_edges(&self.connections, &self.operator_feedback)
    }

    /// Current mod depths as a pair.
    pub fn mod_depths(&self) -> ModDepths {
        ModDepths {
            a: self.mod_depth_a,
            b: self.mod_depth_b,
        }
    }

    // --- Derived-state maintenance ---

    /// Recompute both mod depths from connections and positions.
    pub fn recompute_mod_depths(&mut self) {
        let depths = compute_mod_depths(&self.connections, &self.positions());
        self.mod_depth_a = depths.a;
        self.mod_depth_b = depths.b;
    }

    /// Rebuild every self-loop-owned feedback slot from scratch.
    ///
    /// Slots tagged [`FeedbackSource::Manual`] keep their value.
    pub fn rebuild_feedback(&mut self) {
        let derived = graph::feedback_from_loops(&self.self_loops);
        for (i, value) in derived.into_iter().enumerate() {
            if self.feedback_source[i] == FeedbackSource::SelfLoop {
                self.operator_feedback[i] = value;
            }
        }
    }

    /// Tag as manual every slot whose value disagrees with its self-loop.
    ///
    /// Used when loading patches that predate the source tags.
    pub fn infer_feedback_sources(&mut self) {
        let derived = graph::feedback_from_loops(&self.self_loops);
        for i in 0..OPERATOR_COUNT {
            self.feedback_source[i] = if self.operator_feedback[i] == derived[i] {
                FeedbackSource::SelfLoop
            } else {
                FeedbackSource::Manual
            };
        }
    }

    // --- Grouped parameter views ---

    /// Amp envelope.
    pub fn amp_envelope(&self) -> Adsr {
        Adsr::new(self.amp_attack, self.amp_decay, self.amp_sustain, self.amp_release)
    }

    /// Replace the amp envelope.
    pub fn set_amp_envelope(&mut self, env: Adsr) {
        self.amp_attack = env.attack;
        self.amp_decay = env.decay;
        self.amp_sustain = env.sustain;
        self.amp_release = env.release;
    }

    /// Filter envelope.
    pub fn filter_envelope(&self) -> Adsr {
        Adsr::new(
            self.filter_env_attack,
            self.filter_env_decay,
            self.filter_env_sustain,
            self.filter_env_release,
        )
    }

    /// Replace the filter envelope.
    pub fn set_filter_envelope(&mut self, env: Adsr) {
        self.filter_env_attack = env.attack;
        self.filter_env_decay = env.decay;
        self.filter_env_sustain = env.sustain;
        self.filter_env_release = env.release;
    }

    /// Delay block.
    pub fn delay(&self) -> DelayParams {
        DelayParams {
            enabled: self.delay_enabled,
            ms: self.delay_ms,
            feedback: self.delay_feedback,
            mix: self.delay_mix,
        }
    }

    /// Replace the delay block.
    pub fn set_delay(&mut self, p: DelayParams) {
        self.delay_enabled = p.enabled;
        self.delay_ms = p.ms;
        self.delay_feedback = p.feedback;
        self.delay_mix = p.mix;
    }

    /// Reverb block.
    pub fn reverb(&self) -> ReverbParams {
        ReverbParams {
            enabled: self.reverb_enabled,
            decay: self.reverb_decay,
            damping: self.reverb_damping,
            mix: self.reverb_mix,
        }
    }

    /// Replace the reverb block.
    pub fn set_reverb(&mut self, p: ReverbParams) {
        self.reverb_enabled = p.enabled;
        self.reverb_decay = p.decay;
        self.reverb_damping = p.damping;
        self.reverb_mix = p.mix;
    }

    /// Chorus block.
    pub fn chorus(&self) -> ChorusParams {
        ChorusParams {
            enabled: self.chorus_enabled,
            depth: self.chorus_depth,
            speed: self.chorus_speed,
            width: self.chorus_width,
            hpf_cutoff: self.chorus_hpf_cutoff,
            delay_ms: self.chorus_delay_ms,
            reverb_send: self.chorus_reverb_send,
        }
    }

    /// Replace the chorus block.
    pub fn set_chorus(&mut self, p: ChorusParams) {
        self.chorus_enabled = p.enabled;
        self.chorus_depth = p.depth;
        self.chorus_speed = p.speed;
        self.chorus_width = p.width;
        self.chorus_hpf_cutoff = p.hpf_cutoff;
        self.chorus_delay_ms = p.delay_ms;
        self.chorus_reverb_send = p.reverb_send;
    }

    /// Parameters of one LFO.
    pub fn lfo(&self, slot: LfoSlot) -> LfoParams {
        match slot {
            LfoSlot::Lfo1 => LfoParams {
                speed: self.lfo1_speed,
                depth: self.lfo1_depth,
                waveform: self.lfo1_waveform,
                mode: self.lfo1_mode,
                destination: self.lfo1_destination,
                multiplier: self.lfo1_multiplier,
                fade: self.lfo1_fade,
            },
            LfoSlot::Lfo2 => LfoParams {
                speed: self.lfo2_speed,
                depth: self.lfo2_depth,
                waveform: self.lfo2_waveform,
                mode: self.lfo2_mode,
                destination: self.lfo2_destination,
                multiplier: self.lfo2_multiplier,
                fade: self.lfo2_fade,
            },
        }
    }

    /// Replace one LFO's parameters.
    pub fn set_lfo(&mut self, slot: LfoSlot, p: LfoParams) {
        match slot {
            LfoSlot::Lfo1 => {
                self.lfo1_speed = p.speed;
                self.lfo1_depth = p.depth;
                self.lfo1_waveform = p.waveform;
                self.lfo1_mode = p.mode;
                self.lfo1_destination = p.destination;
                self.lfo1_multiplier = p.multiplier;
                self.lfo1_fade = p.fade;
            }
            LfoSlot::Lfo2 => {
                self.lfo2_speed = p.speed;
                self.lfo2_depth = p.depth;
                self.lfo2_waveform = p.waveform;
                self.lfo2_mode = p.mode;
                self.lfo2_destination = p.destination;
                self.lfo2_multiplier = p.multiplier;
                self.lfo2_fade = p.fade;
            }
        }
    }
}
