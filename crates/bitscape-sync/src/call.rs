//! Typed engine calls.
//!
//! Each [`EngineCall`] variant is one named setter on the rendering engine.
//! [`EngineCall::name`] gives the wire name, [`EngineCall::args`] the
//! positional arguments, and [`EngineCall::to_message`] the JSON message the
//! engine's worker port understands:
//!
//! ```text
//! {"type": "param", "fn": "set_mod_depth_a", "args": [17]}
//! ```

use core::fmt;

use bitscape_patch::LfoSlot;
use serde::Serialize;

/// One positional argument of an engine call.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum EngineValue {
    /// Integer argument (indices, ids, depths).
    Int(i32),
    /// Floating-point argument.
    Float(f32),
    /// Boolean argument.
    Bool(bool),
    /// Flattened unsigned array (routing tables).
    Array(Vec<u32>),
}

impl fmt::Display for EngineValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EngineValue::Int(v) => write!(f, "{v}"),
            EngineValue::Float(v) => write!(f, "{v}"),
            EngineValue::Bool(v) => write!(f, "{v}"),
            EngineValue::Array(v) => {
                f.write_str("[")?;
                for (i, x) in v.iter().enumerate() {
                    if i > 0 {
                        f.write_str(",")?;
                    }
                    write!(f, "{x}")?;
                }
                f.write_str("]")
            }
        }
    }
}

/// A named parameter-setting call on the rendering engine.
#[derive(Debug, Clone, PartialEq)]
pub enum EngineCall {
    /// Modulation depth for group A (C/A sources), 0-127.
    ModDepthA(u8),
    /// Modulation depth for group B (B1/B2 sources), 0-127.
    ModDepthB(u8),
    /// Routing table: flattened `(src, dst)` pairs and carrier indices.
    CustomRouting {
        /// `[src0, dst0, src1, dst1, ...]`.
        modulations: Vec<u32>,
        /// Audible operators.
        carriers: Vec<u32>,
    },

    /// Ratio of operator C.
    RatioC(f32),
    /// Ratio of operator A.
    RatioA(f32),
    /// Ratios of operators B1 and B2, always sent together.
    RatioB(f32, f32),

    /// Oscillator waveform of one operator.
    OperatorWaveform {
        /// Operator index.
        op: usize,
        /// Waveform id.
        waveform: u8,
    },
    /// Feedback of one operator.
    OperatorFeedback {
        /// Operator index.
        op: usize,
        /// Feedback, 0-127.
        value: f32,
    },
    /// Detune of one operator.
    OperatorDetune {
        /// Operator index.
        op: usize,
        /// Cents.
        value: f32,
    },
    /// Wave folding of one operator.
    OperatorHarm {
        /// Operator index.
        op: usize,
        /// Harm amount.
        value: f32,
    },
    /// Output level of one operator.
    OperatorLevel {
        /// Operator index.
        op: usize,
        /// Level, 0-127.
        value: f32,
    },
    /// Modulation envelope of one operator.
    OperatorModEnv {
        /// Operator index.
        op: usize,
        /// Attack time.
        attack: f32,
        /// Decay time.
        decay: f32,
        /// End level.
        end: f32,
    },

    /// Global harm.
    Harm(f32),
    /// Carrier mix.
    CarrierMix(f32),
    /// Global detune.
    Detune(f32),
    /// Amp envelope, all four stages at once.
    AmpEnv {
        /// Attack.
        attack: f32,
        /// Decay.
        decay: f32,
        /// Sustain.
        sustain: f32,
        /// Release.
        release: f32,
    },
    /// Master volume.
    Volume(f32),
    /// Master pan.
    Pan(f32),
    /// Output overdrive.
    Overdrive(f32),
    /// Octave shift.
    Octave(i32),
    /// Portamento time.
    PortamentoTime(f32),
    /// Pitch bend.
    PitchBend(f32),
    /// Pitch bend range.
    PitchBendRange(f32),

    /// Filter mode id.
    FilterType(u8),
    /// Filter cutoff in Hz.
    FilterCutoff(f32),
    /// Filter Q.
    FilterResonance(f32),
    /// Filter envelope attack.
    FilterAttack(f32),
    /// Filter envelope decay.
    FilterDecay(f32),
    /// Filter envelope sustain.
    FilterSustain(f32),
    /// Filter envelope release.
    FilterRelease(f32),
    /// Filter envelope amount.
    FilterEnvAmount(f32),

    /// Delay on/off.
    DelayEnabled(bool),
    /// Delay time, ms.
    DelayMs(f32),
    /// Delay feedback.
    DelayFeedback(f32),
    /// Delay wet mix.
    DelayMix(f32),

    /// Reverb on/off.
    ReverbEnabled(bool),
    /// Reverb decay.
    ReverbDecay(f32),
    /// Reverb damping.
    ReverbDamping(f32),
    /// Reverb wet mix.
    ReverbMix(f32),

    /// Chorus on/off.
    ChorusEnabled(bool),
    /// Chorus depth.
    ChorusDepth(f32),
    /// Chorus speed.
    ChorusSpeed(f32),
    /// Chorus width.
    ChorusWidth(f32),
    /// Chorus wet high-pass cutoff.
    ChorusHpfCutoff(f32),
    /// Chorus base delay.
    ChorusDelayMs(f32),
    /// Chorus reverb send.
    ChorusReverbSend(f32),

    /// LFO rate.
    LfoSpeed(LfoSlot, f32),
    /// LFO depth, already scaled for its destination.
    LfoDepth(LfoSlot, f32),
    /// LFO waveform id.
    LfoWaveform(LfoSlot, u8),
    /// LFO trigger mode id.
    LfoMode(LfoSlot, u8),
    /// LFO destination id.
    LfoDestination(LfoSlot, u8),
    /// LFO rate multiplier.
    LfoMultiplier(LfoSlot, i32),
    /// LFO fade.
    LfoFade(LfoSlot, i32),
}

fn lfo_name(slot: LfoSlot, lfo1: &'static str, lfo2: &'static str) -> &'static str {
    match slot {
        LfoSlot::Lfo1 => lfo1,
        LfoSlot::Lfo2 => lfo2,
    }
}

impl EngineCall {
    /// Wire name of the setter.
    pub fn name(&self) -> &'static str {
        match self {
            EngineCall::ModDepthA(_) => "set_mod_depth_a",
            EngineCall::ModDepthB(_) => "set_mod_depth_b",
            EngineCall::CustomRouting { .. } => "set_custom_routing",
            EngineCall::RatioC(_) => "set_ratio_c",
            EngineCall::RatioA(_) => "set_ratio_a",
            EngineCall::RatioB(..) => "set_ratio_b",
            EngineCall::OperatorWaveform { .. } => "set_operator_waveform",
            EngineCall::OperatorFeedback { .. } => "set_operator_feedback",
            EngineCall::OperatorDetune { .. } => "set_operator_detune",
            EngineCall::OperatorHarm { .. } => "set_operator_harm",
            EngineCall::OperatorLevel { .. } => "set_operator_level",
            EngineCall::OperatorModEnv { .. } => "set_operator_mod_env",
            EngineCall::Harm(_) => "set_harm",
            EngineCall::CarrierMix(_) => "set_carrier_mix",
            EngineCall::Detune(_) => "set_detune",
            EngineCall::AmpEnv { .. } => "set_amp_env",
            EngineCall::Volume(_) => "set_volume",
            EngineCall::Pan(_) => "set_pan",
            EngineCall::Overdrive(_) => "set_overdrive",
            EngineCall::Octave(_) => "set_octave",
            EngineCall::PortamentoTime(_) => "set_portamento_time",
            EngineCall::PitchBend(_) => "set_pitch_bend",
            EngineCall::PitchBendRange(_) => "set_pitch_bend_range",
            EngineCall::FilterType(_) => "set_filter_type",
            EngineCall::FilterCutoff(_) => "set_filter_cutoff",
            EngineCall::FilterResonance(_) => "set_filter_resonance",
            EngineCall::FilterAttack(_) => "set_filter_attack",
            EngineCall::FilterDecay(_) => "set_filter_decay",
            EngineCall::FilterSustain(_) => "set_filter_sustain",
            EngineCall::FilterRelease(_) => "set_filter_release",
            EngineCall::FilterEnvAmount(_) => "set_filter_env_amount",
            EngineCall::DelayEnabled(_) => "set_delay_enabled",
            EngineCall::DelayMs(_) => "set_delay_ms",
            EngineCall::DelayFeedback(_) => "set_delay_feedback",
            EngineCall::DelayMix(_) => "set_delay_mix",
            EngineCall::ReverbEnabled(_) => "set_reverb_enabled",
            EngineCall::ReverbDecay(_) => "set_reverb_decay",
            EngineCall::ReverbDamping(_) => "set_reverb_damping",
            EngineCall::ReverbMix(_) => "set_reverb_mix",
            EngineCall::ChorusEnabled(_) => "set_chorus_enabled",
            EngineCall::ChorusDepth(_) => "set_chorus_depth",
            EngineCall::ChorusSpeed(_) => "set_chorus_speed",
            EngineCall::ChorusWidth(_) => "set_chorus_width",
            EngineCall::ChorusHpfCutoff(_) => "set_chorus_hpf_cutoff",
            EngineCall::ChorusDelayMs(_) => "set_chorus_delay_ms",
            EngineCall::ChorusReverbSend(_) => "set_chorus_reverb_send",
            EngineCall::LfoSpeed(s, _) => lfo_name(*s, "set_lfo1_speed", "set_lfo2_speed"),
            EngineCall::LfoDepth(s, _) => lfo_name(*s, "set_lfo1_depth", "set_lfo2_depth"),
            EngineCall::LfoWaveform(s, _) => {
                lfo_name(*s, "set_lfo1_waveform", "set_lfo2_waveform")
            }
            EngineCall::LfoMode(s, _) => lfo_name(*s, "set_lfo1_mode", "set_lfo2_mode"),
            EngineCall::LfoDestination(s, _) => {
                lfo_name(*s, "set_lfo1_destination", "set_lfo2_destination")
            }
            EngineCall::LfoMultiplier(s, _) => {
                lfo_name(*s, "set_lfo1_multiplier", "set_lfo2_multiplier")
            }
            EngineCall::LfoFade(s, _) => lfo_name(*s, "set_lfo1_fade", "set_lfo2_fade"),
        }
    }

    /// Positional arguments, in engine order.
    pub fn args(&self) -> Vec<EngineValue> {
        use EngineValue::{Array, Bool, Float, Int};

        let op = |i: usize| Int(i as i32);
        match self {
            EngineCall::ModDepthA(v) | EngineCall::ModDepthB(v) => vec![Int(i32::from(*v))],
            EngineCall::CustomRouting {
                modulations,
                carriers,
            } => vec![Array(modulations.clone()), Array(carriers.clone())],
            EngineCall::RatioB(b1, b2) => vec![Float(*b1), Float(*b2)],
            EngineCall::OperatorWaveform { op: i, waveform } => {
                vec![op(*i), Int(i32::from(*waveform))]
            }
            EngineCall::OperatorFeedback { op: i, value }
            | EngineCall::OperatorDetune { op: i, value }
            | EngineCall::OperatorHarm { op: i, value }
            | EngineCall::OperatorLevel { op: i, value } => vec![op(*i), Float(*value)],
            EngineCall::OperatorModEnv {
                op: i,
                attack,
                decay,
                end,
            } => vec![op(*i), Float(*attack), Float(*decay), Float(*end)],
            EngineCall::AmpEnv {
                attack,
                decay,
                sustain,
                release,
            } => vec![
                Float(*attack),
                Float(*decay),
                Float(*sustain),
                Float(*release),
            ],
            EngineCall::Octave(v) => vec![Int(*v)],
            EngineCall::FilterType(v) => vec![Int(i32::from(*v))],
            EngineCall::DelayEnabled(v)
            | EngineCall::ReverbEnabled(v)
            | EngineCall::ChorusEnabled(v) => vec![Bool(*v)],
            EngineCall::LfoWaveform(_, v)
            | EngineCall::LfoMode(_, v)
            | EngineCall::LfoDestination(_, v) => vec![Int(i32::from(*v))],
            EngineCall::LfoMultiplier(_, v) | EngineCall::LfoFade(_, v) => vec![Int(*v)],
            EngineCall::LfoSpeed(_, v) | EngineCall::LfoDepth(_, v) => vec![Float(*v)],
            EngineCall::RatioC(v)
            | EngineCall::RatioA(v)
            | EngineCall::Harm(v)
            | EngineCall::CarrierMix(v)
            | EngineCall::Detune(v)
            | EngineCall::Volume(v)
            | EngineCall::Pan(v)
            | EngineCall::Overdrive(v)
            | EngineCall::PortamentoTime(v)
            | EngineCall::PitchBend(v)
            | EngineCall::PitchBendRange(v)
            | EngineCall::FilterCutoff(v)
            | EngineCall::FilterResonance(v)
            | EngineCall::FilterAttack(v)
            | EngineCall::FilterDecay(v)
            | EngineCall::FilterSustain(v)
            | EngineCall::FilterRelease(v)
            | EngineCall::FilterEnvAmount(v)
            | EngineCall::DelayMs(v)
            | EngineCall::DelayFeedback(v)
            | EngineCall::DelayMix(v)
            | EngineCall::ReverbDecay(v)
            | EngineCall::ReverbDamping(v)
            | EngineCall::ReverbMix(v)
            | EngineCall::ChorusDepth(v)
            | EngineCall::ChorusSpeed(v)
            | EngineCall::ChorusWidth(v)
            | EngineCall::ChorusHpfCutoff(v)
            | EngineCall::ChorusDelayMs(v)
            | EngineCall::ChorusReverbSend(v) => vec![Float(*v)],
        }
    }

    /// Worker-port message for this call.
    pub fn to_message(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "param",
            "fn": self.name(),
            "args": self.args(),
        })
    }
}

impl fmt::Display for EngineCall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(", self.name())?;
        for (i, arg) in self.args().iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{arg}")?;
        }
        f.write_str(")")
    }
}
