//! Grouped global parameter blocks.
//!
//! The [`Patch`](crate::Patch) stores these fields flat (`delayEnabled`,
//! `delayMs`, ...); the structs here are the payloads of the grouped setter
//! actions and the typed views returned by the patch accessors.

use serde::{Deserialize, Serialize};

/// Output filter mode.
///
/// Serialized as its engine id. Unknown ids read as low-pass, matching the
/// engine's own interpretation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "u8", into = "u8")]
pub enum FilterType {
    /// Low-pass (id 0).
    #[default]
    LowPass,
    /// High-pass (id 1).
    HighPass,
}

impl FilterType {
    /// Engine id.
    pub fn id(self) -> u8 {
        match self {
            FilterType::LowPass => 0,
            FilterType::HighPass => 1,
        }
    }

    /// Display name.
    pub fn name(self) -> &'static str {
        match self {
            FilterType::LowPass => "Low-pass",
            FilterType::HighPass => "High-pass",
        }
    }
}

impl From<u8> for FilterType {
    fn from(id: u8) -> Self {
        if id == 1 {
            FilterType::HighPass
        } else {
            FilterType::LowPass
        }
    }
}

impl From<FilterType> for u8 {
    fn from(t: FilterType) -> Self {
        t.id()
    }
}

/// Which input method last wrote an operator's feedback.
///
/// Self-loop edits rebuild every `SelfLoop`-owned slot from the loop radii;
/// direct knob writes take ownership as `Manual` and are left alone by those
/// rebuilds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FeedbackSource {
    /// Derived from the operator's self-loop radius (0 without a loop).
    #[default]
    SelfLoop,
    /// Set directly.
    Manual,
}

/// Attack/decay/sustain/release, each 0-127.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Adsr {
    /// Attack time.
    pub attack: f32,
    /// Decay time.
    pub decay: f32,
    /// Sustain level.
    pub sustain: f32,
    /// Release time.
    pub release: f32,
}

impl Adsr {
    /// Create an envelope.
    pub const fn new(attack: f32, decay: f32, sustain: f32, release: f32) -> Self {
        Self {
            attack,
            decay,
            sustain,
            release,
        }
    }
}

/// Delay block.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DelayParams {
    /// Whether the block is active.
    pub enabled: bool,
    /// Delay time, 0-1000 ms.
    pub ms: f32,
    /// Feedback, 0.0-0.99.
    pub feedback: f32,
    /// Wet mix, 0.0-1.0.
    pub mix: f32,
}

impl Default for DelayParams {
    fn default() -> Self {
        Self {
            enabled: false,
            ms: 250.0,
            feedback: 0.3,
            mix: 0.3,
        }
    }
}

/// Reverb block.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReverbParams {
    /// Whether the block is active.
    pub enabled: bool,
    /// Decay, 0.0-1.0.
    pub decay: f32,
    /// High-frequency damping, 0.0-1.0.
    pub damping: f32,
    /// Wet mix, 0.0-1.0.
    pub mix: f32,
}

impl Default for ReverbParams {
    fn default() -> Self {
        Self {
            enabled: false,
            decay: 0.5,
            damping: 0.5,
            mix: 0.25,
        }
    }
}

/// Chorus block.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChorusParams {
    /// Whether the block is active.
    pub enabled: bool,
    /// Modulation depth, 0.0-1.0.
    pub depth: f32,
    /// Modulation speed, 0.1-10 Hz.
    pub speed: f32,
    /// Stereo width, 0.0-1.0.
    pub width: f32,
    /// High-pass cutoff on the wet path, Hz.
    pub hpf_cutoff: f32,
    /// Base delay, ms.
    pub delay_ms: f32,
    /// Send into the reverb, 0.0-1.0.
    pub reverb_send: f32,
}

impl Default for ChorusParams {
    fn default() -> Self {
        Self {
            enabled: false,
            depth: 0.5,
            speed: 0.5,
            width: 0.5,
            hpf_cutoff: 200.0,
            delay_ms: 15.0,
            reverb_send: 0.0,
        }
    }
}
