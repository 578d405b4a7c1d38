//! Patch-to-engine value conversions.
//!
//! The patch stores filter cutoff and resonance as 7-bit controls; the
//! engine wants Hz and Q. LFO depth is unclamped in the engine, so it is
//! pre-scaled to the natural range of the destination it drives.
//!
//! ```text
//! cutoff_hz   = 20 * 1000^(min(raw, 127) / 127)        20 Hz .. 20 kHz
//! resonance_q = max(0.5, 0.1 + min(raw, 127)/127 * 19.9)  0.5 .. 20
//! ```

use bitscape_patch::LfoDestination;

/// Depth multipliers indexed by LFO destination id.
pub const LFO_DEPTH_SCALE: [f32; LfoDestination::COUNT] = [
    1.0,    // ModDepthA
    1.0,    // ModDepthB
    4.0,    // RatioC
    4.0,    // RatioA
    4.0,    // RatioB
    64.0,   // Feedback
    26.0,   // Harm
    1.0,    // CarrierMix
    64.0,   // AmpAttack
    64.0,   // AmpDecay
    1.0,    // AmpSustain
    64.0,   // AmpRelease
    1.0,    // Overdrive
    63.0,   // Pan
    64.0,   // Volume
    64.0,   // FilterAttack
    64.0,   // FilterDecay
    1.0,    // FilterSustain
    64.0,   // FilterRelease
    8000.0, // FilterCutoff
    1.0,    // FilterResonance
    1.0,    // FilterEnvAmount
];

/// Map a 0-127 cutoff control to Hz.
///
/// Values above 127 (raw Hz left by older sessions) are clamped first.
pub fn cutoff_hz(raw: f32) -> f32 {
    let raw = f64::from(raw.min(127.0));
    (20.0 * 1000.0_f64.powf(raw / 127.0)) as f32
}

/// Map a 0-127 resonance control to filter Q, never below 0.5.
pub fn resonance_q(raw: f32) -> f32 {
    let raw = f64::from(raw.min(127.0));
    (0.1 + (raw / 127.0) * 19.9).max(0.5) as f32
}

/// Scale factor for an LFO destination id; unknown ids scale by 1.
pub fn lfo_depth_scale(destination: u8) -> f32 {
    LFO_DEPTH_SCALE
        .get(destination as usize)
        .copied()
        .unwrap_or(1.0)
}

/// LFO depth as transmitted for a destination.
pub fn scaled_lfo_depth(depth: f32, destination: u8) -> f32 {
    depth * lfo_depth_scale(destination)
}
