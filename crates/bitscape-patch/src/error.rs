//! Error types for fallible patch conversions.

use thiserror::Error;

/// Errors raised by fallible constructors and conversions.
///
/// The reducer, depth mapper and algorithm matcher never produce these; they
/// only surface when raw numbers are turned into typed model values (for
/// example while deserializing a patch).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PatchError {
    /// Waveform id outside `0..=4`.
    #[error("invalid waveform id: {0} (expected 0-4)")]
    InvalidWaveform(u8),

    /// Operator index outside `0..=3`.
    #[error("invalid operator index: {0} (expected 0-3)")]
    InvalidOperator(usize),
}
