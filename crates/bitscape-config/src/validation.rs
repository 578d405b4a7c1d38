//! Structural validation of patches read from outside the editor.
//!
//! The reducer only ever produces well-formed patches; files on disk and
//! pasted JSON make no such promise. [`validate_patch`] checks the graph and
//! table invariants the reducer and sync layer rely on and reports every
//! failure at once.
//!
//! # Example
//!
//! ```rust
//! use bitscape_config::{ValidationError, validate_patch};
//! use bitscape_patch::{Connection, Patch};
//!
//! let mut patch = Patch::initial();
//! assert!(validate_patch(&patch).is_ok());
//!
//! patch.connections.push(Connection::new(1, 7));
//! assert_eq!(
//!     validate_patch(&patch),
//!     Err(ValidationError::OperatorOutOfRange { field: "connections", index: 7 })
//! );
//! ```

use std::collections::HashSet;

use bitscape_patch::constants::is_snap_ratio;
use bitscape_patch::{
    LfoDestination, LfoSlot, OPERATOR_COUNT, Patch, SELF_LOOP_MAX_RADIUS, SELF_LOOP_MIN_RADIUS,
};
use thiserror::Error;

/// Validation error types.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ValidationError {
    /// Operator index outside `0..=3`.
    #[error("operator index {index} in {field} out of range [0, 3]")]
    OperatorOutOfRange {
        /// Field holding the index.
        field: &'static str,
        /// The offending index.
        index: usize,
    },

    /// The same edge appears twice.
    #[error("duplicate connection {src} -> {dst}")]
    DuplicateConnection {
        /// Modulator.
        src: usize,
        /// Modulated operator.
        dst: usize,
    },

    /// An operator carries more than one self-loop.
    #[error("operator {0} has more than one self-loop")]
    DuplicateSelfLoop(usize),

    /// Self-loop radius outside the drawable range.
    #[error("self-loop radius {radius} on operator {op_index} out of range [{min}, {max}]")]
    RadiusOutOfRange {
        /// Operator carrying the loop.
        op_index: usize,
        /// The offending radius.
        radius: f32,
        /// Minimum allowed radius.
        min: f32,
        /// Maximum allowed radius.
        max: f32,
    },

    /// Operator ratio not in the snap table.
    #[error("operator {op_index} ratio {ratio} is not a snap ratio")]
    InvalidRatio {
        /// Operator index.
        op_index: usize,
        /// The offending ratio.
        ratio: f32,
    },

    /// Operator position is NaN or infinite.
    #[error("operator {0} position is not finite")]
    NonFinitePosition(usize),

    /// LFO destination id outside the destination table.
    #[error("lfo{slot} destination {destination} out of range [0, {}]", LfoDestination::COUNT - 1)]
    InvalidLfoDestination {
        /// LFO number (1 or 2).
        slot: u8,
        /// The offending id.
        destination: u8,
    },

    /// Multiple validation errors.
    #[error("multiple validation errors: {}", .0.iter().map(|e| e.to_string()).collect::<Vec<_>>().join("; "))]
    Multiple(Vec<ValidationError>),
}

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Check a patch's structural invariants.
///
/// Returns the single failure directly, or [`ValidationError::Multiple`]
/// when more than one check fails.
pub fn validate_patch(patch: &Patch) -> ValidationResult<()> {
    let mut errors = Vec::new();

    let mut edges = HashSet::new();
    for c in &patch.connections {
        for index in [c.src, c.dst] {
            if index >= OPERATOR_COUNT {
                errors.push(ValidationError::OperatorOutOfRange {
                    field: "connections",
                    index,
                });
            }
        }
        if !edges.insert((c.src, c.dst)) {
            errors.push(ValidationError::DuplicateConnection {
                src: c.src,
                dst: c.dst,
            });
        }
    }

    let mut looped = HashSet::new();
    for l in &patch.self_loops {
        if l.op_index >= OPERATOR_COUNT {
            errors.push(ValidationError::OperatorOutOfRange {
                field: "selfLoops",
                index: l.op_index,
            });
        }
        if !looped.insert(l.op_index) {
            errors.push(ValidationError::DuplicateSelfLoop(l.op_index));
        }
        if !(SELF_LOOP_MIN_RADIUS..=SELF_LOOP_MAX_RADIUS).contains(&l.radius) {
            errors.push(ValidationError::RadiusOutOfRange {
                op_index: l.op_index,
                radius: l.radius,
                min: SELF_LOOP_MIN_RADIUS,
                max: SELF_LOOP_MAX_RADIUS,
            });
        }
    }

    for (i, op) in patch.operators.iter().enumerate() {
        if !is_snap_ratio(op.ratio) {
            errors.push(ValidationError::InvalidRatio {
                op_index: i,
                ratio: op.ratio,
            });
        }
        if !(op.position.x.is_finite() && op.position.y.is_finite()) {
            errors.push(ValidationError::NonFinitePosition(i));
        }
    }

    for slot in LfoSlot::ALL {
        let destination = patch.lfo(slot).destination;
        if usize::from(destination) >= LfoDestination::COUNT {
            errors.push(ValidationError::InvalidLfoDestination {
                slot: slot.number(),
                destination,
            });
        }
    }

    match errors.len() {
        0 => Ok(()),
        1 => Err(errors.remove(0)),
        _ => Err(ValidationError::Multiple(errors)),
    }
}
