//! Patch model for the Bitscape 4-operator FM editor.
//!
//! This crate owns the editable synthesizer state and every pure
//! transformation over it. Nothing here performs I/O or talks to the audio
//! engine; see `bitscape-sync` for that.
//!
//! # Components
//!
//! - **Patch Model**: [`Patch`], [`Operator`], [`Connection`], [`SelfLoop`]
//!   and the grouped parameter blocks in [`params`] and [`lfo`]
//! - **Depth Mapper**: [`compute_mod_depths`] turns node distances into the
//!   two modulation depths
//! - **Algorithm Matcher**: [`match_algorithm`] classifies a drawn graph
//!   against the eight reference [`ALGORITHMS`]
//! - **Patch Reducer**: [`reduce`] applies a [`PatchAction`] to a snapshot
//!
//! # Example
//!
//! ```rust
//! use bitscape_patch::{Patch, PatchAction};
//!
//! let patch = Patch::initial().apply(&PatchAction::AddConnection { src: 1, dst: 0 });
//!
//! // A sits 400 px above C: round(127 * e^-2) = 17
//! assert_eq!(patch.mod_depth_a, 17);
//! assert_eq!(patch.carriers(), vec![0, 2, 3]);
//! ```

pub mod algorithm;
pub mod constants;
pub mod depth;
mod error;
pub mod graph;
pub mod lfo;
pub mod operator;
pub mod params;
mod patch;
pub mod reducer;

pub use algorithm::{ALGORITHMS, Algorithm, DEFAULT_ALGORITHM, match_algorithm};
pub use constants::{
    OPERATOR_COUNT, RATIO_SNAPS, SELF_LOOP_DEFAULT_RADIUS, SELF_LOOP_MAX_RADIUS,
    SELF_LOOP_MIN_RADIUS,
};
pub use depth::{ModDepths, compute_mod_depths, distance_to_depth};
pub use error::PatchError;
pub use graph::{Connection, SelfLoop};
pub use lfo::{LfoDestination, LfoParams, LfoSlot};
pub use operator::{ModEnvelope, Operator, OperatorRole, Point, Waveform};
pub use params::{Adsr, ChorusParams, DelayParams, FeedbackSource, FilterType, ReverbParams};
pub use patch::Patch;
pub use reducer::{PatchAction, reduce};
