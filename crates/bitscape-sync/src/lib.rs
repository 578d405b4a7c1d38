//! Engine synchronization for the Bitscape FM editor.
//!
//! Turns successive [`Patch`](bitscape_patch::Patch) snapshots into an
//! ordered, minimal stream of named engine calls.
//!
//! # Components
//!
//! - [`EngineCall`] / [`EngineValue`]: the typed call set and its wire form
//! - [`Engine`]: the readiness-gated call sink, with [`RecordingEngine`] and
//!   [`ChannelEngine`] implementations
//! - [`EngineSync`]: the diff engine owning the last-synced baseline
//! - [`Session`]: reducer + sync + engine wired together
//! - [`mapping`]: boundary value conversions (cutoff Hz, Q, LFO depth scale)
//!
//! # Example
//!
//! ```rust
//! use bitscape_patch::{Patch, PatchAction};
//! use bitscape_sync::{EngineCall, RecordingEngine, Session};
//!
//! let mut session = Session::new(Patch::initial(), RecordingEngine::new());
//! session.resync();
//! session.engine_mut().take();
//!
//! session.dispatch(&PatchAction::AddConnection { src: 1, dst: 0 });
//! assert_eq!(
//!     session.engine().names(),
//!     vec!["set_mod_depth_a", "set_mod_depth_b", "set_custom_routing"]
//! );
//! assert_eq!(session.engine().calls()[0], EngineCall::ModDepthA(17));
//! ```

mod call;
mod engine;
pub mod mapping;
mod session;
mod sync;

pub use call::{EngineCall, EngineValue};
pub use engine::{ChannelEngine, Engine, EngineReceiver, RecordingEngine};
pub use mapping::{cutoff_hz, lfo_depth_scale, resonance_q, scaled_lfo_depth};
pub use session::Session;
pub use sync::{EngineSync, SyncOutcome, diff_patches, full_sync, routing_call};
