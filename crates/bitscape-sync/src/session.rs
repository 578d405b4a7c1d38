//! An editing session: current patch, sync state and engine in one place.
//!
//! Every [`Session::dispatch`] runs the reducer and then one sync pass, so
//! the engine follows the patch edit by edit.

use bitscape_patch::{Patch, PatchAction};

use crate::engine::Engine;
use crate::sync::{EngineSync, SyncOutcome};

/// Patch state wired to an engine.
#[derive(Debug)]
pub struct Session<E: Engine> {
    patch: Patch,
    sync: EngineSync,
    engine: E,
}

impl<E: Engine> Session<E> {
    /// Start a session. No calls are sent until the first dispatch or
    /// [`resync`](Self::resync).
    pub fn new(patch: Patch, engine: E) -> Self {
        Self {
            patch,
            sync: EngineSync::new(),
            engine,
        }
    }

    /// Apply an edit and push the resulting differences.
    pub fn dispatch(&mut self, action: &PatchAction) -> SyncOutcome {
        if matches!(action, PatchAction::LoadPatch { .. }) {
            tracing::info!("loading patch into session");
        }
        self.patch = self.patch.apply(action);
        self.sync.sync(&self.patch, &mut self.engine)
    }

    /// Run a pass on the current patch, e.g. once the engine reports ready.
    pub fn resync(&mut self) -> SyncOutcome {
        self.sync.sync(&self.patch, &mut self.engine)
    }

    /// Current patch.
    pub fn patch(&self) -> &Patch {
        &self.patch
    }

    /// Sync state.
    pub fn sync_state(&self) -> &EngineSync {
        &self.sync
    }

    /// The engine.
    pub fn engine(&self) -> &E {
        &self.engine
    }

    /// The engine, mutably.
    pub fn engine_mut(&mut self) -> &mut E {
        &mut self.engine
    }

    /// Split into the current patch and the engine.
    pub fn into_parts(self) -> (Patch, E) {
        (self.patch, self.engine)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::call::EngineCall;
    use crate::engine::RecordingEngine;

    #[test]
    fn dispatch_reduces_then_syncs() {
        let mut session = Session::new(Patch::initial(), RecordingEngine::new());
        let first = session.dispatch(&PatchAction::SetMasterVolume { value: 70.0 });
        // no baseline yet: full pass
        assert_eq!(first.calls(), 78);
        session.engine_mut().take();

        let second = session.dispatch(&PatchAction::SetMasterPan { value: 0.0 });
        assert_eq!(second, SyncOutcome::Synced { calls: 1 });
        assert_eq!(session.engine().calls(), &[EngineCall::Pan(0.0)]);
    }

    #[test]
    fn edits_while_not_ready_are_flushed_on_resync() {
        let mut session = Session::new(Patch::initial(), RecordingEngine::not_ready());
        assert_eq!(
            session.dispatch(&PatchAction::SetOctave { value: 1 }),
            SyncOutcome::Skipped
        );
        assert_eq!(session.patch().octave, 1);

        session.engine_mut().set_ready(true);
        let outcome = session.resync();
        assert_eq!(outcome.calls(), 78);
        assert!(session.engine().calls().contains(&EngineCall::Octave(1)));
    }

    #[test]
    fn into_parts_returns_final_state() {
        let mut session = Session::new(Patch::initial(), RecordingEngine::new());
        session.dispatch(&PatchAction::AddConnection { src: 1, dst: 0 });
        let (patch, engine) = session.into_parts();
        assert_eq!(patch.connections.len(), 1);
        assert!(!engine.calls().is_empty());
    }
}
