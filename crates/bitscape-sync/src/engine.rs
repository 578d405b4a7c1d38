//! The rendering engine as seen from the editor.
//!
//! The engine is a fire-and-forget sink for [`EngineCall`]s with a readiness
//! gate. Two implementations ship here:
//!
//! - [`RecordingEngine`] keeps every call in memory (tests, dry runs, CLI)
//! - [`ChannelEngine`] forwards calls over a `crossbeam` channel to whatever
//!   owns the real engine, sharing an atomic readiness flag with it

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crossbeam_channel::{Receiver, Sender, unbounded};

use crate::call::EngineCall;

/// Named parameter-setting capability of the rendering engine.
pub trait Engine {
    /// Whether the engine can accept calls right now.
    fn is_ready(&self) -> bool;

    /// Deliver one call. Never blocks on a response.
    fn send(&mut self, call: EngineCall);
}

impl<E: Engine + ?Sized> Engine for &mut E {
    fn is_ready(&self) -> bool {
        (**self).is_ready()
    }

    fn send(&mut self, call: EngineCall) {
        (**self).send(call);
    }
}

impl<E: Engine + ?Sized> Engine for Box<E> {
    fn is_ready(&self) -> bool {
        (**self).is_ready()
    }

    fn send(&mut self, call: EngineCall) {
        (**self).send(call);
    }
}

/// Engine stand-in that records calls.
#[derive(Debug, Clone)]
pub struct RecordingEngine {
    ready: bool,
    calls: Vec<EngineCall>,
}

impl Default for RecordingEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordingEngine {
    /// A ready engine with no calls recorded.
    pub fn new() -> Self {
        Self {
            ready: true,
            calls: Vec::new(),
        }
    }

    /// An engine that has not finished loading.
    pub fn not_ready() -> Self {
        Self {
            ready: false,
            calls: Vec::new(),
        }
    }

    /// Flip the readiness gate.
    pub fn set_ready(&mut self, ready: bool) {
        self.ready = ready;
    }

    /// Calls received so far.
    pub fn calls(&self) -> &[EngineCall] {
        &self.calls
    }

    /// Wire names of the calls received so far.
    pub fn names(&self) -> Vec<&'static str> {
        self.calls.iter().map(EngineCall::name).collect()
    }

    /// Take the recorded calls, leaving the log empty.
    pub fn take(&mut self) -> Vec<EngineCall> {
        std::mem::take(&mut self.calls)
    }
}

impl Engine for RecordingEngine {
    fn is_ready(&self) -> bool {
        self.ready
    }

    fn send(&mut self, call: EngineCall) {
        self.calls.push(call);
    }
}

/// Engine front that forwards calls over a channel.
///
/// The receiving side flips the shared readiness flag once the real engine
/// has loaded. Calls sent after the receiver is dropped are discarded with a
/// warning.
#[derive(Debug, Clone)]
pub struct ChannelEngine {
    tx: Sender<EngineCall>,
    ready: Arc<AtomicBool>,
}

impl ChannelEngine {
    /// Create a sender/receiver pair. The engine starts not ready.
    pub fn new() -> (Self, EngineReceiver) {
        let (tx, rx) = unbounded();
        let ready = Arc::new(AtomicBool::new(false));
        (
            Self {
                tx,
                ready: Arc::clone(&ready),
            },
            EngineReceiver { rx, ready },
        )
    }
}

impl Engine for ChannelEngine {
    fn is_ready(&self) -> bool {
        self.ready.load(Ordering::Acquire)
    }

    fn send(&mut self, call: EngineCall) {
        if let Err(err) = self.tx.send(call) {
            tracing::warn!(call = err.0.name(), "engine receiver gone, call dropped");
        }
    }
}

/// Receiving half of a [`ChannelEngine`], held by the engine host.
#[derive(Debug)]
pub struct EngineReceiver {
    rx: Receiver<EngineCall>,
    ready: Arc<AtomicBool>,
}

impl EngineReceiver {
    /// Mark the engine ready or not.
    pub fn set_ready(&self, ready: bool) {
        self.ready.store(ready, Ordering::Release);
    }

    /// Underlying channel receiver.
    pub fn receiver(&self) -> &Receiver<EngineCall> {
        &self.rx
    }

    /// All calls currently queued, without blocking.
    pub fn drain(&self) -> Vec<EngineCall> {
        self.rx.try_iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recording_engine_collects_calls() {
        let mut engine = RecordingEngine::new();
        engine.send(EngineCall::Volume(10.0));
        engine.send(EngineCall::Pan(64.0));
        assert_eq!(engine.names(), vec!["set_volume", "set_pan"]);
        assert_eq!(engine.take().len(), 2);
        assert!(engine.calls().is_empty());
    }

    #[test]
    fn channel_engine_shares_readiness() {
        let (engine, host) = ChannelEngine::new();
        assert!(!engine.is_ready());
        host.set_ready(true);
        assert!(engine.is_ready());
    }

    #[test]
    fn channel_engine_forwards_in_order() {
        let (mut engine, host) = ChannelEngine::new();
        engine.send(EngineCall::ModDepthA(1));
        engine.send(EngineCall::ModDepthB(2));
        assert_eq!(
            host.drain(),
            vec![EngineCall::ModDepthA(1), EngineCall::ModDepthB(2)]
        );
    }

    #[test]
    fn send_after_receiver_dropped_does_not_panic() {
        let (mut engine, host) = ChannelEngine::new();
        drop(host);
        engine.send(EngineCall::Volume(1.0));
    }

    #[test]
    fn mutable_reference_is_an_engine() {
        fn push(mut e: impl Engine) {
            e.send(EngineCall::Octave(1));
        }
        let mut engine = RecordingEngine::new();
        push(&mut engine);
        assert_eq!(engine.calls(), &[EngineCall::Octave(1)]);
    }
}
