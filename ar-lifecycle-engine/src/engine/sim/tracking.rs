use std::cell::RefCell;
use std::rc::Rc;

use bevy::prelude::*;

use crate::engine::capability::frame::settle_frames;
use crate::engine::capability::{
    CapabilityUnavailable, LifecycleFuture, TrackingCapability, TrackingState,
};

/// Calls recorded by [`SimulatedTracking`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackingCall {
    Initialize,
    Start,
    Stop,
    Deinitialize,
}

#[derive(Debug)]
struct TrackingInner {
    state: TrackingState,
    loader_ready: bool,
    available: bool,
    init_frames: u32,
    calls: Vec<TrackingCall>,
}

/// Tracking capability stand-in.
///
/// Clones share state, so a test can keep a clone after boxing one into the
/// controller and still inspect calls or flip availability.
#[derive(Debug, Clone)]
pub struct SimulatedTracking {
    inner: Rc<RefCell<TrackingInner>>,
}

impl Default for SimulatedTracking {
    fn default() -> Self {
        Self::new()
    }
}

impl SimulatedTracking {
    pub fn new() -> Self {
        Self {
            inner: Rc::new(RefCell::new(TrackingInner {
                state: TrackingState::None,
                loader_ready: false,
                available: true,
                init_frames: 1,
                calls: Vec::new(),
            })),
        }
    }

    /// A platform where the loader can never be created.
    pub fn unavailable() -> Self {
        let tracking = Self::new();
        tracking.set_available(false);
        tracking
    }

    pub fn set_available(&self, available: bool) {
        self.inner.borrow_mut().available = available;
    }

    pub fn set_init_frames(&self, frames: u32) {
        self.inner.borrow_mut().init_frames = frames;
    }

    pub fn calls(&self) -> Vec<TrackingCall> {
        self.inner.borrow().calls.clone()
    }

    pub fn call_count(&self) -> usize {
        self.inner.borrow().calls.len()
    }

    pub fn is_loader_ready(&self) -> bool {
        self.inner.borrow().loader_ready
    }
}

impl TrackingCapability for SimulatedTracking {
    fn initialize(&mut self) -> LifecycleFuture<'_, Result<(), CapabilityUnavailable>> {
        let inner = Rc::clone(&self.inner);
        Box::pin(async move {
            let frames = {
                let mut inner = inner.borrow_mut();
                inner.calls.push(TrackingCall::Initialize);
                inner.state = TrackingState::Initializing;
                inner.init_frames
            };
            settle_frames(frames).await;

            let mut inner = inner.borrow_mut();
            if !inner.available {
                inner.state = TrackingState::None;
                return Err(CapabilityUnavailable::new("failed to initialize XR loader"));
            }
            inner.loader_ready = true;
            inner.state = TrackingState::Paused;
            Ok(())
        })
    }

    fn start(&mut self) {
        let mut inner = self.inner.borrow_mut();
        inner.calls.push(TrackingCall::Start);
        if inner.loader_ready {
            inner.state = TrackingState::Tracking;
        } else {
            warn!("Simulated tracking started without an initialized loader");
        }
    }

    fn stop(&mut self) {
        let mut inner = self.inner.borrow_mut();
        inner.calls.push(TrackingCall::Stop);
        if inner.state == TrackingState::Tracking {
            inner.state = TrackingState::Paused;
        }
    }

    fn deinitialize(&mut self) {
        let mut inner = self.inner.borrow_mut();
        inner.calls.push(TrackingCall::Deinitialize);
        inner.loader_ready = false;
        inner.state = TrackingState::None;
    }

    fn current_state(&self) -> TrackingState {
        self.inner.borrow().state
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bevy::tasks::block_on;

    #[test]
    fn initialize_then_start_tracks() {
        let mut tracking = SimulatedTracking::new();
        block_on(tracking.initialize()).unwrap();
        tracking.start();
        assert_eq!(tracking.current_state(), TrackingState::Tracking);
    }

    #[test]
    fn stop_and_deinitialize_are_repeatable() {
        let mut tracking = SimulatedTracking::new();
        block_on(tracking.initialize()).unwrap();
        tracking.start();
        for _ in 0..2 {
            tracking.stop();
            tracking.deinitialize();
        }
        assert_eq!(tracking.current_state(), TrackingState::None);
        assert!(!tracking.is_loader_ready());
    }

    #[test]
    fn unavailable_loader_reports_error() {
        let mut tracking = SimulatedTracking::unavailable();
        let probe = tracking.clone();
        assert!(block_on(tracking.initialize()).is_err());
        assert_eq!(probe.calls(), vec![TrackingCall::Initialize]);
        assert_eq!(probe.current_state(), TrackingState::None);
    }
}
