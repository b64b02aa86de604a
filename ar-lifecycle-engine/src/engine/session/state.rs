use bevy::prelude::*;

use super::error::LifecycleError;
use crate::engine::capability::ObjectId;

/// Phase of the AR session.
///
/// Also registered as a Bevy state so frame systems can be gated with
/// `in_state(SessionPhase::Running)`. The world state is a mirror written by
/// the transition driver; the controller's [`SessionState`] is authoritative.
#[derive(States, Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SessionPhase {
    #[default]
    Uninitialized,
    Initializing,
    Running,
    Stopping,
    Stopped,
    Failed,
}

impl SessionPhase {
    /// A transition is in flight.
    pub fn is_transitioning(&self) -> bool {
        matches!(self, Self::Initializing | Self::Stopping)
    }
}

/// Handle to the coordinate-space anchor of a running session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct OriginHandle(pub ObjectId);

/// Record of the current AR session.
///
/// `tracking_origin` is set if and only if the phase is `Running`; the
/// mutators below are the only way to change either field.
#[derive(Debug, Clone, Default)]
pub struct SessionState {
    phase: SessionPhase,
    tracking_origin: Option<OriginHandle>,
    last_error: Option<LifecycleError>,
}

impl SessionState {
    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn tracking_origin(&self) -> Option<OriginHandle> {
        self.tracking_origin
    }

    pub fn last_error(&self) -> Option<&LifecycleError> {
        self.last_error.as_ref()
    }

    /// Enter a transitional or stopped phase, dropping any origin reference.
    pub(crate) fn set_phase(&mut self, phase: SessionPhase) {
        debug_assert!(phase != SessionPhase::Running, "use mark_running");
        self.phase = phase;
        self.tracking_origin = None;
    }

    pub(crate) fn mark_running(&mut self, origin: OriginHandle) {
        self.phase = SessionPhase::Running;
        self.tracking_origin = Some(origin);
        self.last_error = None;
    }

    pub(crate) fn mark_failed(&mut self, error: LifecycleError) {
        self.phase = SessionPhase::Failed;
        self.tracking_origin = None;
        self.last_error = Some(error);
    }

    /// Back to `Uninitialized` on full teardown.
    pub(crate) fn reset(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn origin_only_while_running() {
        let mut state = SessionState::default();
        assert_eq!(state.phase(), SessionPhase::Uninitialized);
        assert!(state.tracking_origin().is_none());

        state.mark_running(OriginHandle(ObjectId(7)));
        assert_eq!(state.tracking_origin(), Some(OriginHandle(ObjectId(7))));

        state.set_phase(SessionPhase::Stopping);
        assert!(state.tracking_origin().is_none());
    }

    #[test]
    fn failure_keeps_error_until_next_run() {
        let mut state = SessionState::default();
        state.mark_failed(LifecycleError::TransitionInProgress);
        assert_eq!(state.phase(), SessionPhase::Failed);
        assert!(state.last_error().is_some());

        state.mark_running(OriginHandle(ObjectId(1)));
        assert!(state.last_error().is_none());

        state.reset();
        assert_eq!(state.phase(), SessionPhase::Uninitialized);
    }
}
