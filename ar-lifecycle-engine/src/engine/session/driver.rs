use std::future::Future;
use std::pin::Pin;

use bevy::prelude::*;
use bevy::tasks::block_on;
use bevy::tasks::futures_lite::future;

use super::LifecycleEvent;
use super::controller::SceneTransitionController;
use super::error::LifecycleError;
use super::state::{OriginHandle, SessionPhase};

/// Transitions a UI action can ask for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransitionKind {
    EnterAr,
    ReturnHome,
}

impl TransitionKind {
    fn pending_phase(self) -> SessionPhase {
        match self {
            Self::EnterAr => SessionPhase::Initializing,
            Self::ReturnHome => SessionPhase::Stopping,
        }
    }
}

/// Request written by UI buttons (or scripts) to start a transition.
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransitionRequest {
    pub kind: TransitionKind,
}

impl TransitionRequest {
    pub fn enter_ar() -> Self {
        Self {
            kind: TransitionKind::EnterAr,
        }
    }

    pub fn return_home() -> Self {
        Self {
            kind: TransitionKind::ReturnHome,
        }
    }
}

/// Result of a transition that ran to completion.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletedTransition {
    pub kind: TransitionKind,
    pub result: Result<Option<OriginHandle>, LifecycleError>,
}

type InFlight = Pin<
    Box<
        dyn Future<
            Output = (
                SceneTransitionController,
                Result<Option<OriginHandle>, LifecycleError>,
            ),
        >,
    >,
>;

/// Runs scene transitions across frame ticks.
///
/// Lives in the world as a non-send resource because the collaborators are
/// main-thread bound. While a transition is in flight the controller is moved
/// into its future and each [`poll`](Self::poll) advances it by one frame.
pub struct TransitionDriver {
    controller: Option<SceneTransitionController>,
    in_flight: Option<(TransitionKind, InFlight)>,
}

impl TransitionDriver {
    pub fn new(controller: SceneTransitionController) -> Self {
        Self {
            controller: Some(controller),
            in_flight: None,
        }
    }

    pub fn is_busy(&self) -> bool {
        self.in_flight.is_some()
    }

    /// The controller, unless a transition currently owns it.
    pub fn controller(&self) -> Option<&SceneTransitionController> {
        self.controller.as_ref()
    }

    pub fn controller_mut(&mut self) -> Option<&mut SceneTransitionController> {
        self.controller.as_mut()
    }

    /// Session phase, as seen from outside the in-flight transition.
    pub fn phase(&self) -> SessionPhase {
        match (&self.controller, &self.in_flight) {
            (Some(controller), _) => controller.phase(),
            (None, Some((kind, _))) => kind.pending_phase(),
            (None, None) => SessionPhase::Uninitialized,
        }
    }

    /// Start a transition. Returns the phase the session is in while it runs.
    ///
    /// A request made while another transition is in flight is rejected with
    /// [`LifecycleError::TransitionInProgress`]; nothing is queued.
    pub fn begin(&mut self, kind: TransitionKind) -> Result<SessionPhase, LifecycleError> {
        if self.in_flight.is_some() {
            return Err(LifecycleError::TransitionInProgress);
        }
        let Some(mut controller) = self.controller.take() else {
            return Err(LifecycleError::TransitionInProgress);
        };

        let pending = match kind {
            TransitionKind::ReturnHome if controller.phase() == SessionPhase::Stopped => {
                SessionPhase::Stopped
            }
            _ => kind.pending_phase(),
        };

        let transition: InFlight = Box::pin(async move {
            let result = match kind {
                TransitionKind::EnterAr => controller.enter_ar_mode().await.map(Some),
                TransitionKind::ReturnHome => controller.return_to_home().await.map(|_| None),
            };
            (controller, result)
        });
        self.in_flight = Some((kind, transition));
        Ok(pending)
    }

    /// Advance the in-flight transition by one frame tick.
    pub fn poll(&mut self) -> Option<CompletedTransition> {
        let (kind, transition) = self.in_flight.as_mut()?;
        let kind = *kind;
        let (controller, result) = block_on(future::poll_once(transition))?;

        self.in_flight = None;
        self.controller = Some(controller);
        Some(CompletedTransition { kind, result })
    }

    /// Lifecycle notifications queued by the controller since the last drain.
    pub fn drain_events(&mut self) -> Vec<LifecycleEvent> {
        self.controller
            .as_mut()
            .map(SceneTransitionController::drain_events)
            .unwrap_or_default()
    }

    /// Stop the session outright. Rejected while a transition is in flight.
    pub fn teardown(&mut self) -> Result<(), LifecycleError> {
        match self.controller.as_mut() {
            Some(controller) if self.in_flight.is_none() => {
                controller.teardown();
                Ok(())
            }
            _ => Err(LifecycleError::TransitionInProgress),
        }
    }
}

/// Start transitions for incoming requests, rejecting overlaps.
pub fn handle_transition_requests(
    mut requests: EventReader<TransitionRequest>,
    driver: Option<NonSendMut<TransitionDriver>>,
    mut next_phase: ResMut<NextState<SessionPhase>>,
    mut lifecycle_events: EventWriter<LifecycleEvent>,
) {
    let Some(mut driver) = driver else {
        if !requests.is_empty() {
            warn!("Transition requested before the lifecycle was installed");
            requests.clear();
        }
        return;
    };

    for request in requests.read() {
        match driver.begin(request.kind) {
            Ok(pending) => {
                debug!("→ Starting {:?} transition", request.kind);
                next_phase.set(pending);
            }
            Err(error) => {
                warn!("Rejected {:?} request: {}", request.kind, error);
                lifecycle_events.write(LifecycleEvent::Rejected {
                    kind: request.kind,
                    error,
                });
            }
        }
    }
}

/// Poll the in-flight transition once and publish what it produced.
pub fn drive_transitions(
    driver: Option<NonSendMut<TransitionDriver>>,
    mut next_phase: ResMut<NextState<SessionPhase>>,
    mut lifecycle_events: EventWriter<LifecycleEvent>,
) {
    let Some(mut driver) = driver else {
        return;
    };
    let Some(completed) = driver.poll() else {
        return;
    };

    match &completed.result {
        Ok(_) => info!("✓ {:?} transition complete", completed.kind),
        Err(error) => error!("{:?} transition failed: {}", completed.kind, error),
    }
    next_phase.set(driver.phase());
    lifecycle_events.write_batch(driver.drain_events());
}

/// Tear the session down when the app is exiting.
pub fn teardown_on_exit(
    mut exits: EventReader<AppExit>,
    driver: Option<NonSendMut<TransitionDriver>>,
    mut lifecycle_events: EventWriter<LifecycleEvent>,
) {
    if exits.is_empty() {
        return;
    }
    exits.clear();
    let Some(mut driver) = driver else {
        return;
    };
    if let Err(error) = driver.teardown() {
        warn!("Exiting with a transition in flight: {}", error);
        return;
    }
    lifecycle_events.write_batch(driver.drain_events());
}
