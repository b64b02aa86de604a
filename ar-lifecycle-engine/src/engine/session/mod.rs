//! AR session lifecycle: phases, scene transitions and singleton hygiene.
//!
//! ## Transition Flow
//!
//! ```text
//! TransitionRequest ──> TransitionDriver::begin ──> in-flight future (one poll per frame)
//!                                                        │
//!   enter_ar_mode:  cleanup previous session ─> settle frames ─> load AR scene
//!                   ─> hide home roots ─> initialize tracking ─> start
//!                   ─> resolve duplicates ─> locate origin ─> Running
//!
//!   return_to_home: stop + deinitialize ─> clear placement ─> load home singly
//!                   ─> release resources ─> resolve duplicates ─> Stopped
//!                                                        │
//!                          LifecycleEvent <──────────────┘
//! ```
//!
//! The controller's [`state::SessionState`] is the source of truth. The Bevy
//! [`SessionPhase`] state is a mirror the driver systems keep in step, used to
//! gate per-frame systems such as placement.

/// Scene transition orchestration over injected collaborators.
pub mod controller;

/// Frame-driven execution of transitions and the Bevy systems around it.
pub mod driver;

/// Singleton de-duplication over the loaded scenes.
pub mod duplicates;

pub mod error;

/// Session phase and tracking-origin record.
pub mod state;

use bevy::prelude::*;

pub use controller::{SceneTransitionController, TransitionConfig};
pub use driver::{TransitionDriver, TransitionKind, TransitionRequest};
pub use error::LifecycleError;
pub use state::{OriginHandle, SessionPhase, SessionState};

/// Notifications published by the lifecycle for other subsystems.
#[derive(Event, Debug, Clone, PartialEq)]
pub enum LifecycleEvent {
    /// The AR session is running against this origin.
    ArReady { origin: OriginHandle },
    /// Placed objects and the indicator refer to a stale origin and must go.
    ClearPlacement,
    /// Retained unmanaged buffers (camera textures, inference tensors) can be freed.
    ResourcesReleased,
    /// The AR scene has been replaced by the home scene.
    ArUnloaded,
    Failed(LifecycleError),
    /// A request was refused without touching the session.
    Rejected {
        kind: TransitionKind,
        error: LifecycleError,
    },
}

/// Registers the session phase state, transition events and driver systems.
///
/// The [`TransitionDriver`] itself is inserted by the app once collaborators
/// exist; until then requests are dropped with a warning.
pub struct SessionPlugin;

impl Plugin for SessionPlugin {
    fn build(&self, app: &mut App) {
        app.init_state::<SessionPhase>()
            .add_event::<TransitionRequest>()
            .add_event::<LifecycleEvent>()
            .add_systems(
                Update,
                (
                    driver::handle_transition_requests,
                    driver::drive_transitions,
                    driver::teardown_on_exit,
                )
                    .chain(),
            );
    }
}
