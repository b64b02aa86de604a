//! Placement indicator, placed objects and touch gestures for AR mode.
//!
//! ## Frame Flow
//!
//! ```text
//! HitTestSource::raycast(anchor * viewport)
//!   └─> PlacementController::on_frame_tick()
//!       └─> indicator pose / visibility
//!
//! PlacementCommand (UI)
//!   └─> handle_placement_commands()
//!       ├─> place_or_update / select_prefab / set_reposition_on_reselect / clear
//!       └─> PlacementEvent
//!
//! Touches (sorted by id)
//!   └─> apply_touch_gestures() ─> scale + yaw of the single placed object
//!
//! PlacementController ──> sync_placed_entities() / sync_placement_indicator()
//! ```
//!
//! Everything above runs only while the session is `Running`. The
//! `ClearPlacement` lifecycle notification is applied in every phase, since
//! it arrives while a transition is tearing the session down.

/// Placement rules over [`state::PlacementState`].
pub mod controller;

/// Two-finger pinch and twist tracking.
pub mod gestures;

pub mod state;

/// Bevy systems, events and components around the controller.
pub mod systems;

use bevy::prelude::*;

use crate::engine::session::SessionPhase;
use crate::engine::session::driver::drive_transitions;

pub use controller::PlacementController;
pub use state::{PlacedObject, PlacedObjectId, PlacementOutcome, PlacementState};
pub use systems::{HitTestSource, PlacedEntity, PlacementCommand, PlacementEvent, PlacementIndicator};

use systems::{
    apply_lifecycle_events, apply_touch_gestures, handle_placement_commands,
    hide_placement_indicator, sync_placed_entities, sync_placement_indicator,
    update_placement_indicator,
};

// Registers placement events and the per-frame placement systems.
pub struct PlacementPlugin;

impl Plugin for PlacementPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<PlacementCommand>()
            .add_event::<PlacementEvent>()
            .add_systems(
                Update,
                apply_lifecycle_events
                    .after(drive_transitions)
                    .run_if(resource_exists::<PlacementController>),
            )
            .add_systems(
                Update,
                (
                    update_placement_indicator,
                    handle_placement_commands,
                    apply_touch_gestures,
                )
                    .chain()
                    .after(apply_lifecycle_events)
                    .run_if(resource_exists::<PlacementController>)
                    .run_if(in_state(SessionPhase::Running)),
            )
            .add_systems(
                PostUpdate,
                (
                    sync_placed_entities,
                    sync_placement_indicator.run_if(in_state(SessionPhase::Running)),
                )
                    .run_if(resource_exists::<PlacementController>),
            )
            .add_systems(OnExit(SessionPhase::Running), hide_placement_indicator);
    }
}
