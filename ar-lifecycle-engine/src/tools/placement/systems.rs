use bevy::ecs::query::QuerySingleError;
use bevy::input::touch::Touches;
use bevy::prelude::*;
use bevy::window::PrimaryWindow;
use constants::placement::FALLBACK_VIEWPORT_SIZE;

use super::controller::PlacementController;
use super::state::{PlacedObjectId, PlacementOutcome};
use crate::engine::capability::SurfaceHitTest;
use crate::engine::session::{LifecycleError, LifecycleEvent};

/// Surface hit test used by the indicator, injected by the app.
#[derive(Resource)]
pub struct HitTestSource(pub Box<dyn SurfaceHitTest>);

/// UI actions on the placement controller.
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlacementCommand {
    /// Tap: place or move at the indicator.
    Place,
    SelectPrefab(usize),
    SetRepositionOnReselect(bool),
    Clear,
}

/// Results published after placement commands.
#[derive(Event, Debug, Clone, PartialEq)]
pub enum PlacementEvent {
    Placed(PlacedObjectId),
    Moved(PlacedObjectId),
    Cleared(usize),
    Rejected(LifecycleError),
}

impl PlacementEvent {
    fn from_outcome(outcome: PlacementOutcome) -> Option<Self> {
        match outcome {
            PlacementOutcome::Placed(id) => Some(Self::Placed(id)),
            PlacementOutcome::Moved(id) => Some(Self::Moved(id)),
            PlacementOutcome::Unchanged => None,
        }
    }
}

// Components
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlacedEntity {
    pub id: PlacedObjectId,
    pub prefab: usize,
}
#[derive(Component)]
pub struct PlacementIndicator;

// Cast from the configured anchor each frame and feed the result to the controller
pub fn update_placement_indicator(
    hit_test: Option<ResMut<HitTestSource>>,
    windows: Query<&Window, With<PrimaryWindow>>,
    mut placement: ResMut<PlacementController>,
) {
    let Some(mut hit_test) = hit_test else {
        return;
    };
    let viewport = windows
        .single()
        .map(|window| Vec2::new(window.width(), window.height()))
        .unwrap_or(FALLBACK_VIEWPORT_SIZE);

    let screen_point = placement.anchor() * viewport;
    let hit = hit_test.0.raycast(screen_point);
    placement.on_frame_tick(hit);
}

pub fn handle_placement_commands(
    mut commands: EventReader<PlacementCommand>,
    mut placement: ResMut<PlacementController>,
    mut placement_events: EventWriter<PlacementEvent>,
) {
    for command in commands.read() {
        let event = match *command {
            PlacementCommand::Place => PlacementEvent::from_outcome(placement.place_or_update()),
            PlacementCommand::SelectPrefab(index) => match placement.select_prefab(index) {
                Ok(outcome) => PlacementEvent::from_outcome(outcome),
                Err(error) => Some(PlacementEvent::Rejected(error)),
            },
            PlacementCommand::SetRepositionOnReselect(enabled) => {
                PlacementEvent::from_outcome(placement.set_reposition_on_reselect(enabled))
            }
            PlacementCommand::Clear => Some(PlacementEvent::Cleared(placement.clear())),
        };
        if let Some(event) = event {
            placement_events.write(event);
        }
    }
}

// Placed objects hang off the session origin; drop them when it goes away
pub fn apply_lifecycle_events(
    mut lifecycle_events: EventReader<LifecycleEvent>,
    mut placement: ResMut<PlacementController>,
    mut placement_events: EventWriter<PlacementEvent>,
) {
    for event in lifecycle_events.read() {
        if *event == LifecycleEvent::ClearPlacement {
            let released = placement.clear();
            placement_events.write(PlacementEvent::Cleared(released));
        }
    }
}

pub fn apply_touch_gestures(
    touches: Option<Res<Touches>>,
    mut placement: ResMut<PlacementController>,
) {
    let Some(touches) = touches else {
        return;
    };
    // Touches iterate in hash order; the gesture needs a stable finger pairing
    let mut active: Vec<_> = touches.iter().map(|t| (t.id(), t.position())).collect();
    active.sort_by_key(|(id, _)| *id);
    let positions: Vec<Vec2> = active.into_iter().map(|(_, position)| position).collect();

    if let Some(delta) = placement.apply_touches(&positions) {
        debug!("Gesture scale x{:.3}, yaw {:.3} rad", delta.scale, delta.yaw);
    }
}

// Mirror placed objects as entities
pub fn sync_placed_entities(
    placement: Res<PlacementController>,
    mut placed: Query<(Entity, &PlacedEntity, &mut Transform)>,
    mut commands: Commands,
) {
    if !placement.is_changed() {
        return;
    }
    let objects = placement.state().placed_objects();

    let mut seen = Vec::with_capacity(objects.len());
    for (entity, marker, mut transform) in &mut placed {
        match objects.iter().find(|o| o.id == marker.id) {
            Some(object) => {
                if *transform != object.transform {
                    *transform = object.transform;
                }
                seen.push(marker.id);
            }
            None => commands.entity(entity).despawn(),
        }
    }

    for object in objects.iter().filter(|o| !seen.contains(&o.id)) {
        let name = placement
            .prefabs()
            .get(object.prefab)
            .cloned()
            .unwrap_or_else(|| format!("Prefab {}", object.prefab));
        commands.spawn((
            Name::new(name),
            PlacedEntity {
                id: object.id,
                prefab: object.prefab,
            },
            object.transform,
        ));
    }
}

pub fn sync_placement_indicator(
    placement: Res<PlacementController>,
    mut indicator: Query<(&mut Transform, &mut Visibility), With<PlacementIndicator>>,
    mut commands: Commands,
) {
    let state = placement.state();
    let Some(pose) = state.indicator_pose() else {
        return;
    };
    let visibility = if state.indicator_visible() {
        Visibility::Visible
    } else {
        Visibility::Hidden
    };

    match indicator.single_mut() {
        Ok((mut transform, mut current)) => {
            *transform = pose.to_transform();
            current.set_if_neq(visibility);
        }
        Err(QuerySingleError::NoEntities(_)) => {
            commands.spawn((
                Name::new("Placement Indicator"),
                PlacementIndicator,
                pose.to_transform(),
                visibility,
            ));
        }
        Err(QuerySingleError::MultipleEntities(_)) => {
            warn!("Multiple placement indicators found; skipping update");
        }
    }
}

pub fn hide_placement_indicator(
    mut indicator: Query<&mut Visibility, With<PlacementIndicator>>,
) {
    for mut visibility in &mut indicator {
        visibility.set_if_neq(Visibility::Hidden);
    }
}
