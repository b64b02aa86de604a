use bevy::prelude::*;
use constants::placement::{MAX_PLACED_SCALE, MIN_PLACED_SCALE};

use super::gestures::{GestureDelta, GestureTracker};
use super::state::{PlacedObject, PlacedObjectId, PlacementOutcome, PlacementState};
use crate::engine::capability::Pose;
use crate::engine::config::LifecycleConfig;
use crate::engine::session::LifecycleError;

/// Owns the placement state and the rules for changing it.
#[derive(Resource, Debug, Clone)]
pub struct PlacementController {
    prefabs: Vec<String>,
    allow_multiple: bool,
    place_on_select: bool,
    anchor: Vec2,
    state: PlacementState,
    gestures: GestureTracker,
    next_id: u64,
}

impl PlacementController {
    pub fn new(prefabs: Vec<String>, allow_multiple: bool) -> Self {
        Self {
            prefabs,
            allow_multiple,
            place_on_select: false,
            anchor: constants::placement::DEFAULT_PLACEMENT_ANCHOR,
            state: PlacementState::default(),
            gestures: GestureTracker::default(),
            next_id: 0,
        }
    }

    pub fn from_config(config: &LifecycleConfig) -> Self {
        let mut controller = Self::new(config.prefabs.clone(), config.allow_multiple_objects);
        controller.place_on_select = config.place_on_select;
        controller.anchor = config.anchor();
        controller.state.reposition_on_reselect = config.reposition_on_reselect;
        controller
    }

    pub fn state(&self) -> &PlacementState {
        &self.state
    }

    pub fn prefabs(&self) -> &[String] {
        &self.prefabs
    }

    /// Normalised viewport point the hit test should be cast from.
    pub fn anchor(&self) -> Vec2 {
        self.anchor
    }

    pub fn allow_multiple(&self) -> bool {
        self.allow_multiple
    }

    /// Record this tick's hit result. A miss hides the indicator but keeps
    /// its last pose.
    pub fn on_frame_tick(&mut self, hit: Option<Pose>) {
        match hit {
            Some(pose) => {
                self.state.indicator_pose = Some(pose);
                self.state.indicator_visible = true;
            }
            None => self.state.indicator_visible = false,
        }
    }

    /// Place the selected prefab at the indicator, or move the placed object.
    pub fn place_or_update(&mut self) -> PlacementOutcome {
        if !self.state.indicator_visible {
            return PlacementOutcome::Unchanged;
        }
        let (Some(pose), Some(prefab)) = (self.state.indicator_pose, self.valid_selection()) else {
            return PlacementOutcome::Unchanged;
        };

        if self.state.placed_objects.is_empty() || self.allow_multiple {
            return self.spawn(prefab, pose);
        }

        if !self.state.reposition_on_reselect {
            return PlacementOutcome::Unchanged;
        }
        let Some(object) = self.state.placed_objects.first_mut() else {
            return PlacementOutcome::Unchanged;
        };
        object.transform.translation = pose.position;
        object.transform.rotation = pose.rotation;
        debug!("Moved {} to {:?}", self.prefabs[object.prefab], pose.position);
        PlacementOutcome::Moved(object.id)
    }

    /// Choose the prefab to place. A new choice releases what was placed.
    pub fn select_prefab(&mut self, index: usize) -> Result<PlacementOutcome, LifecycleError> {
        if index >= self.prefabs.len() {
            warn!("Invalid prefab index: {}", index);
            return Err(LifecycleError::InvalidIndex {
                index,
                count: self.prefabs.len(),
            });
        }
        if self.state.selected_prefab == Some(index) {
            return Ok(PlacementOutcome::Unchanged);
        }

        self.release_placed();
        self.state.selected_prefab = Some(index);
        info!("Selected prefab: {}", self.prefabs[index]);

        if self.place_on_select {
            return Ok(self.place_or_update());
        }
        Ok(PlacementOutcome::Unchanged)
    }

    /// Store the toggle; switching it on moves an existing object right away.
    pub fn set_reposition_on_reselect(&mut self, enabled: bool) -> PlacementOutcome {
        self.state.reposition_on_reselect = enabled;
        if enabled && !self.state.placed_objects.is_empty() && !self.allow_multiple {
            return self.place_or_update();
        }
        PlacementOutcome::Unchanged
    }

    /// Release every placed object. Returns how many were released.
    pub fn clear(&mut self) -> usize {
        let released = self.release_placed();
        if released > 0 {
            info!("Cleared {} placed object(s)", released);
        }
        released
    }

    /// Apply one tick of touch input to the single placed object.
    ///
    /// Touch positions must be ordered by touch id. Gestures are ignored unless
    /// exactly one object is placed.
    pub fn apply_touches(&mut self, touches: &[Vec2]) -> Option<GestureDelta> {
        let delta = self.gestures.update(touches)?;
        let [object] = self.state.placed_objects.as_mut_slice() else {
            return None;
        };

        let scale = (object.transform.scale * delta.scale)
            .clamp(Vec3::splat(MIN_PLACED_SCALE), Vec3::splat(MAX_PLACED_SCALE));
        object.transform.scale = scale;
        object.transform.rotate_y(delta.yaw);
        Some(delta)
    }

    fn valid_selection(&self) -> Option<usize> {
        self.state
            .selected_prefab
            .filter(|index| *index < self.prefabs.len())
    }

    fn spawn(&mut self, prefab: usize, pose: Pose) -> PlacementOutcome {
        let id = PlacedObjectId(self.next_id);
        self.next_id += 1;
        self.state.placed_objects.push(PlacedObject {
            id,
            prefab,
            transform: pose.to_transform(),
        });
        info!("Placed {} at {:?}", self.prefabs[prefab], pose.position);
        PlacementOutcome::Placed(id)
    }

    fn release_placed(&mut self) -> usize {
        self.gestures.reset();
        let released = self.state.placed_objects.len();
        self.state.placed_objects.clear();
        released
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn controller() -> PlacementController {
        PlacementController::new(vec!["Chair".into(), "Table".into()], false)
    }

    fn surface() -> Pose {
        Pose::from_translation(Vec3::new(0.0, 0.0, -1.0))
    }

    #[test]
    fn miss_hides_indicator_but_keeps_pose() {
        let mut placement = controller();
        placement.on_frame_tick(Some(surface()));
        placement.on_frame_tick(None);
        assert!(!placement.state().indicator_visible());
        assert_eq!(placement.state().indicator_pose(), Some(surface()));
    }

    #[test]
    fn place_requires_visible_indicator_and_selection() {
        let mut placement = controller();
        placement.on_frame_tick(Some(surface()));
        assert_eq!(placement.place_or_update(), PlacementOutcome::Unchanged);

        placement.select_prefab(0).unwrap();
        placement.on_frame_tick(None);
        assert_eq!(placement.place_or_update(), PlacementOutcome::Unchanged);
        assert!(placement.state().placed_objects().is_empty());

        placement.on_frame_tick(Some(surface()));
        assert!(matches!(placement.place_or_update(), PlacementOutcome::Placed(_)));
    }

    #[test]
    fn single_object_moves_only_when_toggled() {
        let mut placement = controller();
        placement.select_prefab(1).unwrap();
        placement.on_frame_tick(Some(surface()));
        let PlacementOutcome::Placed(id) = placement.place_or_update() else {
            panic!("expected placement");
        };

        let elsewhere = Pose::from_translation(Vec3::new(2.0, 0.0, -3.0));
        placement.on_frame_tick(Some(elsewhere));
        assert_eq!(placement.place_or_update(), PlacementOutcome::Unchanged);

        assert_eq!(placement.set_reposition_on_reselect(true), PlacementOutcome::Moved(id));
        let object = &placement.state().placed_objects()[0];
        assert_eq!(object.transform.translation, elsewhere.position);
        assert_eq!(placement.state().placed_objects().len(), 1);
    }

    #[test]
    fn multiple_mode_places_more() {
        let mut placement = PlacementController::new(vec!["Chair".into()], true);
        placement.select_prefab(0).unwrap();
        placement.on_frame_tick(Some(surface()));
        placement.place_or_update();
        placement.place_or_update();
        assert_eq!(placement.state().placed_objects().len(), 2);
    }

    #[test]
    fn invalid_index_leaves_state_alone() {
        let mut placement = controller();
        placement.select_prefab(0).unwrap();
        placement.on_frame_tick(Some(surface()));
        placement.place_or_update();

        let err = placement.select_prefab(5).unwrap_err();
        assert_eq!(err, LifecycleError::InvalidIndex { index: 5, count: 2 });
        assert_eq!(placement.state().selected_prefab(), Some(0));
        assert_eq!(placement.state().placed_objects().len(), 1);
    }

    #[test]
    fn reselecting_same_prefab_keeps_object() {
        let mut placement = controller();
        placement.select_prefab(0).unwrap();
        placement.on_frame_tick(Some(surface()));
        placement.place_or_update();

        assert_eq!(placement.select_prefab(0), Ok(PlacementOutcome::Unchanged));
        assert_eq!(placement.state().placed_objects().len(), 1);

        placement.select_prefab(1).unwrap();
        assert!(placement.state().placed_objects().is_empty());
    }

    #[test]
    fn place_on_select_places_immediately() {
        let mut config = LifecycleConfig::default();
        config.place_on_select = true;
        let mut placement = PlacementController::from_config(&config);
        placement.on_frame_tick(Some(surface()));

        assert!(matches!(placement.select_prefab(2), Ok(PlacementOutcome::Placed(_))));
    }

    #[test]
    fn pinch_scales_single_object() {
        let mut placement = controller();
        placement.select_prefab(0).unwrap();
        placement.on_frame_tick(Some(surface()));
        placement.place_or_update();

        for span in [100.0, 150.0, 120.0] {
            placement.apply_touches(&[Vec2::ZERO, Vec2::new(span, 0.0)]);
        }

        let scale = placement.state().placed_objects()[0].transform.scale;
        assert!((scale - Vec3::splat(1.2)).abs().max_element() < 1e-5);
    }

    #[test]
    fn gestures_ignored_without_single_object() {
        let mut placement = PlacementController::new(vec!["Chair".into()], true);
        placement.select_prefab(0).unwrap();
        placement.on_frame_tick(Some(surface()));
        placement.place_or_update();
        placement.place_or_update();

        placement.apply_touches(&[Vec2::ZERO, Vec2::new(100.0, 0.0)]);
        assert_eq!(placement.apply_touches(&[Vec2::ZERO, Vec2::new(200.0, 0.0)]), None);
        assert!(
            placement
                .state()
                .placed_objects()
                .iter()
                .all(|o| o.transform.scale == Vec3::ONE)
        );
    }
}
