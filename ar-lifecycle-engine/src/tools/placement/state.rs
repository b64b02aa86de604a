use bevy::prelude::*;

use crate::engine::capability::Pose;

/// Identity of an object placed in the AR scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PlacedObjectId(pub u64);

#[derive(Debug, Clone, PartialEq)]
pub struct PlacedObject {
    pub id: PlacedObjectId,
    /// Index into the configured prefab list.
    pub prefab: usize,
    /// Pose plus the scale edited by gestures.
    pub transform: Transform,
}

/// What a placement call did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlacementOutcome {
    Placed(PlacedObjectId),
    Moved(PlacedObjectId),
    Unchanged,
}

/// Indicator and placed objects of the current AR session.
#[derive(Debug, Clone, Default)]
pub struct PlacementState {
    pub(super) indicator_pose: Option<Pose>,
    pub(super) indicator_visible: bool,
    pub(super) placed_objects: Vec<PlacedObject>,
    pub(super) selected_prefab: Option<usize>,
    pub(super) reposition_on_reselect: bool,
}

impl PlacementState {
    /// Last surface pose seen, kept while the surface is lost.
    pub fn indicator_pose(&self) -> Option<Pose> {
        self.indicator_pose
    }

    pub fn indicator_visible(&self) -> bool {
        self.indicator_visible
    }

    pub fn placed_objects(&self) -> &[PlacedObject] {
        &self.placed_objects
    }

    pub fn selected_prefab(&self) -> Option<usize> {
        self.selected_prefab
    }

    pub fn reposition_on_reselect(&self) -> bool {
        self.reposition_on_reselect
    }
}
