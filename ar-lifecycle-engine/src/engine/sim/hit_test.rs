use std::collections::VecDeque;

use bevy::prelude::*;

use crate::engine::capability::{Pose, SurfaceHitTest};

/// Hit test that replays a script of per-frame results.
///
/// Once the script runs out the last entry repeats, so a scripted plane
/// keeps being detected.
#[derive(Debug, Clone, Default)]
pub struct ScriptedHitTest {
    script: VecDeque<Option<Pose>>,
    last: Option<Pose>,
    casts: Vec<Vec2>,
}

impl ScriptedHitTest {
    pub fn new(script: impl IntoIterator<Item = Option<Pose>>) -> Self {
        Self {
            script: script.into_iter().collect(),
            last: None,
            casts: Vec::new(),
        }
    }

    /// Surface always hit at `pose`.
    pub fn always(pose: Pose) -> Self {
        Self::new([Some(pose)])
    }

    pub fn push(&mut self, hit: Option<Pose>) {
        self.script.push_back(hit);
    }

    /// Screen points this hit test was cast from, oldest first.
    pub fn casts(&self) -> &[Vec2] {
        &self.casts
    }
}

impl SurfaceHitTest for ScriptedHitTest {
    fn raycast(&mut self, screen_point: Vec2) -> Option<Pose> {
        self.casts.push(screen_point);
        if let Some(next) = self.script.pop_front() {
            self.last = next;
        }
        self.last
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn replays_then_repeats_last() {
        let pose = Pose::from_translation(Vec3::X);
        let mut hits = ScriptedHitTest::new([None, Some(pose)]);
        assert_eq!(hits.raycast(Vec2::ZERO), None);
        assert_eq!(hits.raycast(Vec2::ZERO), Some(pose));
        assert_eq!(hits.raycast(Vec2::ZERO), Some(pose));
        assert_eq!(hits.casts().len(), 3);
    }
}
