use std::f32::consts::{PI, TAU};

use bevy::prelude::*;
use constants::placement::MIN_GESTURE_DISTANCE;

/// Transform change produced by one tick of a two-finger gesture.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GestureDelta {
    /// Multiplicative scale factor, `current_span / previous_span`.
    pub scale: f32,
    /// Yaw change in radians, wrapped to `[-PI, PI]`.
    pub yaw: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Span {
    distance: f32,
    angle: f32,
}

impl Span {
    fn measure(a: Vec2, b: Vec2) -> Option<Self> {
        let offset = b - a;
        let distance = offset.length();
        (distance >= MIN_GESTURE_DISTANCE).then(|| Self {
            distance,
            angle: offset.y.atan2(offset.x),
        })
    }
}

/// Pinch-scale and twist-rotate tracking across frame ticks.
///
/// Each tick compares the current two-touch span against the previous one,
/// then makes the current span the new baseline. A change in touch count only
/// records a baseline, so lifting or adding a finger never jumps the object.
#[derive(Debug, Clone, Default)]
pub struct GestureTracker {
    touch_count: usize,
    baseline: Option<Span>,
}

impl GestureTracker {
    /// Feed the touch positions of this tick, ordered by touch id.
    pub fn update(&mut self, touches: &[Vec2]) -> Option<GestureDelta> {
        let current = match touches {
            [a, b] => Span::measure(*a, *b),
            _ => None,
        };

        if touches.len() != self.touch_count {
            self.touch_count = touches.len();
            self.baseline = current;
            return None;
        }

        let current = current?;
        let previous = self.baseline.replace(current)?;

        Some(GestureDelta {
            scale: current.distance / previous.distance,
            yaw: wrap_angle(current.angle - previous.angle),
        })
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

fn wrap_angle(angle: f32) -> f32 {
    (angle + PI).rem_euclid(TAU) - PI
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pair(span: f32) -> [Vec2; 2] {
        [Vec2::ZERO, Vec2::new(span, 0.0)]
    }

    #[test]
    fn first_tick_only_sets_baseline() {
        let mut tracker = GestureTracker::default();
        assert_eq!(tracker.update(&pair(100.0)), None);
    }

    #[test]
    fn scale_is_relative_to_previous_tick() {
        let mut tracker = GestureTracker::default();
        tracker.update(&pair(100.0));
        let first = tracker.update(&pair(150.0)).unwrap();
        let second = tracker.update(&pair(120.0)).unwrap();
        assert!((first.scale - 1.5).abs() < 1e-6);
        assert!((second.scale - 0.8).abs() < 1e-6);
        assert!((first.scale * second.scale - 1.2).abs() < 1e-5);
    }

    #[test]
    fn touch_count_change_resets_baseline() {
        let mut tracker = GestureTracker::default();
        tracker.update(&pair(100.0));
        assert_eq!(tracker.update(&[Vec2::ZERO]), None);
        assert_eq!(tracker.update(&pair(300.0)), None);
        let delta = tracker.update(&pair(300.0)).unwrap();
        assert!((delta.scale - 1.0).abs() < 1e-6);
    }

    #[test]
    fn twist_reports_yaw_delta() {
        let mut tracker = GestureTracker::default();
        tracker.update(&[Vec2::ZERO, Vec2::new(100.0, 0.0)]);
        let delta = tracker.update(&[Vec2::ZERO, Vec2::new(0.0, 100.0)]).unwrap();
        assert!((delta.yaw - PI / 2.0).abs() < 1e-5);
        assert!((delta.scale - 1.0).abs() < 1e-5);
    }

    #[test]
    fn yaw_wraps_across_half_turn() {
        let mut tracker = GestureTracker::default();
        tracker.update(&[Vec2::ZERO, Vec2::new(-100.0, 1.0)]);
        let delta = tracker.update(&[Vec2::ZERO, Vec2::new(-100.0, -1.0)]).unwrap();
        assert!(delta.yaw.abs() < 0.1);
    }

    #[test]
    fn collapsed_span_is_ignored() {
        let mut tracker = GestureTracker::default();
        tracker.update(&pair(100.0));
        assert_eq!(tracker.update(&pair(0.5)), None);
        let delta = tracker.update(&pair(200.0)).unwrap();
        assert!((delta.scale - 2.0).abs() < 1e-6);
    }
}
