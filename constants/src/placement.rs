use bevy::math::Vec2;

/// Normalised viewport point used for the continuous hit test (screen centre).
pub const DEFAULT_PLACEMENT_ANCHOR: Vec2 = Vec2::new(0.5, 0.5);

/// Viewport size assumed when no primary window exists (portrait phone).
pub const FALLBACK_VIEWPORT_SIZE: Vec2 = Vec2::new(1080.0, 1920.0);

/// Two-finger spans shorter than this (pixels) are ignored by the pinch gesture.
pub const MIN_GESTURE_DISTANCE: f32 = 1.0;

/// Scale limits applied to a placed object by the pinch gesture.
pub const MIN_PLACED_SCALE: f32 = 0.05;
pub const MAX_PLACED_SCALE: f32 = 20.0;
