//! Collaborator capabilities consumed by the AR lifecycle.
//!
//! The tracking subsystem, the surface hit test and the scene host are owned
//! by the platform. The lifecycle only sees them through these traits, which
//! lets the host application inject real bindings and lets tests inject the
//! simulated ones from [`crate::engine::sim`].
//!
//! ## Suspension Points
//!
//! Operations that take more than one frame on device return a
//! [`LifecycleFuture`]. The transition driver polls the transition once per
//! frame tick, so every `.await` on one of these futures is a point where the
//! frame loop keeps running.
//!
//! ```text
//! TrackingCapability::initialize()   ──> LifecycleFuture<Result<(), CapabilityUnavailable>>
//! SceneHost::load_additive(name)     ──> LifecycleFuture<Result<SceneId, SceneHostError>>
//! SceneHost::load_single(name)       ──> LifecycleFuture<Result<SceneId, SceneHostError>>
//! frame::settle_frames(n)            ──> n frame ticks
//! ```

/// Frame-yield futures used to wait whole frame ticks inside a transition.
pub mod frame;

/// Scene host and typed scene registry queries.
pub mod scene_host;

use std::future::Future;
use std::pin::Pin;

use bevy::prelude::*;
use thiserror::Error;

pub use scene_host::{ObjectId, SceneHost, SceneHostError, SceneId, SceneRegistry, SingletonKind};

/// Boxed, non-`Send` future returned by collaborator operations that suspend.
pub type LifecycleFuture<'a, T> = Pin<Box<dyn Future<Output = T> + 'a>>;

/// Position and orientation reported by the hit test, relative to the origin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pose {
    pub position: Vec3,
    pub rotation: Quat,
}

impl Pose {
    pub const IDENTITY: Self = Self {
        position: Vec3::ZERO,
        rotation: Quat::IDENTITY,
    };

    pub fn new(position: Vec3, rotation: Quat) -> Self {
        Self { position, rotation }
    }

    pub fn from_translation(position: Vec3) -> Self {
        Self::new(position, Quat::IDENTITY)
    }

    /// Transform at this pose with unit scale.
    pub fn to_transform(self) -> Transform {
        Transform::from_translation(self.position).with_rotation(self.rotation)
    }
}

impl Default for Pose {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// State reported by the tracking capability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TrackingState {
    #[default]
    None,
    Initializing,
    Tracking,
    Paused,
}

/// The platform loader could not be created.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{reason}")]
pub struct CapabilityUnavailable {
    pub reason: String,
}

impl CapabilityUnavailable {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

/// Camera pose tracking and plane detection provided by the platform.
///
/// `stop` and `deinitialize` must tolerate repeated calls.
pub trait TrackingCapability {
    /// Create the platform loader. Suspends until the loader is ready or failed.
    fn initialize(&mut self) -> LifecycleFuture<'_, Result<(), CapabilityUnavailable>>;

    /// Start the subsystems of an initialized loader.
    fn start(&mut self);

    fn stop(&mut self);

    fn deinitialize(&mut self);

    fn current_state(&self) -> TrackingState;
}

/// Continuous surface raycast against detected planes.
pub trait SurfaceHitTest: Send + Sync {
    /// Cast from a screen point (pixels). Returns the nearest surface hit pose.
    fn raycast(&mut self, screen_point: Vec2) -> Option<Pose>;
}
