//! Simulated collaborators for tests and the headless demo.
//!
//! Stand-ins for the platform tracking loader, the surface hit test and the
//! engine scene manager. They record the calls they receive and can be told to
//! fail, which is how the failure paths of the lifecycle are exercised.

/// Scripted per-frame surface hits.
pub mod hit_test;

/// In-memory scene host with build registry, load order and singleton flags.
pub mod scene_host;

/// Tracking loader with switchable availability.
pub mod tracking;

pub use hit_test::ScriptedHitTest;
pub use scene_host::{
    LoadFailures, RootTemplate, SceneHostCall, SceneTemplate, SimulatedSceneHost,
};
pub use tracking::{SimulatedTracking, TrackingCall};
