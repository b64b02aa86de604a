//! AR scene lifecycle for a Bevy host.
//!
//! Decides when the platform tracking subsystem is initialized and torn down,
//! keeps singleton objects (cameras, audio listeners, event systems, tracking
//! origins) unique while scenes are swapped, and keeps placement state in step
//! with the session.

pub mod engine;
pub mod tools;
