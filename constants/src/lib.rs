//! Shared defaults for the AR lifecycle engine and its build script.

pub mod placement;
pub mod scene;
pub mod session;
