//! Interactive tools available while an AR session is running.
//!
//! ## Placement Tool
//! - **Input**: continuous hit test from the placement anchor, UI commands,
//!   and two-finger touch gestures
//! - **Purpose**: show where an object would land, place prefabs there and
//!   let the user scale and twist the placed object
//! - **Lifecycle**: placed objects are released whenever the session clears
//!   placement (restart, return to home, teardown)

/// Placement indicator, placed objects and gesture editing.
pub mod placement;
