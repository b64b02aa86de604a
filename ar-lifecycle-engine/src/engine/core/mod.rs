//! Core application setup and state management.
//!
//! Handles application lifecycle, plugin initialisation, installation of the
//! lifecycle collaborators and the scripted UI of the headless demo.

/// Application setup and plugin configuration for the Bevy engine.
///
/// Creates the headless app, loads the lifecycle configuration and installs
/// the transition driver and placement controller once it is available.
pub mod app_setup;

/// Application state machine and loading progress transitions.
pub mod app_state;

/// Scripted button presses standing in for the menu and AR UI.
pub mod ui_script;
