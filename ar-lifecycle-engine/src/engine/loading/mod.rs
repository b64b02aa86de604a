//! Startup loading of the lifecycle configuration.
//!
//! Drives the `Loading` app state: the configuration asset is requested,
//! published as a resource once parsed, and the lifecycle controller is
//! installed from it before the app moves to `Ready`.

/// Configuration asset loading with a fallback to built-in defaults.
///
/// Falls back to [`LifecycleConfig::default`](crate::engine::config::LifecycleConfig)
/// when the file is missing or malformed, so startup never stalls.
pub mod config_loader;

/// Loading progress tracking resource for state transitions.
pub mod progress;
