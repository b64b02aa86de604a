//! Error types reported by the AR lifecycle.

use thiserror::Error;

use crate::engine::capability::{CapabilityUnavailable, SceneHostError};

/// Conditions reported by the transition and placement controllers.
///
/// None of these are fatal to the host application. Capability and scene-host
/// failures are converted at the controller boundary and leave the session in
/// a recoverable phase.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LifecycleError {
    // === Capability Errors ===
    /// The platform tracking loader could not be created. Retry is allowed.
    #[error("tracking capability unavailable: {reason}")]
    CapabilityUnavailable { reason: String },

    /// The AR scene loaded but contains no tracking origin.
    #[error("no tracking origin found in scene '{scene}'")]
    OriginNotFound { scene: String },

    // === Transition Errors ===
    /// Another transition is in flight; the request was rejected, not queued.
    #[error("a scene transition is already in progress")]
    TransitionInProgress,

    /// Scene name is empty or missing from the build registry.
    #[error("scene '{name}' not found in build registry")]
    SceneNotFound { name: String },

    /// The scene host failed while loading a registered scene.
    #[error("failed to load scene '{name}': {reason}")]
    SceneLoad { name: String, reason: String },

    // === Placement Errors ===
    /// Prefab selection outside the configured prefab set.
    #[error("prefab index {index} out of range (have {count})")]
    InvalidIndex { index: usize, count: usize },
}

impl From<CapabilityUnavailable> for LifecycleError {
    fn from(err: CapabilityUnavailable) -> Self {
        LifecycleError::CapabilityUnavailable { reason: err.reason }
    }
}

impl From<SceneHostError> for LifecycleError {
    fn from(err: SceneHostError) -> Self {
        match err {
            SceneHostError::UnknownScene(name) => LifecycleError::SceneNotFound { name },
            SceneHostError::LoadFailed { name, reason } => LifecycleError::SceneLoad { name, reason },
        }
    }
}

impl LifecycleError {
    /// Whether calling the same operation again may succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            LifecycleError::CapabilityUnavailable { .. }
                | LifecycleError::TransitionInProgress
                | LifecycleError::OriginNotFound { .. }
                | LifecycleError::SceneLoad { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_scene_maps_to_scene_not_found() {
        let err: LifecycleError = SceneHostError::UnknownScene("Lobby".into()).into();
        assert_eq!(err, LifecycleError::SceneNotFound { name: "Lobby".into() });
        assert!(!err.is_retryable());
    }

    #[test]
    fn capability_failure_is_retryable() {
        let err: LifecycleError = CapabilityUnavailable::new("no loader").into();
        assert!(err.is_retryable());
        assert_eq!(err.to_string(), "tracking capability unavailable: no loader");
    }
}
