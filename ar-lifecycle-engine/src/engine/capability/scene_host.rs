use std::fmt;

use thiserror::Error;

use super::LifecycleFuture;

/// Handle of a loaded scene instance. A scene loaded twice gets two ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SceneId(pub u32);

/// Handle of an object inside a loaded scene (root or descendant).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectId(pub u64);

impl fmt::Display for SceneId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "scene#{}", self.0)
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "object#{}", self.0)
    }
}

/// Object classes that must have exactly one enabled instance across all
/// loaded scenes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SingletonKind {
    Camera,
    AudioListener,
    EventSystem,
    TrackingOrigin,
}

impl SingletonKind {
    /// Resolution order used by the duplicate resolver.
    pub const ALL: [SingletonKind; 4] = [
        SingletonKind::Camera,
        SingletonKind::AudioListener,
        SingletonKind::EventSystem,
        SingletonKind::TrackingOrigin,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Self::Camera => "camera",
            Self::AudioListener => "audio listener",
            Self::EventSystem => "event system",
            Self::TrackingOrigin => "tracking origin",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SceneHostError {
    #[error("scene '{0}' is not in the build registry")]
    UnknownScene(String),

    #[error("loading '{name}' failed: {reason}")]
    LoadFailed { name: String, reason: String },
}

/// Typed query surface over the scenes that are currently loaded.
///
/// Scene order is load order; root order is the order the scene declares its
/// roots in. An object counts as enabled only while its own flag is set and
/// its root is active.
pub trait SceneRegistry {
    fn loaded_scenes(&self) -> Vec<SceneId>;

    fn scene_name(&self, scene: SceneId) -> Option<String>;

    /// Most recently loaded instance of the named scene.
    fn scene_by_name(&self, name: &str) -> Option<SceneId> {
        self.loaded_scenes()
            .into_iter()
            .rev()
            .find(|scene| self.scene_name(*scene).as_deref() == Some(name))
    }

    fn root_objects_of(&self, scene: SceneId) -> Vec<ObjectId>;

    fn is_root_active(&self, root: ObjectId) -> bool;

    fn set_root_active(&mut self, root: ObjectId, active: bool);

    /// Singleton candidates of `kind` in the hierarchy under `root`, in
    /// hierarchy order.
    fn singletons_under(&self, root: ObjectId, kind: SingletonKind) -> Vec<ObjectId>;

    fn is_enabled(&self, object: ObjectId) -> bool;

    fn set_enabled(&mut self, object: ObjectId, enabled: bool);

    /// Number of effectively enabled `kind` instances across loaded scenes.
    fn enabled_count(&self, kind: SingletonKind) -> usize {
        self.loaded_scenes()
            .into_iter()
            .flat_map(|scene| self.root_objects_of(scene))
            .filter(|root| self.is_root_active(*root))
            .flat_map(|root| self.singletons_under(root, kind))
            .filter(|object| self.is_enabled(*object))
            .count()
    }
}

/// Scene loading, as provided by the host engine.
pub trait SceneHost: SceneRegistry {
    /// Whether the scene is part of the build (loadable at all).
    fn contains_scene(&self, name: &str) -> bool;

    /// Load on top of the scenes already loaded.
    fn load_additive(&mut self, name: &str) -> LifecycleFuture<'_, Result<SceneId, SceneHostError>>;

    /// Load replacing every loaded scene.
    fn load_single(&mut self, name: &str) -> LifecycleFuture<'_, Result<SceneId, SceneHostError>>;

    /// Unload every loaded instance of the named scene. Returns whether any
    /// instance was loaded.
    fn unload(&mut self, name: &str) -> bool;
}
