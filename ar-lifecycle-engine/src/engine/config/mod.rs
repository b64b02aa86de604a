//! Lifecycle configuration loaded from `assets/lifecycle.config.json`.
//!
//! Every field has a default from the `constants` crate, so a partial file
//! (or none, in tests) yields a working configuration.

use bevy::prelude::*;
use constants::placement::DEFAULT_PLACEMENT_ANCHOR;
use constants::scene::{DEFAULT_AR_SCENE, DEFAULT_HOME_SCENE};
use constants::session::RESTART_SETTLE_FRAMES;
use serde::{Deserialize, Serialize};

/// How the AR scene is composed with the scenes already loaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LoadMode {
    /// Load on top of the home scene, hiding its UI roots.
    #[default]
    Additive,
    /// Replace every loaded scene.
    Single,
}

#[derive(Asset, TypePath, Resource, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LifecycleConfig {
    pub ar_scene: String,
    pub home_scene: String,
    pub load_mode: LoadMode,
    /// Frame ticks to wait between stopping tracking and initializing it again.
    pub restart_settle_frames: u32,
    /// Prefab names offered for placement, in selection order.
    pub prefabs: Vec<String>,
    pub allow_multiple_objects: bool,
    /// Initial value of the "reposition on reselect" toggle.
    pub reposition_on_reselect: bool,
    /// Attempt placement right after a prefab is selected.
    pub place_on_select: bool,
    /// Normalised viewport point the hit test is cast from.
    pub placement_anchor: [f32; 2],
}

impl Default for LifecycleConfig {
    fn default() -> Self {
        Self {
            ar_scene: DEFAULT_AR_SCENE.to_string(),
            home_scene: DEFAULT_HOME_SCENE.to_string(),
            load_mode: LoadMode::default(),
            restart_settle_frames: RESTART_SETTLE_FRAMES,
            prefabs: vec!["Chair".to_string(), "Table".to_string(), "Lamp".to_string()],
            allow_multiple_objects: false,
            reposition_on_reselect: false,
            place_on_select: false,
            placement_anchor: DEFAULT_PLACEMENT_ANCHOR.to_array(),
        }
    }
}

impl LifecycleConfig {
    pub fn from_json_str(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn anchor(&self) -> Vec2 {
        Vec2::from_array(self.placement_anchor)
    }
}
