use bevy::prelude::*;
use constants::scene::LIFECYCLE_CONFIG_PATH;

use crate::engine::config::LifecycleConfig;
use crate::engine::loading::progress::LoadingProgress;

#[derive(Resource, Default)]
pub struct ConfigLoader {
    handle: Option<Handle<LifecycleConfig>>,
}

// Start the loading process
pub fn start_config_loading(mut loader: ResMut<ConfigLoader>, asset_server: Res<AssetServer>) {
    info!("Loading lifecycle configuration from: {}", LIFECYCLE_CONFIG_PATH);
    loader.handle = Some(asset_server.load(LIFECYCLE_CONFIG_PATH));
}

// Publish the configuration as a resource once the asset is available
pub fn apply_loaded_config(
    mut loading_progress: ResMut<LoadingProgress>,
    loader: Res<ConfigLoader>,
    configs: Res<Assets<LifecycleConfig>>,
    asset_server: Res<AssetServer>,
    mut commands: Commands,
) {
    if loading_progress.config_loaded {
        return;
    }
    let Some(ref handle) = loader.handle else {
        return;
    };

    if let Some(config) = configs.get(handle) {
        info!(
            "✓ Configuration loaded (AR scene '{}', home scene '{}', {:?} load)",
            config.ar_scene, config.home_scene, config.load_mode
        );
        commands.insert_resource(config.clone());
        loading_progress.config_loaded = true;
        return;
    }

    // A missing or malformed file falls back to defaults instead of stalling
    if asset_server.load_state(handle).is_failed() {
        warn!(
            "Could not load {}; continuing with default configuration",
            LIFECYCLE_CONFIG_PATH
        );
        commands.insert_resource(LifecycleConfig::default());
        loading_progress.config_loaded = true;
    }
}
