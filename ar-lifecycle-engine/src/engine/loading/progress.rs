use bevy::prelude::*;
#[derive(Resource, Default)]
pub struct LoadingProgress {
    pub config_loaded: bool,
    pub lifecycle_installed: bool,
}
