use bevy::prelude::*;

use crate::engine::loading::progress::LoadingProgress;

#[derive(Debug, Clone, Copy, Default, Eq, PartialEq, Hash, States)]
pub enum AppState {
    #[default]
    Loading,
    Ready,
}

// Leave Loading once the config is applied and the lifecycle is installed
pub fn transition_to_ready(
    loading_progress: Res<LoadingProgress>,
    mut next_state: ResMut<NextState<AppState>>,
) {
    if loading_progress.config_loaded && loading_progress.lifecycle_installed {
        println!("→ Lifecycle installed, transitioning to Ready state");
        next_state.set(AppState::Ready);
    }
}
