use std::time::Duration;

use bevy::app::ScheduleRunnerPlugin;
use bevy::asset::AssetMetaCheck;
use bevy::log::LogPlugin;
use bevy::prelude::*;
use bevy::state::app::StatesPlugin;
use bevy::tasks::block_on;
use bevy_common_assets::json::JsonAssetPlugin;

// Crate engine modules
use crate::engine::capability::{Pose, SceneHost, SurfaceHitTest, TrackingCapability};
use crate::engine::config::LifecycleConfig;
use crate::engine::core::app_state::{AppState, transition_to_ready};
use crate::engine::core::ui_script::{UiScript, report_lifecycle_events, run_ui_script};
use crate::engine::loading::config_loader::{
    ConfigLoader, apply_loaded_config, start_config_loading,
};
use crate::engine::loading::progress::LoadingProgress;
use crate::engine::session::driver::handle_transition_requests;
use crate::engine::session::{
    SceneTransitionController, SessionPlugin, TransitionConfig, TransitionDriver,
};
use crate::engine::sim::{ScriptedHitTest, SimulatedSceneHost, SimulatedTracking};
// Crate tools modules
use crate::tools::placement::{HitTestSource, PlacementController, PlacementPlugin};

const FRAME_INTERVAL: Duration = Duration::from_millis(16);

pub fn create_app() -> App {
    let mut app = App::new();

    app.add_plugins(create_headless_plugins())
        .add_plugins(StatesPlugin)
        .init_state::<AppState>()
        // Registers LifecycleConfig as a loadable asset type from JSON files.
        .add_plugins(JsonAssetPlugin::<LifecycleConfig>::new(&["config.json"]))
        .add_plugins(SessionPlugin)
        .add_plugins(PlacementPlugin);

    // Initialise resources early
    app.init_resource::<LoadingProgress>()
        .init_resource::<ConfigLoader>()
        .insert_resource(UiScript::demo());

    // State-based system scheduling
    app.add_systems(Startup, start_config_loading)
        .add_systems(
            Update,
            (
                // Loading phase systems
                apply_loaded_config,
                install_simulated_lifecycle,
                transition_to_ready,
            )
                .chain()
                .run_if(in_state(AppState::Loading)),
        )
        .add_systems(
            Update,
            (
                // Button presses land before the lifecycle systems read them
                run_ui_script.before(handle_transition_requests),
                report_lifecycle_events,
            )
                .run_if(in_state(AppState::Ready)),
        );

    app
}

fn create_headless_plugins() -> impl PluginGroup {
    MinimalPlugins
        .set(ScheduleRunnerPlugin::run_loop(FRAME_INTERVAL))
        .add(LogPlugin::default())
        .add(AssetPlugin {
            meta_check: AssetMetaCheck::Never,
            ..default()
        })
}

/// Put the lifecycle into `world`, wired to the given collaborators.
///
/// Inserts the [`TransitionDriver`] (non-send), the [`PlacementController`]
/// and the [`HitTestSource`]. The home scene is expected to be loaded already,
/// as it is when the host app boots into its menu.
pub fn install_lifecycle(
    world: &mut World,
    config: &LifecycleConfig,
    tracking: Box<dyn TrackingCapability>,
    scene_host: Box<dyn SceneHost>,
    hit_test: Box<dyn SurfaceHitTest>,
) {
    let controller =
        SceneTransitionController::new(TransitionConfig::from(config), tracking, scene_host);
    world.insert_non_send_resource(TransitionDriver::new(controller));
    world.insert_resource(PlacementController::from_config(config));
    world.insert_resource(HitTestSource(hit_test));

    if let Some(mut progress) = world.get_resource_mut::<LoadingProgress>() {
        progress.lifecycle_installed = true;
    }
    info!("✓ AR lifecycle installed");
}

// Simulated collaborators for the headless demo
fn install_simulated_lifecycle(world: &mut World) {
    let installed = world
        .get_resource::<LoadingProgress>()
        .is_some_and(|progress| progress.lifecycle_installed);
    if installed {
        return;
    }
    let Some(config) = world.get_resource::<LifecycleConfig>().cloned() else {
        return;
    };

    let mut scene_host = SimulatedSceneHost::demo_build(&config.home_scene, &config.ar_scene);
    if let Err(err) = block_on(scene_host.load_single(&config.home_scene)) {
        error!("Failed to load home scene '{}': {}", config.home_scene, err);
    }

    // No plane on the first frame, then a floor 1.5m in front of the camera
    let hit_test =
        ScriptedHitTest::new([None, Some(Pose::from_translation(Vec3::new(0.0, -1.2, -1.5)))]);

    install_lifecycle(
        world,
        &config,
        Box::new(SimulatedTracking::new()),
        Box::new(scene_host),
        Box::new(hit_test),
    );
}
