use ar_lifecycle_engine::engine::capability::{Pose, SceneHost};
use ar_lifecycle_engine::engine::config::LifecycleConfig;
use ar_lifecycle_engine::engine::core::app_setup::install_lifecycle;
use ar_lifecycle_engine::engine::session::{
    LifecycleError, LifecycleEvent, SessionPhase, SessionPlugin, TransitionKind,
    TransitionRequest,
};
use ar_lifecycle_engine::engine::sim::{ScriptedHitTest, SimulatedSceneHost, SimulatedTracking};
use ar_lifecycle_engine::tools::placement::{
    PlacedEntity, PlacementCommand, PlacementController, PlacementPlugin,
};
use bevy::prelude::*;
use bevy::state::app::StatesPlugin;
use bevy::tasks::block_on;

#[derive(Resource, Default)]
struct Collected(Vec<LifecycleEvent>);

fn collect_lifecycle_events(
    mut events: EventReader<LifecycleEvent>,
    mut collected: ResMut<Collected>,
) {
    collected.0.extend(events.read().cloned());
}

fn test_app(tracking: &SimulatedTracking) -> App {
    let config = LifecycleConfig::default();
    let mut app = App::new();
    app.add_plugins((MinimalPlugins, StatesPlugin, SessionPlugin, PlacementPlugin))
        .init_resource::<Collected>()
        .add_systems(Last, collect_lifecycle_events);

    let mut host = SimulatedSceneHost::menu_and_ar(&config.home_scene, &config.ar_scene);
    block_on(host.load_single(&config.home_scene)).unwrap();
    install_lifecycle(
        app.world_mut(),
        &config,
        Box::new(tracking.clone()),
        Box::new(host),
        Box::new(ScriptedHitTest::always(Pose::from_translation(Vec3::new(
            0.0, -1.0, -2.0,
        )))),
    );
    app
}

fn phase(app: &App) -> SessionPhase {
    *app.world().resource::<State<SessionPhase>>().get()
}

fn update_until(app: &mut App, target: SessionPhase) {
    for _ in 0..30 {
        app.update();
        if phase(app) == target {
            return;
        }
    }
    panic!("session never reached {:?}, stuck in {:?}", target, phase(app));
}

fn placed_entities(app: &mut App) -> usize {
    let world = app.world_mut();
    let mut query = world.query::<&PlacedEntity>();
    query.iter(world).count()
}

#[test]
fn test_enter_request_reaches_running() {
    let tracking = SimulatedTracking::new();
    let mut app = test_app(&tracking);
    app.update();
    assert_eq!(phase(&app), SessionPhase::Uninitialized);

    app.world_mut().send_event(TransitionRequest::enter_ar());
    update_until(&mut app, SessionPhase::Running);

    let collected = &app.world().resource::<Collected>().0;
    assert!(
        collected
            .iter()
            .any(|event| matches!(event, LifecycleEvent::ArReady { .. }))
    );
}

#[test]
fn test_overlapping_request_is_rejected() {
    let tracking = SimulatedTracking::new();
    let mut app = test_app(&tracking);

    app.world_mut().send_event(TransitionRequest::enter_ar());
    app.world_mut().send_event(TransitionRequest::enter_ar());
    update_until(&mut app, SessionPhase::Running);

    let collected = &app.world().resource::<Collected>().0;
    let rejected: Vec<_> = collected
        .iter()
        .filter(|event| matches!(event, LifecycleEvent::Rejected { .. }))
        .collect();
    assert_eq!(
        rejected,
        vec![&LifecycleEvent::Rejected {
            kind: TransitionKind::EnterAr,
            error: LifecycleError::TransitionInProgress,
        }]
    );
    let ready = collected
        .iter()
        .filter(|event| matches!(event, LifecycleEvent::ArReady { .. }))
        .count();
    assert_eq!(ready, 1);
}

#[test]
fn test_placement_cleared_on_return_home() {
    let tracking = SimulatedTracking::new();
    let mut app = test_app(&tracking);
    app.world_mut().send_event(TransitionRequest::enter_ar());
    update_until(&mut app, SessionPhase::Running);

    app.world_mut().send_event(PlacementCommand::SelectPrefab(0));
    app.world_mut().send_event(PlacementCommand::Place);
    app.update();
    app.update();
    assert_eq!(placed_entities(&mut app), 1);

    app.world_mut().send_event(TransitionRequest::return_home());
    update_until(&mut app, SessionPhase::Stopped);
    app.update();

    assert!(
        app.world()
            .resource::<PlacementController>()
            .state()
            .placed_objects()
            .is_empty()
    );
    assert_eq!(placed_entities(&mut app), 0);
}

#[test]
fn test_capability_failure_reports_failed_phase() {
    let tracking = SimulatedTracking::unavailable();
    let mut app = test_app(&tracking);

    app.world_mut().send_event(TransitionRequest::enter_ar());
    update_until(&mut app, SessionPhase::Failed);

    let collected = &app.world().resource::<Collected>().0;
    assert!(collected.iter().any(|event| matches!(
        event,
        LifecycleEvent::Failed(LifecycleError::CapabilityUnavailable { .. })
    )));
}
