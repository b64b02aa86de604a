use bevy::prelude::*;

use super::duplicates::{ResolveReport, resolve_duplicates};
use super::error::LifecycleError;
use super::state::{OriginHandle, SessionPhase, SessionState};
use super::LifecycleEvent;
use crate::engine::capability::frame::settle_frames;
use crate::engine::capability::{
    ObjectId, SceneHost, SceneId, SingletonKind, TrackingCapability, TrackingState,
};
use crate::engine::config::{LifecycleConfig, LoadMode};

/// Scene names and timing used by the transition controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransitionConfig {
    pub ar_scene: String,
    pub home_scene: String,
    pub load_mode: LoadMode,
    pub restart_settle_frames: u32,
}

impl From<&LifecycleConfig> for TransitionConfig {
    fn from(config: &LifecycleConfig) -> Self {
        Self {
            ar_scene: config.ar_scene.clone(),
            home_scene: config.home_scene.clone(),
            load_mode: config.load_mode,
            restart_settle_frames: config.restart_settle_frames,
        }
    }
}

/// Orchestrates the move between home (menu) mode and AR mode.
///
/// Owns the [`SessionState`] and the injected tracking and scene-host
/// collaborators. Notifications for other subsystems (placement clearing,
/// resource release, readiness) are queued and handed out by
/// [`drain_events`](Self::drain_events).
pub struct SceneTransitionController {
    config: TransitionConfig,
    session: SessionState,
    tracking: Box<dyn TrackingCapability>,
    scene_host: Box<dyn SceneHost>,
    events: Vec<LifecycleEvent>,
    last_resolution: Option<ResolveReport>,
}

impl SceneTransitionController {
    pub fn new(
        config: TransitionConfig,
        tracking: Box<dyn TrackingCapability>,
        scene_host: Box<dyn SceneHost>,
    ) -> Self {
        Self {
            config,
            session: SessionState::default(),
            tracking,
            scene_host,
            events: Vec::new(),
            last_resolution: None,
        }
    }

    pub fn config(&self) -> &TransitionConfig {
        &self.config
    }

    pub fn session(&self) -> &SessionState {
        &self.session
    }

    pub fn phase(&self) -> SessionPhase {
        self.session.phase()
    }

    pub fn scene_host(&self) -> &dyn SceneHost {
        self.scene_host.as_ref()
    }

    pub fn tracking(&self) -> &dyn TrackingCapability {
        self.tracking.as_ref()
    }

    /// Report of the duplicate resolution run by the last transition.
    pub fn last_resolution(&self) -> Option<&ResolveReport> {
        self.last_resolution.as_ref()
    }

    pub fn drain_events(&mut self) -> Vec<LifecycleEvent> {
        std::mem::take(&mut self.events)
    }

    /// Switch to AR mode, restarting the session if one is already running.
    ///
    /// On `CapabilityUnavailable` or `OriginNotFound` the AR scene stays loaded
    /// but inert and the phase is `Failed`; calling again retries from scratch.
    /// Whatever the outcome, the loaded scenes are left with exactly one
    /// enabled camera, audio listener and event system.
    pub async fn enter_ar_mode(&mut self) -> Result<OriginHandle, LifecycleError> {
        if self.session.phase().is_transitioning() {
            return Err(LifecycleError::TransitionInProgress);
        }
        let ar_scene = self.config.ar_scene.clone();
        self.validate_scene(&ar_scene)?;

        let previous = self.session.phase();
        self.session.set_phase(SessionPhase::Initializing);
        info!(
            "Entering AR mode from {:?} ({:?} load of '{}')",
            previous, self.config.load_mode, ar_scene
        );

        self.cleanup_existing_ar(previous).await;

        let loaded = match self.config.load_mode {
            LoadMode::Additive => self.scene_host.load_additive(&ar_scene).await,
            LoadMode::Single => self.scene_host.load_single(&ar_scene).await,
        };
        let scene = match loaded {
            Ok(scene) => scene,
            Err(err) => {
                // Home may still be hidden from a previous entry
                self.set_home_roots_active(true);
                return Err(self.fail(err.into()));
            }
        };

        self.set_home_roots_active(false);

        info!("Initializing AR subsystems...");
        if let Err(err) = self.tracking.initialize().await {
            return Err(self.fail(err.into()));
        }
        self.tracking.start();
        info!("AR subsystems started");

        self.resolve();
        let Some(origin) = self.canonical_origin(scene) else {
            self.tracking.stop();
            self.tracking.deinitialize();
            return Err(self.fail(LifecycleError::OriginNotFound { scene: ar_scene }));
        };

        let origin = OriginHandle(origin);
        self.session.mark_running(origin);
        self.events.push(LifecycleEvent::ArReady { origin });
        info!("AR session running with origin {}", origin.0);
        Ok(origin)
    }

    /// Stop tracking and go back to the home scene.
    ///
    /// Calling it again once `Stopped` is a no-op that touches no collaborator.
    pub async fn return_to_home(&mut self) -> Result<(), LifecycleError> {
        match self.session.phase() {
            phase if phase.is_transitioning() => {
                return Err(LifecycleError::TransitionInProgress);
            }
            SessionPhase::Stopped => {
                debug!("Already home, nothing to stop");
                return Ok(());
            }
            _ => {}
        }
        let home_scene = self.config.home_scene.clone();
        self.validate_scene(&home_scene)?;

        self.session.set_phase(SessionPhase::Stopping);
        info!("Unloading AR scene and stopping subsystems...");

        self.stop_tracking();
        self.events.push(LifecycleEvent::ClearPlacement);

        if let Err(err) = self.scene_host.load_single(&home_scene).await {
            return Err(self.fail(err.into()));
        }

        self.events.push(LifecycleEvent::ResourcesReleased);
        self.resolve();
        self.session.set_phase(SessionPhase::Stopped);
        self.events.push(LifecycleEvent::ArUnloaded);
        info!("Home scene '{}' loaded successfully", home_scene);
        Ok(())
    }

    /// Stop everything and forget the session, back to `Uninitialized`.
    pub fn teardown(&mut self) {
        info!("Tearing down AR session");
        self.stop_tracking();
        self.events.push(LifecycleEvent::ClearPlacement);
        self.events.push(LifecycleEvent::ResourcesReleased);
        self.session.reset();
    }

    async fn cleanup_existing_ar(&mut self, previous: SessionPhase) {
        let tracking_active = self.tracking.current_state() != TrackingState::None;
        if previous == SessionPhase::Running || tracking_active {
            info!("Cleaning up existing AR session...");
            self.stop_tracking();
            self.events.push(LifecycleEvent::ClearPlacement);
            settle_frames(self.config.restart_settle_frames).await;
        }

        // A stale additive AR scene would duplicate the origin rig
        if self.config.load_mode == LoadMode::Additive
            && self.scene_host.unload(&self.config.ar_scene)
        {
            debug!("Unloaded stale '{}' instance", self.config.ar_scene);
            self.events.push(LifecycleEvent::ClearPlacement);
        }
    }

    fn stop_tracking(&mut self) {
        self.tracking.stop();
        self.tracking.deinitialize();
    }

    fn set_home_roots_active(&mut self, active: bool) {
        let Some(home) = self.scene_host.scene_by_name(&self.config.home_scene) else {
            return;
        };
        for root in self.scene_host.root_objects_of(home) {
            self.scene_host.set_root_active(root, active);
        }
        debug!(
            "Set root objects of '{}' active: {}",
            self.config.home_scene, active
        );
    }

    fn resolve(&mut self) {
        self.last_resolution = Some(resolve_duplicates(self.scene_host.as_mut()));
    }

    /// The enabled tracking origin under the active roots of `scene`.
    fn canonical_origin(&self, scene: SceneId) -> Option<ObjectId> {
        let host = self.scene_host.as_ref();
        host.root_objects_of(scene)
            .into_iter()
            .filter(|root| host.is_root_active(*root))
            .flat_map(|root| host.singletons_under(root, SingletonKind::TrackingOrigin))
            .find(|origin| host.is_enabled(*origin))
    }

    fn validate_scene(&self, name: &str) -> Result<(), LifecycleError> {
        if name.is_empty() {
            error!("Scene name not set in configuration!");
            return Err(LifecycleError::SceneNotFound {
                name: String::new(),
            });
        }
        if !self.scene_host.contains_scene(name) {
            error!("Scene '{}' not found in build registry!", name);
            return Err(LifecycleError::SceneNotFound {
                name: name.to_string(),
            });
        }
        Ok(())
    }

    fn fail(&mut self, err: LifecycleError) -> LifecycleError {
        error!("AR transition failed: {}", err);
        self.resolve();
        self.session.mark_failed(err.clone());
        self.events.push(LifecycleEvent::Failed(err.clone()));
        err
    }
}
