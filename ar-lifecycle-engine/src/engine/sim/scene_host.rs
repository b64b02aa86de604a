use std::cell::RefCell;
use std::collections::{BTreeMap, HashSet};
use std::rc::Rc;

use bevy::prelude::*;

use constants::scene::INFO_SCENES;

use crate::engine::capability::frame::settle_frames;
use crate::engine::capability::{
    LifecycleFuture, ObjectId, SceneHost, SceneHostError, SceneId, SceneRegistry, SingletonKind,
};

/// Root object declared by a scene template, with the singleton components
/// found in its hierarchy.
#[derive(Debug, Clone)]
pub struct RootTemplate {
    pub name: String,
    pub singletons: Vec<SingletonKind>,
}

impl RootTemplate {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            singletons: Vec::new(),
        }
    }

    pub fn with(mut self, kind: SingletonKind) -> Self {
        self.singletons.push(kind);
        self
    }

    /// Origin rig carrying every singleton kind: origin, camera, listener, event system.
    pub fn full_rig(name: impl Into<String>) -> Self {
        Self::new(name)
            .with(SingletonKind::TrackingOrigin)
            .with(SingletonKind::Camera)
            .with(SingletonKind::AudioListener)
            .with(SingletonKind::EventSystem)
    }

    /// Menu root: camera, listener and event system, no origin.
    pub fn menu_rig(name: impl Into<String>) -> Self {
        Self::new(name)
            .with(SingletonKind::Camera)
            .with(SingletonKind::AudioListener)
            .with(SingletonKind::EventSystem)
    }
}

/// Scene as compiled into the build.
#[derive(Debug, Clone)]
pub struct SceneTemplate {
    pub name: String,
    pub roots: Vec<RootTemplate>,
}

impl SceneTemplate {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            roots: Vec::new(),
        }
    }

    pub fn with_root(mut self, root: RootTemplate) -> Self {
        self.roots.push(root);
        self
    }
}

/// Scene names whose loads fail.
///
/// Clones share the set, so a test can keep one after the host has been boxed
/// into the controller and make later loads fail.
#[derive(Debug, Clone, Default)]
pub struct LoadFailures(Rc<RefCell<HashSet<String>>>);

impl LoadFailures {
    pub fn fail(&self, name: impl Into<String>) {
        self.0.borrow_mut().insert(name.into());
    }

    pub fn recover(&self, name: &str) {
        self.0.borrow_mut().remove(name);
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.borrow().contains(name)
    }
}

/// Calls recorded by the simulated host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SceneHostCall {
    LoadAdditive(String),
    LoadSingle(String),
    Unload(String),
}

#[derive(Debug)]
struct SimRoot {
    id: ObjectId,
    active: bool,
    members: Vec<(SingletonKind, ObjectId)>,
}

#[derive(Debug)]
struct SimScene {
    id: SceneId,
    name: String,
    roots: Vec<SimRoot>,
}

/// In-memory scene host.
///
/// Every load instantiates fresh object ids, so reloading a scene yields new
/// cameras and a new tracking origin, as the engine does on device.
#[derive(Debug)]
pub struct SimulatedSceneHost {
    templates: Vec<SceneTemplate>,
    loaded: Vec<SimScene>,
    enabled: BTreeMap<ObjectId, bool>,
    failing: LoadFailures,
    load_frames: u32,
    next_scene: u32,
    next_object: u64,
    calls: Vec<SceneHostCall>,
}

impl SimulatedSceneHost {
    pub fn new(templates: Vec<SceneTemplate>) -> Self {
        Self {
            templates,
            loaded: Vec::new(),
            enabled: BTreeMap::new(),
            failing: LoadFailures::default(),
            load_frames: constants::session::SIMULATED_LOAD_FRAMES,
            next_scene: 0,
            next_object: 0,
            calls: Vec::new(),
        }
    }

    /// Home menu plus AR scene, each carrying its own camera rig. The layout
    /// that duplicates singletons when the AR scene is loaded additively.
    pub fn menu_and_ar(home: &str, ar: &str) -> Self {
        Self::new(vec![
            SceneTemplate::new(home)
                .with_root(RootTemplate::menu_rig("Main Camera"))
                .with_root(RootTemplate::new("Canvas")),
            SceneTemplate::new(ar)
                .with_root(RootTemplate::full_rig("XR Origin"))
                .with_root(RootTemplate::new("AR Session"))
                .with_root(RootTemplate::new("Placement Indicator")),
        ])
    }

    /// [`Self::menu_and_ar`] plus the info pages reachable from the menu.
    pub fn demo_build(home: &str, ar: &str) -> Self {
        let mut host = Self::menu_and_ar(home, ar);
        host.templates.extend(
            INFO_SCENES
                .iter()
                .map(|name| SceneTemplate::new(*name).with_root(RootTemplate::menu_rig("Main Camera"))),
        );
        host
    }

    /// Frame ticks each load stays pending.
    pub fn set_load_frames(&mut self, frames: u32) {
        self.load_frames = frames;
    }

    /// Make loads of `name` fail with [`SceneHostError::LoadFailed`].
    pub fn fail_loads_of(&mut self, name: impl Into<String>) {
        self.failing.fail(name);
    }

    /// Shared handle to the failing scene set.
    pub fn load_failures(&self) -> LoadFailures {
        self.failing.clone()
    }

    pub fn calls(&self) -> &[SceneHostCall] {
        &self.calls
    }

    pub fn loaded_scene_names(&self) -> Vec<String> {
        self.loaded.iter().map(|s| s.name.clone()).collect()
    }

    fn instantiate(&mut self, name: &str, single: bool) -> Result<SceneId, SceneHostError> {
        if self.failing.contains(name) {
            return Err(SceneHostError::LoadFailed {
                name: name.to_string(),
                reason: "simulated load failure".to_string(),
            });
        }
        let Some(template) = self.templates.iter().find(|t| t.name == name).cloned() else {
            return Err(SceneHostError::UnknownScene(name.to_string()));
        };

        if single {
            for scene in self.loaded.drain(..) {
                for root in scene.roots {
                    for (_, object) in root.members {
                        self.enabled.remove(&object);
                    }
                }
            }
        }

        let id = SceneId(self.next_scene);
        self.next_scene += 1;

        let mut roots = Vec::with_capacity(template.roots.len());
        for root in &template.roots {
            let root_id = self.allocate_object();
            let members = root
                .singletons
                .iter()
                .map(|kind| {
                    let object = self.allocate_object();
                    self.enabled.insert(object, true);
                    (*kind, object)
                })
                .collect();
            roots.push(SimRoot {
                id: root_id,
                active: true,
                members,
            });
        }

        debug!("Simulated host loaded '{}' as {}", name, id);
        self.loaded.push(SimScene {
            id,
            name: template.name,
            roots,
        });
        Ok(id)
    }

    fn allocate_object(&mut self) -> ObjectId {
        let id = ObjectId(self.next_object);
        self.next_object += 1;
        id
    }

    fn root(&self, root: ObjectId) -> Option<&SimRoot> {
        self.loaded
            .iter()
            .flat_map(|s| s.roots.iter())
            .find(|r| r.id == root)
    }
}

impl SceneRegistry for SimulatedSceneHost {
    fn loaded_scenes(&self) -> Vec<SceneId> {
        self.loaded.iter().map(|s| s.id).collect()
    }

    fn scene_name(&self, scene: SceneId) -> Option<String> {
        self.loaded
            .iter()
            .find(|s| s.id == scene)
            .map(|s| s.name.clone())
    }

    fn root_objects_of(&self, scene: SceneId) -> Vec<ObjectId> {
        self.loaded
            .iter()
            .find(|s| s.id == scene)
            .map(|s| s.roots.iter().map(|r| r.id).collect())
            .unwrap_or_default()
    }

    fn is_root_active(&self, root: ObjectId) -> bool {
        self.root(root).is_some_and(|r| r.active)
    }

    fn set_root_active(&mut self, root: ObjectId, active: bool) {
        if let Some(r) = self
            .loaded
            .iter_mut()
            .flat_map(|s| s.roots.iter_mut())
            .find(|r| r.id == root)
        {
            r.active = active;
        }
    }

    fn singletons_under(&self, root: ObjectId, kind: SingletonKind) -> Vec<ObjectId> {
        self.root(root)
            .map(|r| {
                r.members
                    .iter()
                    .filter(|(k, _)| *k == kind)
                    .map(|(_, o)| *o)
                    .collect()
            })
            .unwrap_or_default()
    }

    fn is_enabled(&self, object: ObjectId) -> bool {
        self.enabled.get(&object).copied().unwrap_or(false)
    }

    fn set_enabled(&mut self, object: ObjectId, enabled: bool) {
        if let Some(flag) = self.enabled.get_mut(&object) {
            *flag = enabled;
        }
    }
}

impl SceneHost for SimulatedSceneHost {
    fn contains_scene(&self, name: &str) -> bool {
        self.templates.iter().any(|t| t.name == name)
    }

    fn load_additive(&mut self, name: &str) -> LifecycleFuture<'_, Result<SceneId, SceneHostError>> {
        let name = name.to_string();
        Box::pin(async move {
            self.calls.push(SceneHostCall::LoadAdditive(name.clone()));
            settle_frames(self.load_frames).await;
            self.instantiate(&name, false)
        })
    }

    fn load_single(&mut self, name: &str) -> LifecycleFuture<'_, Result<SceneId, SceneHostError>> {
        let name = name.to_string();
        Box::pin(async move {
            self.calls.push(SceneHostCall::LoadSingle(name.clone()));
            settle_frames(self.load_frames).await;
            self.instantiate(&name, true)
        })
    }

    fn unload(&mut self, name: &str) -> bool {
        self.calls.push(SceneHostCall::Unload(name.to_string()));
        let before = self.loaded.len();
        let (removed, kept): (Vec<_>, Vec<_>) =
            self.loaded.drain(..).partition(|s| s.name == name);
        self.loaded = kept;
        for scene in removed {
            for root in scene.roots {
                for (_, object) in root.members {
                    self.enabled.remove(&object);
                }
            }
        }
        self.loaded.len() != before
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bevy::tasks::block_on;

    #[test]
    fn single_load_replaces_everything() {
        let mut host = SimulatedSceneHost::menu_and_ar("Home", "AR");
        block_on(host.load_single("Home")).unwrap();
        block_on(host.load_additive("AR")).unwrap();
        assert_eq!(host.loaded_scene_names(), vec!["Home", "AR"]);

        block_on(host.load_single("Home")).unwrap();
        assert_eq!(host.loaded_scene_names(), vec!["Home"]);
        assert_eq!(host.enabled_count(SingletonKind::Camera), 1);
    }

    #[test]
    fn reload_allocates_new_objects() {
        let mut host = SimulatedSceneHost::menu_and_ar("Home", "AR");
        let first = block_on(host.load_single("AR")).unwrap();
        let first_roots = host.root_objects_of(first);
        let second = block_on(host.load_single("AR")).unwrap();

        assert_ne!(first, second);
        assert_ne!(first_roots, host.root_objects_of(second));
    }

    #[test]
    fn unknown_and_failing_scenes_error() {
        let mut host = SimulatedSceneHost::menu_and_ar("Home", "AR");
        host.fail_loads_of("AR");
        assert!(matches!(
            block_on(host.load_additive("Lobby")),
            Err(SceneHostError::UnknownScene(_))
        ));
        assert!(matches!(
            block_on(host.load_additive("AR")),
            Err(SceneHostError::LoadFailed { .. })
        ));
        assert!(host.loaded_scenes().is_empty());
    }

    #[test]
    fn load_failures_handle_outlives_boxing() {
        let host = SimulatedSceneHost::menu_and_ar("Home", "AR");
        let failures = host.load_failures();
        let mut boxed: Box<dyn SceneHost> = Box::new(host);
        block_on(boxed.load_single("AR")).unwrap();

        failures.fail("AR");
        assert!(block_on(boxed.load_single("AR")).is_err());
        failures.recover("AR");
        assert!(block_on(boxed.load_single("AR")).is_ok());
    }

    #[test]
    fn demo_build_registers_info_pages() {
        let mut host = SimulatedSceneHost::demo_build("Home", "AR");
        for name in INFO_SCENES {
            assert!(host.contains_scene(name), "{}", name);
        }
        block_on(host.load_single("AboutUS")).unwrap();
        assert_eq!(host.loaded_scene_names(), vec!["AboutUS"]);
        assert_eq!(host.enabled_count(SingletonKind::Camera), 1);
    }

    #[test]
    fn unload_drops_matching_scenes_only() {
        let mut host = SimulatedSceneHost::menu_and_ar("Home", "AR");
        block_on(host.load_single("Home")).unwrap();
        block_on(host.load_additive("AR")).unwrap();

        assert!(host.unload("AR"));
        assert!(!host.unload("AR"));
        assert_eq!(host.loaded_scene_names(), vec!["Home"]);
    }
}
