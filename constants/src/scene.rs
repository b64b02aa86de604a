/// Logical name of the AR scene in the build registry.
pub const DEFAULT_AR_SCENE: &str = "ARMode";

/// Logical name of the home (main menu) scene in the build registry.
pub const DEFAULT_HOME_SCENE: &str = "MainMenuScene";

/// Info pages reachable from the home menu, compiled into the demo build after
/// the home and AR scenes.
pub const INFO_SCENES: &[&str] = &["AboutUS", "TechStuff"];

/// Relative path (under the asset root) of the lifecycle configuration file.
pub const LIFECYCLE_CONFIG_PATH: &str = "lifecycle.config.json";
