// build.rs
use std::{env, fs, path::PathBuf};

use constants::placement::DEFAULT_PLACEMENT_ANCHOR;
use constants::scene::{DEFAULT_AR_SCENE, DEFAULT_HOME_SCENE, INFO_SCENES, LIFECYCLE_CONFIG_PATH};
use constants::session::RESTART_SETTLE_FRAMES;

fn main() {
    println!("cargo:rerun-if-changed=build.rs");

    let manifest_dir = PathBuf::from(env::var("CARGO_MANIFEST_DIR").unwrap());
    let assets_dir = manifest_dir.join("assets");
    let config_path = assets_dir.join(LIFECYCLE_CONFIG_PATH);
    println!("cargo:rerun-if-changed={}", config_path.display());

    // Never overwrite a hand-edited configuration
    if config_path.exists() {
        return;
    }
    fs::create_dir_all(&assets_dir).ok(); // Create assets dir if it doesn't exist

    let default_config = serde_json::json!({
        "ar_scene": DEFAULT_AR_SCENE,
        "home_scene": DEFAULT_HOME_SCENE,
        "load_mode": "additive",
        "restart_settle_frames": RESTART_SETTLE_FRAMES,
        "prefabs": ["Chair", "Table", "Lamp"],
        "allow_multiple_objects": false,
        "reposition_on_reselect": false,
        "place_on_select": false,
        "placement_anchor": [DEFAULT_PLACEMENT_ANCHOR.x, DEFAULT_PLACEMENT_ANCHOR.y],
    });

    let json_content = serde_json::to_string_pretty(&default_config).unwrap();
    fs::write(&config_path, &json_content).expect("Failed to write lifecycle config to assets");

    println!(
        "cargo:warning=Generated default assets/{} (scenes: {}, {}, {})",
        LIFECYCLE_CONFIG_PATH,
        DEFAULT_HOME_SCENE,
        DEFAULT_AR_SCENE,
        INFO_SCENES.join(", ")
    );
}
