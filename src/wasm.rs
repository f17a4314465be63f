//! Browser entry points.

use crate::config::RetargetConfig;
use crate::retarget::retarget;
use crate::scene::Scene;
use wasm_bindgen::prelude::*;

fn to_js(err: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&err.to_string())
}

/// Install the panic hook and route `log` to the browser console.
#[wasm_bindgen]
pub fn init() {
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Info).ok();
}

/// Convert a scene given as JSON. An empty config string means defaults.
/// Returns the converted scene as JSON.
#[wasm_bindgen]
pub fn convert_scene_json(scene_json: &str, config_json: &str) -> Result<String, JsValue> {
    let mut scene = Scene::from_json(scene_json).map_err(to_js)?;
    let config = if config_json.trim().is_empty() {
        RetargetConfig::default()
    } else {
        RetargetConfig::from_json(config_json).map_err(to_js)?
    };

    retarget(&mut scene, &config).map_err(to_js)?;
    scene.to_json_string().map_err(to_js)
}

/// Convert a scene given as a JS object. `undefined`/`null` config means
/// defaults.
#[wasm_bindgen]
pub fn convert_scene(scene: JsValue, config: JsValue) -> Result<JsValue, JsValue> {
    let mut scene: Scene = serde_wasm_bindgen::from_value(scene).map_err(to_js)?;
    let config: RetargetConfig = if config.is_undefined() || config.is_null() {
        RetargetConfig::default()
    } else {
        serde_wasm_bindgen::from_value(config).map_err(to_js)?
    };

    let statuses = retarget(&mut scene, &config).map_err(to_js)?;
    log::info!("{} stages completed", statuses.len());
    serde_wasm_bindgen::to_value(&scene).map_err(to_js)
}
