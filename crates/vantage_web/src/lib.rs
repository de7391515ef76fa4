//! Vantage Web Host
//!
//! Runs the viewer in the browser. The page fetches the settings and the
//! avatar manifest, checks `navigator.xr.isSessionSupported("immersive-vr")`
//! and forwards keyboard events, WebXR state changes, camera poses and
//! `requestAnimationFrame` ticks to an [`App`].

mod host;

pub use host::{HostError, WebHost};

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

/// Entry point, called when the WASM module loads.
#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    if let Err(err) = console_log::init_with_level(log::Level::Info) {
        web_error(&format!("failed to init logger: {err}"));
    }
    tracing::info!("Vantage web host v{}", vantage_core::VERSION);
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_namespace = console, js_name = error)]
    fn web_error(message: &str);
}

#[cfg(target_arch = "wasm32")]
fn to_js(err: HostError) -> JsValue {
    JsValue::from_str(&err.to_string())
}

/// The viewer as seen from JavaScript.
#[cfg(target_arch = "wasm32")]
#[wasm_bindgen]
pub struct App {
    host: WebHost,
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen]
impl App {
    pub fn on_key_down(&mut self, key: &str) -> bool {
        self.host.on_key(key, true)
    }

    pub fn on_key_up(&mut self, key: &str) -> bool {
        self.host.on_key(key, false)
    }

    /// WebXR state code from `onStateChangedObservable`.
    pub fn on_xr_state_changed(&mut self, state: u32) -> bool {
        self.host.on_xr_state(state)
    }

    pub fn set_camera_pose(&mut self, pose: &[f32]) -> Result<(), JsValue> {
        self.host.set_camera_pose(pose).map_err(to_js)
    }

    /// One frame, called from `requestAnimationFrame`.
    pub fn frame(&mut self, time: f64) {
        self.host.frame(time);
    }

    pub fn avatar_transform(&self) -> Vec<f32> {
        self.host.avatar_transform()
    }

    pub fn hidden_meshes(&self) -> Vec<String> {
        self.host.hidden_meshes()
    }

    pub fn is_vr(&self) -> bool {
        self.host.is_vr()
    }
}

/// Create the viewer once the page has fetched its inputs.
#[cfg(target_arch = "wasm32")]
#[wasm_bindgen]
pub async fn create_app(
    settings_json: Option<String>,
    manifest_json: Option<String>,
    xr_supported: bool,
) -> Result<App, JsValue> {
    let host = WebHost::new(settings_json.as_deref(), manifest_json.as_deref(), xr_supported).map_err(to_js)?;
    Ok(App { host })
}
