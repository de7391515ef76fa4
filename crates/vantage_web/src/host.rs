//! Browser-facing wrapper around the viewer.
//!
//! Everything the page hands over arrives as JSON text, numbers or flat
//! float arrays; this module turns those into viewer calls.

use thiserror::Error;

use vantage_asset::AssetBundle;
use vantage_core::glam::{Quat, Vec3};
use vantage_core::{Mode, PlayerError, Viewer, XrState};
use vantage_services::{Settings, SettingsError};

#[derive(Debug, Error)]
pub enum HostError {
    #[error(transparent)]
    Settings(#[from] SettingsError),

    #[error(transparent)]
    Player(#[from] PlayerError),

    #[error("camera pose needs 7 floats (position xyz, quaternion xyzw), got {0}")]
    PoseLength(usize),
}

pub struct WebHost {
    viewer: Viewer,
}

impl WebHost {
    /// Build the viewer from optional settings JSON and an optional avatar
    /// manifest. A missing or unreadable manifest leaves the viewer without
    /// a player.
    pub fn new(settings_json: Option<&str>, manifest_json: Option<&str>, xr_supported: bool) -> Result<Self, HostError> {
        let settings = match settings_json {
            Some(json) => Settings::from_json(json)?,
            None => Settings::default(),
        };

        let mut viewer = Viewer::new(settings.viewer_options(), &settings.world_config()?);
        let bundle = manifest_json.and_then(|json| {
            AssetBundle::from_json(&settings.avatar.file, json)
                .map_err(|err| tracing::error!(error = %err, "failed to load avatar"))
                .ok()
        });
        viewer.load_avatar(bundle.map(AssetBundle::into_parts))?;
        viewer.enable_xr(xr_supported);

        Ok(Self { viewer })
    }

    pub fn on_key(&mut self, key: &str, pressed: bool) -> bool {
        self.viewer.on_key(key, pressed).is_some()
    }

    /// Forward a WebXR state code. Returns true when the viewer switched
    /// modes.
    pub fn on_xr_state(&mut self, code: u32) -> bool {
        let Some(state) = XrState::from_code(code) else {
            tracing::warn!(code, "unknown xr state code");
            return false;
        };
        let before = self.viewer.mode();
        if let Err(err) = self.viewer.on_xr_state_changed(state) {
            tracing::warn!(error = %err, "xr state change rejected");
        }
        self.viewer.mode() != before
    }

    /// Apply `[px, py, pz, qx, qy, qz, qw]` to the bound camera.
    pub fn set_camera_pose(&mut self, pose: &[f32]) -> Result<(), HostError> {
        let &[px, py, pz, qx, qy, qz, qw] = pose else {
            return Err(HostError::PoseLength(pose.len()));
        };
        self.viewer
            .set_camera_pose(Vec3::new(px, py, pz), Quat::from_xyzw(qx, qy, qz, qw));
        Ok(())
    }

    pub fn frame(&mut self, time_ms: f64) {
        self.viewer.frame(time_ms);
    }

    /// Avatar root `[x, y, z, yaw]`, empty without an avatar.
    pub fn avatar_transform(&self) -> Vec<f32> {
        self.viewer
            .player_pose()
            .map(|p| vec![p.position.x, p.position.y, p.position.z, p.yaw])
            .unwrap_or_default()
    }

    /// Names of scene meshes the renderer should skip.
    pub fn hidden_meshes(&self) -> Vec<String> {
        self.viewer
            .scene()
            .meshes()
            .iter()
            .filter(|m| !m.enabled)
            .map(|m| m.name.clone())
            .collect()
    }

    pub fn is_vr(&self) -> bool {
        self.viewer.mode() == Mode::Vr
    }

    pub fn viewer(&self) -> &Viewer {
        &self.viewer
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vantage_core::Camera;

    const MANIFEST: &str = r#"{
        "source": "avatar.glb",
        "meshes": [
            { "name": "__root__", "bounds": { "min": [0, 0, 0], "max": [0, 0, 0] } },
            { "name": "Wolf3D_Head", "bounds": { "min": [0, 0, 0], "max": [0, 0.3, 0] } },
            { "name": "EyeLeft", "bounds": { "min": [0, 0, 0], "max": [0, 0.1, 0] } }
        ]
    }"#;

    #[test]
    fn broken_manifest_means_no_player() {
        let mut host = WebHost::new(None, Some("{"), false).unwrap();
        assert!(host.on_key("w", true));
        host.frame(0.0);
        assert!(host.avatar_transform().is_empty());
    }

    #[test]
    fn keys_and_frames_move_avatar() {
        let mut host = WebHost::new(None, Some(MANIFEST), false).unwrap();
        let start = host.avatar_transform();
        assert!(host.on_key("W", true));
        assert!(!host.on_key("x", true));
        host.frame(0.0);
        let after = host.avatar_transform();
        assert!((after[2] - start[2] - 0.2).abs() < 1e-5);
    }

    #[test]
    fn entering_vr_hides_head() {
        let mut host = WebHost::new(None, Some(MANIFEST), true).unwrap();
        assert!(!host.on_xr_state(0));
        assert!(host.on_xr_state(2));
        assert!(host.is_vr());
        assert_eq!(host.hidden_meshes(), vec!["Wolf3D_Head", "EyeLeft"]);
        assert!(!host.on_xr_state(3));
        assert!(host.is_vr());
    }

    #[test]
    fn camera_pose_needs_seven_floats() {
        let mut host = WebHost::new(None, None, false).unwrap();
        assert!(matches!(host.set_camera_pose(&[0.0; 3]), Err(HostError::PoseLength(3))));
        host.set_camera_pose(&[1.0, 2.0, 3.0, 0.0, 0.0, 0.0, 1.0]).unwrap();
        let camera = host.viewer().active_camera().unwrap();
        assert_eq!(camera.position(), Vec3::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn settings_json_is_applied() {
        let host = WebHost::new(Some(r#"{ "world": { "preset": "sample_with_sphere" } }"#), None, false).unwrap();
        assert_eq!(host.viewer().world().spawn_point(), Vec3::new(2.0, -5.0, 0.0));
        assert!(WebHost::new(Some(r#"{ "world": { "preset": "void" } }"#), None, false).is_err());
    }
}
