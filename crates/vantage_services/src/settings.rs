//! Settings management

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use vantage_core::follow::DEFAULT_XR_HEAD_OFFSET;
use vantage_core::player::{HEAD_MESH_NAMES, HEIGHT_MESH_NAMES};
use vantage_core::{KeyBindings, ViewerOptions, WorldConfig, DEFAULT_MOVEMENT_SPEED};

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read settings {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed settings: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("unknown world preset '{0}'")]
    UnknownWorld(String),
}

/// Viewer settings. Every field has a default, so a settings file only
/// needs the values it overrides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub player: PlayerSettings,
    pub keys: KeyBindings,
    pub avatar: AvatarSettings,
    pub world: WorldSettings,
    pub camera: CameraSettings,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerSettings {
    pub movement_speed: f32,
    /// Scale per-frame movement by measured frame time.
    pub normalize_frame_time: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AvatarSettings {
    pub directory: PathBuf,
    pub file: String,
    /// Meshes whose heights sum to the avatar height.
    pub height_meshes: Vec<String>,
    /// Meshes hidden in VR.
    pub head_meshes: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldSettings {
    pub preset: String,
    /// Inline world description; takes precedence over `preset`.
    pub config: Option<WorldConfig>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraSettings {
    pub follow: bool,
    pub xr_head_offset: f32,
}

impl Default for PlayerSettings {
    fn default() -> Self {
        Self {
            movement_speed: DEFAULT_MOVEMENT_SPEED,
            normalize_frame_time: false,
        }
    }
}

impl Default for AvatarSettings {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("./assets/models/"),
            file: "avatar.glb".to_string(),
            height_meshes: HEIGHT_MESH_NAMES.iter().map(|s| s.to_string()).collect(),
            head_meshes: HEAD_MESH_NAMES.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl Default for WorldSettings {
    fn default() -> Self {
        Self {
            preset: "sample".to_string(),
            config: None,
        }
    }
}

impl Default for CameraSettings {
    fn default() -> Self {
        Self {
            follow: false,
            xr_head_offset: DEFAULT_XR_HEAD_OFFSET,
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            player: PlayerSettings::default(),
            keys: KeyBindings::default(),
            avatar: AvatarSettings::default(),
            world: WorldSettings::default(),
            camera: CameraSettings::default(),
        }
    }
}

impl Settings {
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| SettingsError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let settings = Self::from_json(&json)?;
        tracing::info!(path = %path.display(), "settings loaded");
        Ok(settings)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), SettingsError> {
        let path = path.as_ref();
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json).map_err(|source| SettingsError::Io {
            path: path.to_path_buf(),
            source,
        })
    }

    /// The world to build: the inline description if present, else the
    /// named preset.
    pub fn world_config(&self) -> Result<WorldConfig, SettingsError> {
        if let Some(config) = &self.world.config {
            return Ok(config.clone());
        }
        WorldConfig::preset(&self.world.preset).ok_or_else(|| SettingsError::UnknownWorld(self.world.preset.clone()))
    }

    pub fn viewer_options(&self) -> ViewerOptions {
        ViewerOptions {
            movement_speed: self.player.movement_speed,
            key_bindings: self.keys.clone(),
            head_meshes: self.avatar.head_meshes.clone(),
            height_meshes: self.avatar.height_meshes.clone(),
            camera_follow: self.camera.follow,
            xr_head_offset: self.camera.xr_head_offset,
            normalize_frame_time: self.player.normalize_frame_time,
        }
    }
}
