//! Vantage Asset Loading
//!
//! Avatar assets are opaque model files (`avatar.glb`) described by a JSON
//! manifest stored next to them (`avatar.json`). The manifest lists the
//! meshes with their local bounds and the skeletons; that is all the viewer
//! needs to spawn and measure an avatar.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use vantage_core::player::{AvatarParts, MeshPart, Skeleton};

/// Extension of the manifest that describes a model file.
pub const MANIFEST_EXTENSION: &str = "json";

#[derive(Debug, Error)]
pub enum AssetError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed manifest {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("asset bundle {0} has no meshes")]
    Empty(PathBuf),
}

/// Contents of an avatar manifest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetBundle {
    /// Model file the manifest describes.
    pub source: String,
    pub meshes: Vec<MeshPart>,
    #[serde(default)]
    pub skeletons: Vec<Skeleton>,
}

impl AssetBundle {
    pub fn from_json(path: impl Into<PathBuf>, json: &str) -> Result<Self, AssetError> {
        let path = path.into();
        let bundle: AssetBundle = serde_json::from_str(json).map_err(|source| AssetError::Parse {
            path: path.clone(),
            source,
        })?;
        if bundle.meshes.is_empty() {
            return Err(AssetError::Empty(path));
        }
        Ok(bundle)
    }

    pub fn into_parts(self) -> AvatarParts {
        AvatarParts {
            source: self.source,
            meshes: self.meshes,
            skeletons: self.skeletons,
        }
    }
}

/// Manifest path for a model file: same directory, `.json` extension.
pub fn manifest_path(dir: impl AsRef<Path>, file: &str) -> PathBuf {
    dir.as_ref().join(file).with_extension(MANIFEST_EXTENSION)
}

/// Read and parse a manifest.
#[cfg(not(target_arch = "wasm32"))]
pub async fn load_bundle(path: impl AsRef<Path>) -> Result<AssetBundle, AssetError> {
    let path = path.as_ref();
    let json = tokio::fs::read_to_string(path).await.map_err(|source| AssetError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    AssetBundle::from_json(path, &json)
}

/// Load the avatar described next to `dir/file`. One attempt; a failure is
/// logged and yields `None`.
#[cfg(not(target_arch = "wasm32"))]
pub async fn load_avatar(dir: impl AsRef<Path>, file: &str) -> Option<AssetBundle> {
    let path = manifest_path(dir, file);
    match load_bundle(&path).await {
        Ok(bundle) => {
            tracing::info!(path = %path.display(), meshes = bundle.meshes.len(), "avatar loaded");
            Some(bundle)
        }
        Err(err) => {
            tracing::error!(error = %err, "failed to load avatar");
            None
        }
    }
}
