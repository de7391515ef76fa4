use crate::camera::CameraHandle;
use crate::mode::Mode;
use thiserror::Error;

/// Errors raised by the camera store and binding.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CameraError {
    #[error("camera {0:?} is not registered")]
    UnknownHandle(CameraHandle),
}

/// Errors raised while switching between desktop and VR mode.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ModeError {
    #[error("transition from {from:?} to {to:?} is not supported")]
    UnsupportedTransition { from: Mode, to: Mode },

    #[error("no VR camera is available to bind")]
    MissingXrCamera,

    #[error(transparent)]
    Camera(#[from] CameraError),
}

/// Errors raised while building the player avatar.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PlayerError {
    #[error("avatar bundle '{0}' contains no meshes")]
    EmptyBundle(String),

    #[error("an avatar has already been spawned")]
    AlreadySpawned,
}
