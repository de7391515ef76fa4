//! Vantage Core
//!
//! Contains the viewer's per-frame systems:
//! - Keyboard input state and movement resolution
//! - Camera storage, binding and orientation sampling
//! - Desktop/VR mode switching
//! - Scene graph, world construction and the player avatar

pub mod camera;
pub mod error;
pub mod follow;
pub mod input;
pub mod math;
pub mod mode;
pub mod movement;
pub mod orientation;
pub mod player;
pub mod scene;
pub mod time;
pub mod viewer;
pub mod world;
pub mod xr;

pub use glam;

pub use camera::{Camera, CameraBinding, CameraHandle, CameraStore, FreeCamera, XrCamera};
pub use error::{CameraError, ModeError, PlayerError};
pub use follow::CameraFollow;
pub use input::{InputState, KeyBindings, MoveKey};
pub use mode::{Mode, ModeContext, ModeController, Transition};
pub use movement::{resolve, Movement, DEFAULT_MOVEMENT_SPEED};
pub use orientation::{OrientationSample, OrientationSampler};
pub use player::{Avatar, AvatarParts, AvatarPose, MeshPart, PlayerController, Skeleton};
pub use scene::{Aabb, Light, Mesh, MeshId, Primitive, Scene};
pub use time::FrameClock;
pub use viewer::{FrameReport, Viewer, ViewerOptions};
pub use world::{MeshSpec, World, WorldConfig};
pub use xr::{XrExperience, XrState};

/// Engine version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
