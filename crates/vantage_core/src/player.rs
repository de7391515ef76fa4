//! Player avatar and per-frame controller

use std::time::Duration;

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::camera::{CameraBinding, CameraStore};
use crate::error::PlayerError;
use crate::input::InputState;
use crate::mode::Mode;
use crate::movement::{self, Movement};
use crate::orientation::OrientationSampler;
use crate::scene::{Aabb, MeshId, Scene};

/// Meshes whose heights add up to the avatar height.
pub const HEIGHT_MESH_NAMES: [&str; 3] = ["Wolf3D_Head", "Wolf3D_Body", "Wolf3D_Outfit_Bottom"];

/// Meshes hidden from a first-person VR wearer.
pub const HEAD_MESH_NAMES: [&str; 4] = ["Wolf3D_Head", "EyeRight", "EyeLeft", "Wolf3D_Teeth"];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Skeleton {
    pub name: String,
    #[serde(default)]
    pub bones: Vec<String>,
}

/// A named mesh from an avatar asset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeshPart {
    pub name: String,
    pub bounds: Aabb,
}

impl MeshPart {
    pub fn new(name: impl Into<String>, bounds: Aabb) -> Self {
        Self {
            name: name.into(),
            bounds,
        }
    }
}

/// Everything the viewer needs from a loaded avatar asset.
#[derive(Debug, Clone, PartialEq)]
pub struct AvatarParts {
    pub source: String,
    pub meshes: Vec<MeshPart>,
    pub skeletons: Vec<Skeleton>,
}

/// The player's character: meshes in the scene plus derived measurements.
#[derive(Debug, Clone, PartialEq)]
pub struct Avatar {
    root: MeshId,
    meshes: Vec<MeshId>,
    skeleton: Option<Skeleton>,
    height: f32,
}

impl Avatar {
    /// Create the avatar's meshes in the scene. The first mesh is the root
    /// that carries the avatar transform.
    pub fn build(parts: AvatarParts, scene: &mut Scene, height_meshes: &[String]) -> Result<Self, PlayerError> {
        if parts.meshes.is_empty() {
            return Err(PlayerError::EmptyBundle(parts.source));
        }

        let mut height = 0.0;
        let mut meshes = Vec::with_capacity(parts.meshes.len());
        for part in &parts.meshes {
            if height_meshes.iter().any(|n| *n == part.name) {
                height += part.bounds.extent().y;
            }
            meshes.push(scene.create_mesh(part.name.clone(), part.bounds));
        }

        let skeleton = parts.skeletons.into_iter().next();
        tracing::info!(
            source = %parts.source,
            meshes = meshes.len(),
            skeleton = skeleton.as_ref().map(|s| s.name.as_str()),
            height,
            "avatar built"
        );

        Ok(Self {
            root: meshes[0],
            meshes,
            skeleton,
            height,
        })
    }

    /// Disable the named head meshes so a first-person wearer does not see
    /// them. Returns how many meshes were hidden.
    pub fn decapitate(&self, scene: &mut Scene, head_meshes: &[String]) -> usize {
        let mut hidden = 0;
        for &id in &self.meshes {
            let is_head = scene
                .mesh(id)
                .is_some_and(|m| head_meshes.iter().any(|n| *n == m.name));
            if is_head {
                scene.set_enabled(id, false);
                hidden += 1;
            }
        }
        tracing::debug!(hidden, "avatar head meshes disabled");
        hidden
    }

    pub fn root(&self) -> MeshId {
        self.root
    }

    pub fn meshes(&self) -> &[MeshId] {
        &self.meshes
    }

    pub fn skeleton(&self) -> Option<&Skeleton> {
        self.skeleton.as_ref()
    }

    pub fn height(&self) -> f32 {
        self.height
    }
}

/// Avatar position and facing, written to the root mesh every frame.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct AvatarPose {
    pub position: Vec3,
    pub yaw: f32,
}

/// Drives the avatar from keyboard input and the bound camera.
#[derive(Debug, Clone)]
pub struct PlayerController {
    input: InputState,
    pose: AvatarPose,
    speed: f32,
    normalize_frame_time: bool,
    sampler: OrientationSampler,
}

impl PlayerController {
    pub fn new(position: Vec3, speed: f32) -> Self {
        Self {
            input: InputState::new(),
            pose: AvatarPose { position, yaw: 0.0 },
            speed,
            normalize_frame_time: false,
            sampler: OrientationSampler,
        }
    }

    /// Scale the per-frame step by the measured frame time.
    pub fn with_frame_time_normalization(mut self, enabled: bool) -> Self {
        self.normalize_frame_time = enabled;
        self
    }

    pub fn input(&self) -> &InputState {
        &self.input
    }

    pub fn input_mut(&mut self) -> &mut InputState {
        &mut self.input
    }

    pub fn pose(&self) -> AvatarPose {
        self.pose
    }

    pub fn speed(&self) -> f32 {
        self.speed
    }

    /// Run one frame: sample the bound camera, move and turn the avatar and
    /// write the pose to its root mesh.
    pub fn update(
        &mut self,
        avatar: &Avatar,
        scene: &mut Scene,
        cameras: &CameraStore,
        binding: &CameraBinding,
        mode: Mode,
        dt: Duration,
    ) -> Movement {
        let orientation = self.sampler.sample_bound(binding, cameras, mode);
        let speed = if self.normalize_frame_time {
            movement::frame_scaled_speed(self.speed, dt.as_secs_f32())
        } else {
            self.speed
        };

        let movement = movement::resolve(&self.input, &orientation, speed);
        self.pose.yaw = movement.new_yaw;
        self.pose.position += movement.delta_position;

        scene.set_transform(avatar.root(), self.pose.position, Vec3::new(0.0, self.pose.yaw, 0.0));
        movement
    }
}
