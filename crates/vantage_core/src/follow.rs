//! Camera follow: keeps the bound camera at the avatar's eye height.

use glam::Vec3;

use crate::camera::{CameraBinding, CameraStore};
use crate::mode::Mode;
use crate::player::AvatarPose;

/// Default drop from the avatar's head to the headset camera in VR.
pub const DEFAULT_XR_HEAD_OFFSET: f32 = 0.9;

/// Keeps the bound camera at the avatar's eye height.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraFollow {
    pub xr_head_offset: f32,
}

impl Default for CameraFollow {
    fn default() -> Self {
        Self {
            xr_head_offset: DEFAULT_XR_HEAD_OFFSET,
        }
    }
}

impl CameraFollow {
    pub fn new(xr_head_offset: f32) -> Self {
        Self { xr_head_offset }
    }

    pub fn target(&self, pose: &AvatarPose, height: f32, mode: Mode) -> Vec3 {
        let mut target = pose.position + Vec3::new(0.0, height, 0.0);
        if mode == Mode::Vr {
            target.y -= self.xr_head_offset;
        }
        target
    }

    /// Move the bound camera to the follow target. Returns the new camera
    /// position, or `None` when nothing is bound.
    pub fn update(
        &self,
        pose: &AvatarPose,
        height: f32,
        cameras: &mut CameraStore,
        binding: &CameraBinding,
        mode: Mode,
    ) -> Option<Vec3> {
        let target = self.target(pose, height, mode);
        let camera = binding.resolve_mut(cameras)?;
        camera.set_position(target);
        Some(target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::camera::{Camera, FreeCamera};

    #[test]
    fn desktop_follows_at_avatar_height() {
        let mut cameras = CameraStore::new();
        let desk = cameras.insert(FreeCamera::new("desk", Vec3::ZERO));
        let binding = CameraBinding::new(desk);
        let pose = AvatarPose {
            position: Vec3::new(1.0, -3.2, 2.0),
            yaw: 0.0,
        };

        let position = CameraFollow::default()
            .update(&pose, 1.8, &mut cameras, &binding, Mode::Desktop)
            .unwrap();
        assert!((position - Vec3::new(1.0, -1.4, 2.0)).length() < 1e-5);
        assert_eq!(cameras.get(desk).unwrap().position(), position);
    }

    #[test]
    fn vr_drops_by_head_offset() {
        let pose = AvatarPose::default();
        let target = CameraFollow::default().target(&pose, 1.8, Mode::Vr);
        assert!((target.y - 0.9).abs() < 1e-5);
    }

    #[test]
    fn unbound_camera_is_skipped() {
        let mut cameras = CameraStore::new();
        let result = CameraFollow::default().update(
            &AvatarPose::default(),
            1.0,
            &mut cameras,
            &CameraBinding::unbound(),
            Mode::Desktop,
        );
        assert_eq!(result, None);
    }
}
