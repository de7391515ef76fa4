//! Per-frame camera orientation sampling

use glam::Vec3;

use crate::camera::{Camera, CameraBinding, CameraStore};
use crate::math;
use crate::mode::Mode;

/// Camera yaw and world-space basis vectors for one frame.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct OrientationSample {
    pub yaw: f32,
    pub forward: Vec3,
    pub right: Vec3,
}

impl OrientationSample {
    pub const ZERO: Self = Self {
        yaw: 0.0,
        forward: Vec3::ZERO,
        right: Vec3::ZERO,
    };
}

/// Reads the bound camera's orientation each frame.
#[derive(Debug, Default, Clone, Copy)]
pub struct OrientationSampler;

impl OrientationSampler {
    /// Sample whichever camera the binding currently names.
    pub fn sample_bound(&self, binding: &CameraBinding, cameras: &CameraStore, mode: Mode) -> OrientationSample {
        self.sample(binding.resolve(cameras), mode)
    }

    /// Sample a camera; no camera yields [`OrientationSample::ZERO`].
    ///
    /// In VR the yaw comes from the pose quaternion, on the desktop from the
    /// Euler rotation. A VR-mode camera without a quaternion falls back to its
    /// Euler rotation.
    pub fn sample(&self, camera: Option<&dyn Camera>, mode: Mode) -> OrientationSample {
        let Some(camera) = camera else {
            return OrientationSample::ZERO;
        };

        let yaw = match (mode, camera.rotation_quaternion()) {
            (Mode::Vr, Some(rotation)) => math::euler_from_quat(rotation).y,
            _ => camera.rotation().y,
        };

        OrientationSample {
            yaw,
            forward: camera.direction(math::FORWARD),
            right: camera.direction(math::RIGHT),
        }
    }
}
