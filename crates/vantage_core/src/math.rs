//! Rotation conventions shared by cameras and meshes
//!
//! Re-exports glam with the viewer's Euler helpers. Euler rotations are
//! stored as `(pitch, yaw, roll)` in a `Vec3` and applied yaw first
//! (YXZ order). Local forward is +Z and local right is +X.

use std::f32::consts::PI;

pub use glam::*;

/// Local forward axis of cameras and meshes.
pub const FORWARD: Vec3 = Vec3::Z;

/// Local right axis of cameras and meshes.
pub const RIGHT: Vec3 = Vec3::X;

/// Build a quaternion from an Euler rotation `(pitch, yaw, roll)`.
pub fn quat_from_euler(rotation: Vec3) -> Quat {
    Quat::from_euler(EulerRot::YXZ, rotation.y, rotation.x, rotation.z)
}

/// Convert a quaternion back to an Euler rotation `(pitch, yaw, roll)`.
pub fn euler_from_quat(rotation: Quat) -> Vec3 {
    let (yaw, pitch, roll) = rotation.to_euler(EulerRot::YXZ);
    Vec3::new(pitch, yaw, roll)
}

/// Avatar yaw that faces along a camera yaw.
///
/// The avatar mesh's forward axis points opposite to the camera rig's, so
/// the camera yaw is flipped around a half turn and negated.
pub fn flip_yaw(camera_yaw: f32) -> f32 {
    -(PI - camera_yaw)
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f32 = 1e-5;

    #[test]
    fn euler_roundtrip_keeps_yaw() {
        let rotation = Vec3::new(0.3, 1.2, 0.0);
        let back = euler_from_quat(quat_from_euler(rotation));
        assert!((back - rotation).length() < EPSILON, "got {back:?}");
    }

    #[test]
    fn yaw_quarter_turn_faces_positive_x() {
        let q = quat_from_euler(Vec3::new(0.0, PI / 2.0, 0.0));
        let forward = q * FORWARD;
        assert!((forward - Vec3::X).length() < EPSILON, "got {forward:?}");
        let right = q * RIGHT;
        assert!((right - Vec3::NEG_Z).length() < EPSILON, "got {right:?}");
    }

    #[test]
    fn flip_yaw_half_turns() {
        assert!((flip_yaw(0.0) + PI).abs() < EPSILON);
        assert!(flip_yaw(PI).abs() < EPSILON);
    }
}
