//! Avatar movement resolution
//!
//! Movement is a flat per-frame step: the displacement does not depend on
//! frame time unless the caller scales `speed` (see [`frame_scaled_speed`]).

use glam::Vec3;

use crate::input::InputState;
use crate::math;
use crate::orientation::OrientationSample;
use crate::time::REFERENCE_FRAME_RATE_HZ;

/// Default avatar speed in world units per frame.
pub const DEFAULT_MOVEMENT_SPEED: f32 = 0.2;

/// Result of resolving one frame of movement.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct Movement {
    pub delta_position: Vec3,
    pub new_yaw: f32,
}

/// Combine held keys and camera orientation into a displacement and facing.
pub fn resolve(input: &InputState, orientation: &OrientationSample, speed: f32) -> Movement {
    let new_yaw = math::flip_yaw(orientation.yaw);

    let delta_position = if input.is_moving() {
        let vertical = f32::from(input.vertical());
        let horizontal = f32::from(input.horizontal());
        (orientation.forward * vertical + orientation.right * horizontal) * speed
    } else {
        Vec3::ZERO
    };

    Movement { delta_position, new_yaw }
}

/// Rescale a per-frame speed so that it covers the same distance per second
/// at any frame rate, using [`REFERENCE_FRAME_RATE_HZ`] as the baseline.
pub fn frame_scaled_speed(speed: f32, dt_seconds: f32) -> f32 {
    speed * dt_seconds * REFERENCE_FRAME_RATE_HZ as f32
}
