//! Cameras, camera storage and the active-camera binding
//!
//! Cameras live in a [`CameraStore`] and are named by opaque
//! [`CameraHandle`]s. The [`CameraBinding`] is the single slot that says
//! which camera is active; systems resolve it through the store every frame
//! instead of keeping their own camera reference, so a swap is seen by all
//! of them at once.

use std::collections::HashMap;
use std::fmt;

use glam::{Quat, Vec3};

use crate::error::CameraError;
use crate::math;

/// Orientation and control surface the viewer needs from a camera.
pub trait Camera: fmt::Debug {
    fn name(&self) -> &str;

    fn position(&self) -> Vec3;

    fn set_position(&mut self, position: Vec3);

    /// Apply a full pose, e.g. from mouse look or a tracked headset.
    fn set_pose(&mut self, position: Vec3, orientation: Quat);

    /// Euler rotation `(pitch, yaw, roll)`.
    fn rotation(&self) -> Vec3;

    /// Orientation quaternion, for cameras driven by a tracked pose.
    fn rotation_quaternion(&self) -> Option<Quat>;

    /// Transform a local axis into world space.
    ///
    /// The quaternion takes precedence over the Euler rotation when present.
    fn direction(&self, local_axis: Vec3) -> Vec3 {
        let rotation = self
            .rotation_quaternion()
            .unwrap_or_else(|| math::quat_from_euler(self.rotation()));
        rotation * local_axis
    }

    /// Start routing host pointer/keyboard control to this camera.
    fn attach_control(&mut self);

    fn detach_control(&mut self);

    fn has_control(&self) -> bool;
}

/// Desktop camera rotated through Euler angles.
#[derive(Debug, Clone, PartialEq)]
pub struct FreeCamera {
    name: String,
    pub position: Vec3,
    pub rotation: Vec3,
    attached: bool,
}

impl FreeCamera {
    pub fn new(name: impl Into<String>, position: Vec3) -> Self {
        Self {
            name: name.into(),
            position,
            rotation: Vec3::ZERO,
            attached: false,
        }
    }

    pub fn with_rotation(mut self, rotation: Vec3) -> Self {
        self.rotation = rotation;
        self
    }
}

impl Camera for FreeCamera {
    fn name(&self) -> &str {
        &self.name
    }

    fn position(&self) -> Vec3 {
        self.position
    }

    fn set_position(&mut self, position: Vec3) {
        self.position = position;
    }

    fn set_pose(&mut self, position: Vec3, orientation: Quat) {
        self.position = position;
        self.rotation = math::euler_from_quat(orientation);
    }

    fn rotation(&self) -> Vec3 {
        self.rotation
    }

    fn rotation_quaternion(&self) -> Option<Quat> {
        None
    }

    fn attach_control(&mut self) {
        self.attached = true;
    }

    fn detach_control(&mut self) {
        self.attached = false;
    }

    fn has_control(&self) -> bool {
        self.attached
    }
}

/// Headset camera whose orientation comes from the immersive session pose.
#[derive(Debug, Clone, PartialEq)]
pub struct XrCamera {
    name: String,
    pub position: Vec3,
    pub orientation: Quat,
    attached: bool,
}

impl XrCamera {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            position: Vec3::ZERO,
            orientation: Quat::IDENTITY,
            attached: false,
        }
    }
}

impl Camera for XrCamera {
    fn name(&self) -> &str {
        &self.name
    }

    fn position(&self) -> Vec3 {
        self.position
    }

    fn set_position(&mut self, position: Vec3) {
        self.position = position;
    }

    fn set_pose(&mut self, position: Vec3, orientation: Quat) {
        self.position = position;
        self.orientation = orientation.normalize();
    }

    fn rotation(&self) -> Vec3 {
        math::euler_from_quat(self.orientation)
    }

    fn rotation_quaternion(&self) -> Option<Quat> {
        Some(self.orientation)
    }

    fn attach_control(&mut self) {
        self.attached = true;
    }

    fn detach_control(&mut self) {
        self.attached = false;
    }

    fn has_control(&self) -> bool {
        self.attached
    }
}

/// Opaque camera identifier handed out by a [`CameraStore`].
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct CameraHandle(u64);

impl CameraHandle {
    pub fn id(&self) -> u64 {
        self.0
    }
}

/// Owns every camera the viewer knows about.
#[derive(Debug)]
pub struct CameraStore {
    next_id: u64,
    cameras: HashMap<CameraHandle, Box<dyn Camera>>,
}

impl CameraStore {
    pub fn new() -> Self {
        Self {
            next_id: 1,
            cameras: HashMap::new(),
        }
    }

    /// Insert a camera and return its handle.
    pub fn insert(&mut self, camera: impl Camera + 'static) -> CameraHandle {
        let handle = CameraHandle(self.next_id);
        self.next_id += 1;
        tracing::debug!(camera = camera.name(), id = handle.0, "camera registered");
        self.cameras.insert(handle, Box::new(camera));
        handle
    }

    pub fn get(&self, handle: CameraHandle) -> Option<&dyn Camera> {
        self.cameras.get(&handle).map(|c| &**c)
    }

    pub fn get_mut(&mut self, handle: CameraHandle) -> Option<&mut (dyn Camera + 'static)> {
        self.cameras.get_mut(&handle).map(|c| &mut **c)
    }

    pub fn contains(&self, handle: CameraHandle) -> bool {
        self.cameras.contains_key(&handle)
    }

    /// Remove a camera. A binding that still names it resolves to nothing.
    pub fn remove(&mut self, handle: CameraHandle) -> Option<Box<dyn Camera>> {
        self.cameras.remove(&handle)
    }

    pub fn len(&self) -> usize {
        self.cameras.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cameras.is_empty()
    }
}

impl Default for CameraStore {
    fn default() -> Self {
        Self::new()
    }
}

/// The single slot naming the active camera.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CameraBinding {
    active: Option<CameraHandle>,
}

impl CameraBinding {
    pub fn new(handle: CameraHandle) -> Self {
        Self { active: Some(handle) }
    }

    /// A binding with no camera; orientation sampling yields zeros.
    pub fn unbound() -> Self {
        Self { active: None }
    }

    pub fn get(&self) -> Option<CameraHandle> {
        self.active
    }

    /// Bind another camera, returning the one previously bound.
    pub fn set(
        &mut self,
        store: &CameraStore,
        handle: CameraHandle,
    ) -> Result<Option<CameraHandle>, CameraError> {
        if !store.contains(handle) {
            return Err(CameraError::UnknownHandle(handle));
        }
        Ok(self.active.replace(handle))
    }

    pub fn resolve<'a>(&self, store: &'a CameraStore) -> Option<&'a dyn Camera> {
        store.get(self.active?)
    }

    pub fn resolve_mut<'a>(&self, store: &'a mut CameraStore) -> Option<&'a mut (dyn Camera + 'static)> {
        store.get_mut(self.active?)
    }
}
