//! Scene graph state handed to the host renderer
//!
//! The renderer reads meshes back from here; nothing in this module draws.

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Index of a mesh inside a [`Scene`].
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MeshId(pub usize);

/// Axis-aligned bounding box in mesh-local space.
#[derive(Debug, Default, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    pub fn extent(&self) -> Vec3 {
        self.max - self.min
    }
}

/// Built-in mesh shapes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "shape", rename_all = "snake_case")]
pub enum Primitive {
    /// Square in the local XY plane, facing -Z.
    Plane { size: f32 },
    Sphere { diameter: f32 },
}

impl Primitive {
    pub fn bounds(&self) -> Aabb {
        match *self {
            Primitive::Plane { size } => {
                let half = size / 2.0;
                Aabb::new(Vec3::new(-half, -half, 0.0), Vec3::new(half, half, 0.0))
            }
            Primitive::Sphere { diameter } => {
                let half = Vec3::splat(diameter / 2.0);
                Aabb::new(-half, half)
            }
        }
    }

    /// Normal of the first face, in mesh-local space.
    pub fn facet_normal(&self) -> Vec3 {
        match self {
            Primitive::Plane { .. } => Vec3::NEG_Z,
            Primitive::Sphere { .. } => Vec3::Y,
        }
    }
}

/// A mesh as far as the viewer is concerned: identity, transform, bounds
/// and visibility.
#[derive(Debug, Clone, PartialEq)]
pub struct Mesh {
    pub id: MeshId,
    pub name: String,
    pub position: Vec3,
    /// Euler rotation `(pitch, yaw, roll)`.
    pub rotation: Vec3,
    pub bounds: Aabb,
    pub facet_normal: Vec3,
    pub enabled: bool,
    pub check_collisions: bool,
    /// Set once the mesh has been handed to the renderer.
    pub materialized: bool,
}

/// Scene lighting.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Light {
    Hemispheric { direction: Vec3, intensity: f32 },
    /// The host's default camera-and-light setup.
    Default,
}

/// All meshes and lights known to the viewer.
#[derive(Debug, Default, Clone)]
pub struct Scene {
    meshes: Vec<Mesh>,
    lights: Vec<Light>,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a mesh at the origin with the given local bounds.
    pub fn create_mesh(&mut self, name: impl Into<String>, bounds: Aabb) -> MeshId {
        let id = MeshId(self.meshes.len());
        self.meshes.push(Mesh {
            id,
            name: name.into(),
            position: Vec3::ZERO,
            rotation: Vec3::ZERO,
            bounds,
            facet_normal: Vec3::Y,
            enabled: true,
            check_collisions: false,
            materialized: false,
        });
        id
    }

    pub fn create_primitive(&mut self, name: impl Into<String>, primitive: Primitive) -> MeshId {
        let id = self.create_mesh(name, primitive.bounds());
        self.meshes[id.0].facet_normal = primitive.facet_normal();
        id
    }

    pub fn mesh(&self, id: MeshId) -> Option<&Mesh> {
        self.meshes.get(id.0)
    }

    pub fn mesh_mut(&mut self, id: MeshId) -> Option<&mut Mesh> {
        self.meshes.get_mut(id.0)
    }

    pub fn meshes(&self) -> &[Mesh] {
        &self.meshes
    }

    pub fn set_transform(&mut self, id: MeshId, position: Vec3, rotation: Vec3) {
        if let Some(mesh) = self.meshes.get_mut(id.0) {
            mesh.position = position;
            mesh.rotation = rotation;
        }
    }

    pub fn set_enabled(&mut self, id: MeshId, enabled: bool) {
        if let Some(mesh) = self.meshes.get_mut(id.0) {
            mesh.enabled = enabled;
        }
    }

    pub fn is_enabled(&self, id: MeshId) -> bool {
        self.mesh(id).is_some_and(|m| m.enabled)
    }

    /// Hand a mesh to the renderer. Returns false if it already was.
    pub fn materialize(&mut self, id: MeshId) -> bool {
        match self.meshes.get_mut(id.0) {
            Some(mesh) if !mesh.materialized => {
                mesh.materialized = true;
                true
            }
            _ => false,
        }
    }

    pub fn add_light(&mut self, light: Light) {
        self.lights.push(light);
    }

    pub fn lights(&self) -> &[Light] {
        &self.lights
    }

    pub fn find_by_name(&self, name: &str) -> impl Iterator<Item = &Mesh> {
        let name = name.to_string();
        self.meshes.iter().filter(move |m| m.name == name)
    }

    pub fn len(&self) -> usize {
        self.meshes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.meshes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn primitives_have_centered_bounds() {
        let plane = Primitive::Plane { size: 10.0 }.bounds();
        assert_eq!(plane.extent(), Vec3::new(10.0, 10.0, 0.0));
        let sphere = Primitive::Sphere { diameter: 5.0 }.bounds();
        assert_eq!(sphere.min, Vec3::splat(-2.5));
    }

    #[test]
    fn materialize_only_once() {
        let mut scene = Scene::new();
        let id = scene.create_primitive("floor", Primitive::Plane { size: 1.0 });
        assert!(scene.materialize(id));
        assert!(!scene.materialize(id));
        assert!(!scene.materialize(MeshId(99)));
    }

    #[test]
    fn visibility_toggles() {
        let mut scene = Scene::new();
        let id = scene.create_mesh("head", Aabb::default());
        assert!(scene.is_enabled(id));
        scene.set_enabled(id, false);
        assert!(!scene.is_enabled(id));
        assert!(!scene.is_enabled(MeshId(7)));
    }
}
