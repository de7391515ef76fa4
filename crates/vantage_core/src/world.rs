//! World construction: lights, floor, mirrors, props and the spawn point
//!
//! Worlds are described declaratively by a [`WorldConfig`]; the two presets
//! match the sample scenes the viewer ships with.

use std::f32::consts::PI;

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::math;
use crate::player::Avatar;
use crate::scene::{Light, MeshId, Primitive, Scene};

/// One mesh to build from a primitive shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeshSpec {
    pub name: String,
    pub primitive: Primitive,
    #[serde(default)]
    pub position: Vec3,
    #[serde(default)]
    pub rotation: Vec3,
    #[serde(default)]
    pub check_collisions: bool,
}

impl MeshSpec {
    pub fn new(name: impl Into<String>, primitive: Primitive) -> Self {
        Self {
            name: name.into(),
            primitive,
            position: Vec3::ZERO,
            rotation: Vec3::ZERO,
            check_collisions: false,
        }
    }

    pub fn at(mut self, position: Vec3) -> Self {
        self.position = position;
        self
    }

    pub fn rotated(mut self, rotation: Vec3) -> Self {
        self.rotation = rotation;
        self
    }

    pub fn colliding(mut self) -> Self {
        self.check_collisions = true;
        self
    }

    fn build(&self, scene: &mut Scene) -> MeshId {
        let id = scene.create_primitive(self.name.clone(), self.primitive);
        scene.set_transform(id, self.position, self.rotation);
        if let Some(mesh) = scene.mesh_mut(id) {
            mesh.check_collisions = self.check_collisions;
        }
        id
    }
}

/// Declarative world description.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorldConfig {
    pub name: String,
    pub spawn_point: Vec3,
    #[serde(default)]
    pub lights: Vec<Light>,
    #[serde(default)]
    pub floor: Option<MeshSpec>,
    #[serde(default)]
    pub mirrors: Vec<MeshSpec>,
    #[serde(default)]
    pub props: Vec<MeshSpec>,
}

impl WorldConfig {
    /// Hemispheric light, a colliding floor and one mirror.
    pub fn sample() -> Self {
        Self {
            name: "sample-world".to_string(),
            spawn_point: Vec3::new(0.0, -5.0, 0.0),
            lights: vec![Light::Hemispheric {
                direction: Vec3::Y,
                intensity: 1.0,
            }],
            floor: Some(Self::floor().colliding()),
            mirrors: vec![Self::mirror()],
            props: Vec::new(),
        }
    }

    /// Default host lighting, a floor, a sphere at the origin and one mirror.
    pub fn sample_with_sphere() -> Self {
        Self {
            name: "sample-world".to_string(),
            spawn_point: Vec3::new(2.0, -5.0, 0.0),
            lights: vec![Light::Default],
            floor: Some(Self::floor()),
            mirrors: vec![Self::mirror()],
            props: vec![MeshSpec::new("sphere", Primitive::Sphere { diameter: 5.0 })],
        }
    }

    /// Look up a preset by name.
    pub fn preset(name: &str) -> Option<Self> {
        match name {
            "sample" => Some(Self::sample()),
            "sample_with_sphere" => Some(Self::sample_with_sphere()),
            _ => None,
        }
    }

    fn floor() -> MeshSpec {
        MeshSpec::new("floor", Primitive::Plane { size: 100.0 })
            .at(Vec3::new(0.0, -5.0, 0.0))
            .rotated(Vec3::new(PI / 2.0, 0.0, 0.0))
    }

    fn mirror() -> MeshSpec {
        MeshSpec::new("mirror", Primitive::Plane { size: 100.0 }).at(Vec3::new(0.0, 0.0, 10.0))
    }
}

/// A mesh the world hands to the renderer once.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Entity {
    pub mesh: MeshId,
    pub has_rendered: bool,
}

/// A reflective mesh and the meshes it reflects.
#[derive(Debug, Clone, PartialEq)]
pub struct Mirror {
    pub mesh: MeshId,
    pub plane_point: Vec3,
    pub plane_normal: Vec3,
    pub render_list: Vec<MeshId>,
}

pub struct World {
    name: String,
    spawn_point: Vec3,
    entities: Vec<Entity>,
    floor: Option<MeshId>,
    mirrors: Vec<Mirror>,
    lights: Vec<Light>,
}

impl World {
    pub fn new(name: impl Into<String>, spawn_point: Vec3) -> Self {
        Self {
            name: name.into(),
            spawn_point,
            entities: Vec::new(),
            floor: None,
            mirrors: Vec::new(),
            lights: Vec::new(),
        }
    }

    /// Build a world from its description: lights first, then meshes.
    pub fn from_config(config: &WorldConfig, scene: &mut Scene) -> Self {
        let mut world = Self::new(config.name.clone(), config.spawn_point);

        for light in &config.lights {
            scene.add_light(*light);
            world.lights.push(*light);
        }

        if let Some(floor) = &config.floor {
            let id = floor.build(scene);
            world.set_floor(id);
        }
        for prop in &config.props {
            let id = prop.build(scene);
            world.add_mesh(id);
        }
        for mirror in &config.mirrors {
            let id = mirror.build(scene);
            world.add_mirror(id, scene);
        }

        tracing::info!(
            world = %world.name,
            lights = world.lights.len(),
            entities = world.entities.len(),
            mirrors = world.mirrors.len(),
            "world initialized"
        );
        world
    }

    pub fn add_mesh(&mut self, mesh: MeshId) {
        self.entities.push(Entity {
            mesh,
            has_rendered: false,
        });
    }

    pub fn add_meshes(&mut self, meshes: &[MeshId]) {
        for &mesh in meshes {
            self.add_mesh(mesh);
        }
    }

    pub fn set_floor(&mut self, floor: MeshId) {
        self.floor = Some(floor);
        self.add_mesh(floor);
    }

    /// Register a mirror. Its plane passes through the mesh position, facing
    /// against the mesh's first face normal.
    ///
    /// Mirrors are handed to the renderer immediately and never reflect
    /// themselves.
    pub fn add_mirror(&mut self, mesh: MeshId, scene: &mut Scene) {
        let Some(data) = scene.mesh(mesh) else {
            tracing::warn!(mesh = mesh.0, "mirror mesh not found in scene");
            return;
        };
        let world_normal = math::quat_from_euler(data.rotation) * data.facet_normal;
        let mirror = Mirror {
            mesh,
            plane_point: data.position,
            plane_normal: -world_normal,
            render_list: Vec::new(),
        };
        scene.materialize(mesh);
        self.mirrors.push(mirror);
    }

    /// Place the avatar at the spawn point, lifted by its height, and track
    /// its meshes. Returns the spawn position.
    pub fn spawn_player(&mut self, avatar: &Avatar, scene: &mut Scene) -> Vec3 {
        let position = self.spawn_point + Vec3::new(0.0, avatar.height(), 0.0);
        let rotation = scene.mesh(avatar.root()).map(|m| m.rotation).unwrap_or(Vec3::ZERO);
        scene.set_transform(avatar.root(), position, rotation);
        self.add_meshes(avatar.meshes());
        tracing::info!(world = %self.name, ?position, "player spawned");
        position
    }

    /// Hand every entity not yet rendered to the scene and to every mirror's
    /// render list.
    pub fn materialize(&mut self, scene: &mut Scene) -> usize {
        let mut count = 0;
        for entity in self.entities.iter_mut().filter(|e| !e.has_rendered) {
            scene.materialize(entity.mesh);
            for mirror in &mut self.mirrors {
                mirror.render_list.push(entity.mesh);
            }
            entity.has_rendered = true;
            count += 1;
        }
        if count > 0 {
            tracing::debug!(count, "entities materialized");
        }
        count
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn spawn_point(&self) -> Vec3 {
        self.spawn_point
    }

    pub fn floor(&self) -> Option<MeshId> {
        self.floor
    }

    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    pub fn mirrors(&self) -> &[Mirror] {
        &self.mirrors
    }

    pub fn lights(&self) -> &[Light] {
        &self.lights
    }
}
