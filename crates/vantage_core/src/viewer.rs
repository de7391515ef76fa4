//! The viewer: owns the scene and drives every per-frame system in order.

use std::time::Duration;

use glam::{Quat, Vec3};

use crate::camera::{Camera, CameraBinding, CameraHandle, CameraStore, FreeCamera};
use crate::error::{ModeError, PlayerError};
use crate::follow::{CameraFollow, DEFAULT_XR_HEAD_OFFSET};
use crate::input::{KeyBindings, MoveKey};
use crate::mode::{Mode, ModeContext, ModeController, Transition};
use crate::movement::{Movement, DEFAULT_MOVEMENT_SPEED};
use crate::player::{Avatar, AvatarParts, AvatarPose, PlayerController, HEAD_MESH_NAMES, HEIGHT_MESH_NAMES};
use crate::scene::Scene;
use crate::time::FrameClock;
use crate::world::{World, WorldConfig};
use crate::xr::{XrExperience, XrState};

/// Where the desktop camera starts, looking down +Z at the spawn area.
pub const DESKTOP_CAMERA_POSITION: Vec3 = Vec3::new(0.0, -1.0, -9.0);

/// Runtime knobs for a [`Viewer`].
#[derive(Debug, Clone, PartialEq)]
pub struct ViewerOptions {
    pub movement_speed: f32,
    pub key_bindings: KeyBindings,
    pub head_meshes: Vec<String>,
    pub height_meshes: Vec<String>,
    pub camera_follow: bool,
    pub xr_head_offset: f32,
    pub normalize_frame_time: bool,
}

impl Default for ViewerOptions {
    fn default() -> Self {
        Self {
            movement_speed: DEFAULT_MOVEMENT_SPEED,
            key_bindings: KeyBindings::default(),
            head_meshes: HEAD_MESH_NAMES.iter().map(|s| s.to_string()).collect(),
            height_meshes: HEIGHT_MESH_NAMES.iter().map(|s| s.to_string()).collect(),
            camera_follow: false,
            xr_head_offset: DEFAULT_XR_HEAD_OFFSET,
            normalize_frame_time: false,
        }
    }
}

/// What one frame did.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct FrameReport {
    pub delta: Duration,
    pub materialized: usize,
    pub movement: Option<Movement>,
    pub camera_position: Option<Vec3>,
}

struct PlayerSlot {
    avatar: Avatar,
    controller: PlayerController,
}

pub struct Viewer {
    options: ViewerOptions,
    scene: Scene,
    world: World,
    cameras: CameraStore,
    binding: CameraBinding,
    desktop_camera: CameraHandle,
    mode: ModeController,
    xr: Option<XrExperience>,
    player: Option<PlayerSlot>,
    follow: Option<CameraFollow>,
    clock: FrameClock,
}

impl Viewer {
    /// Build the world and bind the desktop camera.
    pub fn new(options: ViewerOptions, world_config: &WorldConfig) -> Self {
        let mut scene = Scene::new();
        let world = World::from_config(world_config, &mut scene);

        let mut cameras = CameraStore::new();
        let mut desktop = FreeCamera::new("camera", DESKTOP_CAMERA_POSITION);
        desktop.attach_control();
        let desktop_camera = cameras.insert(desktop);

        let follow = options.camera_follow.then(|| CameraFollow::new(options.xr_head_offset));

        tracing::info!(world = %world.name(), follow = follow.is_some(), "viewer created");

        Self {
            options,
            scene,
            world,
            cameras,
            binding: CameraBinding::new(desktop_camera),
            desktop_camera,
            mode: ModeController::new(),
            xr: None,
            player: None,
            follow,
            clock: FrameClock::new(),
        }
    }

    /// Spawn the avatar from a loaded asset. A missing asset leaves the
    /// viewer without a player; keyboard movement then never activates.
    ///
    /// Only one avatar can be spawned per viewer.
    pub fn load_avatar(&mut self, parts: Option<AvatarParts>) -> Result<bool, PlayerError> {
        if self.player.is_some() {
            return Err(PlayerError::AlreadySpawned);
        }
        let Some(parts) = parts else {
            tracing::warn!("no avatar loaded; player movement disabled");
            return Ok(false);
        };

        let avatar = Avatar::build(parts, &mut self.scene, &self.options.height_meshes)?;
        let position = self.world.spawn_player(&avatar, &mut self.scene);
        let controller = PlayerController::new(position, self.options.movement_speed)
            .with_frame_time_normalization(self.options.normalize_frame_time);

        self.player = Some(PlayerSlot { avatar, controller });
        Ok(true)
    }

    /// Create the XR experience if the host supports immersive VR.
    pub fn enable_xr(&mut self, supported: bool) -> bool {
        let floors = self.world.floor().into_iter().collect();
        self.xr = XrExperience::create(supported, &mut self.cameras, floors);
        self.xr.is_some()
    }

    /// Route a keyboard event. Returns the movement key it mapped to.
    pub fn on_key(&mut self, key: &str, pressed: bool) -> Option<MoveKey> {
        let move_key = self.options.key_bindings.lookup(key)?;
        let Some(player) = self.player.as_mut() else {
            tracing::debug!(key, "key ignored; no player");
            return Some(move_key);
        };
        let input = player.controller.input_mut();
        if pressed {
            input.on_key_down(move_key);
        } else {
            input.on_key_up(move_key);
        }
        Some(move_key)
    }

    pub fn on_xr_state_changed(&mut self, state: XrState) -> Result<Transition, ModeError> {
        let xr_camera = match self.xr.as_mut() {
            Some(xr) => {
                xr.set_state(state);
                Some(xr.camera())
            }
            None => None,
        };

        self.mode.on_xr_state_changed(
            state,
            ModeContext {
                cameras: &mut self.cameras,
                binding: &mut self.binding,
                xr_camera,
                scene: &mut self.scene,
                avatar: self.player.as_ref().map(|p| &p.avatar),
                head_meshes: &self.options.head_meshes,
            },
        )
    }

    /// Apply a host-reported pose (mouse look, tracked headset) to whichever
    /// camera is bound.
    pub fn set_camera_pose(&mut self, position: Vec3, orientation: Quat) -> bool {
        match self.binding.resolve_mut(&mut self.cameras) {
            Some(camera) => {
                camera.set_pose(position, orientation);
                true
            }
            None => false,
        }
    }

    /// Run one frame: materialize new entities, move the player, then pull
    /// the camera along.
    pub fn frame(&mut self, time_ms: f64) -> FrameReport {
        let delta = self.clock.tick(time_ms);
        let mode = self.mode.mode();
        let mut report = FrameReport {
            delta,
            materialized: self.world.materialize(&mut self.scene),
            ..FrameReport::default()
        };

        if let Some(player) = self.player.as_mut() {
            report.movement = Some(player.controller.update(
                &player.avatar,
                &mut self.scene,
                &self.cameras,
                &self.binding,
                mode,
                delta,
            ));

            if let Some(follow) = &self.follow {
                report.camera_position = follow.update(
                    &player.controller.pose(),
                    player.avatar.height(),
                    &mut self.cameras,
                    &self.binding,
                    mode,
                );
            }
        }

        report
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn cameras(&self) -> &CameraStore {
        &self.cameras
    }

    pub fn binding(&self) -> CameraBinding {
        self.binding
    }

    pub fn desktop_camera(&self) -> CameraHandle {
        self.desktop_camera
    }

    pub fn active_camera(&self) -> Option<&dyn Camera> {
        self.binding.resolve(&self.cameras)
    }

    pub fn mode(&self) -> Mode {
        self.mode.mode()
    }

    pub fn xr(&self) -> Option<&XrExperience> {
        self.xr.as_ref()
    }

    pub fn avatar(&self) -> Option<&Avatar> {
        self.player.as_ref().map(|p| &p.avatar)
    }

    pub fn player_pose(&self) -> Option<AvatarPose> {
        self.player.as_ref().map(|p| p.controller.pose())
    }

    pub fn is_moving(&self) -> bool {
        self.player.as_ref().is_some_and(|p| p.controller.input().is_moving())
    }

    pub fn frame_count(&self) -> u64 {
        self.clock.frame_count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::player::MeshPart;
    use crate::scene::Aabb;
    use std::f32::consts::PI;

    const EPSILON: f32 = 1e-4;

    fn avatar_parts() -> AvatarParts {
        let tall = |h: f32| Aabb::new(Vec3::ZERO, Vec3::new(0.1, h, 0.1));
        AvatarParts {
            source: "avatar.glb".to_string(),
            meshes: vec![
                MeshPart::new("__root__", Aabb::default()),
                MeshPart::new("Wolf3D_Head", tall(0.3)),
                MeshPart::new("Wolf3D_Body", tall(0.7)),
                MeshPart::new("Wolf3D_Outfit_Bottom", tall(0.8)),
                MeshPart::new("EyeLeft", tall(0.05)),
                MeshPart::new("EyeRight", tall(0.05)),
                MeshPart::new("Wolf3D_Teeth", tall(0.04)),
            ],
            skeletons: Vec::new(),
        }
    }

    fn viewer_with_avatar(options: ViewerOptions) -> Viewer {
        let mut viewer = Viewer::new(options, &WorldConfig::sample());
        assert!(viewer.load_avatar(Some(avatar_parts())).unwrap());
        viewer
    }

    #[test]
    fn desktop_camera_bound_from_start() {
        let viewer = Viewer::new(ViewerOptions::default(), &WorldConfig::sample());
        assert_eq!(viewer.binding().get(), Some(viewer.desktop_camera()));
        assert!(viewer.active_camera().unwrap().has_control());
        assert_eq!(viewer.mode(), Mode::Desktop);
    }

    #[test]
    fn missing_avatar_never_moves() {
        let mut viewer = Viewer::new(ViewerOptions::default(), &WorldConfig::sample());
        assert!(!viewer.load_avatar(None).unwrap());
        assert_eq!(viewer.on_key("w", true), Some(MoveKey::Forward));
        let report = viewer.frame(0.0);
        assert!(!viewer.is_moving());
        assert_eq!(report.movement, None);
        assert_eq!(viewer.player_pose(), None);
    }

    #[test]
    fn spawned_avatar_walks_forward() {
        let mut viewer = viewer_with_avatar(ViewerOptions::default());
        let start = viewer.player_pose().unwrap().position;
        assert!((start - Vec3::new(0.0, -3.2, 0.0)).length() < EPSILON);

        viewer.on_key("W", true);
        viewer.frame(0.0);
        viewer.frame(16.0);
        viewer.on_key("w", false);
        viewer.frame(32.0);

        let pose = viewer.player_pose().unwrap();
        assert!((pose.position - (start + Vec3::new(0.0, 0.0, 0.4))).length() < EPSILON);
        assert!((pose.yaw + PI).abs() < EPSILON);
        assert_eq!(viewer.frame_count(), 3);
    }

    #[test]
    fn first_frame_materializes_world_and_avatar() {
        let mut viewer = viewer_with_avatar(ViewerOptions::default());
        let report = viewer.frame(0.0);
        // floor + seven avatar meshes
        assert_eq!(report.materialized, 8);
        assert_eq!(viewer.frame(16.0).materialized, 0);
        assert_eq!(viewer.world().mirrors()[0].render_list.len(), 8);
    }

    #[test]
    fn second_avatar_is_rejected() {
        let mut viewer = viewer_with_avatar(ViewerOptions::default());
        let meshes = viewer.scene().len();
        let entities = viewer.world().entities().len();

        assert_eq!(viewer.load_avatar(Some(avatar_parts())), Err(PlayerError::AlreadySpawned));
        assert_eq!(viewer.scene().len(), meshes);
        assert_eq!(viewer.world().entities().len(), entities);
        assert_eq!(viewer.load_avatar(None), Err(PlayerError::AlreadySpawned));
    }

    #[test]
    fn unbound_keys_are_ignored() {
        let mut viewer = viewer_with_avatar(ViewerOptions::default());
        assert_eq!(viewer.on_key("q", true), None);
        assert!(!viewer.is_moving());
    }

    #[test]
    fn xr_state_without_experience_is_reported() {
        let mut viewer = viewer_with_avatar(ViewerOptions::default());
        assert!(!viewer.enable_xr(false));
        assert_eq!(viewer.on_xr_state_changed(XrState::InXr), Err(ModeError::MissingXrCamera));
        assert_eq!(viewer.mode(), Mode::Desktop);
    }

    #[test]
    fn entering_vr_rebinds_every_consumer() {
        let mut viewer = viewer_with_avatar(ViewerOptions {
            camera_follow: true,
            ..ViewerOptions::default()
        });
        assert!(viewer.enable_xr(true));
        let xr_camera = viewer.xr().unwrap().camera();

        viewer.on_xr_state_changed(XrState::EnteringXr).unwrap();
        let transition = viewer.on_xr_state_changed(XrState::InXr).unwrap();
        assert!(matches!(transition, Transition::EnteredVr { hidden_meshes: 4, .. }));
        assert_eq!(viewer.binding().get(), Some(xr_camera));

        // Headset turned a quarter to the right.
        assert!(viewer.set_camera_pose(Vec3::ZERO, Quat::from_rotation_y(PI / 2.0)));
        viewer.on_key("w", true);
        let report = viewer.frame(0.0);

        let movement = report.movement.unwrap();
        assert!((movement.delta_position - Vec3::new(0.2, 0.0, 0.0)).length() < EPSILON);
        assert!((movement.new_yaw + PI / 2.0).abs() < EPSILON);

        let pose = viewer.player_pose().unwrap();
        let expected_camera = pose.position + Vec3::new(0.0, 1.8 - 0.9, 0.0);
        assert!((report.camera_position.unwrap() - expected_camera).length() < EPSILON);
        assert_eq!(viewer.active_camera().unwrap().position(), report.camera_position.unwrap());
        assert!(!viewer.cameras().get(viewer.desktop_camera()).unwrap().has_control());
    }
}
