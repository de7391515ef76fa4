//! Desktop/VR mode switching
//!
//! The controller starts on the desktop. Entering an immersive session binds
//! the headset camera and hides the avatar's head. Leaving VR again is not
//! wired up: it is reported as an unsupported transition and nothing changes.

use crate::camera::{CameraBinding, CameraHandle, CameraStore};
use crate::error::ModeError;
use crate::player::Avatar;
use crate::scene::Scene;
use crate::xr::XrState;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    #[default]
    Desktop,
    Vr,
}

/// What a session state change did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// The state was observed but the mode did not change.
    Unchanged,
    EnteredVr {
        previous_camera: Option<CameraHandle>,
        hidden_meshes: usize,
    },
}

/// Everything a mode switch touches.
pub struct ModeContext<'a> {
    pub cameras: &'a mut CameraStore,
    pub binding: &'a mut CameraBinding,
    pub xr_camera: Option<CameraHandle>,
    pub scene: &'a mut Scene,
    pub avatar: Option<&'a Avatar>,
    pub head_meshes: &'a [String],
}

#[derive(Debug, Default, Clone)]
pub struct ModeController {
    mode: Mode,
}

impl ModeController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// React to an immersive session state change.
    pub fn on_xr_state_changed(&mut self, state: XrState, ctx: ModeContext<'_>) -> Result<Transition, ModeError> {
        match (self.mode, state) {
            (Mode::Desktop, XrState::InXr) => self.enter_vr(ctx),
            (Mode::Vr, XrState::NotInXr) => {
                tracing::warn!("leaving VR is not supported; staying in VR mode");
                Err(ModeError::UnsupportedTransition {
                    from: Mode::Vr,
                    to: Mode::Desktop,
                })
            }
            (mode, state) => {
                tracing::debug!(?mode, ?state, "xr state observed");
                Ok(Transition::Unchanged)
            }
        }
    }

    fn enter_vr(&mut self, ctx: ModeContext<'_>) -> Result<Transition, ModeError> {
        let xr_camera = ctx.xr_camera.ok_or(ModeError::MissingXrCamera)?;

        // Rebind first so an unknown handle leaves every camera untouched.
        let previous_camera = ctx.binding.set(ctx.cameras, xr_camera)?;
        if let Some(previous) = previous_camera {
            if let Some(camera) = ctx.cameras.get_mut(previous) {
                camera.detach_control();
            }
        }
        if let Some(camera) = ctx.binding.resolve_mut(ctx.cameras) {
            camera.attach_control();
        }

        let hidden_meshes = ctx
            .avatar
            .map(|avatar| avatar.decapitate(ctx.scene, ctx.head_meshes))
            .unwrap_or(0);

        self.mode = Mode::Vr;
        tracing::info!(?previous_camera, camera = xr_camera.id(), hidden_meshes, "entered VR");

        Ok(Transition::EnteredVr {
            previous_camera,
            hidden_meshes,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::camera::{Camera, FreeCamera, XrCamera};
    use crate::error::CameraError;
    use crate::orientation::OrientationSampler;
    use crate::player::{AvatarParts, MeshPart, HEAD_MESH_NAMES};
    use crate::scene::Aabb;
    use glam::{Quat, Vec3};

    struct Fixture {
        cameras: CameraStore,
        binding: CameraBinding,
        desk: CameraHandle,
        xr: CameraHandle,
        scene: Scene,
        avatar: Avatar,
        heads: Vec<String>,
    }

    impl Fixture {
        fn new() -> Self {
            let mut cameras = CameraStore::new();
            let mut desk_camera = FreeCamera::new("desk", Vec3::ZERO);
            desk_camera.attach_control();
            let desk = cameras.insert(desk_camera);
            let xr = cameras.insert(XrCamera::new("xr"));

            let mut scene = Scene::new();
            let meshes = ["__root__", "Wolf3D_Head", "EyeLeft", "EyeRight", "Wolf3D_Teeth", "Wolf3D_Body", "Wolf3D_Hair"]
                .iter()
                .map(|n| MeshPart::new(*n, Aabb::default()))
                .collect();
            let parts = AvatarParts {
                source: "avatar.glb".to_string(),
                meshes,
                skeletons: Vec::new(),
            };
            let avatar = Avatar::build(parts, &mut scene, &[]).unwrap();

            Self {
                cameras,
                binding: CameraBinding::new(desk),
                desk,
                xr,
                scene,
                avatar,
                heads: HEAD_MESH_NAMES.iter().map(|s| s.to_string()).collect(),
            }
        }

        fn apply(&mut self, controller: &mut ModeController, state: XrState) -> Result<Transition, ModeError> {
            controller.on_xr_state_changed(
                state,
                ModeContext {
                    cameras: &mut self.cameras,
                    binding: &mut self.binding,
                    xr_camera: Some(self.xr),
                    scene: &mut self.scene,
                    avatar: Some(&self.avatar),
                    head_meshes: &self.heads,
                },
            )
        }
    }

    #[test]
    fn entering_vr_swaps_camera_and_hides_head() {
        let mut fx = Fixture::new();
        let mut controller = ModeController::new();

        let transition = fx.apply(&mut controller, XrState::InXr).unwrap();
        assert_eq!(
            transition,
            Transition::EnteredVr {
                previous_camera: Some(fx.desk),
                hidden_meshes: 4
            }
        );
        assert_eq!(controller.mode(), Mode::Vr);
        assert_eq!(fx.binding.get(), Some(fx.xr));
        assert!(!fx.cameras.get(fx.desk).unwrap().has_control());
        assert!(fx.cameras.get(fx.xr).unwrap().has_control());

        let disabled: Vec<&str> = fx
            .scene
            .meshes()
            .iter()
            .filter(|m| !m.enabled)
            .map(|m| m.name.as_str())
            .collect();
        assert_eq!(disabled, vec!["Wolf3D_Head", "EyeLeft", "EyeRight", "Wolf3D_Teeth"]);
    }

    #[test]
    fn intermediate_states_do_not_switch() {
        let mut fx = Fixture::new();
        let mut controller = ModeController::new();
        for state in [XrState::EnteringXr, XrState::ExitingXr, XrState::NotInXr] {
            assert_eq!(fx.apply(&mut controller, state), Ok(Transition::Unchanged));
        }
        assert_eq!(controller.mode(), Mode::Desktop);
        assert_eq!(fx.binding.get(), Some(fx.desk));
    }

    #[test]
    fn leaving_vr_is_unsupported_and_changes_nothing() {
        let mut fx = Fixture::new();
        let mut controller = ModeController::new();
        fx.apply(&mut controller, XrState::InXr).unwrap();

        let err = fx.apply(&mut controller, XrState::NotInXr).unwrap_err();
        assert_eq!(
            err,
            ModeError::UnsupportedTransition {
                from: Mode::Vr,
                to: Mode::Desktop
            }
        );
        assert_eq!(controller.mode(), Mode::Vr);
        assert_eq!(fx.binding.get(), Some(fx.xr));
        assert_eq!(fx.scene.meshes().iter().filter(|m| !m.enabled).count(), 4);
    }

    #[test]
    fn repeated_in_xr_is_a_no_op() {
        let mut fx = Fixture::new();
        let mut controller = ModeController::new();
        fx.apply(&mut controller, XrState::InXr).unwrap();
        assert_eq!(fx.apply(&mut controller, XrState::InXr), Ok(Transition::Unchanged));
    }

    #[test]
    fn missing_xr_camera_is_an_error() {
        let mut fx = Fixture::new();
        let mut controller = ModeController::new();
        let result = controller.on_xr_state_changed(
            XrState::InXr,
            ModeContext {
                cameras: &mut fx.cameras,
                binding: &mut fx.binding,
                xr_camera: None,
                scene: &mut fx.scene,
                avatar: None,
                head_meshes: &fx.heads,
            },
        );
        assert_eq!(result, Err(ModeError::MissingXrCamera));
        assert_eq!(controller.mode(), Mode::Desktop);
    }

    #[test]
    fn unknown_xr_camera_keeps_desktop_in_control() {
        let mut fx = Fixture::new();
        let mut controller = ModeController::new();
        fx.cameras.remove(fx.xr);

        let result = fx.apply(&mut controller, XrState::InXr);
        assert_eq!(result, Err(ModeError::Camera(CameraError::UnknownHandle(fx.xr))));
        assert_eq!(controller.mode(), Mode::Desktop);
        assert_eq!(fx.binding.get(), Some(fx.desk));
        assert!(fx.cameras.get(fx.desk).unwrap().has_control());
        assert!(fx.scene.meshes().iter().all(|m| m.enabled));
    }

    #[test]
    fn binding_readers_see_swap_but_cached_handles_go_stale() {
        let mut fx = Fixture::new();
        let mut controller = ModeController::new();
        fx.cameras
            .get_mut(fx.xr)
            .unwrap()
            .set_pose(Vec3::ZERO, Quat::from_rotation_y(1.0));

        // A handle copied out of the binding before the swap.
        let cached = fx.binding.get().unwrap();

        fx.apply(&mut controller, XrState::InXr).unwrap();

        let through_binding = OrientationSampler.sample_bound(&fx.binding, &fx.cameras, controller.mode());
        assert!((through_binding.yaw - 1.0).abs() < 1e-5);
        assert_eq!(cached, fx.desk);
        assert_ne!(cached, fx.binding.get().unwrap());
        assert_eq!(fx.cameras.get(cached).unwrap().name(), "desk");
    }
}
