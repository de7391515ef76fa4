//! Immersive session state

use crate::camera::{CameraHandle, CameraStore, XrCamera};
use crate::scene::MeshId;

/// WebXR session state, numbered as the browser reports it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum XrState {
    EnteringXr = 0,
    ExitingXr = 1,
    InXr = 2,
    NotInXr = 3,
}

impl XrState {
    pub fn from_code(code: u32) -> Option<Self> {
        match code {
            0 => Some(XrState::EnteringXr),
            1 => Some(XrState::ExitingXr),
            2 => Some(XrState::InXr),
            3 => Some(XrState::NotInXr),
            _ => None,
        }
    }

    pub fn code(self) -> u32 {
        self as u32
    }
}

/// The immersive experience: headset camera, teleport floors and the last
/// session state seen.
#[derive(Debug, Clone)]
pub struct XrExperience {
    camera: CameraHandle,
    floor_meshes: Vec<MeshId>,
    state: XrState,
}

impl XrExperience {
    /// Set up the experience if the host supports immersive VR. The headset
    /// camera is registered in `cameras` but not bound.
    pub fn create(supported: bool, cameras: &mut CameraStore, floor_meshes: Vec<MeshId>) -> Option<Self> {
        if !supported {
            tracing::warn!("immersive VR is not supported; XR experience not created");
            return None;
        }
        let camera = cameras.insert(XrCamera::new("webxr"));
        tracing::info!(camera = camera.id(), floors = floor_meshes.len(), "XR experience created");
        Some(Self {
            camera,
            floor_meshes,
            state: XrState::NotInXr,
        })
    }

    pub fn camera(&self) -> CameraHandle {
        self.camera
    }

    pub fn floor_meshes(&self) -> &[MeshId] {
        &self.floor_meshes
    }

    pub fn state(&self) -> XrState {
        self.state
    }

    /// Record a session state. Returns the state when it differs from the
    /// previous one.
    pub fn set_state(&mut self, state: XrState) -> Option<XrState> {
        if self.state == state {
            return None;
        }
        tracing::debug!(from = ?self.state, to = ?state, "xr state changed");
        self.state = state;
        Some(state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_match_browser_numbering() {
        for state in [XrState::EnteringXr, XrState::ExitingXr, XrState::InXr, XrState::NotInXr] {
            assert_eq!(XrState::from_code(state.code()), Some(state));
        }
        assert_eq!(XrState::InXr.code(), 2);
        assert_eq!(XrState::from_code(4), None);
    }

    #[test]
    fn unsupported_host_gets_no_experience() {
        let mut cameras = CameraStore::new();
        assert!(XrExperience::create(false, &mut cameras, vec![MeshId(0)]).is_none());
        assert!(cameras.is_empty());
    }

    #[test]
    fn supported_host_registers_camera() {
        let mut cameras = CameraStore::new();
        let xr = XrExperience::create(true, &mut cameras, vec![MeshId(3)]).unwrap();
        assert!(cameras.contains(xr.camera()));
        assert_eq!(xr.floor_meshes(), &[MeshId(3)]);
        assert_eq!(xr.state(), XrState::NotInXr);
    }

    #[test]
    fn set_state_reports_changes_only() {
        let mut cameras = CameraStore::new();
        let mut xr = XrExperience::create(true, &mut cameras, Vec::new()).unwrap();
        assert_eq!(xr.set_state(XrState::NotInXr), None);
        assert_eq!(xr.set_state(XrState::EnteringXr), Some(XrState::EnteringXr));
        assert_eq!(xr.set_state(XrState::InXr), Some(XrState::InXr));
        assert_eq!(xr.set_state(XrState::InXr), None);
    }
}
