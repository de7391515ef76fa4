//! Scripted sessions without a window

use vantage_core::glam::Vec3;
use vantage_core::{Mode, Viewer};
use vantage_services::InputScript;

/// Simulated host frame interval (60 Hz).
pub const FRAME_INTERVAL_MS: f64 = 1000.0 / 60.0;

#[derive(Debug, Clone, PartialEq)]
pub struct SessionSummary {
    pub frames: u64,
    pub events: usize,
    pub mode: Mode,
    pub player_position: Option<Vec3>,
}

/// Replay a script against the viewer, one host frame per script frame.
pub fn run(viewer: &mut Viewer, script: InputScript, frames: Option<u64>) -> SessionSummary {
    let mut replay = script.into_replay();
    let frames = frames.unwrap_or_else(|| replay.frame_count());
    let mut events = 0;

    for frame in 0..frames {
        events += replay.apply_due(frame, viewer);
        viewer.frame(frame as f64 * FRAME_INTERVAL_MS);
    }

    if !replay.is_finished() {
        tracing::warn!(frames, "session ended before every scripted event was replayed");
    }

    let summary = SessionSummary {
        frames,
        events,
        mode: viewer.mode(),
        player_position: viewer.player_pose().map(|p| p.position),
    };
    tracing::info!(
        frames = summary.frames,
        events = summary.events,
        mode = ?summary.mode,
        position = ?summary.player_position,
        "headless session finished"
    );
    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use vantage_core::player::{AvatarParts, MeshPart};
    use vantage_core::{Aabb, ViewerOptions, WorldConfig};

    const SCRIPT: &str = r#"{
        "xr_supported": true,
        "events": [
            { "frame": 0, "type": "key", "key": "w", "pressed": true },
            { "frame": 2, "type": "xr_state", "state": 0 },
            { "frame": 3, "type": "xr_state", "state": 2 },
            { "frame": 5, "type": "key", "key": "w", "pressed": false }
        ]
    }"#;

    fn viewer(xr_supported: bool) -> Viewer {
        let mut viewer = Viewer::new(ViewerOptions::default(), &WorldConfig::sample());
        viewer
            .load_avatar(Some(AvatarParts {
                source: "avatar.glb".to_string(),
                meshes: vec![MeshPart::new("__root__", Aabb::default())],
                skeletons: Vec::new(),
            }))
            .unwrap();
        viewer.enable_xr(xr_supported);
        viewer
    }

    #[test]
    fn scripted_session_walks_and_enters_vr() {
        let script = InputScript::from_json(SCRIPT).unwrap();
        let mut viewer = viewer(script.xr_supported);

        let summary = run(&mut viewer, script, None);
        assert_eq!(summary.frames, 6);
        assert_eq!(summary.events, 4);
        assert_eq!(summary.mode, Mode::Vr);

        // Five frames walking forward; the headset camera also faces +Z.
        let position = summary.player_position.unwrap();
        assert!((position - Vec3::new(0.0, -5.0, 1.0)).length() < 1e-4, "{position:?}");
    }

    #[test]
    fn frame_override_truncates_session() {
        let script = InputScript::from_json(SCRIPT).unwrap();
        let mut viewer = viewer(false);

        let summary = run(&mut viewer, script, Some(2));
        assert_eq!(summary.frames, 2);
        assert_eq!(summary.events, 1);
        assert_eq!(summary.mode, Mode::Desktop);
    }
}
