//! Input recording and replay
//!
//! A script is a list of host events stamped with the frame they arrive
//! before. Replaying one feeds the same events to a [`Viewer`] in the same
//! order, which is how headless sessions and tests drive the viewer.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use vantage_core::glam::{Quat, Vec3};
use vantage_core::{Viewer, XrState};

#[derive(Debug, Error)]
pub enum ScriptError {
    #[error("failed to read script {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed script: {0}")]
    Parse(#[from] serde_json::Error),
}

/// One host event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InputEvent {
    Key { key: String, pressed: bool },
    /// WebXR session state code (0 entering, 1 exiting, 2 in, 3 not in).
    XrState { state: u32 },
    CameraPose { position: Vec3, orientation: Quat },
}

impl InputEvent {
    /// Deliver this event to the viewer.
    pub fn apply(&self, viewer: &mut Viewer) {
        match self {
            InputEvent::Key { key, pressed } => {
                viewer.on_key(key, *pressed);
            }
            InputEvent::XrState { state } => {
                let Some(state) = XrState::from_code(*state) else {
                    tracing::warn!(code = *state, "unknown xr state code");
                    return;
                };
                if let Err(err) = viewer.on_xr_state_changed(state) {
                    tracing::warn!(error = %err, ?state, "xr state change rejected");
                }
            }
            InputEvent::CameraPose { position, orientation } => {
                viewer.set_camera_pose(*position, *orientation);
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScriptedEvent {
    pub frame: u64,
    #[serde(flatten)]
    pub event: InputEvent,
}

/// A recorded or hand-written input session.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct InputScript {
    /// Frames to run; defaults to one past the last event.
    #[serde(default)]
    pub frames: Option<u64>,
    /// Whether the host reports immersive VR support.
    #[serde(default)]
    pub xr_supported: bool,
    pub events: Vec<ScriptedEvent>,
}

impl InputScript {
    pub fn from_json(json: &str) -> Result<Self, ScriptError> {
        let mut script: InputScript = serde_json::from_str(json)?;
        script.events.sort_by_key(|e| e.frame);
        Ok(script)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ScriptError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| ScriptError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&json)
    }

    pub fn to_json(&self) -> Result<String, ScriptError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ScriptError> {
        let path = path.as_ref();
        std::fs::write(path, self.to_json()?).map_err(|source| ScriptError::Io {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn frame_count(&self) -> u64 {
        self.frames.unwrap_or_else(|| {
            self.events
                .last()
                .map(|e| e.frame.saturating_add(1))
                .unwrap_or(0)
        })
    }

    /// Start replaying from the first event.
    pub fn into_replay(self) -> Replay {
        Replay {
            script: self,
            cursor: 0,
        }
    }
}

/// Walks a script frame by frame. Owns the script so a host can keep it
/// across frames.
#[derive(Debug)]
pub struct Replay {
    script: InputScript,
    cursor: usize,
}

impl Replay {
    /// Events due at or before `frame` that have not been returned yet.
    pub fn due(&mut self, frame: u64) -> &[ScriptedEvent] {
        let events = &self.script.events;
        let start = self.cursor;
        while self.cursor < events.len() && events[self.cursor].frame <= frame {
            self.cursor += 1;
        }
        &events[start..self.cursor]
    }

    /// Deliver every event due before `frame` to the viewer. Returns how many
    /// were applied.
    pub fn apply_due(&mut self, frame: u64, viewer: &mut Viewer) -> usize {
        let due = self.due(frame);
        for scripted in due {
            tracing::debug!(frame, event = ?scripted.event, "replaying input");
            scripted.event.apply(viewer);
        }
        due.len()
    }

    pub fn is_finished(&self) -> bool {
        self.cursor >= self.script.events.len()
    }

    pub fn frame_count(&self) -> u64 {
        self.script.frame_count()
    }

    pub fn script(&self) -> &InputScript {
        &self.script
    }
}

/// Records host events against the current frame.
#[derive(Debug, Default)]
pub struct InputRecorder {
    frame: u64,
    script: InputScript,
}

impl InputRecorder {
    pub fn new(xr_supported: bool) -> Self {
        Self {
            frame: 0,
            script: InputScript {
                xr_supported,
                ..InputScript::default()
            },
        }
    }

    pub fn record(&mut self, event: InputEvent) {
        self.script.events.push(ScriptedEvent {
            frame: self.frame,
            event,
        });
    }

    pub fn next_frame(&mut self) {
        self.frame += 1;
    }

    pub fn frame(&self) -> u64 {
        self.frame
    }

    pub fn finish(mut self) -> InputScript {
        self.script.frames = Some(self.frame);
        self.script
    }
}
