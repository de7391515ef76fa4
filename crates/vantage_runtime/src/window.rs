//! Native window host
//!
//! Opens a winit window, forwards keyboard events to the viewer and drives
//! one viewer frame per redraw. Drawing is left to the renderer that reads
//! the viewer's scene. Host input can be recorded to a script that the
//! headless runner replays.

use std::path::PathBuf;
use std::time::Instant;

use anyhow::Result;
use vantage_core::glam::{Vec2, Vec3};
use vantage_core::{math, Camera, Mode, MoveKey, Viewer};
use vantage_services::{InputEvent, InputRecorder, InputScript, Replay, ScriptError};
use winit::{
    application::ApplicationHandler,
    dpi::PhysicalPosition,
    event::{ElementState, KeyEvent, MouseButton, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    keyboard::Key,
    window::{Window, WindowId},
};

/// Radians of camera turn per pixel of mouse drag.
const LOOK_SENSITIVITY: f32 = 0.005;

pub struct WindowConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "Vantage".to_string(),
            width: 1280,
            height: 720,
        }
    }
}

pub fn window_attributes(config: &WindowConfig) -> winit::window::WindowAttributes {
    Window::default_attributes()
        .with_title(config.title.clone())
        .with_inner_size(winit::dpi::LogicalSize::new(config.width, config.height))
}

/// Host key identifier for a winit logical key: the typed character, or the
/// key name (`ArrowUp`, `Space`) for named keys.
pub fn key_name(key: &Key) -> Option<String> {
    match key {
        Key::Character(text) => Some(text.to_string()),
        Key::Named(named) => Some(format!("{named:?}")),
        _ => None,
    }
}

struct ViewerApp {
    config: WindowConfig,
    window: Option<Window>,
    viewer: Viewer,
    replay: Option<Replay>,
    recording: Option<(InputRecorder, PathBuf)>,
    frame: u64,
    started: Instant,
    dragging: bool,
    last_cursor: Option<PhysicalPosition<f64>>,
    /// Mouse-look angles `(yaw, pitch)`.
    look: Vec2,
}

impl ViewerApp {
    fn new(
        config: WindowConfig,
        viewer: Viewer,
        script: Option<InputScript>,
        recording: Option<(InputRecorder, PathBuf)>,
    ) -> Self {
        let look = viewer
            .active_camera()
            .map(|c| Vec2::new(c.rotation().y, c.rotation().x))
            .unwrap_or(Vec2::ZERO);
        Self {
            config,
            window: None,
            viewer,
            replay: script.map(InputScript::into_replay),
            recording,
            frame: 0,
            started: Instant::now(),
            dragging: false,
            last_cursor: None,
            look,
        }
    }

    fn on_keyboard(&mut self, event: &KeyEvent) {
        let Some(key) = key_name(&event.logical_key) else {
            return;
        };
        self.handle_key(&key, event.state == ElementState::Pressed, event.repeat);
    }

    /// Forward a key to the viewer. OS auto-repeat is dropped; only the
    /// first press and the release reach the viewer and the recorder.
    fn handle_key(&mut self, key: &str, pressed: bool, repeat: bool) -> Option<MoveKey> {
        if repeat {
            return None;
        }
        self.record(InputEvent::Key {
            key: key.to_string(),
            pressed,
        });
        let move_key = self.viewer.on_key(key, pressed)?;
        tracing::trace!(key, ?move_key, pressed, "movement key");
        Some(move_key)
    }

    fn record(&mut self, event: InputEvent) {
        if let Some((recorder, _)) = self.recording.as_mut() {
            recorder.record(event);
        }
    }

    /// Write the recorded session, if any. Returns where it went.
    fn finish_recording(&mut self) -> Result<Option<PathBuf>, ScriptError> {
        let Some((recorder, path)) = self.recording.take() else {
            return Ok(None);
        };
        let script = recorder.finish();
        script.save(&path)?;
        tracing::info!(path = %path.display(), events = script.events.len(), "input recorded");
        Ok(Some(path))
    }

    fn on_cursor(&mut self, position: PhysicalPosition<f64>) {
        let previous = self.last_cursor.replace(position);
        // Headset pose owns the camera in VR.
        if !self.dragging || self.viewer.mode() == Mode::Vr {
            return;
        }
        let Some(previous) = previous else {
            return;
        };

        let delta = Vec2::new((position.x - previous.x) as f32, (position.y - previous.y) as f32);
        self.look.x += delta.x * LOOK_SENSITIVITY;
        self.look.y = (self.look.y + delta.y * LOOK_SENSITIVITY).clamp(-1.5, 1.5);

        let position = self.viewer.active_camera().map(|c| c.position()).unwrap_or(Vec3::ZERO);
        let orientation = math::quat_from_euler(Vec3::new(self.look.y, self.look.x, 0.0));
        self.viewer.set_camera_pose(position, orientation);
        self.record(InputEvent::CameraPose { position, orientation });
    }

    fn redraw(&mut self) {
        if let Some(replay) = self.replay.as_mut() {
            replay.apply_due(self.frame, &mut self.viewer);
        }
        let time_ms = self.started.elapsed().as_secs_f64() * 1000.0;
        self.viewer.frame(time_ms);
        self.frame += 1;
        if let Some((recorder, _)) = self.recording.as_mut() {
            recorder.next_frame();
        }
    }
}

impl ApplicationHandler for ViewerApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }
        match event_loop.create_window(window_attributes(&self.config)) {
            Ok(window) => {
                tracing::info!(title = %self.config.title, "window created");
                self.window = Some(window);
            }
            Err(err) => {
                tracing::error!(error = %err, "failed to create window");
                event_loop.exit();
            }
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _window_id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => {
                tracing::info!(frames = self.frame, "window closed");
                if let Err(err) = self.finish_recording() {
                    tracing::error!(error = %err, "failed to save input recording");
                }
                event_loop.exit();
            }
            WindowEvent::KeyboardInput { event, .. } => self.on_keyboard(&event),
            WindowEvent::MouseInput { state, button, .. } => {
                if button == MouseButton::Left {
                    self.dragging = state == ElementState::Pressed;
                }
            }
            WindowEvent::CursorMoved { position, .. } => self.on_cursor(position),
            WindowEvent::RedrawRequested => {
                self.redraw();
                if let Some(window) = &self.window {
                    window.request_redraw();
                }
            }
            _ => {}
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }
}

/// Run the viewer in a window until it is closed. With a recorder, host
/// input is saved to its path on close.
pub fn run(viewer: Viewer, script: Option<InputScript>, recording: Option<(InputRecorder, PathBuf)>) -> Result<()> {
    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = ViewerApp::new(WindowConfig::default(), viewer, script, recording);
    event_loop.run_app(&mut app)?;
    Ok(())
}
