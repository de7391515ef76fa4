//! Vantage Services Layer
//!
//! Settings and input scripting for the viewer hosts.

pub mod input;
pub mod settings;

pub use input::{InputEvent, InputRecorder, InputScript, Replay, ScriptError, ScriptedEvent};
pub use settings::{Settings, SettingsError};
