//! Keyboard movement input
//!
//! Host code forwards key-down/key-up events here; the player controller
//! reads the derived axes once per frame. Each axis is a single value that
//! the latest key-down overwrites and any release on that axis clears, so
//! holding the opposite key does not bring its contribution back.

use serde::{Deserialize, Serialize};

/// Logical movement keys.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MoveKey {
    Forward,
    Back,
    Left,
    Right,
}

impl MoveKey {
    pub const ALL: [MoveKey; 4] = [MoveKey::Forward, MoveKey::Back, MoveKey::Left, MoveKey::Right];

    /// Signed contribution of this key to its axis.
    pub fn contribution(self) -> i8 {
        match self {
            MoveKey::Forward | MoveKey::Right => 1,
            MoveKey::Back | MoveKey::Left => -1,
        }
    }

    pub fn is_vertical(self) -> bool {
        matches!(self, MoveKey::Forward | MoveKey::Back)
    }
}

/// Host key identifiers bound to each movement key (matched case-insensitively).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeyBindings {
    pub forward: Vec<String>,
    pub back: Vec<String>,
    pub left: Vec<String>,
    pub right: Vec<String>,
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self {
            forward: vec!["w".to_string()],
            back: vec!["s".to_string()],
            left: vec!["a".to_string()],
            right: vec!["d".to_string()],
        }
    }
}

impl KeyBindings {
    /// Resolve a host key identifier to a movement key.
    pub fn lookup(&self, key: &str) -> Option<MoveKey> {
        let key = key.to_lowercase();
        MoveKey::ALL
            .into_iter()
            .find(|k| self.keys_for(*k).iter().any(|bound| bound.to_lowercase() == key))
    }

    pub fn keys_for(&self, key: MoveKey) -> &[String] {
        match key {
            MoveKey::Forward => &self.forward,
            MoveKey::Back => &self.back,
            MoveKey::Left => &self.left,
            MoveKey::Right => &self.right,
        }
    }
}

/// Held movement keys and the axes derived from them.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct InputState {
    up: bool,
    left: bool,
    down: bool,
    right: bool,
    horizontal: i8,
    vertical: i8,
    is_moving: bool,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_key_down(&mut self, key: MoveKey) {
        *self.flag_mut(key) = true;
        self.is_moving = true;
        *self.axis_mut(key) = key.contribution();
    }

    pub fn on_key_up(&mut self, key: MoveKey) {
        *self.flag_mut(key) = false;
        *self.axis_mut(key) = 0;
        if !(self.up || self.left || self.down || self.right) {
            self.is_moving = false;
        }
    }

    pub fn is_moving(&self) -> bool {
        self.is_moving
    }

    /// Right is +1, left is -1.
    pub fn horizontal(&self) -> i8 {
        self.horizontal
    }

    /// Forward is +1, back is -1.
    pub fn vertical(&self) -> i8 {
        self.vertical
    }

    pub fn is_held(&self, key: MoveKey) -> bool {
        match key {
            MoveKey::Forward => self.up,
            MoveKey::Back => self.down,
            MoveKey::Left => self.left,
            MoveKey::Right => self.right,
        }
    }

    /// Release every key, e.g. when the host window loses focus.
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    fn flag_mut(&mut self, key: MoveKey) -> &mut bool {
        match key {
            MoveKey::Forward => &mut self.up,
            MoveKey::Back => &mut self.down,
            MoveKey::Left => &mut self.left,
            MoveKey::Right => &mut self.right,
        }
    }

    fn axis_mut(&mut self, key: MoveKey) -> &mut i8 {
        if key.is_vertical() {
            &mut self.vertical
        } else {
            &mut self.horizontal
        }
    }
}
