use std::str::FromStr;

use groundplane_common::Point2;
use serde::{Deserialize, Serialize};

/// One of the four directional keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ControlKey {
    /// Towards -Z.
    Forward,
    /// Towards +Z.
    Backward,
    /// Towards -X.
    Left,
    /// Towards +X.
    Right,
}

impl ControlKey {
    /// Map a WASD letter (either case) to its key.
    pub fn from_wasd(c: char) -> Option<Self> {
        match c.to_ascii_lowercase() {
            'w' => Some(Self::Forward),
            's' => Some(Self::Backward),
            'a' => Some(Self::Left),
            'd' => Some(Self::Right),
            _ => None,
        }
    }
}

/// Errors from parsing a control string.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InputError {
    #[error("unknown control key {0:?}, expected one of w, a, s, d")]
    UnknownKey(char),
}

/// Held state of the directional keys for one tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Controls {
    pub forward: bool,
    pub backward: bool,
    pub left: bool,
    pub right: bool,
}

impl Controls {
    pub fn new() -> Self {
        Self::default()
    }

    /// Press or release a single key.
    pub fn set(&mut self, key: ControlKey, pressed: bool) {
        tracing::trace!(?key, pressed, "control changed");
        match key {
            ControlKey::Forward => self.forward = pressed,
            ControlKey::Backward => self.backward = pressed,
            ControlKey::Left => self.left = pressed,
            ControlKey::Right => self.right = pressed,
        }
    }

    /// Builder-style `set(key, true)`.
    pub fn with(mut self, key: ControlKey) -> Self {
        self.set(key, true);
        self
    }

    pub fn is_pressed(&self, key: ControlKey) -> bool {
        match key {
            ControlKey::Forward => self.forward,
            ControlKey::Backward => self.backward,
            ControlKey::Left => self.left,
            ControlKey::Right => self.right,
        }
    }

    /// True when no key is held.
    pub fn is_idle(&self) -> bool {
        !(self.forward || self.backward || self.left || self.right)
    }

    /// Net facing direction implied by the held keys.
    ///
    /// `side = (left - right, 0)`, `front = (0, backward - forward)`, and the
    /// direction is `front - side`. Opposing keys cancel here, so holding all
    /// four (or none) gives the zero vector.
    pub fn direction(&self) -> Point2 {
        let side = Point2::new(flag(self.left) - flag(self.right), 0.0);
        let front = Point2::new(0.0, flag(self.backward) - flag(self.forward));
        front - side
    }
}

fn flag(held: bool) -> f64 {
    if held { 1.0 } else { 0.0 }
}

impl FromStr for Controls {
    type Err = InputError;

    /// Parse a string of WASD letters, e.g. `"wd"` for forward + right.
    /// Whitespace is ignored and repeated letters are harmless.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.chars()
            .filter(|c| !c.is_whitespace())
            .try_fold(Controls::new(), |controls, c| {
                ControlKey::from_wasd(c)
                    .map(|key| controls.with(key))
                    .ok_or(InputError::UnknownKey(c))
            })
    }
}
