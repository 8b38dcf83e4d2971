//! Input abstraction layer.
//!
//! Normalizes host pointer, wheel and keyboard events into a unified
//! `InputEvent` enum consumed by the editing sessions. Coordinates are in
//! screen space (host surface pixels).

use serde::{Deserialize, Serialize};

/// Modifier keys held while an event fired.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
}

impl Modifiers {
    pub const NONE: Self = Self {
        shift: false,
        ctrl: false,
        alt: false,
        meta: false,
    };

    /// ⌘ on macOS, Ctrl elsewhere.
    pub fn command(&self) -> bool {
        self.ctrl || self.meta
    }

    /// Holding the command key turns a pointer-down into a pan, even over a node.
    pub fn forces_pan(&self) -> bool {
        self.command()
    }
}

/// A normalized input event from the host surface.
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    PointerDown { x: f32, y: f32, modifiers: Modifiers },
    PointerMove { x: f32, y: f32, modifiers: Modifiers },
    PointerUp { x: f32, y: f32, modifiers: Modifiers },

    /// Wheel or trackpad scroll. Negative `dy` zooms in around `(x, y)`.
    Wheel {
        dx: f32,
        dy: f32,
        x: f32,
        y: f32,
        modifiers: Modifiers,
    },

    /// `key` is the `KeyboardEvent.key` value (e.g. `"Escape"`, `"+"`).
    Key { key: String, modifiers: Modifiers },
}

impl InputEvent {
    pub fn from_pointer_down(x: f32, y: f32, modifiers: Modifiers) -> Self {
        Self::PointerDown { x, y, modifiers }
    }

    pub fn from_pointer_move(x: f32, y: f32, modifiers: Modifiers) -> Self {
        Self::PointerMove { x, y, modifiers }
    }

    pub fn from_pointer_up(x: f32, y: f32, modifiers: Modifiers) -> Self {
        Self::PointerUp { x, y, modifiers }
    }

    pub fn key(key: impl Into<String>, modifiers: Modifiers) -> Self {
        Self::Key {
            key: key.into(),
            modifiers,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn command_covers_ctrl_and_meta() {
        assert!(!Modifiers::NONE.command());
        let ctrl = Modifiers {
            ctrl: true,
            ..Modifiers::NONE
        };
        let meta = Modifiers {
            meta: true,
            ..Modifiers::NONE
        };
        assert!(ctrl.forces_pan());
        assert!(meta.forces_pan());
        let shift = Modifiers {
            shift: true,
            ..Modifiers::NONE
        };
        assert!(!shift.forces_pan());
    }

    #[test]
    fn constructors_keep_coordinates() {
        let shift = Modifiers {
            shift: true,
            ..Modifiers::NONE
        };
        assert_eq!(
            InputEvent::from_pointer_up(4.0, 8.0, shift),
            InputEvent::PointerUp {
                x: 4.0,
                y: 8.0,
                modifiers: shift,
            }
        );
        assert_eq!(
            InputEvent::key("Escape", Modifiers::NONE),
            InputEvent::Key {
                key: "Escape".to_string(),
                modifiers: Modifiers::NONE,
            }
        );
    }
}
