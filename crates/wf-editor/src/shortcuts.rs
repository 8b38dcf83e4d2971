//! Keyboard shortcut mapping for the flow canvas.
//!
//! Maps key + modifier combos to semantic `ShortcutAction`s. The map lives
//! in Rust so every host binds the same keys.

use crate::input::Modifiers;

/// Actions that keyboard shortcuts can trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShortcutAction {
    // ── Modes ──
    /// Abort a pending connection or node drag.
    Cancel,
    /// Enter connection mode with the selected node as source.
    ConnectFromSelection,

    // ── Edit ──
    DeleteSelection,

    // ── View ──
    ZoomIn,
    ZoomOut,
    ResetView,
    FitToContent,
}

impl ShortcutAction {
    /// Stable camelCase name reported to the host.
    pub fn name(self) -> &'static str {
        match self {
            ShortcutAction::Cancel => "cancel",
            ShortcutAction::ConnectFromSelection => "connectFromSelection",
            ShortcutAction::DeleteSelection => "deleteSelection",
            ShortcutAction::ZoomIn => "zoomIn",
            ShortcutAction::ZoomOut => "zoomOut",
            ShortcutAction::ResetView => "resetView",
            ShortcutAction::FitToContent => "fitToContent",
        }
    }
}

/// Resolves key events into shortcut actions.
///
/// View shortcuts answer with or without the command key (⌘ on macOS,
/// Ctrl elsewhere) so `⌘+` / `⌘-` / `⌘0` behave like a browser zoom.
/// Editing keys only fire without it.
pub struct ShortcutMap;

impl ShortcutMap {
    /// Resolve a key event to an action.
    ///
    /// `key` is the `KeyboardEvent.key` value (e.g. `"c"`, `"Delete"`).
    /// Returns `None` if the key combo has no binding.
    pub fn resolve(key: &str, modifiers: Modifiers) -> Option<ShortcutAction> {
        // ── View keys (any command state) ──
        match key {
            "=" | "+" => return Some(ShortcutAction::ZoomIn),
            "-" | "_" => return Some(ShortcutAction::ZoomOut),
            "0" => return Some(ShortcutAction::ResetView),
            "Escape" => return Some(ShortcutAction::Cancel),
            _ => {}
        }

        if modifiers.command() {
            return None;
        }

        if modifiers.shift {
            return match key {
                "f" | "F" => Some(ShortcutAction::FitToContent),
                _ => None,
            };
        }

        // ── Single keys (no modifiers) ──
        match key {
            "Delete" | "Backspace" => Some(ShortcutAction::DeleteSelection),
            "c" | "C" => Some(ShortcutAction::ConnectFromSelection),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SHIFT: Modifiers = Modifiers {
        shift: true,
        ctrl: false,
        alt: false,
        meta: false,
    };
    const META: Modifiers = Modifiers {
        shift: false,
        ctrl: false,
        alt: false,
        meta: true,
    };

    #[test]
    fn resolve_view_shortcuts() {
        assert_eq!(
            ShortcutMap::resolve("+", Modifiers::NONE),
            Some(ShortcutAction::ZoomIn)
        );
        assert_eq!(
            ShortcutMap::resolve("=", META),
            Some(ShortcutAction::ZoomIn)
        );
        assert_eq!(
            ShortcutMap::resolve("-", Modifiers::NONE),
            Some(ShortcutAction::ZoomOut)
        );
        assert_eq!(
            ShortcutMap::resolve("0", META),
            Some(ShortcutAction::ResetView)
        );
    }

    #[test]
    fn fit_needs_shift() {
        assert_eq!(
            ShortcutMap::resolve("F", SHIFT),
            Some(ShortcutAction::FitToContent)
        );
        assert_eq!(ShortcutMap::resolve("f", Modifiers::NONE), None);
    }

    #[test]
    fn resolve_edit_shortcuts() {
        assert_eq!(
            ShortcutMap::resolve("Escape", Modifiers::NONE),
            Some(ShortcutAction::Cancel)
        );
        assert_eq!(
            ShortcutMap::resolve("Backspace", Modifiers::NONE),
            Some(ShortcutAction::DeleteSelection)
        );
        assert_eq!(
            ShortcutMap::resolve("c", Modifiers::NONE),
            Some(ShortcutAction::ConnectFromSelection)
        );
    }

    #[test]
    fn command_combos_are_left_to_the_host() {
        // ⌘C is copy, not connect.
        assert_eq!(ShortcutMap::resolve("c", META), None);
        assert_eq!(ShortcutMap::resolve("Delete", META), None);
        assert_eq!(ShortcutMap::resolve("x", Modifiers::NONE), None);
    }
}
