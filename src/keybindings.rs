//! Customizable keybindings for BILT.
//!
//! This module defines the keybinding configuration for label hotkeys,
//! navigation, and the two control combinations (focus the label input, open
//! the shortcuts reference). Bindings are data, not hard-coded matches, so the
//! shortcuts reference table is always derived from what is actually bound.

use serde::{Deserialize, Serialize};

/// Maximum number of labels that can have digit hotkeys (keys 1-9).
///
/// Labels beyond the ninth remain reachable through the free-text input.
pub const MAX_LABEL_HOTKEYS: usize = 9;

/// A physical key, independent of keyboard layer state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum KeyCode {
    A,
    B,
    C,
    D,
    E,
    F,
    G,
    H,
    I,
    J,
    K,
    L,
    M,
    N,
    O,
    P,
    Q,
    R,
    S,
    T,
    U,
    V,
    W,
    X,
    Y,
    Z,
    Key0,
    Key1,
    Key2,
    Key3,
    Key4,
    Key5,
    Key6,
    Key7,
    Key8,
    Key9,
    ArrowLeft,
    ArrowRight,
    ArrowUp,
    ArrowDown,
    Enter,
    Escape,
    Space,
    Tab,
    Backspace,
    Delete,
}

impl KeyCode {
    /// Parse a browser `KeyboardEvent.key` value.
    ///
    /// Returns `None` for keys the dispatcher has no use for (modifiers,
    /// function keys, IME events).
    pub fn from_browser_key(key: &str) -> Option<Self> {
        let code = match key {
            "0" => KeyCode::Key0,
            "1" => KeyCode::Key1,
            "2" => KeyCode::Key2,
            "3" => KeyCode::Key3,
            "4" => KeyCode::Key4,
            "5" => KeyCode::Key5,
            "6" => KeyCode::Key6,
            "7" => KeyCode::Key7,
            "8" => KeyCode::Key8,
            "9" => KeyCode::Key9,
            "ArrowLeft" => KeyCode::ArrowLeft,
            "ArrowRight" => KeyCode::ArrowRight,
            "ArrowUp" => KeyCode::ArrowUp,
            "ArrowDown" => KeyCode::ArrowDown,
            "Enter" => KeyCode::Enter,
            "Escape" => KeyCode::Escape,
            " " => KeyCode::Space,
            "Tab" => KeyCode::Tab,
            "Backspace" => KeyCode::Backspace,
            "Delete" => KeyCode::Delete,
            _ => {
                let mut chars = key.chars();
                let (c, rest) = (chars.next()?, chars.next());
                if rest.is_some() {
                    return None;
                }
                match c.to_ascii_lowercase() {
                    'a' => KeyCode::A,
                    'b' => KeyCode::B,
                    'c' => KeyCode::C,
                    'd' => KeyCode::D,
                    'e' => KeyCode::E,
                    'f' => KeyCode::F,
                    'g' => KeyCode::G,
                    'h' => KeyCode::H,
                    'i' => KeyCode::I,
                    'j' => KeyCode::J,
                    'k' => KeyCode::K,
                    'l' => KeyCode::L,
                    'm' => KeyCode::M,
                    'n' => KeyCode::N,
                    'o' => KeyCode::O,
                    'p' => KeyCode::P,
                    'q' => KeyCode::Q,
                    'r' => KeyCode::R,
                    's' => KeyCode::S,
                    't' => KeyCode::T,
                    'u' => KeyCode::U,
                    'v' => KeyCode::V,
                    'w' => KeyCode::W,
                    'x' => KeyCode::X,
                    'y' => KeyCode::Y,
                    'z' => KeyCode::Z,
                    _ => return None,
                }
            }
        };
        Some(code)
    }
}

/// Modifier state accompanying a key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Modifiers {
    /// Control key held
    pub ctrl: bool,
    /// Shift key held
    pub shift: bool,
    /// Alt key held
    pub alt: bool,
}

impl Modifiers {
    /// No modifiers held.
    pub const NONE: Modifiers = Modifiers {
        ctrl: false,
        shift: false,
        alt: false,
    };

    /// Control only.
    pub const CTRL: Modifiers = Modifiers {
        ctrl: true,
        shift: false,
        alt: false,
    };
}

/// A key plus the control requirement, for the two combo shortcuts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Binding {
    /// The bound key
    pub key: KeyCode,
    /// Whether Control must be held
    pub ctrl: bool,
}

impl Binding {
    /// Create a Ctrl+key binding.
    pub fn ctrl(key: KeyCode) -> Self {
        Self { key, ctrl: true }
    }

    /// Check whether a key press matches this binding.
    pub fn matches(&self, key: KeyCode, modifiers: Modifiers) -> bool {
        self.key == key && self.ctrl == modifiers.ctrl
    }

    /// Display string like "Ctrl+I".
    pub fn label(&self) -> String {
        if self.ctrl {
            format!("Ctrl+{}", key_to_string(self.key))
        } else {
            key_to_string(self.key).to_string()
        }
    }
}

/// One row of the shortcuts reference table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ShortcutRow {
    /// Display string for the key(s)
    pub keys: String,
    /// What the key does
    pub action: String,
}

/// Keybinding configuration for the application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyBindings {
    /// Combo that focuses the free-text label input
    pub focus_input: Binding,
    /// Combo that opens the shortcuts reference page
    pub open_shortcuts: Binding,
    /// Key that advances to the next image
    pub next_image: KeyCode,
    /// Key that returns to the previous image
    pub prev_image: KeyCode,
    /// Hotkeys for label selection (slot i maps to the i-th distinct label)
    /// None means no hotkey assigned for that slot
    pub label_hotkeys: [Option<KeyCode>; MAX_LABEL_HOTKEYS],
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self {
            focus_input: Binding::ctrl(KeyCode::I),
            open_shortcuts: Binding::ctrl(KeyCode::H),
            next_image: KeyCode::ArrowRight,
            prev_image: KeyCode::ArrowLeft,

            // Default label hotkeys: 1-9 for the first nine distinct labels
            label_hotkeys: [
                Some(KeyCode::Key1),
                Some(KeyCode::Key2),
                Some(KeyCode::Key3),
                Some(KeyCode::Key4),
                Some(KeyCode::Key5),
                Some(KeyCode::Key6),
                Some(KeyCode::Key7),
                Some(KeyCode::Key8),
                Some(KeyCode::Key9),
            ],
        }
    }
}

impl KeyBindings {
    /// Create new keybindings with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the label slot (0-based) that corresponds to a key press, if any.
    pub fn label_index_for_key(&self, key: KeyCode) -> Option<usize> {
        self.label_hotkeys
            .iter()
            .enumerate()
            .find(|(_, hotkey)| **hotkey == Some(key))
            .map(|(index, _)| index)
    }

    /// Get the hotkey for a label slot, if any.
    pub fn key_for_label_index(&self, index: usize) -> Option<KeyCode> {
        self.label_hotkeys.get(index).copied().flatten()
    }

    /// Set the hotkey for a label slot.
    pub fn set_label_key(&mut self, index: usize, key: Option<KeyCode>) {
        if index < MAX_LABEL_HOTKEYS {
            self.label_hotkeys[index] = key;
        }
    }

    /// Check if an unmodified key is already used by any binding.
    /// Returns a description of what it's used for, if anything.
    pub fn key_conflict(&self, key: KeyCode) -> Option<String> {
        if key == self.next_image {
            return Some("Next image".to_string());
        }
        if key == self.prev_image {
            return Some("Previous image".to_string());
        }
        for (i, hotkey) in self.label_hotkeys.iter().enumerate() {
            if *hotkey == Some(key) {
                return Some(format!("Label {}", i + 1));
            }
        }
        None
    }

    /// Display string for the assigned hotkey slots, e.g. "1-9".
    ///
    /// Falls back to a comma-separated list when the assigned keys are not a
    /// contiguous digit run.
    pub fn label_hotkeys_label(&self) -> String {
        let keys: Vec<&'static str> = self
            .label_hotkeys
            .iter()
            .flatten()
            .map(|k| key_to_string(*k))
            .collect();
        if keys.is_empty() {
            return "-".to_string();
        }

        let digit_run: Vec<String> = (1..=keys.len()).map(|i| i.to_string()).collect();
        if keys == digit_run.iter().map(String::as_str).collect::<Vec<_>>() {
            format!("{}-{}", keys[0], keys[keys.len() - 1])
        } else {
            keys.join(", ")
        }
    }

    /// Build the shortcuts reference table from the live bindings.
    ///
    /// The host page renders this table verbatim, so it can never drift from
    /// what the dispatcher actually does.
    pub fn reference(&self) -> Vec<ShortcutRow> {
        vec![
            ShortcutRow {
                keys: self.focus_input.label(),
                action: "Insert new classification".to_string(),
            },
            ShortcutRow {
                keys: self.open_shortcuts.label(),
                action: "View shortcuts".to_string(),
            },
            ShortcutRow {
                keys: self.label_hotkeys_label(),
                action: "Assign classification".to_string(),
            },
            ShortcutRow {
                keys: format!(
                    "{} / {}",
                    key_to_string(self.prev_image),
                    key_to_string(self.next_image)
                ),
                action: "Previous / next image".to_string(),
            },
        ]
    }
}

/// Convert a KeyCode to a display string.
pub fn key_to_string(key: KeyCode) -> &'static str {
    match key {
        KeyCode::A => "A",
        KeyCode::B => "B",
        KeyCode::C => "C",
        KeyCode::D => "D",
        KeyCode::E => "E",
        KeyCode::F => "F",
        KeyCode::G => "G",
        KeyCode::H => "H",
        KeyCode::I => "I",
        KeyCode::J => "J",
        KeyCode::K => "K",
        KeyCode::L => "L",
        KeyCode::M => "M",
        KeyCode::N => "N",
        KeyCode::O => "O",
        KeyCode::P => "P",
        KeyCode::Q => "Q",
        KeyCode::R => "R",
        KeyCode::S => "S",
        KeyCode::T => "T",
        KeyCode::U => "U",
        KeyCode::V => "V",
        KeyCode::W => "W",
        KeyCode::X => "X",
        KeyCode::Y => "Y",
        KeyCode::Z => "Z",
        KeyCode::Key0 => "0",
        KeyCode::Key1 => "1",
        KeyCode::Key2 => "2",
        KeyCode::Key3 => "3",
        KeyCode::Key4 => "4",
        KeyCode::Key5 => "5",
        KeyCode::Key6 => "6",
        KeyCode::Key7 => "7",
        KeyCode::Key8 => "8",
        KeyCode::Key9 => "9",
        KeyCode::ArrowLeft => "Left",
        KeyCode::ArrowRight => "Right",
        KeyCode::ArrowUp => "Up",
        KeyCode::ArrowDown => "Down",
        KeyCode::Enter => "Enter",
        KeyCode::Escape => "Escape",
        KeyCode::Space => "Space",
        KeyCode::Tab => "Tab",
        KeyCode::Backspace => "Backspace",
        KeyCode::Delete => "Delete",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_browser_key() {
        assert_eq!(KeyCode::from_browser_key("1"), Some(KeyCode::Key1));
        assert_eq!(KeyCode::from_browser_key("9"), Some(KeyCode::Key9));
        assert_eq!(KeyCode::from_browser_key("i"), Some(KeyCode::I));
        assert_eq!(KeyCode::from_browser_key("I"), Some(KeyCode::I));
        assert_eq!(
            KeyCode::from_browser_key("ArrowRight"),
            Some(KeyCode::ArrowRight)
        );
        assert_eq!(KeyCode::from_browser_key("Enter"), Some(KeyCode::Enter));
        assert_eq!(KeyCode::from_browser_key(" "), Some(KeyCode::Space));
        assert_eq!(KeyCode::from_browser_key("Shift"), None);
        assert_eq!(KeyCode::from_browser_key("F5"), None);
        assert_eq!(KeyCode::from_browser_key("é"), None);
    }

    #[test]
    fn test_default_label_hotkeys() {
        let bindings = KeyBindings::new();
        assert_eq!(bindings.label_index_for_key(KeyCode::Key1), Some(0));
        assert_eq!(bindings.label_index_for_key(KeyCode::Key9), Some(8));
        assert_eq!(bindings.label_index_for_key(KeyCode::Key0), None);
        assert_eq!(bindings.key_for_label_index(3), Some(KeyCode::Key4));
        assert_eq!(bindings.key_for_label_index(MAX_LABEL_HOTKEYS), None);
    }

    #[test]
    fn test_combo_matching() {
        let bindings = KeyBindings::default();
        assert!(bindings.focus_input.matches(KeyCode::I, Modifiers::CTRL));
        assert!(!bindings.focus_input.matches(KeyCode::I, Modifiers::NONE));
        assert!(bindings.open_shortcuts.matches(KeyCode::H, Modifiers::CTRL));
        assert_eq!(bindings.focus_input.label(), "Ctrl+I");
    }

    #[test]
    fn test_key_conflict() {
        let bindings = KeyBindings::default();
        assert_eq!(
            bindings.key_conflict(KeyCode::Key3),
            Some("Label 3".to_string())
        );
        assert_eq!(
            bindings.key_conflict(KeyCode::ArrowRight),
            Some("Next image".to_string())
        );
        assert_eq!(bindings.key_conflict(KeyCode::Q), None);
    }

    #[test]
    fn test_reference_table_matches_defaults() {
        let rows = KeyBindings::default().reference();
        assert_eq!(rows[0].keys, "Ctrl+I");
        assert_eq!(rows[0].action, "Insert new classification");
        assert_eq!(rows[1].keys, "Ctrl+H");
        assert_eq!(rows[2].keys, "1-9");
        assert_eq!(rows[2].action, "Assign classification");
        assert_eq!(rows[3].keys, "Left / Right");
    }

    #[test]
    fn test_reference_tracks_rebinding() {
        let mut bindings = KeyBindings::default();
        bindings.set_label_key(8, None);
        assert_eq!(bindings.label_hotkeys_label(), "1-8");

        bindings.set_label_key(0, Some(KeyCode::A));
        assert!(bindings.label_hotkeys_label().starts_with("A, "));
    }

    #[test]
    fn test_keybindings_serde_round_trip() {
        let bindings = KeyBindings::default();
        let json = serde_json::to_string(&bindings).unwrap();
        let back: KeyBindings = serde_json::from_str(&json).unwrap();
        assert_eq!(back, bindings);
    }
}
