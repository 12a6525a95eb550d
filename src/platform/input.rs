//! Browser key names to scene input
//!
//! Pure mapping so the native tests can cover it; the DOM listeners in
//! `main.rs` only forward `KeyboardEvent::key()` strings here.

use crate::sim::{InputEvent, Key, TickInput};

/// Movement keys currently held down
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HeldKeys {
    pub primary_left: bool,
    pub primary_right: bool,
    pub secondary_left: bool,
    pub secondary_right: bool,
}

impl HeldKeys {
    /// Update from a keydown (`down = true`) or keyup.
    ///
    /// Returns true if the key is a movement key.
    pub fn set(&mut self, key: &str, down: bool) -> bool {
        let slot = match key {
            "ArrowLeft" => &mut self.primary_left,
            "ArrowRight" => &mut self.primary_right,
            "a" | "A" => &mut self.secondary_left,
            "d" | "D" => &mut self.secondary_right,
            _ => return false,
        };
        *slot = down;
        true
    }

    /// Release everything (window lost focus)
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn to_tick_input(self, now_ms: f64) -> TickInput {
        TickInput {
            now_ms,
            primary_left: self.primary_left,
            primary_right: self.primary_right,
            secondary_left: self.secondary_left,
            secondary_right: self.secondary_right,
        }
    }
}

/// Discrete meaning of a key name
pub fn map_key(key: &str) -> Key {
    match key {
        " " | "Spacebar" => Key::Jump,
        "w" | "W" => Key::SecondaryJump,
        "Enter" => Key::Confirm,
        "Backspace" => Key::Backspace,
        _ => Key::Other,
    }
}

/// Events produced by one keydown, in delivery order.
///
/// `typed` is false for shortcut chords (Ctrl/Meta held); those still count
/// as key presses but never insert text.
pub fn key_events(key: &str, typed: bool) -> Vec<InputEvent> {
    let mut events = vec![InputEvent::KeyPressed(map_key(key))];
    let mut chars = key.chars();
    if let (true, Some(c), None) = (typed, chars.next(), chars.next()) {
        events.push(InputEvent::CharTyped(c));
    }
    events
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_held_keys_track_down_and_up() {
        let mut held = HeldKeys::default();
        assert!(held.set("ArrowLeft", true));
        assert!(held.set("d", true));
        assert!(!held.set("w", true));

        let input = held.to_tick_input(16.0);
        assert!(input.primary_left);
        assert!(input.secondary_right);
        assert!(!input.primary_right);
        assert_eq!(input.now_ms, 16.0);

        held.set("ArrowLeft", false);
        assert!(!held.primary_left);
        held.clear();
        assert_eq!(held, HeldKeys::default());
    }

    #[test]
    fn test_map_key() {
        assert_eq!(map_key(" "), Key::Jump);
        assert_eq!(map_key("W"), Key::SecondaryJump);
        assert_eq!(map_key("Enter"), Key::Confirm);
        assert_eq!(map_key("Backspace"), Key::Backspace);
        assert_eq!(map_key("ArrowUp"), Key::Other);
    }

    #[test]
    fn test_single_char_keys_also_type() {
        assert_eq!(
            key_events("w", true),
            vec![
                InputEvent::KeyPressed(Key::SecondaryJump),
                InputEvent::CharTyped('w')
            ]
        );
        assert_eq!(
            key_events("名", true),
            vec![InputEvent::KeyPressed(Key::Other), InputEvent::CharTyped('名')]
        );
        assert_eq!(key_events("Shift", true), vec![InputEvent::KeyPressed(Key::Other)]);
    }

    #[test]
    fn test_shortcut_chords_do_not_type() {
        assert_eq!(key_events("v", false), vec![InputEvent::KeyPressed(Key::Other)]);
        assert_eq!(
            key_events("w", false),
            vec![InputEvent::KeyPressed(Key::SecondaryJump)]
        );
    }
}
