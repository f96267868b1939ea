//! Symbolic key names and the per-frame keyboard state.

use std::collections::HashSet;

/// Symbolic name for a keyboard key. Only the keys the harness has a use for
/// are mapped; everything else is dropped at the platform boundary.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum Key {
    /// The Escape key, next to F1. The default exit key.
    Escape,
    Space,
    Return,
    Left,
    Right,
    Up,
    Down,
    W,
    A,
    S,
    D,
}

/// Tracks which keys are currently held down, fed by the platform event
/// stream and queried once per frame by the run loop.
#[derive(Debug, Default)]
pub struct KeyboardState {
    pressed: HashSet<Key>,
}

impl KeyboardState {
    pub fn new() -> Self {
        Default::default()
    }

    #[inline]
    pub fn press(&mut self, key: Key) {
        self.pressed.insert(key);
    }

    #[inline]
    pub fn release(&mut self, key: Key) {
        self.pressed.remove(&key);
    }

    #[inline]
    pub fn is_pressed(&self, key: Key) -> bool {
        self.pressed.contains(&key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn press_release() {
        let mut keyboard = KeyboardState::new();
        assert!(!keyboard.is_pressed(Key::Escape));

        keyboard.press(Key::Escape);
        keyboard.press(Key::Escape);
        assert!(keyboard.is_pressed(Key::Escape));
        assert!(!keyboard.is_pressed(Key::Space));

        keyboard.release(Key::Escape);
        assert!(!keyboard.is_pressed(Key::Escape));
    }
}
