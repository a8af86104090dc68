// Keyhint Modifier State
// Shift / caps-lock tracking that drives character mapping

use crate::input::KeyEvent;
use crate::VirtualKey;

/// Modifier flags that affect which character a key produces
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ModifierState {
    pub shift_pressed: bool,
    pub caps_lock_on: bool,
}

impl ModifierState {
    /// Effective shift for letters: shift and caps-lock cancel each other out
    pub fn letters_uppercase(&self) -> bool {
        self.shift_pressed ^ self.caps_lock_on
    }
}

/// Maintains `ModifierState` from observed key transitions.
///
/// Shift keys follow the key state directly. Caps-lock toggles on key-down
/// only; its key-up is ignored.
#[derive(Debug, Clone, Default)]
pub struct ModifierStateTracker {
    state: ModifierState,
}

impl ModifierStateTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the caps-lock flag from the OS indicator at startup
    pub fn with_caps_lock(caps_lock_on: bool) -> Self {
        Self {
            state: ModifierState {
                shift_pressed: false,
                caps_lock_on,
            },
        }
    }

    /// Apply a key event and return the resulting state
    pub fn update(&mut self, event: &KeyEvent) -> ModifierState {
        let key = event.virtual_key;
        if key.is_shift() {
            self.state.shift_pressed = !event.is_key_up;
        } else if key == VirtualKey::CAPITAL && !event.is_key_up {
            self.state.caps_lock_on = !self.state.caps_lock_on;
        }
        self.state
    }

    pub fn state(&self) -> ModifierState {
        self.state
    }
}
