// Keyhint Input Layer - Normalized Events
// Platform-independent keyboard and mouse button events

use strum_macros::{Display, EnumString};

use crate::{Action, Side, VirtualKey};

/// A single physical key transition, normalized at the OS boundary
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyEvent {
    /// Monotonic timestamp in microseconds
    pub timestamp: u64,
    pub virtual_key: VirtualKey,
    pub side: Side,
    pub is_key_up: bool,
    /// Auto-repeat key-down generated by the OS while the key is held
    pub is_repeat: bool,
    pub cursor_position: (i32, i32),
}

impl KeyEvent {
    pub fn new(timestamp: u64, virtual_key: VirtualKey, is_key_up: bool) -> Self {
        Self {
            timestamp,
            virtual_key,
            side: Side::Unspecified,
            is_key_up,
            is_repeat: false,
            cursor_position: (0, 0),
        }
    }

    /// Build from an evdev-style transition; `Repeat` is a key-down flagged as repeat
    pub fn from_action(timestamp: u64, virtual_key: VirtualKey, action: Action) -> Self {
        let mut event = Self::new(timestamp, virtual_key, action.is_key_up());
        event.is_repeat = action == Action::Repeat;
        event
    }

    pub fn with_side(mut self, side: Side) -> Self {
        self.side = side;
        self
    }

    pub fn at(mut self, cursor_position: (i32, i32)) -> Self {
        self.cursor_position = cursor_position;
        self
    }

    /// Right-located variant of a key that shares one virtual key code
    pub fn is_extended(&self) -> bool {
        self.side == Side::Right
    }

    pub fn action(&self) -> Action {
        if self.is_repeat {
            Action::Repeat
        } else {
            Action::from_key_up(self.is_key_up)
        }
    }
}

/// Mouse buttons that are logged
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum MouseButton {
    Left,
    Right,
    Middle,
}

/// A mouse button transition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MouseButtonEvent {
    pub timestamp: u64,
    pub button: MouseButton,
    pub is_button_up: bool,
    pub cursor_position: (i32, i32),
}

/// Any normalized input event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    Keyboard(KeyEvent),
    Mouse(MouseButtonEvent),
}

impl InputEvent {
    pub fn timestamp(&self) -> u64 {
        match self {
            InputEvent::Keyboard(e) => e.timestamp,
            InputEvent::Mouse(e) => e.timestamp,
        }
    }

    pub fn cursor_position(&self) -> (i32, i32) {
        match self {
            InputEvent::Keyboard(e) => e.cursor_position,
            InputEvent::Mouse(e) => e.cursor_position,
        }
    }
}

impl From<KeyEvent> for InputEvent {
    fn from(event: KeyEvent) -> Self {
        InputEvent::Keyboard(event)
    }
}

impl From<MouseButtonEvent> for InputEvent {
    fn from(event: MouseButtonEvent) -> Self {
        InputEvent::Mouse(event)
    }
}

/// Check if a key event is the shutdown trigger.
///
/// Escape key-down is the designated exit signal for the host application.
pub fn is_shutdown_key(event: &KeyEvent) -> bool {
    event.virtual_key == VirtualKey::ESCAPE && !event.is_key_up
}
