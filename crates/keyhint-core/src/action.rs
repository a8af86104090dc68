use std::fmt;

/// Direction of a key transition.
///
/// Numeric values match evdev's EV_KEY event values:
///   0 == 'released'
///   1 == 'pressed'
///   2 == 'repeated'
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(i32)]
pub enum Action {
    Release = 0,
    Press = 1,
    Repeat = 2,
}

impl Action {
    /// Build from the normalized `is_key_up` flag
    pub fn from_key_up(is_key_up: bool) -> Self {
        if is_key_up {
            Action::Release
        } else {
            Action::Press
        }
    }

    /// Returns true for the key-up transition
    pub fn is_key_up(self) -> bool {
        matches!(self, Action::Release)
    }

    /// Returns true only if this is a PRESS event (not REPEAT)
    pub fn just_pressed(self) -> bool {
        matches!(self, Action::Press)
    }

    /// Create Action from an evdev event value
    pub fn from_i32(value: i32) -> Option<Self> {
        match value {
            0 => Some(Action::Release),
            1 => Some(Action::Press),
            2 => Some(Action::Repeat),
            _ => None,
        }
    }

    /// Convert Action to its evdev event value
    pub fn to_i32(self) -> i32 {
        self as i32
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Release => write!(f, "keyup"),
            Action::Press => write!(f, "keydown"),
            Action::Repeat => write!(f, "repeat"),
        }
    }
}
