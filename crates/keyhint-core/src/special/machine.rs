// Keyhint Special Keys - Gesture State Machine
// Detects a monitored key pressed and released with no other key in between

use indexmap::IndexMap;

use crate::input::KeyEvent;
use crate::{Side, VirtualKey};

/// Phase of one monitored key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyPhase {
    Idle,
    Pressed,
    PressedWithCombo,
}

/// Per-key tracking data
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SpecialKeyTrackingState {
    pub is_pressed: bool,
    pub had_intervening_key: bool,
    pub press_timestamp: u64,
    pub press_position: (i32, i32),
}

impl SpecialKeyTrackingState {
    pub fn phase(&self) -> KeyPhase {
        match (self.is_pressed, self.had_intervening_key) {
            (false, _) => KeyPhase::Idle,
            (true, false) => KeyPhase::Pressed,
            (true, true) => KeyPhase::PressedWithCombo,
        }
    }
}

/// One completed press/release cycle of a monitored key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Gesture {
    pub key: VirtualKey,
    /// Side reported by the release event
    pub side: Side,
    pub press_timestamp: u64,
    pub release_timestamp: u64,
    pub press_position: (i32, i32),
    pub release_position: (i32, i32),
}

impl Gesture {
    /// Hold duration in microseconds
    pub fn duration(&self) -> u64 {
        self.release_timestamp.saturating_sub(self.press_timestamp)
    }
}

/// Result of releasing a monitored key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GestureOutcome {
    /// Pressed alone: route to an action
    Fired(Gesture),
    /// Part of a key combination: no action
    Suppressed(Gesture),
}

impl GestureOutcome {
    pub fn gesture(&self) -> &Gesture {
        match self {
            GestureOutcome::Fired(g) | GestureOutcome::Suppressed(g) => g,
        }
    }
}

/// Independent press/release trackers for each monitored virtual key.
///
/// Left and right variants share one tracker because they share one
/// virtual key code; the side only matters when routing a fired gesture.
#[derive(Debug, Clone, Default)]
pub struct SpecialKeyStateMachine {
    states: IndexMap<VirtualKey, SpecialKeyTrackingState>,
}

impl SpecialKeyStateMachine {
    /// Create a machine with no monitored keys
    pub fn new() -> Self {
        Self::default()
    }

    /// Monitor Ctrl, Shift and Alt
    pub fn with_defaults() -> Self {
        Self::with_keys(&[VirtualKey::CONTROL, VirtualKey::SHIFT, VirtualKey::MENU])
    }

    pub fn with_keys(keys: &[VirtualKey]) -> Self {
        let mut machine = Self::new();
        for &key in keys {
            machine.add_special_key(key);
        }
        machine
    }

    /// Start monitoring a key. Re-adding a tracked key is a no-op.
    ///
    /// Returns true if the key was newly added.
    pub fn add_special_key(&mut self, key: VirtualKey) -> bool {
        if self.states.contains_key(&key) {
            return false;
        }
        self.states.insert(key, SpecialKeyTrackingState::default());
        true
    }

    pub fn is_special_key(&self, key: VirtualKey) -> bool {
        self.states.contains_key(&key)
    }

    /// Monitored keys in registration order
    pub fn special_keys(&self) -> impl Iterator<Item = VirtualKey> + '_ {
        self.states.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    pub fn state(&self, key: VirtualKey) -> Option<&SpecialKeyTrackingState> {
        self.states.get(&key)
    }

    /// Feed one key event.
    ///
    /// Returns an outcome only when a monitored key completes a cycle. A
    /// key-down of any unmonitored key marks every held monitored key as
    /// part of a combination. Every physical key-down of a monitored key
    /// starts a new cycle; auto-repeats do not.
    pub fn process(&mut self, event: &KeyEvent) -> Option<GestureOutcome> {
        let Some(state) = self.states.get_mut(&event.virtual_key) else {
            if !event.is_key_up {
                self.notify_regular_key_pressed(event.virtual_key);
            }
            return None;
        };

        if !event.is_key_up {
            // Auto-repeat while held keeps the original press
            if state.is_pressed && !event.action().just_pressed() {
                return None;
            }
            *state = SpecialKeyTrackingState {
                is_pressed: true,
                had_intervening_key: false,
                press_timestamp: event.timestamp,
                press_position: event.cursor_position,
            };
            return None;
        }

        let previous = std::mem::take(state);
        if !previous.is_pressed {
            log::debug!("ignoring release of {} without a press", event.virtual_key);
            return None;
        }

        let gesture = Gesture {
            key: event.virtual_key,
            side: event.side,
            press_timestamp: previous.press_timestamp,
            release_timestamp: event.timestamp,
            press_position: previous.press_position,
            release_position: event.cursor_position,
        };

        if previous.had_intervening_key {
            Some(GestureOutcome::Suppressed(gesture))
        } else {
            Some(GestureOutcome::Fired(gesture))
        }
    }

    /// Mark every held monitored key as part of a combination
    pub fn notify_regular_key_pressed(&mut self, key: VirtualKey) {
        for (special, state) in self.states.iter_mut() {
            if state.is_pressed {
                state.had_intervening_key = true;
                log::debug!("combination detected: {} + {}", special, key);
            }
        }
    }
}
