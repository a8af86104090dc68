// Keyhint Pressed Key State
// Keys currently held down on an output sink

use crate::VirtualKey;
use smallvec::SmallVec;

/// Keys held by a sink, in press order.
///
/// Injection holds at most a shift and one key at a time, so this stays
/// inline.
#[derive(Debug, Clone, Default)]
pub struct PressedKeyState {
    pressed: SmallVec<[VirtualKey; 4]>,
}

impl PressedKeyState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, key: VirtualKey) {
        if !self.is_pressed(key) {
            self.pressed.push(key);
        }
    }

    pub fn remove(&mut self, key: VirtualKey) {
        self.pressed.retain(|k| *k != key);
    }

    pub fn is_pressed(&self, key: VirtualKey) -> bool {
        self.pressed.contains(&key)
    }

    /// Held keys, most recently pressed last
    pub fn get_all(&self) -> Vec<VirtualKey> {
        self.pressed.to_vec()
    }

    pub fn clear(&mut self) {
        self.pressed.clear();
    }

    pub fn len(&self) -> usize {
        self.pressed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pressed.is_empty()
    }
}
