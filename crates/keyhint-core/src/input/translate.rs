// Keyhint Input Layer - OS Boundary Translation
// Linux input-event-codes -> virtual keys with an explicit side

use crate::input::MouseButton;
use crate::{Side, VirtualKey};

/// evdev key code, virtual key, physical side
const EVDEV_KEYS: &[(u16, VirtualKey, Side)] = &[
    (1, VirtualKey::ESCAPE, Side::Unspecified),
    (2, VirtualKey(0x31), Side::Unspecified),
    (3, VirtualKey(0x32), Side::Unspecified),
    (4, VirtualKey(0x33), Side::Unspecified),
    (5, VirtualKey(0x34), Side::Unspecified),
    (6, VirtualKey(0x35), Side::Unspecified),
    (7, VirtualKey(0x36), Side::Unspecified),
    (8, VirtualKey(0x37), Side::Unspecified),
    (9, VirtualKey(0x38), Side::Unspecified),
    (10, VirtualKey(0x39), Side::Unspecified),
    (11, VirtualKey(0x30), Side::Unspecified),
    (12, VirtualKey::OEM_MINUS, Side::Unspecified),
    (13, VirtualKey::OEM_PLUS, Side::Unspecified),
    (14, VirtualKey::BACK, Side::Unspecified),
    (15, VirtualKey::TAB, Side::Unspecified),
    (16, VirtualKey(0x51), Side::Unspecified), // Q
    (17, VirtualKey(0x57), Side::Unspecified), // W
    (18, VirtualKey(0x45), Side::Unspecified), // E
    (19, VirtualKey(0x52), Side::Unspecified), // R
    (20, VirtualKey(0x54), Side::Unspecified), // T
    (21, VirtualKey(0x59), Side::Unspecified), // Y
    (22, VirtualKey(0x55), Side::Unspecified), // U
    (23, VirtualKey(0x49), Side::Unspecified), // I
    (24, VirtualKey(0x4F), Side::Unspecified), // O
    (25, VirtualKey(0x50), Side::Unspecified), // P
    (26, VirtualKey::OEM_4, Side::Unspecified),
    (27, VirtualKey::OEM_6, Side::Unspecified),
    (28, VirtualKey::RETURN, Side::Unspecified),
    (29, VirtualKey::CONTROL, Side::Left),
    (30, VirtualKey(0x41), Side::Unspecified), // A
    (31, VirtualKey(0x53), Side::Unspecified), // S
    (32, VirtualKey(0x44), Side::Unspecified), // D
    (33, VirtualKey(0x46), Side::Unspecified), // F
    (34, VirtualKey(0x47), Side::Unspecified), // G
    (35, VirtualKey(0x48), Side::Unspecified), // H
    (36, VirtualKey(0x4A), Side::Unspecified), // J
    (37, VirtualKey(0x4B), Side::Unspecified), // K
    (38, VirtualKey(0x4C), Side::Unspecified), // L
    (39, VirtualKey::OEM_1, Side::Unspecified),
    (40, VirtualKey::OEM_7, Side::Unspecified),
    (41, VirtualKey::OEM_3, Side::Unspecified),
    (42, VirtualKey::SHIFT, Side::Left),
    (43, VirtualKey::OEM_5, Side::Unspecified),
    (44, VirtualKey(0x5A), Side::Unspecified), // Z
    (45, VirtualKey(0x58), Side::Unspecified), // X
    (46, VirtualKey(0x43), Side::Unspecified), // C
    (47, VirtualKey(0x56), Side::Unspecified), // V
    (48, VirtualKey(0x42), Side::Unspecified), // B
    (49, VirtualKey(0x4E), Side::Unspecified), // N
    (50, VirtualKey(0x4D), Side::Unspecified), // M
    (51, VirtualKey::OEM_COMMA, Side::Unspecified),
    (52, VirtualKey::OEM_PERIOD, Side::Unspecified),
    (53, VirtualKey::OEM_2, Side::Unspecified),
    (54, VirtualKey::SHIFT, Side::Right),
    (56, VirtualKey::MENU, Side::Left),
    (57, VirtualKey::SPACE, Side::Unspecified),
    (58, VirtualKey::CAPITAL, Side::Unspecified),
    (59, VirtualKey(0x70), Side::Unspecified), // F1
    (60, VirtualKey(0x71), Side::Unspecified),
    (61, VirtualKey(0x72), Side::Unspecified),
    (62, VirtualKey(0x73), Side::Unspecified),
    (63, VirtualKey(0x74), Side::Unspecified),
    (64, VirtualKey(0x75), Side::Unspecified),
    (65, VirtualKey(0x76), Side::Unspecified),
    (66, VirtualKey(0x77), Side::Unspecified),
    (67, VirtualKey(0x78), Side::Unspecified),
    (68, VirtualKey(0x79), Side::Unspecified), // F10
    (87, VirtualKey(0x7A), Side::Unspecified), // F11
    (88, VirtualKey::F12, Side::Unspecified),
    (96, VirtualKey::RETURN, Side::Right), // KPENTER
    (97, VirtualKey::CONTROL, Side::Right),
    (100, VirtualKey::MENU, Side::Right),
    (102, VirtualKey::HOME, Side::Unspecified),
    (103, VirtualKey::UP, Side::Unspecified),
    (104, VirtualKey::PRIOR, Side::Unspecified),
    (105, VirtualKey::LEFT, Side::Unspecified),
    (106, VirtualKey::RIGHT, Side::Unspecified),
    (107, VirtualKey::END, Side::Unspecified),
    (108, VirtualKey::DOWN, Side::Unspecified),
    (109, VirtualKey::NEXT, Side::Unspecified),
    (110, VirtualKey::INSERT, Side::Unspecified),
    (111, VirtualKey::DELETE, Side::Unspecified),
    (125, VirtualKey::LWIN, Side::Unspecified),
    (126, VirtualKey::RWIN, Side::Unspecified),
];

/// BTN_LEFT, BTN_RIGHT, BTN_MIDDLE
const EVDEV_BUTTONS: &[(u16, MouseButton)] = &[
    (0x110, MouseButton::Left),
    (0x111, MouseButton::Right),
    (0x112, MouseButton::Middle),
];

/// Translate an evdev key code into a virtual key and side.
///
/// Codes outside the table pass through as `VK_0x..` values offset into the
/// private 0x100 range so they can never collide with a real virtual key.
/// The offset saturates at `0xFFFF`.
pub fn virtual_key_from_evdev(code: u16) -> (VirtualKey, Side) {
    EVDEV_KEYS
        .iter()
        .find(|(evdev, _, _)| *evdev == code)
        .map(|&(_, key, side)| (key, side))
        .unwrap_or((VirtualKey(0x100u16.saturating_add(code)), Side::Unspecified))
}

/// evdev key code used to synthesize a virtual key.
///
/// Generic modifier codes resolve to their left-hand key.
pub fn evdev_from_virtual_key(key: VirtualKey) -> Option<u16> {
    match key {
        VirtualKey::LSHIFT => Some(42),
        VirtualKey::RSHIFT => Some(54),
        _ => EVDEV_KEYS
            .iter()
            .find(|(_, k, side)| *k == key && *side != Side::Right)
            .map(|&(code, _, _)| code),
    }
}

/// Mouse button for an evdev BTN_* code
pub fn mouse_button_from_evdev(code: u16) -> Option<MouseButton> {
    EVDEV_BUTTONS
        .iter()
        .find(|(evdev, _)| *evdev == code)
        .map(|&(_, button)| button)
}

/// Approximate absolute cursor position from relative pointer motion.
///
/// evdev only reports deltas, so the position starts at the origin and is
/// clamped to the configured screen bounds.
#[derive(Debug, Clone, Copy)]
pub struct CursorTracker {
    position: (i32, i32),
    bounds: (i32, i32),
}

impl CursorTracker {
    pub fn new(width: i32, height: i32) -> Self {
        Self {
            position: (0, 0),
            bounds: (width.max(1) - 1, height.max(1) - 1),
        }
    }

    pub fn move_by(&mut self, dx: i32, dy: i32) {
        let (x, y) = self.position;
        self.position = (
            x.saturating_add(dx).clamp(0, self.bounds.0),
            y.saturating_add(dy).clamp(0, self.bounds.1),
        );
    }

    pub fn position(&self) -> (i32, i32) {
        self.position
    }
}

impl Default for CursorTracker {
    fn default() -> Self {
        Self::new(1920, 1080)
    }
}
