// Keyhint Virtual Key Type
// Fixed virtual-key table, key naming and physical side

use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

include!(concat!(env!("OUT_DIR"), "/virtual_keys.rs"));

impl VirtualKey {
    pub const BACK: VirtualKey = VirtualKey(0x08);
    pub const TAB: VirtualKey = VirtualKey(0x09);
    pub const RETURN: VirtualKey = VirtualKey(0x0D);
    pub const SHIFT: VirtualKey = VirtualKey(0x10);
    pub const CONTROL: VirtualKey = VirtualKey(0x11);
    pub const MENU: VirtualKey = VirtualKey(0x12);
    pub const CAPITAL: VirtualKey = VirtualKey(0x14);
    pub const ESCAPE: VirtualKey = VirtualKey(0x1B);
    pub const SPACE: VirtualKey = VirtualKey(0x20);
    pub const PRIOR: VirtualKey = VirtualKey(0x21);
    pub const NEXT: VirtualKey = VirtualKey(0x22);
    pub const END: VirtualKey = VirtualKey(0x23);
    pub const HOME: VirtualKey = VirtualKey(0x24);
    pub const LEFT: VirtualKey = VirtualKey(0x25);
    pub const UP: VirtualKey = VirtualKey(0x26);
    pub const RIGHT: VirtualKey = VirtualKey(0x27);
    pub const DOWN: VirtualKey = VirtualKey(0x28);
    pub const INSERT: VirtualKey = VirtualKey(0x2D);
    pub const DELETE: VirtualKey = VirtualKey(0x2E);
    pub const KEY_0: VirtualKey = VirtualKey(0x30);
    pub const KEY_9: VirtualKey = VirtualKey(0x39);
    pub const KEY_A: VirtualKey = VirtualKey(0x41);
    pub const KEY_Z: VirtualKey = VirtualKey(0x5A);
    pub const LWIN: VirtualKey = VirtualKey(0x5B);
    pub const RWIN: VirtualKey = VirtualKey(0x5C);
    pub const F1: VirtualKey = VirtualKey(0x70);
    pub const F12: VirtualKey = VirtualKey(0x7B);
    pub const LSHIFT: VirtualKey = VirtualKey(0xA0);
    pub const RSHIFT: VirtualKey = VirtualKey(0xA1);
    pub const OEM_1: VirtualKey = VirtualKey(0xBA);
    pub const OEM_PLUS: VirtualKey = VirtualKey(0xBB);
    pub const OEM_COMMA: VirtualKey = VirtualKey(0xBC);
    pub const OEM_MINUS: VirtualKey = VirtualKey(0xBD);
    pub const OEM_PERIOD: VirtualKey = VirtualKey(0xBE);
    pub const OEM_2: VirtualKey = VirtualKey(0xBF);
    pub const OEM_3: VirtualKey = VirtualKey(0xC0);
    pub const OEM_4: VirtualKey = VirtualKey(0xDB);
    pub const OEM_5: VirtualKey = VirtualKey(0xDC);
    pub const OEM_6: VirtualKey = VirtualKey(0xDD);
    pub const OEM_7: VirtualKey = VirtualKey(0xDE);

    /// Letter key for an ASCII letter (either case)
    pub fn letter(c: char) -> Option<VirtualKey> {
        c.is_ascii_alphabetic()
            .then(|| VirtualKey(c.to_ascii_uppercase() as u16))
    }

    /// Digit key for an ASCII digit
    pub fn digit(c: char) -> Option<VirtualKey> {
        c.is_ascii_digit().then(|| VirtualKey(c as u16))
    }

    pub fn is_letter(self) -> bool {
        (Self::KEY_A.0..=Self::KEY_Z.0).contains(&self.0)
    }

    pub fn is_digit(self) -> bool {
        (Self::KEY_0.0..=Self::KEY_9.0).contains(&self.0)
    }

    /// True for the generic and sided shift codes
    pub fn is_shift(self) -> bool {
        matches!(self, Self::SHIFT | Self::LSHIFT | Self::RSHIFT)
    }
}

/// Physical location of a key that exists on both sides of the keyboard.
///
/// Set once at the OS boundary. Keys with a single location are `Unspecified`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Side {
    Left,
    Right,
    #[default]
    Unspecified,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Left => write!(f, "left"),
            Side::Right => write!(f, "right"),
            Side::Unspecified => write!(f, "unspecified"),
        }
    }
}

fn key_names() -> &'static [&'static str] {
    static KEY_NAMES: OnceLock<Vec<&'static str>> = OnceLock::new();
    KEY_NAMES.get_or_init(|| {
        let mut names = vec![""; 0x100];
        for (i, name) in LETTER_NAMES.iter().enumerate() {
            names[0x41 + i] = *name;
        }
        for (i, name) in DIGIT_NAMES.iter().enumerate() {
            names[0x30 + i] = *name;
        }
        names[0x20] = "SPACE";
        names[0x0D] = "ENTER";
        names[0x08] = "BACKSPACE";
        names[0x09] = "TAB";
        names[0x1B] = "ESC";
        names[0x2E] = "DELETE";
        names[0x2D] = "INSERT";
        names[0x24] = "HOME";
        names[0x23] = "END";
        names[0x21] = "PAGE_UP";
        names[0x22] = "PAGE_DOWN";
        names[0x26] = "UP_ARROW";
        names[0x28] = "DOWN_ARROW";
        names[0x25] = "LEFT_ARROW";
        names[0x27] = "RIGHT_ARROW";
        names[0x10] = "SHIFT";
        names[0x11] = "CTRL";
        names[0x12] = "ALT";
        names[0x14] = "CAPS_LOCK";
        names[0x5B] = "LEFT_WIN";
        names[0x5C] = "RIGHT_WIN";
        for (i, name) in FUNCTION_NAMES.iter().enumerate() {
            names[0x70 + i] = *name;
        }
        names[0xBA] = "SEMICOLON";
        names[0xBB] = "EQUALS";
        names[0xBC] = "COMMA";
        names[0xBD] = "MINUS";
        names[0xBE] = "PERIOD";
        names[0xBF] = "SLASH";
        names[0xC0] = "BACKTICK";
        names[0xDB] = "LEFT_BRACKET";
        names[0xDC] = "BACKSLASH";
        names[0xDD] = "RIGHT_BRACKET";
        names[0xDE] = "QUOTE";
        names
    })
}

const LETTER_NAMES: [&str; 26] = [
    "A", "B", "C", "D", "E", "F", "G", "H", "I", "J", "K", "L", "M", "N", "O", "P", "Q", "R",
    "S", "T", "U", "V", "W", "X", "Y", "Z",
];
const DIGIT_NAMES: [&str; 10] = ["0", "1", "2", "3", "4", "5", "6", "7", "8", "9"];
const FUNCTION_NAMES: [&str; 12] = [
    "F1", "F2", "F3", "F4", "F5", "F6", "F7", "F8", "F9", "F10", "F11", "F12",
];

/// Display name for a virtual key.
///
/// Total: unmapped codes render as `VK_0x<hex>`.
pub fn key_name(key: VirtualKey) -> String {
    match key_names().get(key.code() as usize).copied() {
        Some(name) if !name.is_empty() => name.to_string(),
        _ => format!("VK_0x{:x}", key.code()),
    }
}

/// Try to parse a key name (or a `VK_0x..` literal) to a virtual key
pub fn key_from_name(name: &str) -> Option<VirtualKey> {
    let name_upper = name.trim().to_uppercase();

    if let Some(hex) = name_upper.strip_prefix("VK_0X") {
        return u16::from_str_radix(hex, 16).ok().map(VirtualKey);
    }

    let alias = match name_upper.as_str() {
        "CONTROL" => Some(VirtualKey::CONTROL),
        "MENU" => Some(VirtualKey::MENU),
        "ESCAPE" => Some(VirtualKey::ESCAPE),
        "RETURN" => Some(VirtualKey::RETURN),
        "CAPSLOCK" => Some(VirtualKey::CAPITAL),
        _ => None,
    };
    if alias.is_some() {
        return alias;
    }

    key_names()
        .iter()
        .position(|n| !n.is_empty() && *n == name_upper)
        .map(|code| VirtualKey(code as u16))
}
