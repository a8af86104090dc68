// Keyhint Character Mapping
// Virtual key + modifier state -> printable character, and the inverse used for injection

use crate::modifier::ModifierState;
use crate::VirtualKey;

/// Symbols produced by shift + digit, indexed by digit value
const SHIFTED_DIGITS: [char; 10] = [')', '!', '@', '#', '$', '%', '^', '&', '*', '('];

/// Punctuation keys with their unshifted and shifted characters
const PUNCTUATION: [(VirtualKey, char, char); 11] = [
    (VirtualKey::OEM_1, ';', ':'),
    (VirtualKey::OEM_PLUS, '=', '+'),
    (VirtualKey::OEM_COMMA, ',', '<'),
    (VirtualKey::OEM_MINUS, '-', '_'),
    (VirtualKey::OEM_PERIOD, '.', '>'),
    (VirtualKey::OEM_2, '/', '?'),
    (VirtualKey::OEM_3, '`', '~'),
    (VirtualKey::OEM_4, '[', '{'),
    (VirtualKey::OEM_5, '\\', '|'),
    (VirtualKey::OEM_6, ']', '}'),
    (VirtualKey::OEM_7, '\'', '"'),
];

/// Display name of a key, never fails
pub fn name_of(key: VirtualKey) -> String {
    key.name()
}

/// Character a key produces under the given modifier state.
///
/// Returns `None` for non-printable keys.
pub fn char_of(key: VirtualKey, modifiers: &ModifierState) -> Option<char> {
    if key.is_letter() {
        let letter = (key.code() as u8) as char;
        return Some(if modifiers.letters_uppercase() {
            letter
        } else {
            letter.to_ascii_lowercase()
        });
    }

    if key.is_digit() {
        let index = (key.code() - VirtualKey::KEY_0.code()) as usize;
        return Some(if modifiers.shift_pressed {
            SHIFTED_DIGITS[index]
        } else {
            (b'0' + index as u8) as char
        });
    }

    if key == VirtualKey::SPACE {
        return Some(' ');
    }

    PUNCTUATION
        .iter()
        .find(|(k, _, _)| *k == key)
        .map(|&(_, plain, shifted)| {
            if modifiers.shift_pressed {
                shifted
            } else {
                plain
            }
        })
}

/// Key and shift requirement needed to type a character.
///
/// The inverse of `char_of` with caps-lock off. Newline and tab map to
/// Enter and Tab so multi-line suggestions survive injection.
pub fn key_for_char(c: char) -> Option<(VirtualKey, bool)> {
    if c.is_ascii_lowercase() {
        return VirtualKey::letter(c).map(|k| (k, false));
    }
    if c.is_ascii_uppercase() {
        return VirtualKey::letter(c).map(|k| (k, true));
    }
    if c.is_ascii_digit() {
        return VirtualKey::digit(c).map(|k| (k, false));
    }

    match c {
        ' ' => return Some((VirtualKey::SPACE, false)),
        '\n' => return Some((VirtualKey::RETURN, false)),
        '\t' => return Some((VirtualKey::TAB, false)),
        _ => {}
    }

    if let Some(index) = SHIFTED_DIGITS.iter().position(|&s| s == c) {
        return Some((VirtualKey(VirtualKey::KEY_0.code() + index as u16), true));
    }

    PUNCTUATION.iter().find_map(|&(key, plain, shifted)| {
        if c == plain {
            Some((key, false))
        } else if c == shifted {
            Some((key, true))
        } else {
            None
        }
    })
}
