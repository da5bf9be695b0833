//! Keyboard input normalization
//!
//! Browser `KeyboardEvent.key` names become a small closed set of keys.

/// A normalized key press
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Key {
    /// A single printable character (ASCII letters are lower-cased)
    Char(char),
    Backspace,
    Space,
    Enter,
    Escape,
    /// Any other named key (Shift, ArrowUp, F5, ...)
    Other(String),
}

impl Key {
    /// Parse a DOM key name
    pub fn from_dom(name: &str) -> Self {
        let mut chars = name.chars();
        if let (Some(c), None) = (chars.next(), chars.next()) {
            return match c {
                ' ' => Key::Space,
                c if c.is_ascii_alphabetic() => Key::Char(c.to_ascii_lowercase()),
                c => Key::Char(c),
            };
        }
        match name {
            "Backspace" => Key::Backspace,
            "Enter" => Key::Enter,
            "Escape" | "Esc" => Key::Escape,
            "Space" | "Spacebar" => Key::Space,
            other => Key::Other(other.to_string()),
        }
    }

    /// The letter this key types, if it is one (`/^[a-z]$/i`)
    pub fn letter(&self) -> Option<char> {
        match *self {
            Key::Char(c) if c.is_ascii_alphabetic() => Some(c.to_ascii_lowercase()),
            _ => None,
        }
    }

    /// Keys that clear the typing buffer
    pub fn is_clear(&self) -> bool {
        matches!(self, Key::Space | Key::Enter)
    }
}

impl From<char> for Key {
    fn from(c: char) -> Self {
        if c.is_ascii_alphabetic() {
            Key::Char(c.to_ascii_lowercase())
        } else if c == ' ' {
            Key::Space
        } else {
            Key::Char(c)
        }
    }
}
