//! Key events delivered by an input session.
//!
//! Hosts map their native key codes to [`Key`]; only submit and tab
//! completion carry meaning for the console.

/// A key released in the console's text field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    /// Return / keypad enter.
    Submit,
    /// Tab: request autocompletion.
    Complete,
    /// Any other key; ignored by the console.
    Other,
}

impl Key {
    /// Map a typed control character to a key.
    pub fn from_char(ch: char) -> Self {
        match ch {
            '\n' | '\r' => Key::Submit,
            '\t' => Key::Complete,
            _ => Key::Other,
        }
    }
}
