#![forbid(unsafe_code)]

//! Keyboard events as seen by the page behaviors.
//!
//! Only the keys the behaviors react to get their own [`KeyCode`] variant;
//! everything else is carried through as [`KeyCode::Other`] so hosts can
//! forward every keydown without filtering.

use bitflags::bitflags;

bitflags! {
    /// Modifier keys held during a key press.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Modifiers: u8 {
        const SHIFT = 0b0001;
        const CTRL  = 0b0010;
        const ALT   = 0b0100;
        const SUPER = 0b1000;
    }
}

/// Logical key identity.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum KeyCode {
    Tab,
    Escape,
    Enter,
    Char(char),
    /// Any other named key, by its DOM `key` value.
    Other(String),
}

impl KeyCode {
    /// Map a DOM `KeyboardEvent.key` value.
    ///
    /// `"Esc"` is accepted for Escape (legacy Edge/IE spelling).
    #[must_use]
    pub fn from_dom_key(key: &str) -> Self {
        match key {
            "Tab" => Self::Tab,
            "Escape" | "Esc" => Self::Escape,
            "Enter" => Self::Enter,
            _ => {
                let mut chars = key.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => Self::Char(c),
                    _ => Self::Other(key.to_string()),
                }
            }
        }
    }
}

/// A key press.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct KeyEvent {
    pub code: KeyCode,
    pub modifiers: Modifiers,
}

impl KeyEvent {
    /// A key press with no modifiers.
    #[must_use]
    pub fn new(code: KeyCode) -> Self {
        Self {
            code,
            modifiers: Modifiers::empty(),
        }
    }

    /// Attach modifiers.
    #[must_use]
    pub fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    /// Tab without Shift.
    #[must_use]
    pub fn tab() -> Self {
        Self::new(KeyCode::Tab)
    }

    /// Shift+Tab.
    #[must_use]
    pub fn back_tab() -> Self {
        Self::new(KeyCode::Tab).with_modifiers(Modifiers::SHIFT)
    }

    /// Escape.
    #[must_use]
    pub fn escape() -> Self {
        Self::new(KeyCode::Escape)
    }

    /// Build from the fields of a DOM `KeyboardEvent`.
    #[must_use]
    pub fn from_dom(key: &str, shift: bool, ctrl: bool, alt: bool, meta: bool) -> Self {
        let mut modifiers = Modifiers::empty();
        modifiers.set(Modifiers::SHIFT, shift);
        modifiers.set(Modifiers::CTRL, ctrl);
        modifiers.set(Modifiers::ALT, alt);
        modifiers.set(Modifiers::SUPER, meta);
        Self {
            code: KeyCode::from_dom_key(key),
            modifiers,
        }
    }

    /// Whether Shift is held.
    #[inline]
    #[must_use]
    pub fn shift(&self) -> bool {
        self.modifiers.contains(Modifiers::SHIFT)
    }
}
