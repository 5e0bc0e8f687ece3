#![no_std]

//! # Input Types
//!
//! Key event types shared between the host widget and the editing engine.
//!
//! ## Philosophy
//!
//! - **Events, not bytes**: Input is a structured event, not a raw scan code
//! - **Text travels with the key**: The host reports the text a key produced,
//!   so layouts and IME stay the host's business
//! - **Testable**: Events are serializable and can be injected for testing
//!
//! ## Non-Goals
//!
//! This is NOT:
//! - Raw hardware scan codes
//! - A keymap or shortcut registry
//! - Pointer or touch input

extern crate alloc;

use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;
use serde::{Deserialize, Serialize};

/// Input event delivered by the host
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum InputEvent {
    /// Keyboard event
    Key(KeyEvent),
}

impl InputEvent {
    /// Creates a key event
    pub fn key(event: KeyEvent) -> Self {
        Self::Key(event)
    }

    /// Returns the key event if this is a key event
    pub fn as_key(&self) -> Option<&KeyEvent> {
        match self {
            Self::Key(event) => Some(event),
        }
    }
}

/// Keyboard event
///
/// `text` is whatever the key produced on the host's layout, possibly empty
/// (arrows, function keys, shortcuts).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyEvent {
    pub code: KeyCode,
    pub modifiers: Modifiers,
    pub state: KeyState,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub text: String,
}

impl KeyEvent {
    /// Creates a pressed key event without produced text
    pub fn pressed(code: KeyCode, modifiers: Modifiers) -> Self {
        let text = match code {
            KeyCode::Char(ch) => {
                let mut text = String::new();
                text.push(ch);
                text
            }
            _ => String::new(),
        };
        Self {
            code,
            modifiers,
            state: KeyState::Pressed,
            text,
        }
    }

    /// Creates a released key event
    pub fn released(code: KeyCode, modifiers: Modifiers) -> Self {
        Self {
            state: KeyState::Released,
            ..Self::pressed(code, modifiers)
        }
    }

    /// Creates the event for typing a single character
    pub fn char(ch: char) -> Self {
        Self::pressed(KeyCode::Char(ch), Modifiers::NONE)
    }

    /// Replaces the produced text (IME commits, dead keys)
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    /// Returns true for press and auto-repeat events
    pub fn is_press(&self) -> bool {
        matches!(self.state, KeyState::Pressed | KeyState::Repeat)
    }

    /// The produced text when it is exactly one character
    pub fn produced_char(&self) -> Option<char> {
        let mut chars = self.text.chars();
        match (chars.next(), chars.next()) {
            (Some(ch), None) => Some(ch),
            _ => None,
        }
    }

    /// Returns true if the event carries insertable text.
    ///
    /// Ctrl and Alt chords are shortcuts even when the host attached text.
    pub fn is_text_input(&self) -> bool {
        !self.text.is_empty()
            && !self.modifiers.is_ctrl()
            && !self.modifiers.is_alt()
            && !self.text.chars().any(|ch| ch.is_control())
    }
}

/// Key state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum KeyState {
    Pressed,
    Released,
    Repeat,
}

impl fmt::Display for KeyState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pressed => write!(f, "pressed"),
            Self::Released => write!(f, "released"),
            Self::Repeat => write!(f, "repeat"),
        }
    }
}

/// Logical key code
///
/// Printable keys arrive as `Char`; `Backtab` is what most toolkits report
/// for Shift+Tab.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum KeyCode {
    Char(char),

    Enter,
    Escape,
    Tab,
    Backtab,
    Backspace,
    Delete,
    Insert,

    Left,
    Right,
    Up,
    Down,
    Home,
    End,
    PageUp,
    PageDown,

    Function(u8),

    Unknown,
}

impl fmt::Display for KeyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Char(ch) => write!(f, "'{}'", ch.escape_debug()),
            Self::Function(n) => write!(f, "F{}", n),
            other => write!(f, "{:?}", other),
        }
    }
}

/// Modifier keys held during the event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Modifiers {
    bits: u8,
}

impl Modifiers {
    pub const NONE: Self = Self { bits: 0 };
    pub const CTRL: Self = Self { bits: 1 << 0 };
    pub const ALT: Self = Self { bits: 1 << 1 };
    pub const SHIFT: Self = Self { bits: 1 << 2 };

    /// Builds a modifier set from the host's three flags
    pub fn from_flags(shift: bool, ctrl: bool, alt: bool) -> Self {
        let mut modifiers = Self::NONE;
        if shift {
            modifiers = modifiers.with(Self::SHIFT);
        }
        if ctrl {
            modifiers = modifiers.with(Self::CTRL);
        }
        if alt {
            modifiers = modifiers.with(Self::ALT);
        }
        modifiers
    }

    pub fn with(mut self, other: Modifiers) -> Self {
        self.bits |= other.bits;
        self
    }

    pub fn contains(&self, other: Modifiers) -> bool {
        (self.bits & other.bits) == other.bits
    }

    pub fn is_ctrl(&self) -> bool {
        self.contains(Self::CTRL)
    }

    pub fn is_alt(&self) -> bool {
        self.contains(Self::ALT)
    }

    pub fn is_shift(&self) -> bool {
        self.contains(Self::SHIFT)
    }

    pub fn is_empty(&self) -> bool {
        self.bits == 0
    }
}

impl fmt::Display for Modifiers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return write!(f, "none");
        }

        let mut parts = Vec::new();
        if self.is_ctrl() {
            parts.push("Ctrl");
        }
        if self.is_alt() {
            parts.push("Alt");
        }
        if self.is_shift() {
            parts.push("Shift");
        }
        write!(f, "{}", parts.join("+"))
    }
}
