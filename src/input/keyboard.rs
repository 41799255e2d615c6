//! Keyboard event types.

use bitflags::bitflags;
use std::fmt;

bitflags! {
    /// Keyboard modifier flags.
    ///
    /// The bit layout matches the Kitty protocol's modifier bitmask (the wire
    /// value minus one), so decoding is a plain truncation.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct KeyModifiers: u8 {
        /// Shift key.
        const SHIFT = 0b0000_0001;
        /// Alt/Option key.
        const ALT = 0b0000_0010;
        /// Control key.
        const CTRL = 0b0000_0100;
        /// Super/Meta/Windows key (only reported by the Kitty protocol).
        const SUPER = 0b0000_1000;
    }
}

/// A key code representing a keyboard key.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum KeyCode {
    /// A printable character (includes space).
    Char(char),
    /// Enter/Return key.
    Enter,
    /// Tab key.
    Tab,
    /// Shift+Tab (backtab).
    BackTab,
    /// Backspace key.
    Backspace,
    /// Delete key.
    Delete,
    /// Up arrow key.
    Up,
    /// Down arrow key.
    Down,
    /// Left arrow key.
    Left,
    /// Right arrow key.
    Right,
    /// Home key.
    Home,
    /// End key.
    End,
    /// Page Up key.
    PageUp,
    /// Page Down key.
    PageDown,
    /// Escape key.
    Esc,
    /// Ctrl+C (interrupt).
    CtrlC,
    /// Ctrl+D (end of input).
    CtrlD,
    /// Ctrl+G.
    CtrlG,
    /// Ctrl+L (redraw).
    CtrlL,
    /// Ctrl+O.
    CtrlO,
    /// Ctrl+R (history search).
    CtrlR,
    /// Anything the parser could not classify.
    Unknown,
}

impl KeyCode {
    /// Named Ctrl variant for a raw control byte (`0x03` is Ctrl+C, ...).
    #[must_use]
    pub const fn ctrl_from_byte(byte: u8) -> Option<Self> {
        match byte {
            0x03 => Some(Self::CtrlC),
            0x04 => Some(Self::CtrlD),
            0x07 => Some(Self::CtrlG),
            0x0c => Some(Self::CtrlL),
            0x0f => Some(Self::CtrlO),
            0x12 => Some(Self::CtrlR),
            _ => None,
        }
    }

    /// Named Ctrl variant for a lowercase letter, if the letter has one.
    #[must_use]
    pub const fn ctrl_from_letter(c: char) -> Option<Self> {
        if c.is_ascii_lowercase() {
            Self::ctrl_from_byte(c as u8 - b'a' + 1)
        } else {
            None
        }
    }

    fn name(self) -> Option<&'static str> {
        Some(match self {
            Self::Char(_) => return None,
            Self::Enter => "enter",
            Self::Tab => "tab",
            Self::BackTab => "backtab",
            Self::Backspace => "backspace",
            Self::Delete => "delete",
            Self::Up => "up",
            Self::Down => "down",
            Self::Left => "left",
            Self::Right => "right",
            Self::Home => "home",
            Self::End => "end",
            Self::PageUp => "pageup",
            Self::PageDown => "pagedown",
            Self::Esc => "escape",
            Self::CtrlC => "c",
            Self::CtrlD => "d",
            Self::CtrlG => "g",
            Self::CtrlL => "l",
            Self::CtrlO => "o",
            Self::CtrlR => "r",
            Self::Unknown => "unknown",
        })
    }

    const fn is_named_ctrl(self) -> bool {
        matches!(
            self,
            Self::CtrlC | Self::CtrlD | Self::CtrlG | Self::CtrlL | Self::CtrlO | Self::CtrlR
        )
    }
}

/// A keyboard event.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Key {
    /// The key code.
    pub code: KeyCode,
    /// Modifier keys held.
    pub modifiers: KeyModifiers,
}

impl Key {
    /// Create a new key event.
    #[must_use]
    pub const fn new(code: KeyCode, modifiers: KeyModifiers) -> Self {
        Self { code, modifiers }
    }

    /// Create a key event with no modifiers.
    #[must_use]
    pub const fn plain(code: KeyCode) -> Self {
        Self::new(code, KeyModifiers::empty())
    }

    /// Create a character key event.
    #[must_use]
    pub const fn char(c: char) -> Self {
        Self::plain(KeyCode::Char(c))
    }

    /// The catch-all for unparseable input.
    #[must_use]
    pub const fn unknown() -> Self {
        Self::plain(KeyCode::Unknown)
    }

    /// Check if Shift is held.
    #[must_use]
    pub fn shift(&self) -> bool {
        self.modifiers.contains(KeyModifiers::SHIFT)
    }

    /// Check if Ctrl is held.
    #[must_use]
    pub fn ctrl(&self) -> bool {
        self.modifiers.contains(KeyModifiers::CTRL)
    }

    /// Check if Alt is held.
    #[must_use]
    pub fn alt(&self) -> bool {
        self.modifiers.contains(KeyModifiers::ALT)
    }

    /// Check if this is the unknown key.
    #[must_use]
    pub fn is_unknown(&self) -> bool {
        self.code == KeyCode::Unknown
    }
}

/// Formats as `ctrl+shift+up`, `alt+x`, `enter`.
impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let ctrl = self.ctrl() || self.code.is_named_ctrl();
        if ctrl {
            f.write_str("ctrl+")?;
        }
        if self.alt() {
            f.write_str("alt+")?;
        }
        if self.shift() && self.code != KeyCode::BackTab {
            f.write_str("shift+")?;
        }
        if self.modifiers.contains(KeyModifiers::SUPER) {
            f.write_str("super+")?;
        }
        match self.code {
            KeyCode::Char(' ') => f.write_str("space"),
            KeyCode::Char(c) => write!(f, "{c}"),
            code => f.write_str(code.name().unwrap_or("unknown")),
        }
    }
}
