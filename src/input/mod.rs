//! Input parsing for terminal key events.
//!
//! Supports legacy VT sequences (CSI and SS3), the Kitty keyboard protocol
//! (`CSI u`, tilde and letter-terminated forms), control bytes and UTF-8
//! runes.

mod keyboard;
mod kitty;
mod parser;

pub use keyboard::{Key, KeyCode, KeyModifiers};
pub use kitty::{KittyParse, is_key_release, parse_kitty};
pub use parser::{parse_key, split_keys};
