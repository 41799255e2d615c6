//! Raw terminal bytes to structured keys.
//!
//! Each call receives the bytes of one logical key (see [`split_keys`] for
//! chunks that carry several). Resolution order for escape-prefixed input:
//! Kitty decoder, legacy CSI/SS3 table, Alt+printable, then `Unknown`.

use crate::ansi::{ESC, sequence_len, utf8_len};
use crate::input::keyboard::{Key, KeyCode, KeyModifiers};
use crate::input::kitty::{KittyParse, parse_kitty};

/// Legacy VT sequences without modifier information.
const LEGACY_KEYS: &[(&[u8], KeyCode)] = &[
    (b"\x1b[A", KeyCode::Up),
    (b"\x1b[B", KeyCode::Down),
    (b"\x1b[C", KeyCode::Right),
    (b"\x1b[D", KeyCode::Left),
    (b"\x1b[H", KeyCode::Home),
    (b"\x1b[F", KeyCode::End),
    (b"\x1b[1~", KeyCode::Home),
    (b"\x1b[4~", KeyCode::End),
    (b"\x1b[7~", KeyCode::Home),
    (b"\x1b[8~", KeyCode::End),
    (b"\x1b[3~", KeyCode::Delete),
    (b"\x1b[5~", KeyCode::PageUp),
    (b"\x1b[6~", KeyCode::PageDown),
    (b"\x1b[Z", KeyCode::BackTab),
    (b"\x1bOA", KeyCode::Up),
    (b"\x1bOB", KeyCode::Down),
    (b"\x1bOC", KeyCode::Right),
    (b"\x1bOD", KeyCode::Left),
    (b"\x1bOH", KeyCode::Home),
    (b"\x1bOF", KeyCode::End),
];

/// Parse one key's worth of input.
///
/// Returns `None` only for Kitty key-release reports, which carry no key.
/// Everything unparseable becomes [`KeyCode::Unknown`].
#[must_use]
pub fn parse_key(data: &[u8]) -> Option<Key> {
    match data {
        [] => Some(Key::unknown()),
        [byte] => Some(parse_single_byte(*byte)),
        [ESC, ..] => parse_escape(data),
        _ => Some(parse_utf8(data)),
    }
}

fn parse_single_byte(byte: u8) -> Key {
    match byte {
        0x0d => Key::plain(KeyCode::Enter),
        0x09 => Key::plain(KeyCode::Tab),
        0x7f => Key::plain(KeyCode::Backspace),
        ESC => Key::plain(KeyCode::Esc),
        0x20..=0x7e => Key::char(char::from(byte)),
        _ => KeyCode::ctrl_from_byte(byte).map_or_else(Key::unknown, |code| {
            Key::new(code, KeyModifiers::CTRL)
        }),
    }
}

fn parse_utf8(data: &[u8]) -> Key {
    let Ok(s) = std::str::from_utf8(data) else {
        return Key::unknown();
    };
    let mut chars = s.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) if !c.is_control() => Key::char(c),
        _ => Key::unknown(),
    }
}

fn parse_escape(data: &[u8]) -> Option<Key> {
    match parse_kitty(data) {
        KittyParse::Key(key) => return Some(key),
        KittyParse::Release => return None,
        KittyParse::NotRecognized => {}
    }

    if let Some(key) = lookup_legacy(data) {
        return Some(key);
    }

    match data {
        [ESC, byte] if (0x20..=0x7e).contains(byte) => {
            Some(Key::new(KeyCode::Char(char::from(*byte)), KeyModifiers::ALT))
        }
        _ => Some(Key::unknown()),
    }
}

fn lookup_legacy(data: &[u8]) -> Option<Key> {
    LEGACY_KEYS
        .iter()
        .find(|(seq, _)| *seq == data)
        .map(|&(_, code)| {
            let modifiers = if code == KeyCode::BackTab {
                KeyModifiers::SHIFT
            } else {
                KeyModifiers::empty()
            };
            Key::new(code, modifiers)
        })
}

/// Split a chunk into one slice per key.
///
/// Escape sequences are delimited with the shared ANSI scanner, SS3 keys
/// take three bytes, `ESC ESC` yields a lone Escape, and UTF-8 runes stay
/// whole.
#[must_use]
pub fn split_keys(data: &[u8]) -> Vec<&[u8]> {
    let mut keys = Vec::new();
    let mut rest = data;
    while let Some(&first) = rest.first() {
        let len = if first == ESC {
            match rest.get(1) {
                None | Some(&ESC) => 1,
                Some(b'O') => rest.len().min(3),
                Some(_) => sequence_len(rest),
            }
        } else {
            utf8_len(first).min(rest.len())
        };
        let (key, tail) = rest.split_at(len.max(1));
        keys.push(key);
        rest = tail;
    }
    keys
}
