//! Kitty keyboard protocol decoder.
//!
//! Recognized forms:
//! - `CSI codepoint[:shifted[:base]] [; modifiers[:event] [; text]] u`
//! - `CSI number [; modifiers[:event]] ~` for Delete / Page Up / Page Down
//! - `CSI 1 ; modifiers[:event] {A,B,C,D,H,F}` for arrows, Home and End
//!
//! Modifiers travel as `1 + bitmask`. Anything malformed is reported as
//! [`KittyParse::NotRecognized`] so the caller can try the legacy table.

use crate::input::keyboard::{Key, KeyCode, KeyModifiers};

/// Outcome of running the Kitty decoder over one key's bytes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KittyParse {
    /// A key press (or repeat).
    Key(Key),
    /// A key release (event type 3); produces no key.
    Release,
    /// Not a Kitty sequence, or a malformed one.
    NotRecognized,
}

const EVENT_RELEASE: u32 = 3;

/// Decode a Kitty protocol sequence.
#[must_use]
pub fn parse_kitty(data: &[u8]) -> KittyParse {
    let Some(body) = data.strip_prefix(b"\x1b[") else {
        return KittyParse::NotRecognized;
    };
    let Some((&final_byte, params)) = body.split_last() else {
        return KittyParse::NotRecognized;
    };
    let Ok(params) = std::str::from_utf8(params) else {
        return KittyParse::NotRecognized;
    };

    let decoded = match final_byte {
        b'u' => parse_codepoint_form(params),
        b'~' => parse_tilde_form(params),
        b'A' | b'B' | b'C' | b'D' | b'H' | b'F' => parse_letter_form(params, final_byte),
        _ => None,
    };
    decoded.unwrap_or(KittyParse::NotRecognized)
}

/// Check whether `data` is a Kitty key-release report.
#[must_use]
pub fn is_key_release(data: &[u8]) -> bool {
    parse_kitty(data) == KittyParse::Release
}

/// Decoded `modifiers[:event]` field.
struct ModifierField {
    modifiers: KeyModifiers,
    release: bool,
}

fn parse_codepoint_form(params: &str) -> Option<KittyParse> {
    let mut fields = params.split(';');
    let key_field = fields.next()?;
    let modifier_field = match fields.next() {
        Some(field) => Some(parse_modifier_field(field)?),
        None => None,
    };
    let _text = fields.next();
    if fields.next().is_some() {
        return None;
    }

    let primary = key_field.split(':').next()?;
    let codepoint = parse_number(primary)?;

    let ModifierField { modifiers, release } = modifier_field.unwrap_or(ModifierField {
        modifiers: KeyModifiers::empty(),
        release: false,
    });
    if release {
        return Some(KittyParse::Release);
    }

    let code = match codepoint {
        13 => KeyCode::Enter,
        9 if modifiers.contains(KeyModifiers::SHIFT) => KeyCode::BackTab,
        9 => KeyCode::Tab,
        127 => KeyCode::Backspace,
        27 => KeyCode::Esc,
        cp => {
            let c = char::from_u32(cp)?;
            if c.is_control() {
                return None;
            }
            match KeyCode::ctrl_from_letter(c) {
                Some(named) if modifiers.contains(KeyModifiers::CTRL) => named,
                _ => KeyCode::Char(c),
            }
        }
    };
    Some(KittyParse::Key(Key::new(code, modifiers)))
}

fn parse_tilde_form(params: &str) -> Option<KittyParse> {
    let (number, modifier_field) = match params.split_once(';') {
        Some((number, rest)) => (number, Some(parse_modifier_field(rest)?)),
        None => (params, None),
    };
    let code = match parse_number(number)? {
        3 => KeyCode::Delete,
        5 => KeyCode::PageUp,
        6 => KeyCode::PageDown,
        _ => return None,
    };
    Some(finish(code, modifier_field))
}

fn parse_letter_form(params: &str, final_byte: u8) -> Option<KittyParse> {
    // Without a modifier segment this is a legacy arrow sequence.
    let (number, rest) = params.split_once(';')?;
    if parse_number(number)? != 1 {
        return None;
    }
    let modifier_field = parse_modifier_field(rest)?;
    let code = match final_byte {
        b'A' => KeyCode::Up,
        b'B' => KeyCode::Down,
        b'C' => KeyCode::Right,
        b'D' => KeyCode::Left,
        b'H' => KeyCode::Home,
        b'F' => KeyCode::End,
        _ => return None,
    };
    Some(finish(code, Some(modifier_field)))
}

fn finish(code: KeyCode, field: Option<ModifierField>) -> KittyParse {
    match field {
        Some(ModifierField { release: true, .. }) => KittyParse::Release,
        Some(ModifierField { modifiers, .. }) => KittyParse::Key(Key::new(code, modifiers)),
        None => KittyParse::Key(Key::plain(code)),
    }
}

fn parse_modifier_field(field: &str) -> Option<ModifierField> {
    let (mods, event) = match field.split_once(':') {
        Some((mods, event)) => (mods, Some(event)),
        None => (field, None),
    };
    let wire = parse_number(mods)?;
    let mask = wire.checked_sub(1)?;
    let release = match event {
        Some(event) => parse_number(event)? == EVENT_RELEASE,
        None => false,
    };
    Some(ModifierField {
        modifiers: KeyModifiers::from_bits_truncate((mask & 0xff) as u8),
        release,
    })
}

/// Parse a non-empty run of ASCII digits.
fn parse_number(s: &str) -> Option<u32> {
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse().ok()
}
