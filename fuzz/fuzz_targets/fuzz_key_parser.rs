//! Fuzz target for key splitting and decoding.
//!
//! Generates structured escape sequences so the legacy and kitty paths are
//! reached more often than with raw bytes alone.

#![no_main]

use arbitrary::Arbitrary;
use inline_tui::input::{is_key_release, parse_key, split_keys};
use libfuzzer_sys::fuzz_target;

#[derive(Arbitrary, Debug)]
struct KeyInput {
    chunks: Vec<Chunk>,
}

#[derive(Arbitrary, Debug)]
enum Chunk {
    /// ESC followed by arbitrary bytes.
    Escape { bytes: Vec<u8> },
    /// ESC [ <params> <final>
    Csi { params: Vec<u8>, final_byte: u8 },
    /// ESC [ <code> ; <mods> : <event> u
    Kitty { code: u32, mods: u8, event: u8 },
    /// ESC O <final>
    Ss3 { final_byte: u8 },
    Raw { bytes: Vec<u8> },
}

impl Chunk {
    fn write(&self, out: &mut Vec<u8>) {
        match self {
            Self::Escape { bytes } => {
                out.push(0x1b);
                out.extend(bytes.iter().take(32));
            }
            Self::Csi { params, final_byte } => {
                out.extend_from_slice(b"\x1b[");
                out.extend(params.iter().take(32));
                out.push(*final_byte);
            }
            Self::Kitty { code, mods, event } => {
                out.extend_from_slice(format!("\x1b[{code};{mods}:{event}u").as_bytes());
            }
            Self::Ss3 { final_byte } => out.extend_from_slice(&[0x1b, b'O', *final_byte]),
            Self::Raw { bytes } => out.extend(bytes.iter().take(64)),
        }
    }
}

fuzz_target!(|input: KeyInput| {
    let mut bytes = Vec::new();
    for chunk in input.chunks.iter().take(64) {
        chunk.write(&mut bytes);
    }

    let pieces = split_keys(&bytes);
    assert_eq!(pieces.concat(), bytes, "split must cover the input exactly");
    for piece in pieces {
        assert!(!piece.is_empty());
        let _ = is_key_release(piece);
        let _ = parse_key(piece);
    }
});
