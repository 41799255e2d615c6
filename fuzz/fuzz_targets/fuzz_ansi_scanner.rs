//! Fuzz target for the ANSI scanner and width engine.

#![no_main]

use inline_tui::ansi::{extract_ansi, strip_ansi};
use inline_tui::unicode::{truncate_to_width, visible_width, wrap_text_with_ansi};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: (&str, u8)| {
    let (text, width) = data;
    let width = usize::from(width % 120) + 1;

    let stripped = strip_ansi(text);
    assert!(!stripped.contains('\x1b'));
    let escape_bytes: usize = extract_ansi(text).iter().map(|e| e.len()).sum();
    assert_eq!(stripped.len() + escape_bytes, text.len());

    assert_eq!(visible_width(text), visible_width(&stripped));

    for line in wrap_text_with_ansi(text, width) {
        assert!(visible_width(&line) <= width);
    }
    assert!(visible_width(&truncate_to_width(text, width)) <= width);
});
