//! `inline-tui` - inline, differential terminal rendering
//!
//! Renders a tree of components as lines of styled text below the shell
//! prompt, rewriting only the rows that changed with relative cursor motion,
//! and decodes raw terminal input (legacy and Kitty protocol) into keys.

// Crate-level lint configuration
#![warn(unsafe_code)] // Unsafe code needs justification (required for termios FFI)
#![allow(clippy::cast_possible_truncation)] // Intentional column/row casts
#![allow(clippy::cast_sign_loss)] // Intentional row delta conversions
#![allow(clippy::cast_possible_wrap)] // Row counts never approach isize::MAX
#![allow(clippy::module_name_repetitions)] // Allow ansi::AnsiSegment etc
#![allow(clippy::struct_excessive_bools)] // Terminal state needs multiple flags
#![allow(clippy::missing_errors_doc)] // Docs WIP
#![allow(clippy::missing_panics_doc)] // Docs WIP
#![allow(clippy::doc_markdown)] // Allow technical names without backticks
#![allow(clippy::use_self)] // Allow explicit type names in impl blocks
#![allow(clippy::items_after_statements)] // Common pattern in tests
#![allow(clippy::semicolon_if_nothing_returned)] // Style preference

pub mod ansi;
pub mod buffer;
pub mod color;
pub mod component;
pub mod error;
pub mod event;
pub mod input;
pub mod renderer;
pub mod style;
pub mod terminal;
pub mod theme;
pub mod unicode;

// Re-export core types at crate root
pub use color::Rgb;
pub use error::{Error, Result};
pub use event::{
    LogLevel, clear_event_callback, clear_log_callback, emit_event, emit_log, set_event_callback,
    set_log_callback,
};
pub use style::{Style, TextAttributes};
pub use theme::{Theme, ThemeRole, ThemeSlot};

// Components
pub use buffer::{RenderBuffer, acquire_buffer};
pub use component::{
    Component, ComponentId, Container, FocusTarget, Focusable, Guarded, InputHandler, PaddingBox,
    Spacer, Text,
};

// Rendering
pub use renderer::{
    CURSOR_MARKER, Overlay, OverlayPosition, RenderStats, Renderer, RendererOptions,
    extract_cursor_position,
};

// Input
pub use input::{Key, KeyCode, KeyModifiers, parse_key, split_keys};

// Width engine
pub use ansi::{ActiveSgr, extract_ansi, strip_ansi};
pub use unicode::{truncate_to_width, visible_width, wrap_text_with_ansi};

// Terminal
pub use terminal::{
    Capabilities, ColorSupport, RawModeGuard, Terminal, enable_raw_mode, is_tty, terminal_size,
};
