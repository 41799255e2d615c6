//! Text styles and their SGR rendering.
//!
//! ```
//! use inline_tui::{Rgb, Style};
//! use inline_tui::terminal::ColorSupport;
//!
//! let warn = Style::fg(Rgb::YELLOW).with_bold();
//! assert_eq!(
//!     warn.paint("careful", ColorSupport::TrueColor),
//!     "\x1b[1;38;2;255;255;0mcareful\x1b[0m"
//! );
//! ```

use crate::ansi::RESET;
use crate::color::Rgb;
use crate::terminal::ColorSupport;
use bitflags::bitflags;

bitflags! {
    /// Text rendering attributes.
    #[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash)]
    pub struct TextAttributes: u8 {
        const BOLD          = 0x01;
        const DIM           = 0x02;
        const ITALIC        = 0x04;
        const UNDERLINE     = 0x08;
        const INVERSE       = 0x10;
        const STRIKETHROUGH = 0x20;
    }
}

impl TextAttributes {
    /// SGR parameter for each attribute, in emission order.
    const CODES: [(Self, &'static str); 6] = [
        (Self::BOLD, "1"),
        (Self::DIM, "2"),
        (Self::ITALIC, "3"),
        (Self::UNDERLINE, "4"),
        (Self::INVERSE, "7"),
        (Self::STRIKETHROUGH, "9"),
    ];
}

/// Colours plus attributes. `None` colours leave the terminal default.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Style {
    pub fg: Option<Rgb>,
    pub bg: Option<Rgb>,
    pub attributes: TextAttributes,
}

impl Style {
    /// No colours, no attributes.
    pub const NONE: Self = Self {
        fg: None,
        bg: None,
        attributes: TextAttributes::empty(),
    };

    /// Foreground colour only.
    #[must_use]
    pub const fn fg(color: Rgb) -> Self {
        Self {
            fg: Some(color),
            ..Self::NONE
        }
    }

    /// Background colour only.
    #[must_use]
    pub const fn bg(color: Rgb) -> Self {
        Self {
            bg: Some(color),
            ..Self::NONE
        }
    }

    #[must_use]
    pub const fn with_fg(self, color: Rgb) -> Self {
        Self {
            fg: Some(color),
            ..self
        }
    }

    #[must_use]
    pub const fn with_bg(self, color: Rgb) -> Self {
        Self {
            bg: Some(color),
            ..self
        }
    }

    #[must_use]
    pub const fn with_attributes(self, attributes: TextAttributes) -> Self {
        Self {
            attributes: self.attributes.union(attributes),
            ..self
        }
    }

    #[must_use]
    pub const fn with_bold(self) -> Self {
        self.with_attributes(TextAttributes::BOLD)
    }

    #[must_use]
    pub const fn with_dim(self) -> Self {
        self.with_attributes(TextAttributes::DIM)
    }

    #[must_use]
    pub const fn with_italic(self) -> Self {
        self.with_attributes(TextAttributes::ITALIC)
    }

    #[must_use]
    pub const fn with_underline(self) -> Self {
        self.with_attributes(TextAttributes::UNDERLINE)
    }

    /// True if applying this style changes nothing.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.fg.is_none() && self.bg.is_none() && self.attributes.is_empty()
    }

    /// Overlay `other` on top of `self`; set fields in `other` win.
    #[must_use]
    pub fn merge(self, other: Self) -> Self {
        Self {
            fg: other.fg.or(self.fg),
            bg: other.bg.or(self.bg),
            attributes: self.attributes | other.attributes,
        }
    }

    /// The SGR sequence selecting this style, or an empty string.
    #[must_use]
    pub fn sgr(&self, support: ColorSupport) -> String {
        let mut params = String::new();
        for (flag, code) in TextAttributes::CODES {
            if self.attributes.contains(flag) {
                push_param(&mut params, |p| p.push_str(code));
            }
        }
        if let Some(fg) = self.fg {
            push_param(&mut params, |p| fg.write_fg(p, support));
        }
        if let Some(bg) = self.bg {
            push_param(&mut params, |p| bg.write_bg(p, support));
        }
        if params.is_empty() {
            return params;
        }
        format!("\x1b[{params}m")
    }

    /// Wrap `text` in this style followed by a reset.
    ///
    /// Returns `text` unchanged when the style renders to nothing.
    #[must_use]
    pub fn paint(&self, text: &str, support: ColorSupport) -> String {
        let sgr = self.sgr(support);
        if sgr.is_empty() {
            return text.to_owned();
        }
        let mut out = String::with_capacity(sgr.len() + text.len() + RESET.len());
        out.push_str(&sgr);
        out.push_str(text);
        out.push_str(RESET);
        out
    }
}

/// Append one `;`-separated parameter, skipping writers that emit nothing.
fn push_param(params: &mut String, write: impl FnOnce(&mut String)) {
    let mark = params.len();
    if !params.is_empty() {
        params.push(';');
    }
    let before = params.len();
    write(params);
    if params.len() == before {
        params.truncate(mark);
    }
}
