//! 24-bit colours and their SGR encodings.
//!
//! # Examples
//!
//! ```
//! use inline_tui::Rgb;
//! use inline_tui::terminal::ColorSupport;
//!
//! let accent = Rgb::from_hex("#5fafff").unwrap();
//! let mut sgr = String::new();
//! accent.write_fg(&mut sgr, ColorSupport::Extended);
//! assert_eq!(sgr, "38;5;75");
//! ```

use crate::terminal::ColorSupport;
use std::fmt::{self, Write as _};

/// An opaque RGB colour.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const BLACK: Self = Self::new(0, 0, 0);
    pub const WHITE: Self = Self::new(255, 255, 255);
    pub const RED: Self = Self::new(255, 0, 0);
    pub const GREEN: Self = Self::new(0, 255, 0);
    pub const BLUE: Self = Self::new(0, 0, 255);
    pub const YELLOW: Self = Self::new(255, 255, 0);
    pub const CYAN: Self = Self::new(0, 255, 255);
    pub const MAGENTA: Self = Self::new(255, 0, 255);
    pub const GRAY: Self = Self::new(128, 128, 128);

    /// Create a colour from components.
    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse `#RGB` or `#RRGGBB` (the `#` is optional).
    #[must_use]
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.strip_prefix('#').unwrap_or(hex);
        if !hex.is_ascii() {
            return None;
        }
        let channel = |range: std::ops::Range<usize>| u8::from_str_radix(&hex[range], 16).ok();

        match hex.len() {
            3 => {
                let r = channel(0..1)?;
                let g = channel(1..2)?;
                let b = channel(2..3)?;
                Some(Self::new(r * 17, g * 17, b * 17))
            }
            6 => Some(Self::new(channel(0..2)?, channel(2..4)?, channel(4..6)?)),
            _ => None,
        }
    }

    /// Nearest index in the xterm 256-colour palette.
    ///
    /// Near-grey colours map onto the 24-step grey ramp, everything else
    /// onto the 6x6x6 cube.
    #[must_use]
    pub fn to_256_color(self) -> u8 {
        let (r, g, b) = (i16::from(self.r), i16::from(self.g), i16::from(self.b));
        let gray = (r + g + b) / 3;
        if (r - gray).abs() < 10 && (g - gray).abs() < 10 && (b - gray).abs() < 10 {
            let step = u8::try_from(gray * 24 / 256).unwrap_or(23);
            return 232 + step.min(23);
        }
        16 + 36 * cube_index(self.r) + 6 * cube_index(self.g) + cube_index(self.b)
    }

    /// Nearest basic ANSI colour (0-15).
    #[must_use]
    pub fn to_16_color(self) -> u8 {
        #[rustfmt::skip]
        const PALETTE: [(i32, i32, i32); 16] = [
            (0, 0, 0), (205, 0, 0), (0, 205, 0), (205, 205, 0),
            (0, 0, 238), (205, 0, 205), (0, 205, 205), (229, 229, 229),
            (127, 127, 127), (255, 0, 0), (0, 255, 0), (255, 255, 0),
            (92, 92, 255), (255, 0, 255), (0, 255, 255), (255, 255, 255),
        ];
        let (r, g, b) = (i32::from(self.r), i32::from(self.g), i32::from(self.b));
        let mut best = 0u8;
        let mut best_dist = i32::MAX;
        for (index, &(pr, pg, pb)) in (0u8..).zip(PALETTE.iter()) {
            let dist = (r - pr).pow(2) + (g - pg).pow(2) + (b - pb).pow(2);
            if dist < best_dist {
                best = index;
                best_dist = dist;
            }
        }
        best
    }

    /// Append the SGR parameters selecting this colour as foreground.
    ///
    /// Writes nothing for [`ColorSupport::None`].
    pub fn write_fg(self, out: &mut String, support: ColorSupport) {
        self.write_params(out, support, 38, 30, 90);
    }

    /// Append the SGR parameters selecting this colour as background.
    pub fn write_bg(self, out: &mut String, support: ColorSupport) {
        self.write_params(out, support, 48, 40, 100);
    }

    fn write_params(self, out: &mut String, support: ColorSupport, extended: u8, base: u8, bright: u8) {
        // fmt::Write for String never fails.
        let _ = match support {
            ColorSupport::None => Ok(()),
            ColorSupport::Basic => {
                let index = self.to_16_color();
                if index < 8 {
                    write!(out, "{}", base + index)
                } else {
                    write!(out, "{}", bright + index - 8)
                }
            }
            ColorSupport::Extended => write!(out, "{extended};5;{}", self.to_256_color()),
            ColorSupport::TrueColor => {
                write!(out, "{extended};2;{};{};{}", self.r, self.g, self.b)
            }
        };
    }
}

const fn cube_index(value: u8) -> u8 {
    match value {
        0..48 => 0,
        48..115 => 1,
        115..155 => 2,
        155..195 => 3,
        195..235 => 4,
        _ => 5,
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}
