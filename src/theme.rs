//! Immutable themes and a shareable current-theme slot.
//!
//! A [`ThemeSlot`] hands out `Arc<Theme>` snapshots. A render takes one
//! snapshot up front and uses it to the end, so [`ThemeSlot::replace`] never
//! waits on, or tears, a frame in flight.

use crate::color::Rgb;
use crate::style::Style;
use crate::terminal::ColorSupport;
use std::sync::{Arc, PoisonError, RwLock};

const ROLE_COUNT: usize = 7;

/// Semantic roles a component can style text with.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ThemeRole {
    Text,
    Muted,
    Accent,
    Success,
    Warning,
    Error,
    Border,
}

impl ThemeRole {
    /// Every role, in declaration order.
    pub const ALL: [Self; ROLE_COUNT] = [
        Self::Text,
        Self::Muted,
        Self::Accent,
        Self::Success,
        Self::Warning,
        Self::Error,
        Self::Border,
    ];

    const fn index(self) -> usize {
        self as usize
    }
}

/// A named set of role styles plus the colour depth to render them at.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Theme {
    name: String,
    color: ColorSupport,
    styles: [Style; ROLE_COUNT],
}

impl Theme {
    /// A theme with every role unstyled.
    #[must_use]
    pub fn plain(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            color: ColorSupport::TrueColor,
            styles: [Style::NONE; ROLE_COUNT],
        }
    }

    /// Default palette for dark backgrounds.
    #[must_use]
    pub fn dark() -> Self {
        Self::plain("dark")
            .with_style(ThemeRole::Muted, Style::fg(Rgb::new(0x80, 0x80, 0x80)))
            .with_style(ThemeRole::Accent, Style::fg(Rgb::new(0x5f, 0xaf, 0xff)).with_bold())
            .with_style(ThemeRole::Success, Style::fg(Rgb::new(0x5f, 0xd7, 0x87)))
            .with_style(ThemeRole::Warning, Style::fg(Rgb::new(0xff, 0xd7, 0x5f)))
            .with_style(ThemeRole::Error, Style::fg(Rgb::new(0xff, 0x5f, 0x5f)).with_bold())
            .with_style(ThemeRole::Border, Style::fg(Rgb::new(0x4e, 0x4e, 0x4e)))
    }

    /// Default palette for light backgrounds.
    #[must_use]
    pub fn light() -> Self {
        Self::plain("light")
            .with_style(ThemeRole::Muted, Style::fg(Rgb::new(0x6c, 0x6c, 0x6c)))
            .with_style(ThemeRole::Accent, Style::fg(Rgb::new(0x00, 0x5f, 0xd7)).with_bold())
            .with_style(ThemeRole::Success, Style::fg(Rgb::new(0x00, 0x87, 0x00)))
            .with_style(ThemeRole::Warning, Style::fg(Rgb::new(0xaf, 0x5f, 0x00)))
            .with_style(ThemeRole::Error, Style::fg(Rgb::new(0xd7, 0x00, 0x00)).with_bold())
            .with_style(ThemeRole::Border, Style::fg(Rgb::new(0xb2, 0xb2, 0xb2)))
    }

    /// Set the style for `role`.
    #[must_use]
    pub fn with_style(mut self, role: ThemeRole, style: Style) -> Self {
        self.styles[role.index()] = style;
        self
    }

    /// Render colours at `color` depth.
    #[must_use]
    pub fn with_color_support(mut self, color: ColorSupport) -> Self {
        self.color = color;
        self
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub const fn color_support(&self) -> ColorSupport {
        self.color
    }

    #[must_use]
    pub const fn style(&self, role: ThemeRole) -> Style {
        self.styles[role.index()]
    }

    /// `text` wrapped in the role's style and a trailing reset.
    #[must_use]
    pub fn paint(&self, role: ThemeRole, text: &str) -> String {
        self.style(role).paint(text, self.color)
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::dark()
    }
}

/// Shared handle to the current theme.
///
/// Clones share the same slot.
#[derive(Clone, Debug, Default)]
pub struct ThemeSlot {
    current: Arc<RwLock<Arc<Theme>>>,
}

impl ThemeSlot {
    #[must_use]
    pub fn new(theme: Theme) -> Self {
        Self {
            current: Arc::new(RwLock::new(Arc::new(theme))),
        }
    }

    /// Snapshot of the current theme.
    #[must_use]
    pub fn current(&self) -> Arc<Theme> {
        Arc::clone(&self.current.read().unwrap_or_else(PoisonError::into_inner))
    }

    /// Install a new theme, returning the previous snapshot.
    pub fn replace(&self, theme: Theme) -> Arc<Theme> {
        let next = Arc::new(theme);
        let mut slot = self.current.write().unwrap_or_else(PoisonError::into_inner);
        std::mem::replace(&mut *slot, next)
    }
}
