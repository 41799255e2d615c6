//! Component contracts and stock components.
//!
//! Every UI element implements [`Component`]. Elements that accept keyboard
//! input also implement [`InputHandler`] and [`Focusable`]; anything that
//! does both is a [`FocusTarget`] and can be handed to
//! [`Renderer::set_focus`](crate::Renderer::set_focus).
//!
//! Components are shared between the thread that mutates them and the render
//! loop, so all methods take `&self`. Stateful components keep their fields
//! in a [`Guarded`] and snapshot them before doing any rendering work.

mod container;
mod guarded;
mod padding;
mod text;

pub use container::Container;
pub use guarded::Guarded;
pub use padding::PaddingBox;
pub use text::{Spacer, Text};

use crate::buffer::RenderBuffer;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// Something that renders itself as lines of styled text.
pub trait Component: Send + Sync {
    /// Append this component's lines to `buf`.
    ///
    /// No line may exceed `width` visible columns.
    fn render(&self, buf: &mut RenderBuffer, width: usize);

    /// Drop any cached render state.
    fn invalidate(&self) {}
}

/// Receives raw key bytes while focused.
pub trait InputHandler: Send + Sync {
    /// Handle one key's worth of input.
    fn handle_input(&self, data: &[u8]);

    /// Whether Kitty key-release reports should be delivered.
    fn wants_key_release(&self) -> bool {
        false
    }
}

/// Tracks whether a component currently owns keyboard focus.
pub trait Focusable {
    /// Called by the renderer when focus moves to or away from this component.
    fn set_focused(&self, focused: bool);

    /// Current focus state.
    fn is_focused(&self) -> bool;
}

/// An input handler that can hold focus.
pub trait FocusTarget: InputHandler + Focusable {}

impl<T: InputHandler + Focusable + ?Sized> FocusTarget for T {}

/// Stable handle for a child of a [`Container`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ComponentId(u64);

impl ComponentId {
    /// Allocate a process-unique id.
    #[must_use]
    pub fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        Self(NEXT.fetch_add(1, Ordering::Relaxed))
    }

    /// Raw id value.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ComponentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}
