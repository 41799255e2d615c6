//! Padding wrapper.

use crate::buffer::{RenderBuffer, acquire_buffer};
use crate::component::Component;
use std::sync::Arc;

/// Renders a child inset by blank columns and rows.
pub struct PaddingBox {
    child: Arc<dyn Component>,
    horizontal: usize,
    vertical: usize,
}

impl PaddingBox {
    /// `horizontal` columns on each side, `vertical` rows above and below.
    pub fn new(child: Arc<dyn Component>, horizontal: usize, vertical: usize) -> Self {
        Self {
            child,
            horizontal,
            vertical,
        }
    }
}

impl Component for PaddingBox {
    fn render(&self, buf: &mut RenderBuffer, width: usize) {
        let inner_width = width.saturating_sub(self.horizontal * 2);
        if inner_width == 0 {
            return;
        }

        let mut inner = acquire_buffer();
        self.child.render(&mut inner, inner_width);
        if inner.is_empty() {
            return;
        }

        let indent = " ".repeat(self.horizontal);
        buf.push_blank(self.vertical);
        buf.extend(inner.lines().iter().map(|line| format!("{indent}{line}")));
        buf.push_blank(self.vertical);
    }

    fn invalidate(&self) {
        self.child.invalidate();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::component::Text;

    #[test]
    fn test_padding_insets_child() {
        let boxed = PaddingBox::new(Arc::new(Text::new("abcdef")), 2, 1);
        let mut buf = RenderBuffer::new();
        boxed.render(&mut buf, 7);
        assert_eq!(buf.lines(), ["", "  abc", "  def", ""]);
    }

    #[test]
    fn test_too_narrow_renders_nothing() {
        let boxed = PaddingBox::new(Arc::new(Text::new("abc")), 3, 0);
        let mut buf = RenderBuffer::new();
        boxed.render(&mut buf, 6);
        assert!(buf.is_empty());
    }

    #[test]
    fn test_empty_child_has_no_padding_rows() {
        let boxed = PaddingBox::new(Arc::new(Text::new("")), 1, 2);
        let mut buf = RenderBuffer::new();
        boxed.render(&mut buf, 10);
        assert!(buf.is_empty());
    }
}
