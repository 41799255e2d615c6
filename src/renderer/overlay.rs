//! Overlays composited over the base frame.

use crate::buffer::acquire_buffer;
use crate::component::Component;
use crate::unicode::truncate_to_width;
use std::fmt;
use std::sync::Arc;

/// Vertical anchor of an overlay inside the visible viewport.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OverlayPosition {
    Top,
    #[default]
    Center,
    Bottom,
}

/// A component drawn over the base frame.
#[derive(Clone)]
pub struct Overlay {
    pub component: Arc<dyn Component>,
    pub position: OverlayPosition,
    /// Render width; 0 means the terminal width. Never wider than the terminal.
    pub width: usize,
    /// Maximum rows; 0 means the component's natural height.
    pub height: usize,
}

impl Overlay {
    /// Full width, natural height.
    pub fn new(component: Arc<dyn Component>, position: OverlayPosition) -> Self {
        Self {
            component,
            position,
            width: 0,
            height: 0,
        }
    }

    #[must_use]
    pub const fn with_width(mut self, width: usize) -> Self {
        self.width = width;
        self
    }

    #[must_use]
    pub const fn with_height(mut self, height: usize) -> Self {
        self.height = height;
        self
    }

    /// First viewport row for content `content_height` rows tall.
    #[must_use]
    pub const fn start_row(&self, viewport_height: usize, content_height: usize) -> usize {
        let free = viewport_height.saturating_sub(content_height);
        match self.position {
            OverlayPosition::Top => 0,
            OverlayPosition::Center => free / 2,
            OverlayPosition::Bottom => free,
        }
    }
}

impl fmt::Debug for Overlay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Overlay")
            .field("position", &self.position)
            .field("width", &self.width)
            .field("height", &self.height)
            .finish_non_exhaustive()
    }
}

/// Paint `overlays` (bottom of the stack first) onto `frame`.
///
/// Positions are relative to the part of the frame the terminal can show,
/// i.e. its last `height` rows. The frame is padded with blank rows when an
/// overlay reaches below it, and overlay lines are truncated to `width`.
pub fn composite(frame: &mut Vec<String>, overlays: &[Overlay], width: usize, height: usize) {
    for overlay in overlays {
        let overlay_width = match overlay.width {
            0 => width,
            w => w.min(width),
        };

        let mut content = acquire_buffer();
        overlay.component.render(&mut content, overlay_width);
        let mut rows = content.len().min(height);
        if overlay.height > 0 {
            rows = rows.min(overlay.height);
        }
        if rows == 0 {
            continue;
        }

        let viewport_top = frame.len().saturating_sub(height);
        let start = viewport_top + overlay.start_row(height, rows);
        if frame.len() < start + rows {
            frame.resize_with(start + rows, String::new);
        }
        for (slot, line) in frame[start..start + rows].iter_mut().zip(content.lines()) {
            *slot = truncate_to_width(line, width);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::RenderBuffer;
    use crate::unicode::visible_width;

    struct Lines(Vec<&'static str>);

    impl Component for Lines {
        fn render(&self, buf: &mut RenderBuffer, _width: usize) {
            buf.extend(self.0.iter().copied());
        }
    }

    fn overlay(lines: Vec<&'static str>, position: OverlayPosition) -> Overlay {
        Overlay::new(Arc::new(Lines(lines)), position)
    }

    fn frame(lines: &[&str]) -> Vec<String> {
        lines.iter().map(|s| (*s).to_string()).collect()
    }

    #[test]
    fn test_start_rows() {
        let o = overlay(vec![], OverlayPosition::Top);
        assert_eq!(o.start_row(10, 4), 0);
        let o = overlay(vec![], OverlayPosition::Center);
        assert_eq!(o.start_row(10, 4), 3);
        let o = overlay(vec![], OverlayPosition::Bottom);
        assert_eq!(o.start_row(10, 4), 6);
        assert_eq!(o.start_row(3, 4), 0);
    }

    #[test]
    fn test_top_overlay_overwrites_rows() {
        let mut f = frame(&["a", "b", "c"]);
        composite(&mut f, &[overlay(vec!["X"], OverlayPosition::Top)], 10, 5);
        assert_eq!(f, ["X", "b", "c"]);
    }

    #[test]
    fn test_bottom_overlay_pads_frame() {
        let mut f = frame(&["a"]);
        composite(&mut f, &[overlay(vec!["X", "Y"], OverlayPosition::Bottom)], 10, 4);
        assert_eq!(f, ["a", "", "X", "Y"]);
    }

    #[test]
    fn test_height_limits_rows() {
        let mut f = frame(&["a", "b", "c"]);
        let o = overlay(vec!["1", "2", "3"], OverlayPosition::Top).with_height(2);
        composite(&mut f, &[o], 10, 5);
        assert_eq!(f, ["1", "2", "c"]);
    }

    #[test]
    fn test_wide_overlay_is_truncated() {
        let mut f = frame(&["base"]);
        let o = overlay(vec!["0123456789abcdef"], OverlayPosition::Top).with_width(40);
        composite(&mut f, &[o], 8, 3);
        assert_eq!(visible_width(&f[0]), 8);
        assert!(f[0].ends_with('…'));
    }

    #[test]
    fn test_later_overlays_paint_over_earlier() {
        let mut f = frame(&["a", "b"]);
        let overlays = [
            overlay(vec!["low", "low"], OverlayPosition::Top),
            overlay(vec!["high"], OverlayPosition::Top),
        ];
        composite(&mut f, &overlays, 10, 5);
        assert_eq!(f, ["high", "low"]);
    }

    #[test]
    fn test_positions_follow_viewport_when_frame_is_tall() {
        let mut f = frame(&["0", "1", "2", "3", "4", "5"]);
        composite(&mut f, &[overlay(vec!["X"], OverlayPosition::Top)], 10, 3);
        assert_eq!(f, ["0", "1", "2", "X", "4", "5"]);
    }

    #[test]
    fn test_empty_overlay_is_skipped() {
        let mut f = frame(&["a"]);
        composite(&mut f, &[overlay(vec![], OverlayPosition::Bottom)], 10, 5);
        assert_eq!(f, ["a"]);
    }
}
