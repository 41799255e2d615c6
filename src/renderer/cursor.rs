//! Hardware cursor marker.

use crate::unicode::visible_width;

/// Zero-width token a focused component embeds where the terminal cursor
/// belongs.
///
/// It is an APC string, so a terminal that somehow receives it displays
/// nothing.
pub const CURSOR_MARKER: &str = "\x1b_cursor\x1b\\";

/// Find, strip and locate the first cursor marker.
///
/// Lines are scanned top to bottom. Returns `(row, column)` where the column
/// is the visible width of the text before the marker, or `None` (the
/// `(-1, -1)` "no cursor" case) when no line contains one. Only the found
/// marker is removed; lines are otherwise untouched.
pub fn extract_cursor_position(lines: &mut [String]) -> Option<(usize, usize)> {
    lines.iter_mut().enumerate().find_map(|(row, line)| {
        let at = line.find(CURSOR_MARKER)?;
        let col = visible_width(&line[..at]);
        line.replace_range(at..at + CURSOR_MARKER.len(), "");
        Some((row, col))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_marker_mid_line() {
        let mut lines = vec![format!("hello{CURSOR_MARKER}world")];
        assert_eq!(extract_cursor_position(&mut lines), Some((0, 5)));
        assert_eq!(lines[0], "helloworld");
    }

    #[test]
    fn test_no_marker_leaves_lines() {
        let mut lines = vec!["hello".to_string(), "world".to_string()];
        assert_eq!(extract_cursor_position(&mut lines), None);
        assert_eq!(lines, ["hello", "world"]);
    }

    #[test]
    fn test_column_ignores_styles_and_counts_wide() {
        let mut lines = vec![
            "first".to_string(),
            format!("\x1b[1m> \x1b[0m漢字{CURSOR_MARKER}"),
        ];
        assert_eq!(extract_cursor_position(&mut lines), Some((1, 6)));
        assert_eq!(lines[1], "\x1b[1m> \x1b[0m漢字");
    }

    #[test]
    fn test_first_marker_wins() {
        let mut lines = vec![
            format!("{CURSOR_MARKER}a"),
            format!("b{CURSOR_MARKER}"),
        ];
        assert_eq!(extract_cursor_position(&mut lines), Some((0, 0)));
        assert_eq!(lines[0], "a");
        assert_eq!(lines[1], format!("b{CURSOR_MARKER}"));
    }
}
