pub mod confirm_overlay;
pub mod detail_overlay;
pub mod footer;
pub mod header;
pub mod output_overlay;
pub mod render;
pub mod spinner;
pub mod tests_page;
pub mod toasts;
pub mod users_page;

use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Cut `s` to `max_width` display columns, marking the cut with an ellipsis.
pub fn truncate(s: &str, max_width: usize) -> String {
    if UnicodeWidthStr::width(s) <= max_width {
        return s.to_string();
    }
    let mut result = String::new();
    let mut width = 0;
    for c in s.chars() {
        let cw = UnicodeWidthChar::width(c).unwrap_or(0);
        if width + cw + 1 > max_width {
            result.push('…');
            break;
        }
        result.push(c);
        width += cw;
    }
    result
}

/// Display width of `s` in columns, saturating at `u16::MAX`.
pub fn text_width(s: &str) -> u16 {
    u16::try_from(UnicodeWidthStr::width(s)).unwrap_or(u16::MAX)
}

/// A `width` x `height` rectangle centred in `area`, clamped to it.
pub fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    let x = area.x + (area.width.saturating_sub(width)) / 2;
    let y = area.y + (area.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width, height)
}

pub fn selected_style(is_selected: bool) -> Style {
    if is_selected {
        Style::default().add_modifier(Modifier::REVERSED)
    } else {
        Style::default()
    }
}

pub fn border_style(focused: bool) -> Style {
    if focused {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default().fg(Color::DarkGray)
    }
}

/// First row to draw so that `cursor` stays inside a window of `visible` rows.
pub fn scroll_offset(cursor: usize, visible: usize) -> usize {
    if visible == 0 || cursor < visible {
        0
    } else {
        cursor + 1 - visible
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_width_saturates() {
        assert_eq!(text_width("abc"), 3);
        assert_eq!(text_width(&"x".repeat(70_000)), u16::MAX);
    }

    #[test]
    fn truncate_short_unchanged() {
        assert_eq!(truncate("hello", 10), "hello");
        assert_eq!(truncate("hello", 5), "hello");
    }

    #[test]
    fn truncate_long_adds_ellipsis() {
        assert_eq!(truncate("hello world", 6), "hello…");
    }

    #[test]
    fn truncate_zero_width() {
        assert_eq!(truncate("hello", 0), "…");
    }

    #[test]
    fn truncate_wide_characters() {
        // CJK chars are 2 columns each
        let result = truncate("你好世界test", 6);
        assert!(result.ends_with('…'));
        assert!(UnicodeWidthStr::width(result.as_str()) <= 6);
    }

    #[test]
    fn centered_clamps_to_area() {
        let area = Rect::new(0, 0, 20, 10);
        assert_eq!(centered(area, 10, 4), Rect::new(5, 3, 10, 4));
        assert_eq!(centered(area, 50, 50), area);
    }

    #[test]
    fn scroll_keeps_cursor_visible() {
        assert_eq!(scroll_offset(0, 5), 0);
        assert_eq!(scroll_offset(4, 5), 0);
        assert_eq!(scroll_offset(5, 5), 1);
        assert_eq!(scroll_offset(9, 5), 5);
        assert_eq!(scroll_offset(3, 0), 0);
    }
}
