use crate::toast::{Severity, Toasts};
use crate::tui::{text_width, truncate};
use ratatui::layout::Rect;
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};
use ratatui::Frame;

const TOAST_HEIGHT: u16 = 3;
const MAX_TOAST_WIDTH: u16 = 50;

pub fn severity_style(severity: Severity) -> (&'static str, Color) {
    match severity {
        Severity::Success => ("✓", Color::Green),
        Severity::Error => ("✗", Color::Red),
        Severity::Warning => ("!", Color::Yellow),
        Severity::Info => ("i", Color::Cyan),
    }
}

/// Stack toasts in the top-right corner of `area`, newest on top. Toasts
/// that do not fit are skipped, not queued.
pub fn render(f: &mut Frame, area: Rect, toasts: &Toasts) {
    let mut y = area.y;
    for toast in toasts.iter() {
        if y + TOAST_HEIGHT > area.y + area.height {
            break;
        }
        let (icon, color) = severity_style(toast.severity);

        let wanted = text_width(&toast.message).saturating_add(6);
        let width = wanted.min(MAX_TOAST_WIDTH).min(area.width);
        let x = area.x + area.width.saturating_sub(width);
        let toast_area = Rect::new(x, y, width, TOAST_HEIGHT);

        f.render_widget(Clear, toast_area);
        let message = truncate(&toast.message, width.saturating_sub(4) as usize);
        let line = Line::from(vec![
            Span::styled(format!("{icon} "), Style::default().fg(color)),
            Span::styled(message, Style::default().fg(Color::White)),
        ]);
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(color))
            .style(Style::default().bg(Color::Black));
        f.render_widget(Paragraph::new(line).block(block), toast_area);

        y += TOAST_HEIGHT;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;

    #[test]
    fn oversized_message_is_clamped_to_toast_width() {
        let mut toasts = Toasts::default();
        toasts.warning(format!("No user named {}", "z".repeat(70_000)));
        let mut terminal = Terminal::new(TestBackend::new(80, 10)).unwrap();

        terminal.draw(|f| render(f, f.area(), &toasts)).unwrap();

        let buffer = terminal.backend().buffer();
        let row: String = (0..80)
            .map(|x| buffer.cell((x, 1)).unwrap().symbol().to_string())
            .collect();
        assert!(row.contains("No user named z"), "got: {row}");
        assert!(row.trim_end().ends_with('│'));
        assert_eq!(row.find('│'), Some(80 - MAX_TOAST_WIDTH as usize));
    }
}
