use crate::app::DetailOverlay;
use crate::tui::truncate;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};
use ratatui::Frame;
use unicode_width::UnicodeWidthStr;

pub fn render(f: &mut Frame, overlay: &DetailOverlay) {
    let area = f.area();

    // +2 border +1 bottom hint; cap before casting to u16 to avoid wrapping
    let content_height = (overlay.lines.len().min(u16::MAX as usize - 3) as u16).saturating_add(3);
    let width = (area.width * 7 / 10).max(40).min(area.width);
    let height = content_height.max(5).min(area.height);
    let overlay_area = crate::tui::centered(area, width, height);

    f.render_widget(Clear, overlay_area);

    let inner_width = width.saturating_sub(2) as usize;
    let title = format!(" {} ", truncate(&overlay.title, inner_width.saturating_sub(2)));

    let block = Block::default()
        .title(title)
        .title_bottom(Line::from(" d/q/Esc close ").centered())
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .style(Style::default().bg(Color::Black));

    let label_width = overlay
        .lines
        .iter()
        .map(|(l, _)| UnicodeWidthStr::width(l.as_str()))
        .max()
        .unwrap_or(0);
    let value_max = inner_width.saturating_sub(label_width + 2);

    let lines: Vec<Line> = overlay
        .lines
        .iter()
        .map(|(label, value)| {
            let value_style = match value.as_str() {
                "PASSED" => Style::default().fg(Color::Green),
                "FAILED" => Style::default().fg(Color::Red),
                "SKIPPED" => Style::default().fg(Color::Yellow),
                _ if label.is_empty() => Style::default().fg(Color::DarkGray),
                _ => Style::default().fg(Color::White),
            };
            Line::from(vec![
                Span::styled(
                    format!("{label:>label_width$}  "),
                    Style::default()
                        .fg(Color::Cyan)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::styled(truncate(value, value_max), value_style),
            ])
        })
        .collect();

    f.render_widget(Paragraph::new(lines).block(block), overlay_area);
}
