use crate::app::{AppState, HealthBadge, Page};
use crate::tui::spinner;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

pub fn render(f: &mut Frame, area: Rect, state: &AppState) {
    let mut spans = vec![
        Span::styled(
            format!(" {} ", state.config.version_string),
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw("│ "),
    ];

    for (key, label, page) in [("1", "Users", Page::Users), ("2", "Tests", Page::Tests)] {
        let style = if state.page == page {
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        spans.push(Span::styled(format!("{key} "), Style::default().fg(Color::Cyan)));
        spans.push(Span::styled(label, style));
        spans.push(Span::raw("  "));
    }

    spans.push(Span::raw("│ "));
    let health_color = match state.health {
        HealthBadge::Up => Color::Green,
        HealthBadge::Down => Color::Red,
        HealthBadge::Unknown => Color::DarkGray,
    };
    spans.push(Span::styled("● ", Style::default().fg(health_color)));
    spans.push(Span::styled(
        state.health.label(),
        Style::default().fg(health_color),
    ));

    // Run indicator, visible from either page
    if state.tests.is_progress_visible() {
        spans.push(Span::raw(" "));
        spans.push(Span::styled(
            format!("{} running", spinner::frame(state.spinner_frame)),
            Style::default().fg(Color::Yellow),
        ));
    }

    if area.width >= crate::app::NARROW_WIDTH_THRESHOLD * 2 {
        spans.push(Span::styled(
            format!("  {}", state.config.base_url),
            Style::default().fg(Color::DarkGray),
        ));
    }

    let header = Paragraph::new(Line::from(spans)).block(
        Block::default()
            .borders(Borders::BOTTOM)
            .border_style(Style::default().fg(Color::DarkGray)),
    );

    f.render_widget(header, area);
}
