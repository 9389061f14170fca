use crate::app::ConfirmOverlay;
use crate::tui::text_width;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};
use ratatui::Frame;

pub fn render(f: &mut Frame, overlay: &ConfirmOverlay) {
    let area = f.area();

    let width = text_width(&overlay.message).saturating_add(6).clamp(40, 60);
    let overlay_area = crate::tui::centered(area, width, 7);

    f.render_widget(Clear, overlay_area);

    let hints = Line::from(vec![
        Span::styled(
            "y",
            Style::default()
                .fg(Color::Green)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(" confirm   ", Style::default().fg(Color::DarkGray)),
        Span::styled(
            "n",
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        ),
        Span::styled(" cancel ", Style::default().fg(Color::DarkGray)),
    ]);

    let block = Block::default()
        .title(format!(" {} ", overlay.title))
        .title_bottom(hints.centered())
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow))
        .style(Style::default().bg(Color::Black));

    let message = Line::from(Span::styled(
        overlay.message.as_str(),
        Style::default().fg(Color::White),
    ));

    let paragraph = Paragraph::new(vec![Line::from(""), message])
        .block(block)
        .wrap(Wrap { trim: true })
        .centered();
    f.render_widget(paragraph, overlay_area);
}
