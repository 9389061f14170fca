use crate::app::AppState;
use crate::runner::EMPTY_OUTPUT;
use ratatui::layout::Rect;
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};
use ratatui::Frame;

/// Overlay size: ~90% width, ~80% height, centred.
pub fn area(screen: Rect) -> Rect {
    let width = (screen.width * 9 / 10).max(screen.width.min(20)).min(screen.width);
    let height = (screen.height * 8 / 10).max(6).min(screen.height);
    crate::tui::centered(screen, width, height)
}

/// Output rows visible inside the overlay for a screen of `screen_height`.
/// Must stay in sync with [`area`].
pub fn visible_height(screen_height: u16) -> usize {
    ((screen_height * 8 / 10).max(6).min(screen_height) as usize).saturating_sub(2)
}

pub fn render(f: &mut Frame, state: &AppState) {
    let overlay_area = area(f.area());
    f.render_widget(Clear, overlay_area);

    let inner_height = overlay_area.height.saturating_sub(2) as usize;
    let lines = state.output_lines();
    let total = lines.len();
    let offset = state.output_offset(inner_height);

    let position = if total > inner_height {
        format!(
            " [{}-{}/{}] ",
            offset + 1,
            (offset + inner_height).min(total),
            total,
        )
    } else {
        String::new()
    };
    let follow = matches!(state.overlay, crate::app::ActiveOverlay::Output(ref o) if o.follow);
    let title = format!(
        " {} {}{}",
        state.output_title(),
        position,
        if follow { "[tail] " } else { "" }
    );
    let hints = " j/k scroll | g/G top/tail | q close ";

    let block = Block::default()
        .title(title)
        .title_bottom(Line::from(hints).centered())
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow))
        .style(Style::default().bg(Color::Black));

    let visible: Vec<Line> = if lines.is_empty() {
        vec![Line::from(Span::styled(
            EMPTY_OUTPUT,
            Style::default().fg(Color::DarkGray),
        ))]
    } else {
        lines
            .iter()
            .skip(offset)
            .take(inner_height)
            .map(|l| Line::from(Span::raw(*l)))
            .collect()
    };

    // One output line per row, no wrapping
    f.render_widget(Paragraph::new(visible).block(block), overlay_area);
}
