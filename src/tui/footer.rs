use ratatui::layout::Rect;
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

use crate::app::{AppState, Page};
use crate::input::InputMode;

pub fn render(f: &mut Frame, area: Rect, state: &AppState) {
    let hints = hints(state, area.width < crate::app::NARROW_WIDTH_THRESHOLD);

    let mut spans: Vec<Span> = Vec::new();
    for (i, (key, desc)) in hints.iter().enumerate() {
        if i > 0 {
            spans.push(Span::raw(" "));
        }
        spans.push(Span::styled(*key, Style::default().fg(Color::Cyan)));
        spans.push(Span::styled(
            format!(" {desc}"),
            Style::default().fg(Color::DarkGray),
        ));
    }

    let footer = Paragraph::new(Line::from(spans)).block(
        Block::default()
            .borders(Borders::TOP)
            .border_style(Style::default().fg(Color::DarkGray)),
    );
    f.render_widget(footer, area);
}

fn hints(state: &AppState, narrow: bool) -> &'static [(&'static str, &'static str)] {
    let ctx = state.input_context();
    match ctx.mode {
        InputMode::Editing if state.users.search.visible => {
            &[("Enter", "search"), ("Esc", "cancel")]
        }
        InputMode::Editing => &[("Tab", "next field"), ("Enter", "create"), ("Esc", "cancel")],
        InputMode::Confirm => &[("y", "confirm"), ("n", "cancel")],
        InputMode::Detail => &[("d/q/Esc", "close")],
        InputMode::Output => &[("j/k", "scroll"), ("g/G", "top/tail"), ("q", "close")],
        InputMode::Normal => match (ctx.page, narrow) {
            (Page::Users, true) => &[("j/k", "nav"), ("n", "add"), ("x", "del"), ("q", "quit")],
            (Page::Users, false) => &[
                ("↑↓/jk", "navigate"),
                ("n", "add user"),
                ("x", "delete"),
                ("/", "search"),
                ("r", "reload"),
                ("2", "tests"),
                ("q", "quit"),
            ],
            (Page::Tests, true) => &[("a", "all"), ("s", "run"), ("o", "out"), ("q", "quit")],
            (Page::Tests, false) => &[
                ("a", "run all"),
                ("c/C", "class"),
                ("m/M", "method"),
                ("s", "run selected"),
                ("Tab", "focus"),
                ("Enter", "open"),
                ("o", "output"),
                ("r", "refresh"),
                ("1", "users"),
                ("q", "quit"),
            ],
        },
    }
}
