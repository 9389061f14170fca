use crate::app::AppState;
use crate::model::User;
use crate::tui::{border_style, scroll_offset, truncate};
use crate::users::{AddForm, FormField, EMPTY_USERS};
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

/// Rows per card: title, details, id, spacer.
const CARD_HEIGHT: u16 = 4;
const FORM_HEIGHT: u16 = 5;

pub fn render(f: &mut Frame, area: Rect, state: &AppState) {
    let panel = &state.users;

    let mut constraints = Vec::new();
    if panel.search.visible {
        constraints.push(Constraint::Length(1));
    }
    if panel.form.visible {
        constraints.push(Constraint::Length(FORM_HEIGHT));
    }
    constraints.push(Constraint::Min(1));

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(area);

    let mut next = 0;
    if panel.search.visible {
        render_search(f, chunks[next], &panel.search.query);
        next += 1;
    }
    if panel.form.visible {
        render_form(f, chunks[next], &panel.form);
        next += 1;
    }
    render_cards(f, chunks[next], state);
}

fn render_search(f: &mut Frame, area: Rect, query: &str) {
    let line = Line::from(vec![
        Span::styled(" Search username: ", Style::default().fg(Color::Cyan)),
        Span::raw(query.to_string()),
        Span::styled("█", Style::default().fg(Color::Cyan)),
    ]);
    f.render_widget(Paragraph::new(line), area);
}

fn render_form(f: &mut Frame, area: Rect, form: &AddForm) {
    let title = if form.submitting {
        " Add user (saving…) "
    } else {
        " Add user "
    };
    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(border_style(true));

    let label_width = FormField::ALL
        .iter()
        .map(|field| field.label().len())
        .max()
        .unwrap_or(0);

    let lines: Vec<Line> = FormField::ALL
        .iter()
        .map(|&field| {
            let focused = field == form.focus;
            let mut spans = vec![
                Span::styled(
                    format!("{:>label_width$}: ", field.label()),
                    Style::default().fg(if focused { Color::Cyan } else { Color::DarkGray }),
                ),
                Span::raw(form.value(field).to_string()),
            ];
            if focused {
                spans.push(Span::styled("█", Style::default().fg(Color::Cyan)));
            }
            Line::from(spans)
        })
        .collect();

    f.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_cards(f: &mut Frame, area: Rect, state: &AppState) {
    let panel = &state.users;

    if panel.users.is_empty() {
        let msg = if panel.loaded {
            EMPTY_USERS
        } else {
            "Loading users…"
        };
        let para = Paragraph::new(msg)
            .style(Style::default().fg(Color::DarkGray))
            .block(Block::default().borders(Borders::NONE));
        f.render_widget(para, area);
        return;
    }

    let inner_width = area.width.saturating_sub(2) as usize;
    let visible_cards = (area.height / CARD_HEIGHT).max(1) as usize;
    let offset = scroll_offset(panel.cursor, visible_cards);

    let mut lines: Vec<Line> = Vec::new();
    for (i, user) in panel
        .users
        .iter()
        .enumerate()
        .skip(offset)
        .take(visible_cards)
    {
        lines.extend(card_lines(user, i == panel.cursor, inner_width));
    }

    f.render_widget(Paragraph::new(lines), area);
}

fn card_lines(user: &User, is_selected: bool, max_width: usize) -> Vec<Line<'static>> {
    let (marker, marker_style) = if is_selected {
        ("▌ ", Style::default().fg(Color::Cyan))
    } else {
        ("  ", Style::default())
    };
    let body_width = max_width.saturating_sub(2);

    let title_style = if is_selected {
        Style::default().add_modifier(Modifier::BOLD | Modifier::REVERSED)
    } else {
        Style::default().add_modifier(Modifier::BOLD)
    };

    vec![
        Line::from(vec![
            Span::styled(marker, marker_style),
            Span::styled(truncate(user.display_name(), body_width), title_style),
        ]),
        Line::from(vec![
            Span::styled(marker, marker_style),
            Span::raw(truncate(
                &format!("Username: {} | Email: {}", user.username, user.email),
                body_width,
            )),
        ]),
        Line::from(vec![
            Span::styled(marker, marker_style),
            Span::styled(format!("ID: {}", user.id), Style::default().fg(Color::DarkGray)),
        ]),
        Line::raw(""),
    ]
}
