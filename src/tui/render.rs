use crate::app::{ActiveOverlay, AppState, Page};
use crate::tui::{
    confirm_overlay, detail_overlay, footer, header, output_overlay, tests_page, toasts,
    users_page,
};
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::Frame;

pub fn render(f: &mut Frame, state: &AppState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2), // header
            Constraint::Min(1),    // page
            Constraint::Length(2), // footer
        ])
        .split(f.area());

    header::render(f, chunks[0], state);
    match state.page {
        Page::Users => users_page::render(f, chunks[1], state),
        Page::Tests => tests_page::render(f, chunks[1], state),
    }
    footer::render(f, chunks[2], state);

    match &state.overlay {
        ActiveOverlay::Output(_) => output_overlay::render(f, state),
        ActiveOverlay::Detail(overlay) => detail_overlay::render(f, overlay),
        ActiveOverlay::Confirm(overlay) => confirm_overlay::render(f, overlay),
        ActiveOverlay::None => {}
    }

    // Toasts sit above everything, overlays included
    toasts::render(f, chunks[1], &state.toasts);
}
