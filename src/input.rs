use crate::app::Page;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

#[derive(Debug, PartialEq, Eq)]
pub enum Action {
    Quit,
    ShowUsers,
    ShowTests,
    MoveUp,
    MoveDown,
    Refresh,

    // Users page
    ToggleAddForm,
    DeleteUser,
    OpenSearch,

    // Text entry (add form, search prompt)
    InsertChar(char),
    Backspace,
    NextField,
    PrevField,
    Submit,
    CancelEdit,

    // Tests page
    RunAll,
    RunSelected,
    NextClass,
    PrevClass,
    NextMethod,
    PrevMethod,
    ToggleFocus,
    Open,
    ShowOutput,

    // Overlays
    Confirm,
    Decline,
    CloseOverlay,
    ScrollUp,
    ScrollDown,
    PageUp,
    PageDown,
    ScrollToTop,
    ScrollToBottom,

    None,
}

/// What currently has the keyboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputMode {
    #[default]
    Normal,
    /// Add-user form or search prompt.
    Editing,
    Confirm,
    Detail,
    Output,
}

#[derive(Debug, Clone, Default)]
pub struct InputContext {
    pub page: Page,
    pub mode: InputMode,
}

pub fn map_key(key: KeyEvent, ctx: &InputContext) -> Action {
    if key.kind != KeyEventKind::Press {
        return Action::None;
    }

    // Ctrl+C always quits
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        return Action::Quit;
    }

    match ctx.mode {
        InputMode::Editing => {
            return match key.code {
                KeyCode::Enter => Action::Submit,
                KeyCode::Esc => Action::CancelEdit,
                KeyCode::Tab | KeyCode::Down => Action::NextField,
                KeyCode::BackTab | KeyCode::Up => Action::PrevField,
                KeyCode::Backspace => Action::Backspace,
                KeyCode::Char(c) => Action::InsertChar(c),
                _ => Action::None,
            };
        }
        InputMode::Confirm => {
            return match key.code {
                KeyCode::Char('y' | 'Y') | KeyCode::Enter => Action::Confirm,
                KeyCode::Char('n' | 'N' | 'q') | KeyCode::Esc => Action::Decline,
                _ => Action::None,
            };
        }
        InputMode::Detail => {
            return match key.code {
                KeyCode::Char('q' | 'd') | KeyCode::Esc | KeyCode::Enter => Action::CloseOverlay,
                _ => Action::None,
            };
        }
        InputMode::Output => {
            return match key.code {
                KeyCode::Char('j') | KeyCode::Down => Action::ScrollDown,
                KeyCode::Char('k') | KeyCode::Up => Action::ScrollUp,
                KeyCode::PageDown => Action::PageDown,
                KeyCode::PageUp => Action::PageUp,
                KeyCode::Char('g') => Action::ScrollToTop,
                KeyCode::Char('G') => Action::ScrollToBottom,
                KeyCode::Char('q' | 'o') | KeyCode::Esc => Action::CloseOverlay,
                _ => Action::None,
            };
        }
        InputMode::Normal => {}
    }

    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => return Action::Quit,
        KeyCode::Char('1') | KeyCode::F(1) => return Action::ShowUsers,
        KeyCode::Char('2') | KeyCode::F(2) => return Action::ShowTests,
        KeyCode::Up | KeyCode::Char('k') => return Action::MoveUp,
        KeyCode::Down | KeyCode::Char('j') => return Action::MoveDown,
        KeyCode::Char('r') => return Action::Refresh,
        _ => {}
    }

    match ctx.page {
        Page::Users => match key.code {
            KeyCode::Char('n' | 'a') => Action::ToggleAddForm,
            KeyCode::Char('x') | KeyCode::Delete => Action::DeleteUser,
            KeyCode::Char('/') => Action::OpenSearch,
            _ => Action::None,
        },
        Page::Tests => match key.code {
            KeyCode::Char('a') => Action::RunAll,
            KeyCode::Char('s') => Action::RunSelected,
            KeyCode::Char('c') | KeyCode::Right => Action::NextClass,
            KeyCode::Char('C') | KeyCode::Left => Action::PrevClass,
            KeyCode::Char('m') => Action::NextMethod,
            KeyCode::Char('M') => Action::PrevMethod,
            KeyCode::Tab => Action::ToggleFocus,
            KeyCode::Enter | KeyCode::Char('d') => Action::Open,
            KeyCode::Char('o') => Action::ShowOutput,
            _ => Action::None,
        },
    }
}
