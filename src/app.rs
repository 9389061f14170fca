use crate::api::{Request, Response};
use crate::input::{Action, InputContext, InputMode};
use crate::model::{short_id, TestResult};
use crate::poller::DEFAULT_POLL_INTERVAL;
use crate::runner::{Focus, TestsPanel, DEFAULT_RECENT_LIMIT};
use crate::toast::{Toasts, DEFAULT_TOAST_TTL};
use crate::users::{UsersPanel, DELETE_PROMPT};
use std::time::{Duration, Instant};

pub const NARROW_WIDTH_THRESHOLD: u16 = 60;
pub const PAGE_SCROLL: usize = 20;
const DETAIL_TRACE_LINES: usize = 12;

/// Side effect requested by a controller, carried out by the event loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    Request(Request),
    StartPolling { execution_id: String, generation: u64 },
    StopPolling,
    Notify(DesktopNotice),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DesktopNotice {
    pub title: String,
    pub body: String,
    pub success: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Page {
    #[default]
    Users,
    Tests,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HealthBadge {
    #[default]
    Unknown,
    Up,
    Down,
}

impl HealthBadge {
    pub fn label(self) -> &'static str {
        match self {
            Self::Unknown => "Checking service...",
            Self::Up => "Service is UP",
            Self::Down => "Service is DOWN",
        }
    }
}

/// Scroll state of the output overlay. The text itself is read live from
/// the tests page, so a polled run keeps streaming into an open overlay.
#[derive(Debug, Clone, Default)]
pub struct OutputOverlay {
    pub scroll: usize,
    /// Pinned to the last line; cleared by scrolling up.
    pub follow: bool,
}

#[derive(Debug, Clone)]
pub struct DetailOverlay {
    pub title: String,
    pub lines: Vec<(String, String)>,
}

#[derive(Debug, Clone)]
pub struct ConfirmOverlay {
    pub title: String,
    pub message: String,
    pub action: ConfirmAction,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfirmAction {
    DeleteUser(u64),
}

/// At most one overlay active at a time. A new overlay replaces the previous.
#[derive(Debug, Clone, Default)]
pub enum ActiveOverlay {
    #[default]
    None,
    Output(OutputOverlay),
    Detail(DetailOverlay),
    Confirm(ConfirmOverlay),
}

/// Immutable configuration set at startup.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub base_url: String,
    pub poll_interval: Duration,
    pub toast_ttl: Duration,
    pub recent_limit: usize,
    pub version_string: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            poll_interval: DEFAULT_POLL_INTERVAL,
            toast_ttl: DEFAULT_TOAST_TTL,
            recent_limit: DEFAULT_RECENT_LIMIT,
            version_string: format!("adminw v{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

pub struct AppState {
    pub config: AppConfig,
    pub page: Page,
    pub health: HealthBadge,

    pub users: UsersPanel,
    pub tests: TestsPanel,
    pub toasts: Toasts,

    pub overlay: ActiveOverlay,

    /// Animation counter for the spinner and progress bar.
    pub spinner_frame: usize,
    pub should_quit: bool,
    pub desktop_notify: bool,
}

impl AppState {
    pub fn new(config: AppConfig) -> Self {
        let toasts = Toasts::new(config.toast_ttl);
        let tests = TestsPanel::new(config.recent_limit);
        Self {
            config,
            page: Page::Users,
            health: HealthBadge::Unknown,
            users: UsersPanel::new(),
            tests,
            toasts,
            overlay: ActiveOverlay::None,
            spinner_frame: 0,
            should_quit: false,
            desktop_notify: true,
        }
    }

    /// Requests issued once at startup, for both pages.
    pub fn init(&self) -> Vec<Effect> {
        let mut effects = vec![Effect::Request(Request::Health), UsersPanel::load()];
        effects.extend(TestsPanel::init());
        effects
    }

    pub fn input_context(&self) -> InputContext {
        let mode = match self.overlay {
            ActiveOverlay::Confirm(_) => InputMode::Confirm,
            ActiveOverlay::Detail(_) => InputMode::Detail,
            ActiveOverlay::Output(_) => InputMode::Output,
            ActiveOverlay::None if self.page == Page::Users && self.users.is_editing() => {
                InputMode::Editing
            }
            ActiveOverlay::None => InputMode::Normal,
        };
        InputContext {
            page: self.page,
            mode,
        }
    }

    pub fn advance_spinner(&mut self) {
        self.spinner_frame = self.spinner_frame.wrapping_add(1);
    }

    pub fn prune_toasts(&mut self) {
        self.toasts.prune(Instant::now());
    }

    /// Apply one key action. `overlay_height` is the number of visible output
    /// lines, needed to clamp scrolling.
    pub fn handle_action(&mut self, action: Action, overlay_height: usize) -> Vec<Effect> {
        let effects = match action {
            Action::Quit => {
                self.should_quit = true;
                Vec::new()
            }
            Action::ShowUsers => {
                self.page = Page::Users;
                Vec::new()
            }
            Action::ShowTests => {
                self.page = Page::Tests;
                Vec::new()
            }
            Action::MoveUp => {
                match self.page {
                    Page::Users => self.users.move_up(),
                    Page::Tests => self.tests.move_up(),
                }
                Vec::new()
            }
            Action::MoveDown => {
                match self.page {
                    Page::Users => self.users.move_down(),
                    Page::Tests => self.tests.move_down(),
                }
                Vec::new()
            }
            Action::Refresh => match self.page {
                Page::Users => vec![Effect::Request(Request::Health), UsersPanel::load()],
                Page::Tests => self.tests.refresh(&mut self.toasts),
            },

            Action::ToggleAddForm => {
                self.users.toggle_add_form();
                Vec::new()
            }
            Action::DeleteUser => {
                if let Some(user) = self.users.selected() {
                    let title = format!("Delete {}", user.username);
                    let action = ConfirmAction::DeleteUser(user.id);
                    self.open_confirm_overlay(title, DELETE_PROMPT.to_string(), action);
                }
                Vec::new()
            }
            Action::OpenSearch => {
                self.users.open_search();
                Vec::new()
            }

            Action::InsertChar(c) => {
                if self.users.search.visible {
                    self.users.search.query.push(c);
                } else {
                    self.users.form.insert_char(c);
                }
                Vec::new()
            }
            Action::Backspace => {
                if self.users.search.visible {
                    self.users.search.query.pop();
                } else {
                    self.users.form.backspace();
                }
                Vec::new()
            }
            Action::NextField => {
                self.users.form.focus_next();
                Vec::new()
            }
            Action::PrevField => {
                self.users.form.focus_prev();
                Vec::new()
            }
            Action::Submit => {
                if self.users.search.visible {
                    self.users.submit_search()
                } else {
                    self.users.submit_add()
                }
            }
            Action::CancelEdit => {
                if self.users.search.visible {
                    self.users.close_search();
                } else if self.users.form.visible {
                    self.users.toggle_add_form();
                }
                Vec::new()
            }

            Action::RunAll => self.tests.run_all(&mut self.toasts),
            Action::RunSelected => self.tests.run_selected(&mut self.toasts),
            Action::NextClass => {
                self.tests.cycle_class(true);
                Vec::new()
            }
            Action::PrevClass => {
                self.tests.cycle_class(false);
                Vec::new()
            }
            Action::NextMethod => {
                self.tests.cycle_method(true);
                Vec::new()
            }
            Action::PrevMethod => {
                self.tests.cycle_method(false);
                Vec::new()
            }
            Action::ToggleFocus => {
                self.tests.toggle_focus();
                Vec::new()
            }
            Action::Open => match self.tests.focus {
                Focus::Results => {
                    if let Some(result) = self.tests.selected_result() {
                        let overlay = result_detail(result);
                        self.overlay = ActiveOverlay::Detail(overlay);
                    }
                    Vec::new()
                }
                Focus::Recent => self.tests.load_selected_execution(),
            },
            Action::ShowOutput => {
                self.overlay = ActiveOverlay::Output(OutputOverlay {
                    scroll: 0,
                    follow: true,
                });
                Vec::new()
            }

            Action::Confirm => match self.take_confirm_action() {
                Some(ConfirmAction::DeleteUser(id)) => UsersPanel::delete(id, true),
                None => Vec::new(),
            },
            Action::Decline => match self.take_confirm_action() {
                Some(ConfirmAction::DeleteUser(id)) => UsersPanel::delete(id, false),
                None => Vec::new(),
            },
            Action::CloseOverlay => {
                self.overlay = ActiveOverlay::None;
                Vec::new()
            }
            Action::ScrollUp => {
                self.scroll_output_up(1, overlay_height);
                Vec::new()
            }
            Action::ScrollDown => {
                self.scroll_output_down(1, overlay_height);
                Vec::new()
            }
            Action::PageUp => {
                self.scroll_output_up(PAGE_SCROLL, overlay_height);
                Vec::new()
            }
            Action::PageDown => {
                self.scroll_output_down(PAGE_SCROLL, overlay_height);
                Vec::new()
            }
            Action::ScrollToTop => {
                if let ActiveOverlay::Output(ref mut overlay) = self.overlay {
                    overlay.scroll = 0;
                    overlay.follow = false;
                }
                Vec::new()
            }
            Action::ScrollToBottom => {
                if let ActiveOverlay::Output(ref mut overlay) = self.overlay {
                    overlay.follow = true;
                }
                Vec::new()
            }
            Action::None => Vec::new(),
        };
        self.filter_effects(effects)
    }

    /// Route an API response to the page that asked for it.
    pub fn handle_response(&mut self, response: Response) -> Vec<Effect> {
        let toasts = &mut self.toasts;
        let effects = match response {
            Response::Health(result) => {
                self.health = match result {
                    Ok(health) if health.is_up() => HealthBadge::Up,
                    Ok(health) => {
                        tracing::info!(status = %health.status, "service reported not healthy");
                        HealthBadge::Down
                    }
                    Err(e) => {
                        tracing::warn!("health check failed: {e}");
                        HealthBadge::Down
                    }
                };
                Vec::new()
            }
            Response::Users(result) => {
                self.users.on_users(result, toasts);
                Vec::new()
            }
            Response::UserCreated(result) => self.users.on_created(result, toasts),
            Response::UserDeleted { id, result } => self.users.on_deleted(id, result, toasts),
            Response::UserFound { username, result } => {
                self.users.on_found(&username, result, toasts)
            }
            Response::AvailableTests(result) => {
                self.tests.on_available(result, toasts);
                Vec::new()
            }
            Response::RunStarted { target, result } => {
                self.tests.on_run_started(&target, result, toasts)
            }
            Response::ExecutionTick { generation, result } => {
                self.tests.on_tick(generation, result, toasts)
            }
            Response::ExecutionRefreshed { id, result } => {
                self.tests.on_refreshed(&id, result, toasts)
            }
            Response::ExecutionLoaded { id, result } => {
                self.tests.on_loaded(id, result, toasts);
                Vec::new()
            }
            Response::Recent(result) => {
                self.tests.on_recent(result);
                Vec::new()
            }
        };
        self.filter_effects(effects)
    }

    fn filter_effects(&self, mut effects: Vec<Effect>) -> Vec<Effect> {
        if !self.desktop_notify {
            effects.retain(|e| !matches!(e, Effect::Notify(_)));
        }
        effects
    }

    // --- Confirm overlay ---

    pub fn has_confirm_overlay(&self) -> bool {
        matches!(self.overlay, ActiveOverlay::Confirm(_))
    }

    pub fn open_confirm_overlay(&mut self, title: String, message: String, action: ConfirmAction) {
        self.overlay = ActiveOverlay::Confirm(ConfirmOverlay {
            title,
            message,
            action,
        });
    }

    /// Close the confirm overlay and hand back what it was guarding.
    fn take_confirm_action(&mut self) -> Option<ConfirmAction> {
        match std::mem::take(&mut self.overlay) {
            ActiveOverlay::Confirm(overlay) => Some(overlay.action),
            other => {
                self.overlay = other;
                None
            }
        }
    }

    // --- Output overlay ---

    pub fn output_lines(&self) -> Vec<&str> {
        self.tests.output.lines().collect()
    }

    /// First visible output line for a viewport of `visible_height` lines.
    pub fn output_offset(&self, visible_height: usize) -> usize {
        let max_scroll = self.output_lines().len().saturating_sub(visible_height);
        match self.overlay {
            ActiveOverlay::Output(ref overlay) if overlay.follow => max_scroll,
            ActiveOverlay::Output(ref overlay) => overlay.scroll.min(max_scroll),
            _ => 0,
        }
    }

    fn scroll_output_up(&mut self, amount: usize, visible_height: usize) {
        let offset = self.output_offset(visible_height);
        if let ActiveOverlay::Output(ref mut overlay) = self.overlay {
            overlay.scroll = offset.saturating_sub(amount);
            overlay.follow = false;
        }
    }

    fn scroll_output_down(&mut self, amount: usize, visible_height: usize) {
        let offset = self.output_offset(visible_height);
        let max_scroll = self.output_lines().len().saturating_sub(visible_height);
        if let ActiveOverlay::Output(ref mut overlay) = self.overlay {
            overlay.scroll = (offset + amount).min(max_scroll);
            overlay.follow = overlay.scroll == max_scroll;
        }
    }

    /// Title for the output overlay, naming the execution on screen.
    pub fn output_title(&self) -> String {
        match self.tests.session.execution_id() {
            Some(id) => format!("Output {}", short_id(id)),
            None => "Output".to_string(),
        }
    }
}

fn result_detail(result: &TestResult) -> DetailOverlay {
    let mut lines = vec![
        ("Class".to_string(), result.test_class.clone()),
        ("Method".to_string(), result.test_method.clone()),
        ("Status".to_string(), result.status.label().to_string()),
        ("Duration".to_string(), format!("{}ms", result.duration)),
    ];
    if let Some(message) = result.message.as_deref().filter(|m| !m.is_empty()) {
        lines.push(("Message".to_string(), message.to_string()));
    }
    if let Some(timestamp) = result.timestamp {
        lines.push((
            "Timestamp".to_string(),
            timestamp.format("%Y-%m-%d %H:%M:%S").to_string(),
        ));
    }
    if let Some(trace) = result.stack_trace.as_deref() {
        for (i, line) in trace.lines().take(DETAIL_TRACE_LINES).enumerate() {
            let label = if i == 0 { "Stack trace" } else { "" };
            lines.push((label.to_string(), line.trim_end().to_string()));
        }
    }
    DetailOverlay {
        title: format!("{}.{}", result.test_class, result.test_method),
        lines,
    }
}
