//! Test execution page: class/method selection, run triggers, the poll-driven
//! display, and the recent-executions list.

use crate::api::{ApiError, Request, RunTarget};
use crate::app::{DesktopNotice, Effect};
use crate::model::{
    short_id, AvailableTests, ExecutionStatus, RunStarted, Summary, TestExecution, TestResult,
};
use crate::session::{RunSession, StartRejected};
use crate::toast::Toasts;

pub const DEFAULT_RECENT_LIMIT: usize = 5;
pub const EMPTY_RESULTS: &str = "No test results yet. Run tests to see results here.";
pub const EMPTY_OUTPUT: &str = "No output available";
pub const EMPTY_RECENT: &str = "No recent executions";
const STARTING_OUTPUT: &str = "Starting test execution...";

/// Indicator colour state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Idle,
    Running,
    Completed,
    Failed,
}

impl From<ExecutionStatus> for Phase {
    fn from(status: ExecutionStatus) -> Self {
        match status {
            ExecutionStatus::Running => Self::Running,
            ExecutionStatus::Completed => Self::Completed,
            ExecutionStatus::Failed => Self::Failed,
            ExecutionStatus::Pending | ExecutionStatus::Unknown => Self::Idle,
        }
    }
}

/// Which list on the page owns the cursor keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Focus {
    #[default]
    Results,
    Recent,
}

#[derive(Debug, Default)]
pub struct TestsPanel {
    pub session: RunSession,
    pub available: AvailableTests,
    pub selected_class: Option<usize>,
    pub selected_method: Option<usize>,

    pub phase: Phase,
    pub status_text: String,
    pub results: Vec<TestResult>,
    pub output: String,
    /// Hidden when there are no results.
    pub summary: Option<Summary>,
    pub run_enabled: bool,

    pub recent: Vec<TestExecution>,
    pub recent_limit: usize,

    pub focus: Focus,
    pub results_cursor: usize,
    pub recent_cursor: usize,
}

impl TestsPanel {
    pub fn new(recent_limit: usize) -> Self {
        Self {
            status_text: "Ready to run tests".to_string(),
            run_enabled: true,
            recent_limit,
            ..Self::default()
        }
    }

    /// Requests issued when the page is first shown.
    pub fn init() -> Vec<Effect> {
        vec![
            Effect::Request(Request::LoadAvailableTests),
            Effect::Request(Request::LoadRecent),
        ]
    }

    // --- Selection ---

    pub fn selected_class_name(&self) -> Option<&str> {
        self.selected_class
            .and_then(|idx| self.available.test_classes.keys().nth(idx))
            .map(String::as_str)
    }

    pub fn selected_method_name(&self) -> Option<&str> {
        let class = self.selected_class_name()?;
        let idx = self.selected_method?;
        self.available.methods(class).get(idx).map(String::as_str)
    }

    /// Step through classes, passing through the empty "select" position.
    /// Changing the class always clears the method.
    pub fn cycle_class(&mut self, forward: bool) {
        let count = self.available.test_classes.len();
        self.selected_class = cycle(self.selected_class, count, forward);
        self.selected_method = None;
    }

    pub fn cycle_method(&mut self, forward: bool) {
        let count = self
            .selected_class_name()
            .map_or(0, |c| self.available.methods(c).len());
        self.selected_method = cycle(self.selected_method, count, forward);
    }

    // --- Navigation ---

    pub fn toggle_focus(&mut self) {
        self.focus = match self.focus {
            Focus::Results => Focus::Recent,
            Focus::Recent => Focus::Results,
        };
    }

    pub fn move_up(&mut self) {
        let cursor = match self.focus {
            Focus::Results => &mut self.results_cursor,
            Focus::Recent => &mut self.recent_cursor,
        };
        *cursor = cursor.saturating_sub(1);
    }

    pub fn move_down(&mut self) {
        let (cursor, len) = match self.focus {
            Focus::Results => (&mut self.results_cursor, self.results.len()),
            Focus::Recent => (&mut self.recent_cursor, self.recent.len()),
        };
        if *cursor + 1 < len {
            *cursor += 1;
        }
    }

    pub fn selected_result(&self) -> Option<&TestResult> {
        self.results.get(self.results_cursor)
    }

    pub fn selected_recent(&self) -> Option<&TestExecution> {
        self.recent.get(self.recent_cursor)
    }

    pub fn is_progress_visible(&self) -> bool {
        self.session.is_polling()
    }

    // --- Run triggers ---

    pub fn run_all(&mut self, toasts: &mut Toasts) -> Vec<Effect> {
        self.start(RunTarget::All, toasts)
    }

    pub fn run_selected(&mut self, toasts: &mut Toasts) -> Vec<Effect> {
        if let Err(reason) = self.session.can_start() {
            return Self::refuse(reason, toasts);
        }
        let (Some(class), Some(method)) = (self.selected_class_name(), self.selected_method_name())
        else {
            toasts.warning("Please select both test class and method");
            return Vec::new();
        };
        let target = RunTarget::Single {
            class: class.to_string(),
            method: method.to_string(),
        };
        self.start(target, toasts)
    }

    fn start(&mut self, target: RunTarget, toasts: &mut Toasts) -> Vec<Effect> {
        if let Err(reason) = self.session.try_begin_start() {
            return Self::refuse(reason, toasts);
        }
        self.phase = Phase::Running;
        self.status_text = match &target {
            RunTarget::All => STARTING_OUTPUT.to_string(),
            RunTarget::Single { class, method } => format!("Running {class}.{method}..."),
        };
        self.clear_results();
        tracing::info!(run = %target.label(), "starting test run");
        vec![Effect::Request(Request::StartRun(target))]
    }

    fn refuse(reason: StartRejected, toasts: &mut Toasts) -> Vec<Effect> {
        tracing::debug!(%reason, "run request refused");
        toasts.warning("Tests are already running");
        Vec::new()
    }

    fn clear_results(&mut self) {
        self.results.clear();
        self.results_cursor = 0;
        self.output = STARTING_OUTPUT.to_string();
        self.summary = None;
    }

    /// Manual refresh: re-fetch the current execution and the recent list,
    /// leaving the poll timer alone.
    pub fn refresh(&self, toasts: &mut Toasts) -> Vec<Effect> {
        let mut effects = Vec::new();
        if let Some(id) = self.session.execution_id() {
            effects.push(Effect::Request(Request::RefreshExecution(id.to_string())));
        }
        effects.push(Effect::Request(Request::LoadRecent));
        toasts.success("Results refreshed");
        effects
    }

    pub fn load_selected_execution(&self) -> Vec<Effect> {
        self.selected_recent()
            .map(|e| vec![Effect::Request(Request::LoadExecution(e.id.clone()))])
            .unwrap_or_default()
    }

    // --- Responses ---

    pub fn on_available(&mut self, result: Result<AvailableTests, ApiError>, toasts: &mut Toasts) {
        match result {
            Ok(available) => {
                self.available = available;
                self.selected_class = None;
                self.selected_method = None;
            }
            Err(e) => {
                tracing::warn!("loading available tests failed: {e}");
                toasts.error("Failed to load available tests");
            }
        }
    }

    pub fn on_run_started(
        &mut self,
        target: &RunTarget,
        result: Result<RunStarted, ApiError>,
        toasts: &mut Toasts,
    ) -> Vec<Effect> {
        match result {
            Ok(started) => {
                let generation = self.session.start_polling(started.execution_id.clone());
                self.run_enabled = false;
                match target {
                    RunTarget::All => toasts.success("Test execution started successfully"),
                    RunTarget::Single { class, method } => {
                        toasts.success(format!("Test execution started: {class}.{method}"));
                    }
                }
                tracing::info!(
                    execution_id = %started.execution_id,
                    generation,
                    "polling execution"
                );
                vec![Effect::StartPolling {
                    execution_id: started.execution_id,
                    generation,
                }]
            }
            Err(e) => {
                tracing::warn!(run = %target.label(), "starting run failed: {e}");
                self.session.start_failed();
                self.phase = Phase::Failed;
                self.status_text = match target {
                    RunTarget::All => "Failed to start tests".to_string(),
                    RunTarget::Single { .. } => "Failed to start test".to_string(),
                };
                toasts.error("Failed to start test execution");
                Vec::new()
            }
        }
    }

    /// A poll timer tick. Failed ticks and ticks from a stopped or replaced
    /// poll change nothing.
    pub fn on_tick(
        &mut self,
        generation: u64,
        result: Result<TestExecution, ApiError>,
        toasts: &mut Toasts,
    ) -> Vec<Effect> {
        if !self.session.accepts(generation) {
            tracing::debug!(generation, "dropping stale poll result");
            return Vec::new();
        }
        match result {
            Ok(execution) => self.apply_execution(execution, toasts),
            Err(e) => {
                tracing::debug!(generation, "poll tick ignored: {e}");
                Vec::new()
            }
        }
    }

    pub fn on_refreshed(
        &mut self,
        id: &str,
        result: Result<TestExecution, ApiError>,
        toasts: &mut Toasts,
    ) -> Vec<Effect> {
        if !self.session.is_current(id) {
            tracing::debug!(id, "dropping refresh for a superseded execution");
            return Vec::new();
        }
        match result {
            Ok(execution) => self.apply_execution(execution, toasts),
            Err(e) => {
                tracing::warn!(id, "refreshing execution failed: {e}");
                Vec::new()
            }
        }
    }

    pub fn on_loaded(
        &mut self,
        id: String,
        result: Result<TestExecution, ApiError>,
        toasts: &mut Toasts,
    ) {
        match result {
            Ok(execution) => {
                if self.session.is_polling() {
                    // The tracked run keeps its id; its next tick repaints the display.
                    tracing::debug!(id, "showing past execution while a run is polled");
                } else {
                    self.session.adopt(id.clone());
                }
                self.update_display(&execution);
                toasts.success(format!("Loaded execution {}", short_id(&id)));
            }
            Err(e) => {
                tracing::warn!(id, "loading execution failed: {e}");
                toasts.error("Failed to load execution");
            }
        }
    }

    pub fn on_recent(&mut self, result: Result<Vec<TestExecution>, ApiError>) {
        match result {
            Ok(mut executions) => {
                executions.truncate(self.recent_limit);
                self.recent = executions;
                if self.recent_cursor >= self.recent.len() {
                    self.recent_cursor = self.recent.len().saturating_sub(1);
                }
            }
            Err(e) => tracing::warn!("loading recent executions failed: {e}"),
        }
    }

    fn apply_execution(&mut self, execution: TestExecution, toasts: &mut Toasts) -> Vec<Effect> {
        self.update_display(&execution);
        if !execution.status.is_terminal() {
            return Vec::new();
        }

        // Only a tracked poll announces completion; a refreshed past run just repaints.
        let was_polling = self.session.is_polling();
        self.session.stop();
        self.run_enabled = true;
        let success = execution.status == ExecutionStatus::Completed;
        if success {
            toasts.success("Test execution completed successfully");
        } else {
            toasts.error("Test execution failed");
        }
        tracing::info!(
            execution_id = %execution.id,
            status = execution.status.label(),
            was_polling,
            "execution finished"
        );

        if !was_polling {
            return vec![Effect::Request(Request::LoadRecent)];
        }
        let title = if success { "Tests passed" } else { "Tests failed" };
        vec![
            Effect::StopPolling,
            Effect::Request(Request::LoadRecent),
            Effect::Notify(DesktopNotice {
                title: title.to_string(),
                body: execution.status_message(),
                success,
            }),
        ]
    }

    /// Overwrite status, results, output and summary from one execution.
    fn update_display(&mut self, execution: &TestExecution) {
        self.phase = Phase::from(execution.status);
        self.status_text = execution.status_message();
        self.results.clone_from(&execution.results);
        if self.results_cursor >= self.results.len() {
            self.results_cursor = self.results.len().saturating_sub(1);
        }
        self.output.clone_from(&execution.output);
        self.summary = if execution.results.is_empty() {
            None
        } else {
            Some(execution.summary())
        };
    }
}

/// Advance an optional index over `count` items; `None` sits between the
/// last and the first item.
fn cycle(current: Option<usize>, count: usize, forward: bool) -> Option<usize> {
    if count == 0 {
        return None;
    }
    match (current, forward) {
        (None, true) => Some(0),
        (None, false) => Some(count - 1),
        (Some(i), true) if i + 1 < count => Some(i + 1),
        (Some(i), false) if i > 0 => Some(i - 1),
        (Some(_), _) => None,
    }
}
