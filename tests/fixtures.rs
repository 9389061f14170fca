#![allow(dead_code)]

use adminw::api::{self, AdminApi, ApiError, Request};
use adminw::app::{AppConfig, AppState, Effect};
use adminw::model::{
    AvailableTests, ExecutionStatus, Health, NewUser, ResultStatus, RunStarted, TestExecution,
    TestResult, User,
};
use async_trait::async_trait;
use reqwest::StatusCode;
use std::collections::{BTreeMap, HashSet, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

/// In-memory [`AdminApi`] that records every call.
#[derive(Default)]
pub struct FakeApi {
    pub calls: Mutex<Vec<String>>,
    pub users: Mutex<Vec<User>>,
    pub available: Mutex<AvailableTests>,
    pub recent: Mutex<Vec<TestExecution>>,
    /// Served in order by `execution`; the last one repeats once drained.
    pub execution_script: Mutex<VecDeque<TestExecution>>,
    pub last_execution: Mutex<Option<TestExecution>>,
    /// Method names that answer with HTTP 500.
    pub failing: Mutex<HashSet<&'static str>>,
    pub execution_delay: Mutex<Option<Duration>>,
    next_id: AtomicUsize,
    in_flight: AtomicUsize,
    pub max_in_flight: AtomicUsize,
}

impl FakeApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_users(users: Vec<User>) -> Self {
        let api = Self::new();
        *api.users.lock().unwrap() = users;
        api
    }

    pub fn fail(&self, method: &'static str) {
        self.failing.lock().unwrap().insert(method);
    }

    pub fn script(&self, executions: Vec<TestExecution>) {
        *self.execution_script.lock().unwrap() = executions.into();
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn count(&self, prefix: &str) -> usize {
        self.calls().iter().filter(|c| c.starts_with(prefix)).count()
    }

    fn record(&self, method: &'static str, detail: impl Into<String>) -> Result<(), ApiError> {
        let detail = detail.into();
        let call = if detail.is_empty() {
            method.to_string()
        } else {
            format!("{method} {detail}")
        };
        self.calls.lock().unwrap().push(call);
        if self.failing.lock().unwrap().contains(method) {
            Err(ApiError::Status(StatusCode::INTERNAL_SERVER_ERROR))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl AdminApi for FakeApi {
    async fn health(&self) -> Result<Health, ApiError> {
        self.record("health", "")?;
        Ok(Health {
            status: "UP".to_string(),
            service: Some("user-service".to_string()),
            version: None,
        })
    }

    async fn list_users(&self) -> Result<Vec<User>, ApiError> {
        self.record("list_users", "")?;
        Ok(self.users.lock().unwrap().clone())
    }

    async fn create_user(&self, user: &NewUser) -> Result<(), ApiError> {
        self.record("create_user", user.username.clone())?;
        let mut users = self.users.lock().unwrap();
        let id = users.iter().map(|u| u.id).max().unwrap_or(0) + 1;
        users.push(User {
            id,
            username: user.username.clone(),
            email: user.email.clone(),
            full_name: user.full_name.clone(),
        });
        Ok(())
    }

    async fn delete_user(&self, id: u64) -> Result<(), ApiError> {
        self.record("delete_user", id.to_string())?;
        self.users.lock().unwrap().retain(|u| u.id != id);
        Ok(())
    }

    async fn find_user(&self, username: &str) -> Result<User, ApiError> {
        self.record("find_user", username)?;
        self.users
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.username == username)
            .cloned()
            .ok_or(ApiError::Status(StatusCode::NOT_FOUND))
    }

    async fn available_tests(&self) -> Result<AvailableTests, ApiError> {
        self.record("available_tests", "")?;
        Ok(self.available.lock().unwrap().clone())
    }

    async fn run_all(&self) -> Result<RunStarted, ApiError> {
        self.record("run_all", "")?;
        Ok(self.started())
    }

    async fn run_one(&self, class: &str, method: &str) -> Result<RunStarted, ApiError> {
        self.record("run_one", format!("{class}.{method}"))?;
        Ok(self.started())
    }

    async fn execution(&self, id: &str) -> Result<TestExecution, ApiError> {
        let running = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(running, Ordering::SeqCst);
        let delay = *self.execution_delay.lock().unwrap();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        self.record("execution", id)?;
        let next = self.execution_script.lock().unwrap().pop_front();
        let mut last = self.last_execution.lock().unwrap();
        if let Some(execution) = next {
            *last = Some(execution);
        }
        last.clone().ok_or(ApiError::Status(StatusCode::NOT_FOUND))
    }

    async fn executions(&self) -> Result<Vec<TestExecution>, ApiError> {
        self.record("executions", "")?;
        Ok(self.recent.lock().unwrap().clone())
    }
}

impl FakeApi {
    fn started(&self) -> RunStarted {
        let n = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
        RunStarted {
            execution_id: format!("exec-{n}"),
            status: Some("STARTED".to_string()),
            message: Some("Test execution started".to_string()),
        }
    }
}

// ========== Builders ==========

pub fn user(id: u64, username: &str, full_name: &str) -> User {
    User {
        id,
        username: username.to_string(),
        email: format!("{username}@example.com"),
        full_name: full_name.to_string(),
    }
}

pub fn result(method: &str, status: ResultStatus) -> TestResult {
    TestResult {
        test_class: "UserServiceTest".to_string(),
        test_method: method.to_string(),
        status,
        message: None,
        duration: 12,
        timestamp: None,
        stack_trace: None,
    }
}

/// PASSED x3, FAILED x1, SKIPPED x1.
pub fn mixed_results() -> Vec<TestResult> {
    vec![
        result("testCreateUser", ResultStatus::Passed),
        result("testGetAllUsers", ResultStatus::Passed),
        result("testGetUserById", ResultStatus::Passed),
        result("testDeleteUser", ResultStatus::Failed),
        result("testUpdateUser", ResultStatus::Skipped),
    ]
}

pub fn execution(id: &str, status: ExecutionStatus, results: Vec<TestResult>) -> TestExecution {
    TestExecution {
        id: id.to_string(),
        status,
        results,
        output: format!("Starting tests for {id}\n"),
        start_time: None,
        end_time: None,
    }
}

pub fn available() -> AvailableTests {
    let mut classes = BTreeMap::new();
    classes.insert(
        "UserServiceTest".to_string(),
        vec!["testCreateUser".to_string(), "testDeleteUser".to_string()],
    );
    classes.insert(
        "UserResourceIT".to_string(),
        vec!["testHealthEndpoint".to_string()],
    );
    AvailableTests {
        test_classes: classes,
    }
}

pub fn make_state() -> AppState {
    AppState::new(AppConfig {
        base_url: "http://localhost:9080/openliberty-demo/api".to_string(),
        ..AppConfig::default()
    })
}

/// Side effects the event loop would have run, other than requests.
#[derive(Debug, Default)]
pub struct Outcome {
    pub polls_started: Vec<(String, u64)>,
    pub polls_stopped: usize,
    pub notices: usize,
}

/// Execute request effects against `api` and feed the responses back until
/// nothing is left to do. Timer and notification effects are only recorded.
pub async fn drive(state: &mut AppState, api: &FakeApi, effects: Vec<Effect>) -> Outcome {
    let mut outcome = Outcome::default();
    let mut queue: VecDeque<Effect> = effects.into();
    while let Some(effect) = queue.pop_front() {
        match effect {
            Effect::Request(request) => {
                let response = api::perform(api, request).await;
                queue.extend(state.handle_response(response));
            }
            Effect::StartPolling {
                execution_id,
                generation,
            } => outcome.polls_started.push((execution_id, generation)),
            Effect::StopPolling => outcome.polls_stopped += 1,
            Effect::Notify(_) => outcome.notices += 1,
        }
    }
    outcome
}

/// One poll tick as the timer would deliver it.
pub async fn tick(
    state: &mut AppState,
    api: &FakeApi,
    execution_id: &str,
    generation: u64,
) -> Vec<Effect> {
    let result = api.execution(execution_id).await;
    state.handle_response(api::Response::ExecutionTick { generation, result })
}

pub fn request(effects: &[Effect]) -> Vec<&Request> {
    effects
        .iter()
        .filter_map(|e| match e {
            Effect::Request(r) => Some(r),
            _ => None,
        })
        .collect()
}
