//! The admin REST surface, as an async trait, plus the request/response
//! envelopes the event loop ferries between spawned tasks and the controllers.

pub mod http;

use crate::model::{AvailableTests, Health, NewUser, RunStarted, TestExecution, User};
use async_trait::async_trait;
use reqwest::StatusCode;

pub use http::HttpApi;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("HTTP {0}")]
    Status(StatusCode),
    #[error("invalid response body: {0}")]
    Decode(#[from] serde_json::Error),
}

impl ApiError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Status(StatusCode::NOT_FOUND))
    }
}

#[async_trait]
pub trait AdminApi: Send + Sync {
    async fn health(&self) -> Result<Health, ApiError>;
    async fn list_users(&self) -> Result<Vec<User>, ApiError>;
    /// Only the status is meaningful; the created user in the body is not read.
    async fn create_user(&self, user: &NewUser) -> Result<(), ApiError>;
    async fn delete_user(&self, id: u64) -> Result<(), ApiError>;
    async fn find_user(&self, username: &str) -> Result<User, ApiError>;
    async fn available_tests(&self) -> Result<AvailableTests, ApiError>;
    async fn run_all(&self) -> Result<RunStarted, ApiError>;
    async fn run_one(&self, class: &str, method: &str) -> Result<RunStarted, ApiError>;
    async fn execution(&self, id: &str) -> Result<TestExecution, ApiError>;
    async fn executions(&self) -> Result<Vec<TestExecution>, ApiError>;
}

/// What to run: the whole suite or one method.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunTarget {
    All,
    Single { class: String, method: String },
}

impl RunTarget {
    pub fn label(&self) -> String {
        match self {
            Self::All => "all tests".to_string(),
            Self::Single { class, method } => format!("{class}.{method}"),
        }
    }
}

/// A one-shot call a controller wants made.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
    Health,
    LoadUsers,
    CreateUser(NewUser),
    DeleteUser(u64),
    SearchUser(String),
    LoadAvailableTests,
    StartRun(RunTarget),
    RefreshExecution(String),
    LoadExecution(String),
    LoadRecent,
}

#[derive(Debug)]
pub enum Response {
    Health(Result<Health, ApiError>),
    Users(Result<Vec<User>, ApiError>),
    UserCreated(Result<(), ApiError>),
    UserDeleted {
        id: u64,
        result: Result<(), ApiError>,
    },
    UserFound {
        username: String,
        result: Result<User, ApiError>,
    },
    AvailableTests(Result<AvailableTests, ApiError>),
    RunStarted {
        target: RunTarget,
        result: Result<RunStarted, ApiError>,
    },
    /// Produced by the poll timer, tagged with the generation it was started under.
    ExecutionTick {
        generation: u64,
        result: Result<TestExecution, ApiError>,
    },
    ExecutionRefreshed {
        id: String,
        result: Result<TestExecution, ApiError>,
    },
    ExecutionLoaded {
        id: String,
        result: Result<TestExecution, ApiError>,
    },
    Recent(Result<Vec<TestExecution>, ApiError>),
}

/// Execute one request against the API and wrap the outcome.
pub async fn perform(api: &dyn AdminApi, request: Request) -> Response {
    match request {
        Request::Health => Response::Health(api.health().await),
        Request::LoadUsers => Response::Users(api.list_users().await),
        Request::CreateUser(user) => Response::UserCreated(api.create_user(&user).await),
        Request::DeleteUser(id) => Response::UserDeleted {
            id,
            result: api.delete_user(id).await,
        },
        Request::SearchUser(username) => {
            let result = api.find_user(&username).await;
            Response::UserFound { username, result }
        }
        Request::LoadAvailableTests => Response::AvailableTests(api.available_tests().await),
        Request::StartRun(target) => {
            let result = match &target {
                RunTarget::All => api.run_all().await,
                RunTarget::Single { class, method } => api.run_one(class, method).await,
            };
            Response::RunStarted { target, result }
        }
        Request::RefreshExecution(id) => {
            let result = api.execution(&id).await;
            Response::ExecutionRefreshed { id, result }
        }
        Request::LoadExecution(id) => {
            let result = api.execution(&id).await;
            Response::ExecutionLoaded { id, result }
        }
        Request::LoadRecent => Response::Recent(api.executions().await),
    }
}
