//! Wire types for the admin API and the pure derivations the pages display.

use chrono::NaiveDateTime;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: u64,
    pub username: String,
    pub email: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub full_name: String,
}

impl User {
    /// Card title; blank names fall back to a placeholder.
    pub fn display_name(&self) -> &str {
        if self.full_name.trim().is_empty() {
            "No name"
        } else {
            &self.full_name
        }
    }
}

/// Body of `POST /users`. No client-side validation is applied.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub full_name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Health {
    pub status: String,
    #[serde(default)]
    pub service: Option<String>,
    #[serde(default)]
    pub version: Option<String>,
}

impl Health {
    pub fn is_up(&self) -> bool {
        self.status == "UP"
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ExecutionStatus {
    Pending,
    Running,
    Completed,
    Failed,
    #[serde(other)]
    Unknown,
}

impl ExecutionStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Failed)
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Running => "RUNNING",
            Self::Completed => "COMPLETED",
            Self::Failed => "FAILED",
            Self::Unknown => "UNKNOWN",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ResultStatus {
    Passed,
    Failed,
    Skipped,
    #[serde(other)]
    Unknown,
}

impl ResultStatus {
    pub fn label(self) -> &'static str {
        match self {
            Self::Passed => "PASSED",
            Self::Failed => "FAILED",
            Self::Skipped => "SKIPPED",
            Self::Unknown => "UNKNOWN",
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestResult {
    pub test_class: String,
    pub test_method: String,
    pub status: ResultStatus,
    #[serde(default)]
    pub message: Option<String>,
    /// Milliseconds.
    #[serde(default)]
    pub duration: u64,
    #[serde(default)]
    pub timestamp: Option<NaiveDateTime>,
    #[serde(default)]
    pub stack_trace: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestExecution {
    pub id: String,
    pub status: ExecutionStatus,
    #[serde(default, deserialize_with = "null_as_default")]
    pub results: Vec<TestResult>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub output: String,
    #[serde(default)]
    pub start_time: Option<NaiveDateTime>,
    #[serde(default)]
    pub end_time: Option<NaiveDateTime>,
}

impl TestExecution {
    pub fn summary(&self) -> Summary {
        Summary::from_results(&self.results)
    }

    /// Status line shown next to the indicator.
    pub fn status_message(&self) -> String {
        match self.status {
            ExecutionStatus::Running => "Running tests...".to_string(),
            ExecutionStatus::Completed => {
                let summary = self.summary();
                format!(
                    "Completed: {}/{} tests passed",
                    summary.passed, summary.total
                )
            }
            ExecutionStatus::Failed => "Test execution failed".to_string(),
            ExecutionStatus::Pending | ExecutionStatus::Unknown => "Unknown status".to_string(),
        }
    }

    pub fn short_id(&self) -> &str {
        short_id(&self.id)
    }
}

/// First 8 characters of an execution id, char-boundary safe.
pub fn short_id(id: &str) -> &str {
    match id.char_indices().nth(8) {
        Some((idx, _)) => &id[..idx],
        None => id,
    }
}

/// Counts derived from a result list. Always recomputed, never patched.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Summary {
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    pub skipped: usize,
}

impl Summary {
    pub fn from_results(results: &[TestResult]) -> Self {
        let count = |status| results.iter().filter(|r| r.status == status).count();
        Self {
            total: results.len(),
            passed: count(ResultStatus::Passed),
            failed: count(ResultStatus::Failed),
            skipped: count(ResultStatus::Skipped),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailableTests {
    #[serde(default)]
    pub test_classes: BTreeMap<String, Vec<String>>,
}

impl AvailableTests {
    pub fn methods(&self, class: &str) -> &[String] {
        self.test_classes.get(class).map_or(&[], Vec::as_slice)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunStarted {
    pub execution_id: String,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
