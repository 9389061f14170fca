//! Transient status messages shared by both pages.
//!
//! Each toast expires on its own timer. There is no queue and no cap: toasts
//! pushed in quick succession simply stack, newest on top.

use std::collections::VecDeque;
use std::time::{Duration, Instant};

pub const DEFAULT_TOAST_TTL: Duration = Duration::from_millis(3000);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Success,
    Error,
    Warning,
    Info,
}

#[derive(Debug, Clone)]
pub struct Toast {
    pub message: String,
    pub severity: Severity,
    pub created: Instant,
}

#[derive(Debug)]
pub struct Toasts {
    items: VecDeque<Toast>,
    ttl: Duration,
}

impl Default for Toasts {
    fn default() -> Self {
        Self::new(DEFAULT_TOAST_TTL)
    }
}

impl Toasts {
    pub fn new(ttl: Duration) -> Self {
        Self {
            items: VecDeque::new(),
            ttl,
        }
    }

    pub fn push(&mut self, message: impl Into<String>, severity: Severity) {
        self.push_at(message, severity, Instant::now());
    }

    pub fn push_at(&mut self, message: impl Into<String>, severity: Severity, now: Instant) {
        let message = message.into();
        tracing::debug!(?severity, %message, "toast");
        self.items.push_front(Toast {
            message,
            severity,
            created: now,
        });
    }

    pub fn success(&mut self, message: impl Into<String>) {
        self.push(message, Severity::Success);
    }

    pub fn error(&mut self, message: impl Into<String>) {
        self.push(message, Severity::Error);
    }

    pub fn warning(&mut self, message: impl Into<String>) {
        self.push(message, Severity::Warning);
    }

    pub fn info(&mut self, message: impl Into<String>) {
        self.push(message, Severity::Info);
    }

    /// Drop every toast older than the TTL.
    pub fn prune(&mut self, now: Instant) {
        let ttl = self.ttl;
        self.items
            .retain(|t| now.saturating_duration_since(t.created) < ttl);
    }

    /// Newest first.
    pub fn iter(&self) -> impl Iterator<Item = &Toast> {
        self.items.iter()
    }

    pub fn latest(&self) -> Option<&Toast> {
        self.items.front()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
