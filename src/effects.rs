//! Carries out the [`Effect`]s controllers return: one-shot requests run as
//! monitored tasks, the poll timer is started and stopped, desktop notices
//! are shown.

use crate::api::{self, AdminApi, Request};
use crate::app::{DesktopNotice, Effect};
use crate::events::AppEvent;
use crate::notify;
use crate::poller::PollTimer;
use std::any::Any;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;

pub struct EffectRunner {
    api: Arc<dyn AdminApi>,
    tx: mpsc::UnboundedSender<AppEvent>,
    timer: PollTimer,
    poll_interval: Duration,
}

impl EffectRunner {
    pub fn new(
        api: Arc<dyn AdminApi>,
        tx: mpsc::UnboundedSender<AppEvent>,
        poll_interval: Duration,
    ) -> Self {
        Self {
            api,
            tx,
            timer: PollTimer::new(),
            poll_interval,
        }
    }

    pub fn apply(&mut self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::Request(request) => self.spawn_request(request),
                Effect::StartPolling {
                    execution_id,
                    generation,
                } => {
                    tracing::debug!(%execution_id, generation, "poll timer started");
                    self.timer.start(
                        self.api.clone(),
                        execution_id,
                        generation,
                        self.poll_interval,
                        self.tx.clone(),
                    );
                }
                Effect::StopPolling => {
                    tracing::debug!("poll timer stopped");
                    self.timer.stop();
                }
                Effect::Notify(notice) => self.spawn_notice(notice),
            }
        }
    }

    pub fn is_polling(&self) -> bool {
        self.timer.is_active()
    }

    pub fn shutdown(&mut self) {
        self.timer.stop();
    }

    /// Notification daemons can block, so the notice goes to the blocking pool.
    fn spawn_notice(&self, notice: DesktopNotice) {
        let tx = self.tx.clone();
        tokio::task::spawn_blocking(move || {
            let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
                notify::send_desktop(&notice);
            }));
            if let Err(payload) = result {
                let msg = panic_message(payload);
                tracing::error!("notify panicked: {msg}");
                if tx
                    .send(AppEvent::Error(format!("Notification crashed: {msg}")))
                    .is_err()
                {
                    tracing::warn!("notify: channel closed");
                }
            }
        });
    }

    fn spawn_request(&self, request: Request) {
        let api = self.api.clone();
        let tx = self.tx.clone();
        let label = request_label(&request);
        spawn_monitored(self.tx.clone(), label, async move {
            let response = api::perform(api.as_ref(), request).await;
            if tx.send(AppEvent::Response(response)).is_err() {
                tracing::debug!("{label}: channel closed before response was delivered");
            }
        });
    }
}

fn request_label(request: &Request) -> &'static str {
    match request {
        Request::Health => "health",
        Request::LoadUsers => "load_users",
        Request::CreateUser(_) => "create_user",
        Request::DeleteUser(_) => "delete_user",
        Request::SearchUser(_) => "search_user",
        Request::LoadAvailableTests => "available_tests",
        Request::StartRun(_) => "start_run",
        Request::RefreshExecution(_) => "refresh_execution",
        Request::LoadExecution(_) => "load_execution",
        Request::LoadRecent => "recent_executions",
    }
}

/// Spawn `fut`, reporting a panic inside it as an [`AppEvent::Error`].
pub fn spawn_monitored(
    tx: mpsc::UnboundedSender<AppEvent>,
    label: &'static str,
    fut: impl Future<Output = ()> + Send + 'static,
) {
    tokio::spawn(async move {
        let handle = tokio::spawn(fut);
        if let Err(join_err) = handle.await {
            let msg = if join_err.is_panic() {
                panic_message(join_err.into_panic())
            } else {
                "task cancelled".to_string()
            };
            tracing::error!("{label} panicked: {msg}");
            if tx
                .send(AppEvent::Error(format!("{label} crashed: {msg}")))
                .is_err()
            {
                tracing::warn!("{label}: channel closed while reporting panic");
            }
        }
    });
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    match payload.downcast::<String>() {
        Ok(s) => *s,
        Err(payload) => match payload.downcast::<&str>() {
            Ok(s) => (*s).to_string(),
            Err(_) => "unknown panic".to_string(),
        },
    }
}
