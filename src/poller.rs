//! The execution poll timer.
//!
//! One [`PollTimer`] owns at most one running [`ExecutionPoller`] task. Starting
//! a poll aborts whatever was running before, so two pollers never overlap.
//! Ticks within one poller are serial: the next fetch is only issued after the
//! previous one resolved.

use crate::api::{AdminApi, Response};
use crate::events::AppEvent;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{self, MissedTickBehavior};

pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(1000);

pub struct ExecutionPoller {
    api: Arc<dyn AdminApi>,
    execution_id: String,
    generation: u64,
    period: Duration,
    tx: mpsc::UnboundedSender<AppEvent>,
}

impl ExecutionPoller {
    pub fn new(
        api: Arc<dyn AdminApi>,
        execution_id: String,
        generation: u64,
        period: Duration,
        tx: mpsc::UnboundedSender<AppEvent>,
    ) -> Self {
        Self {
            api,
            execution_id,
            generation,
            period,
            tx,
        }
    }

    /// Fetch once per period until the receiver goes away or the task is aborted.
    /// The first fetch happens one period after start.
    pub async fn run(self) {
        let mut ticker = time::interval_at(time::Instant::now() + self.period, self.period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            ticker.tick().await;
            let result = self.api.execution(&self.execution_id).await;
            if let Err(e) = &result {
                tracing::debug!(execution_id = %self.execution_id, "poll fetch failed: {e}");
            }
            let event = AppEvent::Response(Response::ExecutionTick {
                generation: self.generation,
                result,
            });
            if self.tx.send(event).is_err() {
                tracing::debug!("poller: channel closed");
                return;
            }
        }
    }
}

#[derive(Default)]
pub struct PollTimer {
    handle: Option<JoinHandle<()>>,
}

impl PollTimer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace any running poller with a fresh one for `execution_id`.
    pub fn start(
        &mut self,
        api: Arc<dyn AdminApi>,
        execution_id: String,
        generation: u64,
        period: Duration,
        tx: mpsc::UnboundedSender<AppEvent>,
    ) {
        self.stop();
        let poller = ExecutionPoller::new(api, execution_id, generation, period, tx);
        self.handle = Some(tokio::spawn(poller.run()));
    }

    pub fn stop(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }

    pub fn is_active(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }
}

impl Drop for PollTimer {
    fn drop(&mut self) {
        self.stop();
    }
}
