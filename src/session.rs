//! Lifecycle of the one tracked execution: which id is current, whether a
//! poll timer is running for it, and which poll generation is live.
//!
//! Every poll start takes a fresh generation. Tick results are tagged with the
//! generation they were issued under, so a result that lands after its poll was
//! stopped or replaced is recognised as stale and dropped.

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum StartRejected {
    #[error("a run is already being polled")]
    AlreadyPolling,
    #[error("a run request is still in flight")]
    StartInFlight,
}

#[derive(Debug, Default)]
pub struct RunSession {
    execution_id: Option<String>,
    active_generation: Option<u64>,
    last_generation: u64,
    starting: bool,
}

impl RunSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn execution_id(&self) -> Option<&str> {
        self.execution_id.as_deref()
    }

    /// A run counts as active only when both an id and a live poll exist.
    pub fn is_polling(&self) -> bool {
        self.execution_id.is_some() && self.active_generation.is_some()
    }

    pub fn is_starting(&self) -> bool {
        self.starting
    }

    pub fn can_start(&self) -> Result<(), StartRejected> {
        if self.is_polling() {
            Err(StartRejected::AlreadyPolling)
        } else if self.starting {
            Err(StartRejected::StartInFlight)
        } else {
            Ok(())
        }
    }

    /// Guard for run requests. On success the session is marked as starting
    /// until [`Self::start_polling`] or [`Self::start_failed`] is called.
    pub fn try_begin_start(&mut self) -> Result<(), StartRejected> {
        self.can_start()?;
        self.starting = true;
        Ok(())
    }

    pub fn start_failed(&mut self) {
        self.starting = false;
    }

    /// Adopt `execution_id` and open a new poll generation, replacing any
    /// previous one. Returns the generation the timer must tag its ticks with.
    pub fn start_polling(&mut self, execution_id: String) -> u64 {
        self.starting = false;
        self.last_generation += 1;
        self.execution_id = Some(execution_id);
        self.active_generation = Some(self.last_generation);
        self.last_generation
    }

    /// Whether a tick produced under `generation` may still touch the display.
    pub fn accepts(&self, generation: u64) -> bool {
        self.execution_id.is_some() && self.active_generation == Some(generation)
    }

    /// Cancel the poll and forget the execution id.
    pub fn stop(&mut self) {
        self.active_generation = None;
        self.execution_id = None;
    }

    /// Make `execution_id` current without polling it.
    pub fn adopt(&mut self, execution_id: String) {
        self.execution_id = Some(execution_id);
    }

    pub fn is_current(&self, execution_id: &str) -> bool {
        self.execution_id.as_deref() == Some(execution_id)
    }
}
