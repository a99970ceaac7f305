//! Elapsed timer controller
//!
//! A `Backend` turns a period into a running, cancellable tick stream and
//! hands back its handle. `ElapsedTimer` owns at most one such handle and
//! applies the restart policy, so two tick streams can never end up
//! writing to the same display through it.

use std::time::Duration;
use tracing::{debug, warn};

use super::config::{RestartPolicy, TimerConfig};
use super::error::TimerError;
use super::format::summarize_durations;

/// Finished runs kept for `summary`; older ones are dropped first
pub const MAX_HISTORY: usize = 1024;

/// Source of repeating ticks
pub trait Backend {
    type Handle: RunningTimer;

    /// Start a fresh counter at zero, ticking every `period`
    fn start(&mut self, period: Duration) -> Result<Self::Handle, TimerError>;
}

/// Handle to one active tick stream.
///
/// Dropping a handle cancels it as well; `stop` is the explicit form that
/// also reports where the counter ended.
pub trait RunningTimer {
    fn elapsed_seconds(&self) -> u64;

    /// Cancel the tick stream. No tick lands after this returns.
    fn stop(self) -> u64;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TimerState {
    Idle,
    Running,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StartOutcome {
    Started,
    /// The previous run was stopped at `previous` seconds and replaced
    Restarted { previous: u64 },
    /// Policy is `Ignore` and a timer was already running
    AlreadyRunning,
}

pub struct ElapsedTimer<B: Backend> {
    backend: B,
    period: Duration,
    policy: RestartPolicy,
    running: Option<B::Handle>,
    last_elapsed: u64,
    /// Lengths of finished runs, in seconds
    history: Vec<u64>,
}

impl<B: Backend> ElapsedTimer<B> {
    pub fn new(backend: B, config: &TimerConfig) -> Result<Self, TimerError> {
        config.validate()?;
        Ok(Self {
            backend,
            period: config.period(),
            policy: config.restart,
            running: None,
            last_elapsed: 0,
            history: Vec::new(),
        })
    }

    pub fn start(&mut self) -> Result<StartOutcome, TimerError> {
        if self.running.is_some() && self.policy == RestartPolicy::Ignore {
            warn!(elapsed = self.elapsed(), "Timer already running, start ignored");
            return Ok(StartOutcome::AlreadyRunning);
        }

        // New handle first: a failed start leaves the running timer alone
        let handle = self.backend.start(self.period)?;
        let outcome = match self.stop() {
            Some(previous) => {
                debug!(previous, "Restarted running timer");
                StartOutcome::Restarted { previous }
            }
            None => StartOutcome::Started,
        };
        self.running = Some(handle);
        self.last_elapsed = 0;
        debug!(period_ms = self.period.as_millis() as u64, "Timer started");
        Ok(outcome)
    }

    /// Stop the running timer. Returns `None` when nothing was running.
    pub fn stop(&mut self) -> Option<u64> {
        let Some(handle) = self.running.take() else {
            debug!("Stop while idle, nothing to cancel");
            return None;
        };

        let elapsed = handle.stop();
        self.last_elapsed = elapsed;
        if self.history.len() >= MAX_HISTORY {
            self.history.remove(0);
        }
        self.history.push(elapsed);
        debug!(elapsed, "Timer stopped");
        Some(elapsed)
    }

    pub fn state(&self) -> TimerState {
        if self.running.is_some() {
            TimerState::Running
        } else {
            TimerState::Idle
        }
    }

    pub fn is_running(&self) -> bool {
        self.state() == TimerState::Running
    }

    /// Seconds of the current run, or of the last finished one when idle
    pub fn elapsed(&self) -> u64 {
        self.running
            .as_ref()
            .map_or(self.last_elapsed, |h| h.elapsed_seconds())
    }

    /// Finished run lengths, oldest first, at most `MAX_HISTORY` of them
    pub fn history(&self) -> &[u64] {
        &self.history
    }

    pub fn clear_history(&mut self) {
        self.history.clear();
    }

    /// Total and average over finished runs
    pub fn summary(&self) -> (String, String) {
        let runs: Vec<f64> = self.history.iter().map(|&s| s as f64).collect();
        summarize_durations(&runs)
    }
}
