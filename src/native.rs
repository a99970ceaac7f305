//! Native timer backend for the CLI
//!
//! Ticks come from a tokio interval on a spawned task. The ticker sits behind
//! a shared lock so that stopping and ticking never interleave.

use crate::core::{Backend, DisplaySink, RunningTimer, Ticker, TimerError};
use crate::time::{drift_seconds, now_seconds};
use parking_lot::Mutex;
use std::io::{self, Write};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::{debug, error};

/// Rewrites a single terminal line in place
#[derive(Clone, Copy, Debug, Default)]
pub struct TerminalSink;

impl DisplaySink for TerminalSink {
    fn show(&mut self, text: &str) -> Result<(), TimerError> {
        let mut out = io::stdout().lock();
        write!(out, "\r{text}")?;
        out.flush()?;
        Ok(())
    }
}

/// Spawns one tokio task per started timer, rendering into clones of `sink`
pub struct TokioBackend<S> {
    sink: S,
}

impl<S> TokioBackend<S> {
    pub fn new(sink: S) -> Self {
        Self { sink }
    }
}

impl<S> Backend for TokioBackend<S>
where
    S: DisplaySink + Clone + Send + 'static,
{
    type Handle = TokioHandle<S>;

    /// Must be called from within a tokio runtime
    fn start(&mut self, period: Duration) -> Result<TokioHandle<S>, TimerError> {
        if period.is_zero() {
            return Err(TimerError::InvalidPeriod(0));
        }
        let runtime = tokio::runtime::Handle::try_current().map_err(|_| TimerError::NoRuntime)?;

        let ticker = Arc::new(Mutex::new(Ticker::new(self.sink.clone())));
        let task = runtime.spawn(run_ticks(period, ticker.clone()));
        debug!(period_ms = period.as_millis() as u64, "Native timer spawned");

        Ok(TokioHandle {
            ticker,
            task,
            started_at: now_seconds(),
        })
    }
}

async fn run_ticks<S: DisplaySink>(period: Duration, ticker: Arc<Mutex<Ticker<S>>>) {
    // First tick one period from now, not immediately
    let mut interval = interval_at(Instant::now() + period, period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        interval.tick().await;

        let mut guard = ticker.lock();
        match guard.tick() {
            Ok(Some(_)) => {}
            Ok(None) => break,
            Err(e) => {
                error!(error = %e, "Display write failed, timer halted");
                break;
            }
        }
    }
}

pub struct TokioHandle<S> {
    ticker: Arc<Mutex<Ticker<S>>>,
    task: JoinHandle<()>,
    started_at: f64,
}

impl<S> TokioHandle<S> {
    fn halt(&mut self) -> u64 {
        // Halt under the lock first: a tick already past its await sees it
        let elapsed = self.ticker.lock().halt();
        self.task.abort();
        elapsed
    }
}

impl<S> RunningTimer for TokioHandle<S> {
    fn elapsed_seconds(&self) -> u64 {
        self.ticker.lock().elapsed()
    }

    fn stop(mut self) -> u64 {
        let elapsed = self.halt();
        debug!(
            elapsed,
            drift = format!("{:.3}", drift_seconds(self.started_at, elapsed)),
            "Native timer stopped"
        );
        elapsed
    }
}

impl<S> Drop for TokioHandle<S> {
    fn drop(&mut self) {
        self.halt();
    }
}
