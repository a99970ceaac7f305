//! Tick body shared by every backend: bump the counter, render, write

use tracing::trace;

use super::display::DisplaySink;
use super::error::TimerError;
use super::format::Hms;

/// Elapsed seconds, only ever incremented
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ElapsedCounter {
    seconds: u64,
}

impl ElapsedCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Counter that already shows `seconds`, e.g. to resume or in tests
    pub fn starting_at(seconds: u64) -> Self {
        Self { seconds }
    }

    pub fn advance(&mut self) -> u64 {
        self.seconds = self.seconds.saturating_add(1);
        self.seconds
    }

    pub fn seconds(&self) -> u64 {
        self.seconds
    }
}

/// Counter plus the display it writes to.
///
/// Once halted a ticker ignores further ticks, so a late callback that
/// raced a stop cannot touch the display.
pub struct Ticker<S> {
    counter: ElapsedCounter,
    sink: S,
    halted: bool,
}

impl<S> Ticker<S> {
    pub fn new(sink: S) -> Self {
        Self::with_counter(ElapsedCounter::new(), sink)
    }

    pub fn with_counter(counter: ElapsedCounter, sink: S) -> Self {
        Self {
            counter,
            sink,
            halted: false,
        }
    }

    /// Stop accepting ticks, returning the final elapsed seconds
    pub fn halt(&mut self) -> u64 {
        self.halted = true;
        self.counter.seconds()
    }

    pub fn is_halted(&self) -> bool {
        self.halted
    }

    pub fn elapsed(&self) -> u64 {
        self.counter.seconds()
    }
}

impl<S: DisplaySink> Ticker<S> {
    /// Run one tick. Returns `None` if the ticker was halted.
    ///
    /// A failed write halts the ticker before the error is returned.
    pub fn tick(&mut self) -> Result<Option<Hms>, TimerError> {
        if self.halted {
            return Ok(None);
        }

        let elapsed = self.counter.advance();
        let hms = Hms::from_seconds(elapsed);
        if let Err(e) = self.sink.show(&hms.to_string()) {
            self.halted = true;
            return Err(e);
        }

        trace!(elapsed, display = %hms, "Tick");
        Ok(Some(hms))
    }
}
