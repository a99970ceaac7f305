//! Display targets the clock text is written into

use parking_lot::Mutex;
use std::sync::Arc;

use super::error::TimerError;

/// Something that shows the current clock text, replacing what was there
pub trait DisplaySink {
    fn show(&mut self, text: &str) -> Result<(), TimerError>;
}

/// In-memory display that records every write.
///
/// Clones share the same buffer, so several timers can point at one target.
#[derive(Clone, Debug, Default)]
pub struct MemorySink {
    writes: Arc<Mutex<Vec<String>>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current content, i.e. the last write
    pub fn text(&self) -> Option<String> {
        self.writes.lock().last().cloned()
    }

    pub fn writes(&self) -> Vec<String> {
        self.writes.lock().clone()
    }

    pub fn write_count(&self) -> usize {
        self.writes.lock().len()
    }
}

impl DisplaySink for MemorySink {
    fn show(&mut self, text: &str) -> Result<(), TimerError> {
        self.writes.lock().push(text.to_string());
        Ok(())
    }
}
