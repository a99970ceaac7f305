//! Platform-agnostic core - shared between the WASM page clock and the CLI

pub mod config;
pub mod display;
pub mod error;
pub mod format;
pub mod manual;
pub mod ticker;
pub mod timer;

pub use config::{RestartPolicy, TimerConfig, DEFAULT_TARGET_ID, MAX_PERIOD_MS};
pub use display::{DisplaySink, MemorySink};
pub use error::TimerError;
pub use format::{format_compact, format_hms, summarize_durations, Hms};
pub use manual::{ManualBackend, ManualScheduler};
pub use ticker::{ElapsedCounter, Ticker};
pub use timer::{Backend, ElapsedTimer, RunningTimer, StartOutcome, TimerState, MAX_HISTORY};
