//! Error type shared by every timer backend

use thiserror::Error;

#[derive(Debug, Error)]
pub enum TimerError {
    /// The display element could not be found when the timer was started
    #[error("display target `{0}` not found")]
    TargetNotFound(String),

    #[error("no global window available")]
    NoWindow,

    #[error("window has no document")]
    NoDocument,

    /// Period is zero or too large for the host timer
    #[error("invalid tick period: {0} ms")]
    InvalidPeriod(u64),

    #[error("display target id must not be empty")]
    EmptyTarget,

    /// Native backend started outside of a tokio runtime
    #[error("no async runtime available to drive the timer")]
    NoRuntime,

    #[error("failed to write to display: {0}")]
    SinkWrite(#[from] std::io::Error),

    #[error("invalid timer config: {0}")]
    Config(#[from] serde_json::Error),
}
