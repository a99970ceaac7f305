//! Timer configuration, loadable from JSON

use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::error::TimerError;

/// Default page element the clock is rendered into
pub const DEFAULT_TARGET_ID: &str = "progress_time";

/// Default tick period in milliseconds
pub const DEFAULT_PERIOD_MS: u64 = 1000;

/// Largest period a browser `setInterval` accepts without wrapping
pub const MAX_PERIOD_MS: u64 = i32::MAX as u64;

/// What `start` does when a timer is already running
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RestartPolicy {
    /// Stop the running timer and start a fresh one from zero
    #[default]
    Restart,
    /// Keep the running timer, the call does nothing
    Ignore,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimerConfig {
    pub target_id: String,
    pub period_ms: u64,
    pub restart: RestartPolicy,
}

impl Default for TimerConfig {
    fn default() -> Self {
        Self {
            target_id: DEFAULT_TARGET_ID.to_string(),
            period_ms: DEFAULT_PERIOD_MS,
            restart: RestartPolicy::default(),
        }
    }
}

impl TimerConfig {
    /// Parse and validate a JSON config. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, TimerError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), TimerError> {
        if self.period_ms == 0 || self.period_ms > MAX_PERIOD_MS {
            return Err(TimerError::InvalidPeriod(self.period_ms));
        }
        if self.target_id.trim().is_empty() {
            return Err(TimerError::EmptyTarget);
        }
        Ok(())
    }

    pub fn period(&self) -> Duration {
        Duration::from_millis(self.period_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = TimerConfig::default();
        assert_eq!(config.target_id, "progress_time");
        assert_eq!(config.period(), Duration::from_secs(1));
        assert_eq!(config.restart, RestartPolicy::Restart);
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let config = TimerConfig::from_json(r#"{"restart": "ignore"}"#).unwrap();
        assert_eq!(config.restart, RestartPolicy::Ignore);
        assert_eq!(config.target_id, DEFAULT_TARGET_ID);
        assert_eq!(config.period_ms, DEFAULT_PERIOD_MS);
    }

    #[test]
    fn test_rejects_zero_period() {
        let err = TimerConfig::from_json(r#"{"period_ms": 0}"#).unwrap_err();
        assert!(matches!(err, TimerError::InvalidPeriod(0)));
    }

    #[test]
    fn test_rejects_period_past_host_limit() {
        let err = TimerConfig::from_json(r#"{"period_ms": 3000000000}"#).unwrap_err();
        assert!(matches!(err, TimerError::InvalidPeriod(3_000_000_000)));

        let config = TimerConfig {
            period_ms: MAX_PERIOD_MS,
            ..TimerConfig::default()
        };
        assert!(config.validate().is_ok());
        let config = TimerConfig {
            period_ms: MAX_PERIOD_MS + 1,
            ..TimerConfig::default()
        };
        assert!(matches!(config.validate(), Err(TimerError::InvalidPeriod(_))));
    }

    #[test]
    fn test_rejects_empty_target() {
        let err = TimerConfig::from_json(r#"{"target_id": "  "}"#).unwrap_err();
        assert!(matches!(err, TimerError::EmptyTarget));
    }

    #[test]
    fn test_rejects_malformed_json() {
        let err = TimerConfig::from_json(r#"{"restart": "sometimes"}"#).unwrap_err();
        assert!(matches!(err, TimerError::Config(_)));
    }
}
