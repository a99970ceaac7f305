//! Elapsed-time formatting
//!
//! Pure functions, no platform deps. `Hms` is what every tick renders;
//! the compact and summary helpers are used for logging finished runs.

use std::fmt;

/// Seconds split into hours, minutes and seconds
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct Hms {
    pub hours: u64,
    pub minutes: u64,
    pub seconds: u64,
}

impl Hms {
    pub fn from_seconds(total: u64) -> Self {
        Self {
            hours: total / 3600,
            minutes: (total % 3600) / 60,
            seconds: total % 60,
        }
    }

    pub fn total_seconds(&self) -> u64 {
        self.hours
            .saturating_mul(3600)
            .saturating_add(self.minutes.saturating_mul(60))
            .saturating_add(self.seconds)
    }
}

/// Renders as `HH:MM:SS`. Hours past 99 widen instead of wrapping.
impl fmt::Display for Hms {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}:{:02}", self.hours, self.minutes, self.seconds)
    }
}

/// Format whole seconds as `HH:MM:SS`
pub fn format_hms(total: u64) -> String {
    Hms::from_seconds(total).to_string()
}

/// Floor division and non-negative remainder, like a float divmod
fn divmod(value: f64, by: f64) -> (f64, f64) {
    ((value / by).floor(), value.rem_euclid(by))
}

/// Format fractional seconds as `00h00m00s`.
///
/// Anything not strictly positive (including NaN) renders as zero.
pub fn format_compact(seconds: f64) -> String {
    let (h, m, s) = if seconds > 0.0 {
        let (m, s) = divmod(seconds, 60.0);
        let (h, m) = divmod(m, 60.0);
        (h, m, s)
    } else {
        (0.0, 0.0, 0.0)
    };
    format!("{:02.0}h{:02.0}m{:02.0}s", h, m, s)
}

/// Total (`HH:MM:SS`) and average (`MM:SS`) of a list of durations.
///
/// Non-positive entries are dropped before summing. Average minutes are not
/// folded into hours.
pub fn summarize_durations(durations: &[f64]) -> (String, String) {
    let kept: Vec<f64> = durations.iter().copied().filter(|d| *d > 0.0).collect();

    let (h, m, s, mm, ss) = if kept.is_empty() {
        (0.0, 0.0, 0.0, 0.0, 0.0)
    } else {
        let total: f64 = kept.iter().sum();
        let (m, s) = divmod(total, 60.0);
        let (h, m) = divmod(m, 60.0);
        let (mm, ss) = divmod(total / kept.len() as f64, 60.0);
        (h, m, s, mm, ss)
    };

    (
        format!("{:02.0}:{:02.0}:{:02.0}", h, m, s),
        format!("{:02.0}:{:02.0}", mm, ss),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_hms_examples() {
        assert_eq!(format_hms(0), "00:00:00");
        assert_eq!(format_hms(5), "00:00:05");
        assert_eq!(format_hms(65), "00:01:05");
        assert_eq!(format_hms(3661), "01:01:01");
    }

    #[test]
    fn test_format_hms_boundaries() {
        assert_eq!(format_hms(59), "00:00:59");
        assert_eq!(format_hms(60), "00:01:00");
        assert_eq!(format_hms(3599), "00:59:59");
        assert_eq!(format_hms(3600), "01:00:00");
        assert_eq!(format_hms(36_000), "10:00:00");
    }

    #[test]
    fn test_format_hms_hours_not_truncated() {
        // 100 hours and a bit
        assert_eq!(format_hms(100 * 3600 + 61), "100:01:01");
        assert_eq!(format_hms(1234 * 3600), "1234:00:00");
    }

    #[test]
    fn test_hms_split_roundtrips_total() {
        for total in [0, 1, 59, 60, 3599, 3600, 3661, 86_399, 360_000] {
            let hms = Hms::from_seconds(total);
            assert!(hms.minutes < 60 && hms.seconds < 60);
            assert_eq!(hms.total_seconds(), total);
        }
    }

    #[test]
    fn test_format_compact() {
        assert_eq!(format_compact(0.0), "00h00m00s");
        assert_eq!(format_compact(-5.0), "00h00m00s");
        assert_eq!(format_compact(f64::NAN), "00h00m00s");
        assert_eq!(format_compact(3661.0), "01h01m01s");
        assert_eq!(format_compact(59.0), "00h00m59s");
        assert_eq!(format_compact(7200.0), "02h00m00s");
    }

    #[test]
    fn test_total_seconds_saturates() {
        let hms = Hms {
            hours: u64::MAX,
            minutes: 59,
            seconds: 59,
        };
        assert_eq!(hms.total_seconds(), u64::MAX);
    }

    #[test]
    fn test_format_compact_fractional() {
        assert_eq!(format_compact(0.5), "00h00m00s");
    }

    #[test]
    fn test_summarize_fractional_durations() {
        let (total, avg) = summarize_durations(&[3600.5, 1800.5, 7200.5]);
        assert_eq!(total, "03:30:02");
        assert_eq!(avg, "70:00");
    }

    #[test]
    fn test_summarize_many_durations() {
        let (total, avg) = summarize_durations(&vec![1.0; 1_000_000]);
        assert_eq!(total, "277:46:40");
        assert_eq!(avg, "00:01");
    }

    #[test]
    fn test_summarize_durations() {
        let (total, avg) = summarize_durations(&[60.0, 120.0, 180.0]);
        assert_eq!(total, "00:06:00");
        assert_eq!(avg, "02:00");
    }

    #[test]
    fn test_summarize_durations_drops_non_positive() {
        let (total, avg) = summarize_durations(&[-10.0, 0.0, 90.0, 30.0]);
        assert_eq!(total, "00:02:00");
        assert_eq!(avg, "01:00");
    }

    #[test]
    fn test_summarize_durations_empty() {
        assert_eq!(
            summarize_durations(&[]),
            ("00:00:00".to_string(), "00:00".to_string())
        );
        assert_eq!(
            summarize_durations(&[-1.0]),
            ("00:00:00".to_string(), "00:00".to_string())
        );
    }

    #[test]
    fn test_summarize_average_minutes_not_folded() {
        let (total, avg) = summarize_durations(&[7200.0]);
        assert_eq!(total, "02:00:00");
        assert_eq!(avg, "120:00");
    }
}
