//! Platform-agnostic wall clock
//!
//! Ticks count logical seconds; this is only used to report how far the
//! host timer drifted from real time over a run.

#[cfg(all(target_arch = "wasm32", feature = "wasm"))]
pub fn now_seconds() -> f64 {
    web_sys::window()
        .and_then(|w| w.performance())
        .map(|p| p.now() / 1000.0)
        .unwrap_or(0.0)
}

#[cfg(not(all(target_arch = "wasm32", feature = "wasm")))]
pub fn now_seconds() -> f64 {
    use std::sync::OnceLock;
    use std::time::Instant;

    static START: OnceLock<Instant> = OnceLock::new();
    START.get_or_init(Instant::now).elapsed().as_secs_f64()
}

/// Measured seconds minus counted seconds since `started_at`
pub fn drift_seconds(started_at: f64, counted: u64) -> f64 {
    (now_seconds() - started_at) - counted as f64
}
