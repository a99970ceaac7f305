//! Terminal progress clock
//!
//! Run with: cargo run --features cli
//!
//! Environment:
//! - `PROGRESS_CLOCK_CONFIG`: path to a JSON timer config
//! - `PROGRESS_CLOCK_LIMIT`: stop after this many seconds (default: until Ctrl-C)

#[cfg(not(target_arch = "wasm32"))]
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    use progress_clock::core::{format_compact, ElapsedTimer, TimerConfig};
    use progress_clock::native::{TerminalSink, TokioBackend};
    use std::time::Duration;
    use tracing::{info, warn};
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,progress_clock=debug"));
    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let config = match std::env::var("PROGRESS_CLOCK_CONFIG") {
        Ok(path) => {
            info!(path = %path, "Loading timer config");
            TimerConfig::from_json(&std::fs::read_to_string(&path)?)?
        }
        Err(_) => TimerConfig::default(),
    };

    let limit = match std::env::var("PROGRESS_CLOCK_LIMIT") {
        Ok(secs) => Some(Duration::from_secs(secs.trim().parse()?)),
        Err(_) => None,
    };

    let mut timer = ElapsedTimer::new(TokioBackend::new(TerminalSink), &config)?;
    timer.start()?;
    info!(period_ms = config.period_ms, limit = ?limit, "Clock running, Ctrl-C to stop");

    let deadline = async {
        match limit {
            Some(limit) => tokio::time::sleep(limit).await,
            None => std::future::pending().await,
        }
    };

    tokio::select! {
        res = tokio::signal::ctrl_c() => {
            if let Err(e) = res {
                warn!(error = %e, "Failed to listen for Ctrl-C");
            }
        }
        _ = deadline => {}
    }

    let elapsed = timer.stop().unwrap_or_default();
    // Move off the clock line before logging
    println!();
    let (total, average) = timer.summary();
    info!(
        elapsed = %format_compact(elapsed as f64),
        total = %total,
        average = %average,
        "Clock stopped"
    );
    Ok(())
}

#[cfg(target_arch = "wasm32")]
fn main() {}
