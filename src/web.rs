//! Browser timer backend and the JS-facing `ProgressTimer`

use crate::core::{
    Backend, DisplaySink, ElapsedTimer, RunningTimer, StartOutcome, Ticker, TimerConfig,
    TimerError,
};
use crate::time::{drift_seconds, now_seconds};
use gloo_timers::callback::Interval;
use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;
use tracing::{debug, error, info};
use wasm_bindgen::prelude::*;
use web_sys::{Document, Element};

impl From<TimerError> for JsValue {
    fn from(e: TimerError) -> Self {
        js_sys::Error::new(&e.to_string()).into()
    }
}

/// Writes the clock as the text content of a page element
pub struct ElementSink {
    element: Element,
}

impl DisplaySink for ElementSink {
    fn show(&mut self, text: &str) -> Result<(), TimerError> {
        self.element.set_text_content(Some(text));
        Ok(())
    }
}

/// Ticks on the browser event loop via `setInterval`
pub struct WebBackend {
    document: Document,
    target_id: String,
}

impl WebBackend {
    pub fn from_window(target_id: &str) -> Result<Self, TimerError> {
        let document = web_sys::window()
            .ok_or(TimerError::NoWindow)?
            .document()
            .ok_or(TimerError::NoDocument)?;

        Ok(Self {
            document,
            target_id: target_id.to_string(),
        })
    }
}

impl Backend for WebBackend {
    type Handle = WebHandle;

    /// Looks the target up on every start, so a missing element fails here
    /// rather than on the first tick.
    fn start(&mut self, period: Duration) -> Result<WebHandle, TimerError> {
        // setInterval takes a signed 32-bit delay; larger values wrap to ~0
        let millis = i32::try_from(period.as_millis())
            .ok()
            .filter(|ms| *ms > 0)
            .ok_or(TimerError::InvalidPeriod(period.as_millis() as u64))? as u32;

        let element = self
            .document
            .get_element_by_id(&self.target_id)
            .ok_or_else(|| TimerError::TargetNotFound(self.target_id.clone()))?;

        let ticker = Rc::new(RefCell::new(Ticker::new(ElementSink { element })));
        let tick_ticker = ticker.clone();
        let interval = Interval::new(millis, move || {
            if let Err(e) = tick_ticker.borrow_mut().tick() {
                error!(error = %e, "Display write failed, timer halted");
            }
        });

        debug!(element_id = %self.target_id, millis, "Interval registered");
        Ok(WebHandle {
            interval: Some(interval),
            ticker,
            started_at: now_seconds(),
        })
    }
}

pub struct WebHandle {
    interval: Option<Interval>,
    ticker: Rc<RefCell<Ticker<ElementSink>>>,
    started_at: f64,
}

impl RunningTimer for WebHandle {
    fn elapsed_seconds(&self) -> u64 {
        self.ticker.borrow().elapsed()
    }

    fn stop(mut self) -> u64 {
        // Dropping the interval clears it
        drop(self.interval.take());
        let elapsed = self.ticker.borrow_mut().halt();
        debug!(
            elapsed,
            drift = format!("{:.3}", drift_seconds(self.started_at, elapsed)),
            "Interval cleared"
        );
        elapsed
    }
}

/// Elapsed-time clock for a page, wired to start/stop buttons from JS.
///
/// ```js
/// const clock = new ProgressTimer();        // renders into #progress_time
/// startButton.onclick = () => clock.start();
/// stopButton.onclick = () => clock.stop();
/// ```
#[wasm_bindgen]
pub struct ProgressTimer {
    inner: ElapsedTimer<WebBackend>,
}

#[wasm_bindgen]
impl ProgressTimer {
    /// `config` is an optional JSON `TimerConfig`
    #[wasm_bindgen(constructor)]
    pub fn new(config: Option<String>) -> Result<ProgressTimer, JsValue> {
        let config = match config {
            Some(json) => TimerConfig::from_json(&json)?,
            None => TimerConfig::default(),
        };
        let backend = WebBackend::from_window(&config.target_id)?;
        Ok(Self {
            inner: ElapsedTimer::new(backend, &config)?,
        })
    }

    pub fn start(&mut self) -> Result<(), JsValue> {
        match self.inner.start()? {
            StartOutcome::Restarted { previous } => info!(previous, "Progress timer restarted"),
            StartOutcome::Started => info!("Progress timer started"),
            StartOutcome::AlreadyRunning => {}
        }
        Ok(())
    }

    /// Safe to call when not running
    pub fn stop(&mut self) {
        if let Some(elapsed) = self.inner.stop() {
            info!(elapsed, "Progress timer stopped");
        }
    }

    #[wasm_bindgen(getter)]
    pub fn elapsed(&self) -> f64 {
        self.inner.elapsed() as f64
    }

    #[wasm_bindgen(getter, js_name = isRunning)]
    pub fn is_running(&self) -> bool {
        self.inner.is_running()
    }

    #[wasm_bindgen(js_name = clearHistory)]
    pub fn clear_history(&mut self) {
        self.inner.clear_history();
    }

    /// Total time over all finished runs, `HH:MM:SS`
    #[wasm_bindgen(getter, js_name = totalTime)]
    pub fn total_time(&self) -> String {
        self.inner.summary().0
    }
}

#[wasm_bindgen(start)]
pub fn main() {
    console_error_panic_hook::set_once();

    // Initialize tracing for browser console
    tracing_wasm::set_as_global_default();
}
