//! Deterministic single-threaded scheduler driven by virtual time
//!
//! Mirrors a host event loop: repeating callbacks are queued by due time and
//! each runs to completion before the next one starts. Time only moves when
//! `advance` is called, which makes tick-by-tick behaviour testable.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;
use std::time::Duration;
use tracing::{debug, error};

use super::display::MemorySink;
use super::error::TimerError;
use super::ticker::Ticker;
use super::timer::{Backend, RunningTimer};

pub type TaskId = u64;

struct Task {
    period: Duration,
    due: Duration,
    /// Taken out while the callback runs
    callback: Option<Box<dyn FnMut()>>,
}

#[derive(Default)]
struct Inner {
    now: Duration,
    next_id: TaskId,
    tasks: BTreeMap<TaskId, Task>,
}

#[derive(Clone, Default)]
pub struct ManualScheduler {
    inner: Rc<RefCell<Inner>>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `callback` to run every `period`, first at `now + period`
    pub fn every(
        &self,
        period: Duration,
        callback: impl FnMut() + 'static,
    ) -> Result<TaskId, TimerError> {
        if period.is_zero() {
            return Err(TimerError::InvalidPeriod(0));
        }

        let mut inner = self.inner.borrow_mut();
        let id = inner.next_id;
        inner.next_id += 1;
        let due = inner.now + period;
        inner.tasks.insert(
            id,
            Task {
                period,
                due,
                callback: Some(Box::new(callback)),
            },
        );
        Ok(id)
    }

    /// Cancel a task. Unknown ids are ignored.
    pub fn cancel(&self, id: TaskId) -> bool {
        self.inner.borrow_mut().tasks.remove(&id).is_some()
    }

    pub fn now(&self) -> Duration {
        self.inner.borrow().now
    }

    pub fn active_tasks(&self) -> usize {
        self.inner.borrow().tasks.len()
    }

    /// Move virtual time forward, running every callback that falls due.
    ///
    /// Callbacks due at the same instant run in registration order.
    pub fn advance(&self, by: Duration) {
        let target = self.now() + by;

        loop {
            let next = {
                let mut inner = self.inner.borrow_mut();
                let due = inner
                    .tasks
                    .iter()
                    .filter(|(_, task)| task.due <= target)
                    .min_by_key(|(id, task)| (task.due, **id))
                    .map(|(id, task)| (*id, task.due));

                match due {
                    Some((id, due)) => {
                        inner.now = due;
                        let task = inner.tasks.get_mut(&id).map(|t| {
                            t.due += t.period;
                            t.callback.take()
                        });
                        task.flatten().map(|cb| (id, cb))
                    }
                    None => None,
                }
            };

            let Some((id, mut callback)) = next else {
                break;
            };

            callback();

            // Task may have been cancelled from inside its own callback
            if let Some(task) = self.inner.borrow_mut().tasks.get_mut(&id) {
                task.callback = Some(callback);
            }
        }

        self.inner.borrow_mut().now = target;
    }
}

/// Backend over a `ManualScheduler`, rendering into a `MemorySink`
pub struct ManualBackend {
    scheduler: ManualScheduler,
    sink: MemorySink,
}

impl ManualBackend {
    pub fn new(scheduler: ManualScheduler, sink: MemorySink) -> Self {
        Self { scheduler, sink }
    }
}

impl Backend for ManualBackend {
    type Handle = ManualHandle;

    fn start(&mut self, period: Duration) -> Result<ManualHandle, TimerError> {
        let ticker = Rc::new(RefCell::new(Ticker::new(self.sink.clone())));

        let tick_ticker = ticker.clone();
        let task = self.scheduler.every(period, move || {
            if let Err(e) = tick_ticker.borrow_mut().tick() {
                error!(error = %e, "Display write failed, timer halted");
            }
        })?;

        debug!(task, "Manual timer scheduled");
        Ok(ManualHandle {
            scheduler: self.scheduler.clone(),
            task,
            ticker,
        })
    }
}

pub struct ManualHandle {
    scheduler: ManualScheduler,
    task: TaskId,
    ticker: Rc<RefCell<Ticker<MemorySink>>>,
}

impl ManualHandle {
    fn halt(&mut self) -> u64 {
        self.scheduler.cancel(self.task);
        self.ticker.borrow_mut().halt()
    }
}

impl RunningTimer for ManualHandle {
    fn elapsed_seconds(&self) -> u64 {
        self.ticker.borrow().elapsed()
    }

    fn stop(mut self) -> u64 {
        self.halt()
    }
}

impl Drop for ManualHandle {
    fn drop(&mut self) {
        self.halt();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_fires_on_period() {
        let scheduler = ManualScheduler::new();
        let hits = Rc::new(RefCell::new(Vec::new()));
        let h = hits.clone();
        let s = scheduler.clone();
        scheduler
            .every(Duration::from_secs(1), move || h.borrow_mut().push(s.now()))
            .unwrap();

        scheduler.advance(Duration::from_millis(3500));
        assert_eq!(
            *hits.borrow(),
            vec![
                Duration::from_secs(1),
                Duration::from_secs(2),
                Duration::from_secs(3)
            ]
        );
        assert_eq!(scheduler.now(), Duration::from_millis(3500));
    }

    #[test]
    fn test_cancel_unknown_is_inert() {
        let scheduler = ManualScheduler::new();
        assert!(!scheduler.cancel(42));
        scheduler.advance(Duration::from_secs(1));
    }

    #[test]
    fn test_zero_period_rejected() {
        let scheduler = ManualScheduler::new();
        assert!(matches!(
            scheduler.every(Duration::ZERO, || {}),
            Err(TimerError::InvalidPeriod(0))
        ));
    }

    #[test]
    fn test_handle_stop_cancels_task() {
        let scheduler = ManualScheduler::new();
        let sink = MemorySink::new();
        let mut backend = ManualBackend::new(scheduler.clone(), sink.clone());

        let handle = backend.start(Duration::from_secs(1)).unwrap();
        scheduler.advance(Duration::from_secs(2));
        assert_eq!(handle.stop(), 2);
        assert_eq!(scheduler.active_tasks(), 0);

        scheduler.advance(Duration::from_secs(2));
        assert_eq!(sink.text().as_deref(), Some("00:00:02"));
    }

    #[test]
    fn test_dropped_handle_cancels_task() {
        let scheduler = ManualScheduler::new();
        let mut backend = ManualBackend::new(scheduler.clone(), MemorySink::new());
        drop(backend.start(Duration::from_secs(1)).unwrap());
        assert_eq!(scheduler.active_tasks(), 0);
    }

    /// Two handles held side by side on one display reproduce the orphan
    /// race: both streams keep writing and the later-registered one wins
    /// each second. The controller never lets this happen.
    #[test]
    fn test_two_handles_race_on_same_display() {
        let scheduler = ManualScheduler::new();
        let sink = MemorySink::new();
        let mut backend = ManualBackend::new(scheduler.clone(), sink.clone());

        let first = backend.start(Duration::from_secs(1)).unwrap();
        scheduler.advance(Duration::from_secs(3));
        let second = backend.start(Duration::from_secs(1)).unwrap();
        scheduler.advance(Duration::from_secs(2));

        // t=4: first writes 4, second writes 1; t=5: first 5, second 2
        assert_eq!(
            sink.writes(),
            vec!["00:00:01", "00:00:02", "00:00:03", "00:00:04", "00:00:01", "00:00:05", "00:00:02"]
        );
        assert_eq!(sink.text().as_deref(), Some("00:00:02"));

        // Stopping one leaves the other writing
        assert_eq!(second.stop(), 2);
        scheduler.advance(Duration::from_secs(1));
        assert_eq!(sink.text().as_deref(), Some("00:00:06"));
        assert_eq!(first.stop(), 6);
    }
}
