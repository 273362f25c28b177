//! Deterministic single-threaded timer loop.

use super::{Cancellation, TimerHandle, TimerService};
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;
use std::time::Duration;
use tracing::{debug, trace};

enum Callback {
    Repeating(Box<dyn FnMut()>, Duration),
    Once(Box<dyn FnOnce()>),
}

struct Entry {
    id: u64,
    due: Duration,
    cancellation: Cancellation,
    callback: Callback,
}

#[derive(Default)]
struct SchedulerInner {
    now: Duration,
    next_id: u64,
    queue: Vec<Entry>,
}

impl SchedulerInner {
    fn push(&mut self, due: Duration, callback: Callback) -> TimerHandle {
        let handle = TimerHandle::new(self.next_id);
        self.next_id += 1;
        self.queue.push(Entry {
            id: handle.id(),
            due,
            cancellation: handle.cancellation(),
            callback,
        });
        handle
    }

    /// Remove the earliest entry due at or before `limit`. Ties run in
    /// scheduling order.
    fn pop_due(&mut self, limit: Duration) -> Option<Entry> {
        self.queue.retain(|entry| !entry.cancellation.is_cancelled());
        let index = self
            .queue
            .iter()
            .enumerate()
            .filter(|(_, entry)| entry.due <= limit)
            .min_by_key(|(_, entry)| (entry.due, entry.id))
            .map(|(index, _)| index)?;
        Some(self.queue.swap_remove(index))
    }
}

/// Virtual-time [`TimerService`].
///
/// Time only moves when [`advance`](Self::advance) is called. Due callbacks
/// run one at a time, in due order, each to completion before the next; they
/// may cancel or schedule timers, including their own.
///
/// # Example
///
/// ```rust
/// use std::cell::Cell;
/// use std::rc::Rc;
/// use std::time::Duration;
/// use tickwidget::host::{LocalScheduler, TimerService};
///
/// let scheduler = LocalScheduler::new();
/// let fired = Rc::new(Cell::new(0));
///
/// let counter = Rc::clone(&fired);
/// let handle = scheduler.set_interval(
///     Duration::from_millis(10),
///     Box::new(move || counter.set(counter.get() + 1)),
/// );
///
/// scheduler.advance(Duration::from_millis(35));
/// assert_eq!(fired.get(), 3);
///
/// handle.cancel();
/// scheduler.advance(Duration::from_millis(100));
/// assert_eq!(fired.get(), 3);
/// ```
#[derive(Clone, Default)]
pub struct LocalScheduler {
    inner: Rc<RefCell<SchedulerInner>>,
}

impl LocalScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Virtual time elapsed since creation.
    pub fn now(&self) -> Duration {
        self.inner.borrow().now
    }

    /// Timers still waiting to fire.
    pub fn pending(&self) -> usize {
        self.inner
            .borrow()
            .queue
            .iter()
            .filter(|entry| !entry.cancellation.is_cancelled())
            .count()
    }

    /// Move the clock forward by `by`, firing everything that falls due.
    ///
    /// Returns the number of callbacks run.
    pub fn advance(&self, by: Duration) -> usize {
        let target = self.now() + by;
        let mut fired = 0;

        loop {
            let Some(entry) = self.inner.borrow_mut().pop_due(target) else {
                break;
            };
            self.inner.borrow_mut().now = entry.due;
            trace!(timer = entry.id, at = ?entry.due, "firing timer");
            fired += 1;

            match entry.callback {
                Callback::Once(callback) => callback(),
                Callback::Repeating(mut callback, period) => {
                    callback();
                    if !entry.cancellation.is_cancelled() {
                        self.inner.borrow_mut().queue.push(Entry {
                            id: entry.id,
                            due: entry.due + period,
                            cancellation: entry.cancellation,
                            callback: Callback::Repeating(callback, period),
                        });
                    }
                }
            }
        }

        self.inner.borrow_mut().now = target;
        fired
    }
}

impl TimerService for LocalScheduler {
    fn set_interval(&self, period: Duration, callback: Box<dyn FnMut()>) -> TimerHandle {
        // a zero period would never let the clock move past the entry
        let period = period.max(Duration::from_nanos(1));
        let mut inner = self.inner.borrow_mut();
        let due = inner.now + period;
        let handle = inner.push(due, Callback::Repeating(callback, period));
        debug!(timer = handle.id(), ?period, "interval scheduled");
        handle
    }

    fn set_timeout(&self, delay: Duration, callback: Box<dyn FnOnce()>) -> TimerHandle {
        let mut inner = self.inner.borrow_mut();
        let due = inner.now + delay;
        let handle = inner.push(due, Callback::Once(callback));
        debug!(timer = handle.id(), ?delay, "timeout scheduled");
        handle
    }
}

impl fmt::Debug for LocalScheduler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LocalScheduler")
            .field("now", &self.now())
            .field("pending", &self.pending())
            .finish()
    }
}
