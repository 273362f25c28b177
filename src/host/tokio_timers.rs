//! [`TimerService`] on a tokio `LocalSet`.

use super::{TimerHandle, TimerService};
use std::cell::Cell;
use std::time::Duration;
use tokio::time::{self, Instant, MissedTickBehavior};
use tracing::debug;

/// Timers backed by `tokio::time`, spawned with `spawn_local`.
///
/// Callbacks capture `Rc` handles, so every method must be called from
/// inside a [`tokio::task::LocalSet`]; calling them elsewhere panics.
/// Cancelling a handle aborts its task, which drops the callback without
/// waiting for the next tick.
#[derive(Debug, Default)]
pub struct TokioTimers {
    next_id: Cell<u64>,
}

impl TokioTimers {
    pub fn new() -> Self {
        Self::default()
    }

    fn handle(&self) -> TimerHandle {
        let id = self.next_id.get();
        self.next_id.set(id + 1);
        TimerHandle::new(id)
    }
}

impl TimerService for TokioTimers {
    fn set_interval(&self, period: Duration, mut callback: Box<dyn FnMut()>) -> TimerHandle {
        let period = period.max(Duration::from_millis(1));
        let handle = self.handle();
        let cancellation = handle.cancellation();
        debug!(timer = handle.id(), ?period, "interval scheduled");

        let task = tokio::task::spawn_local(async move {
            let mut interval = time::interval_at(Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                interval.tick().await;
                if cancellation.is_cancelled() {
                    break;
                }
                callback();
            }
        });
        let abort = task.abort_handle();
        handle.cancellation().on_cancel(move || abort.abort());
        handle
    }

    fn set_timeout(&self, delay: Duration, callback: Box<dyn FnOnce()>) -> TimerHandle {
        let handle = self.handle();
        let cancellation = handle.cancellation();
        debug!(timer = handle.id(), ?delay, "timeout scheduled");

        let task = tokio::task::spawn_local(async move {
            time::sleep(delay).await;
            if !cancellation.is_cancelled() {
                callback();
            }
        });
        let abort = task.abort_handle();
        handle.cancellation().on_cancel(move || abort.abort());
        handle
    }
}
