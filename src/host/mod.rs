//! Host capabilities a widget depends on.
//!
//! The lifecycle never talks to a concrete event loop. It asks a
//! [`TimerService`] for timers and an [`EventSource`] for input events, and
//! keeps the returned handles so it can release them later.

mod scheduler;
#[cfg(feature = "tokio")]
mod tokio_timers;

pub use scheduler::LocalScheduler;
#[cfg(feature = "tokio")]
pub use tokio_timers::TokioTimers;

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;
use std::time::Duration;

#[derive(Default)]
struct CancelState {
    cancelled: Cell<bool>,
    on_cancel: RefCell<Option<Box<dyn FnOnce()>>>,
}

/// Shared "stop" flag behind every host handle.
///
/// A host may attach a hook that runs once, on the first `cancel`, to free
/// whatever it holds for the handle (a spawned task, a queued callback).
#[derive(Clone, Default)]
pub(crate) struct Cancellation(Rc<CancelState>);

impl Cancellation {
    pub(crate) fn cancel(&self) -> bool {
        if self.0.cancelled.replace(true) {
            return false;
        }
        let hook = self.0.on_cancel.borrow_mut().take();
        if let Some(hook) = hook {
            hook();
        }
        true
    }

    pub(crate) fn is_cancelled(&self) -> bool {
        self.0.cancelled.get()
    }

    /// Run `hook` on the first `cancel`, or right away if already cancelled.
    #[cfg_attr(not(feature = "tokio"), allow(dead_code))]
    pub(crate) fn on_cancel(&self, hook: impl FnOnce() + 'static) {
        if self.is_cancelled() {
            hook();
        } else {
            *self.0.on_cancel.borrow_mut() = Some(Box::new(hook));
        }
    }
}

impl fmt::Debug for Cancellation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cancellation")
            .field("cancelled", &self.is_cancelled())
            .finish()
    }
}

/// Token for one scheduled timer.
///
/// Hosts check the token before every invocation, so once
/// [`cancel`](Self::cancel) returns the callback is never observed again.
#[derive(Clone, Debug)]
pub struct TimerHandle {
    id: u64,
    cancellation: Cancellation,
}

impl TimerHandle {
    pub(crate) fn new(id: u64) -> Self {
        Self {
            id,
            cancellation: Cancellation::default(),
        }
    }

    pub(crate) fn cancellation(&self) -> Cancellation {
        self.cancellation.clone()
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    /// Stop the timer. Returns `false` if it was already cancelled.
    pub fn cancel(&self) -> bool {
        self.cancellation.cancel()
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancellation.is_cancelled()
    }
}

/// Token for one input-event listener registration.
#[derive(Clone, Debug, Default)]
pub struct EventHandle {
    cancellation: Cancellation,
}

impl EventHandle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Detach the listener. Returns `false` if it was already detached.
    pub fn cancel(&self) -> bool {
        self.cancellation.cancel()
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancellation.is_cancelled()
    }
}

/// Schedules callbacks on the host's event loop.
pub trait TimerService {
    /// Run `callback` every `period` until the handle is cancelled.
    fn set_interval(&self, period: Duration, callback: Box<dyn FnMut()>) -> TimerHandle;

    /// Run `callback` once after `delay` unless the handle is cancelled first.
    fn set_timeout(&self, delay: Duration, callback: Box<dyn FnOnce()>) -> TimerHandle;
}

/// Delivers user-triggered events (clicks, key presses) as bare callbacks.
pub trait EventSource {
    /// Invoke `callback` on every event until the returned handle is
    /// cancelled.
    fn add_listener(&self, callback: Rc<dyn Fn()>) -> EventHandle;
}
