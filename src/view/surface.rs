//! Rendering targets.

use crate::host::{EventHandle, EventSource};
use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;
use thiserror::Error;
use tracing::trace;

/// Errors raised by a [`Surface`].
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SurfaceError {
    #[error("Surface is no longer attached to its host")]
    Detached,

    #[error("Surface write failed: {0}")]
    WriteFailed(String),
}

/// Anything text can be painted into.
///
/// Surfaces are handles (a DOM element, a terminal line), so both methods
/// take `&self`.
pub trait Surface {
    /// Replace the whole content with `text`.
    fn replace(&self, text: &str) -> Result<(), SurfaceError>;

    /// Add `text` after the current content.
    fn append(&self, text: &str) -> Result<(), SurfaceError>;
}

/// In-memory element: a text surface that is also an input event source.
///
/// [`trigger`](Self::trigger) simulates a user event and
/// [`detach`](Self::detach) simulates the element being removed from its
/// host, after which every write fails with [`SurfaceError::Detached`].
#[derive(Default)]
pub struct MemoryElement {
    content: RefCell<String>,
    detached: Cell<bool>,
    writes: Cell<usize>,
    listeners: RefCell<Vec<(EventHandle, Rc<dyn Fn()>)>>,
}

impl MemoryElement {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn content(&self) -> String {
        self.content.borrow().clone()
    }

    /// Successful `replace`/`append` calls so far.
    pub fn writes(&self) -> usize {
        self.writes.get()
    }

    pub fn detach(&self) {
        self.detached.set(true);
    }

    pub fn is_detached(&self) -> bool {
        self.detached.get()
    }

    /// Live input listeners.
    pub fn listener_count(&self) -> usize {
        self.listeners
            .borrow()
            .iter()
            .filter(|(handle, _)| !handle.is_cancelled())
            .count()
    }

    /// Fire one input event at every live listener.
    pub fn trigger(&self) {
        self.listeners
            .borrow_mut()
            .retain(|(handle, _)| !handle.is_cancelled());
        let live: Vec<_> = self.listeners.borrow().clone();
        trace!(listeners = live.len(), "input event");
        for (handle, callback) in live {
            // an earlier listener in this event may have detached it
            if !handle.is_cancelled() {
                callback();
            }
        }
    }

    fn check_attached(&self) -> Result<(), SurfaceError> {
        if self.detached.get() {
            Err(SurfaceError::Detached)
        } else {
            Ok(())
        }
    }
}

impl Surface for MemoryElement {
    fn replace(&self, text: &str) -> Result<(), SurfaceError> {
        self.check_attached()?;
        *self.content.borrow_mut() = text.to_string();
        self.writes.set(self.writes.get() + 1);
        Ok(())
    }

    fn append(&self, text: &str) -> Result<(), SurfaceError> {
        self.check_attached()?;
        self.content.borrow_mut().push_str(text);
        self.writes.set(self.writes.get() + 1);
        Ok(())
    }
}

impl EventSource for MemoryElement {
    fn add_listener(&self, callback: Rc<dyn Fn()>) -> EventHandle {
        let handle = EventHandle::new();
        self.listeners.borrow_mut().push((handle.clone(), callback));
        handle
    }
}

impl fmt::Debug for MemoryElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemoryElement")
            .field("content", &self.content.borrow())
            .field("detached", &self.detached.get())
            .field("listeners", &self.listener_count())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn replace_overwrites_and_append_extends() {
        let element = MemoryElement::new();

        element.replace("one").unwrap();
        element.replace("two").unwrap();
        element.append(" and more").unwrap();

        assert_eq!(element.content(), "two and more");
        assert_eq!(element.writes(), 3);
    }

    #[test]
    fn detached_element_rejects_writes() {
        let element = MemoryElement::new();
        element.replace("kept").unwrap();
        element.detach();

        assert_eq!(element.replace("lost"), Err(SurfaceError::Detached));
        assert_eq!(element.append("lost"), Err(SurfaceError::Detached));
        assert_eq!(element.content(), "kept");
    }

    #[test]
    fn trigger_skips_cancelled_listeners() {
        let element = MemoryElement::new();
        let hits = Rc::new(Cell::new(0));

        let counter = Rc::clone(&hits);
        let handle = element.add_listener(Rc::new(move || counter.set(counter.get() + 1)));

        element.trigger();
        handle.cancel();
        element.trigger();

        assert_eq!(hits.get(), 1);
        assert_eq!(element.listener_count(), 0);
    }

    #[test]
    fn listener_cancelled_mid_event_does_not_run() {
        let element = Rc::new(MemoryElement::new());
        let second_hits = Rc::new(Cell::new(0));
        let slot: Rc<RefCell<Option<EventHandle>>> = Rc::new(RefCell::new(None));

        let canceller = Rc::clone(&slot);
        element.add_listener(Rc::new(move || {
            if let Some(handle) = canceller.borrow().as_ref() {
                handle.cancel();
            }
        }));
        let counter = Rc::clone(&second_hits);
        let second = element.add_listener(Rc::new(move || counter.set(counter.get() + 1)));
        *slot.borrow_mut() = Some(second);

        element.trigger();

        assert_eq!(second_hits.get(), 0);
    }
}
