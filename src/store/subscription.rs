//! Listener registrations and the handles that retire them.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};
use tracing::debug;

/// Callback run after every dispatch. Receives nothing; it re-reads the
/// store to observe the new state.
pub type Listener = Rc<dyn Fn()>;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct ListenerId(u64);

/// Ordered set of listener registrations.
#[derive(Default)]
pub(crate) struct ListenerRegistry {
    entries: RefCell<Vec<(ListenerId, Listener)>>,
    next_id: Cell<u64>,
}

impl ListenerRegistry {
    pub(crate) fn insert(&self, listener: Listener) -> ListenerId {
        let id = ListenerId(self.next_id.get());
        self.next_id.set(id.0 + 1);
        self.entries.borrow_mut().push((id, listener));
        id
    }

    pub(crate) fn remove(&self, id: ListenerId) -> bool {
        let mut entries = self.entries.borrow_mut();
        let before = entries.len();
        entries.retain(|(entry, _)| *entry != id);
        entries.len() != before
    }

    /// Listeners registered right now, detached from the registry so they
    /// can run while registrations change.
    pub(crate) fn snapshot(&self) -> Vec<Listener> {
        self.entries
            .borrow()
            .iter()
            .map(|(_, listener)| Rc::clone(listener))
            .collect()
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.borrow().len()
    }
}

/// Handle for one listener registration.
///
/// [`unsubscribe`](Self::unsubscribe) removes exactly this registration.
/// Later calls do nothing. Dropping the handle does not unsubscribe.
pub struct Subscription {
    id: ListenerId,
    registry: Weak<ListenerRegistry>,
    active: Cell<bool>,
}

impl Subscription {
    pub(crate) fn new(id: ListenerId, registry: &Rc<ListenerRegistry>) -> Self {
        Self {
            id,
            registry: Rc::downgrade(registry),
            active: Cell::new(true),
        }
    }

    /// Remove the registration.
    ///
    /// Returns `true` only for the call that actually removed it. A listener
    /// already captured by a notification pass in progress still runs in
    /// that pass.
    pub fn unsubscribe(&self) -> bool {
        if !self.active.replace(false) {
            return false;
        }
        let removed = self
            .registry
            .upgrade()
            .is_some_and(|registry| registry.remove(self.id));
        debug!(listener = self.id.0, removed, "unsubscribed");
        removed
    }

    pub fn is_active(&self) -> bool {
        self.active.get()
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("id", &self.id.0)
            .field("active", &self.active.get())
            .finish()
    }
}
