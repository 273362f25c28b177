//! The state container.

use super::subscription::{Listener, ListenerRegistry, Subscription};
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;
use std::str::FromStr;
use tracing::{debug, trace};

type ReducerFn<S, A> = dyn Fn(&Rc<S>, &A) -> Rc<S>;

struct StoreInner<S, A> {
    state: RefCell<Rc<S>>,
    reducer: Box<ReducerFn<S, A>>,
    listeners: Rc<ListenerRegistry>,
}

/// Single owner of the current state.
///
/// `Store` is a handle: clones share the same state and listeners, so one
/// store can be passed into every component that needs it. State only
/// changes through [`dispatch`](Self::dispatch), which runs the reducer and
/// then notifies listeners.
///
/// # Example
///
/// ```rust
/// use std::cell::Cell;
/// use std::rc::Rc;
/// use tickwidget::core::{tick_reducer, Intent, TickState};
/// use tickwidget::store::Store;
///
/// let store = Store::new(TickState::default(), tick_reducer);
/// let seen = Rc::new(Cell::new(0));
///
/// let observer = {
///     let store = store.clone();
///     let seen = Rc::clone(&seen);
///     Rc::new(move || seen.set(store.get_state().ticks()))
/// };
/// let subscription = store.subscribe(observer);
///
/// store.dispatch(Intent::Tick);
/// store.dispatch(Intent::Tick);
/// assert_eq!(seen.get(), 2);
///
/// subscription.unsubscribe();
/// store.dispatch(Intent::Reset);
/// assert_eq!(seen.get(), 2);
/// assert_eq!(store.get_state().ticks(), 0);
/// ```
pub struct Store<S, A> {
    inner: Rc<StoreInner<S, A>>,
}

impl<S: fmt::Debug + 'static, A: fmt::Debug + 'static> Store<S, A> {
    /// Create a store holding `initial`, advanced by `reducer`.
    pub fn new<R>(initial: S, reducer: R) -> Self
    where
        R: Fn(&Rc<S>, &A) -> Rc<S> + 'static,
    {
        Self {
            inner: Rc::new(StoreInner {
                state: RefCell::new(Rc::new(initial)),
                reducer: Box::new(reducer),
                listeners: Rc::new(ListenerRegistry::default()),
            }),
        }
    }

    /// Apply `action` and notify every listener registered when the
    /// notification pass starts.
    ///
    /// Listeners may dispatch again; the nested dispatch finishes its own
    /// pass before the outer pass resumes.
    pub fn dispatch(&self, action: A) {
        let next = {
            let current = self.inner.state.borrow();
            (self.inner.reducer)(&current, &action)
        };
        trace!(?action, state = ?next, "dispatch");
        *self.inner.state.borrow_mut() = next;
        self.notify();
    }

    /// Current state snapshot.
    pub fn get_state(&self) -> Rc<S> {
        Rc::clone(&self.inner.state.borrow())
    }

    /// Register `listener`. Registering the same listener twice yields two
    /// independent subscriptions.
    pub fn subscribe(&self, listener: Listener) -> Subscription {
        let id = self.inner.listeners.insert(listener);
        debug!(?id, total = self.inner.listeners.len(), "subscribed");
        Subscription::new(id, &self.inner.listeners)
    }

    /// Number of live registrations.
    ///
    /// Drops as soon as a [`Subscription`] is cancelled, so it shows whether
    /// a torn-down component left anything behind.
    ///
    /// # Example
    ///
    /// ```rust
    /// use std::rc::Rc;
    /// use tickwidget::core::{tick_reducer, TickState};
    /// use tickwidget::store::Store;
    ///
    /// let store = Store::new(TickState::default(), tick_reducer);
    /// let subscription = store.subscribe(Rc::new(|| {}));
    /// assert_eq!(store.listener_count(), 1);
    ///
    /// subscription.unsubscribe();
    /// assert_eq!(store.listener_count(), 0);
    /// ```
    pub fn listener_count(&self) -> usize {
        self.inner.listeners.len()
    }

    fn notify(&self) {
        let pass = self.inner.listeners.snapshot();
        trace!(listeners = pass.len(), "notify");
        for listener in pass {
            listener();
        }
    }
}

impl<S, A> Store<S, A>
where
    S: fmt::Debug + 'static,
    A: FromStr + fmt::Debug + 'static,
{
    /// Dispatch by wire name.
    ///
    /// Names that do not parse never reach the reducer: the state stays the
    /// very same snapshot, and listeners are still notified.
    pub fn dispatch_named(&self, name: &str) {
        match name.parse::<A>() {
            Ok(action) => self.dispatch(action),
            Err(_) => {
                trace!(name, "ignoring unknown intent");
                self.notify();
            }
        }
    }
}

impl<S, A> Clone for Store<S, A> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<S: fmt::Debug, A> fmt::Debug for Store<S, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Store")
            .field("state", &self.inner.state.borrow())
            .field("listeners", &self.inner.listeners.len())
            .finish()
    }
}
