//! The timer widget and its lifecycle.

use super::builder::WidgetBuilder;
use super::error::LifecycleError;
use super::phase::Phase;
use crate::config::{TeardownOrder, WidgetConfig};
use crate::core::{Guard, Intent, StateHistory, StateTransition, TickState};
use crate::host::{EventHandle, EventSource, TimerHandle, TimerService};
use crate::store::{Store, Subscription};
use crate::view::{self, Surface, SurfaceError};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Appended to the surface when a widget is torn down.
pub const TEARDOWN_STATUS: &str = "\ntimers destroyed, subscription closed";

/// Store driving a timer widget.
pub type TickStore = Store<TickState, Intent>;

/// Identifier carried by every log line a widget emits.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WidgetId(Uuid);

impl WidgetId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for WidgetId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for WidgetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

pub(crate) struct WidgetParts {
    pub(crate) surface: Rc<dyn Surface>,
    pub(crate) events: Rc<dyn EventSource>,
    pub(crate) store: TickStore,
    pub(crate) timers: Rc<dyn TimerService>,
    pub(crate) config: WidgetConfig,
    pub(crate) exit: Guard<TickState>,
}

struct WidgetInner {
    id: WidgetId,
    surface: Rc<dyn Surface>,
    events: Rc<dyn EventSource>,
    store: TickStore,
    timers: Rc<dyn TimerService>,
    config: WidgetConfig,
    exit: Guard<TickState>,
    phase: Cell<Phase>,
    history: RefCell<StateHistory<Phase>>,
    timer_handles: RefCell<Vec<TimerHandle>>,
    event_handle: RefCell<Option<EventHandle>>,
    subscription: RefCell<Option<Subscription>>,
    last_error: RefCell<Option<LifecycleError>>,
}

impl WidgetInner {
    fn enter(&self, next: Phase) {
        let from = self.phase.get();
        debug_assert!(from.can_enter(next), "illegal phase change {from} -> {next}");
        self.phase.set(next);

        let history = self.history.borrow().record(StateTransition {
            from,
            to: next,
            timestamp: Utc::now(),
        });
        *self.history.borrow_mut() = history;
        info!(widget = %self.id, %from, to = %next, "phase changed");
    }

    fn paint(&self, surface: Option<&dyn Surface>, state: &TickState) -> Result<(), SurfaceError> {
        let surface = surface.unwrap_or(&*self.surface);
        view::paint(surface, &view::format_state(state))
    }

    /// Body of the store subscription.
    fn on_notify(&self) {
        // a pass snapshotted before teardown can still reach us
        if self.phase.get() == Phase::TornDown {
            return;
        }
        let state = self.store.get_state();

        match self.config.teardown_order {
            TeardownOrder::RenderFirst => {
                let painted = self.paint(None, &state).map_err(LifecycleError::from);
                self.record(painted);
                if self.exit.check(&state) {
                    let torn_down = self.teardown();
                    self.record(torn_down);
                }
            }
            TeardownOrder::ReleaseFirst => {
                let exiting = self.exit.check(&state);
                if exiting {
                    self.release();
                }
                let painted = self.paint(None, &state).map_err(LifecycleError::from);
                self.record(painted);
                if exiting {
                    let announced = self.announce();
                    self.record(announced);
                }
            }
        }
    }

    fn record(&self, result: Result<(), LifecycleError>) {
        if let Err(err) = result {
            warn!(widget = %self.id, error = %err, "notification handler failed");
            *self.last_error.borrow_mut() = Some(err);
        }
    }

    fn cancel_all(&self) {
        for handle in self.timer_handles.borrow_mut().drain(..) {
            handle.cancel();
        }
        if let Some(handle) = self.event_handle.borrow_mut().take() {
            handle.cancel();
        }
        if let Some(subscription) = self.subscription.borrow_mut().take() {
            subscription.unsubscribe();
        }
    }

    /// Cancel timers, the input listener and the subscription, then enter
    /// `TornDown`. Returns `false` when already torn down.
    fn release(&self) -> bool {
        if self.phase.get() == Phase::TornDown {
            return false;
        }
        self.cancel_all();
        self.enter(Phase::TornDown);
        true
    }

    fn announce(&self) -> Result<(), LifecycleError> {
        self.surface.append(TEARDOWN_STATUS)?;
        Ok(())
    }

    fn teardown(&self) -> Result<(), LifecycleError> {
        if !self.release() {
            return Ok(());
        }
        self.announce()
    }
}

impl Drop for WidgetInner {
    fn drop(&mut self) {
        if self.phase.get() != Phase::TornDown {
            debug!(widget = %self.id, "dropped while live; releasing resources");
            self.cancel_all();
        }
    }
}

/// A timer widget: a surface showing how many ticks a store has counted.
///
/// The widget ticks its store from a periodic timer and from input events,
/// repaints on every store notification and tears itself down once the exit
/// condition (by default `ticks >= threshold`) holds.
///
/// Operations return `Result<&Self, _>` so they chain with `?`. Dropping a
/// widget that was never torn down releases its timers, listener and
/// subscription without touching the surface.
///
/// # Example
///
/// ```rust
/// use std::rc::Rc;
/// use std::time::Duration;
/// use tickwidget::host::LocalScheduler;
/// use tickwidget::lifecycle::{Phase, TimerWidget, TEARDOWN_STATUS};
/// use tickwidget::view::MemoryElement;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let element = Rc::new(MemoryElement::new());
/// let scheduler = LocalScheduler::new();
///
/// let widget = TimerWidget::builder()
///     .element(Rc::clone(&element))
///     .timers(scheduler.clone())
///     .threshold(3)
///     .build()?;
/// widget.acquire()?.bind()?;
///
/// scheduler.advance(Duration::from_millis(10));
///
/// assert_eq!(widget.phase(), Phase::TornDown);
/// assert_eq!(element.content(), format!("3 ticks elapsed{TEARDOWN_STATUS}"));
/// # Ok(())
/// # }
/// ```
pub struct TimerWidget {
    inner: Rc<WidgetInner>,
}

impl TimerWidget {
    pub fn builder() -> WidgetBuilder {
        WidgetBuilder::new()
    }

    pub(crate) fn from_parts(parts: WidgetParts) -> Self {
        let id = WidgetId::new();
        debug!(widget = %id, threshold = parts.config.threshold, "widget created");
        Self {
            inner: Rc::new(WidgetInner {
                id,
                surface: parts.surface,
                events: parts.events,
                store: parts.store,
                timers: parts.timers,
                config: parts.config,
                exit: parts.exit,
                phase: Cell::new(Phase::Created),
                history: RefCell::new(StateHistory::new()),
                timer_handles: RefCell::new(Vec::new()),
                event_handle: RefCell::new(None),
                subscription: RefCell::new(None),
                last_error: RefCell::new(None),
            }),
        }
    }

    /// Identifier attached to every log line this widget emits.
    pub fn id(&self) -> WidgetId {
        self.inner.id
    }

    /// Current lifecycle phase.
    ///
    /// # Example
    ///
    /// ```rust
    /// use std::rc::Rc;
    /// use tickwidget::host::LocalScheduler;
    /// use tickwidget::lifecycle::{Phase, TimerWidget};
    /// use tickwidget::view::MemoryElement;
    ///
    /// # fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// let widget = TimerWidget::builder()
    ///     .element(Rc::new(MemoryElement::new()))
    ///     .timers(LocalScheduler::new())
    ///     .build()?;
    /// assert_eq!(widget.phase(), Phase::Created);
    ///
    /// widget.acquire()?;
    /// assert_eq!(widget.phase(), Phase::Active);
    ///
    /// widget.teardown()?;
    /// assert_eq!(widget.phase(), Phase::TornDown);
    /// # Ok(())
    /// # }
    /// ```
    pub fn phase(&self) -> Phase {
        self.inner.phase.get()
    }

    /// Phase changes so far.
    pub fn history(&self) -> StateHistory<Phase> {
        self.inner.history.borrow().clone()
    }

    /// The store this widget ticks and renders.
    ///
    /// Other components holding a clone of the same handle see the same
    /// state; dispatching through it drives the widget like its own timer.
    ///
    /// # Example
    ///
    /// ```rust
    /// use std::rc::Rc;
    /// use tickwidget::host::LocalScheduler;
    /// use tickwidget::lifecycle::TimerWidget;
    /// use tickwidget::view::MemoryElement;
    /// use tickwidget::Intent;
    ///
    /// # fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// let element = Rc::new(MemoryElement::new());
    /// let widget = TimerWidget::builder()
    ///     .element(Rc::clone(&element))
    ///     .timers(LocalScheduler::new())
    ///     .build()?;
    /// widget.bind()?;
    ///
    /// widget.store().dispatch(Intent::Tick);
    /// assert_eq!(element.content(), "1 ticks elapsed");
    /// # Ok(())
    /// # }
    /// ```
    pub fn store(&self) -> &TickStore {
        &self.inner.store
    }

    /// Configuration the widget was built with, after overrides and
    /// validation.
    pub fn config(&self) -> &WidgetConfig {
        &self.inner.config
    }

    /// Whether the widget currently holds a store subscription.
    ///
    /// `true` between [`bind`](Self::bind) and teardown.
    pub fn is_bound(&self) -> bool {
        self.inner.subscription.borrow().is_some()
    }

    /// Most recent failure inside a store notification, if any.
    ///
    /// Paint and teardown errors raised while handling a notification have
    /// no caller to return to, so they are logged and kept here.
    pub fn take_error(&self) -> Option<LifecycleError> {
        self.inner.last_error.borrow_mut().take()
    }

    /// Start the tick timer and the input listener.
    ///
    /// Both dispatch [`Intent::Tick`] into the store. Fails with
    /// [`LifecycleError::AlreadyActive`] on an active widget and
    /// [`LifecycleError::TornDown`] after teardown; nothing is registered
    /// in either case.
    pub fn acquire(&self) -> Result<&Self, LifecycleError> {
        let inner = &self.inner;
        match inner.phase.get() {
            Phase::Created => {}
            Phase::Active => return Err(LifecycleError::AlreadyActive),
            Phase::TornDown => return Err(LifecycleError::TornDown),
        }

        let store = inner.store.clone();
        let timer = inner.timers.set_interval(
            inner.config.tick_interval(),
            Box::new(move || store.dispatch(Intent::Tick)),
        );
        inner.timer_handles.borrow_mut().push(timer);

        let store = inner.store.clone();
        let listener = inner
            .events
            .add_listener(Rc::new(move || store.dispatch(Intent::Tick)));
        *inner.event_handle.borrow_mut() = Some(listener);

        inner.enter(Phase::Active);
        Ok(self)
    }

    /// Subscribe to the store: every notification repaints and then checks
    /// the exit condition.
    pub fn bind(&self) -> Result<&Self, LifecycleError> {
        let inner = &self.inner;
        if inner.phase.get() == Phase::TornDown {
            return Err(LifecycleError::TornDown);
        }
        if inner.subscription.borrow().is_some() {
            return Err(LifecycleError::AlreadyBound);
        }

        let weak = Rc::downgrade(inner);
        let subscription = inner.store.subscribe(Rc::new(move || {
            if let Some(inner) = weak.upgrade() {
                inner.on_notify();
            }
        }));
        debug!(widget = %inner.id, "bound to store");
        *inner.subscription.borrow_mut() = Some(subscription);
        Ok(self)
    }

    /// Acquire, bind and paint the current state in one go.
    pub fn mount(&self) -> Result<&Self, LifecycleError> {
        self.acquire()?.bind()?.render()
    }

    /// Repaint the bound surface with the store's current state.
    pub fn render(&self) -> Result<&Self, LifecycleError> {
        self.render_with(None, None)
    }

    /// Repaint, optionally overriding the surface and/or the state.
    ///
    /// Never changes the lifecycle phase and works in any phase.
    pub fn render_with(
        &self,
        surface: Option<&dyn Surface>,
        state: Option<&TickState>,
    ) -> Result<&Self, LifecycleError> {
        match state {
            Some(state) => self.inner.paint(surface, state)?,
            None => self.inner.paint(surface, &self.inner.store.get_state())?,
        }
        Ok(self)
    }

    /// Cancel every timer, the input listener and the subscription, then
    /// append [`TEARDOWN_STATUS`] to the surface.
    ///
    /// Calling it again is a no-op. If appending the status fails the widget
    /// is still torn down and the error is returned.
    pub fn teardown(&self) -> Result<(), LifecycleError> {
        self.inner.teardown()
    }
}

impl fmt::Debug for TimerWidget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TimerWidget")
            .field("id", &self.inner.id)
            .field("phase", &self.inner.phase.get())
            .field("timers", &self.inner.timer_handles.borrow().len())
            .field("bound", &self.is_bound())
            .field(
                "since",
                &self.inner.history.borrow().last().map(|t| t.timestamp),
            )
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigOverrides;
    use crate::core::State;
    use crate::host::LocalScheduler;
    use crate::view::MemoryElement;
    use std::time::Duration;

    struct Rig {
        element: Rc<MemoryElement>,
        scheduler: LocalScheduler,
        widget: TimerWidget,
    }

    fn rig(threshold: u64) -> Rig {
        rig_with(ConfigOverrides {
            threshold: Some(threshold),
            ..ConfigOverrides::default()
        })
    }

    fn rig_with(overrides: ConfigOverrides) -> Rig {
        let element = Rc::new(MemoryElement::new());
        let scheduler = LocalScheduler::new();
        let widget = TimerWidget::builder()
            .element(Rc::clone(&element))
            .timers(scheduler.clone())
            .overrides(&overrides)
            .build()
            .unwrap();
        Rig {
            element,
            scheduler,
            widget,
        }
    }

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    fn finished(ticks: u64) -> String {
        format!("{ticks} ticks elapsed{TEARDOWN_STATUS}")
    }

    #[test]
    fn new_widget_is_created_and_idle() {
        let rig = rig(3);

        assert_eq!(rig.widget.phase(), Phase::Created);
        assert!(!rig.widget.is_bound());
        assert_eq!(rig.scheduler.pending(), 0);
        assert_eq!(rig.element.listener_count(), 0);
    }

    #[test]
    fn acquire_starts_one_timer_and_one_listener() {
        let rig = rig(3);

        rig.widget.acquire().unwrap();

        assert_eq!(rig.widget.phase(), Phase::Active);
        assert_eq!(rig.scheduler.pending(), 1);
        assert_eq!(rig.element.listener_count(), 1);
    }

    #[test]
    fn second_acquire_fails_without_registering() {
        let rig = rig(3);
        rig.widget.acquire().unwrap();

        let err = rig.widget.acquire().unwrap_err();

        assert_eq!(err, LifecycleError::AlreadyActive);
        assert_eq!(rig.scheduler.pending(), 1);
        assert_eq!(rig.element.listener_count(), 1);
    }

    #[test]
    fn second_bind_fails() {
        let rig = rig(3);
        rig.widget.bind().unwrap();

        assert_eq!(rig.widget.bind().unwrap_err(), LifecycleError::AlreadyBound);
        assert_eq!(rig.widget.store().listener_count(), 1);
    }

    #[test]
    fn timer_ticks_repaint_the_surface() {
        let rig = rig(100);
        rig.widget.acquire().unwrap().bind().unwrap();

        rig.scheduler.advance(ms(2));

        assert_eq!(rig.element.content(), "2 ticks elapsed");
        assert_eq!(rig.widget.store().get_state().ticks(), 2);
    }

    #[test]
    fn input_events_tick_too() {
        let rig = rig(100);
        rig.widget.acquire().unwrap().bind().unwrap();

        rig.element.trigger();
        rig.element.trigger();

        assert_eq!(rig.element.content(), "2 ticks elapsed");
    }

    #[test]
    fn reaching_threshold_tears_down() {
        let rig = rig(3);
        rig.widget.acquire().unwrap().bind().unwrap();

        rig.scheduler.advance(ms(3));

        assert_eq!(rig.widget.phase(), Phase::TornDown);
        assert_eq!(rig.element.content(), finished(3));
        assert_eq!(rig.scheduler.pending(), 0);
        assert_eq!(rig.element.listener_count(), 0);
        assert_eq!(rig.widget.store().listener_count(), 0);
    }

    #[test]
    fn nothing_changes_after_teardown() {
        let rig = rig(3);
        rig.widget.acquire().unwrap().bind().unwrap();
        rig.scheduler.advance(ms(3));
        let writes = rig.element.writes();

        rig.scheduler.advance(ms(50));
        rig.element.trigger();

        assert_eq!(rig.element.content(), finished(3));
        assert_eq!(rig.element.writes(), writes);
        assert_eq!(rig.widget.store().get_state().ticks(), 3);
    }

    #[test]
    fn late_dispatch_updates_state_without_observer() {
        let rig = rig(3);
        rig.widget.acquire().unwrap().bind().unwrap();
        rig.scheduler.advance(ms(3));

        rig.widget.store().dispatch(Intent::Tick);

        assert_eq!(rig.widget.store().get_state().ticks(), 4);
        assert_eq!(rig.element.content(), finished(3));
    }

    #[test]
    fn teardown_twice_appends_once() {
        let rig = rig(100);
        rig.widget.acquire().unwrap().bind().unwrap();
        rig.scheduler.advance(ms(1));

        rig.widget.teardown().unwrap();
        let once = rig.element.content();
        rig.widget.teardown().unwrap();

        assert_eq!(rig.element.content(), once);
        assert_eq!(once, finished(1));
    }

    #[test]
    fn teardown_from_created_is_allowed() {
        let rig = rig(3);

        rig.widget.teardown().unwrap();

        assert_eq!(rig.widget.phase(), Phase::TornDown);
        assert_eq!(rig.widget.acquire().unwrap_err(), LifecycleError::TornDown);
        assert_eq!(rig.widget.bind().unwrap_err(), LifecycleError::TornDown);
    }

    #[test]
    fn render_with_overrides_surface_and_state() {
        let rig = rig(3);
        let other = MemoryElement::new();
        let state = rig.widget.store().get_state();

        rig.widget
            .render_with(Some(&other as &dyn Surface), Some(state.as_ref()))
            .unwrap();

        assert_eq!(other.content(), "0 ticks elapsed");
        assert_eq!(rig.element.content(), "");
        assert_eq!(rig.widget.phase(), Phase::Created);
    }

    #[test]
    fn render_reports_detached_surface() {
        let rig = rig(3);
        rig.element.detach();

        let err = rig.widget.render().unwrap_err();

        assert_eq!(err, LifecycleError::Surface(SurfaceError::Detached));
    }

    #[test]
    fn paint_failure_inside_notification_is_kept() {
        let rig = rig(100);
        rig.widget.acquire().unwrap().bind().unwrap();
        rig.element.detach();

        rig.scheduler.advance(ms(1));

        assert_eq!(
            rig.widget.take_error(),
            Some(LifecycleError::Surface(SurfaceError::Detached))
        );
        assert_eq!(rig.widget.take_error(), None);
        assert_eq!(rig.widget.phase(), Phase::Active);
    }

    #[test]
    fn teardown_releases_even_when_status_cannot_be_written() {
        let rig = rig(100);
        rig.widget.acquire().unwrap().bind().unwrap();
        rig.element.detach();

        let err = rig.widget.teardown().unwrap_err();

        assert_eq!(err, LifecycleError::Surface(SurfaceError::Detached));
        assert_eq!(rig.widget.phase(), Phase::TornDown);
        assert_eq!(rig.scheduler.pending(), 0);
    }

    #[test]
    fn release_first_ends_with_same_content() {
        let rig = rig_with(ConfigOverrides {
            threshold: Some(3),
            teardown_order: Some(TeardownOrder::ReleaseFirst),
            ..ConfigOverrides::default()
        });
        rig.widget.acquire().unwrap().bind().unwrap();

        rig.scheduler.advance(ms(10));

        assert_eq!(rig.widget.phase(), Phase::TornDown);
        assert_eq!(rig.element.content(), finished(3));
    }

    #[test]
    fn release_first_frees_resources_when_paint_fails() {
        let rig = rig_with(ConfigOverrides {
            threshold: Some(1),
            teardown_order: Some(TeardownOrder::ReleaseFirst),
            ..ConfigOverrides::default()
        });
        rig.widget.acquire().unwrap().bind().unwrap();
        rig.element.detach();

        rig.scheduler.advance(ms(5));

        assert_eq!(rig.widget.phase(), Phase::TornDown);
        assert_eq!(rig.scheduler.pending(), 0);
        assert!(rig.widget.take_error().is_some());
    }

    #[test]
    fn history_records_lifecycle_path() {
        let rig = rig(2);
        rig.widget.acquire().unwrap().bind().unwrap();
        rig.scheduler.advance(ms(2));

        let history = rig.widget.history();
        let path = history.get_path();

        assert_eq!(path, vec![&Phase::Created, &Phase::Active, &Phase::TornDown]);
        assert!(path[2].is_final());
        assert_eq!(history.last().map(|t| t.to), Some(Phase::TornDown));
    }

    #[test]
    fn debug_shows_when_phase_last_changed() {
        let rig = rig(3);
        assert!(format!("{:?}", rig.widget).contains("since: None"));

        rig.widget.acquire().unwrap();
        let changed_at = rig.widget.history().last().map(|t| t.timestamp);

        assert!(changed_at.is_some());
        assert!(format!("{:?}", rig.widget).contains(&format!("since: {changed_at:?}")));
    }

    #[test]
    fn mount_paints_initial_state() {
        let rig = rig(3);

        rig.widget.mount().unwrap();

        assert_eq!(rig.element.content(), "0 ticks elapsed");
        assert_eq!(rig.widget.phase(), Phase::Active);
        assert!(rig.widget.is_bound());
    }

    #[test]
    fn dropping_live_widget_stops_its_timer() {
        let rig = rig(100);
        rig.widget.acquire().unwrap().bind().unwrap();
        let store = rig.widget.store().clone();

        drop(rig.widget);
        rig.scheduler.advance(ms(5));

        assert_eq!(store.get_state().ticks(), 0);
        assert_eq!(store.listener_count(), 0);
        assert_eq!(rig.element.listener_count(), 0);
    }

    #[test]
    fn custom_exit_guard_replaces_threshold() {
        let element = Rc::new(MemoryElement::new());
        let scheduler = LocalScheduler::new();
        let widget = TimerWidget::builder()
            .element(Rc::clone(&element))
            .timers(scheduler.clone())
            .exit_when(Guard::new(|s: &TickState| s.ticks() == 2))
            .build()
            .unwrap();
        widget.acquire().unwrap().bind().unwrap();

        scheduler.advance(ms(10));

        assert_eq!(element.content(), finished(2));
    }
}
