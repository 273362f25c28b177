//! Builder for timer widgets.

use super::controller::{TickStore, TimerWidget, WidgetParts};
use super::error::BuildError;
use crate::config::{merge, ConfigOverrides, WidgetConfig};
use crate::core::{tick_reducer, Guard, TickState};
use crate::host::{EventSource, TimerService};
use crate::store::Store;
use crate::view::Surface;
use std::rc::Rc;
use std::time::Duration;

/// Collects the collaborators of a [`TimerWidget`].
///
/// Surface, event source and timer service are required. Without an
/// explicit store a fresh one is created from the configured initial state;
/// without an explicit exit guard the widget stops at the configured
/// threshold.
pub struct WidgetBuilder {
    surface: Option<Rc<dyn Surface>>,
    events: Option<Rc<dyn EventSource>>,
    store: Option<TickStore>,
    timers: Option<Rc<dyn TimerService>>,
    config: WidgetConfig,
    exit: Option<Guard<TickState>>,
}

impl WidgetBuilder {
    pub fn new() -> Self {
        Self {
            surface: None,
            events: None,
            store: None,
            timers: None,
            config: WidgetConfig::default(),
            exit: None,
        }
    }

    /// Use one element as both surface and event source.
    pub fn element<T>(self, element: Rc<T>) -> Self
    where
        T: Surface + EventSource + 'static,
    {
        let surface: Rc<dyn Surface> = element.clone();
        let events: Rc<dyn EventSource> = element;
        Self {
            surface: Some(surface),
            events: Some(events),
            ..self
        }
    }

    pub fn surface<T: Surface + 'static>(mut self, surface: Rc<T>) -> Self {
        self.surface = Some(surface);
        self
    }

    pub fn events<T: EventSource + 'static>(mut self, events: Rc<T>) -> Self {
        self.events = Some(events);
        self
    }

    /// Share an existing store instead of creating one.
    pub fn store(mut self, store: TickStore) -> Self {
        self.store = Some(store);
        self
    }

    pub fn timers<T: TimerService + 'static>(mut self, timers: T) -> Self {
        self.timers = Some(Rc::new(timers));
        self
    }

    pub fn config(mut self, config: WidgetConfig) -> Self {
        self.config = config;
        self
    }

    /// Layer partial settings over the current configuration.
    pub fn overrides(mut self, overrides: &ConfigOverrides) -> Self {
        self.config = merge(&self.config, overrides);
        self
    }

    pub fn threshold(mut self, threshold: u64) -> Self {
        self.config.threshold = threshold;
        self
    }

    pub fn tick_interval(mut self, interval: Duration) -> Self {
        self.config.tick_interval_ms = u64::try_from(interval.as_millis()).unwrap_or(u64::MAX);
        self
    }

    /// Replace the threshold check with a custom exit condition.
    pub fn exit_when(mut self, guard: Guard<TickState>) -> Self {
        self.exit = Some(guard);
        self
    }

    /// Validate the configuration and assemble the widget.
    pub fn build(self) -> Result<TimerWidget, BuildError> {
        let surface = self.surface.ok_or(BuildError::MissingSurface)?;
        let events = self.events.ok_or(BuildError::MissingEventSource)?;
        let timers = self.timers.ok_or(BuildError::MissingTimers)?;
        self.config.validate()?;

        let config = self.config;
        let exit = self
            .exit
            .unwrap_or_else(|| Guard::at_least(config.threshold));
        let store = self
            .store
            .unwrap_or_else(|| Store::new(config.initial_state, tick_reducer));

        Ok(TimerWidget::from_parts(WidgetParts {
            surface,
            events,
            store,
            timers,
            config,
            exit,
        }))
    }
}

impl Default for WidgetBuilder {
    fn default() -> Self {
        Self::new()
    }
}
