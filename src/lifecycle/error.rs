//! Lifecycle and builder errors.

use crate::config::ConfigError;
use crate::view::SurfaceError;
use thiserror::Error;

/// Errors returned by [`TimerWidget`](super::TimerWidget) operations.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum LifecycleError {
    #[error("Widget is already active; acquire may only be called once")]
    AlreadyActive,

    #[error("Widget is already subscribed to its store")]
    AlreadyBound,

    #[error("Widget has been torn down")]
    TornDown,

    #[error("Surface unavailable: {0}")]
    Surface(#[from] SurfaceError),
}

/// Errors raised by [`WidgetBuilder::build`](super::WidgetBuilder::build).
#[derive(Debug, Error)]
pub enum BuildError {
    #[error("Surface not specified. Call .surface(..) or .element(..) before .build()")]
    MissingSurface,

    #[error("Event source not specified. Call .events(..) or .element(..) before .build()")]
    MissingEventSource,

    #[error("Timer service not specified. Call .timers(..) before .build()")]
    MissingTimers,

    #[error(transparent)]
    Config(#[from] ConfigError),
}
