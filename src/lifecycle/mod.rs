//! Lifecycle of one store-driven widget.
//!
//! A [`TimerWidget`] moves through [`Phase::Created`], [`Phase::Active`] and
//! [`Phase::TornDown`]:
//!
//! - `acquire` starts a periodic timer and an input listener, both
//!   dispatching `Tick` into the store;
//! - `bind` subscribes to the store, repainting on every notification and
//!   tearing down once the exit condition holds;
//! - `teardown` releases everything and appends a status line.
//!
//! # Example
//!
//! ```rust
//! use std::rc::Rc;
//! use tickwidget::host::LocalScheduler;
//! use tickwidget::lifecycle::TimerWidget;
//! use tickwidget::view::MemoryElement;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let element = Rc::new(MemoryElement::new());
//! let widget = TimerWidget::builder()
//!     .element(Rc::clone(&element))
//!     .timers(LocalScheduler::new())
//!     .build()?;
//!
//! widget.mount()?;
//! element.trigger();
//!
//! assert_eq!(element.content(), "1 ticks elapsed");
//! # Ok(())
//! # }
//! ```

mod builder;
mod controller;
mod error;
mod phase;

pub use builder::WidgetBuilder;
pub use controller::{TickStore, TimerWidget, WidgetId, TEARDOWN_STATUS};
pub use error::{BuildError, LifecycleError};
pub use phase::Phase;
