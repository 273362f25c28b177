//! Tickwidget: UI components on a unidirectional-data-flow store
//!
//! Tickwidget shows how to build a stateful UI unit directly on top of a
//! state container, with no UI framework in between. The pure core (state,
//! intents, reducer) knows nothing about timers or surfaces; the lifecycle
//! layer wires a widget to a store and to whatever host provides timers,
//! input events and a place to paint text.
//!
//! # Core Concepts
//!
//! - **Store**: single owner of the state; applies intents through a pure
//!   reducer and notifies subscribers
//! - **Surface**: anything text can be painted into
//! - **Host**: timer service and event source the widget borrows resources from
//! - **Lifecycle**: `Created → Active → TornDown` for one widget instance
//!
//! # Example
//!
//! ```rust
//! use std::rc::Rc;
//! use std::time::Duration;
//! use tickwidget::host::LocalScheduler;
//! use tickwidget::lifecycle::{Phase, TimerWidget};
//! use tickwidget::view::MemoryElement;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let element = Rc::new(MemoryElement::new());
//! let scheduler = LocalScheduler::new();
//!
//! let widget = TimerWidget::builder()
//!     .element(Rc::clone(&element))
//!     .timers(scheduler.clone())
//!     .threshold(5)
//!     .build()?;
//! widget.acquire()?.bind()?;
//!
//! scheduler.advance(Duration::from_millis(2));
//! assert_eq!(element.content(), "2 ticks elapsed");
//!
//! scheduler.advance(Duration::from_millis(10));
//! assert_eq!(widget.phase(), Phase::TornDown);
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod core;
pub mod host;
pub mod lifecycle;
mod macros;
pub mod store;
pub mod view;

// Re-export commonly used types
pub use crate::core::{Guard, Intent, State, StateHistory, StateTransition, TickState};
pub use lifecycle::{LifecycleError, Phase, TimerWidget, WidgetBuilder};
pub use store::{Store, Subscription};
