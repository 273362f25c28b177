//! Unidirectional-data-flow state container.
//!
//! A [`Store`] owns the current state and a reducer. Components receive a
//! clone of the handle, dispatch intents into it and subscribe to be told
//! when the state changed.

mod container;
mod subscription;

pub use container::Store;
pub use subscription::{Listener, Subscription};
