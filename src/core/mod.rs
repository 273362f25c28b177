//! Pure core: state values, intents, the transition function, guards and
//! phase history.
//!
//! Nothing in this module performs I/O or holds shared mutable state.

mod guard;
mod history;
mod intent;
mod reducer;
mod state;
mod tick;

pub use guard::Guard;
pub use history::{StateHistory, StateTransition};
pub use intent::{Intent, UnknownIntent};
pub use reducer::tick_reducer;
pub use state::State;
pub use tick::TickState;
