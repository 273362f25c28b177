//! Tick counter state.

use serde::{Deserialize, Serialize};

/// Elapsed-tick counter held by a [`Store`](crate::store::Store).
///
/// The field is private: after the initial value, new states only come out
/// of [`tick_reducer`](super::tick_reducer). Stores hand out `Rc<TickState>`
/// snapshots, which allow reading but never mutation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TickState {
    ticks: u64,
}

impl TickState {
    pub(crate) fn with_ticks(ticks: u64) -> Self {
        Self { ticks }
    }

    /// Number of ticks counted since the last reset.
    pub fn ticks(&self) -> u64 {
        self.ticks
    }
}
