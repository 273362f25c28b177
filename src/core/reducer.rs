//! Transition function for the tick counter.

use super::intent::Intent;
use super::tick::TickState;
use std::rc::Rc;

/// Compute the state that follows `state` under `intent`.
///
/// Pure and total over [`Intent`]: `Tick` adds one (saturating), `Reset`
/// returns to zero. The input snapshot is never touched; a fresh `Rc` is
/// returned for every accepted intent.
///
/// # Example
///
/// ```rust
/// use std::rc::Rc;
/// use tickwidget::core::{tick_reducer, Intent, TickState};
///
/// let start = Rc::new(TickState::default());
/// let next = tick_reducer(&start, &Intent::Tick);
///
/// assert_eq!(next.ticks(), 1);
/// assert_eq!(start.ticks(), 0);
/// ```
pub fn tick_reducer(state: &Rc<TickState>, intent: &Intent) -> Rc<TickState> {
    match intent {
        Intent::Tick => Rc::new(TickState::with_ticks(state.ticks().saturating_add(1))),
        Intent::Reset => Rc::new(TickState::with_ticks(0)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tick_increments_by_one() {
        let state = Rc::new(TickState::with_ticks(41));
        assert_eq!(tick_reducer(&state, &Intent::Tick).ticks(), 42);
    }

    #[test]
    fn reset_returns_to_zero() {
        let state = Rc::new(TickState::with_ticks(1200));
        assert_eq!(tick_reducer(&state, &Intent::Reset).ticks(), 0);
    }

    #[test]
    fn input_snapshot_is_untouched() {
        let state = Rc::new(TickState::with_ticks(3));
        let next = tick_reducer(&state, &Intent::Tick);

        assert_eq!(state.ticks(), 3);
        assert!(!Rc::ptr_eq(&state, &next));
    }

    #[test]
    fn tick_saturates_at_max() {
        let state = Rc::new(TickState::with_ticks(u64::MAX));
        assert_eq!(tick_reducer(&state, &Intent::Tick).ticks(), u64::MAX);
    }
}
