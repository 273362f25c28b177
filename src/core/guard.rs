//! Guard predicates.
//!
//! A guard is a pure boolean function over a value. Widgets use one as their
//! exit condition ("stop once the counter reaches the threshold") and the
//! lifecycle uses them to check phase preconditions.

use std::fmt;
use std::marker::PhantomData;

/// Pure predicate over `S`.
///
/// # Example
///
/// ```rust
/// use tickwidget::core::{Guard, TickState};
///
/// let reached = Guard::at_least(2);
///
/// assert!(!reached.check(&TickState::default()));
/// ```
pub struct Guard<S> {
    predicate: Box<dyn Fn(&S) -> bool + Send + Sync>,
    _phantom: PhantomData<fn(&S)>,
}

impl<S> Guard<S> {
    /// Create a guard from a pure predicate function.
    ///
    /// The predicate must be deterministic and free of side effects.
    pub fn new<F>(predicate: F) -> Self
    where
        F: Fn(&S) -> bool + Send + Sync + 'static,
    {
        Guard {
            predicate: Box::new(predicate),
            _phantom: PhantomData,
        }
    }

    /// Evaluate the predicate.
    pub fn check(&self, value: &S) -> bool {
        (self.predicate)(value)
    }
}

impl Guard<crate::core::TickState> {
    /// Guard that holds once the tick counter reaches `threshold`.
    pub fn at_least(threshold: u64) -> Self {
        Guard::new(move |state: &crate::core::TickState| state.ticks() >= threshold)
    }
}

impl<S> fmt::Debug for Guard<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Guard").finish_non_exhaustive()
    }
}
