//! Widget lifecycle phases.

crate::state_enum! {
    /// Where a widget is in its lifecycle.
    ///
    /// `Created → Active → TornDown`; a widget may also be torn down
    /// straight from `Created`. `TornDown` is terminal.
    #[derive(Copy, Eq, Hash)]
    pub enum Phase {
        /// Built, nothing acquired yet.
        Created,
        /// Timer and input listener running.
        Active,
        /// Everything released.
        TornDown,
    }
    final: [TornDown]
}

impl Phase {
    /// Whether moving from `self` to `next` is a legal lifecycle step.
    pub fn can_enter(self, next: Phase) -> bool {
        matches!(
            (self, next),
            (Phase::Created, Phase::Active)
                | (Phase::Created, Phase::TornDown)
                | (Phase::Active, Phase::TornDown)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::State;

    #[test]
    fn only_torn_down_is_final() {
        assert!(!Phase::Created.is_final());
        assert!(!Phase::Active.is_final());
        assert!(Phase::TornDown.is_final());
    }

    #[test]
    fn lifecycle_only_moves_forward() {
        assert!(Phase::Created.can_enter(Phase::Active));
        assert!(Phase::Active.can_enter(Phase::TornDown));
        assert!(Phase::Created.can_enter(Phase::TornDown));

        assert!(!Phase::Active.can_enter(Phase::Active));
        assert!(!Phase::Active.can_enter(Phase::Created));
        assert!(!Phase::TornDown.can_enter(Phase::Active));
        assert!(!Phase::TornDown.can_enter(Phase::TornDown));
    }
}
