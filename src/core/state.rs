//! Named phase trait for lifecycle state machines.
//!
//! A widget's lifecycle phase implements this trait so its phase changes can
//! be logged and recorded in a [`StateHistory`](super::StateHistory).

use serde::{Deserialize, Serialize};
use std::fmt::Debug;

/// Trait for lifecycle phases.
///
/// All methods are pure. Phases are small immutable values describing where
/// a component currently sits in its lifecycle. Phase enums are usually
/// declared with [`state_enum!`](crate::state_enum) rather than by hand.
///
/// # Required Traits
///
/// - `Clone`: phases are copied into history records
/// - `PartialEq`: phases are compared when checking preconditions
/// - `Debug`: phases show up in diagnostics
/// - `Serialize` + `Deserialize`: histories can be exported as JSON
///
/// # Example
///
/// ```rust
/// use tickwidget::core::State;
/// use tickwidget::lifecycle::Phase;
///
/// assert_eq!(Phase::Active.name(), "Active");
/// assert!(!Phase::Active.is_final());
/// assert!(Phase::TornDown.is_final());
/// ```
pub trait State:
    Clone + PartialEq + Debug + Serialize + for<'de> Deserialize<'de> + Send + Sync
{
    /// Phase name for display and logging.
    fn name(&self) -> &str;

    /// Whether this phase is terminal.
    ///
    /// No transitions leave a terminal phase. Default is `false`.
    fn is_final(&self) -> bool {
        false
    }
}
