//! Turning state into text and text into pixels (or characters).

mod surface;

pub use surface::{MemoryElement, Surface, SurfaceError};

use crate::core::TickState;

/// Human-readable report of the tick counter.
///
/// ```rust
/// use tickwidget::core::TickState;
/// use tickwidget::view::format_state;
///
/// assert_eq!(format_state(&TickState::default()), "0 ticks elapsed");
/// ```
pub fn format_state(state: &TickState) -> String {
    format!("{} ticks elapsed", state.ticks())
}

/// Replace the content of `surface` with `text`.
pub fn paint(surface: &dyn Surface, text: &str) -> Result<(), SurfaceError> {
    surface.replace(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{tick_reducer, Intent};
    use std::rc::Rc;

    #[test]
    fn format_reports_ticks() {
        let state = tick_reducer(&Rc::new(TickState::default()), &Intent::Tick);
        assert_eq!(format_state(&state), "1 ticks elapsed");
    }

    #[test]
    fn format_is_deterministic() {
        let state = TickState::default();
        assert_eq!(format_state(&state), format_state(&state));
    }

    #[test]
    fn paint_overwrites() {
        let element = MemoryElement::new();
        paint(&element, "first").unwrap();
        paint(&element, "second").unwrap();
        assert_eq!(element.content(), "second");
    }

    #[test]
    fn paint_reports_detached_surface() {
        let element = MemoryElement::new();
        element.detach();
        assert_eq!(paint(&element, "x"), Err(SurfaceError::Detached));
    }
}
