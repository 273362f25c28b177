//! Timer widget on a real tokio clock.
#![cfg(feature = "tokio")]

use std::rc::Rc;
use std::time::Duration;
use tickwidget::host::TokioTimers;
use tickwidget::lifecycle::{Phase, TimerWidget, TEARDOWN_STATUS};
use tickwidget::view::MemoryElement;
use tokio::task::LocalSet;

#[tokio::test]
async fn widget_tears_down_on_tokio_timers() {
    LocalSet::new()
        .run_until(async {
            let element = Rc::new(MemoryElement::new());
            let widget = TimerWidget::builder()
                .element(Rc::clone(&element))
                .timers(TokioTimers::new())
                .threshold(3)
                .build()
                .unwrap();
            widget.acquire().unwrap().bind().unwrap();

            let waited = tokio::time::timeout(Duration::from_secs(2), async {
                while widget.phase() != Phase::TornDown {
                    tokio::time::sleep(Duration::from_millis(1)).await;
                }
            })
            .await;
            assert!(waited.is_ok(), "widget never reached its threshold");

            tokio::time::sleep(Duration::from_millis(20)).await;
            assert_eq!(element.content(), format!("3 ticks elapsed{TEARDOWN_STATUS}"));
            assert_eq!(widget.store().get_state().ticks(), 3);
        })
        .await;
}
