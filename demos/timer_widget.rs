//! Timer Widget
//!
//! Paints an elapsed-tick counter into the terminal until it reaches its
//! threshold, then releases its timer and subscription.
//!
//! Key concepts:
//! - One store shared by explicit injection
//! - A surface that is just "replace my text" / "append to my text"
//! - The widget lifecycle: acquire, bind, render, teardown
//!
//! Run with: TICKWIDGET_LOG=debug cargo run --example timer_widget

use std::cell::RefCell;
use std::io::{self, Write};
use std::rc::Rc;
use std::thread;
use std::time::Duration;
use tickwidget::config::{ConfigOverrides, WidgetConfig};
use tickwidget::host::{EventHandle, EventSource, LocalScheduler};
use tickwidget::lifecycle::{Phase, TimerWidget};
use tickwidget::view::{Surface, SurfaceError};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Single terminal line, redrawn in place.
#[derive(Default)]
struct TerminalLine {
    text: RefCell<String>,
}

impl TerminalLine {
    fn redraw(&self) -> Result<(), SurfaceError> {
        let mut out = io::stdout().lock();
        write!(out, "\r\x1b[2K{}", self.text.borrow().replace('\n', " | "))
            .and_then(|_| out.flush())
            .map_err(|e| SurfaceError::WriteFailed(e.to_string()))
    }
}

impl Surface for TerminalLine {
    fn replace(&self, text: &str) -> Result<(), SurfaceError> {
        *self.text.borrow_mut() = text.to_string();
        self.redraw()
    }

    fn append(&self, text: &str) -> Result<(), SurfaceError> {
        self.text.borrow_mut().push_str(text);
        self.redraw()
    }
}

impl EventSource for TerminalLine {
    fn add_listener(&self, _callback: Rc<dyn Fn()>) -> EventHandle {
        // no input in this demo; the handle is still released on teardown
        EventHandle::new()
    }
}

fn init_logging() {
    let filter = EnvFilter::try_from_env("TICKWIDGET_LOG")
        .unwrap_or_else(|_| EnvFilter::new("tickwidget=info,warn"));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(io::stderr).with_target(true))
        .init();
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logging();
    println!("=== Timer Widget Example ===\n");

    let config = tickwidget::config::merge(
        &WidgetConfig::default(),
        &ConfigOverrides {
            tick_interval_ms: Some(10),
            threshold: Some(200),
            ..ConfigOverrides::default()
        },
    );
    let step = config.tick_interval();

    let line = Rc::new(TerminalLine::default());
    let scheduler = LocalScheduler::new();
    let widget = TimerWidget::builder()
        .element(Rc::clone(&line))
        .timers(scheduler.clone())
        .config(config)
        .build()?;

    widget.mount()?;

    while widget.phase() != Phase::TornDown {
        thread::sleep(step);
        scheduler.advance(step);
        if let Some(err) = widget.take_error() {
            eprintln!("\nrender failed: {err}");
        }
    }

    println!("\n\nLifecycle: {:?}", widget.history().get_path());
    println!("Took {:?}", widget.history().duration().unwrap_or(Duration::ZERO));
    println!("\n=== Example Complete ===");
    Ok(())
}
