//! Widget configuration.
//!
//! Configuration is a plain serde value with defaults. Partial overrides
//! (for example a JSON snippet) are layered on top with [`merge`], and the
//! result is checked with [`WidgetConfig::validate`], which reports every
//! broken rule at once rather than stopping at the first.
//!
//! # Example
//!
//! ```rust
//! use std::time::Duration;
//! use tickwidget::config::WidgetConfig;
//!
//! let config = WidgetConfig::from_json(r#"{ "threshold": 10 }"#).unwrap();
//!
//! assert_eq!(config.threshold, 10);
//! assert_eq!(config.tick_interval(), Duration::from_millis(1));
//! ```

mod error;

pub use error::{ConfigError, ConfigViolation};

use crate::core::TickState;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use stillwater::validation::Validation;
use stillwater::NonEmptyVec;

pub const DEFAULT_TICK_INTERVAL_MS: u64 = 1;
pub const DEFAULT_THRESHOLD: u64 = 3000;

/// Where the exit check sits relative to painting in a notification.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TeardownOrder {
    /// Paint, then check the exit condition, then tear down.
    #[default]
    RenderFirst,
    /// Check the exit condition and release timers and the subscription,
    /// then paint, then append the status line.
    ReleaseFirst,
}

/// Settings for one timer widget.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WidgetConfig {
    /// Period of the tick timer, in milliseconds.
    pub tick_interval_ms: u64,
    /// Tick count at which the widget tears itself down.
    pub threshold: u64,
    /// State the widget's store starts from.
    pub initial_state: TickState,
    pub teardown_order: TeardownOrder,
}

impl Default for WidgetConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: DEFAULT_TICK_INTERVAL_MS,
            threshold: DEFAULT_THRESHOLD,
            initial_state: TickState::default(),
            teardown_order: TeardownOrder::default(),
        }
    }
}

/// Partial configuration: `None` keeps the base value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConfigOverrides {
    pub tick_interval_ms: Option<u64>,
    pub threshold: Option<u64>,
    pub initial_state: Option<TickState>,
    pub teardown_order: Option<TeardownOrder>,
}

/// Layer `overrides` over `base`, returning a new configuration.
pub fn merge(base: &WidgetConfig, overrides: &ConfigOverrides) -> WidgetConfig {
    WidgetConfig {
        tick_interval_ms: overrides.tick_interval_ms.unwrap_or(base.tick_interval_ms),
        threshold: overrides.threshold.unwrap_or(base.threshold),
        initial_state: overrides.initial_state.unwrap_or(base.initial_state),
        teardown_order: overrides.teardown_order.unwrap_or(base.teardown_order),
    }
}

impl WidgetConfig {
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }

    /// Parse overrides from JSON, merge them over the defaults and validate.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let overrides: ConfigOverrides =
            serde_json::from_str(json).map_err(|e| ConfigError::Parse(e.to_string()))?;
        let config = merge(&Self::default(), &overrides);
        config.validate()?;
        Ok(config)
    }

    /// Check every rule, collecting all violations.
    pub fn validate(&self) -> Result<(), ConfigError> {
        match self.check() {
            Validation::Success(()) => Ok(()),
            Validation::Failure(violations) => Err(ConfigError::Invalid {
                violations: violations.iter().cloned().collect(),
            }),
        }
    }

    fn check(&self) -> Validation<(), NonEmptyVec<ConfigViolation>> {
        let checks = vec![
            if self.tick_interval_ms == 0 {
                Validation::fail(ConfigViolation::ZeroInterval)
            } else {
                Validation::success(())
            },
            if self.threshold == 0 {
                Validation::fail(ConfigViolation::ZeroThreshold)
            } else {
                Validation::success(())
            },
        ];

        Validation::all_vec(checks).map(|_| ())
    }
}
