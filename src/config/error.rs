//! Configuration errors.

use thiserror::Error;

/// One rule a [`WidgetConfig`](super::WidgetConfig) broke.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigViolation {
    #[error("tick interval must be at least 1 ms")]
    ZeroInterval,

    #[error("teardown threshold must be at least 1 tick")]
    ZeroThreshold,
}

/// Errors produced while loading or validating configuration.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ConfigError {
    #[error("Failed to parse widget configuration: {0}")]
    Parse(String),

    #[error("Invalid widget configuration: {}", summarize(.violations))]
    Invalid { violations: Vec<ConfigViolation> },
}

fn summarize(violations: &[ConfigViolation]) -> String {
    violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
