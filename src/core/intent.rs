//! Intents accepted by the tick store.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Named request to change a [`TickState`](super::TickState).
///
/// The set is closed and carries no payload. Wire names are `"TICK"` and
/// `"RESET"`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Intent {
    /// Advance the counter by one.
    Tick,
    /// Return the counter to zero.
    Reset,
}

impl Intent {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Tick => "TICK",
            Self::Reset => "RESET",
        }
    }
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A name outside the intent set.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("Unknown intent '{0}'")]
pub struct UnknownIntent(pub String);

impl FromStr for Intent {
    type Err = UnknownIntent;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "TICK" => Ok(Self::Tick),
            "RESET" => Ok(Self::Reset),
            other => Err(UnknownIntent(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_parse_back() {
        for intent in [Intent::Tick, Intent::Reset] {
            assert_eq!(intent.name().parse::<Intent>(), Ok(intent));
        }
    }

    #[test]
    fn unknown_names_are_rejected() {
        let err = "INCREMENT".parse::<Intent>().unwrap_err();
        assert_eq!(err, UnknownIntent("INCREMENT".to_string()));
        assert_eq!(err.to_string(), "Unknown intent 'INCREMENT'");
    }

    #[test]
    fn names_are_case_sensitive() {
        assert!("tick".parse::<Intent>().is_err());
    }

    #[test]
    fn serde_uses_wire_names() {
        assert_eq!(serde_json::to_string(&Intent::Reset).unwrap(), r#""RESET""#);
        let back: Intent = serde_json::from_str(r#""TICK""#).unwrap();
        assert_eq!(back, Intent::Tick);
    }
}
