use std::fmt;

use serde::{Serialize, Serializer};

/// Failure mode requested through `POST /chaos/start`.
///
/// Any string is accepted; values other than `error` and `timeout` are kept
/// verbatim in `Other` and have no effect on the probes.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ChaosMode {
    #[default]
    Error,
    Timeout,
    Other(String),
}

impl ChaosMode {
    pub fn parse(raw: &str) -> Self {
        match raw {
            "error" => Self::Error,
            "timeout" => Self::Timeout,
            other => Self::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Error => "error",
            Self::Timeout => "timeout",
            Self::Other(raw) => raw,
        }
    }
}

impl fmt::Display for ChaosMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for ChaosMode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Process-wide chaos toggle. Starts disabled with mode `error`.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ChaosState {
    pub enabled: bool,
    pub mode: ChaosMode,
}

impl ChaosState {
    pub fn start(&mut self, mode: ChaosMode) {
        self.enabled = true;
        self.mode = mode;
    }

    /// Clears the flag only; the last mode is kept.
    pub fn stop(&mut self) {
        self.enabled = false;
    }

    /// The mode currently in force, or `None` while chaos is disabled.
    pub fn active(&self) -> Option<&ChaosMode> {
        self.enabled.then_some(&self.mode)
    }

    pub fn is_failing(&self) -> bool {
        matches!(self.active(), Some(ChaosMode::Error))
    }

    pub fn is_delaying(&self) -> bool {
        matches!(self.active(), Some(ChaosMode::Timeout))
    }
}
