use chrono::{SecondsFormat, Utc};
use serde::Serialize;

pub const SERVICE_VERSION: &str = "1.0.0";

/// Body of `GET /version`. `timestamp` is omitted on delayed responses.
#[derive(Debug, Clone, Serialize)]
pub struct VersionInfo {
    pub version: &'static str,
    pub pool: String,
    pub release: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
}

impl VersionInfo {
    pub fn new(pool: impl Into<String>, release: impl Into<String>) -> Self {
        Self {
            version: SERVICE_VERSION,
            pool: pool.into(),
            release: release.into(),
            timestamp: None,
        }
    }

    /// Stamp with the current UTC instant, e.g. `2024-05-01T12:00:00.123Z`.
    pub fn stamped(mut self) -> Self {
        self.timestamp = Some(Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true));
        self
    }
}
