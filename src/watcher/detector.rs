//! Failover and error-rate detection over Nginx JSON access-log lines.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use chrono::Utc;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

use super::window::RequestWindow;

const UNKNOWN: &str = "unknown";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AlertKind {
    Failover,
    ErrorRate,
}

impl AlertKind {
    pub fn color(self) -> &'static str {
        match self {
            Self::Failover => "#FF9800",
            Self::ErrorRate => "#F44336",
        }
    }

    pub fn icon(self) -> &'static str {
        match self {
            Self::Failover => "🔄",
            Self::ErrorRate => "🚨",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Alert {
    pub kind: AlertKind,
    pub message: String,
}

/// One line of the Nginx `json` log format. Missing fields take defaults.
#[derive(Debug, Clone, Deserialize)]
pub struct AccessLogEntry {
    #[serde(default = "unknown", deserialize_with = "lenient_string")]
    pub pool: String,
    #[serde(default = "unknown", deserialize_with = "lenient_string")]
    pub release: String,
    #[serde(default, deserialize_with = "lenient_status")]
    pub status: u16,
    #[serde(default, deserialize_with = "lenient_string")]
    pub upstream_status: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub upstream_addr: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub request_time: String,
}

impl AccessLogEntry {
    /// Malformed JSON yields a syntax error; well-formed JSON of the wrong
    /// shape yields a data error.
    pub fn parse(line: &str) -> serde_json::Result<Self> {
        let value: Value = serde_json::from_str(line.trim())?;
        serde_json::from_value(value)
    }
}

fn unknown() -> String {
    UNKNOWN.to_string()
}

fn lenient_string<'de, D: Deserializer<'de>>(de: D) -> Result<String, D::Error> {
    Ok(match Value::deserialize(de)? {
        Value::String(s) => s,
        Value::Null => String::new(),
        other => other.to_string(),
    })
}

/// Nginx writes `status` quoted or bare depending on the `log_format`.
fn lenient_status<'de, D: Deserializer<'de>>(de: D) -> Result<u16, D::Error> {
    use serde::de::Error;

    match Value::deserialize(de)? {
        Value::Number(n) => n
            .as_u64()
            .and_then(|n| u16::try_from(n).ok())
            .ok_or_else(|| D::Error::custom(format!("status out of range: {n}"))),
        Value::String(s) => s
            .trim()
            .parse()
            .map_err(|_| D::Error::custom(format!("status is not a number: {s:?}"))),
        other => Err(D::Error::custom(format!("unexpected status value: {other}"))),
    }
}

/// What the detector made of a single log entry.
#[derive(Debug, Clone)]
pub struct Observation {
    pub pool: String,
    pub status: u16,
    pub error_rate: f64,
    pub alerts: Vec<Alert>,
}

#[derive(Debug)]
pub struct Detector {
    window: RequestWindow,
    last_pool: Option<String>,
    threshold: f64,
    cooldown: Duration,
    last_fired: HashMap<AlertKind, Instant>,
}

impl Detector {
    pub fn new(window_size: usize, threshold: f64, cooldown: Duration) -> Self {
        Self {
            window: RequestWindow::new(window_size),
            last_pool: None,
            threshold,
            cooldown,
            last_fired: HashMap::new(),
        }
    }

    pub fn last_pool(&self) -> Option<&str> {
        self.last_pool.as_deref()
    }

    pub fn error_rate(&self) -> f64 {
        self.window.error_rate()
    }

    pub fn observe(&mut self, entry: &AccessLogEntry, now: Instant) -> Observation {
        let mut alerts = Vec::new();
        self.window.push(entry.status);

        let known_pool = entry.pool != UNKNOWN;
        if let Some(previous) = self.last_pool.clone() {
            if known_pool && previous != entry.pool && self.cooled_down(AlertKind::Failover, now) {
                alerts.push(Alert {
                    kind: AlertKind::Failover,
                    message: format!(
                        "*Failover Detected!*\n\
                         • From: `{}`\n\
                         • To: `{}`\n\
                         • Release: `{}`\n\
                         • Upstream: `{}`\n\
                         • Time: {}",
                        previous,
                        entry.pool,
                        entry.release,
                        entry.upstream_addr,
                        Utc::now().format("%Y-%m-%d %H:%M:%S UTC"),
                    ),
                });
            }
        }
        if known_pool {
            self.last_pool = Some(entry.pool.clone());
        }

        let error_rate = self.window.error_rate();
        if self.window.is_full()
            && error_rate > self.threshold
            && self.cooled_down(AlertKind::ErrorRate, now)
        {
            alerts.push(Alert {
                kind: AlertKind::ErrorRate,
                message: format!(
                    "*High Error Rate Detected!*\n\
                     • Error Rate: `{:.2}%` (threshold: {}%)\n\
                     • Window Size: {} requests\n\
                     • Current Pool: `{}`\n\
                     • Action Required: Check upstream health",
                    error_rate,
                    self.threshold,
                    self.window.capacity(),
                    entry.pool,
                ),
            });
        }

        Observation {
            pool: entry.pool.clone(),
            status: entry.status,
            error_rate,
            alerts,
        }
    }

    /// Returns true and arms the cooldown when `kind` may fire at `now`.
    fn cooled_down(&mut self, kind: AlertKind, now: Instant) -> bool {
        match self.last_fired.get(&kind) {
            Some(last) if now.saturating_duration_since(*last) < self.cooldown => false,
            _ => {
                self.last_fired.insert(kind, now);
                true
            }
        }
    }
}
