use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::error::{AppError, AppResult};

pub const DEFAULT_LOG_FILE: &str = "/var/log/nginx/access.log";

#[derive(Debug, Clone)]
pub struct WatcherConfig {
    /// Slack incoming-webhook URL. `None` means alerts are only logged.
    pub slack_webhook_url: Option<String>,
    /// Error-rate alert threshold, in percent.
    pub error_rate_threshold: f64,
    pub window_size: usize,
    pub alert_cooldown: Duration,
    /// Suppresses failover alerts during planned switches.
    pub maintenance_mode: bool,
    pub log_file: PathBuf,
}

impl Default for WatcherConfig {
    fn default() -> Self {
        Self {
            slack_webhook_url: None,
            error_rate_threshold: 2.0,
            window_size: 200,
            alert_cooldown: Duration::from_secs(300),
            maintenance_mode: false,
            log_file: PathBuf::from(DEFAULT_LOG_FILE),
        }
    }
}

impl WatcherConfig {
    pub fn from_env() -> AppResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> AppResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let defaults = Self::default();

        let window_size = parse_or(get("WINDOW_SIZE"), "WINDOW_SIZE", defaults.window_size)?;
        if window_size == 0 {
            return Err(AppError::Config("WINDOW_SIZE must be at least 1".to_string()));
        }

        Ok(Self {
            slack_webhook_url: get("SLACK_WEBHOOK_URL"),
            error_rate_threshold: parse_or(
                get("ERROR_RATE_THRESHOLD"),
                "ERROR_RATE_THRESHOLD",
                defaults.error_rate_threshold,
            )?,
            window_size,
            alert_cooldown: Duration::from_secs(parse_or(
                get("ALERT_COOLDOWN_SEC"),
                "ALERT_COOLDOWN_SEC",
                defaults.alert_cooldown.as_secs(),
            )?),
            maintenance_mode: get("MAINTENANCE_MODE")
                .map(|v| v.eq_ignore_ascii_case("true"))
                .unwrap_or(false),
            log_file: get("LOG_FILE").map(PathBuf::from).unwrap_or(defaults.log_file),
        })
    }
}

fn parse_or<T: FromStr>(raw: Option<String>, key: &str, default: T) -> AppResult<T> {
    match raw {
        Some(v) => v
            .trim()
            .parse()
            .map_err(|_| AppError::Config(format!("{key} must be a valid number, got {v:?}"))),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn from_pairs(pairs: &[(&'static str, &'static str)]) -> AppResult<WatcherConfig> {
        let pairs = pairs.to_vec();
        WatcherConfig::from_lookup(move |key| {
            pairs
                .iter()
                .find(|(k, _)| *k == key)
                .map(|(_, v)| v.to_string())
        })
    }

    #[test]
    fn defaults_match_documented_values() {
        let cfg = from_pairs(&[]).unwrap();
        assert!(cfg.slack_webhook_url.is_none());
        assert_eq!(cfg.error_rate_threshold, 2.0);
        assert_eq!(cfg.window_size, 200);
        assert_eq!(cfg.alert_cooldown, Duration::from_secs(300));
        assert!(!cfg.maintenance_mode);
        assert_eq!(cfg.log_file, PathBuf::from(DEFAULT_LOG_FILE));
    }

    #[test]
    fn overrides_are_parsed() {
        let cfg = from_pairs(&[
            ("SLACK_WEBHOOK_URL", "https://hooks.slack.test/T000/B000"),
            ("ERROR_RATE_THRESHOLD", "5.5"),
            ("WINDOW_SIZE", "50"),
            ("ALERT_COOLDOWN_SEC", "60"),
            ("MAINTENANCE_MODE", "TRUE"),
            ("LOG_FILE", "/tmp/access.log"),
        ])
        .unwrap();
        assert_eq!(
            cfg.slack_webhook_url.as_deref(),
            Some("https://hooks.slack.test/T000/B000")
        );
        assert_eq!(cfg.error_rate_threshold, 5.5);
        assert_eq!(cfg.window_size, 50);
        assert_eq!(cfg.alert_cooldown, Duration::from_secs(60));
        assert!(cfg.maintenance_mode);
        assert_eq!(cfg.log_file, PathBuf::from("/tmp/access.log"));
    }

    #[test]
    fn maintenance_mode_needs_literal_true() {
        let cfg = from_pairs(&[("MAINTENANCE_MODE", "yes")]).unwrap();
        assert!(!cfg.maintenance_mode);
    }

    #[test]
    fn rejects_bad_numbers_and_empty_window() {
        assert!(matches!(
            from_pairs(&[("WINDOW_SIZE", "lots")]),
            Err(AppError::Config(_))
        ));
        assert!(matches!(
            from_pairs(&[("WINDOW_SIZE", "0")]),
            Err(AppError::Config(_))
        ));
        assert!(matches!(
            from_pairs(&[("ERROR_RATE_THRESHOLD", "high")]),
            Err(AppError::Config(_))
        ));
    }
}
