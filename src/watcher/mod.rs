//! Alert watcher: follows the Nginx JSON access log in front of the blue and
//! green instances and raises Slack alerts on failover or a high 5xx rate.

pub mod config;
pub mod detector;
pub mod slack;
pub mod tail;
pub mod window;

use std::time::Instant;

use tracing::{error, info, warn};

use crate::error::AppResult;

pub use config::WatcherConfig;
pub use detector::{AccessLogEntry, Alert, AlertKind, Detector, Observation};
pub use slack::{Delivery, SlackNotifier};
pub use tail::LogTail;

/// Detector plus notifier; feeds raw log lines through both.
pub struct Watcher {
    detector: Detector,
    notifier: SlackNotifier,
}

impl Watcher {
    pub fn new(config: &WatcherConfig) -> AppResult<Self> {
        Ok(Self {
            detector: Detector::new(
                config.window_size,
                config.error_rate_threshold,
                config.alert_cooldown,
            ),
            notifier: SlackNotifier::new(config.slack_webhook_url.clone(), config.maintenance_mode)?,
        })
    }

    /// Process one log line. Non-JSON lines are skipped without noise.
    pub async fn handle_line(&mut self, line: &str) -> Option<Observation> {
        if line.trim().is_empty() {
            return None;
        }

        let entry = match AccessLogEntry::parse(line) {
            Ok(entry) => entry,
            Err(e) if e.is_syntax() || e.is_eof() => return None,
            Err(e) => {
                warn!("Error processing log line: {}", e);
                return None;
            }
        };

        let observation = self.detector.observe(&entry, Instant::now());
        for alert in &observation.alerts {
            if let Err(e) = self.notifier.notify(alert).await {
                error!(kind = ?alert.kind, "Error sending Slack alert: {}", e);
            }
        }

        info!(
            pool = %observation.pool,
            status = observation.status,
            error_rate = %format!("{:.2}%", observation.error_rate),
            "Processed request"
        );

        Some(observation)
    }
}

/// Wait for `config.log_file`, then follow it forever from its current end.
pub async fn run(config: WatcherConfig) -> AppResult<()> {
    info!(log_file = %config.log_file.display(), "Starting log watcher");
    info!(
        slack = if config.slack_webhook_url.is_some() { "configured" } else { "NOT CONFIGURED" },
        error_rate_threshold = config.error_rate_threshold,
        window_size = config.window_size,
        alert_cooldown_sec = config.alert_cooldown.as_secs(),
        maintenance_mode = config.maintenance_mode,
        "Watcher settings"
    );

    let mut watcher = Watcher::new(&config)?;
    let mut tail = LogTail::open(&config.log_file).await?;
    info!("Log file found, starting to tail");

    loop {
        let line = tail.next_line().await?;
        watcher.handle_line(&line).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quiet_watcher(window_size: usize) -> Watcher {
        let config = WatcherConfig {
            window_size,
            ..WatcherConfig::default()
        };
        Watcher::new(&config).unwrap()
    }

    #[tokio::test]
    async fn skips_blank_and_non_json_lines() {
        let mut w = quiet_watcher(10);
        assert!(w.handle_line("").await.is_none());
        assert!(w.handle_line("2024/05/01 [notice] start worker\n").await.is_none());
        assert!(w.handle_line(r#"{"status":"oops"}"#).await.is_none());
    }

    #[tokio::test]
    async fn reports_failover_through_handle_line() {
        let mut w = quiet_watcher(10);
        w.handle_line(r#"{"pool":"blue","status":"200"}"#).await.unwrap();
        let obs = w
            .handle_line(r#"{"pool":"green","status":"200"}"#)
            .await
            .unwrap();
        assert_eq!(obs.alerts.len(), 1);
        assert_eq!(obs.alerts[0].kind, AlertKind::Failover);
    }

    #[tokio::test]
    async fn lossy_decoded_line_is_skipped_not_fatal() {
        let mut w = quiet_watcher(10);
        let garbled = String::from_utf8_lossy(b"GET /caf\xff HTTP/1.1\n").into_owned();
        assert!(w.handle_line(&garbled).await.is_none());
        assert!(w
            .handle_line(r#"{"pool":"blue","status":"200"}"#)
            .await
            .is_some());
    }
}
