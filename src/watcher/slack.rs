use std::time::Duration;

use serde::Serialize;
use tracing::{info, warn};

use super::detector::{Alert, AlertKind};
use crate::error::{AppError, AppResult};

const WEBHOOK_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Serialize)]
pub struct SlackPayload {
    pub attachments: Vec<SlackAttachment>,
}

#[derive(Debug, Serialize)]
pub struct SlackAttachment {
    pub color: &'static str,
    pub title: String,
    pub text: String,
    pub footer: &'static str,
    pub ts: i64,
}

impl SlackPayload {
    pub fn for_alert(alert: &Alert, ts: i64) -> Self {
        Self {
            attachments: vec![SlackAttachment {
                color: alert.kind.color(),
                title: format!("{} Blue/Green Deployment Alert", alert.kind.icon()),
                text: alert.message.clone(),
                footer: "Blue/Green Monitor",
                ts,
            }],
        }
    }
}

/// Outcome of a single notification attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    Sent,
    /// No webhook configured; the alert went to the log only.
    LoggedOnly,
    /// Failover alert dropped because maintenance mode is on.
    Suppressed,
}

pub struct SlackNotifier {
    client: reqwest::Client,
    webhook_url: Option<String>,
    maintenance_mode: bool,
}

impl SlackNotifier {
    pub fn new(webhook_url: Option<String>, maintenance_mode: bool) -> AppResult<Self> {
        let client = reqwest::Client::builder().timeout(WEBHOOK_TIMEOUT).build()?;
        Ok(Self {
            client,
            webhook_url,
            maintenance_mode,
        })
    }

    pub fn is_configured(&self) -> bool {
        self.webhook_url.is_some()
    }

    pub async fn notify(&self, alert: &Alert) -> AppResult<Delivery> {
        let Some(url) = self.webhook_url.as_deref() else {
            warn!(kind = ?alert.kind, "No Slack webhook configured. Alert: {}", alert.message);
            return Ok(Delivery::LoggedOnly);
        };

        if self.maintenance_mode && alert.kind == AlertKind::Failover {
            info!("Maintenance mode: suppressing failover alert");
            return Ok(Delivery::Suppressed);
        }

        let payload = SlackPayload::for_alert(alert, chrono::Utc::now().timestamp());
        let response = self.client.post(url).json(&payload).send().await?;

        if response.status() != reqwest::StatusCode::OK {
            return Err(AppError::WebhookStatus(response.status().as_u16()));
        }

        info!(kind = ?alert.kind, "Slack alert sent");
        Ok(Delivery::Sent)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn alert(kind: AlertKind) -> Alert {
        Alert {
            kind,
            message: "*Failover Detected!*".to_string(),
        }
    }

    #[test]
    fn payload_shape() {
        let payload = SlackPayload::for_alert(&alert(AlertKind::Failover), 1_700_000_000);
        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "attachments": [{
                    "color": "#FF9800",
                    "title": "🔄 Blue/Green Deployment Alert",
                    "text": "*Failover Detected!*",
                    "footer": "Blue/Green Monitor",
                    "ts": 1_700_000_000,
                }]
            })
        );
    }

    #[test]
    fn error_rate_alerts_are_red() {
        let payload = SlackPayload::for_alert(&alert(AlertKind::ErrorRate), 0);
        assert_eq!(payload.attachments[0].color, "#F44336");
        assert!(payload.attachments[0].title.starts_with("🚨"));
    }

    #[tokio::test]
    async fn without_webhook_alerts_are_only_logged() {
        let notifier = SlackNotifier::new(None, true).unwrap();
        assert!(!notifier.is_configured());
        let delivery = notifier.notify(&alert(AlertKind::Failover)).await.unwrap();
        assert_eq!(delivery, Delivery::LoggedOnly);
    }

    #[tokio::test]
    async fn maintenance_mode_suppresses_failover_only() {
        // Suppression happens before any request is made, so the URL is never dialled.
        let notifier =
            SlackNotifier::new(Some("http://127.0.0.1:9/hook".to_string()), true).unwrap();
        let delivery = notifier.notify(&alert(AlertKind::Failover)).await.unwrap();
        assert_eq!(delivery, Delivery::Suppressed);
    }

    #[tokio::test]
    async fn unreachable_webhook_is_an_error() {
        let notifier =
            SlackNotifier::new(Some("http://127.0.0.1:9/hook".to_string()), true).unwrap();
        let err = notifier.notify(&alert(AlertKind::ErrorRate)).await.unwrap_err();
        assert!(matches!(err, AppError::Webhook(_)));
    }
}
