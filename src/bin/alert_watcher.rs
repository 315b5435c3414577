//! Blue/Green deployment alert watcher.
//!
//! Tails the Nginx JSON access log and posts Slack alerts on failover and on
//! sustained upstream 5xx rates.

use std::future::Future;

use tracing::{info, warn};

use bluegreen_mock::watcher::{self, WatcherConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,bluegreen_mock=debug".into()),
        )
        .with_target(false)
        .compact()
        .init();

    info!("══════════════════════════════════════════════════");
    info!("  Blue/Green Deployment Alert Watcher");
    info!("══════════════════════════════════════════════════");

    let config = WatcherConfig::from_env()?;
    if config.slack_webhook_url.is_none() {
        warn!("SLACK_WEBHOOK_URL not set. Alerts will be logged only.");
    }

    let shutdown = shutdown_signal()?;
    tokio::select! {
        result = watcher::run(config) => result?,
        _ = shutdown => info!("Shutting down gracefully..."),
    }

    Ok(())
}

fn shutdown_signal() -> std::io::Result<impl Future<Output = ()>> {
    #[cfg(unix)]
    let mut terminate = tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())?;

    Ok(async move {
        #[cfg(unix)]
        {
            tokio::select! {
                _ = tokio::signal::ctrl_c() => {},
                _ = terminate.recv() => {},
            }
        }

        #[cfg(not(unix))]
        {
            let _ = tokio::signal::ctrl_c().await;
        }
    })
}
