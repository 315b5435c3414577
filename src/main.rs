use std::future::{Future, IntoFuture};

use tracing::info;

use bluegreen_mock::{build_router, config::Config, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present (ignored in production where env vars are injected)
    dotenv::dotenv().ok();

    // Structured logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,bluegreen_mock=debug".into()),
        )
        .with_target(false)
        .compact()
        .init();

    let config = Config::from_env()?;
    let addr = format!("{}:{}", config.host, config.port);

    info!(pool = %config.pool, release = %config.release_id, "Blue/Green mock instance");

    let app = build_router(AppState::new(config.clone()));
    let shutdown = shutdown_signal()?;
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    info!(
        pool = %config.pool,
        port = config.port,
        release = %config.release_id,
        "Server running on http://{}",
        addr
    );

    // In-flight requests (including delayed /version responses) are not drained.
    tokio::select! {
        result = axum::serve(listener, app).into_future() => result?,
        _ = shutdown => info!(pool = %config.pool, "Shutting down..."),
    }

    Ok(())
}

/// Installs the handlers up front so a SIGTERM arriving right after startup
/// is not met by the default disposition.
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
