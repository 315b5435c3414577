//! Mock application instance for blue/green deployment drills.
//!
//! The server reports its pool and release, answers liveness probes, and can be
//! pushed into `error` or `timeout` chaos on demand. The `watcher` module backs
//! the `alert-watcher` binary that follows the fronting Nginx access log.

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tokio::sync::RwLock;
use tower_http::trace::TraceLayer;

pub mod config;
pub mod error;
pub mod handlers;
pub mod models;
pub mod watcher;

use crate::config::Config;
use crate::models::ChaosState;

/// Shared application state — cheap to clone (all heap behind Arc).
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub chaos: Arc<RwLock<ChaosState>>,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        Self {
            config: Arc::new(config),
            chaos: Arc::new(RwLock::new(ChaosState::default())),
        }
    }
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        // ── Discovery ───────────────────────────────────────────────────────
        .route("/", get(handlers::index).fallback(handlers::not_found))

        // ── Probes ──────────────────────────────────────────────────────────
        .route("/healthz", get(handlers::healthz).fallback(handlers::not_found))
        .route(
            "/version",
            get(handlers::version::version).fallback(handlers::not_found),
        )

        // ── Chaos toggle ────────────────────────────────────────────────────
        .route(
            "/chaos/start",
            post(handlers::chaos::start_chaos).fallback(handlers::not_found),
        )
        .route(
            "/chaos/stop",
            post(handlers::chaos::stop_chaos).fallback(handlers::not_found),
        )

        // ── Middleware ──────────────────────────────────────────────────────
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
