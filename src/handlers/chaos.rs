use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use serde_json::json;
use tracing::{info, warn};

use crate::{models::ChaosMode, AppState};

#[derive(Debug, Default)]
pub struct ChaosParams {
    /// `error`, `timeout`, or anything else (stored but inert). Defaults to `error`.
    pub mode: Option<String>,
}

impl ChaosParams {
    /// Picks the first `mode` from the raw query pairs; repeats are ignored.
    pub fn from_pairs(pairs: Vec<(String, String)>) -> Self {
        let mode = pairs
            .into_iter()
            .find_map(|(key, value)| (key == "mode").then_some(value));
        Self { mode }
    }

    pub fn resolved_mode(&self) -> ChaosMode {
        match self.mode.as_deref() {
            Some(raw) if !raw.is_empty() => ChaosMode::parse(raw),
            _ => ChaosMode::default(),
        }
    }
}

// ── POST /chaos/start ─────────────────────────────────────────────────────────

pub async fn start_chaos(
    State(state): State<AppState>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> (StatusCode, Json<serde_json::Value>) {
    let mode = ChaosParams::from_pairs(pairs).resolved_mode();
    state.chaos.write().await.start(mode.clone());

    let pool = &state.config.pool;
    warn!(pool = %pool, mode = %mode, "CHAOS MODE started");

    (
        StatusCode::OK,
        Json(json!({ "message": "Chaos started", "mode": mode, "pool": pool })),
    )
}

// ── POST /chaos/stop ──────────────────────────────────────────────────────────

pub async fn stop_chaos(State(state): State<AppState>) -> (StatusCode, Json<serde_json::Value>) {
    state.chaos.write().await.stop();

    let pool = &state.config.pool;
    info!(pool = %pool, "CHAOS STOPPED");

    (
        StatusCode::OK,
        Json(json!({ "message": "Chaos stopped", "pool": pool })),
    )
}
