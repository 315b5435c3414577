pub mod chaos;
pub mod version;

use axum::{extract::State, http::StatusCode, Json};
use serde_json::json;

use crate::AppState;

/// Routes advertised by `GET /`.
pub const ENDPOINTS: [&str; 5] = [
    "GET /",
    "GET /version",
    "GET /healthz",
    "POST /chaos/start?mode=error|timeout",
    "POST /chaos/stop",
];

// ── GET / ─────────────────────────────────────────────────────────────────────

pub async fn index(State(state): State<AppState>) -> (StatusCode, Json<serde_json::Value>) {
    (
        StatusCode::OK,
        Json(json!({
            "message": "Blue/Green Service",
            "pool": state.config.pool,
            "release": state.config.release_id,
            "endpoints": ENDPOINTS,
        })),
    )
}

/// Known path, wrong method: answered like an unknown path rather than 405.
pub async fn not_found() -> StatusCode {
    StatusCode::NOT_FOUND
}

// ── GET /healthz ──────────────────────────────────────────────────────────────

/// Liveness probe. Only `error` chaos flips it; `timeout` chaos is ignored here.
pub async fn healthz(State(state): State<AppState>) -> (StatusCode, Json<serde_json::Value>) {
    let failing = state.chaos.read().await.is_failing();
    let pool = &state.config.pool;

    if failing {
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "status": "unhealthy", "pool": pool })),
        );
    }

    (StatusCode::OK, Json(json!({ "status": "healthy", "pool": pool })))
}
