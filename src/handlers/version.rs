use std::time::Duration;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use tracing::warn;

use crate::{models::VersionInfo, AppState};

pub const HEADER_APP_POOL: &str = "x-app-pool";
pub const HEADER_RELEASE_ID: &str = "x-release-id";

/// How long `timeout` chaos holds a `/version` response.
pub const CHAOS_TIMEOUT_DELAY: Duration = Duration::from_millis(5_000);

// ── GET /version ──────────────────────────────────────────────────────────────

/// Chaos state is read once on entry; stopping chaos during the delay does not
/// cut the pending response short.
pub async fn version(State(state): State<AppState>) -> Response {
    let chaos = state.chaos.read().await.clone();
    let pool = state.config.pool.clone();
    let release = state.config.release_id.clone();
    let headers = [
        (HEADER_APP_POOL, pool.clone()),
        (HEADER_RELEASE_ID, release.clone()),
    ];

    if chaos.is_failing() {
        warn!(pool = %pool, "Chaos: returning 500");
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            headers,
            Json(json!({ "error": "Service unavailable", "pool": pool })),
        )
            .into_response();
    }

    if chaos.is_delaying() {
        warn!(
            pool = %pool,
            delay_ms = CHAOS_TIMEOUT_DELAY.as_millis() as u64,
            "Chaos: timeout"
        );
        tokio::time::sleep(CHAOS_TIMEOUT_DELAY).await;
        return (StatusCode::OK, headers, Json(VersionInfo::new(pool, release))).into_response();
    }

    (
        StatusCode::OK,
        headers,
        Json(VersionInfo::new(pool, release).stamped()),
    )
        .into_response()
}
