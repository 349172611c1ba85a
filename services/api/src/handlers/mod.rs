pub mod booking;
pub mod service;
pub mod session;
pub mod user;

use axum::extract::State;
use axum::http::StatusCode;

use crate::state::AppState;

// ── GET / ─────────────────────────────────────────────────────────────────────

pub async fn index() -> &'static str {
    "Car Doctor server is running"
}

// ── GET /readyz ───────────────────────────────────────────────────────────────

/// 200 once the document store answers a ping, 503 otherwise.
pub async fn readyz(State(state): State<AppState>) -> StatusCode {
    match state.db.ping().await {
        Ok(()) => StatusCode::OK,
        Err(e) => {
            tracing::warn!(error = %e, "document store ping failed");
            StatusCode::SERVICE_UNAVAILABLE
        }
    }
}
