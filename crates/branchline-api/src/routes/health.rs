//! Health check endpoint.

use axum::extract::State;
use axum::{Json, Router, routing::get};
use branchline_narrative::application::session::SessionStatus;
use serde::Serialize;

use crate::state::AppState;

/// Health check response.
#[derive(Serialize)]
pub struct HealthResponse {
    /// Service status. The service is healthy even when the story failed to
    /// load; that condition is reported in `story`.
    pub status: &'static str,
    /// Service version.
    pub version: &'static str,
    /// Lifecycle state of the narrative session.
    pub story: SessionStatus,
}

/// GET /health
async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let story = state.session.lock().await.status();
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        story,
    })
}

/// Returns the health check router.
#[must_use]
pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
