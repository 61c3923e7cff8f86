//! Liveness, readiness and version handlers.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use super::super::types::StatusState;

/// Answers 200 while the process is serving requests
pub async fn live_handler() -> StatusCode {
    StatusCode::OK
}

/// Answers 200 once startup has completed, 503 before that and during shutdown
pub async fn ready_handler(State(state): State<StatusState>) -> StatusCode {
    if state.is_ready() {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    }
}

pub async fn version_handler(State(state): State<StatusState>) -> Response {
    (StatusCode::OK, Json(state.version.as_ref().clone())).into_response()
}
