//! # Health Check Handlers

use axum::extract::State;
use axum::Json;

use crate::web::response_types::HealthResponse;
use crate::web::state::AppState;

/// Basic health check endpoint: GET /health
///
/// Reports registry totals and notification queue statistics. Status is
/// `degraded` once the dispatcher has stopped.
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let notifications = state.notifications.stats();
    let status = if notifications.is_running {
        "healthy"
    } else {
        "degraded"
    };

    Json(HealthResponse {
        status,
        registry: state.service.registry().stats(),
        notifications,
    })
}
