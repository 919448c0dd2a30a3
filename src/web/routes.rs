//! Route definitions for the roster HTTP boundary.

use axum::{
    routing::{delete, get, post},
    Router,
};

use crate::web::{handlers, state::AppState};

/// Activity listing and roster mutation routes
pub fn activity_routes() -> Router<AppState> {
    Router::new()
        .route("/activities", get(handlers::activities::list_activities))
        .route(
            "/activities/{activity_name}/signup",
            post(handlers::activities::signup),
        )
        .route(
            "/activities/{activity_name}/unregister",
            delete(handlers::activities::unregister),
        )
}

pub fn health_routes() -> Router<AppState> {
    Router::new().route("/health", get(handlers::health::health_check))
}
