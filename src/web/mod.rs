//! # Web API Module
//!
//! HTTP boundary for the roster core, built on Axum.
//!
//! ## Endpoints
//!
//! - `GET /activities` - every activity with its roster
//! - `POST /activities/{activity_name}/signup?email=...`
//! - `DELETE /activities/{activity_name}/unregister?email=...`
//! - `GET /health` - registry totals and notification queue statistics
//!
//! Unknown activities answer 404. Duplicate signups, unregistering a non-member and
//! full activities answer 400.

pub mod handlers;
pub mod response_types;
pub mod routes;
pub mod state;

use axum::Router;

pub use response_types::{ApiError, ApiResult};
pub use state::AppState;

/// Build the application router with all routes and state attached
pub fn create_app(state: AppState) -> Router {
    Router::new()
        .merge(routes::activity_routes())
        .merge(routes::health_routes())
        .with_state(state)
}
