//! # Activity Handlers
//!
//! Thin adapters from HTTP requests to [`RegistrationService`] calls.
//!
//! [`RegistrationService`]: crate::services::RegistrationService

use axum::extract::{Path, Query, State};
use axum::Json;
use indexmap::IndexMap;
use serde::Deserialize;

use crate::models::Activity;
use crate::web::response_types::{ApiError, ApiResult, MessageResponse};
use crate::web::state::AppState;

/// `?email=` query; a missing parameter is rejected the same way as a blank one
#[derive(Debug, Deserialize)]
pub struct EmailQuery {
    pub email: Option<String>,
}

impl EmailQuery {
    fn validated(&self) -> ApiResult<&str> {
        let email = self.email.as_deref().map(str::trim).unwrap_or_default();
        if email.is_empty() {
            return Err(ApiError::bad_request("Email is required"));
        }
        Ok(email)
    }
}

/// List activities: GET /activities
pub async fn list_activities(State(state): State<AppState>) -> Json<IndexMap<String, Activity>> {
    Json(state.service.list_activities())
}

/// Sign up: POST /activities/{activity_name}/signup?email=...
pub async fn signup(
    State(state): State<AppState>,
    Path(activity_name): Path<String>,
    Query(query): Query<EmailQuery>,
) -> ApiResult<Json<MessageResponse>> {
    let outcome = state.service.signup(&activity_name, query.validated()?)?;
    Ok(Json(MessageResponse {
        message: outcome.message,
    }))
}

/// Unregister: DELETE /activities/{activity_name}/unregister?email=...
pub async fn unregister(
    State(state): State<AppState>,
    Path(activity_name): Path<String>,
    Query(query): Query<EmailQuery>,
) -> ApiResult<Json<MessageResponse>> {
    let outcome = state
        .service
        .unregister(&activity_name, query.validated()?)?;
    Ok(Json(MessageResponse {
        message: outcome.message,
    }))
}
