//! # Web API Error Types
//!
//! Error types for the HTTP boundary and their response conversions. Roster
//! outcomes are translated to status codes here and nowhere else.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use serde_json::json;
use thiserror::Error;

use crate::error::RosterError;
use crate::notifier::NotificationStats;
use crate::registry::RegistryStats;

/// Web API specific errors with HTTP status code mappings
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{message}")]
    NotFound { message: String },

    #[error("Invalid request: {message}")]
    BadRequest {
        code: &'static str,
        message: String,
    },
}

impl ApiError {
    /// Create a BadRequest error with a custom message
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest {
            code: "BAD_REQUEST",
            message: message.into(),
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::NotFound { .. } => StatusCode::NOT_FOUND,
            ApiError::BadRequest { .. } => StatusCode::BAD_REQUEST,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status_code = self.status_code();
        let (error_code, message) = match &self {
            ApiError::NotFound { message } => ("NOT_FOUND", message.as_str()),
            ApiError::BadRequest { code, message } => (*code, message.as_str()),
        };

        let error_response = json!({
            "error": {
                "code": error_code,
                "message": message
            }
        });

        (status_code, Json(error_response)).into_response()
    }
}

/// NotFound is a 404; every other rejected mutation is a 400
impl From<RosterError> for ApiError {
    fn from(err: RosterError) -> Self {
        let message = err.public_message().to_string();
        match err {
            RosterError::NotFound { .. } => ApiError::NotFound { message },
            other => ApiError::BadRequest {
                code: other.code(),
                message,
            },
        }
    }
}

/// Result type alias for web API operations
pub type ApiResult<T> = Result<T, ApiError>;

/// Body returned by signup and unregister
#[derive(Debug, Clone, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

/// Body returned by `GET /health`
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub registry: RegistryStats,
    pub notifications: NotificationStats,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roster_error_status_mapping() {
        let not_found: ApiError = RosterError::not_found("Nope").into();
        assert_eq!(not_found.status_code(), StatusCode::NOT_FOUND);

        let cases = [
            RosterError::AlreadyEnrolled {
                activity: "a".to_string(),
                email: "e".to_string(),
            },
            RosterError::NotEnrolled {
                activity: "a".to_string(),
                email: "e".to_string(),
            },
            RosterError::CapacityExceeded {
                activity: "a".to_string(),
                max_participants: 1,
            },
        ];
        for err in cases {
            let code = err.code();
            let api: ApiError = err.into();
            assert_eq!(api.status_code(), StatusCode::BAD_REQUEST);
            assert!(matches!(api, ApiError::BadRequest { code: c, .. } if c == code));
        }
    }
}
