// Shared API error type and response bodies
//
// Every failure leaves the process as `{"error": "..."}` with a status from
// the taxonomy below. Internal errors are logged with their full chain and
// echoed to the caller as a generic message only.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use utoipa::ToSchema;

use medassist_core::CoreError;

/// JSON body for every error response
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
}

/// Request-boundary error taxonomy
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Malformed or missing input -> 400
    #[error("{0}")]
    Validation(String),

    /// Duplicate username/email -> 400
    #[error("{0}")]
    Conflict(String),

    /// Bad credentials or bad current password -> 401. The message never
    /// distinguishes an unknown account from a wrong password.
    #[error("{0}")]
    AuthFailed(&'static str),

    /// Missing, invalid, or expired bearer token -> 401
    #[error("{0}")]
    Unauthenticated(&'static str),

    /// Resolved id has no backing record -> 404
    #[error("{0}")]
    NotFound(&'static str),

    /// Unexpected persistence or dependency failure -> 500
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Validation(msg) => ApiError::Validation(msg),
            CoreError::Conflict(msg) => ApiError::Conflict(msg),
            CoreError::AuthFailed => ApiError::AuthFailed("invalid email or password"),
            CoreError::NotFound => ApiError::NotFound("not found"),
            CoreError::Internal(err) => ApiError::Internal(err),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::Validation(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::Conflict(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::AuthFailed(msg) => (StatusCode::UNAUTHORIZED, msg.to_string()),
            ApiError::Unauthenticated(msg) => (StatusCode::UNAUTHORIZED, msg.to_string()),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.to_string()),
            ApiError::Internal(err) => {
                tracing::error!("internal error: {err:#}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal server error".to_string(),
                )
            }
        };
        (status, Json(ErrorResponse { error: message })).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn conflict_maps_to_bad_request() {
        let response = ApiError::from(CoreError::conflict("username or email already exists"))
            .into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn auth_failure_maps_to_unauthorized() {
        let response = ApiError::from(CoreError::AuthFailed).into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn internal_detail_is_not_echoed() {
        let err = ApiError::Internal(anyhow::anyhow!("connection refused to 10.0.0.7:5432"));
        let body = format!("{err}");
        // Display still carries detail for logs; the HTTP body must not.
        assert!(body.contains("connection refused"));
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
