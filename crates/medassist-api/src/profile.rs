// Profile route: rename and password rotation for the authenticated caller

use axum::extract::State;
use axum::routing::put;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use medassist_core::CoreError;

use crate::auth::extract::AuthUser;
use crate::common::{ApiError, ErrorResponse};
use crate::services::ProfileChanges;
use crate::AppState;

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileRequest {
    pub name: Option<String>,
    pub old_password: Option<String>,
    pub new_password: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ProfileResponse {
    pub name: String,
    pub email: String,
}

/// Create profile routes
pub fn routes(state: AppState) -> Router {
    Router::new()
        .route("/api/user/profile", put(update_profile))
        .with_state(state)
}

/// PUT /api/user/profile - Mutate the caller's own profile
#[utoipa::path(
    put,
    path = "/api/user/profile",
    request_body = UpdateProfileRequest,
    responses(
        (status = 200, description = "Profile updated", body = ProfileResponse),
        (status = 400, description = "Invalid input", body = ErrorResponse),
        (status = 401, description = "Unauthenticated or current password incorrect", body = ErrorResponse),
        (status = 404, description = "Account no longer exists", body = ErrorResponse)
    ),
    security(("bearer" = [])),
    tag = "profile"
)]
pub async fn update_profile(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<UpdateProfileRequest>,
) -> Result<Json<ProfileResponse>, ApiError> {
    let changes = ProfileChanges {
        name: req.name,
        old_password: req.old_password,
        new_password: req.new_password,
    };

    let user = state
        .users
        .update_profile(auth.user_id(), changes)
        .await
        .map_err(|err| match err {
            // Distinct message from login: this is a verified caller whose
            // current-password proof failed.
            CoreError::AuthFailed => ApiError::AuthFailed("current password incorrect"),
            CoreError::NotFound => ApiError::NotFound("user not found"),
            other => other.into(),
        })?;

    Ok(Json(ProfileResponse {
        name: user.username,
        email: user.email,
    }))
}
