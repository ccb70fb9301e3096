// Auth gate
//
// Modeled as an explicit request interceptor: any handler that takes an
// `AuthUser` argument never runs without a validated bearer token AND a live
// account behind it. A token that outlives its account is rejected as
// invalid, not trusted on its embedded claims.

use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use chrono::Utc;
use uuid::Uuid;

use medassist_core::User;

use crate::auth::jwt::TokenError;
use crate::common::ApiError;
use crate::AppState;

const NO_TOKEN: &str = "No token provided";
const INVALID_TOKEN: &str = "Invalid or expired token";

/// Caller identity resolved by the auth gate, available to handlers.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user: User,
}

impl AuthUser {
    pub fn user_id(&self) -> Uuid {
        self.user.id
    }
}

/// Pull the bearer credential out of the Authorization header. Absent header
/// and malformed scheme are both rejections; no handler logic runs after
/// either.
fn bearer_token(parts: &Parts) -> Result<&str, ApiError> {
    let header = parts
        .headers
        .get(AUTHORIZATION)
        .ok_or(ApiError::Unauthenticated(NO_TOKEN))?;
    let value = header
        .to_str()
        .map_err(|_| ApiError::Unauthenticated(INVALID_TOKEN))?;
    value
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .ok_or(ApiError::Unauthenticated(INVALID_TOKEN))
}

#[async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts)?;

        let claims = state
            .tokens
            .validate(token, Utc::now())
            .map_err(|err| match err {
                TokenError::Expired => ApiError::Unauthenticated(INVALID_TOKEN),
                TokenError::SignatureInvalid | TokenError::Malformed => {
                    ApiError::Unauthenticated(INVALID_TOKEN)
                }
            })?;

        // Fresh existence check on every authenticated request.
        let user = state
            .users
            .get(claims.sub)
            .await?
            .ok_or(ApiError::Unauthenticated(INVALID_TOKEN))?;

        Ok(AuthUser { user })
    }
}
