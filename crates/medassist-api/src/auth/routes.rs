// Auth HTTP routes: signup, login, whoami

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use medassist_core::User;

use crate::auth::extract::AuthUser;
use crate::common::{ApiError, ErrorResponse};
use crate::AppState;

/// Fields are optional so missing input surfaces as a 400 validation error,
/// not a deserialization rejection.
#[derive(Debug, Deserialize, ToSchema)]
pub struct SignupRequest {
    pub username: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

/// Account fields safe to return to callers. The password hash never leaves
/// the service.
#[derive(Debug, Serialize, ToSchema)]
pub struct PublicUser {
    pub id: Uuid,
    pub username: String,
    pub email: String,
}

impl From<&User> for PublicUser {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
            email: user.email.clone(),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AuthResponse {
    pub token: String,
    pub user: PublicUser,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct MeResponse {
    pub user: PublicUser,
}

/// Create auth routes
pub fn routes(state: AppState) -> Router {
    Router::new()
        .route("/auth/signup", post(signup))
        .route("/auth/login", post(login))
        .route("/auth/me", get(me))
        .with_state(state)
}

fn required<'a>(field: &'a Option<String>, name: &str) -> Result<&'a str, ApiError> {
    match field.as_deref().map(str::trim) {
        Some(value) if !value.is_empty() => Ok(value),
        _ => Err(ApiError::Validation(format!("{name} is required"))),
    }
}

/// Passwords are taken verbatim; only absence is a validation failure.
fn required_password(field: &Option<String>) -> Result<&str, ApiError> {
    match field.as_deref() {
        Some(value) if !value.is_empty() => Ok(value),
        _ => Err(ApiError::Validation("password is required".to_string())),
    }
}

/// POST /auth/signup - Register a new account
#[utoipa::path(
    post,
    path = "/auth/signup",
    request_body = SignupRequest,
    responses(
        (status = 201, description = "Account created, token issued", body = AuthResponse),
        (status = 400, description = "Missing fields or duplicate username/email", body = ErrorResponse)
    ),
    tag = "auth"
)]
pub async fn signup(
    State(state): State<AppState>,
    Json(req): Json<SignupRequest>,
) -> Result<(StatusCode, Json<AuthResponse>), ApiError> {
    let username = required(&req.username, "username")?;
    let email = required(&req.email, "email")?;
    let password = required_password(&req.password)?;

    let user = state.users.register(username, email, password).await?;
    let token = state
        .tokens
        .issue(user.id, &user.email, Utc::now())
        .map_err(ApiError::Internal)?;

    tracing::info!(user_id = %user.id, "account registered");
    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            token,
            user: PublicUser::from(&user),
        }),
    ))
}

/// POST /auth/login - Exchange credentials for a token
#[utoipa::path(
    post,
    path = "/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Token issued", body = AuthResponse),
        (status = 400, description = "Missing fields", body = ErrorResponse),
        (status = 401, description = "Invalid credentials", body = ErrorResponse)
    ),
    tag = "auth"
)]
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, ApiError> {
    let email = required(&req.email, "email")?;
    let password = required_password(&req.password)?;

    let user = state.users.authenticate(email, password).await?;
    let token = state
        .tokens
        .issue(user.id, &user.email, Utc::now())
        .map_err(ApiError::Internal)?;

    Ok(Json(AuthResponse {
        token,
        user: PublicUser::from(&user),
    }))
}

/// GET /auth/me - The authenticated caller's account
#[utoipa::path(
    get,
    path = "/auth/me",
    responses(
        (status = 200, description = "Caller's account", body = MeResponse),
        (status = 401, description = "Missing, invalid, or expired token", body = ErrorResponse)
    ),
    security(("bearer" = [])),
    tag = "auth"
)]
pub async fn me(auth: AuthUser) -> Json<MeResponse> {
    Json(MeResponse {
        user: PublicUser::from(&auth.user),
    })
}
