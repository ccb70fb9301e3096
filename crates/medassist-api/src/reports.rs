// Report routes: create and list, scoped to the authenticated owner

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::post;
use axum::{Json, Router};
use serde_json::Value;

use medassist_core::Report;

use crate::auth::extract::AuthUser;
use crate::common::ApiError;
use crate::AppState;

/// Create report routes
pub fn routes(state: AppState) -> Router {
    Router::new()
        .route("/api/reports", post(create_report).get(list_reports))
        .with_state(state)
}

/// POST /api/reports - Save a diagnosis report for the caller
#[utoipa::path(
    post,
    path = "/api/reports",
    responses(
        (status = 201, description = "Report stored with assigned id and user_id"),
        (status = 400, description = "Payload is not a JSON object"),
        (status = 401, description = "Missing, invalid, or expired token")
    ),
    security(("bearer" = [])),
    tag = "reports"
)]
pub async fn create_report(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<Value>,
) -> Result<(StatusCode, Json<Report>), ApiError> {
    let Value::Object(payload) = payload else {
        return Err(ApiError::Validation(
            "report payload must be a JSON object".to_string(),
        ));
    };

    let report = state.reports.create(auth.user_id(), payload).await?;
    Ok((StatusCode::CREATED, Json(report)))
}

/// GET /api/reports - The caller's reports, in creation order
#[utoipa::path(
    get,
    path = "/api/reports",
    responses(
        (status = 200, description = "Ordered array of the caller's reports"),
        (status = 401, description = "Missing, invalid, or expired token")
    ),
    security(("bearer" = [])),
    tag = "reports"
)]
pub async fn list_reports(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<Vec<Report>>, ApiError> {
    Ok(Json(state.reports.list(auth.user_id()).await?))
}
