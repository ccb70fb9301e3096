// Diagnosis routes: symptom prediction, health chat, image analysis, liveness
//
// The engines behind these handlers are injected trait objects; swapping the
// stand-in heuristics for real inference services never touches this file.

use axum::extract::{Multipart, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use medassist_core::engines::{ChatAnswer, Diagnosis, ImageAnalysis};

use crate::common::{ApiError, ErrorResponse};
use crate::AppState;

#[derive(Debug, Deserialize, ToSchema)]
pub struct PredictRequest {
    #[serde(default)]
    pub symptoms: Vec<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct ChatRequest {
    #[serde(default)]
    pub question: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

/// Create diagnosis routes
pub fn routes(state: AppState) -> Router {
    Router::new()
        .route("/predict", post(predict))
        .route("/chat", post(chat))
        .route("/analyze-image", post(analyze_image))
        .route("/health", get(health))
        .with_state(state)
}

/// POST /predict - Rank likely conditions for reported symptoms
#[utoipa::path(
    post,
    path = "/predict",
    request_body = PredictRequest,
    responses(
        (status = 200, description = "Top predictions with recommendations", body = Diagnosis),
        (status = 400, description = "No symptoms provided", body = ErrorResponse)
    ),
    tag = "diagnosis"
)]
pub async fn predict(
    State(state): State<AppState>,
    Json(req): Json<PredictRequest>,
) -> Result<Json<Diagnosis>, ApiError> {
    let symptoms: Vec<String> = req
        .symptoms
        .into_iter()
        .filter(|s| !s.trim().is_empty())
        .collect();
    if symptoms.is_empty() {
        return Err(ApiError::Validation("no symptoms provided".to_string()));
    }

    Ok(Json(state.classifier.predict(&symptoms).await?))
}

/// POST /chat - Answer a free-form health question
#[utoipa::path(
    post,
    path = "/chat",
    request_body = ChatRequest,
    responses(
        (status = 200, description = "Answer with confidence and sources", body = ChatAnswer),
        (status = 400, description = "No question provided", body = ErrorResponse)
    ),
    tag = "diagnosis"
)]
pub async fn chat(
    State(state): State<AppState>,
    Json(req): Json<ChatRequest>,
) -> Result<Json<ChatAnswer>, ApiError> {
    if req.question.trim().is_empty() {
        return Err(ApiError::Validation("no question provided".to_string()));
    }

    Ok(Json(state.chatbot.answer(&req.question).await?))
}

/// POST /analyze-image - Analyze an uploaded medical image
///
/// Expects a multipart body with an `image` file part.
#[utoipa::path(
    post,
    path = "/analyze-image",
    responses(
        (status = 200, description = "Ranked findings with recommendations", body = ImageAnalysis),
        (status = 400, description = "Missing, empty, or undecodable image", body = ErrorResponse)
    ),
    tag = "diagnosis"
)]
pub async fn analyze_image(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<ImageAnalysis>, ApiError> {
    let mut upload = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|_| ApiError::Validation("malformed multipart body".to_string()))?
    {
        if field.name() == Some("image") {
            let filename = field.file_name().unwrap_or_default().to_string();
            let bytes = field
                .bytes()
                .await
                .map_err(|_| ApiError::Validation("could not read image file".to_string()))?;
            upload = Some((filename, bytes));
            break;
        }
    }

    let Some((filename, bytes)) = upload else {
        return Err(ApiError::Validation("no image file provided".to_string()));
    };
    if filename.is_empty() {
        return Err(ApiError::Validation("no image file selected".to_string()));
    }
    if image::guess_format(&bytes).is_err() {
        return Err(ApiError::Validation("invalid image file".to_string()));
    }

    Ok(Json(state.analyzer.analyze(&filename, &bytes).await?))
}

/// GET /health - Liveness probe
#[utoipa::path(
    get,
    path = "/health",
    responses((status = 200, description = "Service is up", body = HealthResponse)),
    tag = "health"
)]
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}
