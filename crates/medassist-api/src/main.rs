// Medassist API server
// Decision: Stores are picked at startup - Postgres when DATABASE_URL is set,
// in-memory otherwise (no-database mode)
// Decision: The default admin account is ensured idempotently on every start

use anyhow::{Context, Result};
use std::sync::Arc;

use axum::http::{header, HeaderValue, Method};
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};
use utoipa_swagger_ui::SwaggerUi;

use medassist_api::auth::jwt::TokenCodec;
use medassist_api::auth::AuthConfig;
use medassist_api::services::{ReportService, UserService};
use medassist_api::{auth, build_router, common, diagnosis, profile, reports, AppState};
use medassist_core::engines::{
    ChatAnswer, Diagnosis, DiseasePrediction, FilenameHeuristicAnalyzer, HealthRecommendation,
    HeuristicClassifier, ImageAnalysis, ImageFinding, KnowledgeBaseChatbot,
};
use medassist_core::memory::{MemoryReportStore, MemoryUserStore};
use medassist_core::{ReportStore, UserStore};
use medassist_storage::Database;

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        auth::routes::signup,
        auth::routes::login,
        auth::routes::me,
        profile::update_profile,
        reports::create_report,
        reports::list_reports,
        diagnosis::predict,
        diagnosis::chat,
        diagnosis::analyze_image,
        diagnosis::health,
    ),
    components(
        schemas(
            auth::routes::SignupRequest,
            auth::routes::LoginRequest,
            auth::routes::AuthResponse,
            auth::routes::PublicUser,
            auth::routes::MeResponse,
            profile::UpdateProfileRequest,
            profile::ProfileResponse,
            diagnosis::PredictRequest,
            diagnosis::ChatRequest,
            diagnosis::HealthResponse,
            common::ErrorResponse,
            Diagnosis,
            DiseasePrediction,
            HealthRecommendation,
            ChatAnswer,
            ImageAnalysis,
            ImageFinding,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "auth", description = "Registration, login, and caller identity"),
        (name = "profile", description = "Profile mutation for the authenticated caller"),
        (name = "reports", description = "Ownership-scoped diagnosis reports"),
        (name = "diagnosis", description = "Symptom prediction, chat, and image analysis"),
        (name = "health", description = "Liveness")
    ),
    info(
        title = "Medassist API",
        version = "0.1.0",
        description = "Authenticated diagnosis API: bearer-token auth, per-user reports, and diagnosis engines",
        license(name = "MIT", url = "https://opensource.org/licenses/MIT")
    )
)]
struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "medassist_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("medassist-api starting...");

    // Pick store backends
    let (user_store, report_store): (Arc<dyn UserStore>, Arc<dyn ReportStore>) =
        match std::env::var("DATABASE_URL") {
            Ok(url) => {
                let db = Arc::new(
                    Database::from_url(&url)
                        .await
                        .context("Failed to connect to database")?,
                );
                tracing::info!("Connected to database");
                (db.clone() as Arc<dyn UserStore>, db as Arc<dyn ReportStore>)
            }
            Err(_) => {
                tracing::warn!(
                    "DATABASE_URL not set; using in-memory stores (state is lost on restart)"
                );
                (
                    Arc::new(MemoryUserStore::new()) as Arc<dyn UserStore>,
                    Arc::new(MemoryReportStore::new()) as Arc<dyn ReportStore>,
                )
            }
        };

    // Load authentication configuration
    let auth_config = AuthConfig::from_env();
    let tokens = Arc::new(TokenCodec::new(
        &auth_config.jwt.secret,
        auth_config.jwt.token_lifetime,
    ));

    let users = Arc::new(UserService::new(user_store));
    let reports = Arc::new(ReportService::new(report_store));

    // Idempotent bootstrap: safe on every start
    users
        .ensure_default_admin(&auth_config.admin)
        .await
        .context("Failed to ensure default admin account")?;

    let state = AppState {
        users,
        reports,
        tokens,
        classifier: Arc::new(HeuristicClassifier::new()),
        analyzer: Arc::new(FilenameHeuristicAnalyzer::new()),
        chatbot: Arc::new(KnowledgeBaseChatbot::new()),
    };

    // Build router with Swagger UI
    let app = build_router(state)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-doc/openapi.json", ApiDoc::openapi()));

    // Load CORS allowed origins from environment (optional)
    // Only needed when the UI is served from a different origin than the API
    // Example: CORS_ALLOWED_ORIGINS="https://app.example.com,https://admin.example.com"
    let cors_origins: Vec<HeaderValue> = std::env::var("CORS_ALLOWED_ORIGINS")
        .ok()
        .filter(|s| !s.is_empty())
        .map(|s| s.split(',').filter_map(|s| s.trim().parse().ok()).collect())
        .unwrap_or_default();

    let app = if cors_origins.is_empty() {
        tracing::info!("CORS not configured (same-origin requests only)");
        app
    } else {
        tracing::info!(origins = ?cors_origins, "CORS origins configured");
        app.layer(
            CorsLayer::new()
                .allow_origin(AllowOrigin::list(cors_origins))
                .allow_methods([Method::GET, Method::POST, Method::PUT, Method::OPTIONS])
                .allow_headers([
                    header::CONTENT_TYPE,
                    header::AUTHORIZATION,
                    header::ACCEPT,
                    header::ORIGIN,
                ])
                .allow_credentials(true),
        )
    };

    // Add tracing
    let app = app.layer(TraceLayer::new_for_http());

    // Start server
    let addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:5000".to_string());
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .context("Failed to bind to address")?;
    tracing::info!("Listening on {}", addr);

    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}
