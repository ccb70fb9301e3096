// Medassist API
//
// Route modules, the shared app state, and the router assembly live here so
// both the server binary and in-process tests drive the same application.

pub mod auth;
pub mod common;
pub mod diagnosis;
pub mod profile;
pub mod reports;
pub mod services;

use std::sync::Arc;

use axum::Router;

use medassist_core::engines::{ImageAnalyzer, MedicalChatbot, SymptomClassifier};

use crate::auth::jwt::TokenCodec;
use crate::services::{ReportService, UserService};

/// App state shared across routes
#[derive(Clone)]
pub struct AppState {
    pub users: Arc<UserService>,
    pub reports: Arc<ReportService>,
    pub tokens: Arc<TokenCodec>,
    pub classifier: Arc<dyn SymptomClassifier>,
    pub analyzer: Arc<dyn ImageAnalyzer>,
    pub chatbot: Arc<dyn MedicalChatbot>,
}

/// Assemble the full application router.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .merge(auth::routes::routes(state.clone()))
        .merge(profile::routes(state.clone()))
        .merge(reports::routes(state.clone()))
        .merge(diagnosis::routes(state))
}
