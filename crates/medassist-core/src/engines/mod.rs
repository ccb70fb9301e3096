// Diagnosis engines
//
// The trained classifier, the imaging model, and any external LLM are outside
// this repository; these traits are the seams the HTTP layer calls through.
// The bundled implementations reproduce the simple heuristics the service
// shipped with and are good enough for development and tests.

pub mod chatbot;
pub mod classifier;
pub mod imaging;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;

pub use chatbot::KnowledgeBaseChatbot;
pub use classifier::HeuristicClassifier;
pub use imaging::FilenameHeuristicAnalyzer;

/// One ranked condition from symptom classification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct DiseasePrediction {
    pub disease: String,
    /// Percentage, rounded to one decimal place.
    pub confidence: f64,
    pub description: String,
    #[serde(rename = "matchingSymptoms")]
    pub matching_symptoms: Vec<String>,
}

/// A general-care recommendation returned alongside every diagnosis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct HealthRecommendation {
    #[serde(rename = "type")]
    pub kind: String,
    pub advice: String,
}

/// Output of a symptom classification run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct Diagnosis {
    pub predictions: Vec<DiseasePrediction>,
    pub recommendations: Vec<HealthRecommendation>,
}

/// One ranked finding from image analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct ImageFinding {
    pub condition: String,
    /// Whole-number percentage.
    pub confidence: i32,
    pub description: String,
}

/// Output of an image analysis run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct ImageAnalysis {
    pub predictions: Vec<ImageFinding>,
    pub recommendations: Vec<String>,
    #[serde(rename = "processingTime")]
    pub processing_time_ms: u32,
}

/// Answer from the health chatbot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct ChatAnswer {
    pub answer: String,
    pub confidence: u8,
    pub sources: Vec<String>,
}

/// Ranks likely conditions for a set of reported symptoms.
#[async_trait]
pub trait SymptomClassifier: Send + Sync {
    async fn predict(&self, symptoms: &[String]) -> Result<Diagnosis>;
}

/// Produces ranked findings for an uploaded medical image. The bytes have
/// already been validated as a decodable image by the caller.
#[async_trait]
pub trait ImageAnalyzer: Send + Sync {
    async fn analyze(&self, filename: &str, bytes: &[u8]) -> Result<ImageAnalysis>;
}

/// Answers free-form health questions.
#[async_trait]
pub trait MedicalChatbot: Send + Sync {
    async fn answer(&self, question: &str) -> Result<ChatAnswer>;
}
