// Keyword chatbot
//
// Looks the question up in a fixed medical knowledge base. An external LLM
// could sit behind the same trait; this implementation never leaves process.

use async_trait::async_trait;

use super::{ChatAnswer, MedicalChatbot};
use crate::error::Result;

const MEDICAL_KNOWLEDGE: &[(&str, &str)] = &[
    (
        "fever",
        "Fever is a temporary increase in body temperature, often due to an illness. Common causes include infections, heat exhaustion, certain medications, or inflammatory conditions.",
    ),
    (
        "flu",
        "Influenza prevention includes annual vaccination, frequent handwashing, avoiding close contact with sick people, and maintaining good health habits.",
    ),
    (
        "diabetes",
        "Common diabetes symptoms include increased thirst, frequent urination, extreme fatigue, blurred vision, and unexplained weight loss.",
    ),
    (
        "heart",
        "Maintain heart health through regular exercise, balanced diet, limiting sodium, not smoking, managing stress, and regular check-ups.",
    ),
    (
        "immunity",
        "Immunity-boosting foods include citrus fruits, garlic, ginger, spinach, yogurt, almonds, turmeric, and green tea.",
    ),
    (
        "water",
        "General recommendation is about 8 glasses (64 ounces) of water daily, but needs vary based on activity and climate.",
    ),
];

const FALLBACK_ANSWER: &str = "I understand you're asking about a health-related topic. While I can provide general information, please remember that this is for educational purposes only.";

const DISCLAIMER: &str =
    "\n\nRemember: Always consult healthcare professionals for personalized medical advice.";

const ANSWER_CONFIDENCE: u8 = 85;

/// Keyword-matching chatbot over the fixed knowledge base.
#[derive(Default)]
pub struct KnowledgeBaseChatbot;

impl KnowledgeBaseChatbot {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl MedicalChatbot for KnowledgeBaseChatbot {
    async fn answer(&self, question: &str) -> Result<ChatAnswer> {
        let question = question.to_lowercase();

        let mut answer = FALLBACK_ANSWER.to_string();
        for (keyword, response) in MEDICAL_KNOWLEDGE {
            if question.contains(keyword) {
                answer = response.to_string();
                break;
            }
        }

        // Topic overrides take precedence over knowledge-base hits.
        if question.contains("pain") || question.contains("hurt") {
            answer = "Pain can have many causes. For persistent or severe pain, consult with a healthcare provider for proper evaluation and treatment.".to_string();
        } else if question.contains("diet") || question.contains("nutrition") {
            answer = "A balanced diet includes fruits, vegetables, whole grains, lean proteins, and healthy fats. Limit processed foods and excessive sugar.".to_string();
        } else if question.contains("exercise") || question.contains("workout") {
            answer = "Regular physical activity is crucial for health. Aim for at least 150 minutes of moderate-intensity exercise weekly.".to_string();
        }

        Ok(ChatAnswer {
            answer: answer + DISCLAIMER,
            confidence: ANSWER_CONFIDENCE,
            sources: vec!["Medical Knowledge Base".to_string()],
        })
    }
}
