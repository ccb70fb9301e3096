// Symptom classifier stand-in
//
// The production model is a trained artifact served elsewhere; this
// implementation ranks conditions by overlap between the reported symptoms and
// each condition's known symptom profile, which mirrors the feature
// binarization the real pipeline feeds the model.

use async_trait::async_trait;

use super::{Diagnosis, DiseasePrediction, HealthRecommendation, SymptomClassifier};
use crate::error::Result;

struct ConditionProfile {
    name: &'static str,
    description: &'static str,
    symptoms: &'static [&'static str],
}

const CONDITION_PROFILES: &[ConditionProfile] = &[
    ConditionProfile {
        name: "Common Cold",
        description: "A viral infection of the upper respiratory tract that is usually harmless and resolves on its own.",
        symptoms: &["runny_nose", "sneezing", "cough", "sore_throat", "fatigue"],
    },
    ConditionProfile {
        name: "Influenza",
        description: "A viral infection that attacks the respiratory system, more severe than a common cold.",
        symptoms: &["fever", "chills", "muscle_aches", "fatigue", "headache", "cough"],
    },
    ConditionProfile {
        name: "Migraine",
        description: "A neurological condition characterized by recurrent, severe headaches.",
        symptoms: &["headache", "nausea", "fatigue"],
    },
    ConditionProfile {
        name: "Gastroenteritis",
        description: "Inflammation of the stomach and intestines, often caused by viral or bacterial infection.",
        symptoms: &["nausea", "vomiting", "diarrhea", "fever"],
    },
    ConditionProfile {
        name: "Pneumonia",
        description: "An infection that inflames air sacs in one or both lungs, which may fill with fluid.",
        symptoms: &["cough", "fever", "chills", "shortness_of_breath", "chest_pain"],
    },
    ConditionProfile {
        name: "Bronchitis",
        description: "Inflammation of the bronchial tubes that carry air to the lungs.",
        symptoms: &["cough", "fatigue", "shortness_of_breath", "chest_pain"],
    },
    ConditionProfile {
        name: "Sinusitis",
        description: "Inflammation of the sinuses, often following a cold or allergic reaction.",
        symptoms: &["headache", "nasal_congestion", "runny_nose", "fatigue"],
    },
    ConditionProfile {
        name: "Allergic Rhinitis",
        description: "An allergic reaction to airborne substances like pollen, dust, or pet dander.",
        symptoms: &["sneezing", "runny_nose", "nasal_congestion"],
    },
];

const HEALTH_RECOMMENDATIONS: &[(&str, &str)] = &[
    (
        "Rest & Recovery",
        "Get adequate sleep (7-9 hours) and avoid strenuous activities to help your body recover.",
    ),
    (
        "Hydration",
        "Drink plenty of fluids, especially water, herbal teas, and clear broths to stay hydrated.",
    ),
    (
        "Nutrition",
        "Eat light, nutritious foods rich in vitamins and minerals to support your immune system.",
    ),
    (
        "Medical Care",
        "Monitor your symptoms and consult a healthcare provider if they worsen or persist.",
    ),
];

const TOP_PREDICTIONS: usize = 3;

/// Lowercase and underscore-join a reported symptom so it can be matched
/// against the profile vocabulary ("sore throat" -> "sore_throat").
fn normalize(symptom: &str) -> String {
    symptom.trim().to_lowercase().replace(' ', "_")
}

/// Overlap-scoring classifier over the known condition profiles.
#[derive(Default)]
pub struct HeuristicClassifier;

impl HeuristicClassifier {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl SymptomClassifier for HeuristicClassifier {
    async fn predict(&self, symptoms: &[String]) -> Result<Diagnosis> {
        let normalized: Vec<String> = symptoms.iter().map(|s| normalize(s)).collect();

        let mut scored: Vec<(f64, Vec<String>, &ConditionProfile)> = CONDITION_PROFILES
            .iter()
            .map(|profile| {
                let mut matching = Vec::new();
                for (raw, norm) in symptoms.iter().zip(&normalized) {
                    if profile.symptoms.iter().any(|known| known.contains(norm.as_str())) {
                        matching.push(raw.clone());
                    }
                }
                let score = matching.len() as f64 / profile.symptoms.len() as f64;
                (score, matching, profile)
            })
            .collect();

        // Stable sort keeps the profile table order on ties.
        scored.sort_by(|a, b| b.0.total_cmp(&a.0));

        let predictions = scored
            .into_iter()
            .take(TOP_PREDICTIONS)
            .map(|(score, matching, profile)| DiseasePrediction {
                disease: profile.name.to_string(),
                confidence: (score * 1000.0).round() / 10.0,
                description: profile.description.to_string(),
                matching_symptoms: matching,
            })
            .collect();

        Ok(Diagnosis {
            predictions,
            recommendations: recommendations(),
        })
    }
}

fn recommendations() -> Vec<HealthRecommendation> {
    HEALTH_RECOMMENDATIONS
        .iter()
        .map(|(kind, advice)| HealthRecommendation {
            kind: kind.to_string(),
            advice: advice.to_string(),
        })
        .collect()
}
