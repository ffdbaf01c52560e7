use serde::{Deserialize, Serialize};

#[derive(Debug, Default, Deserialize)]
pub struct EstimateRequest {
    #[serde(default)]
    pub food: String,
    #[serde(default)]
    pub quantity: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    High,
    Medium,
    Low,
}

/// What the client gets back. Never stored; it only pre-fills the add form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalorieEstimate {
    pub food: String,
    /// Always equal to `portion_suggestion`.
    pub quantity: String,
    pub estimated_calories: i64,
    pub confidence: Confidence,
    pub portion_suggestion: String,
}
