use serde::{Deserialize, Serialize};
use serde_json::Value;
use time::Date;

use super::{daily::Progress, repo::FoodEntry};

/// Body of create and update. Fields default to empty so a missing field is
/// reported by validation instead of the JSON extractor.
#[derive(Debug, Default, Deserialize)]
pub struct EntryInput {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub quantity: String,
    /// Integer or numeric string.
    #[serde(default)]
    pub calories: Value,
}

#[derive(Debug, Default, Deserialize)]
pub struct DeleteParams {
    #[serde(default)]
    pub confirm: bool,
}

#[derive(Debug, Serialize)]
pub struct DailySummary {
    pub date: Date,
    pub goal: i64,
    pub total: i64,
    pub progress: Progress,
    pub entries: Vec<FoodEntry>,
}
