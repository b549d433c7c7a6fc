use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::fields::FreeText;
use crate::nutrition::{NutrientTotals, NutritionField, Quantity};

/// Stored food log entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FoodEntry {
    pub id: Uuid,
    #[serde(with = "time::serde::rfc3339")]
    pub timestamp: OffsetDateTime,
    pub user_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub food_name: Option<FreeText>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<FreeText>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub probability: Option<Quantity>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nutrition: Option<NutritionField>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_data: Option<FreeText>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Body of `POST /api/save-food-entry`. Usually a recognition result the
/// client chose to keep, so it may carry its own `id`/`timestamp`; those are
/// replaced on save.
#[derive(Debug, Default, Deserialize)]
pub struct NewFoodEntry {
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub food_name: Option<FreeText>,
    #[serde(default)]
    pub category: Option<FreeText>,
    #[serde(default)]
    pub probability: Option<Quantity>,
    #[serde(default)]
    pub nutrition: Option<NutritionField>,
    #[serde(default)]
    pub image_data: Option<FreeText>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl NewFoodEntry {
    pub fn into_entry(mut self, id: Uuid, timestamp: OffsetDateTime, user_id: String) -> FoodEntry {
        self.extra.remove("id");
        self.extra.remove("timestamp");
        FoodEntry {
            id,
            timestamp,
            user_id,
            food_name: self.food_name,
            category: self.category,
            probability: self.probability,
            nutrition: self.nutrition,
            image_data: self.image_data,
            extra: self.extra,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct EntriesQuery {
    pub user_id: Option<String>,
    #[serde(default = "default_days")]
    pub days: i64,
}
fn default_days() -> i64 { 7 }

#[derive(Debug, Deserialize)]
pub struct SummaryQuery {
    pub user_id: Option<String>,
    pub date: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct DailySummary {
    pub date: String,
    #[serde(flatten)]
    pub totals: NutrientTotals,
    pub entries_count: usize,
    pub goal_calories: i64,
    pub goal_carbs: i64,
    pub goal_protein: i64,
    pub goal_fat: i64,
}
