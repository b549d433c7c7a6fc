use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use time::OffsetDateTime;
use uuid::Uuid;

/// Body of the classification endpoint. Only the fields used here are named.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Classification {
    #[serde(default)]
    pub category: Option<CategoryGuess>,
    #[serde(default)]
    pub recipes: Option<Vec<RecipeCandidate>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CategoryGuess {
    pub name: Option<String>,
    pub probability: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecipeCandidate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Classification {
    pub fn first_recipe_id(&self) -> Option<i64> {
        self.recipes.as_deref()?.first().and_then(|r| r.id)
    }
}

/// What `POST /api/analyze-food` returns under `data`.
#[derive(Debug, Clone, Serialize)]
pub struct RecognitionResult {
    pub id: Uuid,
    pub category: String,
    pub probability: f64,
    pub nutrition: Map<String, Value>,
    pub recipes: Vec<RecipeCandidate>,
    pub image_data: String,
    #[serde(with = "time::serde::rfc3339")]
    pub timestamp: OffsetDateTime,
}

impl RecognitionResult {
    pub fn new(
        category: String,
        probability: f64,
        nutrition: Map<String, Value>,
        recipes: Vec<RecipeCandidate>,
        image: &[u8],
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            category,
            probability,
            nutrition,
            recipes,
            image_data: STANDARD.encode(image),
            timestamp: OffsetDateTime::now_utc(),
        }
    }

    pub fn from_classification(
        classification: Classification,
        nutrition: Map<String, Value>,
        image: &[u8],
    ) -> Self {
        let category = classification.category.unwrap_or_default();
        Self::new(
            category.name.unwrap_or_else(|| "Unknown".into()),
            category.probability.unwrap_or(0.0),
            nutrition,
            classification.recipes.unwrap_or_default(),
            image,
        )
    }
}
