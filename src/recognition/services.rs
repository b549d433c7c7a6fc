use bytes::Bytes;
use serde_json::Map;
use tracing::{debug, warn};

use super::{dto::RecognitionResult, fallback::FallbackPolicy, FoodRecognizer, RecognitionError};

/// Classifies the image, looks up nutrition for the first recipe candidate,
/// then lets `policy` decide what a failed classification turns into.
pub async fn analyze_image(
    recognizer: &dyn FoodRecognizer,
    policy: FallbackPolicy,
    image: Bytes,
) -> Result<RecognitionResult, RecognitionError> {
    let outcome = recognize(recognizer, &image).await;
    policy.apply(outcome, &image)
}

async fn recognize(
    recognizer: &dyn FoodRecognizer,
    image: &Bytes,
) -> Result<RecognitionResult, RecognitionError> {
    let classification = recognizer.classify(image.clone()).await?;

    let nutrition = match classification.first_recipe_id() {
        Some(recipe_id) => match recognizer.recipe_nutrition(recipe_id).await {
            Ok(n) => n,
            Err(e) => {
                warn!(error = %e, recipe_id, "nutrition lookup failed, using empty nutrition");
                Map::new()
            }
        },
        None => Map::new(),
    };

    debug!(
        recipes = classification.recipes.as_ref().map_or(0, Vec::len),
        has_nutrition = !nutrition.is_empty(),
        "image classified"
    );
    Ok(RecognitionResult::from_classification(classification, nutrition, image))
}
