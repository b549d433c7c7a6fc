use axum::{
    extract::{DefaultBodyLimit, Multipart, State},
    routing::post,
    Json, Router,
};
use bytes::Bytes;
use tracing::{info, instrument};

use super::{dto::RecognitionResult, services};
use crate::{error::ApiError, response::DataResponse, state::AppState};

pub const MAX_UPLOAD_BYTES: usize = 20 * 1024 * 1024;

pub fn recognition_routes() -> Router<AppState> {
    Router::new()
        .route("/analyze-food", post(analyze_food))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
}

/// POST /api/analyze-food (multipart, field `file`)
#[instrument(skip(state, mp))]
pub async fn analyze_food(
    State(state): State<AppState>,
    mut mp: Multipart,
) -> Result<Json<DataResponse<RecognitionResult>>, ApiError> {
    let image = read_file_field(&mut mp).await?;
    info!(bytes = image.len(), "analyzing food image");

    let result = services::analyze_image(
        state.recognizer.as_ref(),
        state.config.recognition.fallback,
        image,
    )
    .await?;
    Ok(Json(DataResponse::ok(result)))
}

async fn read_file_field(mp: &mut Multipart) -> Result<Bytes, ApiError> {
    while let Some(field) = mp
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(format!("invalid multipart body: {}", e)))?
    {
        if field.name() == Some("file") {
            return field
                .bytes()
                .await
                .map_err(|e| ApiError::BadRequest(format!("failed to read upload: {}", e)));
        }
    }
    Err(ApiError::BadRequest("file is required".into()))
}
