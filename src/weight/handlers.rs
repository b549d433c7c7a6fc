use axum::{
    extract::{Query, State},
    routing::{get, post},
    Json, Router,
};
use tracing::{info, instrument};

use super::dto::{HistoryQuery, NewWeightRecord, WeightRecord};
use super::services;
use crate::{
    error::ApiError,
    response::{DataResponse, SavedResponse},
    state::AppState,
};

pub fn weight_routes() -> Router<AppState> {
    Router::new()
        .route("/save-weight", post(save_weight))
        .route("/weight-history", get(weight_history))
}

#[instrument(skip(state, body))]
pub async fn save_weight(
    State(state): State<AppState>,
    Json(mut body): Json<NewWeightRecord>,
) -> Result<Json<SavedResponse>, ApiError> {
    let user_id = state.config.user_ids.resolve(body.user_id.take())?;
    let id = services::save_weight(&state, user_id, body).await?;
    info!(%id, "weight stored");
    Ok(Json(SavedResponse::ok(id)))
}

#[instrument(skip(state))]
pub async fn weight_history(
    State(state): State<AppState>,
    Query(q): Query<HistoryQuery>,
) -> Result<Json<DataResponse<Vec<WeightRecord>>>, ApiError> {
    let user_id = state.config.user_ids.resolve(q.user_id)?;
    let records = services::weight_history(&state, &user_id, q.days).await?;
    Ok(Json(DataResponse::ok(records)))
}
