use axum::{
    extract::{Query, State},
    routing::{get, post},
    Json, Router,
};
use tracing::{info, instrument};

use super::dto::{DailySummary, EntriesQuery, FoodEntry, NewFoodEntry, SummaryQuery};
use super::services;
use crate::{
    error::ApiError,
    response::{DataResponse, SavedResponse},
    state::AppState,
};

pub fn food_routes() -> Router<AppState> {
    Router::new()
        .route("/save-food-entry", post(save_food_entry))
        .route("/food-entries", get(list_food_entries))
        .route("/daily-summary", get(daily_summary))
}

#[instrument(skip(state, body))]
pub async fn save_food_entry(
    State(state): State<AppState>,
    Json(mut body): Json<NewFoodEntry>,
) -> Result<Json<SavedResponse>, ApiError> {
    let user_id = state.config.user_ids.resolve(body.user_id.take())?;
    let id = services::save_food_entry(&state, user_id, body).await?;
    info!(%id, "food entry stored");
    Ok(Json(SavedResponse::ok(id)))
}

#[instrument(skip(state))]
pub async fn list_food_entries(
    State(state): State<AppState>,
    Query(q): Query<EntriesQuery>,
) -> Result<Json<DataResponse<Vec<FoodEntry>>>, ApiError> {
    let user_id = state.config.user_ids.resolve(q.user_id)?;
    let entries = services::list_food_entries(&state, &user_id, q.days).await?;
    Ok(Json(DataResponse::ok(entries)))
}

#[instrument(skip(state))]
pub async fn daily_summary(
    State(state): State<AppState>,
    Query(q): Query<SummaryQuery>,
) -> Result<Json<DataResponse<DailySummary>>, ApiError> {
    let user_id = state.config.user_ids.resolve(q.user_id)?;
    let summary = services::daily_summary(&state, &user_id, q.date.as_deref()).await?;
    Ok(Json(DataResponse::ok(summary)))
}
