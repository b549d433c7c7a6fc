use axum::{
    extract::{Query, State},
    routing::{get, post},
    Json, Router,
};
use tracing::{info, instrument};

use super::dto::{ProfileQuery, ProfileUpdate, UpdatedResponse, UserProfile};
use super::services;
use crate::{error::ApiError, response::DataResponse, state::AppState};

pub fn profile_routes() -> Router<AppState> {
    Router::new()
        .route("/user-profile", get(get_profile))
        .route("/update-user-profile", post(update_profile))
}

#[instrument(skip(state))]
pub async fn get_profile(
    State(state): State<AppState>,
    Query(q): Query<ProfileQuery>,
) -> Result<Json<DataResponse<UserProfile>>, ApiError> {
    let user_id = state.config.user_ids.resolve(q.user_id)?;
    let profile = services::get_or_create_profile(&state, &user_id).await?;
    Ok(Json(DataResponse::ok(profile)))
}

#[instrument(skip(state, body))]
pub async fn update_profile(
    State(state): State<AppState>,
    Json(mut body): Json<ProfileUpdate>,
) -> Result<Json<UpdatedResponse>, ApiError> {
    let user_id = state.config.user_ids.resolve(body.user_id.take())?;
    let modified = services::update_profile(&state, user_id.clone(), body).await?;
    info!(%user_id, modified, "profile updated");
    Ok(Json(UpdatedResponse {
        success: true,
        modified,
    }))
}
