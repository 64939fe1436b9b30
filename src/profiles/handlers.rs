use axum::{extract::State, routing::get, Json, Router};
use tracing::{info, instrument, warn};

use super::{dto::ProfileRequest, repo::NutritionProfile, services::validate};
use crate::{
    auth::AuthUser,
    error::{bad_request, internal, not_found, ApiError},
    state::AppState,
};

pub fn profile_routes() -> Router<AppState> {
    Router::new().route("/profile", get(get_profile).put(put_profile))
}

#[instrument(skip(state))]
pub async fn get_profile(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<NutritionProfile>, ApiError> {
    NutritionProfile::find(&state.db, user_id)
        .await
        .map_err(internal)?
        .map(Json)
        .ok_or_else(|| not_found("Profile"))
}

#[instrument(skip(state, payload))]
pub async fn put_profile(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(payload): Json<ProfileRequest>,
) -> Result<Json<NutritionProfile>, ApiError> {
    let input = validate(&payload).map_err(|e| {
        warn!(error = %e, %user_id, "invalid profile");
        bad_request(e)
    })?;
    let profile = NutritionProfile::upsert(&state.db, user_id, &input)
        .await
        .map_err(internal)?;
    info!(%user_id, complete = profile.is_complete(), "profile saved");
    Ok(Json(profile))
}
