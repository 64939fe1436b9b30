use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use tracing::{error, info, instrument};
use uuid::Uuid;

use super::dto::{FeedbackItem, FeedbackQuery, FeedbackRequest, FeedbackResponse};
use super::repo;
use super::services::{generate_feedback, AI_UNAVAILABLE_MSG};
use crate::{
    auth::AuthUser,
    error::{bad_request, internal, not_found, ApiError},
    meals,
    profiles::repo::NutritionProfile,
    state::AppState,
};

pub fn feedback_routes() -> Router<AppState> {
    Router::new()
        .route("/feedback", post(create_feedback).get(list_feedback))
        .route("/feedback/:id", get(get_feedback))
}

#[instrument(skip(state, payload))]
pub async fn create_feedback(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(payload): Json<FeedbackRequest>,
) -> Result<(StatusCode, Json<FeedbackResponse>), ApiError> {
    let meal = payload.meal.parse().map_err(bad_request)?;

    let entry = match payload.diary_entry_id {
        Some(id) => Some(
            meals::repo::find_entry(&state.db, user_id, id)
                .await
                .map_err(internal)?
                .ok_or_else(|| not_found("Diary entry"))?,
        ),
        None => None,
    };
    // An attached entry already knows its meal type.
    let meal_type = payload
        .meal_type
        .clone()
        .or_else(|| entry.as_ref().map(|e| e.meal_type.clone()));

    let profile = NutritionProfile::find(&state.db, user_id)
        .await
        .map_err(internal)?
        .map(|p| p.dietary());

    let generated = generate_feedback(
        state.ai.as_ref(),
        state.rating.as_ref(),
        &meal,
        meal_type.as_deref(),
        profile.as_ref(),
    )
    .await
    .map_err(|e| {
        error!(error = %e, %user_id, "feedback generation failed");
        (StatusCode::BAD_GATEWAY, AI_UNAVAILABLE_MSG.to_string())
    })?;

    info!(
        %user_id,
        meal = meal.name.as_deref().unwrap_or("-"),
        rating = %generated.rating,
        "feedback generated"
    );

    let id = match &entry {
        Some(e) => Some(
            repo::insert_feedback(&state.db, user_id, e.id, &generated.text, generated.rating)
                .await
                .map_err(internal)?,
        ),
        None => None,
    };
    let status = if id.is_some() {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };

    Ok((
        status,
        Json(FeedbackResponse {
            id,
            text: generated.text,
            rating: generated.rating,
        }),
    ))
}

#[instrument(skip(state))]
pub async fn list_feedback(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Query(q): Query<FeedbackQuery>,
) -> Result<Json<Vec<FeedbackItem>>, ApiError> {
    let rows = repo::list_feedback(&state.db, user_id, q.limit.clamp(1, 100), q.offset.max(0))
        .await
        .map_err(internal)?;
    Ok(Json(rows.into_iter().map(FeedbackItem::from).collect()))
}

#[instrument(skip(state))]
pub async fn get_feedback(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<FeedbackItem>, ApiError> {
    repo::find_feedback(&state.db, user_id, id)
        .await
        .map_err(internal)?
        .map(|r| Json(FeedbackItem::from(r)))
        .ok_or_else(|| not_found("Feedback"))
}
