use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    routing::{get, post},
    Json, Router,
};
use tracing::{info, instrument, warn};
use uuid::Uuid;

use super::dto::{
    ConsumptionItem, CreateDiaryEntryRequest, DiaryEntryResponse, Page, RecentQuery,
    TemplateQuery, TemplateResponse,
};
use super::repo;
use super::repo_types::{DiaryEntry, MealTemplate};
use super::services::{create_diary_entry, paginate, DiaryRequest};
use crate::{
    auth::AuthUser,
    error::{bad_request, internal, not_found, ApiError},
    nutrition::{MealForm, MealType},
    photos::{self, services::presign_photo},
    state::AppState,
};

pub fn read_routes() -> Router<AppState> {
    Router::new()
        .route("/meals/templates", get(list_templates))
        .route("/diary/recent", get(recent_consumption))
        .route("/diary/:id", get(get_entry))
}

pub fn write_routes() -> Router<AppState> {
    Router::new()
        .route("/meals/templates", post(create_template))
        .route("/diary", post(create_entry))
}

fn template_response(t: &MealTemplate) -> TemplateResponse {
    TemplateResponse {
        id: t.id,
        meal: MealForm::from(&t.nutrients()),
        created_at: t.created_at,
    }
}

fn entry_response(e: &DiaryEntry, photo_url: Option<String>) -> DiaryEntryResponse {
    DiaryEntryResponse {
        id: e.id,
        meal_type: e.meal_type.clone(),
        meal: MealForm::from(&e.nutrients()),
        template_id: e.template_id,
        photo_id: e.photo_id,
        photo_url,
        created_at: e.created_at,
    }
}

fn location(path: String) -> HeaderMap {
    let mut headers = HeaderMap::new();
    if let Ok(v) = path.parse() {
        headers.insert(axum::http::header::LOCATION, v);
    }
    headers
}

#[instrument(skip(state))]
pub async fn list_templates(
    State(state): State<AppState>,
    AuthUser(_user_id): AuthUser,
    Query(q): Query<TemplateQuery>,
) -> Result<Json<Vec<TemplateResponse>>, ApiError> {
    let rows = repo::list_templates(&state.db, q.limit.clamp(1, 200))
        .await
        .map_err(internal)?;
    Ok(Json(rows.iter().map(template_response).collect()))
}

#[instrument(skip(state, form))]
pub async fn create_template(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(form): Json<MealForm>,
) -> Result<(StatusCode, Json<TemplateResponse>), ApiError> {
    let meal = form.parse().map_err(bad_request)?;
    if meal.name.is_none() {
        return Err(bad_request("meal name is required"));
    }
    let template = repo::insert_template(&state.db, &meal)
        .await
        .map_err(internal)?;
    info!(%user_id, template_id = %template.id, "meal template created");
    Ok((StatusCode::CREATED, Json(template_response(&template))))
}

#[instrument(skip(state, payload))]
pub async fn create_entry(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(payload): Json<CreateDiaryEntryRequest>,
) -> Result<(StatusCode, HeaderMap, Json<DiaryEntryResponse>), ApiError> {
    let meal_type = payload
        .meal_type
        .as_deref()
        .and_then(MealType::parse)
        .ok_or_else(|| {
            bad_request("meal_type must be one of Desayuno, Almuerzo, Cena, Snack, Otro")
        })?;
    let meal = payload.meal.parse().map_err(bad_request)?;
    if meal.name.is_none() {
        return Err(bad_request("meal name is required"));
    }

    if let Some(template_id) = payload.template_id {
        if !repo::template_exists(&state.db, template_id)
            .await
            .map_err(internal)?
        {
            return Err(not_found("Template"));
        }
    }

    let photo = match payload.photo_id {
        Some(photo_id) => Some(
            photos::repo::find_photo(&state.db, user_id, photo_id)
                .await
                .map_err(internal)?
                .ok_or_else(|| not_found("Photo"))?,
        ),
        None => None,
    };

    let entry = create_diary_entry(
        &state,
        user_id,
        DiaryRequest {
            meal,
            meal_type,
            template_id: payload.template_id,
            save_as_template: payload.save_as_template,
            photo_id: photo.as_ref().map(|p| p.id),
        },
    )
    .await
    .map_err(internal)?;

    let photo_url = match &photo {
        Some(p) => presign_photo(&state, &p.s3_key).await.ok(),
        None => None,
    };

    info!(%user_id, entry_id = %entry.id, meal_type = %entry.meal_type, "diary entry created");
    Ok((
        StatusCode::CREATED,
        location(format!("/api/v1/diary/{}", entry.id)),
        Json(entry_response(&entry, photo_url)),
    ))
}

#[instrument(skip(state))]
pub async fn get_entry(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<DiaryEntryResponse>, ApiError> {
    let entry = repo::find_entry(&state.db, user_id, id)
        .await
        .map_err(internal)?
        .ok_or_else(|| not_found("Diary entry"))?;

    let mut photo_url = None;
    if let Some(photo_id) = entry.photo_id {
        if let Some(photo) = photos::repo::find_photo(&state.db, user_id, photo_id)
            .await
            .map_err(internal)?
        {
            photo_url = match presign_photo(&state, &photo.s3_key).await {
                Ok(url) => Some(url),
                Err(e) => {
                    warn!(error = %e, %photo_id, "presign failed");
                    None
                }
            };
        }
    }

    Ok(Json(entry_response(&entry, photo_url)))
}

#[instrument(skip(state))]
pub async fn recent_consumption(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Query(q): Query<RecentQuery>,
) -> Result<Json<Page<ConsumptionItem>>, ApiError> {
    let rows = repo::recent_entries(&state.db, user_id, q.limit.clamp(1, 100))
        .await
        .map_err(internal)?;
    let items: Vec<ConsumptionItem> = rows.into_iter().map(ConsumptionItem::from).collect();
    Ok(Json(paginate(&items, q.page, q.per_page)))
}
