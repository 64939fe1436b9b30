use axum::{extract::State, http::StatusCode, routing::post, Json, Router};
use bytes::Bytes;
use tracing::{info, instrument, warn};

use super::dto::{
    BarcodeAnalysisRequest, BarcodeAnalysisResponse, PhotoAnalysisRequest, PhotoAnalysisResponse,
};
use super::services::{analyze_barcode, analyze_photo, decode_image, AnalysisError};
use crate::{
    auth::AuthUser,
    error::{bad_request, internal, ApiError},
    photos::services::store_photo,
    state::AppState,
};

pub fn analysis_routes() -> Router<AppState> {
    Router::new()
        .route("/analysis/photo", post(analyze_meal_photo))
        .route("/analysis/barcode", post(analyze_barcode_photo))
}

fn to_api_error(e: AnalysisError) -> ApiError {
    match e {
        AnalysisError::InvalidBase64
        | AnalysisError::EmptyImage
        | AnalysisError::UnsupportedType(_) => bad_request(e),
        AnalysisError::Ai(_) | AnalysisError::InvalidReply(_) => {
            warn!(error = %e, "image analysis failed");
            (
                StatusCode::BAD_GATEWAY,
                "No se pudo analizar la imagen en este momento.".to_string(),
            )
        }
    }
}

#[instrument(skip(state, payload))]
pub async fn analyze_meal_photo(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(payload): Json<PhotoAnalysisRequest>,
) -> Result<Json<PhotoAnalysisResponse>, ApiError> {
    let image = decode_image(&payload.image_base64, payload.content_type.as_deref())
        .map_err(to_api_error)?;

    // Only photos the model could read are kept.
    let verdict = analyze_photo(state.ai.as_ref(), &image)
        .await
        .map_err(to_api_error)?;

    let photo_id = store_photo(
        &state,
        user_id,
        Bytes::from(image.bytes),
        &image.content_type,
    )
    .await
    .map_err(internal)?;
    info!(%user_id, %photo_id, is_food_plate = verdict.matched, "photo analyzed");

    Ok(Json(PhotoAnalysisResponse {
        is_food_plate: verdict.matched,
        meal: verdict.meal,
        message: verdict.message,
        photo_id,
    }))
}

#[instrument(skip(state, payload))]
pub async fn analyze_barcode_photo(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(payload): Json<BarcodeAnalysisRequest>,
) -> Result<Json<BarcodeAnalysisResponse>, ApiError> {
    let image = decode_image(&payload.image_base64, None).map_err(to_api_error)?;
    let verdict = analyze_barcode(state.ai.as_ref(), &image)
        .await
        .map_err(to_api_error)?;
    info!(%user_id, is_barcode = verdict.matched, "barcode analyzed");

    Ok(Json(BarcodeAnalysisResponse {
        is_barcode: verdict.matched,
        meal: verdict.meal,
        message: verdict.message,
    }))
}
