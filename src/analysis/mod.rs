//! Meal photo and barcode recognition through the vision model.

pub mod dto;
pub mod handlers;
pub mod prompts;
pub mod services;

use axum::{extract::DefaultBodyLimit, Router};

use crate::state::AppState;

/// Request body cap for the base64 image endpoints.
pub const MAX_BODY_BYTES: usize = 20 * 1024 * 1024;

pub fn router() -> Router<AppState> {
    handlers::analysis_routes().layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
}
