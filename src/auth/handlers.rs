use axum::{
    extract::{FromRef, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use tracing::{info, instrument, warn};

use super::dto::{AuthResponse, LoginRequest, PublicUser, RefreshRequest, RegisterRequest};
use super::repo::{self, Account, User};
use super::services::{self, AuthError};
use super::tokens::{AuthUser, JwtKeys, TokenKind};
use crate::{
    error::{bad_request, internal, ApiError},
    state::AppState,
};

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
        .route("/auth/refresh", post(refresh))
}

pub fn me_routes() -> Router<AppState> {
    Router::new().route("/me", get(get_me))
}

fn auth_error(e: AuthError) -> ApiError {
    match e {
        AuthError::Internal(e) => internal(e),
        other => (other.status(), other.to_string()),
    }
}

fn respond(state: &AppState, user: User) -> Result<Json<AuthResponse>, ApiError> {
    let tokens = JwtKeys::from_ref(state)
        .issue_pair(user.id)
        .map_err(internal)?;
    Ok(Json(AuthResponse {
        tokens,
        user: PublicUser {
            id: user.id,
            email: user.email,
        },
    }))
}

#[instrument(skip(state, payload))]
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<AuthResponse>), ApiError> {
    let creds = payload.validate().map_err(|e| {
        warn!(error = %e, "rejected sign-up");
        bad_request(e)
    })?;
    let user = services::register(&state.db, creds)
        .await
        .map_err(auth_error)?;
    Ok((StatusCode::CREATED, respond(&state, user)?))
}

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, ApiError> {
    let creds = payload.validate().map_err(bad_request)?;
    let user = services::authenticate(&state.db, creds)
        .await
        .map_err(auth_error)?;
    info!(user_id = %user.id, "user logged in");
    respond(&state, user)
}

#[instrument(skip(state, payload))]
pub async fn refresh(
    State(state): State<AppState>,
    Json(payload): Json<RefreshRequest>,
) -> Result<Json<AuthResponse>, ApiError> {
    let claims = JwtKeys::from_ref(&state)
        .verify(&payload.refresh_token, TokenKind::Refresh)
        .map_err(|e| (StatusCode::UNAUTHORIZED, e.to_string()))?;
    let user = repo::find_user(&state.db, claims.sub)
        .await
        .map_err(internal)?
        .ok_or((StatusCode::UNAUTHORIZED, "User not found".to_string()))?;
    respond(&state, user)
}

#[instrument(skip(state))]
pub async fn get_me(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<Account>, ApiError> {
    repo::find_account(&state.db, user_id)
        .await
        .map_err(internal)?
        .map(Json)
        .ok_or((StatusCode::UNAUTHORIZED, "User not found".to_string()))
}
