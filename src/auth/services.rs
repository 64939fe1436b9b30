use anyhow::Context;
use argon2::{password_hash::SaltString, Argon2, PasswordHash, PasswordHasher, PasswordVerifier};
use axum::http::StatusCode;
use rand::rngs::OsRng;
use sqlx::PgPool;
use thiserror::Error;
use tracing::{info, warn};

use super::dto::Credentials;
use super::repo::{self, User};

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Email already registered")]
    EmailTaken,
    #[error("Invalid credentials")]
    InvalidCredentials,
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl AuthError {
    pub fn status(&self) -> StatusCode {
        match self {
            AuthError::EmailTaken => StatusCode::CONFLICT,
            AuthError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            AuthError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

pub fn hash_password(plain: &str) -> anyhow::Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(plain.as_bytes(), &salt)
        .map(|h| h.to_string())
        .map_err(|e| anyhow::anyhow!("argon2 hash: {e}"))
}

/// `Ok(false)` on a wrong password, `Err` only for an unreadable hash.
pub fn verify_password(plain: &str, hash: &str) -> anyhow::Result<bool> {
    let parsed = PasswordHash::new(hash).map_err(|e| anyhow::anyhow!("argon2 parse: {e}"))?;
    Ok(Argon2::default()
        .verify_password(plain.as_bytes(), &parsed)
        .is_ok())
}

// Runs argon2 on the blocking pool.
async fn blocking<T, F>(f: F) -> anyhow::Result<T>
where
    T: Send + 'static,
    F: FnOnce() -> anyhow::Result<T> + Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .context("password task panicked")?
}

pub async fn register(db: &PgPool, creds: Credentials) -> Result<User, AuthError> {
    let Credentials { email, password } = creds;
    let hash = blocking(move || hash_password(&password)).await?;
    match repo::insert_user(db, &email, &hash).await? {
        Some(user) => {
            info!(user_id = %user.id, "user registered");
            Ok(user)
        }
        None => {
            warn!(%email, "email already registered");
            Err(AuthError::EmailTaken)
        }
    }
}

/// Unknown email and wrong password look the same to the caller.
pub async fn authenticate(db: &PgPool, creds: Credentials) -> Result<User, AuthError> {
    let Some(user) = repo::find_user_by_email(db, &creds.email).await? else {
        warn!(email = %creds.email, "login for unknown email");
        return Err(AuthError::InvalidCredentials);
    };
    let hash = user.password_hash.clone();
    let password = creds.password;
    if !blocking(move || verify_password(&password, &hash)).await? {
        warn!(user_id = %user.id, "login with wrong password");
        return Err(AuthError::InvalidCredentials);
    }
    Ok(user)
}
