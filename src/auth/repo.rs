use anyhow::Context;
use serde::Serialize;
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    /// Argon2 PHC string.
    pub password_hash: String,
    pub created_at: OffsetDateTime,
}

/// What `GET /me` returns. Profile completeness is decided by the query.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Account {
    pub id: Uuid,
    pub email: String,
    pub profile_complete: bool,
}

pub async fn find_user_by_email(db: &PgPool, email: &str) -> anyhow::Result<Option<User>> {
    sqlx::query_as::<_, User>(
        "SELECT id, email, password_hash, created_at FROM users WHERE email = $1",
    )
    .bind(email)
    .fetch_optional(db)
    .await
    .context("find user by email")
}

pub async fn find_user(db: &PgPool, id: Uuid) -> anyhow::Result<Option<User>> {
    sqlx::query_as::<_, User>(
        "SELECT id, email, password_hash, created_at FROM users WHERE id = $1",
    )
    .bind(id)
    .fetch_optional(db)
    .await
    .context("find user")
}

/// `None` when the email is already taken.
pub async fn insert_user(
    db: &PgPool,
    email: &str,
    password_hash: &str,
) -> anyhow::Result<Option<User>> {
    sqlx::query_as::<_, User>(
        r#"
        INSERT INTO users (email, password_hash)
        VALUES ($1, $2)
        ON CONFLICT (email) DO NOTHING
        RETURNING id, email, password_hash, created_at
        "#,
    )
    .bind(email)
    .bind(password_hash)
    .fetch_optional(db)
    .await
    .context("insert user")
}

/// A user with the onboarding flag. Mirrors `NutritionProfile::is_complete`.
pub async fn find_account(db: &PgPool, id: Uuid) -> anyhow::Result<Option<Account>> {
    sqlx::query_as::<_, Account>(
        r#"
        SELECT u.id, u.email,
               COALESCE(p.completed
                        AND p.age IS NOT NULL
                        AND p.sex IS NOT NULL
                        AND p.height_cm IS NOT NULL
                        AND p.weight_kg IS NOT NULL
                        AND p.preference IS NOT NULL
                        AND cardinality(p.goals) > 0, FALSE) AS profile_complete
          FROM users u
          LEFT JOIN nutrition_profiles p ON p.user_id = u.id
         WHERE u.id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(db)
    .await
    .context("find account")
}
