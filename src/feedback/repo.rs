use anyhow::Context;
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::nutrition::Rating;

/// Stored feedback joined with the diary entry it belongs to.
#[derive(Debug, Clone, FromRow)]
pub struct FeedbackRow {
    pub id: Uuid,
    pub diary_entry_id: Uuid,
    pub meal_name: Option<String>,
    pub meal_type: String,
    pub text: String,
    pub rating: String,
    pub created_at: OffsetDateTime,
}

pub async fn insert_feedback(
    db: &PgPool,
    user_id: Uuid,
    diary_entry_id: Uuid,
    text: &str,
    rating: Rating,
) -> anyhow::Result<Uuid> {
    let (id,): (Uuid,) = sqlx::query_as(
        r#"
        INSERT INTO feedback (id, user_id, diary_entry_id, text, rating)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING id
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(user_id)
    .bind(diary_entry_id)
    .bind(text)
    .bind(rating.as_str())
    .fetch_one(db)
    .await
    .context("insert feedback")?;
    Ok(id)
}

pub async fn list_feedback(
    db: &PgPool,
    user_id: Uuid,
    limit: i64,
    offset: i64,
) -> anyhow::Result<Vec<FeedbackRow>> {
    let rows = sqlx::query_as::<_, FeedbackRow>(
        r#"
        SELECT f.id, f.diary_entry_id, d.name AS meal_name, d.meal_type,
               f.text, f.rating, f.created_at
          FROM feedback f
          JOIN diary_entries d ON d.id = f.diary_entry_id
         WHERE f.user_id = $1
         ORDER BY f.created_at DESC
         LIMIT $2 OFFSET $3
        "#,
    )
    .bind(user_id)
    .bind(limit)
    .bind(offset)
    .fetch_all(db)
    .await
    .context("list feedback")?;
    Ok(rows)
}

pub async fn find_feedback(
    db: &PgPool,
    user_id: Uuid,
    id: Uuid,
) -> anyhow::Result<Option<FeedbackRow>> {
    let row = sqlx::query_as::<_, FeedbackRow>(
        r#"
        SELECT f.id, f.diary_entry_id, d.name AS meal_name, d.meal_type,
               f.text, f.rating, f.created_at
          FROM feedback f
          JOIN diary_entries d ON d.id = f.diary_entry_id
         WHERE f.id = $1 AND f.user_id = $2
        "#,
    )
    .bind(id)
    .bind(user_id)
    .fetch_optional(db)
    .await
    .context("find feedback")?;
    Ok(row)
}
