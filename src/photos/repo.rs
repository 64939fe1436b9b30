use anyhow::Context;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

#[derive(Debug, Clone, FromRow)]
pub struct Photo {
    pub id: Uuid,
    pub user_id: Uuid,
    pub s3_key: String,
    pub content_type: String,
}

pub async fn insert_photo(
    db: &PgPool,
    photo_id: Uuid,
    user_id: Uuid,
    s3_key: &str,
    content_type: &str,
) -> anyhow::Result<()> {
    sqlx::query(
        r#"
        INSERT INTO photos (id, user_id, s3_key, content_type)
        VALUES ($1, $2, $3, $4)
        "#,
    )
    .bind(photo_id)
    .bind(user_id)
    .bind(s3_key)
    .bind(content_type)
    .execute(db)
    .await
    .context("insert photo")?;
    Ok(())
}

/// A photo, only if it belongs to `user_id`.
pub async fn find_photo(db: &PgPool, user_id: Uuid, id: Uuid) -> anyhow::Result<Option<Photo>> {
    let row = sqlx::query_as::<_, Photo>(
        r#"
        SELECT id, user_id, s3_key, content_type
          FROM photos
         WHERE id = $1 AND user_id = $2
        "#,
    )
    .bind(id)
    .bind(user_id)
    .fetch_optional(db)
    .await
    .context("find photo")?;
    Ok(row)
}
