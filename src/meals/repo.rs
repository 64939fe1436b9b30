use anyhow::Context;
use sqlx::{PgExecutor, PgPool};
use uuid::Uuid;

use super::repo_types::{DiaryEntry, MealTemplate, RecentEntryRow};
use crate::nutrition::{MealNutrients, MealType};

pub async fn insert_template<'e, E: PgExecutor<'e>>(
    db: E,
    meal: &MealNutrients,
) -> anyhow::Result<MealTemplate> {
    let row = sqlx::query_as::<_, MealTemplate>(
        r#"
        INSERT INTO meal_templates
            (id, name, quantity_g, energy_kcal, carb_g, protein_g, fiber_g, fat_g)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
        RETURNING id, name, quantity_g, energy_kcal, carb_g, protein_g, fiber_g, fat_g, created_at
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(&meal.name)
    .bind(meal.quantity_g)
    .bind(meal.energy_kcal)
    .bind(meal.carb_g)
    .bind(meal.protein_g)
    .bind(meal.fiber_g)
    .bind(meal.fat_g)
    .fetch_one(db)
    .await
    .context("insert meal template")?;
    Ok(row)
}

pub async fn list_templates(db: &PgPool, limit: i64) -> anyhow::Result<Vec<MealTemplate>> {
    let rows = sqlx::query_as::<_, MealTemplate>(
        r#"
        SELECT id, name, quantity_g, energy_kcal, carb_g, protein_g, fiber_g, fat_g, created_at
          FROM meal_templates
         ORDER BY created_at DESC
         LIMIT $1
        "#,
    )
    .bind(limit)
    .fetch_all(db)
    .await
    .context("list meal templates")?;
    Ok(rows)
}

pub async fn template_exists(db: &PgPool, id: Uuid) -> anyhow::Result<bool> {
    let found: Option<(Uuid,)> = sqlx::query_as("SELECT id FROM meal_templates WHERE id = $1")
        .bind(id)
        .fetch_optional(db)
        .await
        .context("find meal template")?;
    Ok(found.is_some())
}

pub struct NewDiaryEntry<'a> {
    pub user_id: Uuid,
    pub meal: &'a MealNutrients,
    pub meal_type: MealType,
    pub template_id: Option<Uuid>,
    pub photo_id: Option<Uuid>,
}

pub async fn insert_entry<'e, E: PgExecutor<'e>>(
    db: E,
    entry: NewDiaryEntry<'_>,
) -> anyhow::Result<DiaryEntry> {
    let row = sqlx::query_as::<_, DiaryEntry>(
        r#"
        INSERT INTO diary_entries
            (id, user_id, template_id, photo_id, meal_type, name,
             quantity_g, energy_kcal, carb_g, protein_g, fiber_g, fat_g)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
        RETURNING id, user_id, template_id, photo_id, meal_type, name,
                  quantity_g, energy_kcal, carb_g, protein_g, fiber_g, fat_g, created_at
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(entry.user_id)
    .bind(entry.template_id)
    .bind(entry.photo_id)
    .bind(entry.meal_type.as_str())
    .bind(&entry.meal.name)
    .bind(entry.meal.quantity_g)
    .bind(entry.meal.energy_kcal)
    .bind(entry.meal.carb_g)
    .bind(entry.meal.protein_g)
    .bind(entry.meal.fiber_g)
    .bind(entry.meal.fat_g)
    .fetch_one(db)
    .await
    .context("insert diary entry")?;
    Ok(row)
}

pub async fn find_entry(
    db: &PgPool,
    user_id: Uuid,
    id: Uuid,
) -> anyhow::Result<Option<DiaryEntry>> {
    let row = sqlx::query_as::<_, DiaryEntry>(
        r#"
        SELECT id, user_id, template_id, photo_id, meal_type, name,
               quantity_g, energy_kcal, carb_g, protein_g, fiber_g, fat_g, created_at
          FROM diary_entries
         WHERE id = $1 AND user_id = $2
        "#,
    )
    .bind(id)
    .bind(user_id)
    .fetch_optional(db)
    .await
    .context("find diary entry")?;
    Ok(row)
}

/// Latest entries of a user, newest first, each with its latest rating.
pub async fn recent_entries(
    db: &PgPool,
    user_id: Uuid,
    limit: i64,
) -> anyhow::Result<Vec<RecentEntryRow>> {
    let rows = sqlx::query_as::<_, RecentEntryRow>(
        r#"
        SELECT d.id, d.meal_type, d.name, f.rating, d.created_at
          FROM diary_entries d
          LEFT JOIN LATERAL (
                SELECT rating
                  FROM feedback
                 WHERE diary_entry_id = d.id
                 ORDER BY created_at DESC
                 LIMIT 1
          ) f ON TRUE
         WHERE d.user_id = $1
         ORDER BY d.created_at DESC
         LIMIT $2
        "#,
    )
    .bind(user_id)
    .bind(limit)
    .fetch_all(db)
    .await
    .context("list recent diary entries")?;
    Ok(rows)
}
