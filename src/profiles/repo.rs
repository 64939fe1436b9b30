use serde::Serialize;
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

use super::services::ProfileInput;

/// Row of `nutrition_profiles`, one per user.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct NutritionProfile {
    pub user_id: Uuid,
    pub age: Option<i32>,
    pub sex: Option<String>,
    pub height_cm: Option<i32>,
    pub weight_kg: Option<i32>,
    pub exercises: bool,
    pub preference: Option<String>,
    pub goals: Vec<String>,
    pub restrictions: Vec<String>,
    pub completed: bool,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl NutritionProfile {
    pub async fn find(db: &PgPool, user_id: Uuid) -> anyhow::Result<Option<NutritionProfile>> {
        let row = sqlx::query_as::<_, NutritionProfile>(
            r#"
            SELECT user_id, age, sex, height_cm, weight_kg, exercises, preference,
                   goals, restrictions, completed, updated_at
              FROM nutrition_profiles
             WHERE user_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_optional(db)
        .await?;
        Ok(row)
    }

    pub async fn upsert(
        db: &PgPool,
        user_id: Uuid,
        input: &ProfileInput,
    ) -> anyhow::Result<NutritionProfile> {
        let row = sqlx::query_as::<_, NutritionProfile>(
            r#"
            INSERT INTO nutrition_profiles
                (user_id, age, sex, height_cm, weight_kg, exercises, preference,
                 goals, restrictions, completed, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, now())
            ON CONFLICT (user_id) DO UPDATE SET
                age = EXCLUDED.age,
                sex = EXCLUDED.sex,
                height_cm = EXCLUDED.height_cm,
                weight_kg = EXCLUDED.weight_kg,
                exercises = EXCLUDED.exercises,
                preference = EXCLUDED.preference,
                goals = EXCLUDED.goals,
                restrictions = EXCLUDED.restrictions,
                completed = EXCLUDED.completed,
                updated_at = now()
            RETURNING user_id, age, sex, height_cm, weight_kg, exercises, preference,
                      goals, restrictions, completed, updated_at
            "#,
        )
        .bind(user_id)
        .bind(input.age)
        .bind(&input.sex)
        .bind(input.height_cm)
        .bind(input.weight_kg)
        .bind(input.exercises)
        .bind(&input.preference)
        .bind(&input.goals)
        .bind(&input.restrictions)
        .bind(input.completed)
        .fetch_one(db)
        .await?;
        Ok(row)
    }
}
