use serde::Serialize;
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::nutrition::MealNutrients;

/// Shared meal template; not owned by any user.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct MealTemplate {
    pub id: Uuid,
    pub name: Option<String>,
    pub quantity_g: Option<f64>,
    pub energy_kcal: Option<f64>,
    pub carb_g: Option<f64>,
    pub protein_g: Option<f64>,
    pub fiber_g: Option<f64>,
    pub fat_g: Option<f64>,
    pub created_at: OffsetDateTime,
}

/// One meal in a user's diary.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct DiaryEntry {
    pub id: Uuid,
    pub user_id: Uuid,
    pub template_id: Option<Uuid>,
    pub photo_id: Option<Uuid>,
    pub meal_type: String,
    pub name: Option<String>,
    pub quantity_g: Option<f64>,
    pub energy_kcal: Option<f64>,
    pub carb_g: Option<f64>,
    pub protein_g: Option<f64>,
    pub fiber_g: Option<f64>,
    pub fat_g: Option<f64>,
    pub created_at: OffsetDateTime,
}

/// Diary entry joined with the rating of its latest feedback.
#[derive(Debug, Clone, FromRow)]
pub struct RecentEntryRow {
    pub id: Uuid,
    pub meal_type: String,
    pub name: Option<String>,
    pub rating: Option<String>,
    pub created_at: OffsetDateTime,
}

impl MealTemplate {
    pub fn nutrients(&self) -> MealNutrients {
        MealNutrients {
            name: self.name.clone(),
            quantity_g: self.quantity_g,
            energy_kcal: self.energy_kcal,
            carb_g: self.carb_g,
            protein_g: self.protein_g,
            fiber_g: self.fiber_g,
            fat_g: self.fat_g,
        }
    }
}

impl DiaryEntry {
    pub fn nutrients(&self) -> MealNutrients {
        MealNutrients {
            name: self.name.clone(),
            quantity_g: self.quantity_g,
            energy_kcal: self.energy_kcal,
            carb_g: self.carb_g,
            protein_g: self.protein_g,
            fiber_g: self.fiber_g,
            fat_g: self.fat_g,
        }
    }
}
