use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::nutrition::{MealForm, Rating};

#[derive(Debug, Serialize)]
pub struct TemplateResponse {
    pub id: Uuid,
    pub meal: MealForm,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

#[derive(Debug, Deserialize)]
pub struct TemplateQuery {
    #[serde(default = "default_template_limit")]
    pub limit: i64,
}
fn default_template_limit() -> i64 {
    50
}

#[derive(Debug, Deserialize)]
pub struct CreateDiaryEntryRequest {
    pub meal: MealForm,
    pub meal_type: Option<String>,
    pub template_id: Option<Uuid>,
    #[serde(default)]
    pub save_as_template: bool,
    pub photo_id: Option<Uuid>,
}

#[derive(Debug, Serialize)]
pub struct DiaryEntryResponse {
    pub id: Uuid,
    pub meal_type: String,
    pub meal: MealForm,
    pub template_id: Option<Uuid>,
    pub photo_id: Option<Uuid>,
    pub photo_url: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

#[derive(Debug, Deserialize)]
pub struct RecentQuery {
    #[serde(default = "default_recent_limit")]
    pub limit: i64,
    #[serde(default = "default_page")]
    pub page: usize,
    #[serde(default = "default_per_page")]
    pub per_page: usize,
}
fn default_recent_limit() -> i64 {
    10
}
fn default_page() -> usize {
    1
}
fn default_per_page() -> usize {
    5
}

/// Row of the consumption table.
#[derive(Debug, Clone, Serialize)]
pub struct ConsumptionItem {
    pub id: Uuid,
    pub rating: Option<Rating>,
    pub description: String,
    pub meal_type: String,
    pub name: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

#[derive(Debug, Clone, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page: usize,
    pub per_page: usize,
    pub total_pages: usize,
    pub total_items: usize,
}
