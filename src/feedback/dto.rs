use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::nutrition::{MealForm, Rating};

#[derive(Debug, Deserialize)]
pub struct FeedbackRequest {
    pub meal: MealForm,
    pub meal_type: Option<String>,
    pub diary_entry_id: Option<Uuid>,
}

/// `id` is only set when the feedback was attached to a diary entry.
#[derive(Debug, Serialize)]
pub struct FeedbackResponse {
    pub id: Option<Uuid>,
    pub text: String,
    pub rating: Rating,
}

#[derive(Debug, Deserialize)]
pub struct FeedbackQuery {
    #[serde(default = "default_limit")]
    pub limit: i64,
    #[serde(default)]
    pub offset: i64,
}
fn default_limit() -> i64 {
    20
}

#[derive(Debug, Serialize)]
pub struct FeedbackItem {
    pub id: Uuid,
    pub diary_entry_id: Uuid,
    pub meal_name: Option<String>,
    pub meal_type: String,
    pub text: String,
    pub rating: Option<Rating>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}
