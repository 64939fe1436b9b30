use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::nutrition::MealForm;

#[derive(Debug, Deserialize)]
pub struct PhotoAnalysisRequest {
    /// Raw base64 or a `data:<mime>;base64,` URL.
    pub image_base64: String,
    pub content_type: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct BarcodeAnalysisRequest {
    pub image_base64: String,
}

#[derive(Debug, Serialize)]
pub struct PhotoAnalysisResponse {
    pub is_food_plate: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meal: Option<MealForm>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub photo_id: Uuid,
}

#[derive(Debug, Serialize)]
pub struct BarcodeAnalysisResponse {
    pub is_barcode: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meal: Option<MealForm>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}
