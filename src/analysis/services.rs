use base64ct::{Base64, Encoding};
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;
use tracing::debug;

use super::prompts::{BARCODE_PROMPT, PHOTO_PROMPT, VISION_SYSTEM_PROMPT};
use crate::ai::{AiError, CompletionRequest, ImageInput, NutritionAi};
use crate::nutrition::nutrients::filter_numeric;
use crate::nutrition::MealForm;
use crate::storage::ext_from_mime;

pub const DEFAULT_CONTENT_TYPE: &str = "image/jpeg";

#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("image is not valid base64")]
    InvalidBase64,
    #[error("image is empty")]
    EmptyImage,
    #[error("unsupported image type `{0}`")]
    UnsupportedType(String),
    #[error(transparent)]
    Ai(#[from] AiError),
    #[error("model reply is not the expected JSON: {0}")]
    InvalidReply(#[from] serde_json::Error),
}

/// Uploaded image, normalized: whitespace-free base64 plus the decoded bytes.
#[derive(Debug, Clone)]
pub struct DecodedImage {
    pub base64: String,
    pub bytes: Vec<u8>,
    pub content_type: String,
}

impl DecodedImage {
    pub fn as_input(&self) -> ImageInput<'_> {
        ImageInput {
            base64: &self.base64,
            content_type: &self.content_type,
        }
    }
}

/// Accepts plain base64 or a `data:<mime>;base64,<payload>` URL. An explicit
/// content type wins over the one in the URL.
pub fn decode_image(raw: &str, content_type: Option<&str>) -> Result<DecodedImage, AnalysisError> {
    let raw = raw.trim();
    let (url_type, payload) = match raw.strip_prefix("data:").and_then(|r| r.split_once(',')) {
        Some((meta, payload)) => (meta.strip_suffix(";base64"), payload),
        None => (None, raw),
    };
    let content_type = content_type
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .or(url_type)
        .unwrap_or(DEFAULT_CONTENT_TYPE)
        .to_ascii_lowercase();
    if ext_from_mime(&content_type).is_none() {
        return Err(AnalysisError::UnsupportedType(content_type));
    }

    let base64: String = payload.chars().filter(|c| !c.is_whitespace()).collect();
    if base64.is_empty() {
        return Err(AnalysisError::EmptyImage);
    }
    let bytes = Base64::decode_vec(&base64).map_err(|_| AnalysisError::InvalidBase64)?;
    if bytes.is_empty() {
        return Err(AnalysisError::EmptyImage);
    }
    Ok(DecodedImage {
        base64,
        bytes,
        content_type,
    })
}

/// The `{...}` object inside a reply, ignoring markdown fences and any prose
/// around it. Without braces the trimmed reply is returned as is.
pub fn json_object(text: &str) -> &str {
    match (text.find('{'), text.rfind('}')) {
        (Some(start), Some(end)) if start < end => &text[start..=end],
        _ => text.trim(),
    }
}

/// Nutrient block as the model writes it; values may be numbers or strings.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ModelMeal {
    nombre: Option<String>,
    cantidad: Option<Value>,
    energia: Option<Value>,
    carbohidratos: Option<Value>,
    proteinas: Option<Value>,
    fibra: Option<Value>,
    grasa: Option<Value>,
}

fn amount_text(v: &Option<Value>) -> String {
    match v {
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::String(s)) => filter_numeric(s),
        _ => String::new(),
    }
}

impl From<ModelMeal> for MealForm {
    fn from(m: ModelMeal) -> Self {
        Self {
            name: m.nombre.unwrap_or_default().trim().to_string(),
            quantity: amount_text(&m.cantidad),
            energy: amount_text(&m.energia),
            carb: amount_text(&m.carbohidratos),
            protein: amount_text(&m.proteinas),
            fiber: amount_text(&m.fibra),
            fat: amount_text(&m.grasa),
        }
    }
}

#[derive(Debug, Deserialize)]
struct PhotoReply {
    #[serde(default)]
    es_plato_comida: bool,
    datos_comida: Option<ModelMeal>,
    mensaje: Option<String>,
}

#[derive(Debug, Deserialize)]
struct BarcodeReply {
    #[serde(default)]
    es_codigo_barras: bool,
    datos_comida: Option<ModelMeal>,
    mensaje: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Verdict {
    pub matched: bool,
    pub meal: Option<MealForm>,
    pub message: Option<String>,
}

fn verdict(matched: bool, meal: Option<ModelMeal>, message: Option<String>) -> Verdict {
    Verdict {
        matched,
        meal: if matched { meal.map(MealForm::from) } else { None },
        message: message.map(|m| m.trim().to_string()).filter(|m| !m.is_empty()),
    }
}

pub fn parse_photo_reply(text: &str) -> Result<Verdict, AnalysisError> {
    let r: PhotoReply = serde_json::from_str(json_object(text))?;
    Ok(verdict(r.es_plato_comida, r.datos_comida, r.mensaje))
}

pub fn parse_barcode_reply(text: &str) -> Result<Verdict, AnalysisError> {
    let r: BarcodeReply = serde_json::from_str(json_object(text))?;
    Ok(verdict(r.es_codigo_barras, r.datos_comida, r.mensaje))
}

pub async fn analyze_photo(
    ai: &dyn NutritionAi,
    image: &DecodedImage,
) -> Result<Verdict, AnalysisError> {
    let reply = ai
        .complete(CompletionRequest::vision(
            VISION_SYSTEM_PROMPT,
            PHOTO_PROMPT,
            image.as_input(),
        ))
        .await?;
    debug!(reply_len = reply.len(), "photo analysis reply");
    parse_photo_reply(&reply)
}

pub async fn analyze_barcode(
    ai: &dyn NutritionAi,
    image: &DecodedImage,
) -> Result<Verdict, AnalysisError> {
    let reply = ai
        .complete(CompletionRequest::vision(
            VISION_SYSTEM_PROMPT,
            BARCODE_PROMPT,
            image.as_input(),
        ))
        .await?;
    debug!(reply_len = reply.len(), "barcode analysis reply");
    parse_barcode_reply(&reply)
}
