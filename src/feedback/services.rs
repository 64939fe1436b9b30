use tracing::debug;

use super::dto::FeedbackItem;
use super::repo::FeedbackRow;
use crate::ai::{AiError, CompletionRequest, NutritionAi};
use crate::nutrition::{
    build_prompt, DietaryProfile, MealNutrients, Rating, RatingStrategy,
    NUTRITIONIST_SYSTEM_PROMPT,
};

/// Shown to the user when the model cannot be reached.
pub const AI_UNAVAILABLE_MSG: &str =
    "No se pudo generar el feedback en este momento. Inténtalo de nuevo más tarde.";

#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedFeedback {
    pub text: String,
    pub rating: Rating,
}

/// Builds the prompt, asks the model and rates its answer.
pub async fn generate_feedback(
    ai: &dyn NutritionAi,
    rating: &dyn RatingStrategy,
    meal: &MealNutrients,
    meal_type: Option<&str>,
    profile: Option<&DietaryProfile>,
) -> Result<GeneratedFeedback, AiError> {
    let prompt = build_prompt(meal, meal_type, profile);
    debug!(prompt_len = prompt.len(), "requesting feedback");

    let text = ai
        .complete(CompletionRequest::text(NUTRITIONIST_SYSTEM_PROMPT, &prompt))
        .await?;
    let text = text.trim().to_string();
    if text.is_empty() {
        return Err(AiError::EmptyResponse);
    }
    let rating = rating.extract(&text);
    Ok(GeneratedFeedback { text, rating })
}

impl From<FeedbackRow> for FeedbackItem {
    fn from(r: FeedbackRow) -> Self {
        Self {
            id: r.id,
            diary_entry_id: r.diary_entry_id,
            meal_name: r.meal_name,
            meal_type: r.meal_type,
            rating: Rating::from_label(&r.rating),
            text: r.text,
            created_at: r.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::testing::ScriptedAi;
    use crate::nutrition::{Goals, TokenRatingExtractor};

    fn salad() -> MealNutrients {
        MealNutrients {
            name: Some("Ensalada".into()),
            quantity_g: Some(200.0),
            energy_kcal: Some(150.0),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn rates_the_model_answer() {
        let ai = ScriptedAi::replying(
            "**Evaluación:** comida ligera.\n\nCALIFICACIÓN: [ALTA]\n",
        );
        let out = generate_feedback(&ai, &TokenRatingExtractor, &salad(), Some("Almuerzo"), None)
            .await
            .unwrap();
        assert_eq!(out.rating, Rating::Alta);
        assert!(out.text.ends_with("[ALTA]"));

        let prompts = ai.prompts.lock().unwrap();
        assert_eq!(prompts.len(), 1);
        assert!(prompts[0].contains("- Nombre: Ensalada"));
        assert!(prompts[0].contains("- Tipo de comida: Almuerzo"));
    }

    #[tokio::test]
    async fn profile_reaches_the_prompt() {
        let ai = ScriptedAi::replying("Sin calificación clara");
        let profile = DietaryProfile {
            goals: Some(Goals::One("Ganar masa muscular".into())),
            preference: Some("Vegana".into()),
            restrictions: vec!["Lactosa".into()],
        };
        let out = generate_feedback(&ai, &TokenRatingExtractor, &salad(), None, Some(&profile))
            .await
            .unwrap();
        assert_eq!(out.rating, Rating::Media);
        let prompts = ai.prompts.lock().unwrap();
        assert!(prompts[0].contains("Ganar masa muscular"));
        assert!(prompts[0].contains("Lactosa"));
    }

    #[tokio::test]
    async fn ai_failure_propagates() {
        let ai = ScriptedAi::failing("boom");
        let err = generate_feedback(&ai, &TokenRatingExtractor, &salad(), None, None)
            .await
            .unwrap_err();
        assert!(matches!(err, AiError::Api(_)));
    }

    #[tokio::test]
    async fn blank_answer_is_an_error() {
        let ai = ScriptedAi::replying("  \n ");
        let err = generate_feedback(&ai, &TokenRatingExtractor, &salad(), None, None)
            .await
            .unwrap_err();
        assert!(matches!(err, AiError::EmptyResponse));
    }

    #[test]
    fn stored_rows_map_labels() {
        let row = FeedbackRow {
            id: uuid::Uuid::new_v4(),
            diary_entry_id: uuid::Uuid::new_v4(),
            meal_name: Some("Pizza".into()),
            meal_type: "Cena".into(),
            text: "Alta en grasas".into(),
            rating: "Baja".into(),
            created_at: time::OffsetDateTime::UNIX_EPOCH,
        };
        let item = FeedbackItem::from(row);
        assert_eq!(item.rating, Some(Rating::Baja));
        assert_eq!(item.meal_type, "Cena");
    }
}
