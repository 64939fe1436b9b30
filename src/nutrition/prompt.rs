use super::nutrients::{dedup_labels, DietaryProfile, MealNutrients};

/// System message sent alongside every feedback prompt.
pub const NUTRITIONIST_SYSTEM_PROMPT: &str = "Eres un nutricionista experto que proporciona feedback nutricional personalizado. \
Tu respuesta debe ser clara, educativa y breve. \
Usa **negrita** solo para los títulos de sección. \
Responde siempre en español.";

const MISSING_NAME: &str = "No especificado";

const RATING_INSTRUCTION: &str = "En la última línea escribe exactamente una de estas opciones: \
CALIFICACIÓN: [ALTA], CALIFICACIÓN: [MEDIA] o CALIFICACIÓN: [BAJA]";

const STYLE_RULES: &str =
    "Usa negrita solo para los títulos de sección, no superes las 150 palabras y responde en español.";

fn amount(v: Option<f64>) -> String {
    v.map(|x| x.to_string()).unwrap_or_else(|| "0".to_string())
}

fn non_blank(s: Option<&str>) -> Option<&str> {
    s.map(str::trim).filter(|s| !s.is_empty())
}

fn nutrient_section(meal: &MealNutrients, meal_type: Option<&str>) -> String {
    let mut section = format!(
        "**Información nutricional:**\n\
         - Nombre: {}\n\
         - Cantidad: {} gr\n\
         - Energía: {} Kcal\n\
         - Carbohidratos: {} gr\n\
         - Proteínas: {} gr\n\
         - Fibra: {} gr\n\
         - Grasa: {} gr\n",
        non_blank(meal.name.as_deref()).unwrap_or(MISSING_NAME),
        amount(meal.quantity_g),
        amount(meal.energy_kcal),
        amount(meal.carb_g),
        amount(meal.protein_g),
        amount(meal.fiber_g),
        amount(meal.fat_g),
    );
    if let Some(t) = meal_type {
        section.push_str(&format!("- Tipo de comida: {}\n", t));
    }
    section
}

/// `None` when the profile has nothing to render.
fn profile_section(profile: &DietaryProfile, goals: Option<&str>) -> Option<String> {
    let preference = non_blank(profile.preference.as_deref());
    let restrictions = dedup_labels(&profile.restrictions);
    if goals.is_none() && preference.is_none() && restrictions.is_empty() {
        return None;
    }

    let mut lines = vec!["**Perfil del usuario:**".to_string()];
    if let Some(g) = goals {
        lines.push(format!("- Objetivos: {}", g));
    }
    if let Some(pref) = preference {
        lines.push(format!("- Preferencia nutricional: {}", pref));
    }
    if !restrictions.is_empty() {
        lines.push(format!("- Restricciones: {}", restrictions.join(", ")));
    }
    Some(lines.join("\n") + "\n")
}

fn instructions(meal_type: Option<&str>, has_goals: bool) -> String {
    let mut items = vec![match meal_type {
        Some(t) => format!("**Evaluación:** 2-3 oraciones evaluando esta comida como {}.", t),
        None => "**Evaluación:** 2-3 oraciones evaluando esta comida.".to_string(),
    }];
    if has_goals {
        items.push(
            "**Objetivos:** una oración sobre cómo se alinea con los objetivos del usuario."
                .to_string(),
        );
    }
    items.push(match meal_type {
        Some(t) => format!(
            "**Recomendaciones:** recomendaciones breves para mejorar o complementar la comida (tipo: {}).",
            t
        ),
        None => "**Recomendaciones:** recomendaciones breves para mejorar o complementar la comida."
            .to_string(),
    });
    items.push(RATING_INSTRUCTION.to_string());

    let numbered: Vec<String> = items
        .iter()
        .enumerate()
        .map(|(i, item)| format!("{}. {}", i + 1, item))
        .collect();
    format!(
        "Proporciona un feedback nutricional breve que incluya:\n{}\n\n{}",
        numbered.join("\n"),
        STYLE_RULES
    )
}

/// Renders the feedback request for one meal.
///
/// Sections, in order: nutrient summary (with the meal type when given), the
/// user's profile (only when there is something to say) and the fixed
/// instructions ending in the rating line the extractor looks for.
pub fn build_prompt(
    meal: &MealNutrients,
    meal_type: Option<&str>,
    profile: Option<&DietaryProfile>,
) -> String {
    let meal_type = non_blank(meal_type);
    let goals = profile.and_then(|pr| pr.goals.as_ref()).and_then(|g| g.joined());

    let mut prompt = String::from("Analiza esta comida y proporciona feedback nutricional breve:\n\n");
    prompt.push_str(&nutrient_section(meal, meal_type));
    prompt.push('\n');
    if let Some(section) = profile.and_then(|pr| profile_section(pr, goals.as_deref())) {
        prompt.push_str(&section);
        prompt.push('\n');
    }
    prompt.push_str(&instructions(meal_type, goals.is_some()));
    prompt
}
