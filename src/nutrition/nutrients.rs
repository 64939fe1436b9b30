use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Meal data as the client sends it: every numeric field is a string typed
/// into a form, possibly empty.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct MealForm {
    pub name: String,
    pub quantity: String,
    pub energy: String,
    pub carb: String,
    pub protein: String,
    pub fiber: String,
    pub fat: String,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum NutrientError {
    #[error("field `{field}` must be a non-negative number, got `{value}`")]
    InvalidNumber { field: &'static str, value: String },
}

/// Validated nutrient record. Quantities in grams, energy in kcal.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MealNutrients {
    pub name: Option<String>,
    pub quantity_g: Option<f64>,
    pub energy_kcal: Option<f64>,
    pub carb_g: Option<f64>,
    pub protein_g: Option<f64>,
    pub fiber_g: Option<f64>,
    pub fat_g: Option<f64>,
}

fn parse_amount(field: &'static str, raw: &str) -> Result<Option<f64>, NutrientError> {
    lazy_static! {
        static ref AMOUNT_RE: Regex = Regex::new(r"^[0-9]*\.?[0-9]*$").unwrap();
    }
    let value = raw.trim();
    if value.is_empty() {
        return Ok(None);
    }
    let invalid = || NutrientError::InvalidNumber {
        field,
        value: value.to_string(),
    };
    if !AMOUNT_RE.is_match(value) {
        return Err(invalid());
    }
    value.parse::<f64>().map(Some).map_err(|_| invalid())
}

/// Keeps only digits and the decimal point, the way the form inputs filter
/// keystrokes.
pub fn filter_numeric(raw: &str) -> String {
    raw.chars().filter(|c| c.is_ascii_digit() || *c == '.').collect()
}

impl MealForm {
    pub fn parse(&self) -> Result<MealNutrients, NutrientError> {
        let name = self.name.trim();
        Ok(MealNutrients {
            name: (!name.is_empty()).then(|| name.to_string()),
            quantity_g: parse_amount("quantity", &self.quantity)?,
            energy_kcal: parse_amount("energy", &self.energy)?,
            carb_g: parse_amount("carb", &self.carb)?,
            protein_g: parse_amount("protein", &self.protein)?,
            fiber_g: parse_amount("fiber", &self.fiber)?,
            fat_g: parse_amount("fat", &self.fat)?,
        })
    }
}

impl From<&MealNutrients> for MealForm {
    fn from(m: &MealNutrients) -> Self {
        let fmt = |v: Option<f64>| v.map(|x| x.to_string()).unwrap_or_default();
        Self {
            name: m.name.clone().unwrap_or_default(),
            quantity: fmt(m.quantity_g),
            energy: fmt(m.energy_kcal),
            carb: fmt(m.carb_g),
            protein: fmt(m.protein_g),
            fiber: fmt(m.fiber_g),
            fat: fmt(m.fat_g),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MealType {
    Desayuno,
    Almuerzo,
    Cena,
    Snack,
    Otro,
}

impl MealType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MealType::Desayuno => "Desayuno",
            MealType::Almuerzo => "Almuerzo",
            MealType::Cena => "Cena",
            MealType::Snack => "Snack",
            MealType::Otro => "Otro",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim() {
            "Desayuno" => Some(MealType::Desayuno),
            "Almuerzo" => Some(MealType::Almuerzo),
            "Cena" => Some(MealType::Cena),
            "Snack" => Some(MealType::Snack),
            "Otro" => Some(MealType::Otro),
            _ => None,
        }
    }
}

/// Goals arrive either as one free-text string or as an ordered list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Goals {
    One(String),
    Many(Vec<String>),
}

impl Goals {
    /// Comma-joined rendering; `None` when nothing non-blank is left.
    pub fn joined(&self) -> Option<String> {
        let s = match self {
            Goals::One(g) => g.trim().to_string(),
            Goals::Many(list) => list
                .iter()
                .map(|g| g.trim())
                .filter(|g| !g.is_empty())
                .collect::<Vec<_>>()
                .join(", "),
        };
        (!s.is_empty()).then_some(s)
    }
}

/// The part of a user's profile that matters to feedback generation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DietaryProfile {
    pub goals: Option<Goals>,
    pub preference: Option<String>,
    #[serde(default)]
    pub restrictions: Vec<String>,
}

/// Drops blank and repeated entries, keeping first-seen order.
pub fn dedup_labels(items: &[String]) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(items.len());
    for item in items {
        let item = item.trim();
        if !item.is_empty() && !out.iter().any(|o| o == item) {
            out.push(item.to_string());
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_accepts_empty_and_decimal_fields() {
        let form = MealForm {
            name: "  Ensalada ".into(),
            quantity: "200".into(),
            energy: "150.5".into(),
            carb: "".into(),
            protein: ".5".into(),
            fiber: "3.".into(),
            fat: " 7 ".into(),
        };
        let m = form.parse().expect("valid form");
        assert_eq!(m.name.as_deref(), Some("Ensalada"));
        assert_eq!(m.quantity_g, Some(200.0));
        assert_eq!(m.energy_kcal, Some(150.5));
        assert_eq!(m.carb_g, None);
        assert_eq!(m.protein_g, Some(0.5));
        assert_eq!(m.fiber_g, Some(3.0));
        assert_eq!(m.fat_g, Some(7.0));
    }

    #[test]
    fn parse_rejects_letters_and_signs() {
        let form = MealForm {
            energy: "12a".into(),
            ..Default::default()
        };
        assert_eq!(
            form.parse().unwrap_err(),
            NutrientError::InvalidNumber {
                field: "energy",
                value: "12a".into()
            }
        );

        let form = MealForm {
            fat: "-3".into(),
            ..Default::default()
        };
        assert!(form.parse().is_err());

        let form = MealForm {
            fat: ".".into(),
            ..Default::default()
        };
        assert!(form.parse().is_err());
    }

    #[test]
    fn blank_name_becomes_none() {
        let m = MealForm::default().parse().unwrap();
        assert_eq!(m, MealNutrients::default());
    }

    #[test]
    fn filter_numeric_strips_everything_but_digits_and_dot() {
        assert_eq!(filter_numeric("12,5 g"), "125");
        assert_eq!(filter_numeric("7.25kcal"), "7.25");
    }

    #[test]
    fn form_round_trip_keeps_integer_rendering() {
        let m = MealForm {
            name: "Arroz".into(),
            quantity: "100".into(),
            energy: "130".into(),
            ..Default::default()
        }
        .parse()
        .unwrap();
        let back = MealForm::from(&m);
        assert_eq!(back.quantity, "100");
        assert_eq!(back.energy, "130");
        assert_eq!(back.carb, "");
    }

    #[test]
    fn goals_join_in_order_and_skip_blanks() {
        let g = Goals::Many(vec!["Perder peso".into(), " ".into(), "Mantener peso".into()]);
        assert_eq!(g.joined().as_deref(), Some("Perder peso, Mantener peso"));
        assert_eq!(Goals::One("  ".into()).joined(), None);
        assert_eq!(Goals::One("Ganar masa muscular".into()).joined().as_deref(), Some("Ganar masa muscular"));
    }

    #[test]
    fn goals_deserialize_from_string_or_list() {
        let one: Goals = serde_json::from_str(r#""Perder peso""#).unwrap();
        assert_eq!(one, Goals::One("Perder peso".into()));
        let many: Goals = serde_json::from_str(r#"["a","b"]"#).unwrap();
        assert_eq!(many, Goals::Many(vec!["a".into(), "b".into()]));
    }

    #[test]
    fn meal_type_parses_known_labels_only() {
        assert_eq!(MealType::parse("Cena"), Some(MealType::Cena));
        assert_eq!(MealType::parse("Brunch"), None);
        assert_eq!(MealType::Snack.as_str(), "Snack");
    }

    #[test]
    fn dedup_labels_keeps_first_occurrence() {
        let v = vec!["Gluten".into(), "Soja".into(), "Gluten".into(), "".into()];
        assert_eq!(dedup_labels(&v), vec!["Gluten".to_string(), "Soja".to_string()]);
    }
}
