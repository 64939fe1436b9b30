use thiserror::Error;

use super::dto::ProfileRequest;
use super::repo::NutritionProfile;
use crate::nutrition::nutrients::dedup_labels;
use crate::nutrition::{DietaryProfile, Goals};

pub const MAX_HEIGHT_CM: i32 = 250;
pub const MAX_WEIGHT_KG: i32 = 400;
pub const SEXES: [&str; 2] = ["Masculino", "Femenino"];

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ProfileError {
    #[error("{0} must contain digits only")]
    NotDigits(&'static str),
    #[error("height cannot exceed 250 cm")]
    HeightTooLarge,
    #[error("weight cannot exceed 400 kg")]
    WeightTooLarge,
    #[error("sex must be one of Masculino, Femenino")]
    UnknownSex,
}

/// Validated profile, ready to store.
#[derive(Debug, Clone, PartialEq)]
pub struct ProfileInput {
    pub age: Option<i32>,
    pub sex: Option<String>,
    pub height_cm: Option<i32>,
    pub weight_kg: Option<i32>,
    pub exercises: bool,
    pub preference: Option<String>,
    pub goals: Vec<String>,
    pub restrictions: Vec<String>,
    pub completed: bool,
}

fn digits(field: &'static str, raw: &str) -> Result<Option<i32>, ProfileError> {
    let v = raw.trim();
    if v.is_empty() {
        return Ok(None);
    }
    if !v.chars().all(|c| c.is_ascii_digit()) {
        return Err(ProfileError::NotDigits(field));
    }
    v.parse::<i32>()
        .map(Some)
        .map_err(|_| ProfileError::NotDigits(field))
}

fn text(raw: &Option<String>) -> Option<String> {
    raw.as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

pub fn validate(req: &ProfileRequest) -> Result<ProfileInput, ProfileError> {
    let age = digits("age", &req.age)?;
    let height_cm = digits("height", &req.height)?;
    if height_cm.is_some_and(|h| h > MAX_HEIGHT_CM) {
        return Err(ProfileError::HeightTooLarge);
    }
    let weight_kg = digits("weight", &req.weight)?;
    if weight_kg.is_some_and(|w| w > MAX_WEIGHT_KG) {
        return Err(ProfileError::WeightTooLarge);
    }
    let sex = text(&req.sex);
    if let Some(s) = &sex {
        if !SEXES.contains(&s.as_str()) {
            return Err(ProfileError::UnknownSex);
        }
    }
    let goals = match &req.goals {
        Some(Goals::One(g)) => dedup_labels(std::slice::from_ref(g)),
        Some(Goals::Many(list)) => dedup_labels(list),
        None => Vec::new(),
    };

    Ok(ProfileInput {
        age,
        sex,
        height_cm,
        weight_kg,
        exercises: req.exercises,
        preference: text(&req.preference),
        goals,
        restrictions: dedup_labels(&req.restrictions),
        completed: req.completed,
    })
}

impl NutritionProfile {
    /// Onboarding is done once the form was submitted with every required field.
    pub fn is_complete(&self) -> bool {
        self.completed
            && self.age.is_some()
            && self.sex.is_some()
            && self.height_cm.is_some()
            && self.weight_kg.is_some()
            && self.preference.is_some()
            && !self.goals.is_empty()
    }

    pub fn dietary(&self) -> DietaryProfile {
        DietaryProfile {
            goals: (!self.goals.is_empty()).then(|| Goals::Many(self.goals.clone())),
            preference: self.preference.clone(),
            restrictions: self.restrictions.clone(),
        }
    }
}
