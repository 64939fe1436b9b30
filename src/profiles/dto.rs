use serde::Deserialize;

use crate::nutrition::Goals;

/// Body of `PUT /profile`. Numeric fields come straight from the form.
#[derive(Debug, Clone, Deserialize)]
pub struct ProfileRequest {
    #[serde(default)]
    pub age: String,
    pub sex: Option<String>,
    #[serde(default)]
    pub height: String,
    #[serde(default)]
    pub weight: String,
    #[serde(default = "default_exercises")]
    pub exercises: bool,
    pub preference: Option<String>,
    pub goals: Option<Goals>,
    #[serde(default)]
    pub restrictions: Vec<String>,
    #[serde(default)]
    pub completed: bool,
}

fn default_exercises() -> bool {
    true
}
