//! Meal nutrients, the feedback prompt and rating extraction.
//!
//! Everything here is synchronous and side-effect free; the HTTP and AI
//! layers call into it once per feedback request.

pub mod nutrients;
pub mod prompt;
pub mod rating;

pub use nutrients::{DietaryProfile, Goals, MealForm, MealNutrients, MealType, NutrientError};
pub use prompt::{build_prompt, NUTRITIONIST_SYSTEM_PROMPT};
pub use rating::{extract_rating, Rating, RatingStrategy, TokenRatingExtractor};
