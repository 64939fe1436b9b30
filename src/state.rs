use std::sync::Arc;

use anyhow::Context;
use sqlx::PgPool;

use crate::ai::{NutritionAi, OpenAiClient};
use crate::config::AppConfig;
use crate::nutrition::{RatingStrategy, TokenRatingExtractor};
use crate::storage::{Storage, StorageClient};

#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub config: Arc<AppConfig>,
    pub storage: Arc<dyn StorageClient>,
    pub ai: Arc<dyn NutritionAi>,
    pub rating: Arc<dyn RatingStrategy>,
}

impl AppState {
    pub async fn init() -> anyhow::Result<Self> {
        let config = Arc::new(AppConfig::from_env()?);

        let db = sqlx::postgres::PgPoolOptions::new()
            .max_connections(10)
            .connect(&config.database_url)
            .await
            .context("connect to database")?;

        let storage = Arc::new(Storage::new(&config.storage).await?) as Arc<dyn StorageClient>;
        let ai = Arc::new(OpenAiClient::new(&config.openai).context("build ai client")?)
            as Arc<dyn NutritionAi>;

        Ok(Self::from_parts(db, config, storage, ai))
    }

    pub fn from_parts(
        db: PgPool,
        config: Arc<AppConfig>,
        storage: Arc<dyn StorageClient>,
        ai: Arc<dyn NutritionAi>,
    ) -> Self {
        Self {
            db,
            config,
            storage,
            ai,
            rating: Arc::new(TokenRatingExtractor),
        }
    }
}
