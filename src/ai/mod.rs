//! Client side of the hosted language/vision model.

use async_trait::async_trait;
use thiserror::Error;

mod openai;

pub use openai::OpenAiClient;

#[derive(Debug, Error)]
pub enum AiError {
    #[error("ai transport error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("ai endpoint returned {status}: {body}")]
    Status { status: u16, body: String },
    #[error("ai endpoint error: {0}")]
    Api(String),
    #[error("ai endpoint returned no content")]
    EmptyResponse,
}

/// Inline image sent with a vision request, already base64-encoded.
#[derive(Debug, Clone, Copy)]
pub struct ImageInput<'a> {
    pub base64: &'a str,
    pub content_type: &'a str,
}

impl ImageInput<'_> {
    pub fn data_url(&self) -> String {
        format!("data:{};base64,{}", self.content_type, self.base64)
    }
}

#[derive(Debug, Clone)]
pub struct CompletionRequest<'a> {
    pub system: &'a str,
    pub prompt: &'a str,
    pub image: Option<ImageInput<'a>>,
    pub temperature: f32,
    pub max_tokens: u32,
    /// Ask the model for a single JSON object.
    pub json: bool,
}

impl<'a> CompletionRequest<'a> {
    pub fn text(system: &'a str, prompt: &'a str) -> Self {
        Self {
            system,
            prompt,
            image: None,
            temperature: 0.7,
            max_tokens: 500,
            json: false,
        }
    }

    pub fn vision(system: &'a str, prompt: &'a str, image: ImageInput<'a>) -> Self {
        Self {
            system,
            prompt,
            image: Some(image),
            temperature: 0.2,
            max_tokens: 600,
            json: true,
        }
    }
}

/// Text (and optionally image) in, text out.
#[async_trait]
pub trait NutritionAi: Send + Sync {
    async fn complete(&self, req: CompletionRequest<'_>) -> Result<String, AiError>;
}

#[cfg(test)]
pub mod testing {
    use std::sync::Mutex;

    use super::*;

    /// Replies with a fixed text and remembers the prompts it was given.
    pub struct ScriptedAi {
        reply: Result<String, String>,
        pub prompts: Mutex<Vec<String>>,
    }

    impl ScriptedAi {
        pub fn replying(text: &str) -> Self {
            Self {
                reply: Ok(text.to_string()),
                prompts: Mutex::new(Vec::new()),
            }
        }

        pub fn failing(msg: &str) -> Self {
            Self {
                reply: Err(msg.to_string()),
                prompts: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl NutritionAi for ScriptedAi {
        async fn complete(&self, req: CompletionRequest<'_>) -> Result<String, AiError> {
            self.prompts.lock().unwrap().push(req.prompt.to_string());
            self.reply.clone().map_err(AiError::Api)
        }
    }
}
