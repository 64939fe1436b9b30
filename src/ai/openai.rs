use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{debug, warn};

use super::{AiError, CompletionRequest, NutritionAi};
use crate::config::OpenAiConfig;

/// OpenAI-compatible chat-completions client.
#[derive(Clone)]
pub struct OpenAiClient {
    client: Client,
    api_key: String,
    base_url: String,
    model: String,
}

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: &'static str,
    content: Value,
}

#[derive(Debug, Serialize)]
struct ChatBody<'a> {
    model: &'a str,
    messages: Vec<ChatMessage>,
    temperature: f32,
    max_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<Value>,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    content: Option<String>,
}

impl OpenAiClient {
    pub fn new(cfg: &OpenAiConfig) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(cfg.timeout_secs))
            .build()?;
        Ok(Self {
            client,
            api_key: cfg.api_key.clone(),
            base_url: cfg.base_url.trim_end_matches('/').to_string(),
            model: cfg.model.clone(),
        })
    }

    fn body<'a>(&'a self, req: &CompletionRequest<'_>) -> ChatBody<'a> {
        let user_content = match req.image {
            Some(image) => json!([
                { "type": "text", "text": req.prompt },
                { "type": "image_url", "image_url": { "url": image.data_url() } }
            ]),
            None => Value::String(req.prompt.to_string()),
        };
        ChatBody {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: Value::String(req.system.to_string()),
                },
                ChatMessage {
                    role: "user",
                    content: user_content,
                },
            ],
            temperature: req.temperature,
            max_tokens: req.max_tokens,
            response_format: req.json.then(|| json!({ "type": "json_object" })),
        }
    }
}

#[async_trait]
impl NutritionAi for OpenAiClient {
    async fn complete(&self, req: CompletionRequest<'_>) -> Result<String, AiError> {
        let url = format!("{}/chat/completions", self.base_url);
        debug!(model = %self.model, vision = req.image.is_some(), "chat completion request");

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&self.body(&req))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(%status, "chat completion failed");
            return Err(AiError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let raw: Value = response.json().await?;
        if let Some(err) = raw.get("error") {
            return Err(AiError::Api(err.to_string()));
        }
        let parsed: ChatResponse =
            serde_json::from_value(raw).map_err(|e| AiError::Api(e.to_string()))?;

        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .filter(|c| !c.trim().is_empty())
            .ok_or(AiError::EmptyResponse)
    }
}
