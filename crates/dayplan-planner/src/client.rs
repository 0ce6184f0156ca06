//! Completion-service interface and the OpenRouter-backed implementation.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::error::{PlannerError, Result};

/// Environment variable for the OpenRouter API key.
pub const OPENROUTER_API_KEY_ENV: &str = "OPENROUTER_API_KEY";

/// Environment variable overriding the planning model.
pub const OPENROUTER_MODEL_ENV: &str = "OPENROUTER_MODEL";

/// Default model used for plan generation.
pub const DEFAULT_MODEL: &str = "qwen/qwen3-32b";

/// OpenRouter chat completions endpoint.
const OPENROUTER_API_URL: &str = "https://openrouter.ai/api/v1/chat/completions";

/// Low temperature to favor deterministic, well-formed JSON output.
const PLAN_TEMPERATURE: f32 = 0.3;

/// Generation cap for a plan reply.
const PLAN_MAX_TOKENS: u32 = 1500;

/// An external text-completion service.
///
/// Treated as opaque and unreliable: implementations return raw model text
/// with no format guarantees. A single call is made per user request;
/// retrying is the user's job, not ours.
#[async_trait]
pub trait Completion: Send + Sync {
    /// Runs one completion and returns the raw reply text.
    async fn complete(&self, system_prompt: &str, user_prompt: &str) -> Result<String>;
}

/// Chat completion request body.
#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    max_tokens: u32,
}

/// A single chat message.
#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

/// Chat completion response body (only the fields we read).
#[derive(Debug, Deserialize)]
struct ChatResponse {
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

/// [`Completion`] backed by the OpenRouter chat completions API.
#[derive(Clone)]
pub struct OpenRouterCompletion {
    client: reqwest::Client,
    api_key: String,
    model: String,
}

impl OpenRouterCompletion {
    /// Creates a client with an explicit key and model.
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key: api_key.into(),
            model: model.into(),
        }
    }

    /// Creates a client from `OPENROUTER_API_KEY` / `OPENROUTER_MODEL`.
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var(OPENROUTER_API_KEY_ENV).map_err(|_| {
            PlannerError::Configuration(format!(
                "missing {} environment variable",
                OPENROUTER_API_KEY_ENV
            ))
        })?;
        let model =
            std::env::var(OPENROUTER_MODEL_ENV).unwrap_or_else(|_| DEFAULT_MODEL.to_string());
        Ok(Self::new(api_key, model))
    }

    /// The model this client asks for.
    pub fn model(&self) -> &str {
        &self.model
    }
}

#[async_trait]
impl Completion for OpenRouterCompletion {
    async fn complete(&self, system_prompt: &str, user_prompt: &str) -> Result<String> {
        let request = ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: system_prompt,
                },
                ChatMessage {
                    role: "user",
                    content: user_prompt,
                },
            ],
            temperature: PLAN_TEMPERATURE,
            max_tokens: PLAN_MAX_TOKENS,
        };

        trace!(model = %self.model, "Sending completion request");

        let response = self
            .client
            .post(OPENROUTER_API_URL)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| PlannerError::Completion(format!("HTTP request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(PlannerError::Completion(format!(
                "OpenRouter API error {}: {}",
                status, body
            )));
        }

        let response: ChatResponse = response
            .json()
            .await
            .map_err(|e| PlannerError::Completion(format!("failed to decode response: {}", e)))?;

        let content = response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| PlannerError::Completion("no content in response".to_string()))?;

        debug!(chars = content.len(), "Completion received");
        Ok(content)
    }
}
