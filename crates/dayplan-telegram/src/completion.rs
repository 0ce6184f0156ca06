//! Optional completion client.
//!
//! The bot should come up even when AI planning is unconfigured, so the
//! engine gets this wrapper: it delegates to OpenRouter when a key is
//! present and fails with a configuration error (rendered as a friendly
//! hint) when it isn't.

use async_trait::async_trait;
use dayplan_planner::{Completion, OpenRouterCompletion, PlannerError, OPENROUTER_API_KEY_ENV};
use tracing::warn;

/// A [`Completion`] that may be unconfigured.
pub struct MaybeCompletion {
    inner: Option<OpenRouterCompletion>,
}

impl MaybeCompletion {
    /// Builds from the environment; missing configuration is tolerated.
    pub fn from_env() -> Self {
        let inner = match OpenRouterCompletion::from_env() {
            Ok(client) => Some(client),
            Err(e) => {
                warn!(error = %e, "AI planning disabled");
                None
            }
        };
        Self { inner }
    }

    /// Whether planning is actually available.
    pub fn is_configured(&self) -> bool {
        self.inner.is_some()
    }

    /// The configured model name, if any.
    pub fn model(&self) -> Option<String> {
        self.inner.as_ref().map(|c| c.model().to_string())
    }
}

#[async_trait]
impl Completion for MaybeCompletion {
    async fn complete(
        &self,
        system_prompt: &str,
        user_prompt: &str,
    ) -> dayplan_planner::Result<String> {
        match &self.inner {
            Some(client) => client.complete(system_prompt, user_prompt).await,
            None => Err(PlannerError::Configuration(format!(
                "missing {} environment variable",
                OPENROUTER_API_KEY_ENV
            ))),
        }
    }
}
