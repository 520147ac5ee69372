use std::time::Duration;

use async_trait::async_trait;
use serde_json::json;
use tracing::{debug, info, warn};

use super::{combine_prompts, LlmProvider, TEMPERATURE};
use crate::{
    error::{GenerationError, Result},
    services::http::{build_url, HttpClient},
};

pub(crate) const PROVIDER_NAME: &str = "Ollama";

const DEFAULT_MODEL: &str = "mistral";
const GENERATE_PATH: &str = "api/generate";

/// Self-hosted Ollama backend
#[derive(Clone, Debug)]
pub struct OllamaProvider {
    base_url: String,
    model: String,
    http: HttpClient,
}

impl OllamaProvider {
    /// `timeout` bounds each request end to end
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let base_url = base_url.into();
        if base_url.trim().is_empty() {
            return Err(GenerationError::Config(
                "Ollama base URL must not be empty".to_string(),
            ));
        }

        Ok(Self {
            base_url,
            model: DEFAULT_MODEL.to_string(),
            http: HttpClient::new(PROVIDER_NAME, timeout)?,
        })
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl LlmProvider for OllamaProvider {
    fn name(&self) -> &'static str {
        PROVIDER_NAME
    }

    /// A reply without a `response` field yields an empty string, not an error
    async fn generate(&self, system_instruction: &str, user_instruction: &str) -> Result<String> {
        let body = json!({
            "model": self.model,
            "prompt": combine_prompts(system_instruction, user_instruction),
            "stream": false,
            "options": { "temperature": TEMPERATURE },
        });

        let url = build_url(&self.base_url, GENERATE_PATH);
        debug!(target: "itinerary::provider", url = %url, model = %self.model, "calling Ollama");

        let response = self.http.post_json(&url, None, &body).await?;

        match response.get("response").and_then(|value| value.as_str()) {
            Some(text) => {
                info!(
                    target: "itinerary::provider",
                    chars = text.len(),
                    "received response from Ollama"
                );
                Ok(text.to_string())
            }
            None => {
                warn!(
                    target: "itinerary::provider",
                    "Ollama reply has no `response` field; returning empty text"
                );
                Ok(String::new())
            }
        }
    }
}
