use std::time::Duration;

use async_trait::async_trait;
use serde_json::{json, Value};
use tracing::{debug, info};

use super::{combine_prompts, LlmProvider, MAX_TOKENS, TEMPERATURE};
use crate::{
    error::{GenerationError, Result},
    services::http::{build_url, HttpClient},
};

pub(crate) const PROVIDER_NAME: &str = "HuggingFace";

const DEFAULT_BASE_URL: &str = "https://api-inference.huggingface.co/models";
const DEFAULT_MODEL: &str = "mistralai/Mistral-7B-Instruct-v0.1";

/// Hosted text-generation backend. Instructions are joined into one prompt.
#[derive(Clone)]
pub struct HuggingFaceProvider {
    api_key: String,
    base_url: String,
    model: String,
    http: HttpClient,
}

impl std::fmt::Debug for HuggingFaceProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HuggingFaceProvider")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .finish_non_exhaustive()
    }
}

impl HuggingFaceProvider {
    pub fn new(api_key: impl Into<String>, timeout: Duration) -> Result<Self> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(GenerationError::MissingCredential {
                provider: PROVIDER_NAME,
            });
        }

        Ok(Self {
            api_key,
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            http: HttpClient::new(PROVIDER_NAME, timeout)?,
        })
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn endpoint(&self) -> String {
        build_url(&self.base_url, &self.model)
    }
}

/// `[{"generated_text": "..."}]` or `{"generated_text": "..."}`
fn generated_text(response: &Value) -> Option<&str> {
    let entry = match response {
        Value::Array(items) => items.first()?,
        other => other,
    };
    entry.get("generated_text").and_then(|value| value.as_str())
}

#[async_trait]
impl LlmProvider for HuggingFaceProvider {
    fn name(&self) -> &'static str {
        PROVIDER_NAME
    }

    async fn generate(&self, system_instruction: &str, user_instruction: &str) -> Result<String> {
        let body = json!({
            "inputs": combine_prompts(system_instruction, user_instruction),
            "parameters": {
                "max_new_tokens": MAX_TOKENS,
                "temperature": TEMPERATURE,
                "return_full_text": false,
            }
        });

        debug!(target: "itinerary::provider", model = %self.model, "calling HuggingFace text generation");
        let response = self
            .http
            .post_json(&self.endpoint(), Some(self.api_key.as_str()), &body)
            .await?;

        let text = generated_text(&response)
            .filter(|text| !text.trim().is_empty())
            .ok_or(GenerationError::EmptyResponse(PROVIDER_NAME))?;

        info!(
            target: "itinerary::provider",
            chars = text.len(),
            "received response from HuggingFace"
        );
        Ok(text.to_string())
    }
}
