use std::{fmt, time::Duration};

use async_openai::{
    config::OpenAIConfig,
    types::{ChatCompletionRequestMessageArgs, CreateChatCompletionRequestArgs, Role},
    Client,
};
use async_trait::async_trait;
use tokio::time::timeout;
use tracing::{debug, info};

use super::{config::DEFAULT_REQUEST_TIMEOUT, LlmProvider, MAX_TOKENS, TEMPERATURE};
use crate::error::{GenerationError, Result};

pub(crate) const PROVIDER_NAME: &str = "Groq";

const DEFAULT_BASE_URL: &str = "https://api.groq.com/openai/v1";
const DEFAULT_MODEL: &str = "llama-3.3-70b-versatile";
/// Nucleus sampling left neutral
const TOP_P: f32 = 1.0;

/// Hosted chat-completion backend (any OpenAI-compatible endpoint, Groq by default)
#[derive(Clone)]
pub struct GroqProvider {
    api_key: String,
    base_url: String,
    model: String,
    timeout: Duration,
    client: Client<OpenAIConfig>,
}

impl fmt::Debug for GroqProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GroqProvider")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

impl GroqProvider {
    /// Fails when `api_key` is blank
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(GenerationError::MissingCredential {
                provider: PROVIDER_NAME,
            });
        }

        let client = build_client(&api_key, DEFAULT_BASE_URL);
        info!(target: "itinerary::provider", model = DEFAULT_MODEL, "Groq client initialized");

        Ok(Self {
            api_key,
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            timeout: DEFAULT_REQUEST_TIMEOUT,
            client,
        })
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self.client = build_client(&self.api_key, &self.base_url);
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

fn build_client(api_key: &str, base_url: &str) -> Client<OpenAIConfig> {
    let config = OpenAIConfig::new()
        .with_api_key(api_key)
        .with_api_base(base_url);
    Client::with_config(config)
}

#[async_trait]
impl LlmProvider for GroqProvider {
    fn name(&self) -> &'static str {
        PROVIDER_NAME
    }

    async fn generate(&self, system_instruction: &str, user_instruction: &str) -> Result<String> {
        let request = CreateChatCompletionRequestArgs::default()
            .model(self.model.as_str())
            .messages([
                ChatCompletionRequestMessageArgs::default()
                    .role(Role::System)
                    .content(system_instruction)
                    .build()?,
                ChatCompletionRequestMessageArgs::default()
                    .role(Role::User)
                    .content(user_instruction)
                    .build()?,
            ])
            .temperature(TEMPERATURE)
            .top_p(TOP_P)
            .max_tokens(MAX_TOKENS)
            .build()?;

        debug!(target: "itinerary::provider", model = %self.model, "calling Groq chat completions");

        let response = timeout(self.timeout, self.client.chat().create(request))
            .await
            .map_err(|_| GenerationError::Timeout {
                provider: PROVIDER_NAME,
                timeout: self.timeout,
            })??;

        let content = response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .filter(|content| !content.trim().is_empty())
            .ok_or(GenerationError::EmptyResponse(PROVIDER_NAME))?;

        info!(
            target: "itinerary::provider",
            chars = content.len(),
            "received response from Groq"
        );
        Ok(content)
    }
}
