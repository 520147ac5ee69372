//! Provider gateway: one `generate(system, user)` operation over several LLM backends.
//!
//! - **groq**: hosted chat completions (system + user messages) via `async-openai`
//! - **huggingface**: hosted single-prompt text generation
//! - **ollama**: self-hosted generation endpoint
//!
//! [`build_provider`] picks the implementation from [`ProviderSettings`] and
//! rejects missing credentials before any request is made.

pub mod config;
pub mod groq;
pub mod huggingface;
pub mod ollama;

pub use config::{ProviderKind, ProviderSettings};
pub use groq::GroqProvider;
pub use huggingface::HuggingFaceProvider;
pub use ollama::OllamaProvider;

use async_trait::async_trait;
use tracing::info;

use crate::{
    error::{GenerationError, Result},
    types::GenerationRequest,
};

/// Sampling temperature used by every backend
pub const TEMPERATURE: f32 = 0.7;
/// Upper bound on generated tokens
pub const MAX_TOKENS: u16 = 2048;

/// A backend able to generate text from a system and a user instruction
#[async_trait]
pub trait LlmProvider: Send + Sync + std::fmt::Debug {
    /// Human-readable backend name used in logs and errors
    fn name(&self) -> &'static str;

    /// Run one generation call
    async fn generate(&self, system_instruction: &str, user_instruction: &str) -> Result<String>;

    async fn generate_request(&self, request: &GenerationRequest) -> Result<String> {
        self.generate(request.system_instruction(), request.user_instruction())
            .await
    }
}

/// Single-prompt framing for backends without role separation
pub(crate) fn combine_prompts(system_instruction: &str, user_instruction: &str) -> String {
    format!("{system_instruction}\n\n{user_instruction}")
}

/// Build the provider selected by `settings`
pub fn build_provider(settings: &ProviderSettings) -> Result<Box<dyn LlmProvider>> {
    let provider: Box<dyn LlmProvider> = match settings.provider {
        ProviderKind::Groq => {
            let api_key = settings
                .groq_api_key
                .as_deref()
                .ok_or(GenerationError::MissingCredential {
                    provider: groq::PROVIDER_NAME,
                })?;
            let mut provider = GroqProvider::new(api_key)?.with_timeout(settings.request_timeout);
            if let Some(model) = &settings.groq_model {
                provider = provider.with_model(model.as_str());
            }
            if let Some(base_url) = &settings.groq_base_url {
                provider = provider.with_base_url(base_url.as_str());
            }
            Box::new(provider)
        }
        ProviderKind::HuggingFace => {
            let api_key = settings.huggingface_api_key.as_deref().ok_or(
                GenerationError::MissingCredential {
                    provider: huggingface::PROVIDER_NAME,
                },
            )?;
            let mut provider = HuggingFaceProvider::new(api_key, settings.request_timeout)?;
            if let Some(model) = &settings.huggingface_model {
                provider = provider.with_model(model.as_str());
            }
            if let Some(base_url) = &settings.huggingface_base_url {
                provider = provider.with_base_url(base_url.as_str());
            }
            Box::new(provider)
        }
        ProviderKind::Ollama => {
            let mut provider =
                OllamaProvider::new(settings.ollama_base_url.as_str(), settings.request_timeout)?;
            if let Some(model) = &settings.ollama_model {
                provider = provider.with_model(model.as_str());
            }
            Box::new(provider)
        }
    };

    info!(
        target: "itinerary::provider",
        provider = provider.name(),
        "initialized LLM provider"
    );
    Ok(provider)
}

/// Build a provider from its backend name, e.g. `"ollama"`
pub fn build_provider_named(name: &str, settings: &ProviderSettings) -> Result<Box<dyn LlmProvider>> {
    let kind: ProviderKind = name.parse()?;
    build_provider(&settings.clone().with_provider(kind))
}
