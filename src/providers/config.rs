use std::{fmt, str::FromStr, time::Duration};

use crate::error::{GenerationError, Result};

pub const DEFAULT_OLLAMA_BASE_URL: &str = "http://localhost:11434";
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// Supported generation backends
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProviderKind {
    /// Hosted chat completions (Groq, OpenAI-compatible)
    #[default]
    Groq,
    /// Hosted single-prompt text generation (HuggingFace Inference API)
    HuggingFace,
    /// Self-hosted Ollama server
    Ollama,
}

impl ProviderKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderKind::Groq => "groq",
            ProviderKind::HuggingFace => "huggingface",
            ProviderKind::Ollama => "ollama",
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProviderKind {
    type Err = GenerationError;

    fn from_str(value: &str) -> Result<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "groq" => Ok(ProviderKind::Groq),
            "huggingface" | "hf" => Ok(ProviderKind::HuggingFace),
            "ollama" => Ok(ProviderKind::Ollama),
            other => Err(GenerationError::UnknownProvider(other.to_string())),
        }
    }
}

/// Provider selection plus per-backend credentials and endpoints.
///
/// Built explicitly and handed to [`build_provider`](super::build_provider);
/// nothing here is cached process-wide.
#[derive(Clone)]
pub struct ProviderSettings {
    pub provider: ProviderKind,
    pub groq_api_key: Option<String>,
    pub groq_model: Option<String>,
    pub groq_base_url: Option<String>,
    pub huggingface_api_key: Option<String>,
    pub huggingface_model: Option<String>,
    pub huggingface_base_url: Option<String>,
    pub ollama_base_url: String,
    pub ollama_model: Option<String>,
    pub request_timeout: Duration,
}

impl Default for ProviderSettings {
    fn default() -> Self {
        Self {
            provider: ProviderKind::default(),
            groq_api_key: None,
            groq_model: None,
            groq_base_url: None,
            huggingface_api_key: None,
            huggingface_model: None,
            huggingface_base_url: None,
            ollama_base_url: DEFAULT_OLLAMA_BASE_URL.to_string(),
            ollama_model: None,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }
}

impl fmt::Debug for ProviderSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderSettings")
            .field("provider", &self.provider)
            .field("groq_api_key", &redact(&self.groq_api_key))
            .field("groq_model", &self.groq_model)
            .field("groq_base_url", &self.groq_base_url)
            .field("huggingface_api_key", &redact(&self.huggingface_api_key))
            .field("huggingface_model", &self.huggingface_model)
            .field("huggingface_base_url", &self.huggingface_base_url)
            .field("ollama_base_url", &self.ollama_base_url)
            .field("ollama_model", &self.ollama_model)
            .field("request_timeout", &self.request_timeout)
            .finish()
    }
}

fn redact(secret: &Option<String>) -> Option<&'static str> {
    secret.as_ref().map(|_| "***")
}

impl ProviderSettings {
    pub fn new(provider: ProviderKind) -> Self {
        Self {
            provider,
            ..Self::default()
        }
    }

    /// Read settings from process environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read settings through `lookup`, which maps a variable name to its value.
    /// Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let provider = match get("AI_PROVIDER") {
            Some(name) => name.parse()?,
            None => ProviderKind::default(),
        };

        let request_timeout = match get("AI_REQUEST_TIMEOUT_SECS") {
            Some(secs) => secs.parse::<u64>().map(Duration::from_secs).map_err(|err| {
                GenerationError::Config(format!(
                    "AI_REQUEST_TIMEOUT_SECS must be a whole number of seconds: {err}"
                ))
            })?,
            None => DEFAULT_REQUEST_TIMEOUT,
        };

        Ok(Self {
            provider,
            groq_api_key: get("GROQ_API_KEY"),
            groq_model: get("GROQ_MODEL"),
            groq_base_url: get("GROQ_BASE_URL"),
            huggingface_api_key: get("HUGGINGFACE_API_KEY"),
            huggingface_model: get("HUGGINGFACE_MODEL"),
            huggingface_base_url: get("HUGGINGFACE_BASE_URL"),
            ollama_base_url: get("OLLAMA_BASE_URL")
                .unwrap_or_else(|| DEFAULT_OLLAMA_BASE_URL.to_string()),
            ollama_model: get("OLLAMA_MODEL"),
            request_timeout,
        })
    }

    pub fn with_provider(mut self, provider: ProviderKind) -> Self {
        self.provider = provider;
        self
    }

    /// Set the credential of the selected provider. Ollama takes none.
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        let api_key = Some(api_key.into());
        match self.provider {
            ProviderKind::Groq => self.groq_api_key = api_key,
            ProviderKind::HuggingFace => self.huggingface_api_key = api_key,
            ProviderKind::Ollama => {}
        }
        self
    }

    /// Set the endpoint of the selected provider
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        match self.provider {
            ProviderKind::Groq => self.groq_base_url = Some(base_url),
            ProviderKind::HuggingFace => self.huggingface_base_url = Some(base_url),
            ProviderKind::Ollama => self.ollama_base_url = base_url,
        }
        self
    }

    /// Set the model of the selected provider
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        let model = Some(model.into());
        match self.provider {
            ProviderKind::Groq => self.groq_model = model,
            ProviderKind::HuggingFace => self.huggingface_model = model,
            ProviderKind::Ollama => self.ollama_model = model,
        }
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_provider_kind_parsing() {
        assert_eq!("Groq".parse::<ProviderKind>().unwrap(), ProviderKind::Groq);
        assert_eq!(
            " HuggingFace ".parse::<ProviderKind>().unwrap(),
            ProviderKind::HuggingFace
        );
        assert_eq!("OLLAMA".parse::<ProviderKind>().unwrap(), ProviderKind::Ollama);

        let err = "anthropic".parse::<ProviderKind>().unwrap_err();
        assert!(matches!(err, GenerationError::UnknownProvider(ref name) if name == "anthropic"));
    }

    #[test]
    fn test_from_lookup_defaults() {
        let settings = ProviderSettings::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(settings.provider, ProviderKind::Groq);
        assert!(settings.groq_api_key.is_none());
        assert_eq!(settings.ollama_base_url, DEFAULT_OLLAMA_BASE_URL);
        assert_eq!(settings.request_timeout, DEFAULT_REQUEST_TIMEOUT);
    }

    #[test]
    fn test_from_lookup_reads_values_and_ignores_blanks() {
        let settings = ProviderSettings::from_lookup(lookup_from(&[
            ("AI_PROVIDER", "ollama"),
            ("GROQ_API_KEY", "   "),
            ("OLLAMA_BASE_URL", "http://gpu-box:11434"),
            ("OLLAMA_MODEL", "llama3"),
            ("AI_REQUEST_TIMEOUT_SECS", "90"),
        ]))
        .unwrap();

        assert_eq!(settings.provider, ProviderKind::Ollama);
        assert!(settings.groq_api_key.is_none());
        assert_eq!(settings.ollama_base_url, "http://gpu-box:11434");
        assert_eq!(settings.ollama_model.as_deref(), Some("llama3"));
        assert_eq!(settings.request_timeout, Duration::from_secs(90));
    }

    #[test]
    fn test_from_lookup_rejects_unknown_provider_and_bad_timeout() {
        let err = ProviderSettings::from_lookup(lookup_from(&[("AI_PROVIDER", "bard")]))
            .unwrap_err();
        assert!(matches!(err, GenerationError::UnknownProvider(_)));

        let err = ProviderSettings::from_lookup(lookup_from(&[(
            "AI_REQUEST_TIMEOUT_SECS",
            "soon",
        )]))
        .unwrap_err();
        assert!(matches!(err, GenerationError::Config(_)));
    }

    #[test]
    fn test_builders_target_selected_provider() {
        let settings = ProviderSettings::new(ProviderKind::HuggingFace)
            .with_api_key("hf_secret")
            .with_model("tiiuae/falcon-7b-instruct");
        assert_eq!(settings.huggingface_api_key.as_deref(), Some("hf_secret"));
        assert_eq!(
            settings.huggingface_model.as_deref(),
            Some("tiiuae/falcon-7b-instruct")
        );
        assert!(settings.groq_api_key.is_none());
    }

    #[test]
    fn test_debug_redacts_credentials() {
        let settings = ProviderSettings::default().with_api_key("gsk_live_secret");
        let rendered = format!("{settings:?}");
        assert!(!rendered.contains("gsk_live_secret"));
        assert!(rendered.contains("***"));
    }
}
