use std::time::Duration;

use thiserror::Error;

/// Failure raised while building a provider or running a generation call
#[derive(Error, Debug)]
pub enum GenerationError {
    #[error("{provider} API key not configured")]
    MissingCredential { provider: &'static str },

    #[error("Unknown AI provider: {0}")]
    UnknownProvider(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("{provider} request failed: {message}")]
    Transport {
        provider: &'static str,
        message: String,
    },

    #[error("{provider} request timed out after {secs}s", secs = .timeout.as_secs())]
    Timeout {
        provider: &'static str,
        timeout: Duration,
    },

    #[error("{provider} returned HTTP {status}: {message}")]
    Http {
        provider: &'static str,
        status: u16,
        message: String,
    },

    #[error("{0} returned no content")]
    EmptyResponse(&'static str),

    #[error("{provider} returned an unreadable response: {message}")]
    InvalidResponse {
        provider: &'static str,
        message: String,
    },

    #[error("OpenAI-compatible API error: {0}")]
    OpenAI(#[from] async_openai::error::OpenAIError),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, GenerationError>;

impl GenerationError {
    /// Whether a caller-side retry could plausibly succeed. Nothing in this
    /// crate retries on its own.
    pub fn is_retryable(&self) -> bool {
        match self {
            GenerationError::Timeout { .. } | GenerationError::Transport { .. } => true,
            GenerationError::Http { status, .. } => *status == 429 || *status >= 500,
            GenerationError::OpenAI(openai_err) => {
                matches!(
                    openai_err,
                    async_openai::error::OpenAIError::ApiError(_)
                        | async_openai::error::OpenAIError::Reqwest(_)
                )
            }
            _ => false,
        }
    }

    /// True for failures detected while constructing a provider
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            GenerationError::MissingCredential { .. }
                | GenerationError::UnknownProvider(_)
                | GenerationError::Config(_)
        )
    }

    /// Get the error code for structured responses
    pub fn error_code(&self) -> &'static str {
        match self {
            GenerationError::MissingCredential { .. } => "MISSING_CREDENTIAL",
            GenerationError::UnknownProvider(_) => "UNKNOWN_PROVIDER",
            GenerationError::Config(_) => "CONFIG_ERROR",
            GenerationError::Transport { .. } => "TRANSPORT_ERROR",
            GenerationError::Timeout { .. } => "TIMEOUT_ERROR",
            GenerationError::Http { .. } => "HTTP_ERROR",
            GenerationError::EmptyResponse(_) => "EMPTY_RESPONSE",
            GenerationError::InvalidResponse { .. } => "INVALID_RESPONSE",
            GenerationError::OpenAI(_) => "OPENAI_ERROR",
        }
    }

    /// HTTP status an outer web layer should answer with
    pub fn status_code(&self) -> u16 {
        500
    }

    /// Convert to a structured error payload
    pub fn to_error_payload(&self) -> serde_json::Value {
        serde_json::json!({
            "error": {
                "code": self.error_code(),
                "message": self.to_string(),
                "retryable": self.is_retryable()
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_credential_message() {
        let err = GenerationError::MissingCredential { provider: "Groq" };
        assert_eq!(err.to_string(), "Groq API key not configured");
        assert!(err.is_configuration());
        assert!(!err.is_retryable());
    }

    #[test]
    fn test_timeout_message_and_payload() {
        let err = GenerationError::Timeout {
            provider: "Ollama",
            timeout: Duration::from_secs(60),
        };
        assert_eq!(err.to_string(), "Ollama request timed out after 60s");

        let payload = err.to_error_payload();
        assert_eq!(payload["error"]["code"], "TIMEOUT_ERROR");
        assert_eq!(payload["error"]["retryable"], true);
    }

    #[test]
    fn test_http_retryable_only_for_server_side_statuses() {
        let server = GenerationError::Http {
            provider: "HuggingFace",
            status: 503,
            message: "loading".to_string(),
        };
        let client = GenerationError::Http {
            provider: "HuggingFace",
            status: 401,
            message: "bad token".to_string(),
        };
        assert!(server.is_retryable());
        assert!(!client.is_retryable());
        assert_eq!(client.status_code(), 500);
    }
}
