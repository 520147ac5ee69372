use std::time::Duration;

use serde_json::Value;

use crate::error::{GenerationError, Result};

/// JSON-over-HTTP transport shared by the reqwest-backed providers
#[derive(Clone, Debug)]
pub(crate) struct HttpClient {
    client: reqwest::Client,
    provider: &'static str,
    timeout: Duration,
}

impl HttpClient {
    pub fn new(provider: &'static str, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|err| {
                GenerationError::Config(format!("Failed to build HTTP client: {err}"))
            })?;

        Ok(Self {
            client,
            provider,
            timeout,
        })
    }

    /// POST `body` and return the decoded JSON answer. Non-2xx statuses become
    /// [`GenerationError::Http`] with the server's error message when it sent one.
    pub async fn post_json(&self, url: &str, bearer: Option<&str>, body: &Value) -> Result<Value> {
        let mut request = self
            .client
            .post(url)
            .header("Content-Type", "application/json")
            .json(body);

        if let Some(token) = bearer {
            request = request.bearer_auth(token);
        }

        let response = request
            .send()
            .await
            .map_err(|err| self.transport_error(err))?;

        let status = response.status();
        let response_text = response
            .text()
            .await
            .map_err(|err| self.transport_error(err))?;

        if !status.is_success() {
            let api_message = serde_json::from_str::<Value>(&response_text)
                .ok()
                .and_then(|json| error_message(&json))
                .unwrap_or_else(|| response_text.trim().to_string());

            return Err(GenerationError::Http {
                provider: self.provider,
                status: status.as_u16(),
                message: api_message,
            });
        }

        serde_json::from_str(&response_text).map_err(|err| GenerationError::InvalidResponse {
            provider: self.provider,
            message: format!("Failed to parse JSON: {err}"),
        })
    }

    fn transport_error(&self, err: reqwest::Error) -> GenerationError {
        if err.is_timeout() {
            GenerationError::Timeout {
                provider: self.provider,
                timeout: self.timeout,
            }
        } else {
            GenerationError::Transport {
                provider: self.provider,
                message: err.to_string(),
            }
        }
    }
}

/// `{"error": "..."}` or `{"error": {"message": "..."}}`
fn error_message(json: &Value) -> Option<String> {
    let error = json.get("error")?;
    match error {
        Value::String(message) => Some(message.clone()),
        other => other
            .get("message")
            .and_then(|value| value.as_str())
            .map(|s| s.to_string()),
    }
}

/// Join `base` and `path` unless `base` already points at the endpoint
pub(crate) fn build_url(base: &str, path: &str) -> String {
    let trimmed = base.trim_end_matches('/');
    if trimmed.ends_with(path) {
        trimmed.to_string()
    } else {
        format!("{}/{}", trimmed, path)
    }
}
