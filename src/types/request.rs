use serde::{Deserialize, Serialize};

/// The two prompt strings handed to a provider for one generation call.
///
/// Providers never inspect the content; they only decide how the two
/// instructions are framed on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationRequest {
    system_instruction: String,
    user_instruction: String,
}

impl GenerationRequest {
    pub fn new(system_instruction: impl Into<String>, user_instruction: impl Into<String>) -> Self {
        Self {
            system_instruction: system_instruction.into(),
            user_instruction: user_instruction.into(),
        }
    }

    pub fn system_instruction(&self) -> &str {
        &self.system_instruction
    }

    pub fn user_instruction(&self) -> &str {
        &self.user_instruction
    }
}

/// Raw text returned by a successful generation call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationResult {
    pub text: String,
    /// Name of the backend that produced the text
    pub provider: String,
}

impl GenerationResult {
    pub fn new(text: impl Into<String>, provider: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            provider: provider.into(),
        }
    }

    pub fn into_text(self) -> String {
        self.text
    }
}
