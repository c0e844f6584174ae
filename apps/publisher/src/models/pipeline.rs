use serde::{Deserialize, Serialize};

use crate::models::prompt::PromptSpec;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Provider {
    #[serde(rename = "openai-chat")]
    OpenAiChat,
}

impl Provider {
    pub fn as_str(&self) -> &'static str {
        match self {
            Provider::OpenAiChat => "openai-chat",
        }
    }
}

/// Names the environment variable holding a credential. The value itself is
/// resolved by whoever runs the pipeline, never stored here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecretRef(pub String);

impl SecretRef {
    pub fn env(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn name(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelDescriptor {
    pub provider: Provider,
    pub model: String,
    pub temperature: f32,
    pub api_key: SecretRef,
}

/// A prompt with exactly one model attached. The prompt's schema is the
/// model's structured-output contract.
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineSpec {
    pub prompt: PromptSpec,
    pub model: ModelDescriptor,
}

pub fn compose(prompt: PromptSpec, model: ModelDescriptor) -> PipelineSpec {
    PipelineSpec { prompt, model }
}
