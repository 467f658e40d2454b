//! Text generation provider implementations

use crate::client::ApiClient;
use crate::config::ProviderConfig;
use crate::error::{ProviderError, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Sampling parameters sent with every completion request.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GenerationSettings {
    pub max_tokens: usize,
    pub temperature: f32,
    pub top_p: f32,
    pub frequency_penalty: f32,
    pub presence_penalty: f32,
}

impl GenerationSettings {
    /// Deterministic sampling: temperature 0, top-p 1, no penalties, 300 tokens.
    pub const fn deterministic() -> Self {
        Self {
            max_tokens: 300,
            temperature: 0.0,
            top_p: 1.0,
            frequency_penalty: 0.0,
            presence_penalty: 0.0,
        }
    }
}

impl Default for GenerationSettings {
    fn default() -> Self {
        Self::deterministic()
    }
}

/// Trait for providers that turn a prompt into generated text
#[async_trait]
pub trait GenerationProvider: Send + Sync {
    /// Generate a completion for `prompt`, returning the raw text
    async fn complete(&self, prompt: &str, settings: &GenerationSettings) -> Result<String>;

    /// Get the name/identifier of this provider
    fn provider_name(&self) -> &str;
}

/// Generation provider backed by an OpenAI-compatible `/completions` endpoint
#[derive(Debug, Clone)]
pub struct OpenAiCompletionProvider {
    client: ApiClient,
}

impl OpenAiCompletionProvider {
    /// Builds a client for the configured endpoint. Fails if the credential is missing.
    pub fn new(config: ProviderConfig) -> Result<Self> {
        Ok(Self {
            client: ApiClient::new(config)?,
        })
    }

    /// The model requested for every completion
    pub fn model(&self) -> &str {
        &self.client.config().completion_model
    }
}

#[async_trait]
impl GenerationProvider for OpenAiCompletionProvider {
    async fn complete(&self, prompt: &str, settings: &GenerationSettings) -> Result<String> {
        let request = CompletionRequest {
            model: self.model(),
            prompt,
            settings,
        };
        let response: CompletionResponse = self.client.post_json("completions", &request).await?;
        response
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.text)
            .ok_or(ProviderError::EmptyResponse)
    }

    fn provider_name(&self) -> &str {
        "openai"
    }
}

#[derive(Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    #[serde(flatten)]
    settings: &'a GenerationSettings,
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    choices: Vec<CompletionChoice>,
}

#[derive(Debug, Deserialize)]
struct CompletionChoice {
    text: String,
}
