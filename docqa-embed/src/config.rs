//! Configuration for the provider clients

use crate::error::{ProviderError, Result};
use derive_builder::Builder;
use std::time::Duration;

/// Default base URL for OpenAI-compatible endpoints.
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// Default embedding model.
pub const DEFAULT_EMBEDDING_MODEL: &str = "text-embedding-ada-002";

/// Default completion model.
pub const DEFAULT_COMPLETION_MODEL: &str = "gpt-3.5-turbo-instruct";

/// Connection settings shared by the embedding and generation clients.
#[derive(Clone, Builder)]
#[builder(setter(into))]
pub struct ProviderConfig {
    /// Bearer credential sent with every request
    pub api_key: String,
    /// Base URL of the OpenAI-compatible API, without a trailing slash
    #[builder(default = "DEFAULT_BASE_URL.to_string()")]
    pub base_url: String,
    /// Model used for embeddings
    #[builder(default = "DEFAULT_EMBEDDING_MODEL.to_string()")]
    pub embedding_model: String,
    /// Model used for completions
    #[builder(default = "DEFAULT_COMPLETION_MODEL.to_string()")]
    pub completion_model: String,
    /// Per-request timeout
    #[builder(default = "Duration::from_secs(60)")]
    pub timeout: Duration,
    /// Total attempts for retryable failures (at least one)
    #[builder(default = "3")]
    pub max_retries: usize,
}

impl std::fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("embedding_model", &self.embedding_model)
            .field("completion_model", &self.completion_model)
            .field("timeout", &self.timeout)
            .field("max_retries", &self.max_retries)
            .finish()
    }
}

impl ProviderConfig {
    /// Create a new provider configuration using the builder
    pub fn builder() -> ProviderConfigBuilder {
        ProviderConfigBuilder::default()
    }

    /// Configuration with default endpoints and models for the given credential
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            embedding_model: DEFAULT_EMBEDDING_MODEL.to_string(),
            completion_model: DEFAULT_COMPLETION_MODEL.to_string(),
            timeout: Duration::from_secs(60),
            max_retries: 3,
        }
    }

    /// Set the base URL (builder style)
    pub fn with_base_url<S: Into<String>>(self, base_url: S) -> Self {
        Self {
            base_url: base_url.into(),
            ..self
        }
    }

    /// Set the number of attempts (builder style)
    pub fn with_max_retries(self, max_retries: usize) -> Self {
        Self {
            max_retries,
            ..self
        }
    }

    /// Full URL of an endpoint below the base URL, e.g. `endpoint("embeddings")`
    pub fn endpoint(&self, name: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), name)
    }

    /// Check that the configuration can be used to make requests
    pub fn validate(&self) -> Result<()> {
        if self.api_key.trim().is_empty() {
            return Err(ProviderError::MissingCredential);
        }
        if self.embedding_model.trim().is_empty() {
            return Err(ProviderError::invalid_config("missing embedding model name"));
        }
        if self.completion_model.trim().is_empty() {
            return Err(ProviderError::invalid_config("missing completion model name"));
        }
        if self.max_retries == 0 {
            return Err(ProviderError::invalid_config("max_retries must be at least 1"));
        }
        tracing::debug!("Provider configuration valid for {}", self.base_url);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let config = ProviderConfig::new("sk-test");

        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.embedding_model, DEFAULT_EMBEDDING_MODEL);
        assert_eq!(config.max_retries, 3);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builder_pattern() {
        let config = ProviderConfig::builder()
            .api_key("sk-test")
            .base_url("http://localhost:9999/v1/")
            .max_retries(1usize)
            .build()
            .unwrap();

        assert_eq!(config.completion_model, DEFAULT_COMPLETION_MODEL);
        assert_eq!(config.timeout, Duration::from_secs(60));
        assert_eq!(
            config.endpoint("embeddings"),
            "http://localhost:9999/v1/embeddings"
        );
    }

    #[test]
    fn test_builder_requires_api_key() {
        assert!(ProviderConfig::builder().build().is_err());
    }

    #[test]
    fn test_validate_blank_key() {
        let config = ProviderConfig::new("   ");
        assert!(matches!(
            config.validate(),
            Err(ProviderError::MissingCredential)
        ));
    }

    #[test]
    fn test_validate_zero_retries() {
        let config = ProviderConfig::new("sk-test").with_max_retries(0);
        assert!(matches!(
            config.validate(),
            Err(ProviderError::InvalidConfig { .. })
        ));
    }

    #[test]
    fn test_debug_redacts_key() {
        let config = ProviderConfig::new("sk-secret");
        let debug = format!("{config:?}");
        assert!(!debug.contains("sk-secret"));
        assert!(debug.contains("<redacted>"));
    }
}
