//! Embedding provider implementations

use crate::client::ApiClient;
use crate::config::ProviderConfig;
use crate::error::{ProviderError, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Result of embedding generation
#[derive(Debug, Clone, PartialEq)]
pub struct EmbeddingResult {
    /// The generated embeddings, one per input text, in input order
    pub embeddings: Vec<Vec<f64>>,
    /// The dimension of each embedding vector
    pub dimension: usize,
}

impl EmbeddingResult {
    /// Create a new embedding result.
    ///
    /// The dimension is inferred from the first embedding vector, or 0 when
    /// there are none.
    pub fn new(embeddings: Vec<Vec<f64>>) -> Self {
        let dimension = embeddings.first().map(|e| e.len()).unwrap_or(0);
        Self {
            embeddings,
            dimension,
        }
    }

    /// Returns the number of embedding vectors in this result.
    pub fn len(&self) -> usize {
        self.embeddings.len()
    }

    /// Returns `true` if this result contains no embedding vectors.
    pub fn is_empty(&self) -> bool {
        self.embeddings.is_empty()
    }
}

/// Trait for embedding providers that can generate embeddings from text
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Generate embeddings for multiple texts in one call.
    ///
    /// Implementations must return exactly one vector per input, in input
    /// order, or fail the whole batch.
    async fn embed_texts(&self, texts: &[String]) -> Result<EmbeddingResult>;

    /// Generate the embedding for a single text
    async fn embed_text(&self, text: &str) -> Result<Vec<f64>> {
        let result = self.embed_texts(&[text.to_string()]).await?;
        result
            .embeddings
            .into_iter()
            .next()
            .ok_or(ProviderError::CountMismatch {
                expected: 1,
                actual: 0,
            })
    }

    /// Get the name/identifier of this provider
    fn provider_name(&self) -> &str;
}

/// Embedding provider backed by an OpenAI-compatible `/embeddings` endpoint
#[derive(Debug, Clone)]
pub struct OpenAiEmbeddingProvider {
    client: ApiClient,
}

impl OpenAiEmbeddingProvider {
    /// Builds a client for the configured endpoint. Fails if the credential is missing.
    pub fn new(config: ProviderConfig) -> Result<Self> {
        Ok(Self {
            client: ApiClient::new(config)?,
        })
    }

    /// The model requested for every batch
    pub fn model(&self) -> &str {
        &self.client.config().embedding_model
    }
}

#[async_trait]
impl EmbeddingProvider for OpenAiEmbeddingProvider {
    async fn embed_texts(&self, texts: &[String]) -> Result<EmbeddingResult> {
        if texts.is_empty() {
            return Ok(EmbeddingResult::new(Vec::new()));
        }

        let request = EmbeddingRequest {
            model: self.model(),
            input: texts,
        };
        let mut response: EmbeddingResponse = self.client.post_json("embeddings", &request).await?;

        if response.data.len() != texts.len() {
            return Err(ProviderError::CountMismatch {
                expected: texts.len(),
                actual: response.data.len(),
            });
        }
        response.data.sort_by_key(|entry| entry.index);

        let result = EmbeddingResult::new(
            response
                .data
                .into_iter()
                .map(|entry| entry.embedding)
                .collect(),
        );
        tracing::debug!(
            "Embedded {} texts with {} (dimension {})",
            result.len(),
            self.model(),
            result.dimension
        );
        Ok(result)
    }

    fn provider_name(&self) -> &str {
        "openai"
    }
}

#[derive(Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    input: &'a [String],
}

#[derive(Debug, Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingData {
    embedding: Vec<f64>,
    index: usize,
}
