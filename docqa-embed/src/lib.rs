//! # docqa-embed
//!
//! Clients for the two external model calls used by docqa: turning text into
//! embedding vectors, and turning a prompt into generated text. Both talk to
//! OpenAI-compatible HTTP endpoints and sit behind small async traits so that
//! the indexing and retrieval code can be exercised with in-process stubs.
//!
//! ## Quick Start
//!
//! ```no_run
//! use docqa_embed::{EmbeddingProvider, OpenAiEmbeddingProvider, ProviderConfig};
//!
//! # async fn example() -> docqa_embed::Result<()> {
//! let provider = OpenAiEmbeddingProvider::new(ProviderConfig::new("sk-..."))?;
//!
//! let texts = vec!["Hello world".to_string(), "How are you?".to_string()];
//! let result = provider.embed_texts(&texts).await?;
//!
//! println!("Generated {} embeddings of dimension {}",
//!          result.len(), result.dimension);
//! # Ok(())
//! # }
//! ```
//!
//! ## Architecture
//!
//! - [`config`]: endpoint, credential and model settings
//! - [`provider`]: the [`EmbeddingProvider`] trait and its HTTP implementation
//! - [`completion`]: the [`GenerationProvider`] trait and its HTTP implementation
//! - [`error`]: error types and result handling
//!
//! ## Error Handling
//!
//! All operations return [`Result<T>`] using the crate's [`ProviderError`] type.
//! Batches are all-or-nothing: a failed call never yields a partial set of
//! vectors.

mod client;
pub mod completion;
pub mod config;
pub mod error;
pub mod provider;

// Re-export main types for easy access
pub use completion::{GenerationProvider, GenerationSettings, OpenAiCompletionProvider};
pub use config::{ProviderConfig, ProviderConfigBuilder};
pub use error::{ProviderError, Result};
pub use provider::{EmbeddingProvider, EmbeddingResult, OpenAiEmbeddingProvider};
