//! docqa-retriever: document indexing and retrieval-augmented answering
//!
//! This crate turns a set of HTML document records into a persisted vector
//! index, and answers natural-language questions by retrieving the chunks
//! nearest to the question and handing them to a text-generation model.
//!
//! ## Key Modules
//!
//! - **[`retrieval`]**: indexing engine, nearest-neighbour ranking, context packing
//! - **[`storage`]**: the positional index model and its gzip JSON persistence
//! - **[`answer`]**: prompt construction and the query pipeline
//! - **[`config`]**: process-wide settings resolved once at startup
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use docqa_embed::{OpenAiCompletionProvider, OpenAiEmbeddingProvider};
//! use docqa_retriever::{
//!     answer::AnswerEngine,
//!     config::AppConfig,
//!     storage::{GzipJsonStore, IndexStore},
//! };
//! use std::sync::Arc;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let config = AppConfig::new("index.json.gz").with_api_key("sk-...");
//! let provider = config.provider_config()?;
//!
//! let index = GzipJsonStore::new().load(&config.index_path).await?;
//! let engine = AnswerEngine::new(
//!     Arc::new(index),
//!     Arc::new(OpenAiEmbeddingProvider::new(provider.clone())?),
//!     Arc::new(OpenAiCompletionProvider::new(provider)?),
//!     config.retrieval,
//! );
//! println!("{}", engine.answer("What is docqa?").await?);
//! # Ok(())
//! # }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! paths → IndexingEngine → EmbeddingProvider → Index → GzipJsonStore
//!                                                ↓
//! question → EmbeddingProvider → retrieve → build_prompt → GenerationProvider → answer
//! ```

pub mod answer;
pub mod config;
pub mod error;
pub mod retrieval;
pub mod storage;
pub mod vector;

#[cfg(test)]
mod test_support;

pub use answer::AnswerEngine;
pub use config::{AppConfig, FailurePolicy, RetrievalConfig};
pub use error::{Result, RetrieverError};
pub use storage::{GzipJsonStore, Index, IndexStore};
pub use vector::Vector;
