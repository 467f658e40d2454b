//! # docqa-server
//!
//! A small HTTP front end for docqa. It loads a persisted index once at
//! startup and answers questions submitted through an HTML form.
//!
//! ## Quick Start
//!
//! ### 1. Build an index
//! ```bash
//! find docs -name '*.json' | docqa index
//! ```
//!
//! ### 2. Start the server
//! ```bash
//! OPENAI_API_KEY=sk-... docqa-server --bind 127.0.0.1:8080
//! ```
//!
//! ### 3. Use as a library
//! ```no_run
//! use docqa_retriever::AppConfig;
//! use docqa_server::{ServerConfig, run_server};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let app = AppConfig::new("index.json.gz").with_api_key("sk-...");
//! run_server(ServerConfig::new("127.0.0.1:8080".parse()?, app)).await?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Routes
//!
//! - `GET /`: the question form
//! - `POST /`: form field `q`; renders the question and the generated answer
//! - `GET /healthz`: returns `ok`
//!
//! The index is shared read-only by every request. A failed query produces an
//! error page with status 500 and never an empty answer.

mod pages;
mod server;

pub use server::router;

use anyhow::{Context, Result};
use docqa_embed::{OpenAiCompletionProvider, OpenAiEmbeddingProvider};
use docqa_retriever::{AnswerEngine, AppConfig, GzipJsonStore, IndexStore};
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::info;

/// Configuration for the docqa HTTP server.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to listen on
    pub bind: SocketAddr,
    pub app: AppConfig,
}

impl ServerConfig {
    pub fn new(bind: SocketAddr, app: AppConfig) -> Self {
        Self { bind, app }
    }
}

/// Loads the index and builds the provider-backed answer engine.
///
/// Fails before anything is served when the credential is missing or the
/// index cannot be loaded.
pub async fn build_engine(app: &AppConfig) -> Result<AnswerEngine> {
    let provider = app.provider_config()?;
    let index = GzipJsonStore::new()
        .load(&app.index_path)
        .await
        .with_context(|| format!("failed to load index from {}", app.index_path.display()))?;
    info!(
        "Loaded index with {} documents and {} embeddings",
        index.documents.len(),
        index.embeddings.len()
    );

    Ok(AnswerEngine::new(
        Arc::new(index),
        Arc::new(OpenAiEmbeddingProvider::new(provider.clone())?),
        Arc::new(OpenAiCompletionProvider::new(provider)?),
        app.retrieval,
    ))
}

/// Runs the server until the listener fails.
pub async fn run_server(config: ServerConfig) -> Result<()> {
    let engine = build_engine(&config.app).await?;
    let app = router(Arc::new(engine));

    let listener = tokio::net::TcpListener::bind(config.bind)
        .await
        .with_context(|| format!("failed to bind {}", config.bind))?;
    info!("docqa-server listening on http://{}", config.bind);
    axum::serve(listener, app).await.context("server shutdown")?;
    Ok(())
}
