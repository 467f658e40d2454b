//! Question answering over a loaded index.
//!
//! One query is: embed the question, retrieve context chunks, fill the prompt
//! template, ask the generation provider. The engine holds the index behind an
//! `Arc` and never mutates it, so one engine can serve concurrent requests.

use crate::config::RetrievalConfig;
use crate::error::Result;
use crate::retrieval::retriever::{ContextChunk, retrieve};
use crate::storage::Index;
use crate::vector::Vector;
use docqa_embed::{EmbeddingProvider, GenerationProvider, GenerationSettings};
use std::sync::Arc;
use tracing::{debug, info};

/// Instruction placed before the context in every prompt.
pub const PROMPT_PREFIX: &str = "Answer the question as truthfully as possible using the provided text, and if the answer is not contained within the text below, say \"I don't know\"\n\n";

/// Fills the prompt template with the context chunks and the question.
///
/// Chunks are joined with a single space, in retrieval order.
pub fn build_prompt(chunks: &[ContextChunk], query: &str) -> String {
    let context = chunks
        .iter()
        .map(|chunk| chunk.text.as_str())
        .collect::<Vec<_>>()
        .join(" ");
    format!("{PROMPT_PREFIX}Context: {context}\n\nQ: {query}\nA:")
}

/// Answers questions against one index.
pub struct AnswerEngine {
    index: Arc<Index>,
    embedder: Arc<dyn EmbeddingProvider>,
    generator: Arc<dyn GenerationProvider>,
    retrieval: RetrievalConfig,
    settings: GenerationSettings,
}

impl AnswerEngine {
    pub fn new(
        index: Arc<Index>,
        embedder: Arc<dyn EmbeddingProvider>,
        generator: Arc<dyn GenerationProvider>,
        retrieval: RetrievalConfig,
    ) -> Self {
        Self {
            index,
            embedder,
            generator,
            retrieval,
            settings: GenerationSettings::deterministic(),
        }
    }

    pub fn index(&self) -> &Index {
        &self.index
    }

    /// Returns the generated text unmodified.
    ///
    /// Any embedding, retrieval or generation failure fails the whole query.
    pub async fn answer(&self, query: &str) -> Result<String> {
        let query_vector = Vector::from(self.embedder.embed_text(query).await?);
        let chunks = retrieve(&self.index, &query_vector, &self.retrieval).await?;
        debug!("Answering with {} context chunks", chunks.len());

        let prompt = build_prompt(&chunks, query);
        let answer = self.generator.complete(&prompt, &self.settings).await?;
        info!("Answered query ({} chunks, {} bytes)", chunks.len(), answer.len());
        Ok(answer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FailurePolicy;
    use crate::error::RetrieverError;
    use crate::retrieval::IndexingEngine;
    use crate::test_support::{StubEmbedder, StubGenerator, path_str, write_document};
    use tempfile::{TempDir, tempdir};

    fn chunk(text: &str) -> ContextChunk {
        ContextChunk {
            text: text.to_string(),
            path: "A".to_string(),
            chunk_number: 0,
            distance: 0.0,
        }
    }

    #[test]
    fn test_build_prompt_exact() {
        let prompt = build_prompt(&[chunk("alpha"), chunk("beta")], "What?");
        assert_eq!(
            prompt,
            "Answer the question as truthfully as possible using the provided text, and if the answer is not contained within the text below, say \"I don't know\"\n\nContext: alpha beta\n\nQ: What?\nA:"
        );
    }

    #[test]
    fn test_build_prompt_without_context() {
        let prompt = build_prompt(&[], "What?");
        assert!(prompt.ends_with("Context: \n\nQ: What?\nA:"));
    }

    async fn engine_with(generator: StubGenerator) -> (TempDir, AnswerEngine, Arc<StubGenerator>) {
        let dir = tempdir().unwrap();
        let a = write_document(dir.path(), "A", "<h1>Intro</h1>hello world");
        let b = write_document(dir.path(), "B", "no headings here");
        let embedder: Arc<StubEmbedder> = Arc::new(StubEmbedder::two_documents());
        let outcome = IndexingEngine::new(embedder.clone(), FailurePolicy::FailFast)
            .build_index([path_str(&a), path_str(&b)])
            .await
            .unwrap();

        let generator = Arc::new(generator);
        let engine = AnswerEngine::new(
            Arc::new(outcome.index),
            embedder,
            generator.clone(),
            RetrievalConfig::default(),
        );
        (dir, engine, generator)
    }

    #[tokio::test]
    async fn test_answer_returns_generated_text() -> Result<()> {
        let (_dir, engine, generator) = engine_with(StubGenerator::new(" It says hello.")).await;

        // The stub embeds this query as [0, 1], closest to document B.
        let answer = engine.answer("no headings here").await?;
        assert_eq!(answer, " It says hello.");

        let prompts = generator.prompts.lock().unwrap();
        assert_eq!(prompts.len(), 1);
        assert!(prompts[0].contains("Context: no headings here   hello world\n\nQ: no headings here\nA:"));
        Ok(())
    }

    #[tokio::test]
    async fn test_generation_failure_fails_query() {
        let (_dir, engine, _) = engine_with(StubGenerator::failing()).await;
        let err = engine.answer("anything").await.unwrap_err();
        assert!(matches!(err, RetrieverError::ProviderFailure { .. }));
    }

    #[tokio::test]
    async fn test_unreadable_source_fails_query() {
        let (_dir, engine, generator) = engine_with(StubGenerator::new("never")).await;
        std::fs::remove_file(&engine.index().documents[0]).unwrap();

        assert!(engine.answer("anything").await.is_err());
        assert!(generator.prompts.lock().unwrap().is_empty());
    }
}
