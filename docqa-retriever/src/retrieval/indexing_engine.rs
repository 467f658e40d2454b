//! Builds a fresh index from a list of document paths.
//!
//! ## Pipeline Flow
//!
//! ```text
//! path → SourceDocument → HtmlChunker → EmbeddingProvider (one batch per document) → Index
//!                                                                                      ↓
//!                                                                                IndexStore::save
//! ```
//!
//! Documents are processed one at a time, in input order. Each document costs
//! exactly one embedding call covering all of its chunks, and either all of
//! its chunks make it into the index or none do.
//!
//! ## Failure Handling
//!
//! A document that cannot be read, parsed or embedded is handled according to
//! the run's [`FailurePolicy`]: the run either aborts (nothing is persisted,
//! the previous index file stays as it was) or the document is left out with
//! a warning. A read error on the path list itself ends the list early; the
//! documents indexed so far are still persisted.

use crate::config::FailurePolicy;
use crate::error::Result;
use crate::retrieval::source::SourceDocument;
use crate::storage::{Index, IndexStore};
use crate::vector::Vector;
use docqa_context::HtmlChunker;
use docqa_embed::{EmbeddingProvider, ProviderError};
use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::{debug, info, warn};

/// Result of indexing a single document
#[derive(Debug)]
pub struct FileProcessingResult {
    pub path: String,
    pub chunks_created: usize,
    pub processing_time: Duration,
}

/// Counters for one indexing run
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ProcessingStats {
    pub documents_indexed: usize,
    pub documents_skipped: usize,
    pub chunks_embedded: usize,
    /// The path list could not be read to the end
    pub interrupted: bool,
}

/// An index together with the statistics of the run that built it
#[derive(Debug)]
pub struct IndexingOutcome {
    pub index: Index,
    pub stats: ProcessingStats,
}

/// Orchestrates chunking and embedding of documents into an [`Index`]
pub struct IndexingEngine {
    provider: Arc<dyn EmbeddingProvider>,
    failure_policy: FailurePolicy,
    chunker: HtmlChunker,
}

impl std::fmt::Debug for IndexingEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IndexingEngine")
            .field("provider", &self.provider.provider_name())
            .field("failure_policy", &self.failure_policy)
            .finish()
    }
}

impl IndexingEngine {
    pub fn new(provider: Arc<dyn EmbeddingProvider>, failure_policy: FailurePolicy) -> Self {
        Self {
            provider,
            failure_policy,
            chunker: HtmlChunker::new(),
        }
    }

    pub fn failure_policy(&self) -> FailurePolicy {
        self.failure_policy
    }

    /// Chunks and embeds one document and appends it to `index`.
    ///
    /// `index` is left unchanged when this fails.
    pub async fn index_document(&self, index: &mut Index, path: &str) -> Result<FileProcessingResult> {
        let start_time = Instant::now();
        debug!("Processing document: {}", path);

        let source = SourceDocument::read(Path::new(path)).await?;
        let chunks = source.chunks(&self.chunker);

        let result = self.provider.embed_texts(&chunks).await?;
        if result.len() != chunks.len() {
            return Err(ProviderError::CountMismatch {
                expected: chunks.len(),
                actual: result.len(),
            }
            .into());
        }

        let vectors: Vec<Vector> = result.embeddings.into_iter().map(Vector::from).collect();
        index.push_document(path, source.fingerprint, vectors)?;

        info!("indexed {} ({} chunks)", path, chunks.len());
        Ok(FileProcessingResult {
            path: path.to_string(),
            chunks_created: chunks.len(),
            processing_time: start_time.elapsed(),
        })
    }

    /// Builds an index from `paths`, in order.
    pub async fn build_index<I, S>(&self, paths: I) -> Result<IndexingOutcome>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut index = Index::new();
        let mut stats = ProcessingStats::default();
        for path in paths {
            self.process(&mut index, &mut stats, path.as_ref()).await?;
        }
        Ok(IndexingOutcome { index, stats })
    }

    /// Builds an index from newline-delimited paths read from `reader`.
    ///
    /// Blank lines are ignored. A read error stops the listing but keeps the
    /// documents indexed so far.
    pub async fn build_index_from_reader<R>(&self, reader: R) -> Result<IndexingOutcome>
    where
        R: AsyncBufRead + Unpin,
    {
        let mut index = Index::new();
        let mut stats = ProcessingStats::default();
        let mut lines = reader.lines();
        loop {
            match lines.next_line().await {
                Ok(Some(line)) => {
                    let path = line.trim_end_matches('\r');
                    if path.trim().is_empty() {
                        continue;
                    }
                    self.process(&mut index, &mut stats, path).await?;
                }
                Ok(None) => break,
                Err(e) => {
                    warn!("failed to index all documents: {}", e);
                    stats.interrupted = true;
                    break;
                }
            }
        }
        Ok(IndexingOutcome { index, stats })
    }

    /// Builds an index from `reader` and persists it at `index_path`.
    ///
    /// Nothing is written when the build fails.
    pub async fn rebuild<R, S>(&self, reader: R, store: &S, index_path: &Path) -> Result<ProcessingStats>
    where
        R: AsyncBufRead + Unpin,
        S: IndexStore + ?Sized,
    {
        let outcome = self.build_index_from_reader(reader).await?;
        store.save(&outcome.index, index_path).await?;
        info!(
            "Indexed {} documents ({} chunks, {} skipped)",
            outcome.stats.documents_indexed,
            outcome.stats.chunks_embedded,
            outcome.stats.documents_skipped
        );
        Ok(outcome.stats)
    }

    async fn process(&self, index: &mut Index, stats: &mut ProcessingStats, path: &str) -> Result<()> {
        match self.index_document(index, path).await {
            Ok(result) => {
                stats.documents_indexed += 1;
                stats.chunks_embedded += result.chunks_created;
                debug!("Indexed {} in {:?}", result.path, result.processing_time);
                Ok(())
            }
            Err(e) if e.is_document_scoped() && self.failure_policy == FailurePolicy::SkipAndWarn => {
                warn!("Skipping {}: {}", path, e);
                stats.documents_skipped += 1;
                Ok(())
            }
            Err(e) => Err(e),
        }
    }
}
