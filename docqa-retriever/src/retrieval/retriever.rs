//! Nearest-neighbour ranking and context packing.
//!
//! Ranking is an exhaustive scan: every indexed embedding is compared with the
//! query vector. The ordering lives in a list private to one call, so the
//! shared [`Index`] is only ever read and concurrent queries need no locking.
//!
//! Chunk text is not stored in the index. It is recovered by re-reading and
//! re-chunking the source document, which is why the chunker must be
//! deterministic. Each document is read at most once per call.

use crate::config::RetrievalConfig;
use crate::error::{Result, RetrieverError};
use crate::retrieval::source::SourceDocument;
use crate::storage::{DocumentId, Index};
use crate::vector::Vector;
use docqa_context::HtmlChunker;
use std::collections::HashMap;
use std::path::Path;
use tracing::debug;

/// A chunk selected as context for a query.
#[derive(Debug, Clone, PartialEq)]
pub struct ContextChunk {
    pub text: String,
    pub path: String,
    pub chunk_number: usize,
    /// Squared distance to the query vector
    pub distance: f64,
}

/// Orders every embedding by distance to `query`, nearest first.
///
/// Returns `(distance, embedding position)` pairs. Ties keep index order.
pub fn rank(index: &Index, query: &Vector) -> Result<Vec<(f64, usize)>> {
    let mut ranked = index
        .embeddings
        .iter()
        .enumerate()
        .map(|(position, embedding)| {
            query
                .distance(&embedding.vector)
                .map(|distance| (distance, position))
        })
        .collect::<Result<Vec<_>>>()?;
    ranked.sort_by(|a, b| a.0.total_cmp(&b.0));
    Ok(ranked)
}

/// Selects the nearest chunks whose texts fit in `config.max_context_bytes`.
///
/// Chunks are taken in rank order until the next one would overflow the
/// budget; nothing after that point is considered.
pub async fn retrieve(
    index: &Index,
    query: &Vector,
    config: &RetrievalConfig,
) -> Result<Vec<ContextChunk>> {
    if index.is_empty() || config.max_context_bytes == 0 {
        return Ok(Vec::new());
    }
    if query.len() != index.dimension() {
        return Err(RetrieverError::DimensionMismatch {
            expected: index.dimension(),
            actual: query.len(),
        });
    }

    let chunker = HtmlChunker::new();
    let mut cache: HashMap<DocumentId, Vec<String>> = HashMap::new();
    let mut selected = Vec::new();
    let mut used = 0usize;

    for (distance, position) in rank(index, query)? {
        let (chunk_ref, path) = index.resolve(position)?;

        if !cache.contains_key(&chunk_ref.document_id) {
            let chunks = load_chunks(index, chunk_ref.document_id, path, &chunker, config).await?;
            cache.insert(chunk_ref.document_id, chunks);
        }
        let chunks = &cache[&chunk_ref.document_id];
        let text = chunks
            .get(chunk_ref.chunk_number)
            .ok_or_else(|| RetrieverError::ChunkOutOfRange {
                path: path.to_string(),
                chunk_number: chunk_ref.chunk_number,
                available: chunks.len(),
            })?;

        if used + text.len() > config.max_context_bytes {
            break;
        }
        used += text.len();
        selected.push(ContextChunk {
            text: text.clone(),
            path: path.to_string(),
            chunk_number: chunk_ref.chunk_number,
            distance,
        });
    }

    debug!(
        "Selected {} chunks ({} bytes) from {} documents",
        selected.len(),
        used,
        cache.len()
    );
    Ok(selected)
}

async fn load_chunks(
    index: &Index,
    document_id: DocumentId,
    path: &str,
    chunker: &HtmlChunker,
    config: &RetrievalConfig,
) -> Result<Vec<String>> {
    let source = SourceDocument::read(Path::new(path)).await?;
    if config.verify_fingerprints {
        if let Some(expected) = index.fingerprint(document_id) {
            if expected != source.fingerprint {
                return Err(RetrieverError::StaleDocument {
                    path: path.to_string(),
                });
            }
        }
    }
    Ok(source.chunks(chunker))
}
