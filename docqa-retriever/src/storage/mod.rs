//! Index data model and persistence.
//!
//! The index never stores chunk text. It stores, in three parallel-by-position
//! sequences, what is needed to find a chunk again:
//!
//! ```text
//! embeddings[i] ── chunk_id ──▶ chunk_refs[j] ── document_id ──▶ documents[k]
//!                                     └─ chunk_number: ordinal within chunks(documents[k])
//! ```
//!
//! Every reference is a position, not a stable identifier, so sequence order
//! is part of the data and must survive persistence unchanged.
//!
//! ## Key Components
//!
//! - **Index**: the in-memory record, with invariant checking and append helpers
//! - **IndexStore**: persistence seam (`save` / `load`)
//! - **GzipJsonStore**: gzip-compressed JSON file implementation

use crate::error::{Result, RetrieverError};
use crate::vector::Vector;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::Path;

pub mod gzip_store;

pub use gzip_store::GzipJsonStore;

/// Position of a document in [`Index::documents`].
pub type DocumentId = usize;

/// Position of a chunk reference in [`Index::chunk_refs`].
///
/// Assigned sequentially while indexing; it is not derived from chunk content.
pub type ChunkId = usize;

/// Back-reference from an embedding to the chunk it was computed from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChunkRef {
    #[serde(rename = "doc")]
    pub document_id: DocumentId,
    #[serde(rename = "chunk")]
    pub chunk_number: usize,
}

/// A vector embedding of a document chunk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Embedding {
    #[serde(rename = "vec")]
    pub vector: Vector,
    #[serde(rename = "chunk")]
    pub chunk_id: ChunkId,
}

/// An index of documents.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Index {
    /// Source paths of the indexed documents
    #[serde(rename = "docs")]
    pub documents: Vec<String>,
    pub embeddings: Vec<Embedding>,
    #[serde(rename = "chunks")]
    pub chunk_refs: Vec<ChunkRef>,
    /// blake3 hex digest of each document file, parallel to `documents`.
    /// Empty for indexes written without fingerprints.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fingerprints: Vec<String>,
}

/// Summary counts for an index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct IndexStats {
    pub documents: usize,
    pub embeddings: usize,
    pub chunk_refs: usize,
    pub dimension: usize,
}

impl Index {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.embeddings.is_empty()
    }

    /// Dimensionality shared by every vector, or 0 for an empty index.
    pub fn dimension(&self) -> usize {
        self.embeddings
            .first()
            .map(|embedding| embedding.vector.len())
            .unwrap_or(0)
    }

    pub fn stats(&self) -> IndexStats {
        IndexStats {
            documents: self.documents.len(),
            embeddings: self.embeddings.len(),
            chunk_refs: self.chunk_refs.len(),
            dimension: self.dimension(),
        }
    }

    /// Appends one document with one vector per chunk, in chunk order.
    ///
    /// Either everything is appended or, on a dimension mismatch against the
    /// vectors already present, nothing is.
    pub fn push_document(
        &mut self,
        path: impl Into<String>,
        fingerprint: impl Into<String>,
        vectors: Vec<Vector>,
    ) -> Result<DocumentId> {
        let expected = match self.embeddings.first() {
            Some(first) => Some(first.vector.len()),
            None => vectors.first().map(Vector::len),
        };
        if let Some(expected) = expected {
            if let Some(bad) = vectors.iter().find(|v| v.len() != expected) {
                return Err(RetrieverError::DimensionMismatch {
                    expected,
                    actual: bad.len(),
                });
            }
        }

        let document_id = self.documents.len();
        for (chunk_number, vector) in vectors.into_iter().enumerate() {
            self.embeddings.push(Embedding {
                vector,
                chunk_id: self.chunk_refs.len(),
            });
            self.chunk_refs.push(ChunkRef {
                document_id,
                chunk_number,
            });
        }
        self.documents.push(path.into());
        self.fingerprints.push(fingerprint.into());
        Ok(document_id)
    }

    /// Resolves an embedding position to its chunk reference and document path.
    pub fn resolve(&self, embedding_position: usize) -> Result<(ChunkRef, &str)> {
        let embedding = self.embeddings.get(embedding_position).ok_or_else(|| {
            RetrieverError::InvalidIndex(format!("no embedding at {embedding_position}"))
        })?;
        let chunk_ref = *self.chunk_refs.get(embedding.chunk_id).ok_or_else(|| {
            RetrieverError::InvalidIndex(format!("dangling chunk id {}", embedding.chunk_id))
        })?;
        let path = self.documents.get(chunk_ref.document_id).ok_or_else(|| {
            RetrieverError::InvalidIndex(format!(
                "dangling document id {}",
                chunk_ref.document_id
            ))
        })?;
        Ok((chunk_ref, path))
    }

    /// Fingerprint recorded for a document, if any.
    pub fn fingerprint(&self, document_id: DocumentId) -> Option<&str> {
        self.fingerprints
            .get(document_id)
            .map(String::as_str)
            .filter(|fp| !fp.is_empty())
    }

    /// Checks the positional invariants.
    ///
    /// Chunk ordinals can only be checked against the source documents, so
    /// they are verified at retrieval time instead.
    pub fn validate(&self) -> Result<()> {
        let dimension = self.dimension();
        for (i, embedding) in self.embeddings.iter().enumerate() {
            if embedding.chunk_id >= self.chunk_refs.len() {
                return Err(RetrieverError::InvalidIndex(format!(
                    "embedding {i} refers to chunk {} of {}",
                    embedding.chunk_id,
                    self.chunk_refs.len()
                )));
            }
            if embedding.vector.len() != dimension {
                return Err(RetrieverError::InvalidIndex(format!(
                    "embedding {i} has dimension {}, expected {dimension}",
                    embedding.vector.len()
                )));
            }
        }
        for (j, chunk_ref) in self.chunk_refs.iter().enumerate() {
            if chunk_ref.document_id >= self.documents.len() {
                return Err(RetrieverError::InvalidIndex(format!(
                    "chunk {j} refers to document {} of {}",
                    chunk_ref.document_id,
                    self.documents.len()
                )));
            }
        }
        if !self.fingerprints.is_empty() && self.fingerprints.len() != self.documents.len() {
            return Err(RetrieverError::InvalidIndex(format!(
                "{} fingerprints for {} documents",
                self.fingerprints.len(),
                self.documents.len()
            )));
        }
        Ok(())
    }
}

/// Content fingerprint of a document file.
pub fn fingerprint(bytes: &[u8]) -> String {
    blake3::hash(bytes).to_hex().to_string()
}

/// Persistence for whole indexes. See module docs for the data model.
#[async_trait]
pub trait IndexStore: Send + Sync {
    /// Replace whatever is stored at `path` with `index`.
    ///
    /// A failure must leave a previously stored index readable.
    async fn save(&self, index: &Index, path: &Path) -> Result<()>;

    /// Read the index stored at `path`.
    ///
    /// Fails with `IndexNotFound` when nothing is stored there and with
    /// `IndexCorrupt` when the stored bytes cannot be turned into a valid index.
    async fn load(&self, path: &Path) -> Result<Index>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Index {
        let mut index = Index::new();
        index
            .push_document(
                "A",
                "fa",
                vec![Vector::from(vec![1.0, 0.0]), Vector::from(vec![1.0, 0.0])],
            )
            .unwrap();
        index
            .push_document("B", "fb", vec![Vector::from(vec![0.0, 1.0])])
            .unwrap();
        index
    }

    #[test]
    fn test_push_document_assigns_positions() {
        let index = sample();

        assert_eq!(index.documents, vec!["A", "B"]);
        assert_eq!(index.embeddings.len(), 3);
        let ids: Vec<usize> = index.embeddings.iter().map(|e| e.chunk_id).collect();
        assert_eq!(ids, vec![0, 1, 2]);
        assert_eq!(
            index.chunk_refs,
            vec![
                ChunkRef {
                    document_id: 0,
                    chunk_number: 0
                },
                ChunkRef {
                    document_id: 0,
                    chunk_number: 1
                },
                ChunkRef {
                    document_id: 1,
                    chunk_number: 0
                },
            ]
        );
        assert!(index.validate().is_ok());
        assert_eq!(
            index.stats(),
            IndexStats {
                documents: 2,
                embeddings: 3,
                chunk_refs: 3,
                dimension: 2
            }
        );
    }

    #[test]
    fn test_push_document_rejects_dimension_mismatch() {
        let mut index = sample();
        let before = index.clone();

        let err = index
            .push_document("C", "fc", vec![Vector::from(vec![1.0, 2.0, 3.0])])
            .unwrap_err();
        assert!(matches!(
            err,
            RetrieverError::DimensionMismatch {
                expected: 2,
                actual: 3
            }
        ));
        assert_eq!(index, before);
    }

    #[test]
    fn test_push_document_rejects_ragged_first_batch() {
        let mut index = Index::new();
        let err = index
            .push_document(
                "A",
                "fa",
                vec![Vector::from(vec![1.0]), Vector::from(vec![1.0, 2.0])],
            )
            .unwrap_err();
        assert!(matches!(err, RetrieverError::DimensionMismatch { .. }));
        assert!(index.documents.is_empty());
    }

    #[test]
    fn test_resolve() {
        let index = sample();
        let (chunk_ref, path) = index.resolve(2).unwrap();
        assert_eq!(path, "B");
        assert_eq!(chunk_ref.chunk_number, 0);
        assert!(index.resolve(3).is_err());
    }

    #[test]
    fn test_validate_detects_dangling_references() {
        let mut index = sample();
        index.embeddings[0].chunk_id = 99;
        assert!(matches!(
            index.validate(),
            Err(RetrieverError::InvalidIndex(_))
        ));

        let mut index = sample();
        index.chunk_refs[1].document_id = 5;
        assert!(matches!(
            index.validate(),
            Err(RetrieverError::InvalidIndex(_))
        ));
    }

    #[test]
    fn test_serialized_field_names() {
        let value = serde_json::to_value(sample()).unwrap();
        assert_eq!(value["docs"][0], "A");
        assert_eq!(value["embeddings"][2]["vec"][1], 1.0);
        assert_eq!(value["embeddings"][2]["chunk"], 2);
        assert_eq!(value["chunks"][2]["doc"], 1);
        assert_eq!(value["chunks"][1]["chunk"], 1);
    }

    #[test]
    fn test_index_without_fingerprints_deserializes() {
        let json = r#"{"docs": ["A"], "embeddings": [{"vec": [1.0], "chunk": 0}], "chunks": [{"doc": 0, "chunk": 0}]}"#;
        let index: Index = serde_json::from_str(json).unwrap();
        assert!(index.fingerprints.is_empty());
        assert_eq!(index.fingerprint(0), None);
        assert!(index.validate().is_ok());
    }

    #[test]
    fn test_fingerprint_is_stable() {
        assert_eq!(fingerprint(b"hello"), fingerprint(b"hello"));
        assert_ne!(fingerprint(b"hello"), fingerprint(b"hello!"));
        assert_eq!(fingerprint(b"").len(), 64);
    }
}
