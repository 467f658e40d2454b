//! Error types for indexing, persistence and retrieval

use docqa_context::DocumentError;
use docqa_embed::ProviderError;
use std::path::PathBuf;

/// Result type for retriever operations.
pub type Result<T> = std::result::Result<T, RetrieverError>;

/// Every failure the indexing and query pipeline can surface.
///
/// Per-document kinds ([`DocumentUnreadable`](Self::DocumentUnreadable),
/// [`ProviderFailure`](Self::ProviderFailure),
/// [`DimensionMismatch`](Self::DimensionMismatch)) are recoverable during an
/// indexing run under the skip policy. At query time every kind aborts the
/// query.
#[derive(Debug, thiserror::Error)]
pub enum RetrieverError {
    /// A required setting (usually the provider credential) is absent
    #[error("missing configuration: {0}")]
    ConfigMissing(String),

    /// A source document is missing or not a valid document record
    #[error("document unreadable: {source}")]
    DocumentUnreadable {
        #[from]
        source: DocumentError,
    },

    /// An embedding or generation call failed
    #[error("provider failure: {source}")]
    ProviderFailure {
        #[from]
        source: ProviderError,
    },

    /// No persisted index exists at the expected location
    #[error("index not found at {}", path.display())]
    IndexNotFound { path: PathBuf },

    /// The persisted index exists but cannot be decompressed, parsed or trusted
    #[error("index at {} is corrupt: {reason}", path.display())]
    IndexCorrupt { path: PathBuf, reason: String },

    /// Two vectors that must be compared have different lengths
    #[error("vector dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    /// An in-memory index violates one of its positional invariants
    #[error("invalid index: {0}")]
    InvalidIndex(String),

    /// A source document changed since it was indexed
    #[error("document {path} changed since it was indexed")]
    StaleDocument { path: String },

    /// A chunk ordinal no longer exists in its re-chunked document
    #[error("document {path} has {available} chunks, chunk {chunk_number} requested")]
    ChunkOutOfRange {
        path: String,
        chunk_number: usize,
        available: usize,
    },

    /// Filesystem failure outside of document reads
    #[error("IO error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },

    /// A blocking task panicked or was cancelled
    #[error("background task failed: {source}")]
    Task {
        #[from]
        source: tokio::task::JoinError,
    },
}

impl RetrieverError {
    /// Whether the error concerns a single document and may be skipped
    /// during an indexing run.
    pub fn is_document_scoped(&self) -> bool {
        matches!(
            self,
            Self::DocumentUnreadable { .. }
                | Self::ProviderFailure { .. }
                | Self::DimensionMismatch { .. }
        )
    }

    pub(crate) fn corrupt(path: &std::path::Path, reason: impl std::fmt::Display) -> Self {
        Self::IndexCorrupt {
            path: path.to_path_buf(),
            reason: reason.to_string(),
        }
    }
}
