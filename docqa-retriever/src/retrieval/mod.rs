//! Building an index from documents and querying it.
//!
//! - [`indexing_engine`]: chunk, embed and append documents, then persist
//! - [`retriever`]: rank embeddings against a query and pack context chunks
//! - [`source`]: reading document files and recomputing their chunks

pub mod indexing_engine;
pub mod retriever;
pub mod source;

pub use indexing_engine::{IndexingEngine, IndexingOutcome, ProcessingStats};
pub use retriever::{ContextChunk, rank, retrieve};
pub use source::SourceDocument;
