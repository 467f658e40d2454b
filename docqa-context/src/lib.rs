pub mod document;
pub mod html;

// Re-export the main chunking entry points for external use
pub use document::{Document, DocumentError};
pub use html::{HtmlChunker, chunk_html};
