use crate::error::Result;
use crate::storage::fingerprint;
use docqa_context::{Document, DocumentError, HtmlChunker};
use std::path::Path;

/// A document file read from disk, with the fingerprint of its raw bytes.
#[derive(Debug, Clone)]
pub struct SourceDocument {
    pub document: Document,
    pub fingerprint: String,
}

impl SourceDocument {
    /// Reads and parses the document at `path`.
    pub async fn read(path: &Path) -> Result<Self> {
        let bytes = tokio::fs::read(path)
            .await
            .map_err(|source| DocumentError::Io {
                path: path.to_path_buf(),
                source,
            })?;
        let document = Document::from_slice(path, &bytes)?;
        Ok(Self {
            document,
            fingerprint: fingerprint(&bytes),
        })
    }

    pub fn chunks(&self, chunker: &HtmlChunker) -> Vec<String> {
        let chunks = chunker.chunks(&self.document.html);
        tracing::debug!(
            "Chunked \"{}\" into {} chunks",
            self.document.title,
            chunks.len()
        );
        chunks
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RetrieverError;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_read_source_document() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("a.json");
        let raw = r#"{"title": "A", "link": "https://example.com", "html": "<h1>Intro</h1>hello world"}"#;
        std::fs::write(&path, raw)?;

        let source = SourceDocument::read(&path).await?;
        assert_eq!(source.document.title, "A");
        assert_eq!(source.fingerprint, fingerprint(raw.as_bytes()));
        assert_eq!(source.chunks(&HtmlChunker::new()), vec!["", " hello world"]);
        Ok(())
    }

    #[tokio::test]
    async fn test_missing_source_is_unreadable() {
        let dir = tempdir().unwrap();
        let err = SourceDocument::read(&dir.path().join("gone.json"))
            .await
            .unwrap_err();
        assert!(matches!(err, RetrieverError::DocumentUnreadable { .. }));
        assert!(err.is_document_scoped());
    }
}
