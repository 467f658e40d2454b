//! Source document records.
//!
//! Each document lives in its own JSON file with `title`, `link` and `html`
//! fields. Only the path of that file ends up in the index; the content is
//! re-read whenever a chunk has to be materialized.

use crate::html::chunk_html;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Errors raised while reading or parsing a document file.
#[derive(Debug, thiserror::Error)]
pub enum DocumentError {
    /// The file could not be read
    #[error("failed to read document {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file was read but is not a valid document record
    #[error("failed to parse document {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// A document to be indexed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub title: String,
    pub link: String,
    pub html: String,
}

impl Document {
    /// Parses a document from the raw bytes of its file.
    ///
    /// `path` is only used to label the error.
    pub fn from_slice(path: &Path, bytes: &[u8]) -> Result<Self, DocumentError> {
        serde_json::from_slice(bytes).map_err(|source| DocumentError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Reads and parses the document stored at `path`.
    pub fn read(path: &Path) -> Result<Self, DocumentError> {
        let bytes = std::fs::read(path).map_err(|source| DocumentError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_slice(path, &bytes)
    }

    /// Returns the document content split into chunks.
    pub fn chunks(&self) -> Vec<String> {
        chunk_html(&self.html)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_read_document() {
        let mut file = NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"title": "A", "link": "https://example.com/a", "html": "<h1>Intro</h1>hello world"}}"#
        )
        .unwrap();

        let doc = Document::read(file.path()).unwrap();
        assert_eq!(doc.title, "A");
        assert_eq!(doc.link, "https://example.com/a");
        assert_eq!(doc.chunks(), vec!["", " hello world"]);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = Document::read(&dir.path().join("missing.json")).unwrap_err();
        assert!(matches!(err, DocumentError::Io { .. }));
    }

    #[test]
    fn test_invalid_json_is_parse_error() {
        let err = Document::from_slice(Path::new("bad.json"), b"not json").unwrap_err();
        assert!(matches!(err, DocumentError::Parse { .. }));
        assert!(err.to_string().contains("bad.json"));
    }

    #[test]
    fn test_missing_field_is_parse_error() {
        let err =
            Document::from_slice(Path::new("partial.json"), br#"{"title": "x"}"#).unwrap_err();
        assert!(matches!(err, DocumentError::Parse { .. }));
    }
}
