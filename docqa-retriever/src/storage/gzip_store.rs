//! Gzip-compressed JSON implementation of [`IndexStore`].
//!
//! The whole index is one JSON document inside one gzip stream. Saving goes
//! through a temporary file in the destination directory which is renamed
//! over the destination once fully written, so an interrupted save leaves the
//! previous index in place. Compression and parsing run on the blocking pool.

use super::{Index, IndexStore};
use crate::error::{Result, RetrieverError};
use async_trait::async_trait;
use flate2::Compression;
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use std::fs::File;
use std::io::{BufReader, BufWriter, ErrorKind, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Stores indexes as `*.json.gz` files. See module docs for details.
#[derive(Debug, Clone, Copy, Default)]
pub struct GzipJsonStore {
    compression: Option<u32>,
}

impl GzipJsonStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a specific gzip level (0-9) instead of the default.
    pub fn with_level(level: u32) -> Self {
        Self {
            compression: Some(level.min(9)),
        }
    }

    fn compression(&self) -> Compression {
        self.compression
            .map(Compression::new)
            .unwrap_or_default()
    }

    fn save_blocking(index: &Index, path: &Path, compression: Compression) -> Result<()> {
        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };

        let tmp = NamedTempFile::new_in(&dir)?;
        {
            let mut encoder = GzEncoder::new(BufWriter::new(tmp.as_file()), compression);
            serde_json::to_writer(&mut encoder, index)
                .map_err(|e| RetrieverError::Io { source: e.into() })?;
            let mut writer = encoder.finish()?;
            writer.flush()?;
        }
        tmp.as_file().sync_all()?;
        tmp.persist(path).map_err(|e| RetrieverError::Io { source: e.error })?;
        Ok(())
    }

    fn load_blocking(path: &Path) -> Result<Index> {
        let file = File::open(path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => RetrieverError::IndexNotFound {
                path: path.to_path_buf(),
            },
            _ => RetrieverError::Io { source: e },
        })?;

        let decoder = GzDecoder::new(BufReader::new(file));
        let index: Index =
            serde_json::from_reader(decoder).map_err(|e| RetrieverError::corrupt(path, e))?;
        index
            .validate()
            .map_err(|e| RetrieverError::corrupt(path, e))?;
        Ok(index)
    }
}

#[async_trait]
impl IndexStore for GzipJsonStore {
    async fn save(&self, index: &Index, path: &Path) -> Result<()> {
        let index = index.clone();
        let path = path.to_path_buf();
        let compression = self.compression();
        let target = path.clone();
        tokio::task::spawn_blocking(move || Self::save_blocking(&index, &path, compression))
            .await??;
        tracing::info!("Wrote index to {}", target.display());
        Ok(())
    }

    async fn load(&self, path: &Path) -> Result<Index> {
        let path = path.to_path_buf();
        let index = tokio::task::spawn_blocking(move || Self::load_blocking(&path)).await??;
        tracing::debug!(
            "Loaded index: {} documents, {} embeddings",
            index.documents.len(),
            index.embeddings.len()
        );
        Ok(index)
    }
}
