use std::io;
use std::path::PathBuf;

use bytes::Bytes;
use chrono::NaiveDate;
use futures::stream::BoxStream;

use crate::domain::ExportPath;

#[async_trait::async_trait]
pub trait ExportStore: Send + Sync {
    /// Writes `text` to a new file at `path`. Never overwrites: an existing
    /// file yields [`ExportStoreError::AlreadyExists`].
    async fn create(&self, path: &ExportPath, text: &str) -> Result<PathBuf, ExportStoreError>;

    async fn open(
        &self,
        path: &ExportPath,
    ) -> Result<BoxStream<'static, Result<Bytes, io::Error>>, ExportStoreError>;

    /// Deletes every date directory strictly older than `cutoff`.
    async fn prune_before(&self, cutoff: NaiveDate) -> Result<usize, ExportStoreError>;
}

#[derive(Debug, thiserror::Error)]
pub enum ExportStoreError {
    #[error("file already exists: {0}")]
    AlreadyExists(String),
    #[error("file not found: {0}")]
    NotFound(String),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
}
