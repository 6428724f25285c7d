use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use chrono::{TimeDelta, Utc};
use futures::StreamExt;
use futures::stream::BoxStream;
use object_store::local::LocalFileSystem;
use object_store::path::Path as StorePath;
use object_store::{MultipartUpload, ObjectStore, PutPayload};

use crate::application::ports::{StagingStore, StagingStoreError};
use crate::domain::StoragePath;

/// Staging area for uploads on the local filesystem.
pub struct LocalStagingStore {
    inner: Arc<LocalFileSystem>,
    base_path: PathBuf,
}

impl LocalStagingStore {
    pub fn new(base_path: PathBuf) -> Result<Self, StagingStoreError> {
        std::fs::create_dir_all(&base_path).map_err(StagingStoreError::Io)?;
        let fs = LocalFileSystem::new_with_prefix(&base_path)
            .map_err(|e| StagingStoreError::UploadFailed(e.to_string()))?;
        Ok(Self {
            inner: Arc::new(fs),
            base_path,
        })
    }

    pub fn base_path(&self) -> &PathBuf {
        &self.base_path
    }
}

#[async_trait::async_trait]
impl StagingStore for LocalStagingStore {
    async fn store(
        &self,
        path: &StoragePath,
        mut stream: BoxStream<'_, Result<Bytes, io::Error>>,
    ) -> Result<u64, StagingStoreError> {
        let mut upload = self
            .inner
            .put_multipart(&location(path))
            .await
            .map_err(|e| StagingStoreError::UploadFailed(e.to_string()))?;

        match copy_parts(&mut stream, upload.as_mut()).await {
            Ok(written) => {
                upload
                    .complete()
                    .await
                    .map_err(|e| StagingStoreError::UploadFailed(e.to_string()))?;
                Ok(written)
            }
            Err(e) => {
                if let Err(abort_err) = upload.abort().await {
                    tracing::warn!(error = %abort_err, path = %path, "Failed to abort partial upload");
                }
                Err(e)
            }
        }
    }

    async fn fetch(&self, path: &StoragePath) -> Result<Vec<u8>, StagingStoreError> {
        let object = self
            .inner
            .get(&location(path))
            .await
            .map_err(read_error)?;
        let body = object.bytes().await.map_err(read_error)?;
        Ok(body.to_vec())
    }

    async fn delete(&self, path: &StoragePath) -> Result<(), StagingStoreError> {
        match self.inner.delete(&location(path)).await {
            Ok(()) | Err(object_store::Error::NotFound { .. }) => Ok(()),
            Err(e) => Err(StagingStoreError::DeleteFailed(e.to_string())),
        }
    }

    async fn head(&self, path: &StoragePath) -> Result<u64, StagingStoreError> {
        let meta = self
            .inner
            .head(&location(path))
            .await
            .map_err(read_error)?;
        Ok(meta.size)
    }

    async fn sweep(&self, max_age: Duration) -> Result<usize, StagingStoreError> {
        let Some(cutoff) = TimeDelta::from_std(max_age)
            .ok()
            .and_then(|age| Utc::now().checked_sub_signed(age))
        else {
            return Ok(0);
        };

        let mut stale = Vec::new();
        let mut listing = self.inner.list(None);
        while let Some(meta) = listing.next().await {
            let meta = meta.map_err(|e| StagingStoreError::DownloadFailed(e.to_string()))?;
            if meta.last_modified < cutoff {
                stale.push(meta.location);
            }
        }
        drop(listing);

        for location in &stale {
            self.inner
                .delete(location)
                .await
                .map_err(|e| StagingStoreError::DeleteFailed(e.to_string()))?;
        }

        let partials = remove_stale_partials(&self.base_path, max_age).await?;

        Ok(stale.len() + partials)
    }
}

/// In-progress multipart files (`<name>#<n>`) are invisible to `list`, so a
/// crash mid-upload leaves them behind. Walk the directory for them directly.
async fn remove_stale_partials(root: &Path, max_age: Duration) -> Result<usize, StagingStoreError> {
    let mut removed = 0;
    let mut pending = vec![root.to_path_buf()];

    while let Some(dir) = pending.pop() {
        let mut entries = tokio::fs::read_dir(&dir).await?;
        while let Some(entry) = entries.next_entry().await? {
            let file_type = entry.file_type().await?;
            if file_type.is_dir() {
                pending.push(entry.path());
                continue;
            }
            if !entry.file_name().to_string_lossy().contains('#') {
                continue;
            }

            let age = entry
                .metadata()
                .await?
                .modified()?
                .elapsed()
                .unwrap_or_default();
            if age < max_age {
                continue;
            }

            match tokio::fs::remove_file(entry.path()).await {
                Ok(()) => removed += 1,
                Err(e) if e.kind() == io::ErrorKind::NotFound => {}
                Err(e) => return Err(StagingStoreError::DeleteFailed(e.to_string())),
            }
        }
    }

    Ok(removed)
}

async fn copy_parts(
    stream: &mut BoxStream<'_, Result<Bytes, io::Error>>,
    upload: &mut dyn MultipartUpload,
) -> Result<u64, StagingStoreError> {
    let mut written = 0u64;
    while let Some(chunk) = stream.next().await {
        let chunk = chunk?;
        if chunk.is_empty() {
            continue;
        }
        written += chunk.len() as u64;
        upload
            .put_part(PutPayload::from(chunk))
            .await
            .map_err(|e| StagingStoreError::UploadFailed(e.to_string()))?;
    }
    Ok(written)
}

fn location(path: &StoragePath) -> StorePath {
    StorePath::from(path.as_str())
}

fn read_error(e: object_store::Error) -> StagingStoreError {
    match e {
        object_store::Error::NotFound { path, .. } => StagingStoreError::NotFound(path),
        other => StagingStoreError::DownloadFailed(other.to_string()),
    }
}
