use std::io;
use std::sync::Arc;

use bytes::Bytes;
use futures::stream::BoxStream;

use crate::application::ports::{StagingStore, StagingStoreError};
use crate::domain::StoragePath;

/// Owns one staged upload for the lifetime of a request.
///
/// Call [`StagedUpload::release`] on every normal exit path so the object is
/// gone before the response is sent. If the guard is dropped unreleased
/// (handler cancelled or panicked) deletion is scheduled on the runtime and
/// anything that still slips through is left for the startup sweep.
pub struct StagedUpload {
    store: Arc<dyn StagingStore>,
    path: StoragePath,
    size: u64,
    released: bool,
}

impl StagedUpload {
    pub async fn stage(
        store: Arc<dyn StagingStore>,
        path: StoragePath,
        stream: BoxStream<'_, Result<Bytes, io::Error>>,
    ) -> Result<Self, StagingStoreError> {
        match store.store(&path, stream).await {
            Ok(size) => {
                tracing::debug!(path = %path, bytes = size, "Upload staged");
                Ok(Self {
                    store,
                    path,
                    size,
                    released: false,
                })
            }
            Err(e) => {
                if let Err(cleanup) = store.delete(&path).await {
                    tracing::debug!(path = %path, error = %cleanup, "Nothing to clean after failed staging");
                }
                Err(e)
            }
        }
    }

    pub fn path(&self) -> &StoragePath {
        &self.path
    }

    pub fn size(&self) -> u64 {
        self.size
    }

    pub async fn release(mut self) {
        self.released = true;
        match self.store.delete(&self.path).await {
            Ok(()) => tracing::debug!(path = %self.path, "Staged upload removed"),
            Err(e) => {
                tracing::warn!(path = %self.path, error = %e, "Failed to remove staged upload")
            }
        }
    }
}

impl Drop for StagedUpload {
    fn drop(&mut self) {
        if self.released {
            return;
        }

        let store = Arc::clone(&self.store);
        let path = self.path.clone();
        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                handle.spawn(async move {
                    if let Err(e) = store.delete(&path).await {
                        tracing::warn!(path = %path, error = %e, "Deferred staging cleanup failed");
                    }
                });
            }
            Err(_) => {
                tracing::warn!(path = %self.path, "No runtime available; staged upload left for sweep");
            }
        }
    }
}
