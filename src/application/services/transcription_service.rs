use std::io;
use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use futures::stream::BoxStream;
use tokio_util::sync::CancellationToken;

use crate::application::ports::{
    StagingStore, StagingStoreError, TranscriptionEngine, TranscriptionError,
};
use crate::domain::{StoragePath, Transcription, UploadRequest};

use super::staged_upload::StagedUpload;

pub struct TranscriptionService {
    engine: Arc<dyn TranscriptionEngine>,
    staging_store: Arc<dyn StagingStore>,
    timeout: Duration,
    shutdown: CancellationToken,
}

impl TranscriptionService {
    pub fn new(
        engine: Arc<dyn TranscriptionEngine>,
        staging_store: Arc<dyn StagingStore>,
        timeout: Duration,
        shutdown: CancellationToken,
    ) -> Self {
        Self {
            engine,
            staging_store,
            timeout,
            shutdown,
        }
    }

    /// Stages, relays and cleans up in one call.
    pub async fn transcribe_upload(
        &self,
        upload: &UploadRequest,
        stream: BoxStream<'_, Result<Bytes, io::Error>>,
    ) -> Result<Transcription, TranscriptionServiceError> {
        let staged = self.stage(upload, stream).await?;
        self.relay(staged, &upload.content_type).await
    }

    pub async fn stage(
        &self,
        upload: &UploadRequest,
        stream: BoxStream<'_, Result<Bytes, io::Error>>,
    ) -> Result<StagedUpload, StagingStoreError> {
        let staged = StagedUpload::stage(
            Arc::clone(&self.staging_store),
            StoragePath::for_upload(&upload.id),
            stream,
        )
        .await?;

        tracing::info!(
            upload_id = %upload.id.as_uuid(),
            filename = %upload.filename,
            bytes = staged.size(),
            "Upload staged for transcription"
        );

        Ok(staged)
    }

    /// Sends a staged upload to the backend. The staged copy is removed
    /// before this returns, whatever the outcome.
    pub async fn relay(
        &self,
        staged: StagedUpload,
        content_type: &str,
    ) -> Result<Transcription, TranscriptionServiceError> {
        let result = self.call_backend(&staged, content_type).await;
        staged.release().await;
        result
    }

    async fn call_backend(
        &self,
        staged: &StagedUpload,
        content_type: &str,
    ) -> Result<Transcription, TranscriptionServiceError> {
        let audio = self.staging_store.fetch(staged.path()).await?;
        let call = tokio::time::timeout(self.timeout, self.engine.transcribe(&audio, content_type));

        tokio::select! {
            _ = self.shutdown.cancelled() => Err(TranscriptionError::Cancelled.into()),
            outcome = call => match outcome {
                Ok(result) => Ok(result?),
                Err(_) => Err(TranscriptionError::Timeout(self.timeout).into()),
            },
        }
    }

    pub async fn sweep_stale_uploads(&self, max_age: Duration) -> Result<usize, StagingStoreError> {
        let removed = self.staging_store.sweep(max_age).await?;
        if removed > 0 {
            tracing::info!(removed = removed, "Removed stale staged uploads");
        }
        Ok(removed)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum TranscriptionServiceError {
    #[error("staging: {0}")]
    Staging(#[from] StagingStoreError),
    #[error("transcription: {0}")]
    Transcription(#[from] TranscriptionError),
}
