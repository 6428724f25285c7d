use std::time::Duration;

use async_trait::async_trait;

use crate::domain::Transcription;

#[async_trait]
pub trait TranscriptionEngine: Send + Sync {
    async fn transcribe(
        &self,
        audio_data: &[u8],
        content_type: &str,
    ) -> Result<Transcription, TranscriptionError>;
}

#[derive(Debug, thiserror::Error)]
pub enum TranscriptionError {
    #[error("backend reported an error: {0}")]
    BackendReported(String),
    #[error("response decoding failed: {0}")]
    DecodingFailed(String),
    #[error("api request failed: {0}")]
    ApiRequestFailed(String),
    #[error("backend call timed out after {0:?}")]
    Timeout(Duration),
    #[error("backend call cancelled")]
    Cancelled,
    #[error("engine configuration: {0}")]
    Configuration(String),
}
