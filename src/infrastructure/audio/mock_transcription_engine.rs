use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use serde_json::json;

use crate::application::ports::{TranscriptionEngine, TranscriptionError};
use crate::domain::Transcription;

/// Returns a fixed transcript in the backend's response shape. Used in
/// scaffold mode.
pub struct MockTranscriptionEngine {
    transcript: String,
    delay: Duration,
    calls: AtomicUsize,
}

impl MockTranscriptionEngine {
    pub fn new(transcript: impl Into<String>) -> Self {
        Self {
            transcript: transcript.into(),
            delay: Duration::ZERO,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Default for MockTranscriptionEngine {
    fn default() -> Self {
        Self::new("Mock transcript")
    }
}

#[async_trait::async_trait]
impl TranscriptionEngine for MockTranscriptionEngine {
    async fn transcribe(
        &self,
        _audio_data: &[u8],
        _content_type: &str,
    ) -> Result<Transcription, TranscriptionError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        let raw = json!({
            "metadata": { "model_info": { "name": "mock" } },
            "results": {
                "channels": [
                    { "alternatives": [ { "transcript": self.transcript, "confidence": 1.0 } ] }
                ]
            }
        });
        Ok(Transcription::new(self.transcript.clone(), Some(1.0), raw))
    }
}
