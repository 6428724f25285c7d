use serde_json::Value;

/// Result of a successful backend transcription.
#[derive(Debug, Clone, PartialEq)]
pub struct Transcription {
    pub transcript: String,
    pub confidence: Option<f64>,
    /// The backend document as received, returned verbatim in passthrough mode.
    pub raw: Value,
}

impl Transcription {
    pub fn new(transcript: impl Into<String>, confidence: Option<f64>, raw: Value) -> Self {
        Self {
            transcript: transcript.into(),
            confidence,
            raw,
        }
    }
}
