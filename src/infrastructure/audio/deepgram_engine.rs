use async_trait::async_trait;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use serde::Deserialize;
use serde_json::Value;

use crate::application::ports::{TranscriptionEngine, TranscriptionError};
use crate::domain::Transcription;

const DEFAULT_BASE_URL: &str = "https://api.deepgram.com";
const DEFAULT_MODEL: &str = "nova-2";

/// Deepgram prerecorded `listen` API client.
pub struct DeepgramEngine {
    client: reqwest::Client,
    api_key: String,
    endpoint: String,
    model: String,
}

impl DeepgramEngine {
    pub fn new(api_key: String, base_url: Option<String>, model: Option<String>) -> Self {
        let base_url = base_url.unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        Self {
            client: reqwest::Client::new(),
            api_key,
            endpoint: format!("{}/v1/listen", base_url.trim_end_matches('/')),
            model: model.unwrap_or_else(|| DEFAULT_MODEL.to_string()),
        }
    }
}

#[derive(Deserialize)]
struct ListenResponse {
    results: ListenResults,
}

#[derive(Deserialize)]
struct ListenResults {
    channels: Vec<ListenChannel>,
}

#[derive(Deserialize)]
struct ListenChannel {
    alternatives: Vec<ListenAlternative>,
}

#[derive(Deserialize)]
struct ListenAlternative {
    transcript: String,
    #[serde(default)]
    confidence: Option<f64>,
}

#[derive(Deserialize)]
struct ListenErrorBody {
    #[serde(default)]
    err_code: Option<String>,
    err_msg: String,
}

fn reported_error(raw: &Value) -> Option<String> {
    let body = ListenErrorBody::deserialize(raw).ok()?;
    Some(match body.err_code {
        Some(code) => format!("{}: {}", code, body.err_msg),
        None => body.err_msg,
    })
}

fn decode(raw: Value) -> Result<Transcription, TranscriptionError> {
    let response = ListenResponse::deserialize(&raw)
        .map_err(|e| TranscriptionError::DecodingFailed(format!("listen response: {}", e)))?;

    let alternative = response
        .results
        .channels
        .into_iter()
        .next()
        .ok_or_else(|| TranscriptionError::DecodingFailed("response has no channels".to_string()))?
        .alternatives
        .into_iter()
        .next()
        .ok_or_else(|| {
            TranscriptionError::DecodingFailed("first channel has no alternatives".to_string())
        })?;

    Ok(Transcription::new(
        alternative.transcript,
        alternative.confidence,
        raw,
    ))
}

#[async_trait]
impl TranscriptionEngine for DeepgramEngine {
    async fn transcribe(
        &self,
        audio_data: &[u8],
        content_type: &str,
    ) -> Result<Transcription, TranscriptionError> {
        tracing::debug!(
            model = %self.model,
            bytes = audio_data.len(),
            content_type = %content_type,
            "Sending audio to Deepgram"
        );

        let response = self
            .client
            .post(&self.endpoint)
            .query(&[("model", self.model.as_str())])
            .header(AUTHORIZATION, format!("Token {}", self.api_key))
            .header(CONTENT_TYPE, content_type)
            .body(audio_data.to_vec())
            .send()
            .await
            .map_err(|e| TranscriptionError::ApiRequestFailed(format!("request: {}", e)))?;

        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|e| TranscriptionError::ApiRequestFailed(format!("body: {}", e)))?;

        if !status.is_success() {
            let detail = serde_json::from_slice::<Value>(&body)
                .ok()
                .and_then(|raw| reported_error(&raw))
                .unwrap_or_else(|| String::from_utf8_lossy(&body).into_owned());
            return Err(TranscriptionError::BackendReported(format!(
                "status {}: {}",
                status, detail
            )));
        }

        let raw: Value = serde_json::from_slice(&body)
            .map_err(|e| TranscriptionError::DecodingFailed(format!("invalid json: {}", e)))?;

        if let Some(detail) = reported_error(&raw) {
            return Err(TranscriptionError::BackendReported(detail));
        }

        let transcription = decode(raw)?;

        tracing::info!(
            chars = transcription.transcript.len(),
            confidence = ?transcription.confidence,
            "Deepgram transcription completed"
        );

        Ok(transcription)
    }
}
