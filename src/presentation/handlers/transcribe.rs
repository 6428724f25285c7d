use std::io;

use axum::Json;
use axum::extract::{Multipart, State};
use axum::response::{IntoResponse, Response};
use futures::{StreamExt, TryStreamExt};
use serde::Serialize;
use serde_json::Value;

use crate::application::services::StagedUpload;
use crate::domain::UploadRequest;
use crate::presentation::config::ResponseFormat;
use crate::presentation::handlers::error::ApiError;
use crate::presentation::state::AppState;

pub const AUDIO_FIELD: &str = "audio";

#[derive(Debug, Serialize)]
pub struct TranscriptResponse {
    pub result: String,
}

#[derive(Debug, Serialize)]
pub struct TranscriptionPassthroughResponse {
    pub transcription: Value,
}

#[tracing::instrument(skip(state, multipart))]
pub async fn transcribe_handler(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Response, ApiError> {
    let Some((upload, staged)) = stage_audio_field(&state, &mut multipart).await? else {
        tracing::warn!("Transcribe request with no file");
        return Err(ApiError::NoFileUploaded);
    };

    let transcription = state
        .transcription_service
        .relay(staged, &upload.content_type)
        .await?;

    tracing::info!(
        upload_id = %upload.id.as_uuid(),
        chars = transcription.transcript.len(),
        "Transcription returned"
    );

    let response = match state.response_format {
        ResponseFormat::Transcript => Json(TranscriptResponse {
            result: transcription.transcript,
        })
        .into_response(),
        ResponseFormat::Full => Json(TranscriptionPassthroughResponse {
            transcription: transcription.raw,
        })
        .into_response(),
    };

    Ok(response)
}

/// Walks the multipart body and stages the single `audio` file. Text fields
/// are skipped; any other file field is rejected, and a file staged before
/// the rejection is released first.
async fn stage_audio_field(
    state: &AppState,
    multipart: &mut Multipart,
) -> Result<Option<(UploadRequest, StagedUpload)>, ApiError> {
    let mut staged: Option<(UploadRequest, StagedUpload)> = None;

    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => return Ok(staged),
            Err(e) => {
                tracing::warn!(error = %e, "Failed to read multipart");
                release(staged).await;
                return Err(ApiError::from_multipart(&e));
            }
        };

        let Some(filename) = field.file_name().map(str::to_string) else {
            continue;
        };
        let name = field.name().unwrap_or_default().to_string();

        if name != AUDIO_FIELD || staged.is_some() {
            tracing::warn!(field = %name, "Unexpected file field");
            release(staged).await;
            return Err(ApiError::UnexpectedField(name));
        }

        let upload = UploadRequest::new(filename, field.content_type());
        tracing::debug!(
            filename = %upload.filename,
            content_type = %upload.content_type,
            "Processing file upload"
        );

        let stream = field.map_err(io::Error::other).boxed();
        let guard = state.transcription_service.stage(&upload, stream).await?;
        staged = Some((upload, guard));
    }
}

async fn release(staged: Option<(UploadRequest, StagedUpload)>) {
    if let Some((_, guard)) = staged {
        guard.release().await;
    }
}
