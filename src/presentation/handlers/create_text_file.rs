use axum::Json;
use axum::body::Body;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::http::header::{CONTENT_DISPOSITION, CONTENT_TYPE};
use axum::response::{IntoResponse, Response};
use serde::Deserialize;

use crate::application::services::TextExportRequest;
use crate::presentation::handlers::error::ApiError;
use crate::presentation::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateTextFileRequest {
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default, rename = "fileName")]
    pub file_name: Option<String>,
}

#[tracing::instrument(skip(state, payload))]
pub async fn create_text_file_handler(
    State(state): State<AppState>,
    payload: Result<Json<CreateTextFileRequest>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(payload) = payload.map_err(|e| {
        tracing::warn!(error = %e, "Rejected text file body");
        ApiError::InvalidJson
    })?;

    let export = state
        .text_export_service
        .export(TextExportRequest {
            text: payload.text,
            file_name: payload.file_name,
        })
        .await?;

    let stream = state.text_export_service.open(&export).await?;

    tracing::info!(file = %export.location.display(), "Sending file");

    Ok((
        [
            (CONTENT_TYPE, "text/plain; charset=utf-8".to_string()),
            (
                CONTENT_DISPOSITION,
                attachment_disposition(export.path.file_name()),
            ),
        ],
        Body::from_stream(stream),
    )
        .into_response())
}

/// `attachment; filename="..."` with anything that cannot live inside a
/// quoted ASCII header value replaced by `_`.
pub fn attachment_disposition(file_name: &str) -> String {
    let safe: String = file_name
        .chars()
        .map(|c| {
            if (c.is_ascii_graphic() && c != '"' && c != '\\') || c == ' ' {
                c
            } else {
                '_'
            }
        })
        .collect();
    format!("attachment; filename=\"{}\"", safe)
}
