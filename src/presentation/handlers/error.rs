use axum::Json;
use axum::extract::multipart::MultipartError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use crate::application::ports::StagingStoreError;
use crate::application::services::{TextExportError, TranscriptionServiceError};

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Every failure a handler can answer with. Messages for 5xx variants are
/// deliberately generic; details go to the log.
#[derive(Debug)]
pub enum ApiError {
    NoFileUploaded,
    UnexpectedField(String),
    Multipart { status: StatusCode, message: String },
    InvalidJson,
    MissingText,
    MissingFileName,
    InvalidFileName,
    Unauthorized,
    TranscriptionFailed,
    ExportFailed,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::NoFileUploaded
            | Self::UnexpectedField(_)
            | Self::InvalidJson
            | Self::MissingText
            | Self::MissingFileName
            | Self::InvalidFileName => StatusCode::BAD_REQUEST,
            Self::Multipart { status, .. } => *status,
            Self::Unauthorized => StatusCode::FORBIDDEN,
            Self::TranscriptionFailed | Self::ExportFailed => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn message(&self) -> String {
        match self {
            Self::NoFileUploaded => "No file uploaded".to_string(),
            Self::UnexpectedField(_) => "Unexpected field".to_string(),
            Self::Multipart { message, .. } => message.clone(),
            Self::InvalidJson => "Invalid JSON body".to_string(),
            Self::MissingText => "Missing text content".to_string(),
            Self::MissingFileName => "Missing file name".to_string(),
            Self::InvalidFileName => "Invalid file name".to_string(),
            Self::Unauthorized => "Unauthorized: Invalid API Key".to_string(),
            Self::TranscriptionFailed => "Failed to process transcription".to_string(),
            Self::ExportFailed => "Failed to create text file".to_string(),
        }
    }

    pub fn from_multipart(error: &MultipartError) -> Self {
        Self::Multipart {
            status: error.status(),
            message: error.body_text(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            self.status(),
            Json(ErrorResponse {
                error: self.message(),
            }),
        )
            .into_response()
    }
}

impl From<StagingStoreError> for ApiError {
    fn from(error: StagingStoreError) -> Self {
        // A broken request body surfaces as an io error wrapping the
        // multipart error; that is the client's fault, not ours.
        if let StagingStoreError::Io(io) = &error {
            if let Some(multipart) = io
                .get_ref()
                .and_then(|inner| inner.downcast_ref::<MultipartError>())
            {
                tracing::warn!(error = %multipart, "Upload body rejected");
                return Self::from_multipart(multipart);
            }
        }
        tracing::error!(error = %error, "Error processing transcription");
        Self::TranscriptionFailed
    }
}

impl From<TranscriptionServiceError> for ApiError {
    fn from(error: TranscriptionServiceError) -> Self {
        match error {
            TranscriptionServiceError::Staging(e) => e.into(),
            TranscriptionServiceError::Transcription(e) => {
                tracing::error!(error = %e, "Error processing transcription");
                Self::TranscriptionFailed
            }
        }
    }
}

impl From<TextExportError> for ApiError {
    fn from(error: TextExportError) -> Self {
        match error {
            TextExportError::MissingText => Self::MissingText,
            TextExportError::MissingFileName => Self::MissingFileName,
            TextExportError::InvalidFileName(reason) => {
                tracing::warn!(reason = %reason, "Rejected export file name");
                Self::InvalidFileName
            }
            e @ (TextExportError::NameExhausted | TextExportError::Store(_)) => {
                tracing::error!(error = %e, "Error creating text file");
                Self::ExportFailed
            }
        }
    }
}
