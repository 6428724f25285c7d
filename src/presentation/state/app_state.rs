use std::sync::Arc;

use crate::application::services::{TextExportService, TranscriptionService};
use crate::presentation::auth::ApiKey;
use crate::presentation::config::ResponseFormat;

#[derive(Clone)]
pub struct AppState {
    pub transcription_service: Arc<TranscriptionService>,
    pub text_export_service: Arc<TextExportService>,
    pub response_format: ResponseFormat,
    pub api_key: Option<ApiKey>,
    pub max_upload_bytes: usize,
}
