mod staged_upload;
mod text_export_service;
mod transcription_service;

pub use staged_upload::StagedUpload;
pub use text_export_service::{TextExport, TextExportError, TextExportRequest, TextExportService};
pub use transcription_service::{TranscriptionService, TranscriptionServiceError};
