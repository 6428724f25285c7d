mod create_text_file;
mod error;
mod health;
mod transcribe;

pub use create_text_file::{CreateTextFileRequest, attachment_disposition, create_text_file_handler};
pub use error::{ApiError, ErrorResponse};
pub use health::health_handler;
pub use transcribe::{
    AUDIO_FIELD, TranscriptResponse, TranscriptionPassthroughResponse, transcribe_handler,
};
