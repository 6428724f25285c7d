mod export_file_name;
mod export_path;
mod storage_path;
mod transcription;
mod upload;

pub use export_file_name::{ExportFileName, ExportFileNameError};
pub use export_path::ExportPath;
pub use storage_path::StoragePath;
pub use transcription::Transcription;
pub use upload::{UploadId, UploadRequest};
