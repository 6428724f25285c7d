mod export_store;
mod staging_store;
mod transcription_engine;

pub use export_store::{ExportStore, ExportStoreError};
pub use staging_store::{StagingStore, StagingStoreError};
pub use transcription_engine::{TranscriptionEngine, TranscriptionError};
