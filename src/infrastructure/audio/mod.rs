mod deepgram_engine;
mod mock_transcription_engine;
mod transcription_engine_factory;

pub use deepgram_engine::DeepgramEngine;
pub use mock_transcription_engine::MockTranscriptionEngine;
pub use transcription_engine_factory::{TranscriptionEngineFactory, TranscriptionProvider};
