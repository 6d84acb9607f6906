//! Audio transcription component
//!
//! Features:
//! - Terminal execution modes chosen at construction: remote API or
//!   locally loaded model
//! - Lazy, warm-up-once local model loading
//! - Raw transcripts wrapped into the framework's document type
//! - whisper.cpp local backend behind the `whisper-cpp` feature

pub mod remote;
pub mod transcriber;
pub mod wav;

#[cfg(feature = "whisper-cpp")]
pub mod whisper_cpp;

pub use remote::RemoteWhisperClient;
pub use transcriber::{
    Device, ModelLoader, RawTranscript, SpeechModel, WhisperConfig, WhisperTranscriber,
};

use thiserror::Error;

/// Transcription errors
#[derive(Error, Debug)]
pub enum AudioError {
    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("model error: {0}")]
    Model(String),

    #[error("API error: {0}")]
    Api(String),

    #[error("audio error: {0}")]
    Audio(String),
}

impl From<AudioError> for docpipe_core::Error {
    fn from(err: AudioError) -> Self {
        match err {
            AudioError::Config(msg) => docpipe_core::Error::Config(msg),
            other => docpipe_core::Error::Transcription(other.to_string()),
        }
    }
}
