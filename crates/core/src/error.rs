//! Workspace error type
//!
//! Component crates define their own error enums and convert into this
//! one at the crate boundary.

use thiserror::Error;

/// Top-level docpipe error
#[derive(Error, Debug)]
pub enum Error {
    /// Invalid configuration or parameter value, raised at construction
    /// or bind time
    #[error("invalid configuration: {0}")]
    Config(String),

    /// A required collaborator has not been bound yet
    #[error("component is not ready: {0}")]
    NotReady(String),

    /// The serialized form could not be mapped back to a component
    #[error("deserialization error: {0}")]
    Deserialization(String),

    /// Propagated from a document store
    #[error("store error: {0}")]
    Store(String),

    /// Propagated from a transcription backend
    #[error("transcription error: {0}")]
    Transcription(String),
}

pub type Result<T> = std::result::Result<T, Error>;
