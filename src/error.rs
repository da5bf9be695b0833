//! Errors raised at collaborator boundaries
//!
//! The simulation itself is total; only storage, audio and configuration
//! loading can fail, and the session swallows those after logging them.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("storage unavailable: {0}")]
    StorageUnavailable(String),
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("audio playback rejected: {0}")]
    AudioRejected(String),
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

pub type Result<T> = std::result::Result<T, Error>;
