//! Error types for persistence

use thiserror::Error;

/// Storage error
#[derive(Error, Debug)]
pub enum StateError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Store file {0:?} could not be read, refusing to overwrite")]
    ReadOnly(std::path::PathBuf),
}

impl From<serde_json::Error> for StateError {
    fn from(e: serde_json::Error) -> Self {
        Self::Serialization(e.to_string())
    }
}

/// Result type alias
pub type StateResult<T> = Result<T, StateError>;
