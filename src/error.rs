//! Error types for the docdex full-text search core

use thiserror::Error;

pub type Result<T> = std::result::Result<T, FtsError>;

#[derive(Error, Debug)]
pub enum FtsError {
    #[error("configuration error: {0}")]
    Configuration(String),

    #[error("missing field accessor: {0}")]
    MissingAccessor(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

impl From<bincode::Error> for FtsError {
    fn from(err: bincode::Error) -> Self {
        FtsError::Serialization(err.to_string())
    }
}

impl From<serde_json::Error> for FtsError {
    fn from(err: serde_json::Error) -> Self {
        FtsError::Serialization(err.to_string())
    }
}
