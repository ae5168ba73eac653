use thiserror::Error;

use crate::types::ETag;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Entity already exists: {partition_key}/{row_key}")]
    EntityAlreadyExists {
        partition_key: String,
        row_key: String,
    },

    #[error("Entity not found: {partition_key}/{row_key}")]
    EntityNotFound {
        partition_key: String,
        row_key: String,
    },

    #[error("Precondition failed: expected etag {expected}, stored etag is {actual}")]
    PreconditionFailed { expected: ETag, actual: ETag },

    #[error("Invalid stored timestamp: {0}")]
    InvalidTimestamp(i64),

    #[error("Row encode error: {0}")]
    Encode(#[from] bincode::error::EncodeError),

    #[error("Row decode error: {0}")]
    Decode(#[from] bincode::error::DecodeError),
}

impl StoreError {
    pub(crate) fn not_found(partition_key: &str, row_key: &str) -> Self {
        StoreError::EntityNotFound {
            partition_key: partition_key.to_string(),
            row_key: row_key.to_string(),
        }
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid logging config: {0}")]
    Parse(#[from] toml::de::Error),
}

pub type StoreResult<T> = std::result::Result<T, StoreError>;
