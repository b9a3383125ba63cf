//! Errors - crate-level error type.
//!
//! "Nothing available" is never an error: extraction returns `Ok(None)`.
//! Storage failures keep their own variant so callers can tell them apart
//! from an empty queue.

use thiserror::Error;

use crate::ports::StoreError;

#[derive(Debug, Error)]
pub enum SpindleError {
    #[error("storage failure: {0}")]
    Store(#[from] StoreError),

    #[error("invalid queue name: {0}")]
    InvalidQueueName(String),

    #[error("invalid add options: {0}")]
    InvalidOptions(String),

    #[error("invalid configuration: {0}")]
    Config(String),
}

impl SpindleError {
    /// True when the backing store could not be used at all.
    pub fn is_unavailable(&self) -> bool {
        matches!(self, SpindleError::Store(StoreError::Unavailable(_)))
    }
}

pub type Result<T, E = SpindleError> = std::result::Result<T, E>;
