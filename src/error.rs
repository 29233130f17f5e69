//! Error types for the side-effecting seams
//!
//! None of these are fatal to gameplay: callers log them and carry on.

use thiserror::Error;

use crate::attempts::{AttemptEvent, Stage};

/// Failures talking to the persistent key-value store
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StorageError {
    #[error("storage is not available")]
    Unavailable,
    #[error("failed to read key `{key}`: {reason}")]
    Read { key: String, reason: String },
    #[error("failed to write key `{key}`: {reason}")]
    Write { key: String, reason: String },
    #[error("stored value for `{key}` is corrupt: {value:?}")]
    Corrupt { key: String, value: String },
}

/// Failures delivering a message to the host shell
#[derive(Debug, Error)]
pub enum HostError {
    #[error("failed to encode report: {0}")]
    Encode(#[from] serde_json::Error),
    #[error("host rejected message: {0}")]
    PostFailed(String),
}

/// Score bookkeeping failures in the attempt controller
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AttemptError {
    #[error("event {event:?} is not valid in stage {stage:?}")]
    InvalidTransition { stage: Stage, event: AttemptEvent },
    #[error("attempt {attempt} has no score slot")]
    SlotOutOfRange { attempt: u8 },
}
