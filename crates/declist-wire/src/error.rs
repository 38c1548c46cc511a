//! Wire decoding error types.

use declist_types::ErrorCategory;
use thiserror::Error;

/// Malformed wire text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("malformed wire text at byte {offset}: {message}")]
pub struct WireError {
    /// Byte offset into the decoded string.
    pub offset: usize,
    pub message: String,
}

impl WireError {
    /// An error at byte `offset` of the decoded text.
    pub fn new(offset: usize, message: impl Into<String>) -> Self {
        Self {
            offset,
            message: message.into(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        ErrorCategory::Parse
    }
}

/// Decoder result type alias.
pub type WireResult<T> = Result<T, WireError>;
