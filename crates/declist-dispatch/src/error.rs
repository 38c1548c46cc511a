//! Batch dispatch error types.
//!
//! List and node indices are zero-based.

use declist_types::{ErrorCategory, EvalError};
use thiserror::Error;

/// Errors that abort a whole batch.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DispatchError {
    /// A list could not be flattened; `source` carries the node index.
    #[error("list {list}: cannot encode for dispatch: {source}")]
    Encode {
        list: usize,
        #[source]
        source: EvalError,
    },

    /// The executor returned the Error code for a node.
    #[error("executor reported an error at flat index {index} (list {list}, node {node})")]
    NodeFailed {
        index: usize,
        list: usize,
        node: usize,
    },

    /// Result array and node array differ in length.
    #[error("executor returned {actual} result code(s) for {expected} node(s)")]
    LengthMismatch { expected: usize, actual: usize },

    /// A code outside {0, 1, 2, 3}.
    #[error("invalid result code {code} at flat index {index}")]
    InvalidCode { index: usize, code: i32 },

    /// Every code of the list was Ignore: no guard held and no default.
    #[error("list {list}: no node produced an outcome across {nodes} node(s)")]
    Undecided { list: usize, nodes: usize },

    /// The batch exceeds the configured node limit.
    #[error("batch of {nodes} node(s) exceeds the limit of {limit}")]
    BatchTooLarge { nodes: usize, limit: usize },

    /// The executor crashed or did not respond.
    #[error("executor failed: {0}")]
    Executor(String),
}

impl DispatchError {
    /// The logical class, comparable with [`EvalError::category`].
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Encode { source, .. } => source.category(),
            Self::Undecided { .. } => ErrorCategory::Structure,
            Self::BatchTooLarge { .. } => ErrorCategory::Precondition,
            Self::NodeFailed { .. }
            | Self::LengthMismatch { .. }
            | Self::InvalidCode { .. }
            | Self::Executor(_) => ErrorCategory::Protocol,
        }
    }

    /// The list the failure was detected in, when there is one.
    pub fn list(&self) -> Option<usize> {
        match self {
            Self::Encode { list, .. }
            | Self::NodeFailed { list, .. }
            | Self::Undecided { list, .. } => Some(*list),
            _ => None,
        }
    }
}

/// Dispatch result type alias.
pub type DispatchResult<T> = Result<T, DispatchError>;
