use crate::DataType;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Logical error class.
///
/// The sequential interpreter and the batch engine report failures through
/// different enums; the category is what they are compared by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorCategory {
    /// Operator/operand type incompatibility, cross-type ordering.
    Type,
    /// Name absent from the symbol table.
    Scope,
    /// Decision list without a reachable default.
    Structure,
    /// Malformed literal-to-type coercion or malformed wire text.
    Parse,
    /// External evaluator misbehaved or reported a node error.
    Protocol,
    /// Caller contract violation.
    Precondition,
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Type => write!(f, "type"),
            Self::Scope => write!(f, "scope"),
            Self::Structure => write!(f, "structure"),
            Self::Parse => write!(f, "parse"),
            Self::Protocol => write!(f, "protocol"),
            Self::Precondition => write!(f, "precondition"),
        }
    }
}

/// Evaluation error raised by value coercion, expression evaluation and the
/// decision-list state machine.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EvalError {
    /// Operands or values of incompatible types.
    #[error("type mismatch: {0}")]
    TypeMismatch(String),

    /// Variable not present in the symbol table.
    #[error("undeclared variable: {0}")]
    UndeclaredVariable(String),

    /// No guard held and the chain ran out of nodes.
    #[error("decision list lacks a default node (visited {visited} node(s))")]
    MissingDefault { visited: usize },

    /// Text could not be read as the requested type.
    #[error("cannot parse {text:?} as {target}")]
    Parse { text: String, target: DataType },

    /// Caller violated an operation's contract.
    #[error("precondition violated: {0}")]
    Precondition(String),

    /// Operation exists but has no semantics yet.
    #[error("unsupported operation: {0}")]
    Unsupported(String),

    /// A failure inside node `node` of a decision list.
    #[error("node {node}: {source}")]
    AtNode {
        node: usize,
        #[source]
        source: Box<EvalError>,
    },
}

impl EvalError {
    /// Wrap this error with the zero-based index of the node that raised it.
    pub fn at_node(self, node: usize) -> Self {
        Self::AtNode {
            node,
            source: Box::new(self),
        }
    }

    /// The logical class of this error, looking through node context.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::TypeMismatch(_) => ErrorCategory::Type,
            Self::UndeclaredVariable(_) => ErrorCategory::Scope,
            Self::MissingDefault { .. } => ErrorCategory::Structure,
            Self::Parse { .. } => ErrorCategory::Parse,
            Self::Precondition(_) | Self::Unsupported(_) => ErrorCategory::Precondition,
            Self::AtNode { source, .. } => source.category(),
        }
    }

    /// The node index attached by [`EvalError::at_node`], if any.
    pub fn node(&self) -> Option<usize> {
        match self {
            Self::AtNode { node, .. } => Some(*node),
            _ => None,
        }
    }

    /// The innermost error, without node context.
    pub fn root(&self) -> &EvalError {
        match self {
            Self::AtNode { source, .. } => source.root(),
            other => other,
        }
    }
}

/// Result alias for evaluation.
pub type EvalResult<T> = Result<T, EvalError>;
