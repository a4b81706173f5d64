//! Error types for expression construction and transformation

use thiserror::Error;

/// Result alias used throughout the crate
pub type Result<T> = std::result::Result<T, ExprError>;

/// Errors that can occur while building or transforming expressions
///
/// Every error is a synchronous, immediate failure. Nothing inside the crate
/// retries or recovers from one; a traversal that hits an error is aborted
/// as a whole and the error is handed back to the caller unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExprError {
    /// A terminal was built from a payload of the wrong type
    /// (text for a number, a number for a symbol)
    #[error("cannot build a {expected} terminal from {found}")]
    Construction {
        expected: &'static str,
        found: String,
    },

    /// A dispatch-based transformation met a node kind it has no rule for
    #[error("cannot {operation} a {kind}")]
    Unsupported {
        operation: &'static str,
        kind: String,
    },

    /// The input DAG holds more distinct nodes than the configured limit
    #[error("expression has more than {limit} distinct nodes")]
    MaxNodesExceeded { limit: usize },
}

impl ExprError {
    /// Create an `Unsupported` error for the given operation and node kind name
    pub fn unsupported(operation: &'static str, kind: impl Into<String>) -> Self {
        ExprError::Unsupported {
            operation,
            kind: kind.into(),
        }
    }

    pub(crate) fn construction(expected: &'static str, found: impl Into<String>) -> Self {
        ExprError::Construction {
            expected,
            found: found.into(),
        }
    }
}
