//! Error types for the state graph.

use thiserror::Error;

use crate::graph::NodeId;

/// Boxed error returned by a fallible derivation function.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Result alias used throughout the crate.
pub type Result<T, E = GraphError> = std::result::Result<T, E>;

/// Errors that can occur while building, writing or reading a state graph.
#[derive(Debug, Error)]
pub enum GraphError {
    /// A list write addressed an index outside the valid range.
    ///
    /// `set_at` accepts `0..len`, `insert_at` accepts `0..=len`.
    /// Reads never produce this error; they yield `None` instead.
    #[error("index {index} out of range for list of length {len}")]
    IndexOutOfRange {
        /// The rejected index.
        index: usize,
        /// Length of the list at the time of the write.
        len: usize,
    },

    /// A derivation function failed while the node was being recomputed.
    ///
    /// The node stays dirty, so the next read retries the computation.
    #[error("derivation of node {node} failed: {source}")]
    Derivation {
        /// The node whose derivation failed.
        node: NodeId,
        /// The error returned by the derivation function.
        #[source]
        source: BoxError,
    },

    /// Resolution reached a node that is already being resolved.
    #[error("dependency cycle detected at node {0}")]
    CycleDetected(NodeId),

    /// The node was disposed and its slot vacated.
    #[error("node {0} has been disposed")]
    Disposed(NodeId),

    /// Disposal was refused because other nodes still derive from this one.
    #[error("node {node} still has {count} dependent(s)")]
    HasDependents {
        /// The node that was asked to be disposed.
        node: NodeId,
        /// Number of live dependents.
        count: usize,
    },

    /// A handle from another graph was passed where a node of this graph
    /// was expected.
    #[error("node {0} belongs to a different graph")]
    ForeignNode(NodeId),

    /// The graph was accessed from inside one of its own derivation
    /// functions.
    #[error("graph accessed re-entrantly from inside a derivation function")]
    Reentrant,

    /// The cached value does not have the type the handle expects.
    #[error("node {node} does not hold a value of type {expected}")]
    TypeMismatch {
        /// The node that was read.
        node: NodeId,
        /// Type name the handle expected.
        expected: &'static str,
    },
}

impl GraphError {
    /// Wrap an arbitrary derivation failure for `node`.
    pub fn derivation(node: NodeId, source: impl Into<BoxError>) -> Self {
        Self::Derivation {
            node,
            source: source.into(),
        }
    }

    /// Returns `true` for errors that leave the graph consistent and can be
    /// retried by reading again.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Derivation { .. } | Self::Reentrant)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_context() {
        let err = GraphError::IndexOutOfRange { index: 3, len: 2 };
        assert_eq!(err.to_string(), "index 3 out of range for list of length 2");

        let err = GraphError::HasDependents {
            node: NodeId::from_raw(7),
            count: 2,
        };
        assert_eq!(err.to_string(), "node #7 still has 2 dependent(s)");
    }

    #[test]
    fn derivation_error_exposes_source() {
        use std::error::Error as _;

        let err = GraphError::derivation(NodeId::from_raw(1), "boom");
        assert!(err.is_retryable());
        assert_eq!(err.source().map(|s| s.to_string()), Some("boom".to_string()));
        assert_eq!(err.to_string(), "derivation of node #1 failed: boom");
    }
}
