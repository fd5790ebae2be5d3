//! Error types for graph operations.
//!
//! All fallible operations return [`Result<T>`] with context-rich error
//! messages. Traversal control signals (Stop/Reject) and an unreachable
//! search target are *not* errors; this enum covers contract violations
//! only.

use crate::graph::{EdgeId, VertexId};
use thiserror::Error;

/// Result type alias for graph operations.
pub type Result<T> = std::result::Result<T, GraphError>;

/// Contract-violation errors for all core graph operations.
///
/// Errors are designed to fail fast at the call site and name the handle
/// or operation that went wrong.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GraphError {
    /// Vertex handle not present in the graph
    #[error("Vertex not found: {vertex}")]
    VertexNotFound {
        /// Handle of the missing vertex
        vertex: VertexId,
    },

    /// Edge handle not present in the graph
    #[error("Edge not found: {edge}")]
    EdgeNotFound {
        /// Handle of the missing edge
        edge: EdgeId,
    },

    /// A vertex was passed to an edge query it is not incident to
    #[error("Vertex {vertex} is not an endpoint of edge {edge}")]
    NotAnEndpoint {
        /// The edge being queried
        edge: EdgeId,
        /// The vertex that is not one of its endpoints
        vertex: VertexId,
    },

    /// A direction-specific query was issued on an undirected graph
    #[error("Operation '{operation}' is not supported on an undirected graph")]
    DirectedOnly {
        /// Name of the rejected operation
        operation: &'static str,
    },

    /// Path search encountered an edge with a negative weight
    #[error("Negative weight on edge {edge}")]
    NegativeWeight {
        /// The offending edge
        edge: EdgeId,
    },
}

impl GraphError {
    /// Create a [`GraphError::VertexNotFound`] for the given handle.
    pub fn vertex_not_found(vertex: VertexId) -> Self {
        Self::VertexNotFound { vertex }
    }

    /// Create a [`GraphError::EdgeNotFound`] for the given handle.
    pub fn edge_not_found(edge: EdgeId) -> Self {
        Self::EdgeNotFound { edge }
    }
}
