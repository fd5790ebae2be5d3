//! Core graph types: handles, graph kinds, and traversal signals.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque handle to a vertex (monotonic per-graph counter).
///
/// Handles carry identity, not labels: two vertices created from equal
/// labels have distinct ids. A handle is only meaningful to the graph that
/// issued it; ids are never reused within one graph's lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct VertexId(u64);

impl VertexId {
    pub(crate) fn new(index: u64) -> Self {
        Self(index)
    }

    /// The raw index behind this handle.
    pub fn index(self) -> u64 {
        self.0
    }
}

impl fmt::Display for VertexId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{}", self.0)
    }
}

/// Opaque handle to an edge (monotonic per-graph counter).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EdgeId(u64);

impl EdgeId {
    pub(crate) fn new(index: u64) -> Self {
        Self(index)
    }

    /// The raw index behind this handle.
    pub fn index(self) -> u64 {
        self.0
    }
}

impl fmt::Display for EdgeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "e{}", self.0)
    }
}

/// The two graph kinds behind one [`LabeledGraph`](super::LabeledGraph)
/// interface.
///
/// This is deliberately a closed set: a third kind would widen this enum,
/// not add a subclass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GraphKind {
    /// Edges distinguish source from destination.
    Directed,
    /// Edges join two endpoints with no orientation; direction-specific
    /// queries are rejected.
    Undirected,
}

impl GraphKind {
    /// True for [`GraphKind::Directed`].
    pub fn is_directed(self) -> bool {
        matches!(self, GraphKind::Directed)
    }
}

impl fmt::Display for GraphKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GraphKind::Directed => write!(f, "directed"),
            GraphKind::Undirected => write!(f, "undirected"),
        }
    }
}

/// Flow-control signal returned by every traversal visitor hook.
///
/// These are not errors. `Reject` prunes the smallest scope that makes
/// sense for the hook that raised it, and `Stop` halts the whole traversal
/// while recording the vertex/edge in progress for later inspection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Control {
    /// Proceed normally.
    #[default]
    Continue,
    /// Skip the current admission or expansion; the traversal goes on.
    Reject,
    /// Halt the traversal immediately.
    Stop,
}

/// Lifecycle of a traversal session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TraversalState {
    /// No traversal has run on this session yet.
    Unstarted,
    /// A traversal is currently executing.
    Running,
    /// The last traversal exhausted its fringe.
    Completed,
    /// The last traversal was halted by [`Control::Stop`].
    Stopped,
}

impl fmt::Display for TraversalState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TraversalState::Unstarted => write!(f, "unstarted"),
            TraversalState::Running => write!(f, "running"),
            TraversalState::Completed => write!(f, "completed"),
            TraversalState::Stopped => write!(f, "stopped"),
        }
    }
}
