//! Core graph types and operations.
//!
//! This module defines the fundamental building blocks:
//! - [`LabeledGraph`]: The label-parameterized multigraph
//! - [`Traversal`] and [`Visitor`]: The fringe-driven exploration engine
//! - [`shortest_path`] / [`shortest_path_weighted`]: A* path search
//! - [`VertexWeighter`], [`EdgeWeighting`], [`Distancer`]: Weight and
//!   heuristic capabilities feeding the search

mod labeled;
mod search;
mod traversal;
mod types;
mod weights;

pub use labeled::LabeledGraph;
pub use search::{shortest_path, shortest_path_weighted, SearchPath};
pub use traversal::{LabelComparator, Traversal, Visitor};
pub use types::{Control, EdgeId, GraphKind, TraversalState, VertexId};
pub use weights::{
    Distancer, EdgeWeighting, MapWeighter, VertexWeighter, Weightable, Weighted, ZeroDistancer,
};
