//! # pathgraph
//!
//! A generic labeled-graph toolkit: directed and undirected multigraphs,
//! fringe-driven traversal with visitor hooks, and A* shortest-path search,
//! plus two small tools built on top.
//!
//! ## Core Principles
//!
//! - **Labels Are Yours**: Any vertex and edge payload types behind opaque handles
//! - **Deterministic**: Creation-order iteration and documented tie-breaking
//! - **Explicit Control**: Visitors steer traversals with explicit signals
//! - **Zero Magic**: Contract violations are errors, never panics
//!
//! ## Architecture
//!
//! pathgraph is organized in layers:
//!
//! ```text
//! Tools (pathgraph-make, pathgraph-trip)
//!     ↓
//! Path Search (A*, weight capabilities)
//!     ↓
//! Traversal Engine (DFS, BFS, priority; visitor hooks)
//!     ↓
//! Labeled Graph (vertices, edges, adjacency)
//! ```
//!
//! ## Example
//!
//! ```rust
//! use pathgraph::{EdgeWeighting, LabeledGraph, MapWeighter, ZeroDistancer};
//!
//! let mut graph = LabeledGraph::directed();
//! let home = graph.add_vertex("home");
//! let town = graph.add_vertex("town");
//! let lake = graph.add_vertex("lake");
//! graph.add_edge(home, town, 4.0).unwrap();
//! graph.add_edge(town, lake, 3.0).unwrap();
//! graph.add_edge(home, lake, 9.0).unwrap();
//!
//! // Edge labels are their own weight.
//! struct Own;
//! impl EdgeWeighting<f64> for Own {
//!     fn weight(&self, label: &f64) -> f64 {
//!         *label
//!     }
//! }
//!
//! // Zero heuristic, so this is uniform-cost search.
//! let mut distances = MapWeighter::new();
//! let path = graph
//!     .shortest_path(home, lake, &ZeroDistancer, &mut distances, &Own)
//!     .unwrap()
//!     .unwrap();
//! assert_eq!(path.vertices, vec![home, town, lake]);
//! assert_eq!(path.total_weight, 7.0);
//! ```

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod error;
pub mod graph;
pub mod make;
pub mod trip;

// Re-export main types
pub use error::{GraphError, Result};
pub use graph::{
    shortest_path, shortest_path_weighted, Control, Distancer, EdgeId, EdgeWeighting, GraphKind,
    LabelComparator, LabeledGraph, MapWeighter, SearchPath, Traversal, TraversalState, VertexId,
    VertexWeighter, Visitor, Weightable, Weighted, ZeroDistancer,
};
