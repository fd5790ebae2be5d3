//! Trip planner over a road map.
//!
//! The second consumer of the graph core: a road map text file becomes a
//! directed `LabeledGraph<Location, Road>` (each road line contributes
//! one edge per travel direction), route queries run the
//! weight-capable-label A* variant under a Euclidean heuristic, and the
//! resulting edge sequences are collapsed into numbered driving
//! directions. The `pathgraph-trip` binary wraps this module.

use thiserror::Error;

mod map;
mod planner;

pub use map::{Direction, EuclideanDistancer, Location, Road, RoadMap};
pub use planner::{Leg, RoutePlanner, Trip};

/// Errors raised by the trip planner.
#[derive(Error, Debug)]
pub enum TripError {
    /// A map line matching neither the location, road, nor comment
    /// grammar.
    #[error("Syntax error in line: {line}")]
    Syntax {
        /// The offending line, verbatim.
        line: String,
    },

    /// A name that no location line defined.
    #[error("Unknown location: {0}")]
    UnknownLocation(String),

    /// No road sequence connects the two locations.
    #[error("impossible to travel from {from} to {to}")]
    NoRoute {
        /// Requested origin.
        from: String,
        /// Requested destination.
        to: String,
    },

    /// A trip request with fewer than two stops.
    #[error("A trip request needs at least two stops")]
    BadRequest,

    /// IO error reading the map or request.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Graph-level contract violation.
    #[error("Graph error: {0}")]
    Graph(#[from] crate::GraphError),

    /// Serialization error rendering directions.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
