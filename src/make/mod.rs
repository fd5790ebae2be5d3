//! Make-style dependency build tool.
//!
//! A thin consumer of the graph core: makefile rules and recorded file
//! change dates become a directed dependency graph (one vertex per known
//! name, one `prerequisite -> target` edge per dependency), a Kahn
//! topological pass rejects cycles, and a recursive walk over the rules
//! decides which targets to rebuild and in which order to emit their
//! commands. The `pathgraph-make` binary wraps this module.

use thiserror::Error;

mod builder;
mod rules;

pub use builder::{BuildPlan, TargetBuilder};
pub use rules::{parse_fileinfo, parse_makefile, FileInfo, Rule};

/// Errors raised by the build tool.
#[derive(Error, Debug)]
pub enum MakeError {
    /// A makefile line matching neither the header, command, nor comment
    /// grammar.
    #[error("Syntax error in line: {line}")]
    Syntax {
        /// The offending line, verbatim.
        line: String,
    },

    /// A fileinfo line that does not parse, or a change date at or after
    /// the recorded last-build time.
    #[error("Malformed fileinfo line: {line}")]
    MalformedFileinfo {
        /// The offending line, verbatim.
        line: String,
    },

    /// The dependency graph contains a cycle.
    #[error("Circular dependency among targets")]
    CircularDependency,

    /// A target with neither a rule nor a recorded change date.
    #[error("Target does not exist: {0}")]
    UnknownTarget(String),

    /// A build was requested from a makefile with no rules.
    #[error("No targets defined")]
    NoTargets,

    /// IO error reading input files.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Graph-level contract violation.
    #[error("Graph error: {0}")]
    Graph(#[from] crate::GraphError),

    /// Serialization error rendering a build plan.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
