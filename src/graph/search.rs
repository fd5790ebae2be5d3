//! Minimum-weight path computation.
//!
//! A* over a [`LabeledGraph`] with non-negative edge weights and an
//! admissible, consistent heuristic; with the zero heuristic
//! ([`ZeroDistancer`](super::weights::ZeroDistancer)) it degrades to
//! uniform-cost search.
//! The search runs its own open/closed-set loop rather than riding on the
//! traversal visitor protocol, because it must revisit fringe candidates
//! whenever a better tentative distance appears.
//!
//! Weights reach the search in one of two statically chosen ways, with
//! identical observable behavior: external accessor objects
//! ([`shortest_path`]) or weight-capable label types
//! ([`shortest_path_weighted`]).

use super::labeled::LabeledGraph;
use super::types::{EdgeId, VertexId};
use super::weights::{Distancer, EdgeWeighting, VertexWeighter, Weightable, Weighted};
use crate::error::{GraphError, Result};
use log::{debug, trace};
use serde::{Deserialize, Serialize};
use std::cmp::{Ordering, Reverse};
use std::collections::{BinaryHeap, HashMap, HashSet};

/// A source-to-target path found by the search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchPath {
    /// Vertices from source to target inclusive.
    pub vertices: Vec<VertexId>,
    /// Edges walked, one shorter than `vertices`.
    pub edges: Vec<EdgeId>,
    /// Sum of the walked edges' weights.
    pub total_weight: f64,
}

impl SearchPath {
    fn empty() -> Self {
        Self {
            vertices: Vec::new(),
            edges: Vec::new(),
            total_weight: 0.0,
        }
    }
}

/// Open-set entry ordered by estimated total weight, then by insertion
/// sequence so equal estimates pop first-inserted-first.
#[derive(Debug, Clone, Copy)]
struct OpenEntry {
    estimate: f64,
    sequence: u64,
    vertex: VertexId,
    distance: f64,
}

impl PartialEq for OpenEntry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for OpenEntry {}

impl PartialOrd for OpenEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for OpenEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        self.estimate
            .total_cmp(&other.estimate)
            .then_with(|| self.sequence.cmp(&other.sequence))
    }
}

/// Minimum-weight path from `from` to `to` with externally supplied
/// weight accessors.
///
/// Every vertex's tentative distance is first written to `vertex_weights`
/// as positive infinity, then the source as `0.0`; each improvement found
/// during the search is written through as well, so after the call the
/// store holds the final shortest distance of every vertex the search
/// finalized and positive infinity for vertices it never reached.
///
/// Among equal-weight shortest paths the result is deterministic: open-set
/// ties resolve in insertion order, so the path following earlier
/// adjacency positions wins.
///
/// # Parameters
///
/// * `graph` - The graph to search; untouched by this variant
/// * `from` - Source vertex
/// * `to` - Target vertex
/// * `heuristic` - Admissible, consistent estimate of remaining distance
/// * `vertex_weights` - Store receiving tentative distances per vertex
/// * `edge_weights` - Non-negative weight per edge label
///
/// # Returns
///
/// `Ok(Some(path))` source-to-target, `Ok(None)` when the target is
/// unreachable. A search from a vertex to itself yields the empty path
/// with weight `0.0`.
///
/// # Errors
///
/// Returns [`GraphError::VertexNotFound`] when either endpoint is not in
/// the graph and [`GraphError::NegativeWeight`] when a visited edge
/// weighs less than zero.
pub fn shortest_path<V, E, H, VW, EW>(
    graph: &LabeledGraph<V, E>,
    from: VertexId,
    to: VertexId,
    heuristic: &H,
    vertex_weights: &mut VW,
    edge_weights: &EW,
) -> Result<Option<SearchPath>>
where
    H: Distancer<V> + ?Sized,
    VW: VertexWeighter<V> + ?Sized,
    EW: EdgeWeighting<E> + ?Sized,
{
    debug!("Searching path {from} -> {to}");
    graph.vertex_label(from)?;
    graph.vertex_label(to)?;

    for v in graph.vertices() {
        vertex_weights.set_weight(graph.vertex_label(v)?, f64::INFINITY);
    }
    vertex_weights.set_weight(graph.vertex_label(from)?, 0.0);

    if from == to {
        return Ok(Some(SearchPath::empty()));
    }

    let mut dist: HashMap<VertexId, f64> = HashMap::new();
    let mut parents: HashMap<VertexId, EdgeId> = HashMap::new();
    let mut closed: HashSet<VertexId> = HashSet::new();
    let mut open: BinaryHeap<Reverse<OpenEntry>> = BinaryHeap::new();
    let mut sequence = 0u64;

    dist.insert(from, 0.0);
    open.push(Reverse(OpenEntry {
        estimate: heuristic.dist(graph.vertex_label(from)?, graph.vertex_label(to)?),
        sequence,
        vertex: from,
        distance: 0.0,
    }));

    while let Some(Reverse(entry)) = open.pop() {
        let v = entry.vertex;
        if closed.contains(&v) {
            continue;
        }
        // Lazy deletion: a stale entry superseded by a better path.
        if entry.distance > dist.get(&v).copied().unwrap_or(f64::INFINITY) {
            continue;
        }
        if v == to {
            trace!("Reached {to} at weight {}", entry.distance);
            return Ok(Some(reconstruct(graph, from, to, &parents, entry.distance)?));
        }
        closed.insert(v);

        for edge in graph.incident_edges(v)? {
            let neighbor = graph.other_endpoint(edge, v)?;
            if closed.contains(&neighbor) {
                continue;
            }
            let weight = edge_weights.weight(graph.edge_label(edge)?);
            if weight < 0.0 {
                return Err(GraphError::NegativeWeight { edge });
            }
            let candidate = entry.distance + weight;
            if candidate < dist.get(&neighbor).copied().unwrap_or(f64::INFINITY) {
                dist.insert(neighbor, candidate);
                parents.insert(neighbor, edge);
                vertex_weights.set_weight(graph.vertex_label(neighbor)?, candidate);
                sequence += 1;
                open.push(Reverse(OpenEntry {
                    estimate: candidate
                        + heuristic.dist(graph.vertex_label(neighbor)?, graph.vertex_label(to)?),
                    sequence,
                    vertex: neighbor,
                    distance: candidate,
                }));
            }
        }
    }

    trace!("{to} unreachable from {from}");
    Ok(None)
}

/// Minimum-weight path from `from` to `to` with weight-capable labels.
///
/// The counterpart of [`shortest_path`] for graphs whose vertex labels
/// implement [`Weightable`] and edge labels [`Weighted`]: tentative
/// distances are written into the vertex labels themselves, which is why
/// this variant takes the graph mutably. Everything else, including
/// tie-breaking and the unreachable and self-path results, behaves
/// identically.
///
/// # Errors
///
/// Returns [`GraphError::VertexNotFound`] when either endpoint is not in
/// the graph and [`GraphError::NegativeWeight`] when a visited edge
/// weighs less than zero.
pub fn shortest_path_weighted<V, E, H>(
    graph: &mut LabeledGraph<V, E>,
    from: VertexId,
    to: VertexId,
    heuristic: &H,
) -> Result<Option<SearchPath>>
where
    V: Weightable,
    E: Weighted,
    H: Distancer<V> + ?Sized,
{
    debug!("Searching path {from} -> {to} over weighted labels");
    graph.vertex_label(from)?;
    graph.vertex_label(to)?;

    let all: Vec<VertexId> = graph.vertices().collect();
    for v in all {
        graph.vertex_label_mut(v)?.set_weight(f64::INFINITY);
    }
    graph.vertex_label_mut(from)?.set_weight(0.0);

    if from == to {
        return Ok(Some(SearchPath::empty()));
    }

    let mut dist: HashMap<VertexId, f64> = HashMap::new();
    let mut parents: HashMap<VertexId, EdgeId> = HashMap::new();
    let mut closed: HashSet<VertexId> = HashSet::new();
    let mut open: BinaryHeap<Reverse<OpenEntry>> = BinaryHeap::new();
    let mut sequence = 0u64;

    dist.insert(from, 0.0);
    open.push(Reverse(OpenEntry {
        estimate: heuristic.dist(graph.vertex_label(from)?, graph.vertex_label(to)?),
        sequence,
        vertex: from,
        distance: 0.0,
    }));

    while let Some(Reverse(entry)) = open.pop() {
        let v = entry.vertex;
        if closed.contains(&v) {
            continue;
        }
        if entry.distance > dist.get(&v).copied().unwrap_or(f64::INFINITY) {
            continue;
        }
        if v == to {
            trace!("Reached {to} at weight {}", entry.distance);
            return Ok(Some(reconstruct(graph, from, to, &parents, entry.distance)?));
        }
        closed.insert(v);

        // The frontier is collected first so the label writes below do
        // not overlap the adjacency borrow.
        let mut frontier: Vec<(EdgeId, VertexId, f64)> = Vec::new();
        for edge in graph.incident_edges(v)? {
            let neighbor = graph.other_endpoint(edge, v)?;
            if closed.contains(&neighbor) {
                continue;
            }
            let weight = graph.edge_label(edge)?.weight();
            if weight < 0.0 {
                return Err(GraphError::NegativeWeight { edge });
            }
            frontier.push((edge, neighbor, weight));
        }

        for (edge, neighbor, weight) in frontier {
            let candidate = entry.distance + weight;
            if candidate < dist.get(&neighbor).copied().unwrap_or(f64::INFINITY) {
                dist.insert(neighbor, candidate);
                parents.insert(neighbor, edge);
                graph.vertex_label_mut(neighbor)?.set_weight(candidate);
                sequence += 1;
                open.push(Reverse(OpenEntry {
                    estimate: candidate
                        + heuristic.dist(graph.vertex_label(neighbor)?, graph.vertex_label(to)?),
                    sequence,
                    vertex: neighbor,
                    distance: candidate,
                }));
            }
        }
    }

    trace!("{to} unreachable from {from}");
    Ok(None)
}

/// Walk the recorded predecessor edges backward from `to` and return the
/// path source-to-target.
fn reconstruct<V, E>(
    graph: &LabeledGraph<V, E>,
    from: VertexId,
    to: VertexId,
    parents: &HashMap<VertexId, EdgeId>,
    total_weight: f64,
) -> Result<SearchPath> {
    let mut vertices = vec![to];
    let mut edges = Vec::new();
    let mut current = to;
    while current != from {
        if let Some(&edge) = parents.get(&current) {
            edges.push(edge);
            current = graph.other_endpoint(edge, current)?;
            vertices.push(current);
        } else {
            break;
        }
    }
    vertices.reverse();
    edges.reverse();
    Ok(SearchPath {
        vertices,
        edges,
        total_weight,
    })
}
