//! The labeled multigraph at the core of the crate.

use super::search::SearchPath;
use super::types::{EdgeId, GraphKind, VertexId};
use super::weights::{Distancer, EdgeWeighting, VertexWeighter, Weightable, Weighted};
use crate::error::{GraphError, Result};
use log::{debug, trace};
use std::cmp::Ordering;
use std::collections::{BTreeMap, HashSet};

/// Per-vertex bookkeeping. For undirected graphs `out_edges` is the single
/// incidence list and `in_edges` stays empty.
#[derive(Debug, Clone)]
struct VertexRecord<V> {
    label: V,
    out_edges: Vec<EdgeId>,
    in_edges: Vec<EdgeId>,
}

#[derive(Debug, Clone)]
struct EdgeRecord<E> {
    label: E,
    from: VertexId,
    to: VertexId,
}

/// A directed or undirected multigraph with labeled vertices and edges.
///
/// The graph owns all vertex and edge state in arenas keyed by opaque
/// handles ([`VertexId`], [`EdgeId`]); callers hold handles, never
/// references into the structure. Identity is handle identity: labels may
/// repeat freely. Self-loops and parallel edges are permitted.
///
/// Iteration is deterministic: vertices in creation order, edges in
/// insertion order until [`order_edges`](LabeledGraph::order_edges)
/// re-sorts them, incidence lists in registration order. Structural
/// mutation while an iterator is alive is rejected by the borrow checker
/// rather than left undefined.
///
/// # Examples
///
/// ```
/// use pathgraph::LabeledGraph;
///
/// let mut g = LabeledGraph::directed();
/// let a = g.add_vertex("a");
/// let b = g.add_vertex("b");
/// let e = g.add_edge(a, b, 7).unwrap();
/// assert!(g.contains_edge(a, b).unwrap());
/// assert_eq!(g.edge_label(e).unwrap(), &7);
/// ```
#[derive(Debug, Clone)]
pub struct LabeledGraph<V, E> {
    kind: GraphKind,
    // Monotonic counters for handle generation
    vertex_counter: u64,
    edge_counter: u64,
    vertices: BTreeMap<VertexId, VertexRecord<V>>,
    edges: BTreeMap<EdgeId, EdgeRecord<E>>,
    // Current edge iteration order; insertion order until re-sorted
    edge_order: Vec<EdgeId>,
}

impl<V, E> LabeledGraph<V, E> {
    /// Create an empty graph of the given kind.
    pub fn new(kind: GraphKind) -> Self {
        Self {
            kind,
            vertex_counter: 0,
            edge_counter: 0,
            vertices: BTreeMap::new(),
            edges: BTreeMap::new(),
            edge_order: Vec::new(),
        }
    }

    /// Create an empty directed graph.
    pub fn directed() -> Self {
        Self::new(GraphKind::Directed)
    }

    /// Create an empty undirected graph.
    pub fn undirected() -> Self {
        Self::new(GraphKind::Undirected)
    }

    /// The kind discriminant of this graph.
    pub fn kind(&self) -> GraphKind {
        self.kind
    }

    /// True when edges distinguish source from destination.
    pub fn is_directed(&self) -> bool {
        self.kind.is_directed()
    }

    /// Add a vertex carrying `label`.
    ///
    /// Always succeeds in O(1) amortized time and never deduplicates by
    /// label: every call creates a fresh vertex with a fresh handle.
    pub fn add_vertex(&mut self, label: V) -> VertexId {
        let id = self.next_vertex_id();
        debug!("Adding vertex: id={id}");
        self.vertices.insert(
            id,
            VertexRecord {
                label,
                out_edges: Vec::new(),
                in_edges: Vec::new(),
            },
        );
        id
    }

    /// Add an edge from `from` to `to` carrying `label`.
    ///
    /// On a directed graph the edge is registered on `from`'s outgoing and
    /// `to`'s incoming lists; on an undirected graph it is registered on
    /// both endpoints' single incidence list, so an undirected self-loop
    /// appears twice in its vertex's list and counts twice toward degree.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::VertexNotFound`] if either endpoint is not in
    /// the graph.
    pub fn add_edge(&mut self, from: VertexId, to: VertexId, label: E) -> Result<EdgeId> {
        self.vertex(from)?;
        self.vertex(to)?;

        let id = self.next_edge_id();
        debug!("Adding edge: id={id}, from={from}, to={to}");
        self.edges.insert(id, EdgeRecord { label, from, to });
        self.edge_order.push(id);

        match self.kind {
            GraphKind::Directed => {
                if let Some(rec) = self.vertices.get_mut(&from) {
                    rec.out_edges.push(id);
                }
                if let Some(rec) = self.vertices.get_mut(&to) {
                    rec.in_edges.push(id);
                }
            }
            GraphKind::Undirected => {
                if let Some(rec) = self.vertices.get_mut(&from) {
                    rec.out_edges.push(id);
                }
                if let Some(rec) = self.vertices.get_mut(&to) {
                    rec.out_edges.push(id);
                }
            }
        }

        trace!("Edge {id} added successfully");
        Ok(id)
    }

    /// Remove a vertex and every edge incident to it.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::VertexNotFound`] if the vertex is not in the
    /// graph.
    pub fn remove_vertex(&mut self, v: VertexId) -> Result<()> {
        debug!("Removing vertex: id={v}");
        let rec = self.vertex(v)?;

        let mut doomed: Vec<EdgeId> = rec
            .out_edges
            .iter()
            .chain(rec.in_edges.iter())
            .copied()
            .collect();
        // An undirected self-loop registers twice on the same list.
        doomed.sort_unstable();
        doomed.dedup();

        trace!("Removing {} incident edges of {v}", doomed.len());
        for edge in doomed {
            self.remove_edge(edge)?;
        }

        self.vertices.remove(&v);
        Ok(())
    }

    /// Remove an edge from the edge set and from every incidence list it
    /// was registered under.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::EdgeNotFound`] if the edge is not in the
    /// graph.
    pub fn remove_edge(&mut self, e: EdgeId) -> Result<()> {
        debug!("Removing edge: id={e}");
        let rec = self
            .edges
            .remove(&e)
            .ok_or(GraphError::EdgeNotFound { edge: e })?;

        if let Some(vertex) = self.vertices.get_mut(&rec.from) {
            vertex.out_edges.retain(|id| *id != e);
            vertex.in_edges.retain(|id| *id != e);
        }
        if let Some(vertex) = self.vertices.get_mut(&rec.to) {
            vertex.out_edges.retain(|id| *id != e);
            vertex.in_edges.retain(|id| *id != e);
        }
        self.edge_order.retain(|id| *id != e);

        Ok(())
    }

    /// Remove every edge between `from` and `to`, regardless of label.
    ///
    /// On a directed graph only `from -> to` edges are removed; on an
    /// undirected graph the endpoint order does not matter.
    ///
    /// # Returns
    ///
    /// The number of edges removed.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::VertexNotFound`] if either vertex is not in
    /// the graph.
    pub fn remove_edges_between(&mut self, from: VertexId, to: VertexId) -> Result<usize> {
        self.vertex(from)?;
        self.vertex(to)?;

        let mut doomed = Vec::new();
        if let Some(rec) = self.vertices.get(&from) {
            for eid in &rec.out_edges {
                if let Some(edge) = self.edges.get(eid) {
                    if self.endpoints_match(edge, from, to) {
                        doomed.push(*eid);
                    }
                }
            }
        }
        doomed.sort_unstable();
        doomed.dedup();

        let count = doomed.len();
        for edge in doomed {
            self.remove_edge(edge)?;
        }
        debug!("Removed {count} edges between {from} and {to}");
        Ok(count)
    }

    /// True when some edge runs from `from` to `to` (either endpoint order
    /// on an undirected graph).
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::VertexNotFound`] if either vertex is not in
    /// the graph.
    pub fn contains_edge(&self, from: VertexId, to: VertexId) -> Result<bool> {
        let rec = self.vertex(from)?;
        self.vertex(to)?;
        Ok(rec.out_edges.iter().any(|eid| {
            self.edges
                .get(eid)
                .map(|edge| self.endpoints_match(edge, from, to))
                .unwrap_or(false)
        }))
    }

    /// True when some edge runs from `from` to `to` carrying a label equal
    /// to `label`.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::VertexNotFound`] if either vertex is not in
    /// the graph.
    pub fn contains_edge_labeled(&self, from: VertexId, to: VertexId, label: &E) -> Result<bool>
    where
        E: PartialEq,
    {
        let rec = self.vertex(from)?;
        self.vertex(to)?;
        Ok(rec.out_edges.iter().any(|eid| {
            self.edges
                .get(eid)
                .map(|edge| self.endpoints_match(edge, from, to) && edge.label == *label)
                .unwrap_or(false)
        }))
    }

    /// Number of outgoing edges of `v`. Directed graphs only.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::DirectedOnly`] on an undirected graph and
    /// [`GraphError::VertexNotFound`] for an unknown vertex.
    pub fn out_degree(&self, v: VertexId) -> Result<usize> {
        self.require_directed("out_degree")?;
        Ok(self.vertex(v)?.out_edges.len())
    }

    /// Number of incoming edges of `v`. Directed graphs only.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::DirectedOnly`] on an undirected graph and
    /// [`GraphError::VertexNotFound`] for an unknown vertex.
    pub fn in_degree(&self, v: VertexId) -> Result<usize> {
        self.require_directed("in_degree")?;
        Ok(self.vertex(v)?.in_edges.len())
    }

    /// Total number of edge registrations on `v`, for either graph kind.
    ///
    /// On a directed graph this is `out_degree + in_degree`; on an
    /// undirected graph it is the incidence-list length, with self-loops
    /// counted twice.
    pub fn degree(&self, v: VertexId) -> Result<usize> {
        let rec = self.vertex(v)?;
        Ok(rec.out_edges.len() + rec.in_edges.len())
    }

    /// Iterate all vertex handles in creation order.
    pub fn vertices(&self) -> impl Iterator<Item = VertexId> + '_ {
        self.vertices.keys().copied()
    }

    /// Iterate all edge handles in the current edge order.
    ///
    /// The order is insertion order until
    /// [`order_edges`](LabeledGraph::order_edges) re-sorts it; edges added
    /// afterwards append to the end unsorted.
    pub fn edges(&self) -> impl Iterator<Item = EdgeId> + '_ {
        self.edge_order.iter().copied()
    }

    /// Iterate the outgoing edges of `v` in registration order. Directed
    /// graphs only.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::DirectedOnly`] on an undirected graph and
    /// [`GraphError::VertexNotFound`] for an unknown vertex.
    pub fn out_edges(&self, v: VertexId) -> Result<impl Iterator<Item = EdgeId> + '_> {
        self.require_directed("out_edges")?;
        Ok(self.vertex(v)?.out_edges.iter().copied())
    }

    /// Iterate the incoming edges of `v` in registration order. Directed
    /// graphs only.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::DirectedOnly`] on an undirected graph and
    /// [`GraphError::VertexNotFound`] for an unknown vertex.
    pub fn in_edges(&self, v: VertexId) -> Result<impl Iterator<Item = EdgeId> + '_> {
        self.require_directed("in_edges")?;
        Ok(self.vertex(v)?.in_edges.iter().copied())
    }

    /// Iterate the edges incident to `v` for either graph kind.
    ///
    /// This is the adjacency view the traversal and search layers run on:
    /// outgoing edges on a directed graph, the whole incidence list on an
    /// undirected one.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::VertexNotFound`] for an unknown vertex.
    pub fn incident_edges(&self, v: VertexId) -> Result<impl Iterator<Item = EdgeId> + '_> {
        Ok(self.vertex(v)?.out_edges.iter().copied())
    }

    /// Iterate the distinct successors of `v` in first-encounter order.
    /// Directed graphs only.
    ///
    /// Parallel edges contribute their target once.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::DirectedOnly`] on an undirected graph and
    /// [`GraphError::VertexNotFound`] for an unknown vertex.
    pub fn successors(&self, v: VertexId) -> Result<impl Iterator<Item = VertexId> + '_> {
        self.require_directed("successors")?;
        let rec = self.vertex(v)?;
        let mut seen = HashSet::new();
        Ok(rec.out_edges.iter().filter_map(move |eid| {
            let to = self.edges.get(eid)?.to;
            if seen.insert(to) {
                Some(to)
            } else {
                None
            }
        }))
    }

    /// Iterate the distinct predecessors of `v` in first-encounter order.
    /// Directed graphs only.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::DirectedOnly`] on an undirected graph and
    /// [`GraphError::VertexNotFound`] for an unknown vertex.
    pub fn predecessors(&self, v: VertexId) -> Result<impl Iterator<Item = VertexId> + '_> {
        self.require_directed("predecessors")?;
        let rec = self.vertex(v)?;
        let mut seen = HashSet::new();
        Ok(rec.in_edges.iter().filter_map(move |eid| {
            let from = self.edges.get(eid)?.from;
            if seen.insert(from) {
                Some(from)
            } else {
                None
            }
        }))
    }

    /// Iterate the distinct neighbors of `v` for either graph kind, in
    /// first-encounter order over [`incident_edges`]
    /// (LabeledGraph::incident_edges).
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::VertexNotFound`] for an unknown vertex.
    pub fn neighbors(&self, v: VertexId) -> Result<impl Iterator<Item = VertexId> + '_> {
        let rec = self.vertex(v)?;
        let mut seen = HashSet::new();
        Ok(rec.out_edges.iter().filter_map(move |eid| {
            let edge = self.edges.get(eid)?;
            let other = if edge.from == v { edge.to } else { edge.from };
            if seen.insert(other) {
                Some(other)
            } else {
                None
            }
        }))
    }

    /// Re-establish the edge iteration order by sorting edge labels with
    /// `compare`.
    ///
    /// The sort is stable, so equal labels keep their relative order, and
    /// idempotent for an unchanged edge set. This is a snapshot reordering,
    /// not an invariant: edges inserted later append to the end until the
    /// next call.
    pub fn order_edges<F>(&mut self, mut compare: F)
    where
        F: FnMut(&E, &E) -> Ordering,
    {
        debug!("Reordering {} edges", self.edge_order.len());
        let edges = &self.edges;
        self.edge_order
            .sort_by(|a, b| compare(&edges[a].label, &edges[b].label));
    }

    /// Borrow the label of vertex `v`.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::VertexNotFound`] for an unknown vertex.
    pub fn vertex_label(&self, v: VertexId) -> Result<&V> {
        Ok(&self.vertex(v)?.label)
    }

    /// Mutably borrow the label of vertex `v`.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::VertexNotFound`] for an unknown vertex.
    pub fn vertex_label_mut(&mut self, v: VertexId) -> Result<&mut V> {
        let rec = self
            .vertices
            .get_mut(&v)
            .ok_or(GraphError::VertexNotFound { vertex: v })?;
        Ok(&mut rec.label)
    }

    /// Borrow the label of edge `e`.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::EdgeNotFound`] for an unknown edge.
    pub fn edge_label(&self, e: EdgeId) -> Result<&E> {
        Ok(&self.edge(e)?.label)
    }

    /// Mutably borrow the label of edge `e`.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::EdgeNotFound`] for an unknown edge.
    pub fn edge_label_mut(&mut self, e: EdgeId) -> Result<&mut E> {
        let rec = self
            .edges
            .get_mut(&e)
            .ok_or(GraphError::EdgeNotFound { edge: e })?;
        Ok(&mut rec.label)
    }

    /// The `(from, to)` endpoints of edge `e`.
    ///
    /// For undirected graphs the pair order is the order given to
    /// [`add_edge`](LabeledGraph::add_edge) and carries no meaning.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::EdgeNotFound`] for an unknown edge.
    pub fn endpoints(&self, e: EdgeId) -> Result<(VertexId, VertexId)> {
        let rec = self.edge(e)?;
        Ok((rec.from, rec.to))
    }

    /// The source endpoint of edge `e`.
    pub fn edge_from(&self, e: EdgeId) -> Result<VertexId> {
        Ok(self.edge(e)?.from)
    }

    /// The destination endpoint of edge `e`.
    pub fn edge_to(&self, e: EdgeId) -> Result<VertexId> {
        Ok(self.edge(e)?.to)
    }

    /// The endpoint of `e` opposite to `v`; a self-loop returns `v`
    /// itself.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::NotAnEndpoint`] when `v` is neither endpoint
    /// and [`GraphError::EdgeNotFound`] for an unknown edge.
    pub fn other_endpoint(&self, e: EdgeId, v: VertexId) -> Result<VertexId> {
        let rec = self.edge(e)?;
        if v == rec.from {
            Ok(rec.to)
        } else if v == rec.to {
            Ok(rec.from)
        } else {
            Err(GraphError::NotAnEndpoint { edge: e, vertex: v })
        }
    }

    /// The number of vertices in the graph.
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// The number of edges in the graph.
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// True when the graph has no vertices.
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// True when `v` is a vertex of this graph.
    pub fn contains_vertex(&self, v: VertexId) -> bool {
        self.vertices.contains_key(&v)
    }

    /// True when `e` is an edge of this graph.
    pub fn contains_edge_id(&self, e: EdgeId) -> bool {
        self.edges.contains_key(&e)
    }

    // ===== Search Methods =====

    /// Minimum-weight path from `from` to `to` with externally supplied
    /// weight accessors. See [`shortest_path`](super::shortest_path).
    pub fn shortest_path<H, VW, EW>(
        &self,
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
        super::search::shortest_path(self, from, to, heuristic, vertex_weights, edge_weights)
    }

    /// Minimum-weight path from `from` to `to` with weight-capable labels.
    /// See [`shortest_path_weighted`](super::shortest_path_weighted).
    pub fn shortest_path_weighted<H>(
        &mut self,
        from: VertexId,
        to: VertexId,
        heuristic: &H,
    ) -> Result<Option<SearchPath>>
    where
        V: Weightable,
        E: Weighted,
        H: Distancer<V> + ?Sized,
    {
        super::search::shortest_path_weighted(self, from, to, heuristic)
    }

    // Private helper methods

    fn vertex(&self, v: VertexId) -> Result<&VertexRecord<V>> {
        self.vertices
            .get(&v)
            .ok_or(GraphError::VertexNotFound { vertex: v })
    }

    fn edge(&self, e: EdgeId) -> Result<&EdgeRecord<E>> {
        self.edges.get(&e).ok_or(GraphError::EdgeNotFound { edge: e })
    }

    fn endpoints_match(&self, edge: &EdgeRecord<E>, from: VertexId, to: VertexId) -> bool {
        if self.kind.is_directed() {
            edge.from == from && edge.to == to
        } else {
            (edge.from == from && edge.to == to) || (edge.from == to && edge.to == from)
        }
    }

    fn require_directed(&self, operation: &'static str) -> Result<()> {
        if self.is_directed() {
            Ok(())
        } else {
            Err(GraphError::DirectedOnly { operation })
        }
    }

    fn next_vertex_id(&mut self) -> VertexId {
        let id = VertexId::new(self.vertex_counter);
        self.vertex_counter += 1;
        id
    }

    fn next_edge_id(&mut self) -> EdgeId {
        let id = EdgeId::new(self.edge_counter);
        self.edge_counter += 1;
        id
    }
}
