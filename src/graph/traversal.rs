//! Fringe-driven graph exploration with visitor hooks.
//!
//! A [`Traversal`] is an explicit session object: it owns the visited set,
//! the exploration policy, and the outcome of the last run. The caller
//! supplies a [`Visitor`] whose hooks observe the exploration and steer it
//! with [`Control`] signals. Three policies share one protocol:
//!
//! - depth-first (explicit stack, `post_visit` after subtree completion),
//! - breadth-first (FIFO queue, `post_visit` in level order),
//! - priority (comparator over vertex labels, no `post_visit`).
//!
//! Adjacency comes from [`LabeledGraph::incident_edges`], so every policy
//! works on both graph kinds; on directed graphs exploration follows
//! outgoing edges.

use super::labeled::LabeledGraph;
use super::types::{Control, EdgeId, TraversalState, VertexId};
use crate::error::Result;
use log::{debug, trace};
use std::cmp::Ordering;
use std::collections::{HashSet, VecDeque};
use std::fmt;

/// Comparator over vertex labels for priority-ordered traversal.
pub type LabelComparator<V> = Box<dyn FnMut(&V, &V) -> Ordering>;

/// Hooks observing a traversal. Every hook defaults to a no-op returning
/// [`Control::Continue`], so implementors override only what they need.
///
/// Hook contract:
///
/// - `pre_visit` fires once per edge whose far endpoint is unvisited at
///   that moment, before the candidate is admitted to the fringe. A vertex
///   reachable over several edges may see several `pre_visit` calls before
///   its single `visit`.
/// - `visit` fires exactly once per vertex, when it is taken from the
///   fringe and marked visited.
/// - `post_visit` fires in the depth-first and breadth-first policies
///   only: depth-first after the vertex's entire expansion is exhausted,
///   breadth-first after its admitted successors have been visited.
///
/// Returning [`Control::Reject`] from `pre_visit` skips that one
/// admission; from `visit` it keeps the vertex visited but suppresses its
/// expansion and its `post_visit`; from `post_visit` it has no effect.
/// Returning [`Control::Stop`] from any hook halts the whole traversal.
pub trait Visitor<V, E> {
    /// Observe `candidate` being reached over `edge` before admission.
    fn pre_visit(
        &mut self,
        _graph: &LabeledGraph<V, E>,
        _edge: EdgeId,
        _candidate: VertexId,
    ) -> Control {
        Control::Continue
    }

    /// Observe `vertex` being visited.
    fn visit(&mut self, _graph: &LabeledGraph<V, E>, _vertex: VertexId) -> Control {
        Control::Continue
    }

    /// Observe the completion of `vertex`'s expansion.
    fn post_visit(&mut self, _graph: &LabeledGraph<V, E>, _vertex: VertexId) -> Control {
        Control::Continue
    }
}

enum TraversalOrder<V> {
    Depth,
    Breadth,
    Priority(LabelComparator<V>),
}

/// A reusable traversal session over graphs with vertex labels `V`.
///
/// The session records which vertices have been visited, the state of the
/// last run, and where a [`Control::Stop`] signal landed.
/// [`traverse`](Traversal::traverse) starts fresh;
/// [`resume`](Traversal::resume) keeps the visited set, so already-visited
/// vertices are not revisited.
///
/// # Examples
///
/// ```
/// use pathgraph::{Control, LabeledGraph, Traversal, VertexId, Visitor};
///
/// struct Collect(Vec<VertexId>);
///
/// impl Visitor<&'static str, ()> for Collect {
///     fn visit(&mut self, _: &LabeledGraph<&'static str, ()>, v: VertexId) -> Control {
///         self.0.push(v);
///         Control::Continue
///     }
/// }
///
/// let mut g = LabeledGraph::directed();
/// let a = g.add_vertex("a");
/// let b = g.add_vertex("b");
/// g.add_edge(a, b, ()).unwrap();
///
/// let mut order = Collect(Vec::new());
/// let mut session = Traversal::depth_first();
/// session.traverse(&g, a, &mut order).unwrap();
/// assert_eq!(order.0, vec![a, b]);
/// ```
pub struct Traversal<V> {
    order: TraversalOrder<V>,
    visited: HashSet<VertexId>,
    state: TraversalState,
    final_vertex: Option<VertexId>,
    final_edge: Option<EdgeId>,
}

impl<V> Traversal<V> {
    fn with_order(order: TraversalOrder<V>) -> Self {
        Self {
            order,
            visited: HashSet::new(),
            state: TraversalState::Unstarted,
            final_vertex: None,
            final_edge: None,
        }
    }

    /// Depth-first session: a vertex's unvisited neighbors are admitted in
    /// adjacency order and explored first-admitted-first; `post_visit`
    /// fires after the vertex's entire expansion is exhausted, simulating
    /// recursive descent without consuming call stack.
    pub fn depth_first() -> Self {
        Self::with_order(TraversalOrder::Depth)
    }

    /// Breadth-first session: vertices are visited in admission (level)
    /// order; `post_visit(v)` fires after v's admitted successors have
    /// been visited.
    pub fn breadth_first() -> Self {
        Self::with_order(TraversalOrder::Breadth)
    }

    /// Priority session: at each step the fringe element whose label is
    /// minimal under `compare` is visited next.
    ///
    /// The comparator is re-evaluated at every extraction, so the ordering
    /// reflects its current view rather than its view at insertion time;
    /// among equal elements the first-inserted wins. This policy has no
    /// `post_visit`.
    pub fn priority_order<F>(compare: F) -> Self
    where
        F: FnMut(&V, &V) -> Ordering + 'static,
    {
        Self::with_order(TraversalOrder::Priority(Box::new(compare)))
    }

    /// Priority session using the label type's own ordering.
    pub fn natural_order() -> Self
    where
        V: Ord + 'static,
    {
        Self::priority_order(V::cmp)
    }

    /// Explore `graph` from `start` with a cleared visited set.
    ///
    /// # Returns
    ///
    /// [`TraversalState::Completed`] when the fringe drained, or
    /// [`TraversalState::Stopped`] when a hook returned
    /// [`Control::Stop`].
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::VertexNotFound`](crate::GraphError) when
    /// `start` is not a vertex of `graph`.
    pub fn traverse<E, Vis>(
        &mut self,
        graph: &LabeledGraph<V, E>,
        start: VertexId,
        visitor: &mut Vis,
    ) -> Result<TraversalState>
    where
        Vis: Visitor<V, E> + ?Sized,
    {
        self.visited.clear();
        self.run(graph, start, visitor)
    }

    /// Explore `graph` from `start` keeping the visited set of earlier
    /// runs, so vertices already visited are neither revisited nor
    /// re-expanded. On a fresh session this behaves like
    /// [`traverse`](Traversal::traverse).
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::VertexNotFound`](crate::GraphError) when
    /// `start` is not a vertex of `graph`.
    pub fn resume<E, Vis>(
        &mut self,
        graph: &LabeledGraph<V, E>,
        start: VertexId,
        visitor: &mut Vis,
    ) -> Result<TraversalState>
    where
        Vis: Visitor<V, E> + ?Sized,
    {
        self.run(graph, start, visitor)
    }

    /// State of the most recent run.
    pub fn state(&self) -> TraversalState {
        self.state
    }

    /// The vertex a [`Control::Stop`] signal was raised on, if the last
    /// run was stopped.
    pub fn final_vertex(&self) -> Option<VertexId> {
        self.final_vertex
    }

    /// The edge under consideration when a [`Control::Stop`] signal was
    /// raised from `pre_visit`; `None` for stops from the other hooks.
    pub fn final_edge(&self) -> Option<EdgeId> {
        self.final_edge
    }

    /// True when this session has visited `v`.
    pub fn visited(&self, v: VertexId) -> bool {
        self.visited.contains(&v)
    }

    /// Number of vertices this session has visited.
    pub fn visited_count(&self) -> usize {
        self.visited.len()
    }

    fn run<E, Vis>(
        &mut self,
        graph: &LabeledGraph<V, E>,
        start: VertexId,
        visitor: &mut Vis,
    ) -> Result<TraversalState>
    where
        Vis: Visitor<V, E> + ?Sized,
    {
        // Contract check before any session state changes.
        graph.vertex_label(start)?;

        debug!("Starting {} traversal from {start}", self.order_name());
        self.state = TraversalState::Running;
        self.final_vertex = None;
        self.final_edge = None;

        let end = match &mut self.order {
            TraversalOrder::Depth => depth_loop(graph, start, &mut self.visited, visitor)?,
            TraversalOrder::Breadth => breadth_loop(graph, start, &mut self.visited, visitor)?,
            TraversalOrder::Priority(compare) => {
                priority_loop(graph, start, &mut self.visited, compare.as_mut(), visitor)?
            }
        };

        match end {
            LoopEnd::Completed => self.state = TraversalState::Completed,
            LoopEnd::Stopped { vertex, edge } => {
                self.state = TraversalState::Stopped;
                self.final_vertex = Some(vertex);
                self.final_edge = edge;
            }
        }
        trace!(
            "Traversal ended: state={}, visited={}",
            self.state,
            self.visited.len()
        );
        Ok(self.state)
    }

    fn order_name(&self) -> &'static str {
        match self.order {
            TraversalOrder::Depth => "depth-first",
            TraversalOrder::Breadth => "breadth-first",
            TraversalOrder::Priority(_) => "priority",
        }
    }
}

impl<V> fmt::Debug for Traversal<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Traversal")
            .field("order", &self.order_name())
            .field("state", &self.state)
            .field("visited", &self.visited.len())
            .finish()
    }
}

enum LoopEnd {
    Completed,
    Stopped {
        vertex: VertexId,
        edge: Option<EdgeId>,
    },
}

/// Two-phase frame: `Enter` visits and expands a vertex, `Exit` fires its
/// `post_visit`.
enum Frame {
    Enter(VertexId),
    Exit(VertexId),
}

fn depth_loop<V, E, Vis>(
    graph: &LabeledGraph<V, E>,
    start: VertexId,
    visited: &mut HashSet<VertexId>,
    visitor: &mut Vis,
) -> Result<LoopEnd>
where
    Vis: Visitor<V, E> + ?Sized,
{
    let mut stack = vec![Frame::Enter(start)];
    while let Some(frame) = stack.pop() {
        match frame {
            Frame::Enter(v) => {
                if !visited.insert(v) {
                    continue;
                }
                match visitor.visit(graph, v) {
                    Control::Continue => {}
                    // Stays visited; no expansion, no post_visit.
                    Control::Reject => continue,
                    Control::Stop => {
                        return Ok(LoopEnd::Stopped {
                            vertex: v,
                            edge: None,
                        })
                    }
                }
                stack.push(Frame::Exit(v));
                let admitted = admit_neighbors(graph, v, visited, visitor)?;
                match admitted {
                    Admission::Stopped { vertex, edge } => {
                        return Ok(LoopEnd::Stopped {
                            vertex,
                            edge: Some(edge),
                        })
                    }
                    Admission::Offered(neighbors) => {
                        // Reversed so the first-admitted neighbor is
                        // explored first.
                        for candidate in neighbors.into_iter().rev() {
                            stack.push(Frame::Enter(candidate));
                        }
                    }
                }
            }
            Frame::Exit(v) => {
                if let Control::Stop = visitor.post_visit(graph, v) {
                    return Ok(LoopEnd::Stopped {
                        vertex: v,
                        edge: None,
                    });
                }
            }
        }
    }
    Ok(LoopEnd::Completed)
}

fn breadth_loop<V, E, Vis>(
    graph: &LabeledGraph<V, E>,
    start: VertexId,
    visited: &mut HashSet<VertexId>,
    visitor: &mut Vis,
) -> Result<LoopEnd>
where
    Vis: Visitor<V, E> + ?Sized,
{
    let mut queue = VecDeque::new();
    queue.push_back(Frame::Enter(start));
    while let Some(frame) = queue.pop_front() {
        match frame {
            Frame::Enter(v) => {
                if !visited.insert(v) {
                    continue;
                }
                match visitor.visit(graph, v) {
                    Control::Continue => {}
                    Control::Reject => continue,
                    Control::Stop => {
                        return Ok(LoopEnd::Stopped {
                            vertex: v,
                            edge: None,
                        })
                    }
                }
                match admit_neighbors(graph, v, visited, visitor)? {
                    Admission::Stopped { vertex, edge } => {
                        return Ok(LoopEnd::Stopped {
                            vertex,
                            edge: Some(edge),
                        })
                    }
                    Admission::Offered(neighbors) => {
                        for candidate in neighbors {
                            queue.push_back(Frame::Enter(candidate));
                        }
                    }
                }
                queue.push_back(Frame::Exit(v));
            }
            Frame::Exit(v) => {
                if let Control::Stop = visitor.post_visit(graph, v) {
                    return Ok(LoopEnd::Stopped {
                        vertex: v,
                        edge: None,
                    });
                }
            }
        }
    }
    Ok(LoopEnd::Completed)
}

fn priority_loop<V, E, Vis>(
    graph: &LabeledGraph<V, E>,
    start: VertexId,
    visited: &mut HashSet<VertexId>,
    compare: &mut dyn FnMut(&V, &V) -> Ordering,
    visitor: &mut Vis,
) -> Result<LoopEnd>
where
    Vis: Visitor<V, E> + ?Sized,
{
    let mut fringe: Vec<VertexId> = vec![start];
    while !fringe.is_empty() {
        // Linear minimum extraction: the comparator is consulted afresh at
        // every step, and on ties the earliest-inserted element wins.
        let mut best = 0;
        for i in 1..fringe.len() {
            let a = graph.vertex_label(fringe[i])?;
            let b = graph.vertex_label(fringe[best])?;
            if compare(a, b) == Ordering::Less {
                best = i;
            }
        }
        let v = fringe.remove(best);
        if !visited.insert(v) {
            continue;
        }
        match visitor.visit(graph, v) {
            Control::Continue => {}
            Control::Reject => continue,
            Control::Stop => {
                return Ok(LoopEnd::Stopped {
                    vertex: v,
                    edge: None,
                })
            }
        }
        match admit_neighbors(graph, v, visited, visitor)? {
            Admission::Stopped { vertex, edge } => {
                return Ok(LoopEnd::Stopped {
                    vertex,
                    edge: Some(edge),
                })
            }
            Admission::Offered(neighbors) => fringe.extend(neighbors),
        }
    }
    Ok(LoopEnd::Completed)
}

enum Admission {
    Offered(Vec<VertexId>),
    Stopped { vertex: VertexId, edge: EdgeId },
}

/// Offer each unvisited far endpoint of `v`'s incident edges to the
/// visitor's `pre_visit`, collecting the admitted ones in adjacency order.
fn admit_neighbors<V, E, Vis>(
    graph: &LabeledGraph<V, E>,
    v: VertexId,
    visited: &HashSet<VertexId>,
    visitor: &mut Vis,
) -> Result<Admission>
where
    Vis: Visitor<V, E> + ?Sized,
{
    let mut admitted = Vec::new();
    for edge in graph.incident_edges(v)? {
        let candidate = graph.other_endpoint(edge, v)?;
        if visited.contains(&candidate) {
            continue;
        }
        match visitor.pre_visit(graph, edge, candidate) {
            Control::Continue => admitted.push(candidate),
            Control::Reject => {}
            Control::Stop => {
                return Ok(Admission::Stopped {
                    vertex: candidate,
                    edge,
                })
            }
        }
    }
    Ok(Admission::Offered(admitted))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GraphError;

    /// Records `a<label>` on pre_visit, `b<label>` on visit and
    /// `c<label>` on post_visit.
    struct Tagger {
        tags: Vec<String>,
    }

    impl Tagger {
        fn new() -> Self {
            Self { tags: Vec::new() }
        }
    }

    impl Visitor<&'static str, ()> for Tagger {
        fn pre_visit(
            &mut self,
            graph: &LabeledGraph<&'static str, ()>,
            _edge: EdgeId,
            candidate: VertexId,
        ) -> Control {
            self.tags.push(format!("a{}", graph.vertex_label(candidate).unwrap()));
            Control::Continue
        }

        fn visit(&mut self, graph: &LabeledGraph<&'static str, ()>, vertex: VertexId) -> Control {
            self.tags.push(format!("b{}", graph.vertex_label(vertex).unwrap()));
            Control::Continue
        }

        fn post_visit(
            &mut self,
            graph: &LabeledGraph<&'static str, ()>,
            vertex: VertexId,
        ) -> Control {
            self.tags.push(format!("c{}", graph.vertex_label(vertex).unwrap()));
            Control::Continue
        }
    }

    /// A -> B, C, D and D -> E, F.
    fn sample_tree() -> (LabeledGraph<&'static str, ()>, VertexId) {
        let mut g = LabeledGraph::directed();
        let a = g.add_vertex("A");
        let b = g.add_vertex("B");
        let c = g.add_vertex("C");
        let d = g.add_vertex("D");
        let e = g.add_vertex("E");
        let f = g.add_vertex("F");
        g.add_edge(a, b, ()).unwrap();
        g.add_edge(a, c, ()).unwrap();
        g.add_edge(a, d, ()).unwrap();
        g.add_edge(d, e, ()).unwrap();
        g.add_edge(d, f, ()).unwrap();
        (g, a)
    }

    #[test]
    fn test_depth_first_tag_sequence() {
        let (g, a) = sample_tree();
        let mut tagger = Tagger::new();
        let mut session = Traversal::depth_first();
        let state = session.traverse(&g, a, &mut tagger).unwrap();

        assert_eq!(state, TraversalState::Completed);
        let expected = [
            "bA", "aB", "aC", "aD", "bB", "cB", "bC", "cC", "bD", "aE", "aF", "bE", "cE", "bF",
            "cF", "cD", "cA",
        ];
        assert_eq!(tagger.tags, expected);
    }

    #[test]
    fn test_breadth_first_tag_sequence() {
        let (g, a) = sample_tree();
        let mut tagger = Tagger::new();
        let mut session = Traversal::breadth_first();
        let state = session.traverse(&g, a, &mut tagger).unwrap();

        assert_eq!(state, TraversalState::Completed);
        let expected = [
            "bA", "aB", "aC", "aD", "bB", "bC", "bD", "aE", "aF", "cA", "cB", "cC", "bE", "bF",
            "cD", "cE", "cF",
        ];
        assert_eq!(tagger.tags, expected);
    }

    #[test]
    fn test_missing_start_is_an_error() {
        let mut g: LabeledGraph<&'static str, ()> = LabeledGraph::directed();
        let a = g.add_vertex("A");
        g.remove_vertex(a).unwrap();

        let mut session = Traversal::depth_first();
        let err = session.traverse(&g, a, &mut Tagger::new()).unwrap_err();
        assert_eq!(err, GraphError::VertexNotFound { vertex: a });
        assert_eq!(session.state(), TraversalState::Unstarted);
    }

    #[test]
    fn test_priority_order_visits_minimum_first() {
        let mut g: LabeledGraph<u32, ()> = LabeledGraph::directed();
        let a = g.add_vertex(5);
        let b = g.add_vertex(3);
        let c = g.add_vertex(9);
        let d = g.add_vertex(1);
        g.add_edge(a, b, ()).unwrap();
        g.add_edge(a, c, ()).unwrap();
        g.add_edge(a, d, ()).unwrap();

        struct Order(Vec<u32>);
        impl Visitor<u32, ()> for Order {
            fn visit(&mut self, graph: &LabeledGraph<u32, ()>, vertex: VertexId) -> Control {
                self.0.push(*graph.vertex_label(vertex).unwrap());
                Control::Continue
            }
        }

        let mut order = Order(Vec::new());
        let mut session = Traversal::natural_order();
        session.traverse(&g, a, &mut order).unwrap();
        assert_eq!(order.0, vec![5, 1, 3, 9]);
    }

    #[test]
    fn test_resume_skips_visited_vertices() {
        let mut g: LabeledGraph<&'static str, ()> = LabeledGraph::directed();
        let a = g.add_vertex("A");
        let b = g.add_vertex("B");
        let c = g.add_vertex("C");
        g.add_edge(a, b, ()).unwrap();
        g.add_edge(c, b, ()).unwrap();

        let mut tagger = Tagger::new();
        let mut session = Traversal::breadth_first();
        session.traverse(&g, a, &mut tagger).unwrap();
        assert!(session.visited(a) && session.visited(b));

        // B is already visited, so resuming from C only visits C.
        session.resume(&g, c, &mut tagger).unwrap();
        assert_eq!(session.visited_count(), 3);
        let resumed: Vec<_> = tagger.tags.iter().filter(|t| t.contains('C')).collect();
        assert_eq!(resumed, ["bC", "cC"]);

        // A fresh traverse clears the session and revisits everything.
        session.traverse(&g, a, &mut Tagger::new()).unwrap();
        assert_eq!(session.visited_count(), 2);
    }
}
