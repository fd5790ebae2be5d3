//! Integration tests for minimum-weight path search.
//!
//! Tests cover:
//! - Heuristic-independence of the result (zero vs Euclidean estimates)
//! - Agreement between the accessor and weighted-label variants
//! - Vertex weight stores observing finalized distances
//! - Undirected search, unreachable targets and endpoint validation
//! - The search methods exposed on the graph itself

use pathgraph::{
    shortest_path, shortest_path_weighted, Distancer, EdgeWeighting, GraphError, LabeledGraph,
    MapWeighter, VertexId, VertexWeighter, Weightable, Weighted, ZeroDistancer,
};
use std::collections::HashMap;

/// A vertex on the plane, identified by name.
#[derive(Debug, Clone)]
struct Coord {
    name: &'static str,
    x: f64,
    y: f64,
}

/// Straight-line distance between two coordinates. Admissible because
/// every edge in the fixtures weighs at least the distance it spans.
struct Euclid;

impl Distancer<Coord> for Euclid {
    fn dist(&self, a: &Coord, b: &Coord) -> f64 {
        ((a.x - b.x).powi(2) + (a.y - b.y).powi(2)).sqrt()
    }
}

/// Edge labels are their own weight.
struct Span;

impl EdgeWeighting<f64> for Span {
    fn weight(&self, label: &f64) -> f64 {
        *label
    }
}

/// External distance store keyed by vertex name.
#[derive(Default)]
struct NameWeights(HashMap<&'static str, f64>);

impl VertexWeighter<Coord> for NameWeights {
    fn weight(&self, label: &Coord) -> f64 {
        self.0.get(label.name).copied().unwrap_or(f64::INFINITY)
    }

    fn set_weight(&mut self, label: &Coord, weight: f64) {
        self.0.insert(label.name, weight);
    }
}

/// A 3x3 block with a diagonal shortcut. The direct s-c hop spans
/// sqrt(18) < 6, so the best route to t is s-c-t.
///
/// s(0,0) a(3,0) b(0,3) c(3,3) t(6,3); every edge weighs its
/// straight-line length.
fn grid() -> (
    LabeledGraph<Coord, f64>,
    VertexId,
    VertexId,
    VertexId,
    VertexId,
    VertexId,
) {
    let mut g = LabeledGraph::directed();
    let at = |name, x, y| Coord { name, x, y };
    let s = g.add_vertex(at("s", 0.0, 0.0));
    let a = g.add_vertex(at("a", 3.0, 0.0));
    let b = g.add_vertex(at("b", 0.0, 3.0));
    let c = g.add_vertex(at("c", 3.0, 3.0));
    let t = g.add_vertex(at("t", 6.0, 3.0));
    g.add_edge(s, a, 3.0).unwrap();
    g.add_edge(s, b, 3.0).unwrap();
    g.add_edge(s, c, 18f64.sqrt()).unwrap();
    g.add_edge(a, c, 3.0).unwrap();
    g.add_edge(b, c, 3.0).unwrap();
    g.add_edge(c, t, 3.0).unwrap();
    (g, s, a, b, c, t)
}

#[test]
fn test_heuristics_agree_on_the_result() {
    let (g, s, _a, _b, c, t) = grid();

    let mut guided_store = NameWeights::default();
    let guided = shortest_path(&g, s, t, &Euclid, &mut guided_store, &Span)
        .unwrap()
        .unwrap();

    let mut blind_store = NameWeights::default();
    let blind = shortest_path(&g, s, t, &ZeroDistancer, &mut blind_store, &Span)
        .unwrap()
        .unwrap();

    assert_eq!(guided.vertices, vec![s, c, t]);
    assert_eq!(guided.vertices, blind.vertices);
    assert_eq!(guided.edges, blind.edges);
    assert_eq!(guided.total_weight, 18f64.sqrt() + 3.0);
    assert_eq!(blind.total_weight, guided.total_weight);
}

#[test]
fn test_store_observes_finalized_distances() {
    let (g, s, _a, _b, _c, t) = grid();
    let mut store = NameWeights::default();
    shortest_path(&g, s, t, &ZeroDistancer, &mut store, &Span).unwrap();

    assert_eq!(store.0["s"], 0.0);
    assert_eq!(store.0["a"], 3.0);
    assert_eq!(store.0["b"], 3.0);
    assert_eq!(store.0["c"], 18f64.sqrt());
    assert_eq!(store.0["t"], 18f64.sqrt() + 3.0);
}

/// A vertex label that carries its own tentative distance.
#[derive(Debug, Clone)]
struct Site {
    name: &'static str,
    x: f64,
    y: f64,
    dist: f64,
}

impl Weighted for Site {
    fn weight(&self) -> f64 {
        self.dist
    }
}

impl Weightable for Site {
    fn set_weight(&mut self, weight: f64) {
        self.dist = weight;
    }
}

/// An edge label that carries its own length.
#[derive(Debug, Clone)]
struct Leg(f64);

impl Weighted for Leg {
    fn weight(&self) -> f64 {
        self.0
    }
}

struct SiteEuclid;

impl Distancer<Site> for SiteEuclid {
    fn dist(&self, a: &Site, b: &Site) -> f64 {
        ((a.x - b.x).powi(2) + (a.y - b.y).powi(2)).sqrt()
    }
}

#[test]
fn test_weighted_labels_agree_with_accessors() {
    // Same topology as grid(), with the weights moved into the labels.
    let mut wg: LabeledGraph<Site, Leg> = LabeledGraph::directed();
    let at = |name, x, y| Site {
        name,
        x,
        y,
        dist: 0.0,
    };
    let s = wg.add_vertex(at("s", 0.0, 0.0));
    let a = wg.add_vertex(at("a", 3.0, 0.0));
    let b = wg.add_vertex(at("b", 0.0, 3.0));
    let c = wg.add_vertex(at("c", 3.0, 3.0));
    let t = wg.add_vertex(at("t", 6.0, 3.0));
    wg.add_edge(s, a, Leg(3.0)).unwrap();
    wg.add_edge(s, b, Leg(3.0)).unwrap();
    wg.add_edge(s, c, Leg(18f64.sqrt())).unwrap();
    wg.add_edge(a, c, Leg(3.0)).unwrap();
    wg.add_edge(b, c, Leg(3.0)).unwrap();
    wg.add_edge(c, t, Leg(3.0)).unwrap();

    let heavy = shortest_path_weighted(&mut wg, s, t, &SiteEuclid)
        .unwrap()
        .unwrap();

    let (g, gs, _ga, _gb, _gc, gt) = grid();
    let mut store = NameWeights::default();
    let light = shortest_path(&g, gs, gt, &Euclid, &mut store, &Span)
        .unwrap()
        .unwrap();

    // Both graphs were built in the same order, so handles line up.
    assert_eq!(heavy.vertices, light.vertices);
    assert_eq!(heavy.edges, light.edges);
    assert_eq!(heavy.total_weight, light.total_weight);

    // The labels finalized the same distances the store recorded.
    for v in wg.vertices() {
        let site = wg.vertex_label(v).unwrap();
        assert_eq!(site.weight(), store.0[site.name], "vertex {}", site.name);
    }
    // b was admitted but never finalized below its admission distance.
    assert_eq!(wg.vertex_label(b).unwrap().weight(), 3.0);
}

#[test]
fn test_optimal_route_beats_greedy_first_hop() {
    let mut g = LabeledGraph::directed();
    let s = g.add_vertex("s");
    let x = g.add_vertex("x");
    let y = g.add_vertex("y");
    let z = g.add_vertex("z");
    let t = g.add_vertex("t");
    g.add_edge(s, x, 1.0).unwrap();
    g.add_edge(x, t, 10.0).unwrap();
    g.add_edge(s, y, 2.0).unwrap();
    g.add_edge(y, z, 2.0).unwrap();
    g.add_edge(z, t, 2.0).unwrap();
    g.add_edge(s, t, 12.0).unwrap();

    let mut store = MapWeighter::new();
    let path = shortest_path(&g, s, t, &ZeroDistancer, &mut store, &Span)
        .unwrap()
        .unwrap();

    assert_eq!(path.vertices, vec![s, y, z, t]);
    assert_eq!(path.total_weight, 6.0);
    // Every pass through an improvement was written to the store.
    assert_eq!(store.get(&"x"), Some(1.0));
    assert_eq!(store.get(&"t"), Some(6.0));
}

#[test]
fn test_undirected_search_crosses_edges_both_ways() {
    let mut g = LabeledGraph::undirected();
    let a = g.add_vertex("a");
    let b = g.add_vertex("b");
    let c = g.add_vertex("c");
    let e1 = g.add_edge(a, b, 2.0).unwrap();
    let e2 = g.add_edge(b, c, 3.0).unwrap();

    let mut store = MapWeighter::new();
    let forward = shortest_path(&g, a, c, &ZeroDistancer, &mut store, &Span)
        .unwrap()
        .unwrap();
    assert_eq!(forward.vertices, vec![a, b, c]);
    assert_eq!(forward.edges, vec![e1, e2]);
    assert_eq!(forward.total_weight, 5.0);

    let back = shortest_path(&g, c, a, &ZeroDistancer, &mut store, &Span)
        .unwrap()
        .unwrap();
    assert_eq!(back.vertices, vec![c, b, a]);
    assert_eq!(back.edges, vec![e2, e1]);
    assert_eq!(back.total_weight, 5.0);
}

#[test]
fn test_unreachable_and_isolated_vertices_stay_infinite() {
    let mut g = LabeledGraph::directed();
    let s = g.add_vertex("s");
    let t = g.add_vertex("t");
    let island = g.add_vertex("island");
    g.add_edge(s, t, 1.0).unwrap();

    let mut store = MapWeighter::new();
    let path = shortest_path(&g, s, t, &ZeroDistancer, &mut store, &Span).unwrap();
    assert!(path.is_some());
    assert_eq!(store.get(&"island"), Some(f64::INFINITY));

    // The island is a valid start with no way out.
    let none = shortest_path(&g, island, t, &ZeroDistancer, &mut store, &Span).unwrap();
    assert!(none.is_none());
    assert_eq!(store.get(&"island"), Some(0.0));
    assert_eq!(store.get(&"t"), Some(f64::INFINITY));
}

#[test]
fn test_missing_endpoints_are_rejected() {
    let mut g = LabeledGraph::directed();
    let a = g.add_vertex("a");
    let ghost = g.add_vertex("ghost");
    g.remove_vertex(ghost).unwrap();

    let mut store = MapWeighter::new();
    let err = shortest_path(&g, ghost, a, &ZeroDistancer, &mut store, &Span).unwrap_err();
    assert_eq!(err, GraphError::VertexNotFound { vertex: ghost });

    let err = shortest_path(&g, a, ghost, &ZeroDistancer, &mut store, &Span).unwrap_err();
    assert_eq!(err, GraphError::VertexNotFound { vertex: ghost });
}

#[test]
fn test_map_weighter_doubles_as_edge_table() {
    // Edge labels are road names; one shared table maps them to lengths.
    let mut g = LabeledGraph::directed();
    let a = g.add_vertex("a");
    let b = g.add_vertex("b");
    let c = g.add_vertex("c");
    g.add_edge(a, b, "main").unwrap();
    g.add_edge(b, c, "main").unwrap();
    g.add_edge(a, c, "side").unwrap();

    let roads = MapWeighter::new().with("main", 2.0).with("side", 5.0);
    let mut store = MapWeighter::new();
    let path = shortest_path(&g, a, c, &ZeroDistancer, &mut store, &roads)
        .unwrap()
        .unwrap();

    assert_eq!(path.vertices, vec![a, b, c]);
    assert_eq!(path.total_weight, 4.0);
}

#[test]
fn test_search_methods_on_the_graph() {
    let (g, s, _a, _b, c, t) = grid();
    let mut store = NameWeights::default();
    let through_method = g
        .shortest_path(s, t, &Euclid, &mut store, &Span)
        .unwrap()
        .unwrap();
    assert_eq!(through_method.vertices, vec![s, c, t]);

    let mut wg: LabeledGraph<Site, Leg> = LabeledGraph::directed();
    let from = wg.add_vertex(Site {
        name: "from",
        x: 0.0,
        y: 0.0,
        dist: 0.0,
    });
    let to = wg.add_vertex(Site {
        name: "to",
        x: 1.0,
        y: 0.0,
        dist: 0.0,
    });
    wg.add_edge(from, to, Leg(1.0)).unwrap();

    let direct = wg
        .shortest_path_weighted(from, to, &SiteEuclid)
        .unwrap()
        .unwrap();
    assert_eq!(direct.vertices, vec![from, to]);
    assert_eq!(direct.total_weight, 1.0);
    assert_eq!(wg.vertex_label(to).unwrap().weight(), 1.0);
}
