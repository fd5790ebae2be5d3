//! Weight and heuristic capabilities for path search.
//!
//! Weights reach the search in one of two statically chosen ways:
//!
//! - **Accessor objects** ([`VertexWeighter`], [`EdgeWeighting`],
//!   [`Distancer`]): external values that map a label to a weight. The
//!   graph and its labels stay untouched.
//! - **Weight-capable labels** ([`Weighted`], [`Weightable`]): the label
//!   types themselves expose their weight.
//!
//! Both routes must produce identical search results for the same graph
//! and weights; `tests/search.rs` holds them to that.

use std::collections::HashMap;
use std::hash::Hash;

/// Read/write access to per-vertex weights stored outside the graph.
///
/// The path search writes tentative distances through [`set_weight`]
/// (`VertexWeighter::set_weight`) as a documented side effect, so after a
/// search the store holds the shortest known distance of every vertex, or
/// positive infinity for vertices the search never reached.
pub trait VertexWeighter<L: ?Sized> {
    /// Current weight recorded for `label`.
    fn weight(&self, label: &L) -> f64;

    /// Record a new weight for `label`.
    fn set_weight(&mut self, label: &L, weight: f64);
}

/// Read-only access to per-edge weights stored outside the graph.
pub trait EdgeWeighting<L: ?Sized> {
    /// Weight of the edge carrying `label`. Must be non-negative for path
    /// searches.
    fn weight(&self, label: &L) -> f64;
}

/// Heuristic distance estimate between two vertex labels.
///
/// For A* optimality the estimate must be admissible (never overestimate
/// the true remaining distance) and consistent across adjacent vertices.
pub trait Distancer<L: ?Sized> {
    /// Estimated distance from `a` to `b`.
    fn dist(&self, a: &L, b: &L) -> f64;
}

/// The heuristic that estimates every remaining distance as zero.
///
/// Always admissible and consistent; degrades A* to uniform-cost search
/// (Dijkstra). The safe fallback when no better estimate exists.
#[derive(Debug, Clone, Copy, Default)]
pub struct ZeroDistancer;

impl<L: ?Sized> Distancer<L> for ZeroDistancer {
    fn dist(&self, _a: &L, _b: &L) -> f64 {
        0.0
    }
}

/// A label that exposes a numeric weight.
pub trait Weighted {
    /// The weight carried by this label.
    fn weight(&self) -> f64;
}

/// A label whose weight can also be updated.
///
/// Vertex labels used with
/// [`shortest_path_weighted`](super::shortest_path_weighted) must
/// implement this; the search stores tentative distances in them.
pub trait Weightable: Weighted {
    /// Overwrite the weight carried by this label.
    fn set_weight(&mut self, weight: f64);
}

/// Map-backed weight store keyed by label value.
///
/// Unseen labels weigh positive infinity. Labels are compared by `Eq`, so
/// a caller storing weights for a graph with duplicate labels is
/// responsible for keeping labels distinct.
#[derive(Debug, Clone)]
pub struct MapWeighter<L> {
    weights: HashMap<L, f64>,
}

impl<L: Hash + Eq + Clone> MapWeighter<L> {
    /// Create an empty store.
    pub fn new() -> Self {
        Self {
            weights: HashMap::new(),
        }
    }

    /// Builder-style insertion for test and setup code.
    pub fn with(mut self, label: L, weight: f64) -> Self {
        self.weights.insert(label, weight);
        self
    }

    /// The recorded weight for `label`, if any.
    pub fn get(&self, label: &L) -> Option<f64> {
        self.weights.get(label).copied()
    }

    /// Number of labels with a recorded weight.
    pub fn len(&self) -> usize {
        self.weights.len()
    }

    /// True when no weight has been recorded.
    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }
}

impl<L> Default for MapWeighter<L> {
    fn default() -> Self {
        Self {
            weights: HashMap::new(),
        }
    }
}

impl<L: Hash + Eq + Clone> VertexWeighter<L> for MapWeighter<L> {
    fn weight(&self, label: &L) -> f64 {
        self.weights.get(label).copied().unwrap_or(f64::INFINITY)
    }

    fn set_weight(&mut self, label: &L, weight: f64) {
        self.weights.insert(label.clone(), weight);
    }
}

impl<L: Hash + Eq + Clone> EdgeWeighting<L> for MapWeighter<L> {
    fn weight(&self, label: &L) -> f64 {
        self.weights.get(label).copied().unwrap_or(f64::INFINITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unseen_label_weighs_infinity() {
        let store: MapWeighter<&str> = MapWeighter::new();
        assert_eq!(VertexWeighter::weight(&store, &"a"), f64::INFINITY);
        assert_eq!(store.get(&"a"), None);
    }

    #[test]
    fn test_set_weight_overwrites() {
        let mut store = MapWeighter::new();
        store.set_weight(&"a", 3.0);
        store.set_weight(&"a", 1.5);
        assert_eq!(VertexWeighter::weight(&store, &"a"), 1.5);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_with_builder() {
        let store = MapWeighter::new().with("x", 2.0).with("y", 4.0);
        assert_eq!(EdgeWeighting::weight(&store, &"x"), 2.0);
        assert_eq!(EdgeWeighting::weight(&store, &"y"), 4.0);
    }

    #[test]
    fn test_zero_distancer() {
        assert_eq!(ZeroDistancer.dist(&1, &100), 0.0);
        assert_eq!(ZeroDistancer.dist(&"anything", &"else"), 0.0);
    }
}
