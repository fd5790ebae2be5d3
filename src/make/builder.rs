//! Dependency graph construction and rebuild planning.

use super::rules::{FileInfo, Rule};
use super::MakeError;
use crate::graph::{LabeledGraph, VertexId};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, HashSet};

/// Vertex label of the dependency graph: the target name plus the
/// in-degree counter consumed by the topological pass.
#[derive(Debug, Clone)]
struct TargetLabel {
    name: String,
    pending: usize,
}

/// The outcome of a build: the requested targets and the command lines
/// to emit, prerequisites first.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuildPlan {
    /// The requested target names.
    pub targets: Vec<String>,
    /// Command lines verbatim, in emission order.
    pub commands: Vec<String>,
}

/// Rebuild planner over parsed rules and recorded change dates.
///
/// Construction builds the dependency graph (one vertex per known name,
/// one `prerequisite -> target` edge per dependency) and rejects directly
/// mutual dependencies; longer cycles are rejected by the topological
/// pass that gates every build.
#[derive(Debug)]
pub struct TargetBuilder {
    rules: HashMap<String, Rule>,
    rule_order: Vec<String>,
    change_dates: HashMap<String, u64>,
    // Monotonic build clock; starts at the last build time so every
    // rebuild stamp is newer than every recorded change date.
    clock: u64,
    graph: LabeledGraph<TargetLabel, ()>,
    vertex_index: HashMap<String, VertexId>,
}

impl TargetBuilder {
    /// Create a builder over `rules` and the change dates of `info`.
    ///
    /// # Errors
    ///
    /// Returns [`MakeError::CircularDependency`] when two targets depend
    /// directly on each other.
    pub fn new(rules: Vec<Rule>, info: FileInfo) -> Result<Self, MakeError> {
        let mut builder = Self {
            rules: HashMap::new(),
            rule_order: Vec::new(),
            change_dates: info.change_dates,
            clock: info.last_build_time,
            graph: LabeledGraph::directed(),
            vertex_index: HashMap::new(),
        };
        for rule in rules {
            builder.rule_order.push(rule.target.clone());
            builder.rules.insert(rule.target.clone(), rule);
        }
        builder.construct_graph()?;
        Ok(builder)
    }

    /// Compute a full build order over every known name, dependencies
    /// before dependents; ties resolve smallest-name-first.
    ///
    /// # Errors
    ///
    /// Returns [`MakeError::CircularDependency`] when the dependency
    /// graph contains a cycle.
    pub fn topological_order(&mut self) -> Result<Vec<String>, MakeError> {
        let ids: Vec<VertexId> = self.graph.vertices().collect();
        for v in ids.iter().copied() {
            let pending = self.graph.in_degree(v)?;
            self.graph.vertex_label_mut(v)?.pending = pending;
        }

        let mut ready: BTreeMap<String, VertexId> = BTreeMap::new();
        for v in ids {
            let label = self.graph.vertex_label(v)?;
            if label.pending == 0 {
                ready.insert(label.name.clone(), v);
            }
        }

        let mut order = Vec::new();
        while let Some((name, v)) = ready.pop_first() {
            order.push(name);
            let successors: Vec<VertexId> = self.graph.successors(v)?.collect();
            for succ in successors {
                let label = self.graph.vertex_label_mut(succ)?;
                label.pending -= 1;
                if label.pending == 0 {
                    ready.insert(label.name.clone(), succ);
                }
            }
        }

        if order.len() < self.graph.vertex_count() {
            return Err(MakeError::CircularDependency);
        }
        Ok(order)
    }

    /// Plan a build of `requested` targets, defaulting to the first
    /// rule's target when empty.
    ///
    /// Requested targets are rebuilt unconditionally; a dependency is
    /// rebuilt iff it has no recorded change date or some prerequisite's
    /// change date (possibly a fresh rebuild stamp) is newer than its
    /// own. Rebuilding emits the rule's command lines verbatim and stamps
    /// the target with a monotonically advancing change date.
    ///
    /// # Errors
    ///
    /// Returns [`MakeError::CircularDependency`] for cyclic dependencies,
    /// [`MakeError::UnknownTarget`] for a name with neither a rule nor a
    /// change date, and [`MakeError::NoTargets`] when nothing is
    /// requested and the makefile has no rules.
    pub fn build(&mut self, requested: &[String]) -> Result<BuildPlan, MakeError> {
        let order = self.topological_order()?;
        debug!("Dependency order spans {} names", order.len());

        let targets: Vec<String> = if requested.is_empty() {
            let first = self.rule_order.first().ok_or(MakeError::NoTargets)?;
            vec![first.clone()]
        } else {
            requested.to_vec()
        };

        let mut built = HashSet::new();
        let mut commands = Vec::new();
        for target in &targets {
            self.build_target(target, true, &mut built, &mut commands)?;
        }
        info!("Planned {} command(s) for {:?}", commands.len(), targets);
        Ok(BuildPlan { targets, commands })
    }

    fn construct_graph(&mut self) -> Result<(), MakeError> {
        for target in self.rule_order.clone() {
            let target_v = self.intern(&target);
            let prereqs = self
                .rules
                .get(&target)
                .map(|rule| rule.prerequisites.clone())
                .unwrap_or_default();
            for prereq in prereqs {
                let prereq_v = self.intern(&prereq);
                // A dependency in both directions cannot be ordered.
                if self.graph.contains_edge(target_v, prereq_v)? {
                    return Err(MakeError::CircularDependency);
                }
                self.graph.add_edge(prereq_v, target_v, ())?;
            }
        }

        // Names known only from the fileinfo, in sorted order.
        let mut names: Vec<String> = self.change_dates.keys().cloned().collect();
        names.sort();
        for name in names {
            self.intern(&name);
        }

        debug!(
            "Dependency graph: {} names, {} edges",
            self.graph.vertex_count(),
            self.graph.edge_count()
        );
        Ok(())
    }

    fn intern(&mut self, name: &str) -> VertexId {
        if let Some(&v) = self.vertex_index.get(name) {
            return v;
        }
        let v = self.graph.add_vertex(TargetLabel {
            name: name.to_string(),
            pending: 0,
        });
        self.vertex_index.insert(name.to_string(), v);
        v
    }

    fn build_target(
        &mut self,
        name: &str,
        forced: bool,
        built: &mut HashSet<String>,
        commands: &mut Vec<String>,
    ) -> Result<u64, MakeError> {
        let rule = self.rules.get(name).cloned();
        if rule.is_none() && !self.change_dates.contains_key(name) {
            return Err(MakeError::UnknownTarget(name.to_string()));
        }
        if !built.insert(name.to_string()) {
            return Ok(self.change_dates.get(name).copied().unwrap_or(0));
        }

        let mut newest_prereq: Option<u64> = None;
        if let Some(rule) = &rule {
            for prereq in &rule.prerequisites {
                let date = self.build_target(prereq, false, built, commands)?;
                newest_prereq = Some(newest_prereq.map_or(date, |known| known.max(date)));
            }
        }

        let own_date = self.change_dates.get(name).copied();
        let needs_rebuild = match own_date {
            None => true,
            Some(own) => forced || newest_prereq.map_or(false, |newest| newest > own),
        };

        if let Some(rule) = &rule {
            if needs_rebuild {
                debug!("Rebuilding {name}");
                commands.extend(rule.commands.iter().cloned());
                self.clock += 1;
                self.change_dates.insert(name.to_string(), self.clock);
            }
        }
        Ok(self.change_dates.get(name).copied().unwrap_or(0))
    }
}
