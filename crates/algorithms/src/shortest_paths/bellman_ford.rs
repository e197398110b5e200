use alloc::vec::Vec;
use core::fmt::{self, Display, Formatter};

use arcgraph_core::{Arc, ArcFilter, Graph, Node, Path};
use error_stack::{Context, Report, Result};
use fxhash::FxBuildHasher;
use hashbrown::HashMap;

use super::ArcCost;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BellmanFordError {
    NodeNotFound,
    /// The node is already reached; a source may be added only once.
    DuplicateSource,
    /// A negative cycle has been found; distances and paths are undefined.
    NegativeCycle,
}

impl Display for BellmanFordError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::NodeNotFound => f.write_str("node not found"),
            Self::DuplicateSource => f.write_str("node is already reached"),
            Self::NegativeCycle => f.write_str("negative cycle reached from the sources"),
        }
    }
}

impl Context for BellmanFordError {}

/// The Bellman-Ford algorithm: cheapest paths under arbitrary (possibly
/// negative) arc costs, with negative-cycle detection.
///
/// Up to `N` full relaxation passes run over all arcs; if a relaxation
/// still improves afterwards, a negative cycle reachable from the sources
/// exists and is reconstructed through the parent arcs. An edge is
/// traversable in both directions and therefore acts as a two-cycle: a
/// negative-cost edge incident to a reached node is itself a negative
/// cycle.
///
/// Once a negative cycle is found, distance and path queries report
/// [`BellmanFordError::NegativeCycle`]; the cycle itself stays available
/// through [`negative_cycle`](Self::negative_cycle).
pub struct BellmanFord<'graph, G: ?Sized, C> {
    graph: &'graph G,
    cost: C,
    distance: HashMap<Node, f64, FxBuildHasher>,
    parent: HashMap<Node, Arc, FxBuildHasher>,
    cycle: Option<Vec<Arc>>,
}

impl<'graph, G, C> BellmanFord<'graph, G, C>
where
    G: Graph + ?Sized,
    C: ArcCost<G>,
{
    pub fn new(graph: &'graph G, cost: C) -> Self {
        Self {
            graph,
            cost,
            distance: HashMap::default(),
            parent: HashMap::default(),
            cycle: None,
        }
    }

    pub fn add_source(&mut self, node: Node) -> Result<(), BellmanFordError> {
        if !self.graph.has_node(node) {
            return Err(Report::new(BellmanFordError::NodeNotFound));
        }
        if self.distance.contains_key(&node) {
            return Err(Report::new(BellmanFordError::DuplicateSource));
        }
        self.distance.insert(node, 0.0);
        Ok(())
    }

    /// Runs the relaxation passes. Returns `true` if distances settled,
    /// `false` if a negative cycle was found.
    pub fn run(&mut self) -> bool {
        let passes = self.graph.node_count();
        for _ in 0..passes {
            if !self.relax_pass(true) {
                return self.cycle.is_none();
            }
        }
        // one extra improving relaxation proves a negative cycle
        if self.relax_pass(false) {
            // find a still-improvable node for the reconstruction
            let witness = self.find_improvable();
            if let Some((node, arc)) = witness {
                self.parent.insert(node, arc);
                self.reconstruct_cycle(node);
            }
        }
        self.cycle.is_none()
    }

    /// The witness cycle, once one was found.
    #[must_use]
    pub fn negative_cycle(&self) -> Option<&[Arc]> {
        self.cycle.as_deref()
    }

    /// The cheapest known distance of `node`; `+∞` if unreached.
    pub fn distance(&self, node: Node) -> Result<f64, BellmanFordError> {
        self.guard()?;
        Ok(self.distance.get(&node).copied().unwrap_or(f64::INFINITY))
    }

    /// The parent arc of `node`; `Arc::INVALID` at sources and unreached
    /// nodes.
    pub fn parent_arc(&self, node: Node) -> Result<Arc, BellmanFordError> {
        self.guard()?;
        Ok(self.parent.get(&node).copied().unwrap_or(Arc::INVALID))
    }

    /// The cheapest path from a source to `target`, or `None` if
    /// unreached.
    pub fn path_to(&self, target: Node) -> Result<Option<Path<&'graph G>>, BellmanFordError> {
        self.guard()?;
        if !self.distance.contains_key(&target) {
            return Ok(None);
        }
        let mut path = Path::new(self.graph);
        path.begin(target);
        let mut node = target;
        loop {
            let Some(&arc) = self.parent.get(&node) else {
                break;
            };
            if path.add_first(arc).is_err() {
                break;
            }
            node = self.graph.other(arc, node);
        }
        Ok(Some(path))
    }

    fn guard(&self) -> Result<(), BellmanFordError> {
        if self.cycle.is_some() {
            return Err(Report::new(BellmanFordError::NegativeCycle));
        }
        Ok(())
    }

    // One pass over every arc. With `apply` the improvements are written
    // back; without it the pass only reports whether any improvement is
    // still possible. Returns whether something improved (or, for a
    // detected edge two-cycle, records it and returns false).
    fn relax_pass(&mut self, apply: bool) -> bool {
        let mut changed = false;
        for arc in self.graph.arcs(ArcFilter::All) {
            let arc_cost = self.cost.cost(self.graph, arc);
            if arc_cost == f64::INFINITY {
                continue;
            }
            let (u, v) = self.graph.endpoints(arc);
            let is_edge = self.graph.is_edge(arc);

            if is_edge
                && arc_cost < 0.0
                && (self.distance.contains_key(&u) || self.distance.contains_key(&v))
            {
                // crossing the edge there and back is a negative cycle
                self.cycle = Some(alloc::vec![arc]);
                return false;
            }

            let mut relax = |from: Node, to: Node| {
                let Some(&from_distance) = self.distance.get(&from) else {
                    return;
                };
                let through = from_distance + arc_cost;
                let improves = match self.distance.get(&to) {
                    Some(&current) => through < current,
                    None => true,
                };
                if improves {
                    changed = true;
                    if apply {
                        self.distance.insert(to, through);
                        self.parent.insert(to, arc);
                    }
                }
            };
            relax(u, v);
            if is_edge && u != v {
                relax(v, u);
            }
        }
        changed
    }

    // The first arc that still improves, with its head, for seeding the
    // cycle reconstruction.
    fn find_improvable(&self) -> Option<(Node, Arc)> {
        for arc in self.graph.arcs(ArcFilter::All) {
            let arc_cost = self.cost.cost(self.graph, arc);
            if arc_cost == f64::INFINITY {
                continue;
            }
            let (u, v) = self.graph.endpoints(arc);
            let mut check = |from: Node, to: Node| {
                let from_distance = self.distance.get(&from)?;
                let through = from_distance + arc_cost;
                match self.distance.get(&to) {
                    Some(&current) if through < current => Some((to, arc)),
                    None => Some((to, arc)),
                    _ => None,
                }
            };
            if let Some(found) = check(u, v) {
                return Some(found);
            }
            if self.graph.is_edge(arc) && u != v {
                if let Some(found) = check(v, u) {
                    return Some(found);
                }
            }
        }
        None
    }

    // Walk the parent arcs N steps to land inside the cycle, then collect
    // it.
    fn reconstruct_cycle(&mut self, seed: Node) {
        let mut node = seed;
        for _ in 0..self.graph.node_count() {
            let Some(&arc) = self.parent.get(&node) else {
                return;
            };
            node = self.graph.other(arc, node);
        }
        let start = node;
        let mut arcs = Vec::new();
        loop {
            let Some(&arc) = self.parent.get(&node) else {
                return;
            };
            arcs.push(arc);
            node = self.graph.other(arc, node);
            if node == start {
                break;
            }
        }
        arcs.reverse();
        self.cycle = Some(arcs);
    }
}
