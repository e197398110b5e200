use alloc::{boxed::Box, vec::Vec};
use core::fmt::{self, Display, Formatter};

use arcgraph_core::{Arc, ArcFilter, DisjointSet, Graph, Node};
use error_stack::{Context, Report, Result};
use fxhash::FxBuildHasher;
use hashbrown::HashMap;
use indexmap::IndexSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KruskalError {
    ArcNotFound,
}

impl Display for KruskalError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::ArcNotFound => f.write_str("arc not found"),
        }
    }
}

impl Context for KruskalError {}

/// Kruskal's minimum-cost spanning forest, with optional per-node degree
/// caps and manual pre-pinning.
///
/// Arcs are considered in ascending cost order (ties by arc id); an arc
/// joins the forest when its endpoints lie in different components and no
/// degree cap is violated. [`add_arc`](Self::add_arc) force-feeds an arc
/// ahead of the scan, for growing around a partial forest. Arc orientation
/// is ignored throughout.
pub struct Kruskal<'graph, G: ?Sized> {
    graph: &'graph G,
    components: DisjointSet<Node>,
    degree: HashMap<Node, usize, FxBuildHasher>,
    max_degree: Option<Box<dyn Fn(Node) -> Option<usize> + 'graph>>,
    // cost-descending; consumed from the back
    queue: Vec<(f64, Arc)>,
    forest: IndexSet<Arc, FxBuildHasher>,
    arcs_to_go: i64,
}

impl<'graph, G> Kruskal<'graph, G>
where
    G: Graph + ?Sized,
{
    pub fn new<C>(graph: &'graph G, cost: C) -> Self
    where
        C: Fn(Arc) -> f64,
    {
        let mut queue: Vec<(f64, Arc)> = graph
            .arcs(ArcFilter::All)
            .map(|arc| (cost(arc), arc))
            .collect();
        queue.sort_by(|(cost_a, arc_a), (cost_b, arc_b)| {
            cost_b
                .total_cmp(cost_a)
                .then_with(|| arc_b.cmp(arc_a))
        });
        Self {
            graph,
            components: DisjointSet::new(),
            degree: HashMap::default(),
            max_degree: None,
            queue,
            forest: IndexSet::default(),
            arcs_to_go: graph.node_count() as i64 - 1,
        }
    }

    /// Caps the forest degree of each node; `None` means unbounded.
    pub fn set_max_degree<D>(&mut self, max_degree: D)
    where
        D: Fn(Node) -> Option<usize> + 'graph,
    {
        self.max_degree = Some(Box::new(max_degree));
    }

    /// Forces `arc` into the forest ahead of the cost scan, if it neither
    /// closes a cycle nor violates a degree cap. Returns whether it was
    /// added.
    pub fn add_arc(&mut self, arc: Arc) -> Result<bool, KruskalError> {
        if !self.graph.has_arc(arc) {
            return Err(Report::new(KruskalError::ArcNotFound));
        }
        Ok(self.try_add(arc))
    }

    /// Processes queued arcs until one joins the forest; returns it, or
    /// `None` when the forest is complete.
    pub fn step(&mut self) -> Option<Arc> {
        while self.arcs_to_go > 0 {
            let (_, arc) = self.queue.pop()?;
            if self.try_add(arc) {
                return Some(arc);
            }
        }
        None
    }

    /// Runs the scan to completion.
    pub fn run(&mut self) {
        while self.step().is_some() {}
    }

    #[must_use]
    pub fn in_forest(&self, arc: Arc) -> bool {
        self.forest.contains(&arc)
    }

    /// The forest arcs, in the order they were added.
    pub fn forest(&self) -> impl Iterator<Item = Arc> + '_ {
        self.forest.iter().copied()
    }

    #[must_use]
    pub fn forest_size(&self) -> usize {
        self.forest.len()
    }

    fn try_add(&mut self, arc: Arc) -> bool {
        let (u, v) = self.graph.endpoints(arc);
        if self.components.equiv(u, v) {
            return false;
        }
        if let Some(max_degree) = &self.max_degree {
            for node in [u, v] {
                if let Some(cap) = max_degree(node) {
                    if self.degree.get(&node).copied().unwrap_or(0) + 1 > cap {
                        return false;
                    }
                }
            }
        }
        self.components.union(u, v);
        *self.degree.entry(u).or_insert(0) += 1;
        *self.degree.entry(v).or_insert(0) += 1;
        self.forest.insert(arc);
        self.arcs_to_go -= 1;
        true
    }
}
