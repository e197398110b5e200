use alloc::boxed::Box;
use core::fmt::{self, Display, Formatter};

use error_stack::{Context, Report, Result};
use fxhash::FxBuildHasher;
use hashbrown::HashMap;
use indexmap::IndexSet;

use crate::{
    graph::{ArcIter, NodeIter},
    properties::{PropertyGraph, PropertyIter, PropertyValue},
    Arc, ArcFilter, Graph, Node,
};

/// Contract violations of [`Matching`] mutation. Preconditions run before
/// any state change, so a failed call leaves the matching intact.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchingError {
    /// The arc does not exist in the underlying graph.
    ArcNotFound,
    /// Loop arcs cannot participate in a matching.
    Loop,
    /// An endpoint of the arc is already covered by another matching arc.
    EndpointMatched,
}

impl Display for MatchingError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::ArcNotFound => f.write_str("arc not found"),
            Self::Loop => f.write_str("loop arcs cannot be matched"),
            Self::EndpointMatched => f.write_str("endpoint is already matched"),
        }
    }
}

impl Context for MatchingError {}

/// A set of underlying arcs no two of which share an endpoint, itself a
/// graph over the underlying node set.
#[derive(Debug, Clone)]
pub struct Matching<G> {
    graph: G,
    matched: HashMap<Node, Arc, FxBuildHasher>,
    arcs: IndexSet<Arc, FxBuildHasher>,
}

impl<G> Matching<G>
where
    G: Graph,
{
    /// An empty matching over `graph`.
    pub fn new(graph: G) -> Self {
        Self {
            graph,
            matched: HashMap::default(),
            arcs: IndexSet::default(),
        }
    }

    pub fn inner(&self) -> &G {
        &self.graph
    }

    /// Adds `arc` to (or removes it from) the matching.
    ///
    /// Enabling fails if the arc is a loop or either endpoint is already
    /// matched by a different arc; enabling an arc twice and disabling an
    /// absent arc are no-ops.
    pub fn enable(&mut self, arc: Arc, enabled: bool) -> Result<(), MatchingError> {
        if enabled {
            if self.arcs.contains(&arc) {
                return Ok(());
            }
            if !self.graph.has_arc(arc) {
                return Err(Report::new(MatchingError::ArcNotFound));
            }
            let (u, v) = self.graph.endpoints(arc);
            if u == v {
                return Err(Report::new(MatchingError::Loop));
            }
            if self.matched.contains_key(&u) || self.matched.contains_key(&v) {
                return Err(Report::new(MatchingError::EndpointMatched));
            }
            self.matched.insert(u, arc);
            self.matched.insert(v, arc);
            self.arcs.insert(arc);
        } else if self.arcs.swap_remove(&arc) {
            let (u, v) = self.graph.endpoints(arc);
            self.matched.remove(&u);
            self.matched.remove(&v);
        }
        Ok(())
    }

    /// The matching arc covering `node`, or `Arc::INVALID`.
    #[must_use]
    pub fn matched_arc(&self, node: Node) -> Arc {
        self.matched.get(&node).copied().unwrap_or(Arc::INVALID)
    }

    #[must_use]
    pub fn is_matched(&self, node: Node) -> bool {
        self.matched.contains_key(&node)
    }

    /// The number of arcs in the matching.
    #[must_use]
    pub fn size(&self) -> usize {
        self.arcs.len()
    }

    pub fn clear(&mut self) {
        self.matched.clear();
        self.arcs.clear();
    }
}

impl<G> Graph for Matching<G>
where
    G: Graph,
{
    fn u(&self, arc: Arc) -> Node {
        self.graph.u(arc)
    }

    fn v(&self, arc: Arc) -> Node {
        self.graph.v(arc)
    }

    fn is_edge(&self, arc: Arc) -> bool {
        self.graph.is_edge(arc)
    }

    fn nodes(&self) -> NodeIter<'_> {
        self.graph.nodes()
    }

    fn arcs(&self, filter: ArcFilter) -> ArcIter<'_> {
        Box::new(
            self.arcs
                .iter()
                .copied()
                .filter(move |&arc| filter != ArcFilter::Edge || self.graph.is_edge(arc)),
        )
    }

    fn arcs_at(&self, node: Node, filter: ArcFilter) -> ArcIter<'_> {
        let arc = self.matched.get(&node).copied();
        Box::new(arc.into_iter().filter(move |&arc| {
            filter.admits(self.graph.is_edge(arc), self.graph.u(arc) == node)
        }))
    }

    fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    fn arc_count(&self, filter: ArcFilter) -> usize {
        match filter {
            ArcFilter::Edge => self.arcs(filter).count(),
            _ => self.arcs.len(),
        }
    }

    fn has_node(&self, node: Node) -> bool {
        self.graph.has_node(node)
    }

    fn has_arc(&self, arc: Arc) -> bool {
        self.arcs.contains(&arc)
    }
}

impl<G> PropertyGraph for Matching<G>
where
    G: PropertyGraph,
{
    fn node_property(&self, node: Node, name: &str) -> Option<&PropertyValue> {
        self.graph.node_property(node, name)
    }

    fn arc_property(&self, arc: Arc, name: &str) -> Option<&PropertyValue> {
        self.graph.arc_property(arc, name)
    }

    fn node_properties(&self) -> PropertyIter<'_, Node> {
        self.graph.node_properties()
    }

    fn arc_properties(&self) -> PropertyIter<'_, Arc> {
        self.graph.arc_properties()
    }
}
