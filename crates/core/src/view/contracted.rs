use alloc::boxed::Box;
use core::iter;

use crate::{
    graph::{ArcIter, NodeIter},
    properties::{PropertyGraph, PropertyIter, PropertyValue},
    Arc, ArcFilter, DisjointSet, Graph, Node,
};

/// A view identifying groups of nodes of the underlying graph.
///
/// Merging two nodes unifies their equivalence classes; a node is present in
/// the view iff it is the representative of its class. Arcs are untouched,
/// but their endpoints report as representatives, so an arc whose endpoints
/// fall into one class becomes a loop. Such a loop still appears exactly
/// once in an incidence enumeration: when the enumeration would reach it
/// through both underlying endpoints, only the visit through the underlying
/// `u` emits it.
#[derive(Debug, Clone)]
pub struct ContractedGraph<G> {
    graph: G,
    classes: DisjointSet<Node>,
}

impl<G> ContractedGraph<G>
where
    G: Graph,
{
    pub fn new(graph: G) -> Self {
        Self {
            graph,
            classes: DisjointSet::new(),
        }
    }

    pub fn inner(&self) -> &G {
        &self.graph
    }

    /// The representative of the class containing `node`.
    #[must_use]
    pub fn representative(&self, node: Node) -> Node {
        self.classes.find(node)
    }

    /// Unifies the classes of `u` and `v`. Returns whether a merge
    /// happened.
    pub fn merge(&mut self, u: Node, v: Node) -> bool {
        self.classes.union(u, v)
    }

    /// The number of merges performed since construction or
    /// [`reset`](Self::reset).
    #[must_use]
    pub fn union_count(&self) -> usize {
        self.classes.union_count()
    }

    /// Dissolves every class, restoring the underlying graph's node set.
    pub fn reset(&mut self) {
        self.classes.reset();
    }

    // Whether `filter` would report `arc` in the incidence enumeration of
    // the underlying node `at`.
    fn admitted_at(&self, arc: Arc, at: Node, filter: ArcFilter) -> bool {
        filter.admits(self.graph.is_edge(arc), self.graph.u(arc) == at)
    }
}

impl<G> Graph for ContractedGraph<G>
where
    G: Graph,
{
    fn u(&self, arc: Arc) -> Node {
        self.classes.find(self.graph.u(arc))
    }

    fn v(&self, arc: Arc) -> Node {
        self.classes.find(self.graph.v(arc))
    }

    fn is_edge(&self, arc: Arc) -> bool {
        self.graph.is_edge(arc)
    }

    fn nodes(&self) -> NodeIter<'_> {
        Box::new(
            self.graph
                .nodes()
                .filter(move |&node| self.classes.find(node) == node),
        )
    }

    fn arcs(&self, filter: ArcFilter) -> ArcIter<'_> {
        self.graph.arcs(filter)
    }

    fn arcs_at(&self, node: Node, filter: ArcFilter) -> ArcIter<'_> {
        if !self.has_node(node) {
            return Box::new(iter::empty());
        }
        Box::new(self.classes.members(node).flat_map(move |member| {
            self.graph
                .arcs_at(member, filter)
                .filter(move |&arc| {
                    let u = self.graph.u(arc);
                    let v = self.graph.v(arc);
                    if u == v || self.classes.find(u) != self.classes.find(v) {
                        // not a contracted loop; the enumeration meets it
                        // through exactly one member
                        return true;
                    }
                    // contracted loop: suppress the second visit
                    member == u || !self.admitted_at(arc, u, filter)
                })
        }))
    }

    fn node_count(&self) -> usize {
        self.graph.node_count() - self.classes.union_count()
    }

    fn arc_count(&self, filter: ArcFilter) -> usize {
        self.graph.arc_count(filter)
    }

    fn has_node(&self, node: Node) -> bool {
        self.graph.has_node(node) && self.classes.find(node) == node
    }

    fn has_arc(&self, arc: Arc) -> bool {
        self.graph.has_arc(arc)
    }
}

impl<G> PropertyGraph for ContractedGraph<G>
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
