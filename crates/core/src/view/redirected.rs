use alloc::boxed::Box;

use crate::{
    graph::{ArcIter, NodeIter},
    properties::{PropertyGraph, PropertyIter, PropertyValue},
    Arc, ArcFilter, Graph, Node,
};

/// The reinterpreted orientation of a single arc under a
/// [`RedirectedGraph`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Redirection {
    /// Keep the stored orientation, as a directed arc.
    Forward,
    /// Swap the endpoints, as a directed arc.
    Backward,
    /// Reinterpret as an undirected edge.
    Edge,
}

/// A view that reinterprets the direction of every arc through a
/// per-arc function.
#[derive(Debug, Clone, Copy)]
pub struct RedirectedGraph<G, F> {
    graph: G,
    direction: F,
}

impl<G, F> RedirectedGraph<G, F>
where
    G: Graph,
    F: Fn(Arc) -> Redirection,
{
    pub fn new(graph: G, direction: F) -> Self {
        Self { graph, direction }
    }

    pub fn inner(&self) -> &G {
        &self.graph
    }

    fn redirection(&self, arc: Arc) -> Redirection {
        (self.direction)(arc)
    }
}

impl<G, F> Graph for RedirectedGraph<G, F>
where
    G: Graph,
    F: Fn(Arc) -> Redirection,
{
    fn u(&self, arc: Arc) -> Node {
        match self.redirection(arc) {
            Redirection::Backward => self.graph.v(arc),
            _ => self.graph.u(arc),
        }
    }

    fn v(&self, arc: Arc) -> Node {
        match self.redirection(arc) {
            Redirection::Backward => self.graph.u(arc),
            _ => self.graph.v(arc),
        }
    }

    fn is_edge(&self, arc: Arc) -> bool {
        self.redirection(arc) == Redirection::Edge
    }

    fn nodes(&self) -> NodeIter<'_> {
        self.graph.nodes()
    }

    fn arcs(&self, filter: ArcFilter) -> ArcIter<'_> {
        match filter {
            ArcFilter::Edge => Box::new(
                self.graph
                    .arcs(ArcFilter::All)
                    .filter(move |&arc| self.is_edge(arc)),
            ),
            _ => self.graph.arcs(ArcFilter::All),
        }
    }

    fn arcs_at(&self, node: Node, filter: ArcFilter) -> ArcIter<'_> {
        Box::new(
            self.graph
                .arcs_at(node, ArcFilter::All)
                .filter(move |&arc| {
                    let outgoing = self.u(arc) == node;
                    filter.admits(self.is_edge(arc), outgoing)
                }),
        )
    }

    fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    fn has_node(&self, node: Node) -> bool {
        self.graph.has_node(node)
    }

    fn has_arc(&self, arc: Arc) -> bool {
        self.graph.has_arc(arc)
    }
}

impl<G, F> PropertyGraph for RedirectedGraph<G, F>
where
    G: PropertyGraph,
    F: Fn(Arc) -> Redirection,
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
