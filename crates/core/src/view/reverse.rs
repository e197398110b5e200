use crate::{
    graph::{ArcIter, NodeIter},
    properties::{PropertyGraph, PropertyIter, PropertyValue},
    Arc, ArcFilter, Graph, Node,
};

/// A view that swaps the orientation of every directed arc.
///
/// Edges are unaffected; `Forward`/`Backward` incidence filters trade
/// places. Reversing a reversed graph restores the original semantics.
#[derive(Debug, Clone, Copy)]
pub struct ReverseGraph<G> {
    graph: G,
}

impl<G> ReverseGraph<G>
where
    G: Graph,
{
    pub fn new(graph: G) -> Self {
        Self { graph }
    }

    pub fn inner(&self) -> &G {
        &self.graph
    }
}

impl<G> Graph for ReverseGraph<G>
where
    G: Graph,
{
    fn u(&self, arc: Arc) -> Node {
        self.graph.v(arc)
    }

    fn v(&self, arc: Arc) -> Node {
        self.graph.u(arc)
    }

    fn is_edge(&self, arc: Arc) -> bool {
        self.graph.is_edge(arc)
    }

    fn nodes(&self) -> NodeIter<'_> {
        self.graph.nodes()
    }

    fn arcs(&self, filter: ArcFilter) -> ArcIter<'_> {
        self.graph.arcs(filter)
    }

    fn arcs_at(&self, node: Node, filter: ArcFilter) -> ArcIter<'_> {
        self.graph.arcs_at(node, filter.reversed())
    }

    fn arcs_between(&self, u: Node, v: Node, filter: ArcFilter) -> ArcIter<'_> {
        self.graph.arcs_between(u, v, filter.reversed())
    }

    fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    fn arc_count(&self, filter: ArcFilter) -> usize {
        self.graph.arc_count(filter)
    }

    fn arc_count_at(&self, node: Node, filter: ArcFilter) -> usize {
        self.graph.arc_count_at(node, filter.reversed())
    }

    fn arc_count_between(&self, u: Node, v: Node, filter: ArcFilter) -> usize {
        self.graph.arc_count_between(u, v, filter.reversed())
    }

    fn has_node(&self, node: Node) -> bool {
        self.graph.has_node(node)
    }

    fn has_arc(&self, arc: Arc) -> bool {
        self.graph.has_arc(arc)
    }
}

impl<G> PropertyGraph for ReverseGraph<G>
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

#[cfg(test)]
mod tests {
    use alloc::vec::Vec;

    use super::ReverseGraph;
    use crate::{ArcFilter, CustomGraph, Directedness, Graph};

    #[test]
    fn swaps_endpoints_and_filters() {
        let mut graph = CustomGraph::new();
        let a = graph.add_node().unwrap();
        let b = graph.add_node().unwrap();
        let ab = graph.add_arc(a, b, Directedness::Directed).unwrap();
        let edge = graph.add_arc(a, b, Directedness::Edge).unwrap();

        let reversed = ReverseGraph::new(&graph);
        assert_eq!(reversed.u(ab), b);
        assert_eq!(reversed.v(ab), a);
        assert!(reversed.is_edge(edge));

        assert_eq!(
            reversed.arcs_at(a, ArcFilter::Forward).collect::<Vec<_>>(),
            [edge]
        );
        assert_eq!(
            reversed.arcs_at(b, ArcFilter::Forward).collect::<Vec<_>>(),
            [ab, edge]
        );
        assert_eq!(reversed.arc_count_at(a, ArcFilter::Backward), 2);
    }

    #[test]
    fn double_reversal_is_identity() {
        let mut graph = CustomGraph::new();
        let a = graph.add_node().unwrap();
        let b = graph.add_node().unwrap();
        let ab = graph.add_arc(a, b, Directedness::Directed).unwrap();

        let twice = ReverseGraph::new(ReverseGraph::new(&graph));
        assert_eq!(twice.u(ab), a);
        assert_eq!(twice.v(ab), b);
        assert_eq!(twice.arc_count_at(a, ArcFilter::Forward), 1);
    }
}
