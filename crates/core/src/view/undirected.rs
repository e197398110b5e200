use crate::{
    graph::{ArcIter, NodeIter},
    properties::{PropertyGraph, PropertyIter, PropertyValue},
    Arc, ArcFilter, Graph, Node,
};

/// A view under which every arc reports as an undirected edge.
///
/// Since edges pass every incidence filter, all filters collapse to `All`.
#[derive(Debug, Clone, Copy)]
pub struct UndirectedGraph<G> {
    graph: G,
}

impl<G> UndirectedGraph<G>
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

impl<G> Graph for UndirectedGraph<G>
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
        self.graph.has_arc(arc)
    }

    fn nodes(&self) -> NodeIter<'_> {
        self.graph.nodes()
    }

    fn arcs(&self, _filter: ArcFilter) -> ArcIter<'_> {
        self.graph.arcs(ArcFilter::All)
    }

    fn arcs_at(&self, node: Node, _filter: ArcFilter) -> ArcIter<'_> {
        self.graph.arcs_at(node, ArcFilter::All)
    }

    fn arcs_between(&self, u: Node, v: Node, _filter: ArcFilter) -> ArcIter<'_> {
        self.graph.arcs_between(u, v, ArcFilter::All)
    }

    fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    fn arc_count(&self, _filter: ArcFilter) -> usize {
        self.graph.arc_count(ArcFilter::All)
    }

    fn arc_count_at(&self, node: Node, _filter: ArcFilter) -> usize {
        self.graph.arc_count_at(node, ArcFilter::All)
    }

    fn arc_count_between(&self, u: Node, v: Node, _filter: ArcFilter) -> usize {
        self.graph.arc_count_between(u, v, ArcFilter::All)
    }

    fn has_node(&self, node: Node) -> bool {
        self.graph.has_node(node)
    }

    fn has_arc(&self, arc: Arc) -> bool {
        self.graph.has_arc(arc)
    }
}

impl<G> PropertyGraph for UndirectedGraph<G>
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
    use super::UndirectedGraph;
    use crate::{ArcFilter, CustomGraph, Directedness, Graph};

    #[test]
    fn every_arc_becomes_an_edge() {
        let mut graph = CustomGraph::new();
        let a = graph.add_node().unwrap();
        let b = graph.add_node().unwrap();
        let ab = graph.add_arc(a, b, Directedness::Directed).unwrap();

        let view = UndirectedGraph::new(&graph);
        assert!(view.is_edge(ab));
        assert_eq!(view.arc_count(ArcFilter::Edge), 1);
        assert_eq!(view.arcs_at(b, ArcFilter::Forward).count(), 1);
        assert_eq!(view.arcs_at(a, ArcFilter::Backward).count(), 1);
        assert_eq!(view.arc_count_at(a, ArcFilter::Edge), 1);
    }
}
