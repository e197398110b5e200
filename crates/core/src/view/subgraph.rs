use alloc::boxed::Box;

use fxhash::FxBuildHasher;
use hashbrown::HashSet;

use crate::{
    graph::{ArcIter, NodeIter},
    properties::{PropertyGraph, PropertyIter, PropertyValue},
    Arc, ArcFilter, Graph, Node,
};

/// A view restricting an underlying graph to its enabled nodes and arcs.
///
/// Enabledness is stored as a default flag plus an exception set, for both
/// nodes and arcs, so flipping one entity (or all of them at once) is
/// O(1). An arc is effectively present only when it is enabled *and* both
/// its endpoints are enabled.
#[derive(Debug, Clone)]
pub struct Subgraph<G> {
    graph: G,
    node_default: bool,
    arc_default: bool,
    node_exceptions: HashSet<Node, FxBuildHasher>,
    arc_exceptions: HashSet<Arc, FxBuildHasher>,
}

impl<G> Subgraph<G>
where
    G: Graph,
{
    /// Wraps `graph` with everything enabled.
    pub fn new(graph: G) -> Self {
        Self {
            graph,
            node_default: true,
            arc_default: true,
            node_exceptions: HashSet::default(),
            arc_exceptions: HashSet::default(),
        }
    }

    pub fn inner(&self) -> &G {
        &self.graph
    }

    pub fn enable_node(&mut self, node: Node, enabled: bool) {
        if enabled == self.node_default {
            self.node_exceptions.remove(&node);
        } else {
            self.node_exceptions.insert(node);
        }
    }

    pub fn enable_arc(&mut self, arc: Arc, enabled: bool) {
        if enabled == self.arc_default {
            self.arc_exceptions.remove(&arc);
        } else {
            self.arc_exceptions.insert(arc);
        }
    }

    /// Enables or disables every node at once.
    pub fn enable_all_nodes(&mut self, enabled: bool) {
        self.node_default = enabled;
        self.node_exceptions.clear();
    }

    /// Enables or disables every arc at once.
    pub fn enable_all_arcs(&mut self, enabled: bool) {
        self.arc_default = enabled;
        self.arc_exceptions.clear();
    }

    #[must_use]
    pub fn is_node_enabled(&self, node: Node) -> bool {
        self.node_default ^ self.node_exceptions.contains(&node)
    }

    /// The arc's own flag, ignoring endpoint enabledness.
    #[must_use]
    pub fn is_arc_enabled(&self, arc: Arc) -> bool {
        self.arc_default ^ self.arc_exceptions.contains(&arc)
    }

    fn is_arc_present(&self, arc: Arc) -> bool {
        self.is_arc_enabled(arc)
            && self.is_node_enabled(self.graph.u(arc))
            && self.is_node_enabled(self.graph.v(arc))
    }
}

impl<G> Graph for Subgraph<G>
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
        Box::new(
            self.graph
                .nodes()
                .filter(move |&node| self.is_node_enabled(node)),
        )
    }

    fn arcs(&self, filter: ArcFilter) -> ArcIter<'_> {
        Box::new(
            self.graph
                .arcs(filter)
                .filter(move |&arc| self.is_arc_present(arc)),
        )
    }

    fn arcs_at(&self, node: Node, filter: ArcFilter) -> ArcIter<'_> {
        if !self.is_node_enabled(node) {
            return Box::new(core::iter::empty());
        }
        Box::new(
            self.graph
                .arcs_at(node, filter)
                .filter(move |&arc| self.is_arc_present(arc)),
        )
    }

    fn arcs_between(&self, u: Node, v: Node, filter: ArcFilter) -> ArcIter<'_> {
        if !self.is_node_enabled(u) || !self.is_node_enabled(v) {
            return Box::new(core::iter::empty());
        }
        Box::new(
            self.graph
                .arcs_between(u, v, filter)
                .filter(move |&arc| self.is_arc_present(arc)),
        )
    }

    fn node_count(&self) -> usize {
        let live_exceptions = self
            .node_exceptions
            .iter()
            .filter(|&&node| self.graph.has_node(node))
            .count();
        if self.node_default {
            self.graph.node_count() - live_exceptions
        } else {
            live_exceptions
        }
    }

    fn has_node(&self, node: Node) -> bool {
        self.graph.has_node(node) && self.is_node_enabled(node)
    }

    fn has_arc(&self, arc: Arc) -> bool {
        self.graph.has_arc(arc) && self.is_arc_present(arc)
    }
}

impl<G> PropertyGraph for Subgraph<G>
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

    use super::Subgraph;
    use crate::{ArcFilter, CustomGraph, Directedness, Graph};

    fn triangle() -> (CustomGraph, [crate::Node; 3], [crate::Arc; 3]) {
        let mut graph = CustomGraph::new();
        let a = graph.add_node().unwrap();
        let b = graph.add_node().unwrap();
        let c = graph.add_node().unwrap();
        let ab = graph.add_arc(a, b, Directedness::Edge).unwrap();
        let bc = graph.add_arc(b, c, Directedness::Edge).unwrap();
        let ca = graph.add_arc(c, a, Directedness::Directed).unwrap();
        (graph, [a, b, c], [ab, bc, ca])
    }

    #[test]
    fn everything_enabled_matches_the_underlying_graph() {
        let (graph, nodes, _) = triangle();
        let view = Subgraph::new(&graph);
        assert_eq!(view.node_count(), graph.node_count());
        assert_eq!(
            view.arc_count(ArcFilter::All),
            graph.arc_count(ArcFilter::All)
        );
        for &node in &nodes {
            assert_eq!(
                view.arc_count_at(node, ArcFilter::All),
                graph.arc_count_at(node, ArcFilter::All)
            );
        }
    }

    #[test]
    fn disabling_an_arc_hides_only_that_arc() {
        let (graph, [a, b, _], [ab, bc, ca]) = triangle();
        let mut view = Subgraph::new(&graph);
        view.enable_arc(ab, false);

        assert!(!view.has_arc(ab));
        assert!(view.has_arc(bc));
        assert_eq!(view.arc_count(ArcFilter::All), 2);
        assert_eq!(view.arcs_at(a, ArcFilter::All).collect::<Vec<_>>(), [ca]);
        assert_eq!(view.arcs_at(b, ArcFilter::All).collect::<Vec<_>>(), [bc]);

        view.enable_arc(ab, true);
        assert_eq!(view.arc_count(ArcFilter::All), 3);
    }

    #[test]
    fn disabling_a_node_hides_its_incident_arcs() {
        let (graph, [a, b, c], [_, bc, _]) = triangle();
        let mut view = Subgraph::new(&graph);
        view.enable_node(a, false);

        assert!(!view.has_node(a));
        assert_eq!(view.node_count(), 2);
        assert_eq!(view.nodes().collect::<Vec<_>>(), [b, c]);
        // arcs touching a are absent even though still enabled themselves
        assert_eq!(view.arcs(ArcFilter::All).collect::<Vec<_>>(), [bc]);
        assert_eq!(view.arc_count(ArcFilter::All), 1);
        assert_eq!(view.arcs_at(a, ArcFilter::All).count(), 0);
        assert_eq!(view.arcs_between(a, b, ArcFilter::All).count(), 0);
    }

    #[test]
    fn default_flip_inverts_the_selection() {
        let (graph, [a, _, _], _) = triangle();
        let mut view = Subgraph::new(&graph);
        view.enable_all_nodes(false);
        assert_eq!(view.node_count(), 0);
        view.enable_node(a, true);
        assert_eq!(view.node_count(), 1);
        assert_eq!(view.nodes().collect::<Vec<_>>(), [a]);
        // no arc survives with only one endpoint enabled
        assert_eq!(view.arc_count(ArcFilter::All), 0);
    }

    #[test]
    fn counts_agree_with_enumeration_under_filters() {
        let (graph, nodes, [ab, _, _]) = triangle();
        let mut view = Subgraph::new(&graph);
        view.enable_arc(ab, false);
        view.enable_node(nodes[2], false);

        for filter in [
            ArcFilter::All,
            ArcFilter::Edge,
            ArcFilter::Forward,
            ArcFilter::Backward,
        ] {
            assert_eq!(view.arc_count(filter), view.arcs(filter).count());
            for &node in &nodes {
                assert_eq!(
                    view.arc_count_at(node, filter),
                    view.arcs_at(node, filter).count()
                );
            }
        }
    }
}
