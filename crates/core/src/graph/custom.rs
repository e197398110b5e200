use alloc::{boxed::Box, string::String};
use core::iter;

use error_stack::{Report, Result};
use fxhash::FxBuildHasher;
use indexmap::IndexMap;

use super::registers::Registers;
use crate::{
    graph::{ArcIter, Graph, NodeIter},
    properties::{PropertyGraph, PropertyIter, PropertyStore, PropertyValue},
    Arc, ArcFilter, Directedness, GraphError, IdAllocator, Node,
};

#[derive(Debug, Clone, Copy)]
struct ArcRecord {
    u: Node,
    v: Node,
    is_edge: bool,
}

/// A buildable, destroyable adjacency-list graph.
///
/// Nodes and arcs live in insertion-ordered registries, so enumeration is
/// deterministic. Each node keeps the four incidence registers, making
/// incidence queries and counts O(1) per reported arc. Node ids may be
/// chosen by the caller; otherwise an [`IdAllocator`] picks one.
///
/// # Example
///
/// ```
/// use arcgraph_core::{CustomGraph, ArcFilter, Directedness, Graph};
///
/// let mut graph = CustomGraph::new();
/// let a = graph.add_node()?;
/// let b = graph.add_node()?;
/// let arc = graph.add_arc(a, b, Directedness::Directed)?;
///
/// assert_eq!(graph.u(arc), a);
/// assert_eq!(graph.arc_count_at(b, ArcFilter::Backward), 1);
/// # Ok::<(), error_stack::Report<arcgraph_core::GraphError>>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct CustomGraph {
    nodes: IndexMap<Node, Registers, FxBuildHasher>,
    arcs: IndexMap<Arc, ArcRecord, FxBuildHasher>,
    edge_count: usize,
    node_ids: IdAllocator,
    arc_ids: IdAllocator,
    node_properties: PropertyStore<Node>,
    arc_properties: PropertyStore<Arc>,
}

impl CustomGraph {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a node under a fresh id.
    pub fn add_node(&mut self) -> Result<Node, GraphError> {
        if self.nodes.len() >= u32::MAX as usize {
            return Err(Report::new(GraphError::CapacityExhausted));
        }
        let nodes = &self.nodes;
        let id = self.node_ids.allocate(|id| nodes.contains_key(&Node::new(id)))?;
        let node = Node::new(id);
        self.nodes.insert(node, Registers::default());
        Ok(node)
    }

    /// Adds a node under the given id, which must not be live.
    pub fn add_node_with_id(&mut self, id: i64) -> Result<Node, GraphError> {
        if id == 0 {
            return Err(Report::new(GraphError::InvalidId));
        }
        let node = Node::new(id);
        if self.nodes.contains_key(&node) {
            return Err(Report::new(GraphError::DuplicateNode));
        }
        if self.nodes.len() >= u32::MAX as usize {
            return Err(Report::new(GraphError::CapacityExhausted));
        }
        self.nodes.insert(node, Registers::default());
        self.node_ids.mark_used(id);
        Ok(node)
    }

    /// Adds an arc between two live nodes. For an edge the `(u, v)` order
    /// is kept as the canonical stored order but carries no semantics.
    pub fn add_arc(
        &mut self,
        u: Node,
        v: Node,
        directedness: Directedness,
    ) -> Result<Arc, GraphError> {
        if !self.nodes.contains_key(&u) || !self.nodes.contains_key(&v) {
            return Err(Report::new(GraphError::NodeNotFound));
        }
        if self.arcs.len() >= u32::MAX as usize {
            return Err(Report::new(GraphError::CapacityExhausted));
        }
        let arcs = &self.arcs;
        let id = self.arc_ids.allocate(|id| arcs.contains_key(&Arc::new(id)))?;
        let arc = Arc::new(id);
        let is_edge = directedness.is_edge();

        self.arcs.insert(arc, ArcRecord { u, v, is_edge });
        if is_edge {
            self.edge_count += 1;
        }

        if u == v {
            self.nodes[&u].insert(arc, is_edge, true, true);
        } else {
            self.nodes[&u].insert(arc, is_edge, true, false);
            self.nodes[&v].insert(arc, is_edge, false, true);
        }
        Ok(arc)
    }

    /// Deletes an arc of this graph.
    pub fn delete_arc(&mut self, arc: Arc) -> Result<(), GraphError> {
        let record = self
            .arcs
            .swap_remove(&arc)
            .ok_or_else(|| Report::new(GraphError::ArcNotFound))?;
        if record.is_edge {
            self.edge_count -= 1;
        }
        self.nodes[&record.u].remove(arc);
        if record.v != record.u {
            self.nodes[&record.v].remove(arc);
        }
        self.arc_properties.remove_all(arc);
        Ok(())
    }

    /// Deletes a node along with every incident arc.
    pub fn delete_node(&mut self, node: Node) -> Result<(), GraphError> {
        if !self.nodes.contains_key(&node) {
            return Err(Report::new(GraphError::NodeNotFound));
        }
        let incident = self.nodes[&node].slice(ArcFilter::All).to_vec();
        for arc in incident {
            self.delete_arc(arc)?;
        }
        self.nodes.swap_remove(&node);
        self.node_properties.remove_all(node);
        Ok(())
    }

    /// Removes every node, arc and property.
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.arcs.clear();
        self.edge_count = 0;
        self.node_ids.reset();
        self.arc_ids.reset();
        self.node_properties.clear();
        self.arc_properties.clear();
    }

    pub fn set_node_property(
        &mut self,
        node: Node,
        name: impl Into<String>,
        value: PropertyValue,
    ) -> Result<(), GraphError> {
        if !self.nodes.contains_key(&node) {
            return Err(Report::new(GraphError::NodeNotFound));
        }
        self.node_properties.set(node, name.into(), value);
        Ok(())
    }

    pub fn set_arc_property(
        &mut self,
        arc: Arc,
        name: impl Into<String>,
        value: PropertyValue,
    ) -> Result<(), GraphError> {
        if !self.arcs.contains_key(&arc) {
            return Err(Report::new(GraphError::ArcNotFound));
        }
        self.arc_properties.set(arc, name.into(), value);
        Ok(())
    }
}

impl Graph for CustomGraph {
    fn u(&self, arc: Arc) -> Node {
        self.arcs.get(&arc).map_or(Node::INVALID, |record| record.u)
    }

    fn v(&self, arc: Arc) -> Node {
        self.arcs.get(&arc).map_or(Node::INVALID, |record| record.v)
    }

    fn is_edge(&self, arc: Arc) -> bool {
        self.arcs.get(&arc).is_some_and(|record| record.is_edge)
    }

    fn nodes(&self) -> NodeIter<'_> {
        Box::new(self.nodes.keys().copied())
    }

    fn arcs(&self, filter: ArcFilter) -> ArcIter<'_> {
        match filter {
            ArcFilter::Edge => Box::new(
                self.arcs
                    .iter()
                    .filter(|(_, record)| record.is_edge)
                    .map(|(&arc, _)| arc),
            ),
            _ => Box::new(self.arcs.keys().copied()),
        }
    }

    fn arcs_at(&self, node: Node, filter: ArcFilter) -> ArcIter<'_> {
        match self.nodes.get(&node) {
            Some(registers) => Box::new(registers.slice(filter).iter().copied()),
            None => Box::new(iter::empty()),
        }
    }

    fn node_count(&self) -> usize {
        self.nodes.len()
    }

    fn arc_count(&self, filter: ArcFilter) -> usize {
        match filter {
            ArcFilter::Edge => self.edge_count,
            _ => self.arcs.len(),
        }
    }

    fn arc_count_at(&self, node: Node, filter: ArcFilter) -> usize {
        self.nodes
            .get(&node)
            .map_or(0, |registers| registers.slice(filter).len())
    }

    fn has_node(&self, node: Node) -> bool {
        self.nodes.contains_key(&node)
    }

    fn has_arc(&self, arc: Arc) -> bool {
        self.arcs.contains_key(&arc)
    }
}

impl PropertyGraph for CustomGraph {
    fn node_property(&self, node: Node, name: &str) -> Option<&PropertyValue> {
        self.node_properties.get(node, name)
    }

    fn arc_property(&self, arc: Arc, name: &str) -> Option<&PropertyValue> {
        self.arc_properties.get(arc, name)
    }

    fn node_properties(&self) -> PropertyIter<'_, Node> {
        self.node_properties.iter()
    }

    fn arc_properties(&self) -> PropertyIter<'_, Arc> {
        self.arc_properties.iter()
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec::Vec;

    use super::CustomGraph;
    use crate::{Arc, ArcFilter, Directedness, Graph, GraphError, Node, PropertyValue};

    fn filters() -> [ArcFilter; 4] {
        [
            ArcFilter::All,
            ArcFilter::Edge,
            ArcFilter::Forward,
            ArcFilter::Backward,
        ]
    }

    #[test]
    fn build_and_enumerate() {
        let mut graph = CustomGraph::new();
        let a = graph.add_node().unwrap();
        let b = graph.add_node().unwrap();
        let c = graph.add_node().unwrap();
        let ab = graph.add_arc(a, b, Directedness::Directed).unwrap();
        let bc = graph.add_arc(b, c, Directedness::Edge).unwrap();

        assert_eq!(graph.node_count(), 3);
        assert_eq!(graph.arc_count(ArcFilter::All), 2);
        assert_eq!(graph.arc_count(ArcFilter::Edge), 1);
        assert_eq!(graph.nodes().collect::<Vec<_>>(), [a, b, c]);

        assert_eq!(graph.u(ab), a);
        assert_eq!(graph.v(ab), b);
        assert!(!graph.is_edge(ab));
        assert!(graph.is_edge(bc));
        assert_eq!(graph.other(ab, a), b);
        assert_eq!(graph.other(bc, c), b);

        // b sees: ab incoming, bc as an edge
        assert_eq!(graph.arcs_at(b, ArcFilter::All).collect::<Vec<_>>(), [
            ab, bc
        ]);
        assert_eq!(graph.arcs_at(b, ArcFilter::Forward).collect::<Vec<_>>(), [
            bc
        ]);
        assert_eq!(
            graph.arcs_at(b, ArcFilter::Backward).collect::<Vec<_>>(),
            [ab, bc]
        );
        assert_eq!(graph.arcs_at(b, ArcFilter::Edge).collect::<Vec<_>>(), [bc]);
    }

    #[test]
    fn counts_agree_with_enumeration() {
        let mut graph = CustomGraph::new();
        let nodes = (0..4)
            .map(|_| graph.add_node().unwrap())
            .collect::<Vec<_>>();
        graph
            .add_arc(nodes[0], nodes[1], Directedness::Directed)
            .unwrap();
        graph
            .add_arc(nodes[1], nodes[2], Directedness::Edge)
            .unwrap();
        graph
            .add_arc(nodes[2], nodes[2], Directedness::Directed)
            .unwrap();
        graph
            .add_arc(nodes[3], nodes[0], Directedness::Edge)
            .unwrap();

        for filter in filters() {
            assert_eq!(graph.arc_count(filter), graph.arcs(filter).count());
            for &node in &nodes {
                assert_eq!(
                    graph.arc_count_at(node, filter),
                    graph.arcs_at(node, filter).count()
                );
            }
        }
    }

    #[test]
    fn loops_are_reported_once() {
        let mut graph = CustomGraph::new();
        let n = graph.add_node().unwrap();
        let directed = graph.add_arc(n, n, Directedness::Directed).unwrap();

        assert_eq!(graph.arcs_at(n, ArcFilter::All).collect::<Vec<_>>(), [
            directed
        ]);
        assert_eq!(
            graph.arcs_at(n, ArcFilter::Forward).collect::<Vec<_>>(),
            [directed]
        );
        assert_eq!(
            graph.arcs_at(n, ArcFilter::Backward).collect::<Vec<_>>(),
            [directed]
        );
        assert_eq!(graph.arc_count_at(n, ArcFilter::Edge), 0);
        assert_eq!(
            graph.arcs_between(n, n, ArcFilter::All).collect::<Vec<_>>(),
            [directed]
        );
    }

    #[test]
    fn arcs_between_is_order_insensitive_for_edges() {
        let mut graph = CustomGraph::new();
        let a = graph.add_node().unwrap();
        let b = graph.add_node().unwrap();
        let edge = graph.add_arc(a, b, Directedness::Edge).unwrap();
        let directed = graph.add_arc(b, a, Directedness::Directed).unwrap();

        assert_eq!(
            graph.arcs_between(a, b, ArcFilter::All).collect::<Vec<_>>(),
            [edge, directed]
        );
        assert_eq!(
            graph.arcs_between(b, a, ArcFilter::All).collect::<Vec<_>>(),
            [edge, directed]
        );
        assert_eq!(
            graph
                .arcs_between(a, b, ArcFilter::Forward)
                .collect::<Vec<_>>(),
            [edge]
        );
        assert_eq!(
            graph
                .arcs_between(b, a, ArcFilter::Forward)
                .collect::<Vec<_>>(),
            [edge, directed]
        );
    }

    #[test]
    fn explicit_ids_and_duplicates() {
        let mut graph = CustomGraph::new();
        let n = graph.add_node_with_id(17).unwrap();
        assert_eq!(n, Node::new(17));
        assert_eq!(
            graph
                .add_node_with_id(17)
                .unwrap_err()
                .current_context(),
            &GraphError::DuplicateNode
        );
        assert_eq!(
            graph.add_node_with_id(0).unwrap_err().current_context(),
            &GraphError::InvalidId
        );
        // fresh ids skip the explicitly claimed one
        let other = graph.add_node().unwrap();
        assert_ne!(other, n);
    }

    #[test]
    fn foreign_endpoints_are_rejected() {
        let mut graph = CustomGraph::new();
        let a = graph.add_node().unwrap();
        let err = graph
            .add_arc(a, Node::new(99), Directedness::Directed)
            .unwrap_err();
        assert_eq!(err.current_context(), &GraphError::NodeNotFound);
        assert_eq!(graph.arc_count(ArcFilter::All), 0);
    }

    #[test]
    fn delete_node_removes_incident_arcs() {
        let mut graph = CustomGraph::new();
        let a = graph.add_node().unwrap();
        let b = graph.add_node().unwrap();
        let c = graph.add_node().unwrap();
        let ab = graph.add_arc(a, b, Directedness::Edge).unwrap();
        let bc = graph.add_arc(b, c, Directedness::Directed).unwrap();
        let ca = graph.add_arc(c, a, Directedness::Directed).unwrap();

        graph.delete_node(b).unwrap();

        assert!(!graph.has_node(b));
        assert!(!graph.has_arc(ab));
        assert!(!graph.has_arc(bc));
        assert!(graph.has_arc(ca));
        assert_eq!(graph.node_count(), 2);
        assert_eq!(graph.arc_count(ArcFilter::All), 1);
        assert_eq!(graph.arc_count(ArcFilter::Edge), 0);
        assert_eq!(graph.arc_count_at(a, ArcFilter::All), 1);
    }

    #[test]
    fn delete_arc_keeps_nodes() {
        let mut graph = CustomGraph::new();
        let a = graph.add_node().unwrap();
        let b = graph.add_node().unwrap();
        let ab = graph.add_arc(a, b, Directedness::Edge).unwrap();
        graph.delete_arc(ab).unwrap();

        assert!(graph.has_node(a) && graph.has_node(b));
        assert_eq!(graph.arc_count(ArcFilter::All), 0);
        assert_eq!(
            graph.delete_arc(Arc::new(123)).unwrap_err().current_context(),
            &GraphError::ArcNotFound
        );
    }

    #[test]
    fn properties_round_trip() {
        use crate::PropertyGraph;

        let mut graph = CustomGraph::new();
        let n = graph.add_node().unwrap();
        let m = graph.add_node().unwrap();
        let a = graph.add_arc(n, m, Directedness::Edge).unwrap();

        graph
            .set_node_property(n, "label", PropertyValue::Text("start".into()))
            .unwrap();
        graph
            .set_arc_property(a, "weight", PropertyValue::Float(2.5))
            .unwrap();

        assert_eq!(
            graph.node_property(n, "label"),
            Some(&PropertyValue::Text("start".into()))
        );
        assert_eq!(graph.node_property(m, "label"), None);
        assert_eq!(graph.node_properties().count(), 1);
        assert_eq!(graph.arc_properties().count(), 1);

        graph.delete_arc(a).unwrap();
        assert_eq!(graph.arc_property(a, "weight"), None);
    }
}
