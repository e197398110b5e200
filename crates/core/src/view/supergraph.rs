use alloc::boxed::Box;
use core::iter;

use error_stack::{Report, Result};
use fxhash::FxBuildHasher;
use hashbrown::HashMap;
use indexmap::{IndexMap, IndexSet};

use crate::{
    graph::{registers::Registers, ArcIter, NodeIter},
    properties::{PropertyGraph, PropertyIter, PropertyValue},
    Arc, ArcFilter, Directedness, Graph, GraphError, IdAllocator, Node,
};

#[derive(Debug, Clone, Copy)]
struct ArcRecord {
    u: Node,
    v: Node,
    is_edge: bool,
}

/// A view layering its own nodes and arcs atop an (optional) underlying
/// graph.
///
/// The supergraph allocates ids that avoid the underlying graph's live ids,
/// so handles from both layers mix freely. Owned arcs may attach to
/// underlying nodes. Deletion only reaches entities the supergraph itself
/// allocated; the underlying graph must not be mutated while the view is
/// live, or the results of every query become undefined.
#[derive(Debug, Clone)]
pub struct Supergraph<G> {
    graph: Option<G>,
    own_nodes: IndexSet<Node, FxBuildHasher>,
    own_arcs: IndexMap<Arc, ArcRecord, FxBuildHasher>,
    // Incidence registers for every endpoint of an owned arc, underlying
    // nodes included.
    adjacency: HashMap<Node, Registers, FxBuildHasher>,
    own_edge_count: usize,
    node_ids: IdAllocator,
    arc_ids: IdAllocator,
}

impl<G> Supergraph<G>
where
    G: Graph,
{
    /// Wraps `graph`, initially adding nothing.
    pub fn new(graph: G) -> Self {
        Self {
            graph: Some(graph),
            own_nodes: IndexSet::default(),
            own_arcs: IndexMap::default(),
            adjacency: HashMap::default(),
            own_edge_count: 0,
            node_ids: IdAllocator::new(),
            arc_ids: IdAllocator::new(),
        }
    }

    /// A supergraph over nothing: a buildable graph in its own right.
    #[must_use]
    pub fn detached() -> Self {
        Self {
            graph: None,
            own_nodes: IndexSet::default(),
            own_arcs: IndexMap::default(),
            adjacency: HashMap::default(),
            own_edge_count: 0,
            node_ids: IdAllocator::new(),
            arc_ids: IdAllocator::new(),
        }
    }

    pub fn inner(&self) -> Option<&G> {
        self.graph.as_ref()
    }

    /// Whether this view (rather than the underlying graph) owns `node`.
    #[must_use]
    pub fn owns_node(&self, node: Node) -> bool {
        self.own_nodes.contains(&node)
    }

    /// Whether this view owns `arc`.
    #[must_use]
    pub fn owns_arc(&self, arc: Arc) -> bool {
        self.own_arcs.contains_key(&arc)
    }

    /// Adds a node owned by this view, under an id unused in either layer.
    pub fn add_node(&mut self) -> Result<Node, GraphError> {
        if self.own_nodes.len() >= u32::MAX as usize {
            return Err(Report::new(GraphError::CapacityExhausted));
        }
        let graph = self.graph.as_ref();
        let own_nodes = &self.own_nodes;
        let id = self.node_ids.allocate(|id| {
            let node = Node::new(id);
            own_nodes.contains(&node) || graph.is_some_and(|g| g.has_node(node))
        })?;
        let node = Node::new(id);
        self.own_nodes.insert(node);
        Ok(node)
    }

    /// Adds an arc owned by this view; either endpoint may live in either
    /// layer.
    pub fn add_arc(
        &mut self,
        u: Node,
        v: Node,
        directedness: Directedness,
    ) -> Result<Arc, GraphError> {
        if !self.has_node(u) || !self.has_node(v) {
            return Err(Report::new(GraphError::NodeNotFound));
        }
        if self.own_arcs.len() >= u32::MAX as usize {
            return Err(Report::new(GraphError::CapacityExhausted));
        }
        let graph = self.graph.as_ref();
        let own_arcs = &self.own_arcs;
        let id = self.arc_ids.allocate(|id| {
            let arc = Arc::new(id);
            own_arcs.contains_key(&arc) || graph.is_some_and(|g| g.has_arc(arc))
        })?;
        let arc = Arc::new(id);
        let is_edge = directedness.is_edge();

        self.own_arcs.insert(arc, ArcRecord { u, v, is_edge });
        if is_edge {
            self.own_edge_count += 1;
        }
        if u == v {
            self.adjacency.entry(u).or_default().insert(arc, is_edge, true, true);
        } else {
            self.adjacency.entry(u).or_default().insert(arc, is_edge, true, false);
            self.adjacency.entry(v).or_default().insert(arc, is_edge, false, true);
        }
        Ok(arc)
    }

    /// Deletes an arc this view owns.
    pub fn delete_arc(&mut self, arc: Arc) -> Result<(), GraphError> {
        let Some(record) = self.own_arcs.swap_remove(&arc) else {
            return Err(Report::new(
                if self.graph.as_ref().is_some_and(|g| g.has_arc(arc)) {
                    GraphError::NotOwned
                } else {
                    GraphError::ArcNotFound
                },
            ));
        };
        if record.is_edge {
            self.own_edge_count -= 1;
        }
        for endpoint in [record.u, record.v] {
            if let Some(registers) = self.adjacency.get_mut(&endpoint) {
                registers.remove(arc);
                if registers.is_empty() {
                    self.adjacency.remove(&endpoint);
                }
            }
        }
        Ok(())
    }

    /// Deletes a node this view owns, along with its incident (necessarily
    /// owned) arcs.
    pub fn delete_node(&mut self, node: Node) -> Result<(), GraphError> {
        if !self.own_nodes.contains(&node) {
            return Err(Report::new(if self.has_node(node) {
                GraphError::NotOwned
            } else {
                GraphError::NodeNotFound
            }));
        }
        let incident = self
            .adjacency
            .get(&node)
            .map(|registers| registers.slice(ArcFilter::All).to_vec())
            .unwrap_or_default();
        for arc in incident {
            self.delete_arc(arc)?;
        }
        self.own_nodes.swap_remove(&node);
        Ok(())
    }

    /// Removes everything this view added.
    pub fn clear(&mut self) {
        self.own_nodes.clear();
        self.own_arcs.clear();
        self.adjacency.clear();
        self.own_edge_count = 0;
        self.node_ids.reset();
        self.arc_ids.reset();
    }
}

impl<G> Graph for Supergraph<G>
where
    G: Graph,
{
    fn u(&self, arc: Arc) -> Node {
        if let Some(record) = self.own_arcs.get(&arc) {
            record.u
        } else {
            self.graph.as_ref().map_or(Node::INVALID, |g| g.u(arc))
        }
    }

    fn v(&self, arc: Arc) -> Node {
        if let Some(record) = self.own_arcs.get(&arc) {
            record.v
        } else {
            self.graph.as_ref().map_or(Node::INVALID, |g| g.v(arc))
        }
    }

    fn is_edge(&self, arc: Arc) -> bool {
        if let Some(record) = self.own_arcs.get(&arc) {
            record.is_edge
        } else {
            self.graph.as_ref().is_some_and(|g| g.is_edge(arc))
        }
    }

    fn nodes(&self) -> NodeIter<'_> {
        let own = self.own_nodes.iter().copied();
        match &self.graph {
            Some(graph) => Box::new(graph.nodes().chain(own)),
            None => Box::new(own),
        }
    }

    fn arcs(&self, filter: ArcFilter) -> ArcIter<'_> {
        let own = self
            .own_arcs
            .iter()
            .filter(move |(_, record)| filter != ArcFilter::Edge || record.is_edge)
            .map(|(&arc, _)| arc);
        match &self.graph {
            Some(graph) => Box::new(graph.arcs(filter).chain(own)),
            None => Box::new(own),
        }
    }

    fn arcs_at(&self, node: Node, filter: ArcFilter) -> ArcIter<'_> {
        let own = match self.adjacency.get(&node) {
            Some(registers) => registers.slice(filter).iter().copied(),
            None => [].iter().copied(),
        };
        match &self.graph {
            Some(graph) if graph.has_node(node) => Box::new(graph.arcs_at(node, filter).chain(own)),
            _ => Box::new(own),
        }
    }

    fn node_count(&self) -> usize {
        self.graph.as_ref().map_or(0, Graph::node_count) + self.own_nodes.len()
    }

    fn arc_count(&self, filter: ArcFilter) -> usize {
        let own = match filter {
            ArcFilter::Edge => self.own_edge_count,
            _ => self.own_arcs.len(),
        };
        self.graph.as_ref().map_or(0, |g| g.arc_count(filter)) + own
    }

    fn arc_count_at(&self, node: Node, filter: ArcFilter) -> usize {
        let own = self
            .adjacency
            .get(&node)
            .map_or(0, |registers| registers.slice(filter).len());
        self.graph
            .as_ref()
            .map_or(0, |g| g.arc_count_at(node, filter))
            + own
    }

    fn has_node(&self, node: Node) -> bool {
        self.own_nodes.contains(&node) || self.graph.as_ref().is_some_and(|g| g.has_node(node))
    }

    fn has_arc(&self, arc: Arc) -> bool {
        self.own_arcs.contains_key(&arc) || self.graph.as_ref().is_some_and(|g| g.has_arc(arc))
    }
}

impl<G> PropertyGraph for Supergraph<G>
where
    G: PropertyGraph,
{
    fn node_property(&self, node: Node, name: &str) -> Option<&PropertyValue> {
        self.graph.as_ref()?.node_property(node, name)
    }

    fn arc_property(&self, arc: Arc, name: &str) -> Option<&PropertyValue> {
        self.graph.as_ref()?.arc_property(arc, name)
    }

    fn node_properties(&self) -> PropertyIter<'_, Node> {
        match &self.graph {
            Some(graph) => graph.node_properties(),
            None => Box::new(iter::empty()),
        }
    }

    fn arc_properties(&self) -> PropertyIter<'_, Arc> {
        match &self.graph {
            Some(graph) => graph.arc_properties(),
            None => Box::new(iter::empty()),
        }
    }
}
