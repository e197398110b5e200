use alloc::boxed::Box;
use core::{
    fmt::{self, Display, Formatter},
    iter, mem,
};

use error_stack::{Context, Report, Result};
use fxhash::FxBuildHasher;
use hashbrown::{HashMap, HashSet};

use crate::{
    graph::{ArcIter, NodeIter},
    properties::{PropertyGraph, PropertyIter, PropertyValue},
    Arc, ArcFilter, Graph, Node,
};

/// Contract violations of [`Path`] construction. The path is left unchanged
/// when one is reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathError {
    /// The path has no first node yet; call [`Path::begin`] first.
    NotStarted,
    /// The path closed into a cycle and cannot be extended.
    CycleClosed,
    /// The arc does not exist or does not touch the endpoint being
    /// extended.
    NotConnecting,
    /// The arc leads to a node already on the path (other than the opposite
    /// endpoint), or is itself already part of the path.
    AlreadyOnPath,
}

impl Display for PathError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotStarted => f.write_str("path has not been started"),
            Self::CycleClosed => f.write_str("path is a closed cycle"),
            Self::NotConnecting => f.write_str("arc does not connect to the path endpoint"),
            Self::AlreadyOnPath => f.write_str("arc would revisit the path"),
        }
    }
}

impl Context for PathError {}

/// A simple walk through an underlying graph, itself a graph.
///
/// The path stores its arcs by reference to the underlying graph's
/// identifiers, keyed by successor and predecessor maps per node. Each
/// interior node has exactly one predecessor arc and one successor arc;
/// extending with an arc that would revisit a node fails. The one
/// exception: the walk may close into a cycle by reaching its opposite
/// endpoint, after which `first_node == last_node`.
#[derive(Debug, Clone)]
pub struct Path<G> {
    graph: G,
    first: Node,
    last: Node,
    next: HashMap<Node, Arc, FxBuildHasher>,
    prev: HashMap<Node, Arc, FxBuildHasher>,
    arc_set: HashSet<Arc, FxBuildHasher>,
}

impl<G> Path<G>
where
    G: Graph,
{
    /// An empty path over `graph`.
    pub fn new(graph: G) -> Self {
        Self {
            graph,
            first: Node::INVALID,
            last: Node::INVALID,
            next: HashMap::default(),
            prev: HashMap::default(),
            arc_set: HashSet::default(),
        }
    }

    pub fn inner(&self) -> &G {
        &self.graph
    }

    /// Resets the path to the single node `node`.
    pub fn begin(&mut self, node: Node) {
        self.clear();
        self.first = node;
        self.last = node;
    }

    pub fn clear(&mut self) {
        self.first = Node::INVALID;
        self.last = Node::INVALID;
        self.next.clear();
        self.prev.clear();
        self.arc_set.clear();
    }

    #[must_use]
    pub fn first_node(&self) -> Node {
        self.first
    }

    #[must_use]
    pub fn last_node(&self) -> Node {
        self.last
    }

    /// Whether the walk has closed back on itself.
    #[must_use]
    pub fn is_cycle(&self) -> bool {
        self.first.is_valid() && self.first == self.last && !self.arc_set.is_empty()
    }

    /// The arc leaving `node` along the walk, or `Arc::INVALID` at the last
    /// node of a non-cyclic path.
    #[must_use]
    pub fn next_arc(&self, node: Node) -> Arc {
        self.next.get(&node).copied().unwrap_or(Arc::INVALID)
    }

    /// The arc entering `node` along the walk, or `Arc::INVALID` at the
    /// first node of a non-cyclic path.
    #[must_use]
    pub fn prev_arc(&self, node: Node) -> Arc {
        self.prev.get(&node).copied().unwrap_or(Arc::INVALID)
    }

    /// Appends `arc` after the last node.
    pub fn add_last(&mut self, arc: Arc) -> Result<(), PathError> {
        let target = self.extension_target(arc, self.last)?;
        self.next.insert(self.last, arc);
        self.prev.insert(target, arc);
        self.arc_set.insert(arc);
        self.last = target;
        Ok(())
    }

    /// Prepends `arc` before the first node.
    pub fn add_first(&mut self, arc: Arc) -> Result<(), PathError> {
        let target = self.extension_target(arc, self.first)?;
        self.prev.insert(self.first, arc);
        self.next.insert(target, arc);
        self.arc_set.insert(arc);
        self.first = target;
        Ok(())
    }

    /// Reverses the direction of the walk in O(1).
    pub fn reverse(&mut self) {
        mem::swap(&mut self.next, &mut self.prev);
        mem::swap(&mut self.first, &mut self.last);
    }

    // Validates extending at `endpoint` with `arc` and returns the node the
    // path grows to. All preconditions run before any mutation.
    fn extension_target(&self, arc: Arc, endpoint: Node) -> Result<Node, PathError> {
        if endpoint.is_invalid() {
            return Err(Report::new(PathError::NotStarted));
        }
        if self.is_cycle() {
            return Err(Report::new(PathError::CycleClosed));
        }
        if !self.graph.has_arc(arc) {
            return Err(Report::new(PathError::NotConnecting));
        }
        let (u, v) = self.graph.endpoints(arc);
        if u != endpoint && v != endpoint {
            return Err(Report::new(PathError::NotConnecting));
        }
        if self.arc_set.contains(&arc) {
            return Err(Report::new(PathError::AlreadyOnPath));
        }
        let target = self.graph.other(arc, endpoint);
        let opposite = if endpoint == self.last {
            self.first
        } else {
            self.last
        };
        let visited = target == self.first
            || target == self.last
            || self.next.contains_key(&target)
            || self.prev.contains_key(&target);
        if visited && target != opposite {
            return Err(Report::new(PathError::AlreadyOnPath));
        }
        Ok(target)
    }

    fn walk(&self) -> impl Iterator<Item = Node> + '_ {
        let first = self.first;
        iter::successors(first.is_valid().then_some(first), move |&node| {
            let arc = self.next.get(&node)?;
            let successor = self.graph.other(*arc, node);
            (successor != first).then_some(successor)
        })
    }
}

impl<G> Graph for Path<G>
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
        Box::new(self.walk())
    }

    fn arcs(&self, filter: ArcFilter) -> ArcIter<'_> {
        Box::new(
            self.walk()
                .filter_map(move |node| self.next.get(&node).copied())
                .filter(move |&arc| filter != ArcFilter::Edge || self.graph.is_edge(arc)),
        )
    }

    fn arcs_at(&self, node: Node, filter: ArcFilter) -> ArcIter<'_> {
        let next = self.next.get(&node).copied();
        let prev = self.prev.get(&node).copied();
        // a one-arc cycle stores the same loop arc on both sides
        let prev = if prev == next { None } else { prev };
        Box::new(next.into_iter().chain(prev).filter(move |&arc| {
            let is_edge = self.graph.is_edge(arc);
            let outgoing = self.graph.u(arc) == node;
            let looping = self.graph.v(arc) == self.graph.u(arc);
            filter.admits(is_edge, outgoing) || (looping && filter.admits(is_edge, !outgoing))
        }))
    }

    fn node_count(&self) -> usize {
        if self.first.is_invalid() {
            0
        } else if self.is_cycle() {
            self.arc_set.len()
        } else {
            self.arc_set.len() + 1
        }
    }

    fn arc_count(&self, filter: ArcFilter) -> usize {
        match filter {
            ArcFilter::Edge => self.arcs(filter).count(),
            _ => self.arc_set.len(),
        }
    }

    fn has_node(&self, node: Node) -> bool {
        node.is_valid()
            && (node == self.first
                || node == self.last
                || self.next.contains_key(&node)
                || self.prev.contains_key(&node))
    }

    fn has_arc(&self, arc: Arc) -> bool {
        self.arc_set.contains(&arc)
    }
}

impl<G> PropertyGraph for Path<G>
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
