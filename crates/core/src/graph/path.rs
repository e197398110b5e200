use alloc::boxed::Box;
use core::iter;

use crate::{
    graph::{ArcIter, Graph, NodeIter},
    Arc, ArcFilter, Directedness, Node,
};

/// Whether a [`PathGraph`] runs open-ended or closes back on itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Topology {
    Path,
    Cycle,
}

/// A path or cycle on `n` nodes, stored implicitly.
///
/// Nodes carry ids `1..=n`; arc `k` joins node `k` to node `k + 1` (and, in
/// a cycle, arc `n` joins node `n` back to node `1`). In the directed
/// variant every arc points from the lower to the higher position.
/// Effectively immutable after construction.
#[derive(Debug, Clone, Copy)]
pub struct PathGraph {
    nodes: u32,
    topology: Topology,
    directed: bool,
}

impl PathGraph {
    #[must_use]
    pub fn new(node_count: u32, topology: Topology, directedness: Directedness) -> Self {
        Self {
            nodes: node_count,
            topology,
            directed: !directedness.is_edge(),
        }
    }

    /// The node with 0-based index `index`.
    #[must_use]
    pub fn node(&self, index: u32) -> Node {
        debug_assert!(index < self.nodes);
        Node::new(i64::from(index) + 1)
    }

    fn n(&self) -> i64 {
        i64::from(self.nodes)
    }

    fn total_arcs(&self) -> i64 {
        match self.topology {
            Topology::Path => (self.n() - 1).max(0),
            Topology::Cycle => self.n(),
        }
    }

    // The arc leaving node `i` toward the next position, if any.
    fn next_arc(&self, i: i64) -> Option<Arc> {
        if i < self.n() || (self.topology == Topology::Cycle && i == self.n()) {
            Some(Arc::new(i))
        } else {
            None
        }
    }

    // The arc arriving at node `i` from the previous position, if any.
    fn prev_arc(&self, i: i64) -> Option<Arc> {
        if i > 1 {
            Some(Arc::new(i - 1))
        } else if self.topology == Topology::Cycle && self.nodes > 0 {
            Some(Arc::new(self.n()))
        } else {
            None
        }
    }
}

impl Graph for PathGraph {
    fn u(&self, arc: Arc) -> Node {
        if self.has_arc(arc) {
            Node::new(arc.id())
        } else {
            Node::INVALID
        }
    }

    fn v(&self, arc: Arc) -> Node {
        if self.has_arc(arc) {
            let head = if arc.id() == self.n() { 1 } else { arc.id() + 1 };
            Node::new(head)
        } else {
            Node::INVALID
        }
    }

    fn is_edge(&self, arc: Arc) -> bool {
        !self.directed && self.has_arc(arc)
    }

    fn nodes(&self) -> NodeIter<'_> {
        Box::new((1..=self.n()).map(Node::new))
    }

    fn arcs(&self, filter: ArcFilter) -> ArcIter<'_> {
        if filter == ArcFilter::Edge && self.directed {
            return Box::new(iter::empty());
        }
        Box::new((1..=self.total_arcs()).map(Arc::new))
    }

    fn arcs_at(&self, node: Node, filter: ArcFilter) -> ArcIter<'_> {
        if !self.has_node(node) {
            return Box::new(iter::empty());
        }
        let next = self.next_arc(node.id());
        let prev = self.prev_arc(node.id());
        // A one-node cycle has a single loop arc appearing as both; it is
        // emitted once, outgoing and incoming at the same time.
        let is_loop = prev.is_some() && prev == next;
        let prev = if is_loop { None } else { prev };
        let directed = self.directed;
        Box::new(
            next.into_iter()
                .map(move |arc| (arc, true, is_loop))
                .chain(prev.into_iter().map(|arc| (arc, false, false)))
                .filter(move |&(_, outgoing, looping)| {
                    filter.admits(!directed, outgoing)
                        || (looping && filter.admits(!directed, !outgoing))
                })
                .map(|(arc, ..)| arc),
        )
    }

    fn node_count(&self) -> usize {
        self.nodes as usize
    }

    fn arc_count(&self, filter: ArcFilter) -> usize {
        if filter == ArcFilter::Edge && self.directed {
            return 0;
        }
        self.total_arcs() as usize
    }

    fn has_node(&self, node: Node) -> bool {
        node.id() >= 1 && node.id() <= self.n()
    }

    fn has_arc(&self, arc: Arc) -> bool {
        arc.id() >= 1 && arc.id() <= self.total_arcs()
    }
}
