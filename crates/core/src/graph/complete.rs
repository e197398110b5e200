use alloc::boxed::Box;
use core::iter;

use either::Either;

use crate::{
    graph::{ArcIter, Graph, NodeIter},
    Arc, ArcFilter, Directedness, Node,
};

/// The complete graph on `n` nodes, stored implicitly.
///
/// Nodes carry ids `1..=n`; arcs are computed arithmetically from index
/// pairs, so the graph costs O(1) memory regardless of size. The undirected
/// variant has one edge per unordered pair, the directed variant one arc per
/// ordered pair. Effectively immutable after construction.
#[derive(Debug, Clone, Copy)]
pub struct CompleteGraph {
    nodes: u32,
    directed: bool,
}

impl CompleteGraph {
    #[must_use]
    pub fn new(node_count: u32, directedness: Directedness) -> Self {
        Self {
            nodes: node_count,
            directed: !directedness.is_edge(),
        }
    }

    /// The node with 0-based index `index`.
    #[must_use]
    pub fn node(&self, index: u32) -> Node {
        debug_assert!(index < self.nodes);
        Node::new(i64::from(index) + 1)
    }

    /// The arc from `u` to `v` (any orientation for the undirected
    /// variant), or `Arc::INVALID` if `u == v` or either node is foreign.
    #[must_use]
    pub fn arc_between(&self, u: Node, v: Node) -> Arc {
        if !self.has_node(u) || !self.has_node(v) || u == v {
            return Arc::INVALID;
        }
        if self.directed {
            self.encode_directed(u.id(), v.id())
        } else {
            self.encode_edge(u.id(), v.id())
        }
    }

    fn n(&self) -> i64 {
        i64::from(self.nodes)
    }

    fn total_arcs(&self) -> i64 {
        let n = self.n();
        if self.directed {
            n * (n - 1)
        } else {
            n * (n - 1) / 2
        }
    }

    // Directed arcs enumerate ordered pairs: arcs out of `i` occupy the
    // contiguous id block (i - 1) * (n - 1) + 1 ..= i * (n - 1).
    fn encode_directed(&self, i: i64, j: i64) -> Arc {
        let n = self.n();
        let column = if j < i { j } else { j - 1 };
        Arc::new((i - 1) * (n - 1) + column)
    }

    fn decode_directed(&self, id: i64) -> (i64, i64) {
        let n = self.n();
        let i = (id - 1) / (n - 1) + 1;
        let column = (id - 1) % (n - 1) + 1;
        let j = if column < i { column } else { column + 1 };
        (i, j)
    }

    // Edges enumerate unordered pairs i < j in triangular order: the pairs
    // ending at `j` occupy (j - 1)(j - 2) / 2 + 1 ..= (j - 1) j / 2.
    fn encode_edge(&self, u: i64, v: i64) -> Arc {
        let (i, j) = if u < v { (u, v) } else { (v, u) };
        Arc::new((j - 1) * (j - 2) / 2 + i)
    }

    fn decode_edge(&self, id: i64) -> (i64, i64) {
        // Triangular root estimate, corrected for float rounding by the
        // two guard loops.
        let mut j = ((1.0 + (8.0 * id as f64).sqrt()) / 2.0) as i64 + 1;
        while j > 2 && (j - 1) * (j - 2) / 2 >= id {
            j -= 1;
        }
        while j * (j - 1) / 2 < id {
            j += 1;
        }
        let i = id - (j - 1) * (j - 2) / 2;
        (i, j)
    }

    fn decode(&self, arc: Arc) -> Option<(i64, i64)> {
        if !self.has_arc(arc) {
            return None;
        }
        Some(if self.directed {
            self.decode_directed(arc.id())
        } else {
            self.decode_edge(arc.id())
        })
    }
}

impl Graph for CompleteGraph {
    fn u(&self, arc: Arc) -> Node {
        self.decode(arc).map_or(Node::INVALID, |(i, _)| Node::new(i))
    }

    fn v(&self, arc: Arc) -> Node {
        self.decode(arc).map_or(Node::INVALID, |(_, j)| Node::new(j))
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
        let others = (1..=self.n()).map(Node::new).filter(move |&v| v != node);
        if self.directed {
            let this = *self;
            match filter {
                ArcFilter::Edge => Box::new(iter::empty()),
                ArcFilter::Forward => {
                    Box::new(others.map(move |v| this.encode_directed(node.id(), v.id())))
                }
                ArcFilter::Backward => {
                    Box::new(others.map(move |v| this.encode_directed(v.id(), node.id())))
                }
                ArcFilter::All => Box::new(others.flat_map(move |v| {
                    [
                        this.encode_directed(node.id(), v.id()),
                        this.encode_directed(v.id(), node.id()),
                    ]
                })),
            }
        } else {
            let this = *self;
            Box::new(others.map(move |v| this.encode_edge(node.id(), v.id())))
        }
    }

    fn arcs_between(&self, u: Node, v: Node, filter: ArcFilter) -> ArcIter<'_> {
        if !self.has_node(u) || !self.has_node(v) || u == v {
            return Box::new(iter::empty());
        }
        let arcs = if self.directed {
            match filter {
                ArcFilter::Edge => Either::Left(iter::empty()),
                ArcFilter::Forward => {
                    Either::Right(Either::Left(iter::once(self.encode_directed(
                        u.id(),
                        v.id(),
                    ))))
                }
                ArcFilter::Backward => {
                    Either::Right(Either::Left(iter::once(self.encode_directed(
                        v.id(),
                        u.id(),
                    ))))
                }
                ArcFilter::All => Either::Right(Either::Right(
                    [
                        self.encode_directed(u.id(), v.id()),
                        self.encode_directed(v.id(), u.id()),
                    ]
                    .into_iter(),
                )),
            }
        } else {
            Either::Right(Either::Left(iter::once(self.encode_edge(u.id(), v.id()))))
        };
        Box::new(arcs)
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

    fn arc_count_at(&self, node: Node, filter: ArcFilter) -> usize {
        if !self.has_node(node) {
            return 0;
        }
        let degree = self.node_count() - 1;
        if self.directed {
            match filter {
                ArcFilter::Edge => 0,
                ArcFilter::Forward | ArcFilter::Backward => degree,
                ArcFilter::All => 2 * degree,
            }
        } else {
            degree
        }
    }

    fn has_node(&self, node: Node) -> bool {
        node.id() >= 1 && node.id() <= self.n()
    }

    fn has_arc(&self, arc: Arc) -> bool {
        arc.id() >= 1 && arc.id() <= self.total_arcs()
    }
}
