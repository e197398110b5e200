use alloc::boxed::Box;
use core::iter;

use crate::{
    graph::{ArcIter, Graph, NodeIter},
    Arc, ArcFilter, Directedness, Node,
};

/// The complete bipartite graph on `m` red and `n` blue nodes, stored
/// implicitly.
///
/// Red nodes carry ids `1..=m`, blue nodes `m+1..=m+n`; there is exactly
/// one arc per red-blue pair, computed arithmetically. The directed
/// variant orients every arc red to blue. Effectively immutable after
/// construction.
#[derive(Debug, Clone, Copy)]
pub struct CompleteBipartiteGraph {
    reds: u32,
    blues: u32,
    directed: bool,
}

impl CompleteBipartiteGraph {
    #[must_use]
    pub fn new(red_count: u32, blue_count: u32, directedness: Directedness) -> Self {
        Self {
            reds: red_count,
            blues: blue_count,
            directed: !directedness.is_edge(),
        }
    }

    /// The red node with 0-based index `index`.
    #[must_use]
    pub fn red_node(&self, index: u32) -> Node {
        debug_assert!(index < self.reds);
        Node::new(i64::from(index) + 1)
    }

    /// The blue node with 0-based index `index`.
    #[must_use]
    pub fn blue_node(&self, index: u32) -> Node {
        debug_assert!(index < self.blues);
        Node::new(i64::from(self.reds) + i64::from(index) + 1)
    }

    #[must_use]
    pub fn is_red(&self, node: Node) -> bool {
        node.id() >= 1 && node.id() <= self.m()
    }

    #[must_use]
    pub fn is_blue(&self, node: Node) -> bool {
        node.id() > self.m() && node.id() <= self.m() + self.n()
    }

    /// The arc joining a red and a blue node (in either argument order),
    /// or `Arc::INVALID` when the pair is not bichromatic.
    #[must_use]
    pub fn arc_between(&self, first: Node, second: Node) -> Arc {
        let (red, blue) = if self.is_red(first) && self.is_blue(second) {
            (first, second)
        } else if self.is_red(second) && self.is_blue(first) {
            (second, first)
        } else {
            return Arc::INVALID;
        };
        self.encode(red.id(), blue.id())
    }

    fn m(&self) -> i64 {
        i64::from(self.reds)
    }

    fn n(&self) -> i64 {
        i64::from(self.blues)
    }

    fn total_arcs(&self) -> i64 {
        self.m() * self.n()
    }

    // Arcs are numbered row by row: red `i` owns the id block
    // (i - 1) * n + 1 ..= i * n.
    fn encode(&self, red: i64, blue: i64) -> Arc {
        Arc::new((red - 1) * self.n() + (blue - self.m()))
    }

    fn decode(&self, arc: Arc) -> Option<(i64, i64)> {
        if !self.has_arc(arc) {
            return None;
        }
        let red = (arc.id() - 1) / self.n() + 1;
        let blue = self.m() + (arc.id() - 1) % self.n() + 1;
        Some((red, blue))
    }
}

impl Graph for CompleteBipartiteGraph {
    fn u(&self, arc: Arc) -> Node {
        self.decode(arc).map_or(Node::INVALID, |(red, _)| Node::new(red))
    }

    fn v(&self, arc: Arc) -> Node {
        self.decode(arc)
            .map_or(Node::INVALID, |(_, blue)| Node::new(blue))
    }

    fn is_edge(&self, arc: Arc) -> bool {
        !self.directed && self.has_arc(arc)
    }

    fn nodes(&self) -> NodeIter<'_> {
        Box::new((1..=self.m() + self.n()).map(Node::new))
    }

    fn arcs(&self, filter: ArcFilter) -> ArcIter<'_> {
        if filter == ArcFilter::Edge && self.directed {
            return Box::new(iter::empty());
        }
        Box::new((1..=self.total_arcs()).map(Arc::new))
    }

    fn arcs_at(&self, node: Node, filter: ArcFilter) -> ArcIter<'_> {
        let this = *self;
        if self.is_red(node) {
            if !filter.admits(!self.directed, true) {
                return Box::new(iter::empty());
            }
            Box::new(
                (1..=self.n()).map(move |offset| this.encode(node.id(), this.m() + offset)),
            )
        } else if self.is_blue(node) {
            if !filter.admits(!self.directed, false) {
                return Box::new(iter::empty());
            }
            Box::new((1..=self.m()).map(move |red| this.encode(red, node.id())))
        } else {
            Box::new(iter::empty())
        }
    }

    fn node_count(&self) -> usize {
        (self.m() + self.n()) as usize
    }

    fn arc_count(&self, filter: ArcFilter) -> usize {
        if filter == ArcFilter::Edge && self.directed {
            return 0;
        }
        self.total_arcs() as usize
    }

    fn arc_count_at(&self, node: Node, filter: ArcFilter) -> usize {
        if self.is_red(node) {
            if filter.admits(!self.directed, true) {
                self.n() as usize
            } else {
                0
            }
        } else if self.is_blue(node) {
            if filter.admits(!self.directed, false) {
                self.m() as usize
            } else {
                0
            }
        } else {
            0
        }
    }

    fn has_node(&self, node: Node) -> bool {
        node.id() >= 1 && node.id() <= self.m() + self.n()
    }

    fn has_arc(&self, arc: Arc) -> bool {
        arc.id() >= 1 && arc.id() <= self.total_arcs()
    }
}
