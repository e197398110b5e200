//! The abstract graph contract and the concrete graph types.
mod complete;
mod complete_bipartite;
mod custom;
mod path;
pub(crate) mod registers;

use alloc::boxed::Box;

pub use self::{
    complete::CompleteGraph,
    complete_bipartite::CompleteBipartiteGraph,
    custom::CustomGraph,
    path::{PathGraph, Topology},
};
use crate::{Arc, ArcFilter, Node};

/// A boxed, restartable enumeration of nodes. Finite; order unspecified but
/// stable while the graph is unchanged.
pub type NodeIter<'a> = Box<dyn Iterator<Item = Node> + 'a>;

/// A boxed, restartable enumeration of arcs.
pub type ArcIter<'a> = Box<dyn Iterator<Item = Arc> + 'a>;

/// The contract every graph and every view satisfies.
///
/// The trait is deliberately narrow and object-safe: the handful of hot
/// accessors (`u`, `v`, `is_edge`, `has_node`, `has_arc`) plus lazy
/// enumerations. Counts must agree with the corresponding enumerations at
/// all times; the provided count methods guarantee that by definition, and
/// implementations only override them where a cheaper equivalent exists.
///
/// Algorithms take `&G where G: Graph + ?Sized` and never mutate the graphs
/// they read. Mutation lives on the concrete types and on the mutable views.
pub trait Graph {
    /// The first endpoint of `arc`, in stored (canonical) order.
    fn u(&self, arc: Arc) -> Node;

    /// The second endpoint of `arc`, in stored (canonical) order.
    fn v(&self, arc: Arc) -> Node;

    /// Whether `arc` is an undirected edge.
    fn is_edge(&self, arc: Arc) -> bool;

    fn nodes(&self) -> NodeIter<'_>;

    /// All arcs of the graph. Only `ArcFilter::Edge` discriminates here;
    /// see [`ArcFilter`].
    fn arcs(&self, filter: ArcFilter) -> ArcIter<'_>;

    /// The arcs incident to `node`, as seen from `node` under `filter`.
    /// A loop arc is reported exactly once.
    fn arcs_at(&self, node: Node, filter: ArcFilter) -> ArcIter<'_>;

    /// The arcs with endpoints `{u, v}` admitted by `filter` as seen from
    /// `u`. Order-insensitive for edges.
    fn arcs_between(&self, u: Node, v: Node, filter: ArcFilter) -> ArcIter<'_> {
        Box::new(
            self.arcs_at(u, filter)
                .filter(move |&arc| self.other(arc, u) == v),
        )
    }

    fn node_count(&self) -> usize;

    fn arc_count(&self, filter: ArcFilter) -> usize {
        self.arcs(filter).count()
    }

    fn arc_count_at(&self, node: Node, filter: ArcFilter) -> usize {
        self.arcs_at(node, filter).count()
    }

    fn arc_count_between(&self, u: Node, v: Node, filter: ArcFilter) -> usize {
        self.arcs_between(u, v, filter).count()
    }

    /// The defining membership test for nodes.
    fn has_node(&self, node: Node) -> bool;

    fn has_arc(&self, arc: Arc) -> bool;

    /// The endpoint of `arc` opposite to `node`: `v(arc)` if `node` is
    /// `u(arc)`, else `u(arc)`. Never invalid when `node` lies on the arc.
    fn other(&self, arc: Arc, node: Node) -> Node {
        let u = self.u(arc);
        if u == node { self.v(arc) } else { u }
    }

    /// Both endpoints in stored order.
    fn endpoints(&self, arc: Arc) -> (Node, Node) {
        (self.u(arc), self.v(arc))
    }
}

impl<G> Graph for &G
where
    G: Graph + ?Sized,
{
    fn u(&self, arc: Arc) -> Node {
        (**self).u(arc)
    }

    fn v(&self, arc: Arc) -> Node {
        (**self).v(arc)
    }

    fn is_edge(&self, arc: Arc) -> bool {
        (**self).is_edge(arc)
    }

    fn nodes(&self) -> NodeIter<'_> {
        (**self).nodes()
    }

    fn arcs(&self, filter: ArcFilter) -> ArcIter<'_> {
        (**self).arcs(filter)
    }

    fn arcs_at(&self, node: Node, filter: ArcFilter) -> ArcIter<'_> {
        (**self).arcs_at(node, filter)
    }

    fn arcs_between(&self, u: Node, v: Node, filter: ArcFilter) -> ArcIter<'_> {
        (**self).arcs_between(u, v, filter)
    }

    fn node_count(&self) -> usize {
        (**self).node_count()
    }

    fn arc_count(&self, filter: ArcFilter) -> usize {
        (**self).arc_count(filter)
    }

    fn arc_count_at(&self, node: Node, filter: ArcFilter) -> usize {
        (**self).arc_count_at(node, filter)
    }

    fn arc_count_between(&self, u: Node, v: Node, filter: ArcFilter) -> usize {
        (**self).arc_count_between(u, v, filter)
    }

    fn has_node(&self, node: Node) -> bool {
        (**self).has_node(node)
    }

    fn has_arc(&self, arc: Arc) -> bool {
        (**self).has_arc(arc)
    }

    fn other(&self, arc: Arc, node: Node) -> Node {
        (**self).other(arc, node)
    }

    fn endpoints(&self, arc: Arc) -> (Node, Node) {
        (**self).endpoints(arc)
    }
}
