use alloc::vec::Vec;

use arcgraph_core::{Arc, ArcFilter, Graph, Node};
use fxhash::FxBuildHasher;
use hashbrown::{HashMap, HashSet};

use crate::traversal::{Dfs, DfsVisitor};

/// A topological order of a directed acyclic graph.
#[derive(Debug, Clone, Default)]
pub struct TopologicalOrder {
    order: Vec<Node>,
    index: HashMap<Node, usize, FxBuildHasher>,
}

impl TopologicalOrder {
    /// The nodes, every arc pointing from an earlier to a later one.
    #[must_use]
    pub fn order(&self) -> &[Node] {
        &self.order
    }

    /// The position of `node` in the order.
    #[must_use]
    pub fn index_of(&self, node: Node) -> Option<usize> {
        self.index.get(&node).copied()
    }
}

struct TopoVisitor<'graph, G: ?Sized> {
    graph: &'graph G,
    open: HashSet<Node, FxBuildHasher>,
    postorder: Vec<Node>,
    cyclic: bool,
}

impl<G> DfsVisitor for TopoVisitor<'_, G>
where
    G: Graph + ?Sized,
{
    fn node_enter(&mut self, node: Node, parent_arc: Arc) -> bool {
        // walking an edge downward already closes a two-cycle
        if parent_arc.is_valid() && self.graph.is_edge(parent_arc) {
            self.cyclic = true;
            return false;
        }
        self.open.insert(node);
        true
    }

    fn node_exit(&mut self, node: Node, _parent_arc: Arc) -> bool {
        self.open.remove(&node);
        self.postorder.push(node);
        true
    }

    fn back_arc(&mut self, node: Node, arc: Arc) -> bool {
        // an arc into a node still on the stack closes a cycle; arcs into
        // finished nodes are harmless cross arcs
        let target = self.graph.other(arc, node);
        if self.open.contains(&target) || self.graph.is_edge(arc) {
            self.cyclic = true;
            return false;
        }
        true
    }
}

/// Computes a topological order of `graph`, or `None` if it contains a
/// directed cycle (an edge counts as a two-cycle).
pub fn topological_order<G>(graph: &G) -> Option<TopologicalOrder>
where
    G: Graph + ?Sized,
{
    let mut visitor = TopoVisitor {
        graph,
        open: HashSet::default(),
        postorder: Vec::new(),
        cyclic: false,
    };
    Dfs::new(graph, ArcFilter::Forward).run(&mut visitor);
    if visitor.cyclic {
        return None;
    }

    let order: Vec<Node> = visitor.postorder.into_iter().rev().collect();
    let index = order
        .iter()
        .enumerate()
        .map(|(index, &node)| (node, index))
        .collect();
    Some(TopologicalOrder { order, index })
}
