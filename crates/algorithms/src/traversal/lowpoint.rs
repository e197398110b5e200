use alloc::vec::Vec;

use arcgraph_core::{Arc, ArcFilter, Graph, Node};
use fxhash::FxBuildHasher;
use hashbrown::HashMap;

use super::{Dfs, DfsVisitor};

/// The result of a [`LowpointDfs`] run: per-node entry levels, lowpoints,
/// and the bridges that fell out of them.
///
/// The lowpoint of a node is the minimum level reachable from its subtree
/// via at most one non-tree arc. A tree arc from `n` to its parent is a
/// bridge iff `lowpoint(n) == level(n)`.
#[derive(Debug, Clone, Default)]
pub struct Lowpoints {
    level: HashMap<Node, usize, FxBuildHasher>,
    lowpoint: HashMap<Node, usize, FxBuildHasher>,
    bridges: Vec<Arc>,
}

impl Lowpoints {
    #[must_use]
    pub fn level(&self, node: Node) -> Option<usize> {
        self.level.get(&node).copied()
    }

    #[must_use]
    pub fn lowpoint(&self, node: Node) -> Option<usize> {
        self.lowpoint.get(&node).copied()
    }

    /// The bridges, in the order the traversal retreated over them.
    #[must_use]
    pub fn bridges(&self) -> &[Arc] {
        &self.bridges
    }
}

struct LowpointVisitor<'graph, G: ?Sized> {
    graph: &'graph G,
    depth: usize,
    result: Lowpoints,
}

impl<G> DfsVisitor for LowpointVisitor<'_, G>
where
    G: Graph + ?Sized,
{
    fn node_enter(&mut self, node: Node, _parent_arc: Arc) -> bool {
        self.result.level.insert(node, self.depth);
        self.result.lowpoint.insert(node, self.depth);
        self.depth += 1;
        true
    }

    fn back_arc(&mut self, node: Node, arc: Arc) -> bool {
        let target = self.graph.other(arc, node);
        // only upward sightings matter; the same non-tree arc is seen a
        // second time from the ancestor side
        if let (Some(&target_level), Some(low)) = (
            self.result.level.get(&target),
            self.result.lowpoint.get_mut(&node),
        ) {
            if target_level < *low {
                *low = target_level;
            }
        }
        true
    }

    fn node_exit(&mut self, node: Node, parent_arc: Arc) -> bool {
        self.depth -= 1;
        let low = self.result.lowpoint[&node];
        if parent_arc.is_valid() {
            if low == self.result.level[&node] {
                self.result.bridges.push(parent_arc);
            }
            let parent = self.graph.other(parent_arc, node);
            if let Some(parent_low) = self.result.lowpoint.get_mut(&parent) {
                if low < *parent_low {
                    *parent_low = low;
                }
            }
        }
        true
    }
}

/// The lowpoint specialization of the DFS: runs an undirected traversal and
/// labels every node with its entry level and lowpoint, detecting bridges
/// on the way.
pub struct LowpointDfs;

impl LowpointDfs {
    /// Computes levels, lowpoints and bridges for the whole graph,
    /// disregarding arc orientation.
    pub fn run<G>(graph: &G) -> Lowpoints
    where
        G: Graph + ?Sized,
    {
        let mut visitor = LowpointVisitor {
            graph,
            depth: 0,
            result: Lowpoints::default(),
        };
        Dfs::new(graph, ArcFilter::All).run(&mut visitor);
        visitor.result
    }
}
