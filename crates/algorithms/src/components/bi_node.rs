use alloc::vec::Vec;

use arcgraph_core::{Arc, ArcFilter, Graph, Node};
use fxhash::FxBuildHasher;
use hashbrown::{HashMap, HashSet};

use crate::traversal::{Dfs, DfsVisitor};

/// The blocks (2-node-connected components) and cutvertices of a graph.
///
/// Each block is a maximal set of arcs in which every two arcs lie on a
/// common simple cycle; a cutvertex is a node whose removal disconnects its
/// component. A node belongs to every block its incident arcs fall into,
/// and the cutvertices are exactly the nodes shared by more than one block.
#[derive(Debug, Clone, Default)]
pub struct BiNodeConnectedComponents {
    blocks: Vec<Vec<Arc>>,
    cutvertices: HashSet<Node, FxBuildHasher>,
}

impl BiNodeConnectedComponents {
    #[must_use]
    pub fn block_count(&self) -> usize {
        self.blocks.len()
    }

    /// The arcs of each block, in discovery order.
    #[must_use]
    pub fn blocks(&self) -> &[Vec<Arc>] {
        &self.blocks
    }

    #[must_use]
    pub fn is_cutvertex(&self, node: Node) -> bool {
        self.cutvertices.contains(&node)
    }

    pub fn cutvertices(&self) -> impl Iterator<Item = Node> + '_ {
        self.cutvertices.iter().copied()
    }
}

// The lowpoint DFS with an arc stack: a completed block is the run of
// stacked arcs above (and including) the tree arc whose lower endpoint
// cannot reach above its parent.
struct BlockVisitor<'graph, G: ?Sized> {
    graph: &'graph G,
    depth: usize,
    level: HashMap<Node, usize, FxBuildHasher>,
    lowpoint: HashMap<Node, usize, FxBuildHasher>,
    arc_stack: Vec<Arc>,
    root: Node,
    root_children: usize,
    result: BiNodeConnectedComponents,
}

impl<G> BlockVisitor<'_, G>
where
    G: Graph + ?Sized,
{
    fn finish_root(&mut self) {
        if self.root.is_valid() && self.root_children >= 2 {
            self.result.cutvertices.insert(self.root);
        }
        self.root = Node::INVALID;
        self.root_children = 0;
    }
}

impl<G> DfsVisitor for BlockVisitor<'_, G>
where
    G: Graph + ?Sized,
{
    fn node_enter(&mut self, node: Node, parent_arc: Arc) -> bool {
        if parent_arc.is_invalid() {
            self.finish_root();
            self.root = node;
        }
        self.level.insert(node, self.depth);
        self.lowpoint.insert(node, self.depth);
        self.depth += 1;
        if parent_arc.is_valid() {
            self.arc_stack.push(parent_arc);
        }
        true
    }

    fn back_arc(&mut self, node: Node, arc: Arc) -> bool {
        let target = self.graph.other(arc, node);
        let Some(&target_level) = self.level.get(&target) else {
            return true;
        };
        // upward sightings only; the ancestor-side sighting of the same
        // arc changes nothing
        if target_level < self.level[&node] {
            self.arc_stack.push(arc);
            if let Some(low) = self.lowpoint.get_mut(&node) {
                if target_level < *low {
                    *low = target_level;
                }
            }
        } else if target == node {
            // a loop arc is a block of its own
            self.result.blocks.push(alloc::vec![arc]);
        }
        true
    }

    fn node_exit(&mut self, node: Node, parent_arc: Arc) -> bool {
        self.depth -= 1;
        if parent_arc.is_invalid() {
            return true;
        }
        let low = self.lowpoint[&node];
        let parent = self.graph.other(parent_arc, node);
        if parent == self.root {
            self.root_children += 1;
        }
        if let Some(parent_low) = self.lowpoint.get_mut(&parent) {
            if low < *parent_low {
                *parent_low = low;
            }
        }
        if low >= self.level[&parent] {
            // the subtree under `node` cannot climb past `parent`: the
            // stacked arcs down to the tree arc form one block
            let mut block = Vec::new();
            while let Some(arc) = self.arc_stack.pop() {
                block.push(arc);
                if arc == parent_arc {
                    break;
                }
            }
            self.result.blocks.push(block);
            if parent != self.root {
                self.result.cutvertices.insert(parent);
            }
        }
        true
    }

    fn stop_search(&mut self) {
        self.finish_root();
    }
}

/// Finds the blocks and cutvertices of `graph`, disregarding arc
/// orientation.
pub fn bi_node_connected_components<G>(graph: &G) -> BiNodeConnectedComponents
where
    G: Graph + ?Sized,
{
    let mut visitor = BlockVisitor {
        graph,
        depth: 0,
        level: HashMap::default(),
        lowpoint: HashMap::default(),
        arc_stack: Vec::new(),
        root: Node::INVALID,
        root_children: 0,
        result: BiNodeConnectedComponents::default(),
    };
    Dfs::new(graph, ArcFilter::All).run(&mut visitor);
    visitor.result
}
