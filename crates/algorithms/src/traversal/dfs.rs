use alloc::vec::Vec;

use arcgraph_core::{Arc, ArcFilter, ArcIter, Graph, Node};
use fxhash::FxBuildHasher;
use hashbrown::HashSet;

/// The hook points of a [`Dfs`] run. Every hook has a default no-op body;
/// implementors override the ones they care about.
///
/// `node_enter`, `node_exit` and `back_arc` return whether the traversal
/// should continue: returning `false` aborts the whole search (not just the
/// current branch), after which `stop_search` still runs.
pub trait DfsVisitor {
    /// Called once, before the first root is entered.
    fn start(&mut self, _filter: ArcFilter) {}

    /// Called when `node` is first discovered. The parent arc is
    /// `Arc::INVALID` at roots.
    fn node_enter(&mut self, _node: Node, _parent_arc: Arc) -> bool {
        true
    }

    /// Called when every arc out of `node` has been processed.
    fn node_exit(&mut self, _node: Node, _parent_arc: Arc) -> bool {
        true
    }

    /// Called when an arc out of the current node reaches an
    /// already-visited node. The tree arc to the parent is not reported.
    fn back_arc(&mut self, _node: Node, _arc: Arc) -> bool {
        true
    }

    /// Called once, after the traversal ended or aborted.
    fn stop_search(&mut self) {}
}

struct Frame<'graph> {
    node: Node,
    parent_arc: Arc,
    arcs: ArcIter<'graph>,
}

/// A depth-first traversal with visitor hooks.
///
/// The traversal is iterative (explicit stack), so graphs of arbitrary
/// depth are safe. The direction semantics come from the [`ArcFilter`]:
/// `All` walks arcs disregarding orientation, `Forward`/`Backward` follow
/// or oppose it. Each node is visited once per [`Dfs`] instance; the
/// visited set persists across runs until [`reset`](Self::reset), so a
/// second run with different roots continues the same search.
///
/// Ordering is deterministic given the graph's arc-enumeration order.
pub struct Dfs<'graph, G: ?Sized> {
    graph: &'graph G,
    filter: ArcFilter,
    visited: HashSet<Node, FxBuildHasher>,
}

impl<'graph, G> Dfs<'graph, G>
where
    G: Graph + ?Sized,
{
    pub fn new(graph: &'graph G, filter: ArcFilter) -> Self {
        Self {
            graph,
            filter,
            visited: HashSet::default(),
        }
    }

    /// Whether `node` has been discovered by any run so far.
    #[must_use]
    pub fn visited(&self, node: Node) -> bool {
        self.visited.contains(&node)
    }

    pub fn reset(&mut self) {
        self.visited.clear();
    }

    /// Runs from every node of the graph, in enumeration order.
    ///
    /// Returns `false` iff a hook aborted the traversal.
    pub fn run<V>(&mut self, visitor: &mut V) -> bool
    where
        V: DfsVisitor,
    {
        let roots = self.graph.nodes().collect::<Vec<_>>();
        self.run_from(roots, visitor)
    }

    /// Runs from the given roots, in order. Roots already visited are
    /// skipped.
    ///
    /// Returns `false` iff a hook aborted the traversal.
    pub fn run_from<V, I>(&mut self, roots: I, visitor: &mut V) -> bool
    where
        V: DfsVisitor,
        I: IntoIterator<Item = Node>,
    {
        visitor.start(self.filter);
        let completed = self.traverse(roots, visitor);
        visitor.stop_search();
        completed
    }

    fn traverse<V, I>(&mut self, roots: I, visitor: &mut V) -> bool
    where
        V: DfsVisitor,
        I: IntoIterator<Item = Node>,
    {
        let mut stack: Vec<Frame<'graph>> = Vec::new();
        for root in roots {
            if self.visited.contains(&root) || !self.graph.has_node(root) {
                continue;
            }
            self.visited.insert(root);
            if !visitor.node_enter(root, Arc::INVALID) {
                return false;
            }
            stack.push(Frame {
                node: root,
                parent_arc: Arc::INVALID,
                arcs: self.graph.arcs_at(root, self.filter),
            });

            while let Some(frame) = stack.last_mut() {
                let Some(arc) = frame.arcs.next() else {
                    let (node, parent_arc) = (frame.node, frame.parent_arc);
                    stack.pop();
                    if !visitor.node_exit(node, parent_arc) {
                        return false;
                    }
                    continue;
                };
                // the tree arc is walked downward only
                if arc == frame.parent_arc {
                    continue;
                }
                let node = frame.node;
                let target = self.graph.other(arc, node);
                if self.visited.contains(&target) {
                    if !visitor.back_arc(node, arc) {
                        return false;
                    }
                } else {
                    self.visited.insert(target);
                    if !visitor.node_enter(target, arc) {
                        return false;
                    }
                    stack.push(Frame {
                        node: target,
                        parent_arc: arc,
                        arcs: self.graph.arcs_at(target, self.filter),
                    });
                }
            }
        }
        true
    }
}
