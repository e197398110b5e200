use alloc::collections::VecDeque;
use core::fmt::{self, Display, Formatter};

use arcgraph_core::{Arc, ArcFilter, Graph, Node, Path};
use error_stack::{Context, Report, Result};
use fxhash::FxBuildHasher;
use hashbrown::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BfsError {
    NodeNotFound,
    /// The node is already reached; a source may be added only once.
    DuplicateSource,
}

impl Display for BfsError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::NodeNotFound => f.write_str("node not found"),
            Self::DuplicateSource => f.write_str("node is already reached"),
        }
    }
}

impl Context for BfsError {}

/// Breadth-first search recording node levels and parent arcs.
///
/// Semantically equivalent to Dijkstra with unit costs: a node's level is
/// its arc distance from the nearest source. Sources are level 0; ties
/// resolve by FIFO order.
pub struct Bfs<'graph, G: ?Sized> {
    graph: &'graph G,
    filter: ArcFilter,
    queue: VecDeque<Node>,
    level: HashMap<Node, usize, FxBuildHasher>,
    parent: HashMap<Node, Arc, FxBuildHasher>,
}

impl<'graph, G> Bfs<'graph, G>
where
    G: Graph + ?Sized,
{
    /// A search following arc orientation (plus edges both ways).
    pub fn new(graph: &'graph G) -> Self {
        Self::with_filter(graph, ArcFilter::Forward)
    }

    pub fn with_filter(graph: &'graph G, filter: ArcFilter) -> Self {
        Self {
            graph,
            filter,
            queue: VecDeque::new(),
            level: HashMap::default(),
            parent: HashMap::default(),
        }
    }

    pub fn add_source(&mut self, node: Node) -> Result<(), BfsError> {
        if !self.graph.has_node(node) {
            return Err(Report::new(BfsError::NodeNotFound));
        }
        if self.level.contains_key(&node) {
            return Err(Report::new(BfsError::DuplicateSource));
        }
        self.level.insert(node, 0);
        self.queue.push_back(node);
        Ok(())
    }

    #[must_use]
    pub fn reached(&self, node: Node) -> bool {
        self.level.contains_key(&node)
    }

    /// The level of `node`, if reached.
    #[must_use]
    pub fn level(&self, node: Node) -> Option<usize> {
        self.level.get(&node).copied()
    }

    /// The tree arc through which `node` was reached; `Arc::INVALID` at
    /// sources and unreached nodes.
    #[must_use]
    pub fn parent_arc(&self, node: Node) -> Arc {
        self.parent.get(&node).copied().unwrap_or(Arc::INVALID)
    }

    /// Runs to exhaustion.
    pub fn run(&mut self) {
        self.run_until(|_| false);
    }

    /// Runs until a node satisfying `predicate` is due for expansion, and
    /// returns it. The search can be resumed afterwards.
    pub fn run_until<P>(&mut self, mut predicate: P) -> Option<Node>
    where
        P: FnMut(Node) -> bool,
    {
        while let Some(&node) = self.queue.front() {
            if predicate(node) {
                return Some(node);
            }
            self.queue.pop_front();
            let next_level = self.level[&node] + 1;
            for arc in self.graph.arcs_at(node, self.filter) {
                let target = self.graph.other(arc, node);
                if self.level.contains_key(&target) {
                    continue;
                }
                self.level.insert(target, next_level);
                self.parent.insert(target, arc);
                self.queue.push_back(target);
            }
        }
        None
    }

    /// The tree path from a source to `target`, or `None` if unreached.
    pub fn path_to(&self, target: Node) -> Option<Path<&'graph G>> {
        if !self.reached(target) {
            return None;
        }
        let mut path = Path::new(self.graph);
        path.begin(target);
        let mut node = target;
        loop {
            let arc = self.parent_arc(node);
            if arc.is_invalid() {
                break;
            }
            path.add_first(arc).ok()?;
            node = self.graph.other(arc, node);
        }
        Some(path)
    }
}
