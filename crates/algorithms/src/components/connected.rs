use alloc::vec::Vec;

use arcgraph_core::{Arc, ArcFilter, Graph, Node};
use fxhash::FxBuildHasher;
use hashbrown::HashMap;

use crate::traversal::{Dfs, DfsVisitor};

/// The partition of a graph into connected components, disregarding arc
/// orientation.
#[derive(Debug, Clone, Default)]
pub struct ConnectedComponents {
    component: HashMap<Node, usize, FxBuildHasher>,
    members: Vec<Vec<Node>>,
}

impl ConnectedComponents {
    #[must_use]
    pub fn count(&self) -> usize {
        self.members.len()
    }

    /// The index of the component containing `node`.
    #[must_use]
    pub fn component_of(&self, node: Node) -> Option<usize> {
        self.component.get(&node).copied()
    }

    #[must_use]
    pub fn members(&self, component: usize) -> &[Node] {
        &self.members[component]
    }

    pub fn iter(&self) -> impl Iterator<Item = &[Node]> {
        self.members.iter().map(Vec::as_slice)
    }

    #[must_use]
    pub fn same_component(&self, u: Node, v: Node) -> bool {
        match (self.component_of(u), self.component_of(v)) {
            (Some(cu), Some(cv)) => cu == cv,
            _ => false,
        }
    }

    pub(crate) fn into_parts(
        self,
    ) -> (HashMap<Node, usize, FxBuildHasher>, Vec<Vec<Node>>) {
        (self.component, self.members)
    }
}

pub(crate) struct Collector {
    pub(crate) result: ConnectedComponents,
}

impl DfsVisitor for Collector {
    fn node_enter(&mut self, node: Node, parent_arc: Arc) -> bool {
        if parent_arc.is_invalid() {
            self.result.members.push(Vec::new());
        }
        let index = self.result.members.len() - 1;
        self.result.component.insert(node, index);
        self.result.members[index].push(node);
        true
    }
}

/// Finds the connected components of `graph`.
pub fn connected_components<G>(graph: &G) -> ConnectedComponents
where
    G: Graph + ?Sized,
{
    let mut collector = Collector {
        result: ConnectedComponents::default(),
    };
    Dfs::new(graph, ArcFilter::All).run(&mut collector);
    collector.result
}
