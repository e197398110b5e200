use alloc::vec::Vec;

use arcgraph_core::{Arc, ArcFilter, Graph, Node, Subgraph};
use fxhash::FxBuildHasher;
use hashbrown::{HashMap, HashSet};

use crate::traversal::{Dfs, LowpointDfs};

use super::connected::Collector;

/// The 2-edge-connected components of a graph: the connected pieces that
/// remain after removing every bridge.
#[derive(Debug, Clone, Default)]
pub struct BiEdgeConnectedComponents {
    bridges: HashSet<Arc, FxBuildHasher>,
    component: HashMap<Node, usize, FxBuildHasher>,
    members: Vec<Vec<Node>>,
}

impl BiEdgeConnectedComponents {
    #[must_use]
    pub fn count(&self) -> usize {
        self.members.len()
    }

    #[must_use]
    pub fn is_bridge(&self, arc: Arc) -> bool {
        self.bridges.contains(&arc)
    }

    pub fn bridges(&self) -> impl Iterator<Item = Arc> + '_ {
        self.bridges.iter().copied()
    }

    #[must_use]
    pub fn component_of(&self, node: Node) -> Option<usize> {
        self.component.get(&node).copied()
    }

    #[must_use]
    pub fn members(&self, component: usize) -> &[Node] {
        &self.members[component]
    }

    #[must_use]
    pub fn same_component(&self, u: Node, v: Node) -> bool {
        match (self.component_of(u), self.component_of(v)) {
            (Some(cu), Some(cv)) => cu == cv,
            _ => false,
        }
    }
}

/// Finds the bridges and 2-edge-connected components of `graph`,
/// disregarding arc orientation.
///
/// Bridges come from the lowpoint DFS; the components are the connected
/// components of the subgraph with the bridges disabled.
pub fn bi_edge_connected_components<G>(graph: &G) -> BiEdgeConnectedComponents
where
    G: Graph + ?Sized,
{
    let lowpoints = LowpointDfs::run(graph);
    let bridges: HashSet<Arc, FxBuildHasher> = lowpoints.bridges().iter().copied().collect();

    let mut bridgeless = Subgraph::new(graph);
    for &bridge in &bridges {
        bridgeless.enable_arc(bridge, false);
    }

    let mut collector = Collector {
        result: super::ConnectedComponents::default(),
    };
    Dfs::new(&bridgeless, ArcFilter::All).run(&mut collector);

    let (component, members) = collector.result.into_parts();
    BiEdgeConnectedComponents {
        bridges,
        component,
        members,
    }
}
