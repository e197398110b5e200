use alloc::vec::Vec;

use arcgraph_core::{Arc, ArcFilter, Graph, Node, ReverseGraph};
use fxhash::FxBuildHasher;
use hashbrown::HashMap;

use crate::traversal::{Dfs, DfsVisitor};

/// The partition of a graph into strongly connected components.
///
/// Components are reported in topological order of the condensation
/// (source components first). Edges act as two-cycles, so an undirected
/// component is a single strong component.
#[derive(Debug, Clone, Default)]
pub struct StrongComponents {
    component: HashMap<Node, usize, FxBuildHasher>,
    members: Vec<Vec<Node>>,
}

impl StrongComponents {
    #[must_use]
    pub fn count(&self) -> usize {
        self.members.len()
    }

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
}

#[derive(Default)]
struct FinishOrder {
    order: Vec<Node>,
}

impl DfsVisitor for FinishOrder {
    fn node_exit(&mut self, node: Node, _parent_arc: Arc) -> bool {
        self.order.push(node);
        true
    }
}

#[derive(Default)]
struct Assigner {
    result: StrongComponents,
}

impl DfsVisitor for Assigner {
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

/// Finds the strongly connected components of `graph`.
///
/// Two passes: a forward DFS computes finishing times, then a backward
/// sweep over the reversed graph in decreasing finish order carves out one
/// component per root.
pub fn strong_components<G>(graph: &G) -> StrongComponents
where
    G: Graph + ?Sized,
{
    let mut finish = FinishOrder::default();
    Dfs::new(graph, ArcFilter::Forward).run(&mut finish);

    let reversed = ReverseGraph::new(graph);
    let mut assigner = Assigner::default();
    Dfs::new(&reversed, ArcFilter::Forward)
        .run_from(finish.order.into_iter().rev(), &mut assigner);
    assigner.result
}

#[cfg(test)]
mod tests {
    use alloc::vec::Vec;

    use arcgraph_core::{CustomGraph, Directedness, Graph, Node};

    use super::strong_components;

    /// ```text
    /// 0 → 1   3
    ///   ↖ ↓ ↗ ↓
    ///     2   4
    /// ```
    #[test]
    fn cycle_plus_tail() {
        let mut graph = CustomGraph::new();
        let nodes: Vec<Node> = (0..5).map(|_| graph.add_node().unwrap()).collect();
        for (u, v) in [(0, 1), (1, 2), (2, 0), (2, 3), (3, 4)] {
            graph
                .add_arc(nodes[u], nodes[v], Directedness::Directed)
                .unwrap();
        }

        let components = strong_components(&graph);
        assert_eq!(components.count(), 3);
        assert!(components.same_component(nodes[0], nodes[1]));
        assert!(components.same_component(nodes[1], nodes[2]));
        assert!(!components.same_component(nodes[2], nodes[3]));
        assert!(!components.same_component(nodes[3], nodes[4]));
    }

    #[test]
    fn edges_act_as_two_cycles() {
        let mut graph = CustomGraph::new();
        let a = graph.add_node().unwrap();
        let b = graph.add_node().unwrap();
        let c = graph.add_node().unwrap();
        graph.add_arc(a, b, Directedness::Edge).unwrap();
        graph.add_arc(b, c, Directedness::Directed).unwrap();

        let components = strong_components(&graph);
        assert_eq!(components.count(), 2);
        assert!(components.same_component(a, b));
        assert!(!components.same_component(b, c));
    }

    #[test]
    fn components_come_out_in_condensation_order() {
        let mut graph = CustomGraph::new();
        let a = graph.add_node().unwrap();
        let b = graph.add_node().unwrap();
        graph.add_arc(a, b, Directedness::Directed).unwrap();

        let components = strong_components(&graph);
        assert_eq!(components.count(), 2);
        // a's component is discovered first in the backward sweep
        assert_eq!(components.component_of(a), Some(0));
        assert_eq!(components.component_of(b), Some(1));
    }

    #[test]
    fn every_node_is_assigned() {
        let mut graph = CustomGraph::new();
        let nodes: Vec<Node> = (0..6).map(|_| graph.add_node().unwrap()).collect();
        for (u, v) in [(0, 1), (1, 0), (2, 3), (4, 5), (5, 4), (3, 4)] {
            graph
                .add_arc(nodes[u], nodes[v], Directedness::Directed)
                .unwrap();
        }

        let components = strong_components(&graph);
        for &node in &nodes {
            assert!(components.component_of(node).is_some());
        }
        assert_eq!(components.count(), 3);
        assert_eq!(
            components.iter().map(<[Node]>::len).sum::<usize>(),
            graph.node_count()
        );
    }
}
