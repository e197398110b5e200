use arcgraph_core::{Arc, ArcFilter, Graph, Node};
use fxhash::FxBuildHasher;
use hashbrown::HashMap;

use crate::traversal::{Dfs, DfsVisitor};

/// A two-coloring of a graph without odd cycles.
#[derive(Debug, Clone, Default)]
pub struct Bipartition {
    color: HashMap<Node, bool, FxBuildHasher>,
}

impl Bipartition {
    /// Whether `node` is in the red class. Each connected component is
    /// colored independently, its first-discovered node red.
    #[must_use]
    pub fn is_red(&self, node: Node) -> bool {
        self.color.get(&node).copied().unwrap_or(false)
    }

    pub fn red_nodes(&self) -> impl Iterator<Item = Node> + '_ {
        self.color
            .iter()
            .filter(|(_, &red)| red)
            .map(|(&node, _)| node)
    }

    pub fn blue_nodes(&self) -> impl Iterator<Item = Node> + '_ {
        self.color
            .iter()
            .filter(|(_, &red)| !red)
            .map(|(&node, _)| node)
    }
}

struct ColorVisitor<'graph, G: ?Sized> {
    graph: &'graph G,
    result: Bipartition,
    odd_cycle: bool,
}

impl<G> DfsVisitor for ColorVisitor<'_, G>
where
    G: Graph + ?Sized,
{
    fn node_enter(&mut self, node: Node, parent_arc: Arc) -> bool {
        let red = if parent_arc.is_invalid() {
            true
        } else {
            let parent = self.graph.other(parent_arc, node);
            !self.result.color[&parent]
        };
        self.result.color.insert(node, red);
        true
    }

    fn back_arc(&mut self, node: Node, arc: Arc) -> bool {
        let target = self.graph.other(arc, node);
        if self.result.color[&node] == self.result.color[&target] {
            self.odd_cycle = true;
            return false;
        }
        true
    }
}

/// Two-colors `graph` disregarding arc orientation, or returns `None` if
/// some component contains an odd cycle.
pub fn bipartition<G>(graph: &G) -> Option<Bipartition>
where
    G: Graph + ?Sized,
{
    let mut visitor = ColorVisitor {
        graph,
        result: Bipartition::default(),
        odd_cycle: false,
    };
    Dfs::new(graph, ArcFilter::All).run(&mut visitor);
    (!visitor.odd_cycle).then_some(visitor.result)
}

#[cfg(test)]
mod tests {
    use alloc::vec::Vec;

    use arcgraph_core::{CustomGraph, Directedness, Node};

    use super::bipartition;

    fn cycle(n: usize) -> (CustomGraph, Vec<Node>) {
        let mut graph = CustomGraph::new();
        let nodes: Vec<Node> = (0..n).map(|_| graph.add_node().unwrap()).collect();
        for i in 0..n {
            graph
                .add_arc(nodes[i], nodes[(i + 1) % n], Directedness::Edge)
                .unwrap();
        }
        (graph, nodes)
    }

    #[test]
    fn even_cycles_are_bipartite() {
        let (graph, nodes) = cycle(6);
        let classes = bipartition(&graph).unwrap();
        assert_eq!(classes.red_nodes().count(), 3);
        assert_eq!(classes.blue_nodes().count(), 3);
        for i in 0..6 {
            assert_ne!(
                classes.is_red(nodes[i]),
                classes.is_red(nodes[(i + 1) % 6])
            );
        }
    }

    #[test]
    fn odd_cycles_are_not() {
        let (graph, _) = cycle(5);
        assert!(bipartition(&graph).is_none());
    }

    #[test]
    fn directed_arcs_count_like_edges() {
        let mut graph = CustomGraph::new();
        let a = graph.add_node().unwrap();
        let b = graph.add_node().unwrap();
        let c = graph.add_node().unwrap();
        graph.add_arc(a, b, Directedness::Directed).unwrap();
        graph.add_arc(b, c, Directedness::Directed).unwrap();
        graph.add_arc(a, c, Directedness::Directed).unwrap();

        assert!(bipartition(&graph).is_none());
    }

    #[test]
    fn loops_are_odd_cycles() {
        let mut graph = CustomGraph::new();
        let a = graph.add_node().unwrap();
        graph.add_arc(a, a, Directedness::Edge).unwrap();
        assert!(bipartition(&graph).is_none());
    }
}
