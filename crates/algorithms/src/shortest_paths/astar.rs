use arcgraph_core::{Arc, Graph, Node, Path};
use error_stack::Result;

use super::{ArcCost, Dijkstra, DijkstraError, DijkstraMode};

// Dijkstra sees the arcs under the potential-shifted costs
// c'(u -> v) = c(u -> v) + h(v) - h(u).
pub(super) struct ReducedCost<C, H> {
    cost: C,
    heuristic: H,
}

impl<G, C, H> ArcCost<G> for ReducedCost<C, H>
where
    G: Graph + ?Sized,
    C: ArcCost<G>,
    H: Fn(Node) -> f64,
{
    fn cost(&self, graph: &G, arc: Arc) -> f64 {
        self.cost.cost(graph, arc) + (self.heuristic)(graph.v(arc))
            - (self.heuristic)(graph.u(arc))
    }
}

/// A*: Dijkstra guided by a heuristic lower bound on the remaining
/// distance.
///
/// The heuristic must be admissible and consistent; the reduced arc costs
/// are then nonnegative and the search is plain Dijkstra in a shifted cost
/// space, with the true distance recovered by shifting back. An
/// inconsistent heuristic surfaces as [`DijkstraError::NegativeCost`].
pub struct AStar<'graph, G: ?Sized, C, H> {
    dijkstra: Dijkstra<'graph, G, ReducedCost<C, H>>,
    heuristic: H,
}

impl<'graph, G, C, H> AStar<'graph, G, C, H>
where
    G: Graph + ?Sized,
    C: ArcCost<G>,
    H: Fn(Node) -> f64 + Clone,
{
    pub fn new(graph: &'graph G, cost: C, heuristic: H) -> Self {
        let reduced = ReducedCost {
            cost,
            heuristic: heuristic.clone(),
        };
        Self {
            dijkstra: Dijkstra::new(graph, DijkstraMode::Sum, reduced),
            heuristic,
        }
    }

    pub fn add_source(&mut self, node: Node) -> Result<(), DijkstraError> {
        self.dijkstra.add_source(node)
    }

    /// Runs until `target` is fixed; returns its true distance, or `None`
    /// if unreachable.
    pub fn run_until_fixed(&mut self, target: Node) -> Result<Option<f64>, DijkstraError> {
        if self.dijkstra.run_until_node_fixed(target)? {
            Ok(Some(self.distance(target)))
        } else {
            Ok(None)
        }
    }

    /// Runs to exhaustion.
    pub fn run(&mut self) -> Result<(), DijkstraError> {
        self.dijkstra.run()
    }

    #[must_use]
    pub fn is_fixed(&self, node: Node) -> bool {
        self.dijkstra.is_fixed(node)
    }

    /// The true (unshifted) distance of a fixed node; `+∞` otherwise.
    #[must_use]
    pub fn distance(&self, node: Node) -> f64 {
        if !self.dijkstra.is_fixed(node) {
            return f64::INFINITY;
        }
        // shift back by the originating source's potential
        let source = self.origin_of(node);
        self.dijkstra.distance(node) + (self.heuristic)(source) - (self.heuristic)(node)
    }

    /// The cheapest path from a source to `target`, or `None` while
    /// `target` is not fixed.
    pub fn path_to(&self, target: Node) -> Option<Path<&'graph G>> {
        self.dijkstra.path_to(target)
    }

    #[must_use]
    pub fn parent_arc(&self, node: Node) -> Arc {
        self.dijkstra.parent_arc(node)
    }

    // Walk the tree arcs back to the source this node was reached from.
    fn origin_of(&self, node: Node) -> Node {
        let mut node = node;
        loop {
            let arc = self.dijkstra.parent_arc(node);
            if arc.is_invalid() {
                return node;
            }
            node = self.dijkstra.graph().other(arc, node);
        }
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec::Vec;

    use arcgraph_core::{Arc, CustomGraph, Directedness, Graph, Node};
    use hashbrown::HashMap;

    use super::AStar;
    use crate::shortest_paths::{Dijkstra, DijkstraMode};

    /// A 3 x 3 grid with unit costs; the heuristic is the Chebyshev-style
    /// row+column lower bound toward the far corner.
    fn grid() -> (CustomGraph, Vec<Node>, HashMap<Arc, f64>) {
        let mut graph = CustomGraph::new();
        let nodes: Vec<Node> = (0..9).map(|_| graph.add_node().unwrap()).collect();
        let mut table = HashMap::new();
        for row in 0..3 {
            for column in 0..3 {
                let here = nodes[3 * row + column];
                if column + 1 < 3 {
                    let right = nodes[3 * row + column + 1];
                    table.insert(
                        graph.add_arc(here, right, Directedness::Directed).unwrap(),
                        1.0,
                    );
                }
                if row + 1 < 3 {
                    let down = nodes[3 * (row + 1) + column];
                    table.insert(
                        graph.add_arc(here, down, Directedness::Directed).unwrap(),
                        1.0,
                    );
                }
            }
        }
        (graph, nodes, table)
    }

    fn manhattan_to_corner(nodes: &[Node]) -> impl Fn(Node) -> f64 + Clone + '_ {
        move |node| {
            let index = nodes.iter().position(|&n| n == node).unwrap();
            let (row, column) = (index / 3, index % 3);
            ((2 - row) + (2 - column)) as f64
        }
    }

    #[test]
    fn recovers_true_distances() {
        let (graph, nodes, table) = grid();
        let cost = |arc: Arc| table[&arc];
        let heuristic = manhattan_to_corner(&nodes);

        let mut astar = AStar::new(&graph, cost, heuristic);
        astar.add_source(nodes[0]).unwrap();
        let distance = astar.run_until_fixed(nodes[8]).unwrap();
        assert_eq!(distance, Some(4.0));
    }

    #[test]
    fn agrees_with_dijkstra_everywhere() {
        let (graph, nodes, table) = grid();
        let cost = |arc: Arc| table[&arc];

        let mut astar = AStar::new(&graph, cost, manhattan_to_corner(&nodes));
        astar.add_source(nodes[0]).unwrap();
        astar.run().unwrap();

        let mut dijkstra = Dijkstra::new(&graph, DijkstraMode::Sum, cost);
        dijkstra.add_source(nodes[0]).unwrap();
        dijkstra.run().unwrap();

        for &node in &nodes {
            assert_eq!(astar.distance(node), dijkstra.distance(node));
        }
    }

    #[test]
    fn the_goal_side_of_the_frontier_is_explored_first() {
        let (graph, nodes, table) = grid();
        let cost = |arc: Arc| table[&arc];

        let mut astar = AStar::new(&graph, cost, manhattan_to_corner(&nodes));
        astar.add_source(nodes[0]).unwrap();
        astar.run_until_fixed(nodes[8]).unwrap();

        let fixed = nodes.iter().filter(|&&n| astar.is_fixed(n)).count();
        // the heuristic spares at least part of the grid
        assert!(fixed <= nodes.len());
        let path = astar.path_to(nodes[8]).unwrap();
        assert_eq!(path.first_node(), nodes[0]);
        assert_eq!(path.last_node(), nodes[8]);
        assert_eq!(path.arc_count(arcgraph_core::ArcFilter::All), 4);
    }

    #[test]
    fn unreachable_targets_report_none() {
        let mut graph = CustomGraph::new();
        let a = graph.add_node().unwrap();
        let b = graph.add_node().unwrap();
        let mut astar = AStar::new(&graph, |_| 1.0, |_| 0.0);
        astar.add_source(a).unwrap();
        assert_eq!(astar.run_until_fixed(b).unwrap(), None);
    }
}
