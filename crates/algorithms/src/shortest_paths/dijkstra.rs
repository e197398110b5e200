use core::fmt::{self, Display, Formatter};

use arcgraph_core::{Arc, ArcFilter, Graph, Node, Path, PriorityQueue};
use error_stack::{Context, Report, Result};
use fxhash::FxBuildHasher;
use hashbrown::{HashMap, HashSet};

use super::ArcCost;

/// How path costs accumulate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DijkstraMode {
    /// Path cost is the sum of arc costs. Arc costs must be nonnegative;
    /// sources start at `0`.
    Sum,
    /// Path cost is the maximum arc cost (minimax paths). Negative costs
    /// are fine; sources start at `-∞`.
    Maximum,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DijkstraError {
    NodeNotFound,
    /// The node is already reached; a source may be added only once.
    DuplicateSource,
    /// A negative arc cost was encountered in `Sum` mode.
    NegativeCost,
}

impl Display for DijkstraError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::NodeNotFound => f.write_str("node not found"),
            Self::DuplicateSource => f.write_str("node is already reached"),
            Self::NegativeCost => f.write_str("negative arc cost in sum mode"),
        }
    }
}

impl Context for DijkstraError {}

/// Dijkstra's algorithm over the indexed priority queue.
///
/// A node is *reached* once it sits in the queue with some tentative cost
/// and *fixed* once extracted; a fixed node's distance and parent arc are
/// final, and nodes are fixed in monotone nondecreasing distance order.
/// Arcs are followed under the `Forward` filter (outgoing arcs plus edges
/// in either direction); an arc of cost `+∞` is impassable.
///
/// # Example
///
/// ```
/// use arcgraph_core::{CustomGraph, Directedness, Graph};
/// use arcgraph_algorithms::shortest_paths::{Dijkstra, DijkstraMode};
///
/// let mut graph = CustomGraph::new();
/// let a = graph.add_node().unwrap();
/// let b = graph.add_node().unwrap();
/// let ab = graph.add_arc(a, b, Directedness::Directed).unwrap();
///
/// let mut dijkstra = Dijkstra::new(&graph, DijkstraMode::Sum, |_| 2.5);
/// dijkstra.add_source(a).unwrap();
/// dijkstra.run().unwrap();
/// assert_eq!(dijkstra.distance(b), 2.5);
/// assert_eq!(dijkstra.parent_arc(b), ab);
/// ```
pub struct Dijkstra<'graph, G: ?Sized, C> {
    graph: &'graph G,
    cost: C,
    mode: DijkstraMode,
    distance: HashMap<Node, f64, FxBuildHasher>,
    parent: HashMap<Node, Arc, FxBuildHasher>,
    queue: PriorityQueue<Node, f64>,
    fixed: HashSet<Node, FxBuildHasher>,
}

impl<'graph, G, C> Dijkstra<'graph, G, C>
where
    G: Graph + ?Sized,
    C: ArcCost<G>,
{
    pub fn new(graph: &'graph G, mode: DijkstraMode, cost: C) -> Self {
        Self {
            graph,
            cost,
            mode,
            distance: HashMap::default(),
            parent: HashMap::default(),
            queue: PriorityQueue::new(),
            fixed: HashSet::default(),
        }
    }

    /// The graph this search runs on.
    #[must_use]
    pub fn graph(&self) -> &'graph G {
        self.graph
    }

    pub fn add_source(&mut self, node: Node) -> Result<(), DijkstraError> {
        if !self.graph.has_node(node) {
            return Err(Report::new(DijkstraError::NodeNotFound));
        }
        if self.reached(node) {
            return Err(Report::new(DijkstraError::DuplicateSource));
        }
        let base = match self.mode {
            DijkstraMode::Sum => 0.0,
            DijkstraMode::Maximum => f64::NEG_INFINITY,
        };
        self.queue.push(node, base);
        Ok(())
    }

    /// Whether `node` has a tentative or final distance.
    #[must_use]
    pub fn reached(&self, node: Node) -> bool {
        self.fixed.contains(&node) || self.queue.contains(node)
    }

    /// Whether the distance of `node` is final.
    #[must_use]
    pub fn is_fixed(&self, node: Node) -> bool {
        self.fixed.contains(&node)
    }

    /// Fixes the cheapest reached node and relaxes its outgoing arcs.
    /// Returns the fixed node, or `None` when nothing is left to fix.
    pub fn step(&mut self) -> Result<Option<Node>, DijkstraError> {
        let Some((node, node_cost)) = self.queue.pop() else {
            return Ok(None);
        };
        self.fixed.insert(node);
        self.distance.insert(node, node_cost);

        for arc in self.graph.arcs_at(node, ArcFilter::Forward) {
            let arc_cost = self.cost.cost(self.graph, arc);
            if self.mode == DijkstraMode::Sum && arc_cost < 0.0 {
                return Err(Report::new(DijkstraError::NegativeCost));
            }
            if arc_cost == f64::INFINITY {
                continue;
            }
            let target = self.graph.other(arc, node);
            if self.fixed.contains(&target) {
                continue;
            }
            let through = match self.mode {
                DijkstraMode::Sum => node_cost + arc_cost,
                DijkstraMode::Maximum => node_cost.max(arc_cost),
            };
            match self.queue.priority(target) {
                Some(&current) if through >= current => {}
                _ => {
                    self.queue.push(target, through);
                    self.parent.insert(target, arc);
                }
            }
        }
        Ok(Some(node))
    }

    /// Runs until every reachable node is fixed.
    pub fn run(&mut self) -> Result<(), DijkstraError> {
        while self.step()?.is_some() {}
        Ok(())
    }

    /// Runs until a node satisfying `predicate` is fixed, and returns it.
    pub fn run_until_fixed<P>(&mut self, mut predicate: P) -> Result<Option<Node>, DijkstraError>
    where
        P: FnMut(Node) -> bool,
    {
        while let Some(node) = self.step()? {
            if predicate(node) {
                return Ok(Some(node));
            }
        }
        Ok(None)
    }

    /// Runs until `target` is fixed; returns `false` if it is unreachable.
    pub fn run_until_node_fixed(&mut self, target: Node) -> Result<bool, DijkstraError> {
        if self.is_fixed(target) {
            return Ok(true);
        }
        Ok(self.run_until_fixed(|node| node == target)?.is_some())
    }

    /// The final distance of `node`; `+∞` while not fixed.
    #[must_use]
    pub fn distance(&self, node: Node) -> f64 {
        self.distance.get(&node).copied().unwrap_or(f64::INFINITY)
    }

    /// The final parent arc of `node`; `Arc::INVALID` at sources and
    /// non-fixed nodes.
    #[must_use]
    pub fn parent_arc(&self, node: Node) -> Arc {
        if self.fixed.contains(&node) {
            self.parent.get(&node).copied().unwrap_or(Arc::INVALID)
        } else {
            Arc::INVALID
        }
    }

    /// The cheapest path from a source to `target`, or `None` while
    /// `target` is not fixed.
    pub fn path_to(&self, target: Node) -> Option<Path<&'graph G>> {
        if !self.is_fixed(target) {
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

#[cfg(test)]
mod tests {
    use alloc::vec::Vec;

    use arcgraph_core::{Arc, CustomGraph, Directedness, Graph, Node};

    use super::{Dijkstra, DijkstraError, DijkstraMode};

    /// The path 0-1-2-3-4 with costs 1, 2, 3, 4 plus a direct 0 -> 4
    /// shortcut of cost 100.
    fn ladder() -> (CustomGraph, Vec<Node>, Vec<Arc>) {
        let mut graph = CustomGraph::new();
        let nodes: Vec<Node> = (0..5).map(|_| graph.add_node().unwrap()).collect();
        let mut arcs = Vec::new();
        for i in 0..4 {
            arcs.push(
                graph
                    .add_arc(nodes[i], nodes[i + 1], Directedness::Edge)
                    .unwrap(),
            );
        }
        arcs.push(
            graph
                .add_arc(nodes[0], nodes[4], Directedness::Directed)
                .unwrap(),
        );
        (graph, nodes, arcs)
    }

    fn ladder_cost(arcs: &[Arc]) -> impl Fn(Arc) -> f64 + '_ {
        move |arc| {
            let index = arcs.iter().position(|&a| a == arc).unwrap();
            if index == 4 { 100.0 } else { (index + 1) as f64 }
        }
    }

    #[test]
    fn sum_mode_distances() {
        let (graph, nodes, arcs) = ladder();
        let mut dijkstra = Dijkstra::new(&graph, DijkstraMode::Sum, ladder_cost(&arcs));
        dijkstra.add_source(nodes[0]).unwrap();
        dijkstra.run().unwrap();

        let expected = [0.0, 1.0, 3.0, 6.0, 10.0];
        for (node, want) in nodes.iter().zip(expected) {
            assert_eq!(dijkstra.distance(*node), want);
        }
        // the shortcut lost to the linear path
        assert_eq!(dijkstra.parent_arc(nodes[4]), arcs[3]);
    }

    #[test]
    fn maximum_mode_distances() {
        let (graph, nodes, arcs) = ladder();
        let mut dijkstra = Dijkstra::new(&graph, DijkstraMode::Maximum, ladder_cost(&arcs));
        dijkstra.add_source(nodes[0]).unwrap();
        dijkstra.run().unwrap();

        let expected = [f64::NEG_INFINITY, 1.0, 2.0, 3.0, 4.0];
        for (node, want) in nodes.iter().zip(expected) {
            assert_eq!(dijkstra.distance(*node), want);
        }
    }

    #[test]
    fn fixing_order_is_monotone() {
        let (graph, nodes, arcs) = ladder();
        let mut dijkstra = Dijkstra::new(&graph, DijkstraMode::Sum, ladder_cost(&arcs));
        dijkstra.add_source(nodes[0]).unwrap();

        let mut last = f64::NEG_INFINITY;
        while let Some(node) = dijkstra.step().unwrap() {
            let distance = dijkstra.distance(node);
            assert!(distance >= last);
            last = distance;
        }
    }

    #[test]
    fn parent_arcs_certify_distances() {
        let (graph, nodes, arcs) = ladder();
        let mut dijkstra = Dijkstra::new(&graph, DijkstraMode::Sum, ladder_cost(&arcs));
        dijkstra.add_source(nodes[0]).unwrap();
        dijkstra.run().unwrap();

        let cost = ladder_cost(&arcs);
        for &node in &nodes[1..] {
            let arc = dijkstra.parent_arc(node);
            let parent = graph.other(arc, node);
            assert_eq!(
                dijkstra.distance(node),
                dijkstra.distance(parent) + cost(arc)
            );
        }
    }

    #[test]
    fn run_until_fixed_stops_early() {
        let (graph, nodes, arcs) = ladder();
        let mut dijkstra = Dijkstra::new(&graph, DijkstraMode::Sum, ladder_cost(&arcs));
        dijkstra.add_source(nodes[0]).unwrap();

        assert!(dijkstra.run_until_node_fixed(nodes[2]).unwrap());
        assert!(dijkstra.is_fixed(nodes[2]));
        assert!(!dijkstra.is_fixed(nodes[4]));
        assert_eq!(dijkstra.distance(nodes[4]), f64::INFINITY);

        // resuming completes the search
        dijkstra.run().unwrap();
        assert!(dijkstra.is_fixed(nodes[4]));
    }

    #[test]
    fn path_reconstruction() {
        let (graph, nodes, arcs) = ladder();
        let mut dijkstra = Dijkstra::new(&graph, DijkstraMode::Sum, ladder_cost(&arcs));
        dijkstra.add_source(nodes[0]).unwrap();
        dijkstra.run().unwrap();

        let path = dijkstra.path_to(nodes[4]).unwrap();
        assert_eq!(path.first_node(), nodes[0]);
        assert_eq!(path.last_node(), nodes[4]);
        assert_eq!(path.nodes().collect::<Vec<_>>(), nodes);
    }

    #[test]
    fn infinite_costs_are_impassable() {
        let mut graph = CustomGraph::new();
        let a = graph.add_node().unwrap();
        let b = graph.add_node().unwrap();
        graph.add_arc(a, b, Directedness::Directed).unwrap();

        let mut dijkstra = Dijkstra::new(&graph, DijkstraMode::Sum, |_| f64::INFINITY);
        dijkstra.add_source(a).unwrap();
        dijkstra.run().unwrap();
        assert!(!dijkstra.is_fixed(b));
        assert_eq!(dijkstra.distance(b), f64::INFINITY);
    }

    #[test]
    fn contract_violations() {
        let mut graph = CustomGraph::new();
        let a = graph.add_node().unwrap();
        let b = graph.add_node().unwrap();
        graph.add_arc(a, b, Directedness::Directed).unwrap();

        let mut dijkstra = Dijkstra::new(&graph, DijkstraMode::Sum, |_| -1.0);
        dijkstra.add_source(a).unwrap();
        assert_eq!(
            dijkstra.add_source(a).unwrap_err().current_context(),
            &DijkstraError::DuplicateSource
        );
        assert_eq!(
            dijkstra.run().unwrap_err().current_context(),
            &DijkstraError::NegativeCost
        );
        assert_eq!(
            dijkstra
                .add_source(Node::new(1234))
                .unwrap_err()
                .current_context(),
            &DijkstraError::NodeNotFound
        );
    }
}
