use arcgraph_core::{Arc, ArcFilter, Directedness, Graph, Node, Supergraph};
use error_stack::{Report, Result};
use fxhash::FxBuildHasher;
use hashbrown::HashMap;

use super::{IntegerPreflow, PreflowError};
use crate::shortest_paths::{Dijkstra, DijkstraMode};

/// Approximate maximum flow over real-valued capacities, by fixed-point
/// scaling around the exact integer solver.
///
/// An upper bound `U` on the flow value is derived from three sources: the
/// widest-path bottleneck (a Dijkstra run in `Maximum` mode over negated
/// capacities) times the arc count, the capacity sum out of the source,
/// and the capacity sum into the target. Capacities are multiplied by the
/// largest power of two keeping the scaled source outflow inside 64-bit
/// range, an artificial super-source arc of capacity `⌈U⌉` bounds the
/// total, and the integer result is divided back. The result is exact up
/// to [`error_bound`](Self::error_bound).
pub struct Preflow<'graph, G: ?Sized, C> {
    graph: &'graph G,
    capacity: C,
    source: Node,
    target: Node,
    flow: HashMap<Arc, f64, FxBuildHasher>,
    flow_size: f64,
    error_bound: f64,
}

impl<'graph, G, C> Preflow<'graph, G, C>
where
    G: Graph + ?Sized,
    C: Fn(Arc) -> f64,
{
    pub fn new(
        graph: &'graph G,
        source: Node,
        target: Node,
        capacity: C,
    ) -> Result<Self, PreflowError> {
        if !graph.has_node(source) || !graph.has_node(target) {
            return Err(Report::new(PreflowError::NodeNotFound));
        }
        if source == target {
            return Err(Report::new(PreflowError::InvalidTerminals));
        }
        for arc in graph.arcs(ArcFilter::All) {
            if capacity(arc) < 0.0 {
                return Err(Report::new(PreflowError::NegativeCapacity));
            }
        }
        Ok(Self {
            graph,
            capacity,
            source,
            target,
            flow: HashMap::default(),
            flow_size: 0.0,
            error_bound: 0.0,
        })
    }

    /// Computes the (approximate) maximum flow.
    pub fn run(&mut self) -> Result<(), PreflowError> {
        let Some(bound) = self.flow_bound()? else {
            // target unreachable: the zero flow is exact
            self.flow_size = 0.0;
            self.error_bound = 0.0;
            return Ok(());
        };
        if bound == 0.0 {
            self.flow_size = 0.0;
            self.error_bound = 0.0;
            return Ok(());
        }
        if !bound.is_finite() {
            return Err(Report::new(PreflowError::Overflow));
        }

        let multiplier = Self::scale_multiplier(bound);
        let arc_count = self.graph.arc_count(ArcFilter::All) as f64;
        self.error_bound = arc_count / multiplier;

        // the artificial super-source arc caps the scaled problem at U
        let mut augmented = Supergraph::new(self.graph);
        let super_source = augmented
            .add_node()
            .map_err(|_| Report::new(PreflowError::Overflow))?;
        let bridle = augmented
            .add_arc(super_source, self.source, Directedness::Directed)
            .map_err(|_| Report::new(PreflowError::Overflow))?;

        let capacity = &self.capacity;
        let scaled = |arc: Arc| -> i64 {
            if arc == bridle {
                (bound.ceil() * multiplier).min(i64::MAX as f64) as i64
            } else {
                (capacity(arc) * multiplier).floor() as i64
            }
        };

        let mut solver = IntegerPreflow::new(&augmented, super_source, self.target, scaled)?;
        solver.run();

        self.flow_size = solver.flow_size() as f64 / multiplier;
        self.flow.clear();
        for arc in self.graph.arcs(ArcFilter::All) {
            let scaled_flow = solver.flow(arc);
            if scaled_flow != 0 {
                self.flow.insert(arc, scaled_flow as f64 / multiplier);
            }
        }
        Ok(())
    }

    #[must_use]
    pub fn flow_size(&self) -> f64 {
        self.flow_size
    }

    /// The signed flow on `arc`; negative on an edge used against its
    /// stored orientation.
    #[must_use]
    pub fn flow(&self, arc: Arc) -> f64 {
        self.flow.get(&arc).copied().unwrap_or(0.0)
    }

    /// The maximum amount by which [`flow_size`](Self::flow_size) may fall
    /// short of the true maximum.
    #[must_use]
    pub fn error_bound(&self) -> f64 {
        self.error_bound
    }

    // The flow bound U, or None when the target is unreachable.
    fn flow_bound(&self) -> Result<Option<f64>, PreflowError> {
        let capacity = &self.capacity;

        // widest-path bottleneck: minimize the maximum negated capacity
        let mut widest = Dijkstra::new(self.graph, DijkstraMode::Maximum, |arc: Arc| {
            -capacity(arc)
        });
        widest
            .add_source(self.source)
            .map_err(|_| Report::new(PreflowError::NodeNotFound))?;
        let reached = widest
            .run_until_node_fixed(self.target)
            .map_err(|_| Report::new(PreflowError::NegativeCapacity))?;
        if !reached {
            return Ok(None);
        }
        let bottleneck = -widest.distance(self.target);
        let arc_count = self.graph.arc_count(ArcFilter::All) as f64;

        let mut source_out = 0.0;
        for arc in self.graph.arcs_at(self.source, ArcFilter::Forward) {
            source_out += capacity(arc);
        }
        let mut target_in = 0.0;
        for arc in self.graph.arcs_at(self.target, ArcFilter::Backward) {
            target_in += capacity(arc);
        }

        Ok(Some(
            (arc_count * bottleneck).min(source_out).min(target_in),
        ))
    }

    // The largest power of two with scaled capacities safely inside the
    // 64-bit range.
    fn scale_multiplier(bound: f64) -> f64 {
        let limit = (i64::MAX as f64) / bound;
        let mut multiplier = 1.0;
        while multiplier * 2.0 <= limit {
            multiplier *= 2.0;
        }
        while multiplier > limit && multiplier > f64::MIN_POSITIVE {
            multiplier /= 2.0;
        }
        multiplier
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec::Vec;

    use approx::assert_relative_eq;
    use arcgraph_core::{Arc, ArcFilter, CustomGraph, Directedness, Graph, Node};
    use hashbrown::HashMap;

    use super::Preflow;

    fn capacities(table: &HashMap<Arc, f64>) -> impl Fn(Arc) -> f64 + '_ {
        move |arc| table[&arc]
    }

    #[test]
    fn matches_the_integer_answer_on_integral_input() {
        let mut graph = CustomGraph::new();
        let source = graph.add_node().unwrap();
        let a = graph.add_node().unwrap();
        let b = graph.add_node().unwrap();
        let sink = graph.add_node().unwrap();
        let mut table = HashMap::new();
        for (u, v, capacity) in [
            (source, a, 10.0),
            (source, b, 5.0),
            (a, sink, 7.0),
            (b, sink, 8.0),
            (b, a, 3.0),
        ] {
            table.insert(
                graph.add_arc(u, v, Directedness::Directed).unwrap(),
                capacity,
            );
        }

        let mut preflow = Preflow::new(&graph, source, sink, capacities(&table)).unwrap();
        preflow.run().unwrap();
        assert_relative_eq!(preflow.flow_size(), 12.0, max_relative = 1e-9);
        assert!(preflow.error_bound() < 1e-9);
    }

    #[test]
    fn fractional_capacities_come_out_within_the_error_bound() {
        let mut graph = CustomGraph::new();
        let source = graph.add_node().unwrap();
        let middle = graph.add_node().unwrap();
        let sink = graph.add_node().unwrap();
        let mut table = HashMap::new();
        table.insert(
            graph
                .add_arc(source, middle, Directedness::Directed)
                .unwrap(),
            0.3,
        );
        table.insert(
            graph
                .add_arc(middle, sink, Directedness::Directed)
                .unwrap(),
            0.2,
        );

        let mut preflow = Preflow::new(&graph, source, sink, capacities(&table)).unwrap();
        preflow.run().unwrap();
        assert!((preflow.flow_size() - 0.2).abs() <= preflow.error_bound());
    }

    #[test]
    fn conserves_flow_at_interior_nodes() {
        let mut graph = CustomGraph::new();
        let nodes: Vec<Node> = (0..5).map(|_| graph.add_node().unwrap()).collect();
        let mut table = HashMap::new();
        for (u, v, capacity) in [
            (0, 1, 2.5),
            (0, 2, 1.5),
            (1, 3, 2.0),
            (2, 3, 2.0),
            (1, 2, 0.5),
            (3, 4, 3.5),
        ] {
            table.insert(
                graph
                    .add_arc(nodes[u], nodes[v], Directedness::Directed)
                    .unwrap(),
                capacity,
            );
        }

        let mut preflow = Preflow::new(&graph, nodes[0], nodes[4], capacities(&table)).unwrap();
        preflow.run().unwrap();

        for &node in &nodes[1..4] {
            let mut balance = 0.0;
            for arc in graph.arcs_at(node, ArcFilter::All) {
                let flow = preflow.flow(arc);
                if graph.u(arc) == node {
                    balance -= flow;
                } else {
                    balance += flow;
                }
            }
            assert!(balance.abs() < 1e-9);
        }
        assert!((preflow.flow_size() - 3.5).abs() <= preflow.error_bound() + 1e-9);
    }

    #[test]
    fn unreachable_target_is_zero_flow() {
        let mut graph = CustomGraph::new();
        let source = graph.add_node().unwrap();
        let sink = graph.add_node().unwrap();
        let mut preflow = Preflow::new(&graph, source, sink, |_| 1.0).unwrap();
        preflow.run().unwrap();
        assert_eq!(preflow.flow_size(), 0.0);
        assert_eq!(preflow.error_bound(), 0.0);
    }
}
