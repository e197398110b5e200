use core::fmt::{self, Display, Formatter};

use arcgraph_core::{Arc, ArcFilter, Directedness, Graph, Matching, Node, Supergraph};
use error_stack::{Context, Report, Result, ResultExt};
use fxhash::FxBuildHasher;
use hashbrown::HashMap;

use crate::simplex::{NetworkSimplex, SimplexState};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MinCostMatchingError {
    /// `min_size` exceeds `max_size`.
    InvalidSizes,
    /// Building the auxiliary flow network failed.
    Construction,
}

impl Display for MinCostMatchingError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidSizes => f.write_str("minimum size exceeds maximum size"),
            Self::Construction => f.write_str("auxiliary network construction failed"),
        }
    }
}

impl Context for MinCostMatchingError {}

/// Minimum-cost bipartite matching of a size within `min_size..=max_size`,
/// by reduction to a minimum-cost circulation.
///
/// The flow network adds a super source feeding every red node, a super
/// sink drained by every blue node, and a reflow arc from sink to source
/// whose bounds carry the size window. Unit capacities keep the original
/// arcs vertex-disjoint, so the arcs carrying flow at the optimum are the
/// matching. Arcs joining two nodes of the same class are ignored.
pub struct BipartiteMinimumCostMatching<'graph, G: ?Sized, P, C> {
    graph: &'graph G,
    is_red: P,
    cost: C,
    min_size: usize,
    max_size: usize,
    matching: Option<Matching<&'graph G>>,
    total_cost: f64,
}

impl<'graph, G, P, C> BipartiteMinimumCostMatching<'graph, G, P, C>
where
    G: Graph + ?Sized,
    P: Fn(Node) -> bool,
    C: Fn(Arc) -> f64,
{
    pub fn new(graph: &'graph G, is_red: P, cost: C, min_size: usize, max_size: usize) -> Self {
        Self {
            graph,
            is_red,
            cost,
            min_size,
            max_size,
            matching: None,
            total_cost: 0.0,
        }
    }

    /// Solves the circulation. Returns whether a matching within the size
    /// window exists; on success [`matching`](Self::matching) holds it.
    pub fn run(&mut self) -> Result<bool, MinCostMatchingError> {
        if self.min_size > self.max_size {
            return Err(Report::new(MinCostMatchingError::InvalidSizes));
        }

        let mut network = Supergraph::new(self.graph);
        let source = network
            .add_node()
            .change_context(MinCostMatchingError::Construction)?;
        let sink = network
            .add_node()
            .change_context(MinCostMatchingError::Construction)?;

        // (lower, upper, cost) per auxiliary arc; anything absent is
        // pinned to zero flow
        let mut bounds: HashMap<Arc, (i64, i64, f64), FxBuildHasher> = HashMap::default();

        for arc in self.graph.arcs(ArcFilter::All) {
            let (u, v) = self.graph.endpoints(arc);
            if u == v || (self.is_red)(u) == (self.is_red)(v) {
                continue;
            }
            let cost = (self.cost)(arc);
            if (self.is_red)(u) {
                bounds.insert(arc, (0, 1, cost));
            } else {
                // stored blue -> red: a unit of matching is a unit of
                // negative flow
                bounds.insert(arc, (-1, 0, -cost));
            }
        }

        let nodes = self.graph.nodes().collect::<alloc::vec::Vec<_>>();
        for node in nodes {
            let terminal = if (self.is_red)(node) {
                network
                    .add_arc(source, node, Directedness::Directed)
                    .change_context(MinCostMatchingError::Construction)?
            } else {
                network
                    .add_arc(node, sink, Directedness::Directed)
                    .change_context(MinCostMatchingError::Construction)?
            };
            bounds.insert(terminal, (0, 1, 0.0));
        }

        let reflow = network
            .add_arc(sink, source, Directedness::Directed)
            .change_context(MinCostMatchingError::Construction)?;
        bounds.insert(reflow, (self.min_size as i64, self.max_size as i64, 0.0));

        let mut simplex = NetworkSimplex::new(
            &network,
            |arc| bounds.get(&arc).map_or(0, |&(lower, _, _)| lower),
            |arc| bounds.get(&arc).map_or(0, |&(_, upper, _)| upper),
            |arc| bounds.get(&arc).map_or(0.0, |&(_, _, cost)| cost),
            |_| 0,
        )
        .change_context(MinCostMatchingError::Construction)?;

        if simplex.run() != SimplexState::Optimal {
            self.matching = None;
            self.total_cost = 0.0;
            return Ok(false);
        }

        let mut matching = Matching::new(self.graph);
        let mut total = 0.0;
        for arc in self.graph.arcs(ArcFilter::All) {
            if simplex.flow(arc) != 0 {
                // unit caps and distinct endpoints keep this valid
                let _ = matching.enable(arc, true);
                total += (self.cost)(arc);
            }
        }
        self.matching = Some(matching);
        self.total_cost = total;
        Ok(true)
    }

    /// The optimal matching, once [`run`](Self::run) succeeded.
    #[must_use]
    pub fn matching(&self) -> Option<&Matching<&'graph G>> {
        self.matching.as_ref()
    }

    /// The cost of the optimal matching.
    #[must_use]
    pub fn total_cost(&self) -> f64 {
        self.total_cost
    }
}
