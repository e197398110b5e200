use alloc::vec::Vec;
use core::fmt::{self, Display, Formatter};

use arcgraph_core::{Arc, ArcFilter, Graph, Matching, Node};
use error_stack::{Context, Report, Result};
use fxhash::FxBuildHasher;
use hashbrown::{HashMap, HashSet};
use indexmap::IndexSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BipartiteMatchingError {
    ArcNotFound,
    /// The arc does not join a red node to a blue node.
    NotBichromatic,
    /// An endpoint is already matched.
    EndpointMatched,
}

impl Display for BipartiteMatchingError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::ArcNotFound => f.write_str("arc not found"),
            Self::NotBichromatic => f.write_str("arc endpoints are on the same side"),
            Self::EndpointMatched => f.write_str("endpoint is already matched"),
        }
    }
}

impl Context for BipartiteMatchingError {}

/// Maximum-cardinality matching in a bipartite graph, by alternating-path
/// augmentation.
///
/// The node classes come from the `is_red` predicate; arcs joining two
/// nodes of the same class are ignored. For every unmatched red node an
/// alternating search walks non-matching arcs red to blue and matching
/// arcs blue to red; reaching an unmatched blue node flips the arcs along
/// the walk and grows the matching by one.
///
/// A partial matching may be seeded through [`add`](Self::add) or grown
/// cheaply with [`greedy_grow`](Self::greedy_grow) before
/// [`run`](Self::run) settles the rest.
pub struct BipartiteMaximumMatching<'graph, G: ?Sized, P> {
    graph: &'graph G,
    is_red: P,
    matching: Matching<&'graph G>,
    unmatched_red: IndexSet<Node, FxBuildHasher>,
}

impl<'graph, G, P> BipartiteMaximumMatching<'graph, G, P>
where
    G: Graph + ?Sized,
    P: Fn(Node) -> bool,
{
    pub fn new(graph: &'graph G, is_red: P) -> Self {
        let unmatched_red = graph.nodes().filter(|&node| is_red(node)).collect();
        Self {
            graph,
            is_red,
            matching: Matching::new(graph),
            unmatched_red,
        }
    }

    /// The matching built so far.
    #[must_use]
    pub fn matching(&self) -> &Matching<&'graph G> {
        &self.matching
    }

    #[must_use]
    pub fn size(&self) -> usize {
        self.matching.size()
    }

    /// Seeds the matching with `arc`, which must join an unmatched red
    /// node to an unmatched blue node.
    pub fn add(&mut self, arc: Arc) -> Result<(), BipartiteMatchingError> {
        if !self.graph.has_arc(arc) {
            return Err(Report::new(BipartiteMatchingError::ArcNotFound));
        }
        let (u, v) = self.graph.endpoints(arc);
        if (self.is_red)(u) == (self.is_red)(v) {
            return Err(Report::new(BipartiteMatchingError::NotBichromatic));
        }
        if self.matching.is_matched(u) || self.matching.is_matched(v) {
            return Err(Report::new(BipartiteMatchingError::EndpointMatched));
        }
        // the precondition check keeps this from failing
        let _ = self.matching.enable(arc, true);
        let red = if (self.is_red)(u) { u } else { v };
        self.unmatched_red.swap_remove(&red);
        Ok(())
    }

    /// Greedily matches easy pairs: each unmatched red node takes its
    /// first arc to an unmatched blue neighbor, without any augmentation.
    pub fn greedy_grow(&mut self) {
        let reds = self.unmatched_red.iter().copied().collect::<Vec<_>>();
        for red in reds {
            for arc in self.graph.arcs_at(red, ArcFilter::All) {
                let blue = self.graph.other(arc, red);
                if blue == red
                    || (self.is_red)(blue)
                    || self.matching.is_matched(blue)
                {
                    continue;
                }
                if self.matching.enable(arc, true).is_ok() {
                    self.unmatched_red.swap_remove(&red);
                    break;
                }
            }
        }
    }

    /// Augments until the matching is maximum.
    pub fn run(&mut self) {
        let reds = self.unmatched_red.iter().copied().collect::<Vec<_>>();
        for red in reds {
            if self.try_augment(red) {
                self.unmatched_red.swap_remove(&red);
            }
        }
    }

    // One alternating DFS from an unmatched red node; flips the walk on
    // success.
    fn try_augment(&mut self, origin: Node) -> bool {
        // blue node -> (red predecessor, non-matching arc used)
        let mut reached_through: HashMap<Node, (Node, Arc), FxBuildHasher> = HashMap::default();
        let mut visited_blue: HashSet<Node, FxBuildHasher> = HashSet::default();
        let mut stack = alloc::vec![origin];

        while let Some(red) = stack.pop() {
            for arc in self.graph.arcs_at(red, ArcFilter::All) {
                let blue = self.graph.other(arc, red);
                if blue == red || (self.is_red)(blue) || !visited_blue.insert(blue) {
                    continue;
                }
                reached_through.insert(blue, (red, arc));
                let partner_arc = self.matching.matched_arc(blue);
                if partner_arc.is_invalid() {
                    self.flip(blue, &reached_through);
                    return true;
                }
                stack.push(self.graph.other(partner_arc, blue));
            }
        }
        false
    }

    // Walk the predecessor chain from the free blue endpoint back to the
    // origin, exchanging matching and non-matching arcs.
    fn flip(&mut self, last_blue: Node, reached_through: &HashMap<Node, (Node, Arc), FxBuildHasher>) {
        let mut blue = last_blue;
        loop {
            let &(red, arc) = &reached_through[&blue];
            let previous = self.matching.matched_arc(red);
            if previous.is_valid() {
                let _ = self.matching.enable(previous, false);
            }
            // both endpoints are free at this point
            let _ = self.matching.enable(arc, true);
            if previous.is_invalid() {
                break;
            }
            blue = self.graph.other(previous, red);
        }
    }
}
