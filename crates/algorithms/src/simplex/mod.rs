//! A primal network simplex solver for minimum-cost circulations.
use alloc::{boxed::Box, vec::Vec};

use arcgraph_core::{
    Arc, ArcFilter, Directedness, Graph, GraphError, Node, Supergraph,
};
use error_stack::Result;
use fxhash::FxBuildHasher;
use hashbrown::{HashMap, HashSet};
use indexmap::IndexSet;

/// The execution state of a [`NetworkSimplex`] instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SimplexState {
    /// Minimizing the artificial flow to find a feasible circulation.
    FirstPhase,
    /// Feasible; minimizing the real objective.
    SecondPhase,
    /// A minimum-cost circulation has been found.
    Optimal,
    /// No circulation satisfies the bounds and supplies.
    Infeasible,
    /// The objective decreases without bound along an uncapped negative
    /// cycle.
    Unbounded,
}

impl SimplexState {
    #[must_use]
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Optimal | Self::Infeasible | Self::Unbounded)
    }
}

// Sentinels for unbounded arc flow.
const NEG_INF: i64 = i64::MIN;
const POS_INF: i64 = i64::MAX;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BoundState {
    /// Non-basic at its lower bound (or at zero when that bound is -∞).
    Empty,
    /// Non-basic at its upper bound.
    Saturated,
}

/// A primal network simplex solver for the minimum-cost circulation
/// problem: integer lower/upper bounds and node supplies, real arc costs.
///
/// Every arc is treated as oriented `u -> v`; an undirected edge
/// participates through its stored orientation and models two-way use with
/// a negative lower bound. `i64::MIN` and `i64::MAX` stand for unbounded
/// flow.
///
/// The solver works on an auxiliary graph: an artificial node joined to
/// every real node by one artificial arc whose direction absorbs the
/// node's initial imbalance. Phase one minimizes the artificial flow under
/// surrogate costs (1 on artificial arcs); leftover artificial flow means
/// the instance is infeasible. Phase two pins the artificial arcs to zero
/// capacity and minimizes the real objective. Node potentials keep the
/// reduced cost zero on every basic (tree) arc; the entering arc is chosen
/// by a round-robin scan, the leaving arc is the first flow-limiting arc
/// of the basic cycle.
pub struct NetworkSimplex<'graph, G: ?Sized + Graph> {
    graph: &'graph G,
    aux: Supergraph<&'graph G>,
    root: Node,
    lower: Box<dyn Fn(Arc) -> i64 + 'graph>,
    upper: Box<dyn Fn(Arc) -> i64 + 'graph>,
    cost: Box<dyn Fn(Arc) -> f64 + 'graph>,
    artificial: IndexSet<Arc, FxBuildHasher>,
    flow: HashMap<Arc, i64, FxBuildHasher>,
    potential: HashMap<Node, f64, FxBuildHasher>,
    tree: HashSet<Arc, FxBuildHasher>,
    bound_state: HashMap<Arc, BoundState, FxBuildHasher>,
    scan: Vec<Arc>,
    cursor: usize,
    epsilon: f64,
    state: SimplexState,
}

impl<'graph, G> NetworkSimplex<'graph, G>
where
    G: Graph + ?Sized,
{
    /// Sets up the auxiliary graph and the initial (artificial) basis.
    ///
    /// `lower`/`upper` give per-arc flow bounds (`i64::MIN`/`i64::MAX` for
    /// unbounded), `cost` the per-arc cost, `supply` the per-node supply
    /// (positive) or demand (negative).
    pub fn new<L, U, C, S>(
        graph: &'graph G,
        lower: L,
        upper: U,
        cost: C,
        supply: S,
    ) -> Result<Self, GraphError>
    where
        L: Fn(Arc) -> i64 + 'graph,
        U: Fn(Arc) -> i64 + 'graph,
        C: Fn(Arc) -> f64 + 'graph,
        S: Fn(Node) -> i64 + 'graph,
    {
        let mut aux = Supergraph::new(graph);
        let root = aux.add_node()?;

        // every non-basic arc starts at a bound: the lower one when it is
        // finite, else the upper one when that is the only finite bound
        // below zero, else zero (free arcs)
        let mut flow: HashMap<Arc, i64, FxBuildHasher> = HashMap::default();
        let mut excess: HashMap<Node, i64, FxBuildHasher> = HashMap::default();
        let mut bound_state: HashMap<Arc, BoundState, FxBuildHasher> = HashMap::default();
        let mut smallest_cost = f64::INFINITY;

        let arcs = graph.arcs(ArcFilter::All).collect::<Vec<_>>();
        for &arc in &arcs {
            let low = lower(arc);
            let high = upper(arc);
            let base = if low != NEG_INF {
                low
            } else if high != POS_INF && high < 0 {
                high
            } else {
                0
            };
            flow.insert(arc, base);
            bound_state.insert(
                arc,
                if high != POS_INF && base == high {
                    BoundState::Saturated
                } else {
                    BoundState::Empty
                },
            );
            let (u, v) = graph.endpoints(arc);
            *excess.entry(u).or_insert(0) -= base;
            *excess.entry(v).or_insert(0) += base;

            let magnitude = cost(arc).abs();
            if magnitude > 0.0 && magnitude < smallest_cost {
                smallest_cost = magnitude;
            }
        }

        let mut artificial: IndexSet<Arc, FxBuildHasher> = IndexSet::default();
        let mut tree: HashSet<Arc, FxBuildHasher> = HashSet::default();
        let nodes = graph.nodes().collect::<Vec<_>>();
        for &node in &nodes {
            let imbalance = supply(node) + excess.get(&node).copied().unwrap_or(0);
            let arc = if imbalance > 0 {
                aux.add_arc(node, root, Directedness::Directed)?
            } else {
                aux.add_arc(root, node, Directedness::Directed)?
            };
            flow.insert(arc, imbalance.abs());
            artificial.insert(arc);
            tree.insert(arc);
        }

        let scan = aux.arcs(ArcFilter::All).collect::<Vec<_>>();
        let epsilon = 1e-12
            * if smallest_cost.is_finite() {
                smallest_cost
            } else {
                1.0
            };

        let mut simplex = Self {
            graph,
            aux,
            root,
            lower: Box::new(lower),
            upper: Box::new(upper),
            cost: Box::new(cost),
            artificial,
            flow,
            potential: HashMap::default(),
            tree,
            bound_state,
            scan,
            cursor: 0,
            epsilon,
            state: SimplexState::FirstPhase,
        };
        simplex.recompute_potentials();
        Ok(simplex)
    }

    #[must_use]
    pub fn state(&self) -> SimplexState {
        self.state
    }

    /// The current flow on a real arc.
    #[must_use]
    pub fn flow(&self, arc: Arc) -> i64 {
        self.flow.get(&arc).copied().unwrap_or(0)
    }

    /// The current potential of a real node.
    #[must_use]
    pub fn potential(&self, node: Node) -> f64 {
        self.potential.get(&node).copied().unwrap_or(0.0)
    }

    /// The real objective value of the current flow.
    #[must_use]
    pub fn total_cost(&self) -> f64 {
        self.graph
            .arcs(ArcFilter::All)
            .map(|arc| self.flow(arc) as f64 * (self.cost)(arc))
            .sum()
    }

    /// Performs one pivot (or phase transition) and returns the state
    /// afterwards.
    pub fn step(&mut self) -> SimplexState {
        if self.state.is_terminal() {
            return self.state;
        }
        match self.find_entering() {
            Some((arc, increase)) => self.pivot(arc, increase),
            None => self.finish_phase(),
        }
        self.state
    }

    /// Runs pivots until a terminal state is reached.
    pub fn run(&mut self) -> SimplexState {
        while !self.state.is_terminal() {
            self.step();
        }
        self.state
    }

    fn is_artificial(&self, arc: Arc) -> bool {
        self.artificial.contains(&arc)
    }

    fn lower_of(&self, arc: Arc) -> i64 {
        if self.is_artificial(arc) {
            0
        } else {
            (self.lower)(arc)
        }
    }

    fn upper_of(&self, arc: Arc) -> i64 {
        if self.is_artificial(arc) {
            // pinned once feasibility is established
            if self.state == SimplexState::FirstPhase {
                POS_INF
            } else {
                0
            }
        } else {
            (self.upper)(arc)
        }
    }

    fn cost_of(&self, arc: Arc) -> f64 {
        match (self.state, self.is_artificial(arc)) {
            (SimplexState::FirstPhase, true) => 1.0,
            (SimplexState::FirstPhase, false) => 0.0,
            (_, true) => 0.0,
            (_, false) => (self.cost)(arc),
        }
    }

    fn reduced_cost(&self, arc: Arc) -> f64 {
        let (u, v) = self.aux.endpoints(arc);
        self.cost_of(arc) - (self.potential(v) - self.potential(u))
    }

    // Round-robin scan for the first non-basic arc with an improving
    // reduced cost. `true` means the flow wants to increase.
    fn find_entering(&mut self) -> Option<(Arc, bool)> {
        let total = self.scan.len();
        for offset in 0..total {
            let index = (self.cursor + offset) % total;
            let arc = self.scan[index];
            if self.tree.contains(&arc) {
                continue;
            }
            if self.state == SimplexState::SecondPhase && self.is_artificial(arc) {
                continue;
            }
            let reduced = self.reduced_cost(arc);
            let improving = match self.bound_state.get(&arc) {
                Some(BoundState::Empty) => {
                    if reduced < -self.epsilon {
                        Some(true)
                    } else if self.lower_of(arc) == NEG_INF && reduced > self.epsilon {
                        Some(false)
                    } else {
                        None
                    }
                }
                Some(BoundState::Saturated) => (reduced > self.epsilon).then_some(false),
                None => None,
            };
            if let Some(increase) = improving {
                self.cursor = (index + 1) % total;
                return Some((arc, increase));
            }
        }
        None
    }

    fn finish_phase(&mut self) {
        match self.state {
            SimplexState::FirstPhase => {
                let leftover = self
                    .artificial
                    .iter()
                    .any(|arc| self.flow.get(arc).copied().unwrap_or(0) > 0);
                if leftover {
                    self.state = SimplexState::Infeasible;
                } else {
                    self.state = SimplexState::SecondPhase;
                    self.cursor = 0;
                    self.recompute_potentials();
                }
            }
            SimplexState::SecondPhase => {
                self.state = SimplexState::Optimal;
            }
            _ => {}
        }
    }

    // One simplex pivot around the basic cycle closed by `entering`.
    fn pivot(&mut self, entering: Arc, increase: bool) {
        let (eu, ev) = self.aux.endpoints(entering);
        // the cycle pushes from `tail` to `head` through the entering arc
        // and returns through the tree
        let (tail, head) = if increase { (eu, ev) } else { (ev, eu) };

        let entering_margin = if increase {
            Self::margin(self.upper_of(entering), self.flow(entering))
        } else {
            Self::margin(self.flow(entering), self.lower_of(entering))
        };

        let path = self.tree_path(head, tail);
        let mut delta = entering_margin;
        let mut leaving: Option<(Arc, bool)> = None;
        for &(arc, forward) in &path {
            let margin = if forward {
                Self::margin(self.upper_of(arc), self.flow(arc))
            } else {
                Self::margin(self.flow(arc), self.lower_of(arc))
            };
            if let Some(margin) = margin {
                if delta.map_or(true, |current| margin < current) {
                    delta = Some(margin);
                    leaving = Some((arc, forward));
                }
            }
        }

        let Some(delta) = delta else {
            self.state = SimplexState::Unbounded;
            return;
        };

        // apply the flow change around the cycle
        let signed = if increase { delta } else { -delta };
        *self.flow.entry(entering).or_insert(0) += signed;
        for &(arc, forward) in &path {
            let change = if forward { delta } else { -delta };
            *self.flow.entry(arc).or_insert(0) += change;
        }

        match leaving {
            None => {
                // the entering arc itself hit its opposite bound
                self.bound_state.insert(
                    entering,
                    if increase {
                        BoundState::Saturated
                    } else {
                        BoundState::Empty
                    },
                );
            }
            Some((leaving_arc, leaving_forward)) => {
                let reduced = self.reduced_cost(entering);
                let far = self.far_side(leaving_arc);
                let shift = if far.contains(&ev) { reduced } else { -reduced };
                for node in &far {
                    *self.potential.entry(*node).or_insert(0.0) += shift;
                }

                self.tree.remove(&leaving_arc);
                self.tree.insert(entering);
                self.bound_state.remove(&entering);
                self.bound_state.insert(
                    leaving_arc,
                    if leaving_forward {
                        BoundState::Saturated
                    } else {
                        BoundState::Empty
                    },
                );
            }
        }
    }

    // Remaining room between a flow value and its bound; `None` when the
    // bound is infinite.
    fn margin(high: i64, low: i64) -> Option<i64> {
        if high == POS_INF || low == NEG_INF {
            None
        } else {
            Some(high - low)
        }
    }

    // Tree adjacency, rebuilt per use; the basic tree is small enough that
    // this keeps the pivot logic simple.
    fn tree_adjacency(&self) -> HashMap<Node, Vec<Arc>, FxBuildHasher> {
        let mut adjacency: HashMap<Node, Vec<Arc>, FxBuildHasher> = HashMap::default();
        for &arc in &self.tree {
            let (u, v) = self.aux.endpoints(arc);
            adjacency.entry(u).or_default().push(arc);
            if v != u {
                adjacency.entry(v).or_default().push(arc);
            }
        }
        adjacency
    }

    // The unique tree path from `from` to `to`, as (arc, walks-with-the-
    // arc-orientation) pairs.
    fn tree_path(&self, from: Node, to: Node) -> Vec<(Arc, bool)> {
        let adjacency = self.tree_adjacency();
        let mut parent: HashMap<Node, (Node, Arc), FxBuildHasher> = HashMap::default();
        let mut stack = alloc::vec![from];
        let mut seen: HashSet<Node, FxBuildHasher> = HashSet::default();
        seen.insert(from);
        while let Some(node) = stack.pop() {
            if node == to {
                break;
            }
            let Some(arcs) = adjacency.get(&node) else {
                continue;
            };
            for &arc in arcs {
                let next = self.aux.other(arc, node);
                if seen.insert(next) {
                    parent.insert(next, (node, arc));
                    stack.push(next);
                }
            }
        }

        let mut path = Vec::new();
        let mut node = to;
        while node != from {
            let Some(&(previous, arc)) = parent.get(&node) else {
                break;
            };
            // the walk from `from` runs previous -> node; record arcs in
            // walk order from -> .. -> to, flipped below
            path.push((arc, self.aux.u(arc) == previous));
            node = previous;
        }
        path.reverse();
        path
    }

    // The nodes cut off from the root when `removed` leaves the tree.
    fn far_side(&self, removed: Arc) -> Vec<Node> {
        let adjacency = self.tree_adjacency();
        let mut near: HashSet<Node, FxBuildHasher> = HashSet::default();
        let mut stack = alloc::vec![self.root];
        near.insert(self.root);
        while let Some(node) = stack.pop() {
            let Some(arcs) = adjacency.get(&node) else {
                continue;
            };
            for &arc in arcs {
                if arc == removed {
                    continue;
                }
                let next = self.aux.other(arc, node);
                if near.insert(next) {
                    stack.push(next);
                }
            }
        }
        self.aux
            .nodes()
            .filter(|node| !near.contains(node))
            .collect()
    }

    // Potentials satisfying zero reduced cost on every tree arc, anchored
    // at the artificial root.
    fn recompute_potentials(&mut self) {
        let adjacency = self.tree_adjacency();
        self.potential.clear();
        self.potential.insert(self.root, 0.0);
        let mut stack = alloc::vec![self.root];
        let mut seen: HashSet<Node, FxBuildHasher> = HashSet::default();
        seen.insert(self.root);
        while let Some(node) = stack.pop() {
            let Some(arcs) = adjacency.get(&node) else {
                continue;
            };
            for &arc in arcs {
                let next = self.aux.other(arc, node);
                if !seen.insert(next) {
                    continue;
                }
                let here = self.potential[&node];
                let value = if self.aux.u(arc) == node {
                    here + self.cost_of(arc)
                } else {
                    here - self.cost_of(arc)
                };
                self.potential.insert(next, value);
                stack.push(next);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec::Vec;

    use approx::assert_relative_eq;
    use arcgraph_core::{Arc, ArcFilter, CustomGraph, Directedness, Graph, Node};
    use hashbrown::HashMap;

    use super::{NetworkSimplex, SimplexState};

    struct Instance {
        graph: CustomGraph,
        nodes: Vec<Node>,
        lower: HashMap<Arc, i64>,
        upper: HashMap<Arc, i64>,
        cost: HashMap<Arc, f64>,
        supply: HashMap<Node, i64>,
    }

    impl Instance {
        fn new(node_count: usize) -> Self {
            let mut graph = CustomGraph::new();
            let nodes = (0..node_count)
                .map(|_| graph.add_node().unwrap())
                .collect();
            Self {
                graph,
                nodes,
                lower: HashMap::new(),
                upper: HashMap::new(),
                cost: HashMap::new(),
                supply: HashMap::new(),
            }
        }

        fn arc(&mut self, u: usize, v: usize, lower: i64, upper: i64, cost: f64) -> Arc {
            let arc = self
                .graph
                .add_arc(self.nodes[u], self.nodes[v], Directedness::Directed)
                .unwrap();
            self.lower.insert(arc, lower);
            self.upper.insert(arc, upper);
            self.cost.insert(arc, cost);
            arc
        }

        fn supply(&mut self, node: usize, amount: i64) {
            self.supply.insert(self.nodes[node], amount);
        }

        fn solve(&self) -> NetworkSimplex<'_, CustomGraph> {
            let mut simplex = NetworkSimplex::new(
                &self.graph,
                |arc| self.lower[&arc],
                |arc| self.upper[&arc],
                |arc| self.cost[&arc],
                |node| self.supply.get(&node).copied().unwrap_or(0),
            )
            .unwrap();
            simplex.run();
            simplex
        }

        fn assert_balanced(&self, simplex: &NetworkSimplex<'_, CustomGraph>) {
            for &node in &self.nodes {
                let mut balance = self.supply.get(&node).copied().unwrap_or(0);
                for arc in self.graph.arcs_at(node, ArcFilter::All) {
                    let flow = simplex.flow(arc);
                    if self.graph.u(arc) == node {
                        balance -= flow;
                    } else {
                        balance += flow;
                    }
                }
                assert_eq!(balance, 0, "imbalance at {node}");
            }
        }
    }

    /// Supplies (+2, 0, -2) on a triangle with unit costs and capacity 2:
    /// the direct u -> w arc wins at cost 2.
    #[test]
    fn triangle_with_direct_arc() {
        let mut instance = Instance::new(3);
        instance.arc(0, 1, 0, 2, 1.0);
        instance.arc(1, 2, 0, 2, 1.0);
        instance.arc(0, 2, 0, 2, 1.0);
        instance.supply(0, 2);
        instance.supply(2, -2);

        let simplex = instance.solve();
        assert_eq!(simplex.state(), SimplexState::Optimal);
        instance.assert_balanced(&simplex);
        assert_relative_eq!(simplex.total_cost(), 2.0);
    }

    /// Without the direct arc the flow detours over v at cost 4.
    #[test]
    fn triangle_without_direct_arc() {
        let mut instance = Instance::new(3);
        let uv = instance.arc(0, 1, 0, 2, 1.0);
        let vw = instance.arc(1, 2, 0, 2, 1.0);
        instance.supply(0, 2);
        instance.supply(2, -2);

        let simplex = instance.solve();
        assert_eq!(simplex.state(), SimplexState::Optimal);
        instance.assert_balanced(&simplex);
        assert_eq!(simplex.flow(uv), 2);
        assert_eq!(simplex.flow(vw), 2);
        assert_relative_eq!(simplex.total_cost(), 4.0);
    }

    #[test]
    fn chooses_the_cheaper_route() {
        let mut instance = Instance::new(4);
        let cheap_a = instance.arc(0, 1, 0, 10, 1.0);
        let cheap_b = instance.arc(1, 3, 0, 10, 1.0);
        let expensive = instance.arc(0, 3, 0, 10, 5.0);
        let _unused = instance.arc(2, 3, 0, 10, 1.0);
        instance.supply(0, 4);
        instance.supply(3, -4);

        let simplex = instance.solve();
        assert_eq!(simplex.state(), SimplexState::Optimal);
        instance.assert_balanced(&simplex);
        assert_eq!(simplex.flow(cheap_a), 4);
        assert_eq!(simplex.flow(cheap_b), 4);
        assert_eq!(simplex.flow(expensive), 0);
        assert_relative_eq!(simplex.total_cost(), 8.0);
    }

    #[test]
    fn capacity_forces_a_split() {
        let mut instance = Instance::new(3);
        let cheap = instance.arc(0, 2, 0, 3, 1.0);
        let via = instance.arc(0, 1, 0, 10, 2.0);
        let out = instance.arc(1, 2, 0, 10, 2.0);
        instance.supply(0, 5);
        instance.supply(2, -5);

        let simplex = instance.solve();
        assert_eq!(simplex.state(), SimplexState::Optimal);
        instance.assert_balanced(&simplex);
        assert_eq!(simplex.flow(cheap), 3);
        assert_eq!(simplex.flow(via), 2);
        assert_eq!(simplex.flow(out), 2);
        assert_relative_eq!(simplex.total_cost(), 11.0);
    }

    #[test]
    fn lower_bounds_force_flow() {
        // a single expensive arc with lower bound 1 must carry flow even
        // though a zero circulation would be cheaper
        let mut instance = Instance::new(2);
        let forced = instance.arc(0, 1, 1, 5, 3.0);
        let back = instance.arc(1, 0, 0, 5, 1.0);

        let simplex = instance.solve();
        assert_eq!(simplex.state(), SimplexState::Optimal);
        instance.assert_balanced(&simplex);
        assert_eq!(simplex.flow(forced), 1);
        assert_eq!(simplex.flow(back), 1);
        assert_relative_eq!(simplex.total_cost(), 4.0);
    }

    #[test]
    fn infeasible_supplies_are_reported() {
        let mut instance = Instance::new(2);
        instance.arc(0, 1, 0, 1, 1.0);
        instance.supply(0, 5);
        instance.supply(1, -5);

        let simplex = instance.solve();
        assert_eq!(simplex.state(), SimplexState::Infeasible);
    }

    #[test]
    fn unbalanced_supplies_are_infeasible() {
        let mut instance = Instance::new(2);
        instance.arc(0, 1, 0, 10, 1.0);
        instance.supply(0, 3);

        let simplex = instance.solve();
        assert_eq!(simplex.state(), SimplexState::Infeasible);
    }

    #[test]
    fn negative_uncapped_cycles_are_unbounded() {
        let mut instance = Instance::new(2);
        instance.arc(0, 1, 0, i64::MAX, -2.0);
        instance.arc(1, 0, 0, i64::MAX, 1.0);

        let simplex = instance.solve();
        assert_eq!(simplex.state(), SimplexState::Unbounded);
    }

    #[test]
    fn optimality_certificate_holds() {
        // at optimum no arc may sit off its correct bound with a nonzero
        // reduced cost
        let mut instance = Instance::new(4);
        for (u, v, upper, cost) in [
            (0, 1, 4, 2.0),
            (0, 2, 2, 5.0),
            (1, 2, 3, 1.0),
            (1, 3, 2, 6.0),
            (2, 3, 4, 1.0),
        ] {
            instance.arc(u, v, 0, upper, cost);
        }
        instance.supply(0, 3);
        instance.supply(3, -3);

        let simplex = instance.solve();
        assert_eq!(simplex.state(), SimplexState::Optimal);
        instance.assert_balanced(&simplex);

        for arc in instance.graph.arcs(ArcFilter::All) {
            let (u, v) = instance.graph.endpoints(arc);
            let reduced = instance.cost[&arc]
                - (simplex.potential(v) - simplex.potential(u));
            let flow = simplex.flow(arc);
            if reduced > 1e-9 {
                assert_eq!(flow, instance.lower[&arc], "positive reduced cost off lower bound");
            } else if reduced < -1e-9 {
                assert_eq!(flow, instance.upper[&arc], "negative reduced cost off upper bound");
            }
        }
    }

    #[test]
    fn zero_supplies_yield_the_zero_circulation() {
        let mut instance = Instance::new(3);
        let a = instance.arc(0, 1, 0, 5, 1.0);
        let b = instance.arc(1, 2, 0, 5, 1.0);

        let simplex = instance.solve();
        assert_eq!(simplex.state(), SimplexState::Optimal);
        assert_eq!(simplex.flow(a), 0);
        assert_eq!(simplex.flow(b), 0);
        assert_relative_eq!(simplex.total_cost(), 0.0);
    }

    #[test]
    fn edges_flow_against_their_stored_orientation() {
        // one unit must travel u -> w over an edge stored w -> u; the
        // negative lower bound makes that a flow of -1
        let mut graph = CustomGraph::new();
        let u = graph.add_node().unwrap();
        let w = graph.add_node().unwrap();
        let edge = graph.add_arc(w, u, Directedness::Edge).unwrap();

        let mut simplex = NetworkSimplex::new(
            &graph,
            |_| -3,
            |_| 3,
            |_| 1.0,
            move |node| if node == u { 1 } else { -1 },
        )
        .unwrap();

        assert_eq!(simplex.run(), SimplexState::Optimal);
        assert_eq!(simplex.flow(edge), -1);
        // the objective is linear in the signed flow
        assert_relative_eq!(simplex.total_cost(), -1.0);
    }

    #[test]
    fn negative_cost_capped_cycles_saturate() {
        let mut instance = Instance::new(2);
        let forward = instance.arc(0, 1, 0, 4, -3.0);
        let back = instance.arc(1, 0, 0, 4, 1.0);

        let simplex = instance.solve();
        assert_eq!(simplex.state(), SimplexState::Optimal);
        instance.assert_balanced(&simplex);
        assert_eq!(simplex.flow(forward), 4);
        assert_eq!(simplex.flow(back), 4);
        assert_relative_eq!(simplex.total_cost(), -8.0);
    }
}
