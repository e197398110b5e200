use alloc::vec::Vec;
use core::fmt::{self, Display, Formatter};

use arcgraph_core::{Arc, ArcFilter, Graph, Node, PriorityQueue};
use error_stack::{Context, Report, Result};
use fxhash::FxBuildHasher;
use hashbrown::{HashMap, HashSet};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PreflowError {
    NodeNotFound,
    /// Source and target must be distinct.
    InvalidTerminals,
    /// A negative arc capacity was supplied.
    NegativeCapacity,
    /// The sum of the capacities leaving the source does not fit in a
    /// signed 64-bit integer, so exactness cannot be guaranteed.
    Overflow,
}

impl Display for PreflowError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::NodeNotFound => f.write_str("node not found"),
            Self::InvalidTerminals => f.write_str("source and target must be distinct"),
            Self::NegativeCapacity => f.write_str("arc capacity is negative"),
            Self::Overflow => f.write_str("source capacity sum overflows 64-bit arithmetic"),
        }
    }
}

impl Context for PreflowError {}

/// The Goldberg-Tarjan push-relabel maximum flow, exact over integer
/// capacities.
///
/// Labels are kept as negated heights: the source starts at `-N` and every
/// other node at `0`. A residual arc is admissible when its head has a
/// strictly greater label; a node with no admissible arc relabels to one
/// below the greatest label among its residual neighbors. Active nodes
/// (positive excess, neither source nor target) wait in the indexed
/// priority queue under the max-label rule.
///
/// An edge carries flow in `-capacity..=capacity`: it is usable in both
/// directions, and pushing against existing flow is always permitted.
pub struct IntegerPreflow<'graph, G: ?Sized, C> {
    graph: &'graph G,
    capacity: C,
    source: Node,
    target: Node,
    flow: HashMap<Arc, i64, FxBuildHasher>,
    excess: HashMap<Node, i64, FxBuildHasher>,
    label: HashMap<Node, i64, FxBuildHasher>,
}

impl<'graph, G: ?Sized, C> fmt::Debug for IntegerPreflow<'graph, G, C>
where
    G: fmt::Debug,
{
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("IntegerPreflow")
            .field("graph", &self.graph)
            .field("source", &self.source)
            .field("target", &self.target)
            .field("flow", &self.flow)
            .field("excess", &self.excess)
            .field("label", &self.label)
            .finish()
    }
}

impl<'graph, G, C> IntegerPreflow<'graph, G, C>
where
    G: Graph + ?Sized,
    C: Fn(Arc) -> i64,
{
    /// Validates capacities and the overflow precondition.
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
        let mut source_out: i128 = 0;
        for arc in graph.arcs(ArcFilter::All) {
            let arc_capacity = capacity(arc);
            if arc_capacity < 0 {
                return Err(Report::new(PreflowError::NegativeCapacity));
            }
            let (u, v) = graph.endpoints(arc);
            if u == source || (graph.is_edge(arc) && v == source) {
                source_out += i128::from(arc_capacity);
            }
        }
        if source_out > i128::from(i64::MAX) {
            return Err(Report::new(PreflowError::Overflow));
        }
        Ok(Self {
            graph,
            capacity,
            source,
            target,
            flow: HashMap::default(),
            excess: HashMap::default(),
            label: HashMap::default(),
        })
    }

    /// Computes the maximum flow.
    pub fn run(&mut self) {
        let node_count = self.graph.node_count() as i64;
        self.label.insert(self.source, -node_count);

        // priority is the negated label, so popping the minimum applies
        // the max-label rule
        let mut active: PriorityQueue<Node, i64> = PriorityQueue::new();

        let saturate = self
            .graph
            .arcs_at(self.source, ArcFilter::Forward)
            .collect::<Vec<_>>();
        for arc in saturate {
            let head = self.graph.other(arc, self.source);
            if head == self.source {
                continue;
            }
            let amount = self.residual(arc, self.source);
            if amount > 0 {
                self.push(arc, self.source, amount);
                self.activate(&mut active, head);
            }
        }

        while let Some((node, _)) = active.pop() {
            if self.excess_of(node) <= 0 {
                continue;
            }
            self.discharge(&mut active, node);
        }
    }

    /// The value of the computed flow: the net amount leaving the source.
    #[must_use]
    pub fn flow_size(&self) -> i64 {
        -self.excess_of(self.source)
    }

    /// The signed flow on `arc`; negative on an edge used against its
    /// stored orientation.
    #[must_use]
    pub fn flow(&self, arc: Arc) -> i64 {
        self.flow.get(&arc).copied().unwrap_or(0)
    }

    /// The source side of a minimum cut: the nodes reachable from the
    /// source in the residual graph.
    #[must_use]
    pub fn min_cut_source_side(&self) -> HashSet<Node, FxBuildHasher> {
        let mut side: HashSet<Node, FxBuildHasher> = HashSet::default();
        let mut stack = alloc::vec![self.source];
        side.insert(self.source);
        while let Some(node) = stack.pop() {
            for arc in self.graph.arcs_at(node, ArcFilter::All) {
                let head = self.graph.other(arc, node);
                if !side.contains(&head) && self.residual(arc, node) > 0 {
                    side.insert(head);
                    stack.push(head);
                }
            }
        }
        side
    }

    /// A minimum cut certifying the flow value: the saturated arcs
    /// crossing from the source side.
    #[must_use]
    pub fn min_cut(&self) -> Vec<Arc> {
        let side = self.min_cut_source_side();
        let mut cut = Vec::new();
        for arc in self.graph.arcs(ArcFilter::All) {
            let (u, v) = self.graph.endpoints(arc);
            let u_in = side.contains(&u);
            let v_in = side.contains(&v);
            if u_in == v_in {
                continue;
            }
            if u_in || self.graph.is_edge(arc) {
                cut.push(arc);
            }
        }
        cut
    }

    fn excess_of(&self, node: Node) -> i64 {
        self.excess.get(&node).copied().unwrap_or(0)
    }

    fn label_of(&self, node: Node) -> i64 {
        self.label.get(&node).copied().unwrap_or(0)
    }

    // Residual capacity of `arc` as seen from `from`: toward the head for
    // the stored orientation, against the flow otherwise. The lower flow
    // bound is 0 for a directed arc and -capacity for an edge.
    fn residual(&self, arc: Arc, from: Node) -> i64 {
        let arc_capacity = (self.capacity)(arc);
        let flow = self.flow(arc);
        if from == self.graph.u(arc) {
            arc_capacity - flow
        } else if self.graph.is_edge(arc) {
            arc_capacity + flow
        } else {
            flow
        }
    }

    fn push(&mut self, arc: Arc, from: Node, amount: i64) {
        let head = self.graph.other(arc, from);
        if from == self.graph.u(arc) {
            *self.flow.entry(arc).or_insert(0) += amount;
        } else {
            *self.flow.entry(arc).or_insert(0) -= amount;
        }
        *self.excess.entry(from).or_insert(0) -= amount;
        *self.excess.entry(head).or_insert(0) += amount;
    }

    fn activate(&self, queue: &mut PriorityQueue<Node, i64>, node: Node) {
        if node != self.source && node != self.target && self.excess_of(node) > 0 {
            queue.push(node, -self.label_of(node));
        }
    }

    // One discharge round: push the node's excess over admissible arcs;
    // if excess remains, relabel once and requeue.
    fn discharge(&mut self, queue: &mut PriorityQueue<Node, i64>, node: Node) {
        let label = self.label_of(node);
        let arcs = self.graph.arcs_at(node, ArcFilter::All).collect::<Vec<_>>();
        for arc in arcs {
            if self.excess_of(node) == 0 {
                break;
            }
            let head = self.graph.other(arc, node);
            if head == node || self.label_of(head) <= label {
                continue;
            }
            let room = self.residual(arc, node);
            if room <= 0 {
                continue;
            }
            let amount = room.min(self.excess_of(node));
            self.push(arc, node, amount);
            self.activate(queue, head);
        }
        if self.excess_of(node) > 0 {
            if let Some(next_label) = self.relabel_target(node) {
                self.label.insert(node, next_label);
                queue.push(node, -next_label);
            }
        }
    }

    // The relabel value: one below the greatest label among residual
    // neighbors.
    fn relabel_target(&self, node: Node) -> Option<i64> {
        let mut best: Option<i64> = None;
        for arc in self.graph.arcs_at(node, ArcFilter::All) {
            let head = self.graph.other(arc, node);
            if head == node || self.residual(arc, node) <= 0 {
                continue;
            }
            let candidate = self.label_of(head);
            best = Some(match best {
                Some(current) if current >= candidate => current,
                _ => candidate,
            });
        }
        best.map(|greatest| greatest - 1)
    }
}
