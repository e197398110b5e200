use arcgraph_core::{Arc, ArcFilter, Graph, Node, PriorityQueue};
use fxhash::FxBuildHasher;
use hashbrown::{HashMap, HashSet};
use indexmap::IndexSet;

/// Prim's minimum-cost spanning forest.
///
/// Each connected component is grown from its first node in enumeration
/// order, so disconnected graphs yield one tree per component. The
/// frontier sits in the indexed priority queue keyed by the cheapest
/// crossing-arc cost; ties resolve by insertion order. Arc orientation is
/// ignored.
pub struct Prim<'graph, G: ?Sized> {
    graph: &'graph G,
    forest: IndexSet<Arc, FxBuildHasher>,
}

impl<'graph, G> Prim<'graph, G>
where
    G: Graph + ?Sized,
{
    pub fn new(graph: &'graph G) -> Self {
        Self {
            graph,
            forest: IndexSet::default(),
        }
    }

    /// Grows the forest across the whole graph.
    pub fn run<C>(&mut self, cost: C)
    where
        C: Fn(Arc) -> f64,
    {
        let mut visited: HashSet<Node, FxBuildHasher> = HashSet::default();
        let mut parent: HashMap<Node, Arc, FxBuildHasher> = HashMap::default();
        let roots = self.graph.nodes().collect::<alloc::vec::Vec<_>>();

        for root in roots {
            if visited.contains(&root) {
                continue;
            }
            let mut frontier: PriorityQueue<Node, f64> = PriorityQueue::new();
            frontier.push(root, f64::NEG_INFINITY);

            while let Some((node, _)) = frontier.pop() {
                visited.insert(node);
                if let Some(&arc) = parent.get(&node) {
                    self.forest.insert(arc);
                }
                for arc in self.graph.arcs_at(node, ArcFilter::All) {
                    let target = self.graph.other(arc, node);
                    if visited.contains(&target) {
                        continue;
                    }
                    let arc_cost = cost(arc);
                    match frontier.priority(target) {
                        Some(&current) if arc_cost >= current => {}
                        _ => {
                            frontier.push(target, arc_cost);
                            parent.insert(target, arc);
                        }
                    }
                }
            }
        }
    }

    #[must_use]
    pub fn in_forest(&self, arc: Arc) -> bool {
        self.forest.contains(&arc)
    }

    /// The forest arcs, in the order they were added.
    pub fn forest(&self) -> impl Iterator<Item = Arc> + '_ {
        self.forest.iter().copied()
    }

    #[must_use]
    pub fn forest_size(&self) -> usize {
        self.forest.len()
    }
}
