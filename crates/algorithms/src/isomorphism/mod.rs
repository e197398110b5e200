//! Graph isomorphism by iterated color refinement.
use alloc::vec::Vec;

use arcgraph_core::{ArcFilter, Graph, Node};
use fxhash::FxBuildHasher;
use hashbrown::HashMap;

use crate::components::connected_components;

/// The verdict of the refinement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IsomorphismResult {
    /// A structural difference rules an isomorphism out.
    NotIsomorphic,
    /// Refinement stabilized without separating all nodes; no verdict.
    Indeterminate,
    /// A color-discrete bijection that maps every arc onto an arc of the
    /// same directedness.
    Isomorphic(HashMap<Node, Node, FxBuildHasher>),
}

const DEFAULT_ITERATIONS: usize = 16;

// Bijective 64-bit mixers (xorshift rounds and odd multiplications are
// invertible), one per incidence role so an edge neighbor, a forward
// neighbor and a backward neighbor of the same color stay distinguishable.
fn mix(value: u64, first: u64, second: u64) -> u64 {
    let mut value = value;
    value ^= value >> 30;
    value = value.wrapping_mul(first);
    value ^= value >> 27;
    value = value.wrapping_mul(second);
    value ^= value >> 31;
    value
}

fn mix_edge(value: u64) -> u64 {
    mix(value, 0xbf58_476d_1ce4_e5b9, 0x94d0_49bb_1331_11eb)
}

fn mix_forward(value: u64) -> u64 {
    mix(value, 0xff51_afd7_ed55_8ccd, 0xc4ce_b9fe_1a85_ec53)
}

fn mix_backward(value: u64) -> u64 {
    mix(value, 0xc2b2_ae3d_27d4_eb4f, 0x1656_67b1_9e37_79f9)
}

fn mix_own(value: u64) -> u64 {
    mix(value, 0x9e37_79b9_7f4a_7c15, 0x2545_f491_4f6c_dd1d)
}

// FNV-1a over the sorted color multiset: a node-order-independent digest
// of a full coloring.
fn coloring_digest(colors: &HashMap<Node, u64, FxBuildHasher>) -> u64 {
    let mut sorted = colors.values().copied().collect::<Vec<_>>();
    sorted.sort_unstable();
    let mut digest: u64 = 0xcbf2_9ce4_8422_2325;
    for color in sorted {
        for byte in color.to_le_bytes() {
            digest ^= u64::from(byte);
            digest = digest.wrapping_mul(0x0000_0100_0000_01b3);
        }
    }
    digest
}

struct Refinement<'graph, G: ?Sized> {
    graph: &'graph G,
    colors: HashMap<Node, u64, FxBuildHasher>,
}

impl<'graph, G> Refinement<'graph, G>
where
    G: Graph + ?Sized,
{
    fn seeded(graph: &'graph G) -> Self {
        let colors = graph
            .nodes()
            .map(|node| (node, graph.arc_count_at(node, ArcFilter::All) as u64))
            .collect();
        Self { graph, colors }
    }

    // One refinement round: fold the own color with the role-hashed
    // multiset of neighbor colors.
    fn refine(&mut self) {
        let mut next: HashMap<Node, u64, FxBuildHasher> = HashMap::default();
        let nodes = self.graph.nodes().collect::<Vec<_>>();
        for node in nodes {
            let mut color = mix_own(self.colors[&node]);
            for arc in self.graph.arcs_at(node, ArcFilter::All) {
                let neighbor = self.graph.other(arc, node);
                let neighbor_color = self.colors[&neighbor];
                if self.graph.is_edge(arc) {
                    color = color.wrapping_add(mix_edge(neighbor_color));
                } else {
                    let (u, v) = self.graph.endpoints(arc);
                    if u == node {
                        color = color.wrapping_add(mix_forward(neighbor_color));
                    }
                    if v == node {
                        color = color.wrapping_add(mix_backward(neighbor_color));
                    }
                }
            }
            next.insert(node, color);
        }
        self.colors = next;
    }

    fn digest(&self) -> u64 {
        coloring_digest(&self.colors)
    }
}

/// Tests `first` and `second` for isomorphism with the default iteration
/// cap.
pub fn isomorphism<G1, G2>(first: &G1, second: &G2) -> IsomorphismResult
where
    G1: Graph + ?Sized,
    G2: Graph + ?Sized,
{
    isomorphism_with_iterations(first, second, DEFAULT_ITERATIONS)
}

/// Tests for isomorphism, refining at most `max_iterations` times.
///
/// Structural screens (node/arc/edge counts and the multiset of component
/// sizes) run first; afterwards both graphs are refined in lockstep and
/// the colorings compared through an order-independent digest each round.
/// Diverging digests prove non-isomorphism. When refinement separates
/// every node, the color-sorted pairing is verified arc by arc and
/// reported as the isomorphism; if duplicate colors remain the test is
/// [`IsomorphismResult::Indeterminate`].
pub fn isomorphism_with_iterations<G1, G2>(
    first: &G1,
    second: &G2,
    max_iterations: usize,
) -> IsomorphismResult
where
    G1: Graph + ?Sized,
    G2: Graph + ?Sized,
{
    if first.node_count() != second.node_count()
        || first.arc_count(ArcFilter::All) != second.arc_count(ArcFilter::All)
        || first.arc_count(ArcFilter::Edge) != second.arc_count(ArcFilter::Edge)
    {
        return IsomorphismResult::NotIsomorphic;
    }
    if component_sizes(first) != component_sizes(second) {
        return IsomorphismResult::NotIsomorphic;
    }

    let mut left = Refinement::seeded(first);
    let mut right = Refinement::seeded(second);
    if left.digest() != right.digest() {
        return IsomorphismResult::NotIsomorphic;
    }

    for _ in 0..max_iterations {
        left.refine();
        right.refine();
        if left.digest() != right.digest() {
            return IsomorphismResult::NotIsomorphic;
        }
    }

    let mut left_sorted = left.colors.iter().map(|(&n, &c)| (c, n)).collect::<Vec<_>>();
    let mut right_sorted = right
        .colors
        .iter()
        .map(|(&n, &c)| (c, n))
        .collect::<Vec<_>>();
    left_sorted.sort_unstable_by_key(|&(color, _)| color);
    right_sorted.sort_unstable_by_key(|&(color, _)| color);

    let colors_match = left_sorted
        .iter()
        .zip(&right_sorted)
        .all(|((left_color, _), (right_color, _))| left_color == right_color);
    if !colors_match {
        return IsomorphismResult::NotIsomorphic;
    }

    let discrete = left_sorted
        .windows(2)
        .all(|pair| pair[0].0 != pair[1].0);
    if !discrete {
        return IsomorphismResult::Indeterminate;
    }

    let map: HashMap<Node, Node, FxBuildHasher> = left_sorted
        .iter()
        .zip(&right_sorted)
        .map(|(&(_, left_node), &(_, right_node))| (left_node, right_node))
        .collect();

    if verify(first, second, &map) {
        IsomorphismResult::Isomorphic(map)
    } else {
        IsomorphismResult::Indeterminate
    }
}

fn component_sizes<G>(graph: &G) -> Vec<usize>
where
    G: Graph + ?Sized,
{
    let components = connected_components(graph);
    let mut sizes = components.iter().map(<[Node]>::len).collect::<Vec<_>>();
    sizes.sort_unstable();
    sizes
}

// The candidate bijection must carry every arc onto an arc of the same
// kind and orientation, with matching multiplicities.
fn verify<G1, G2>(
    first: &G1,
    second: &G2,
    map: &HashMap<Node, Node, FxBuildHasher>,
) -> bool
where
    G1: Graph + ?Sized,
    G2: Graph + ?Sized,
{
    for arc in first.arcs(ArcFilter::All) {
        let (u, v) = first.endpoints(arc);
        let (Some(&mu), Some(&mv)) = (map.get(&u), map.get(&v)) else {
            return false;
        };
        let is_edge = first.is_edge(arc);
        let original = first
            .arcs_between(u, v, ArcFilter::All)
            .filter(|&a| first.is_edge(a) == is_edge && (is_edge || first.u(a) == u))
            .count();
        let image = second
            .arcs_between(mu, mv, ArcFilter::All)
            .filter(|&a| second.is_edge(a) == is_edge && (is_edge || second.u(a) == mu))
            .count();
        if original != image {
            return false;
        }
    }
    true
}

#[cfg(test)]
mod tests {
    use alloc::vec::Vec;

    use arcgraph_core::{
        CompleteGraph, CustomGraph, Directedness, Graph, Node, PathGraph, Topology,
    };

    use super::{isomorphism, IsomorphismResult};

    fn cycle(n: usize, shift: usize) -> CustomGraph {
        // the same cycle, with arcs inserted starting at a different node
        let mut graph = CustomGraph::new();
        let nodes: Vec<Node> = (0..n).map(|_| graph.add_node().unwrap()).collect();
        for i in 0..n {
            let u = nodes[(i + shift) % n];
            let v = nodes[(i + shift + 1) % n];
            graph.add_arc(u, v, Directedness::Directed).unwrap();
        }
        graph
    }

    #[test]
    fn count_mismatches_are_rejected_early() {
        let four = CompleteGraph::new(4, Directedness::Edge);
        let five = CompleteGraph::new(5, Directedness::Edge);
        assert_eq!(isomorphism(&four, &five), IsomorphismResult::NotIsomorphic);

        let directed = CompleteGraph::new(4, Directedness::Directed);
        assert_eq!(
            isomorphism(&four, &directed),
            IsomorphismResult::NotIsomorphic
        );
    }

    #[test]
    fn paths_of_equal_length_match() {
        let left = PathGraph::new(6, Topology::Path, Directedness::Directed);
        let mut right = CustomGraph::new();
        let nodes: Vec<Node> = (0..6).map(|_| right.add_node().unwrap()).collect();
        // build the same path from the far end
        for i in (0..5).rev() {
            right
                .add_arc(nodes[i], nodes[i + 1], Directedness::Directed)
                .unwrap();
        }

        match isomorphism(&left, &right) {
            IsomorphismResult::Isomorphic(map) => {
                assert_eq!(map.len(), 6);
            }
            other => panic!("expected an isomorphism, got {other:?}"),
        }
    }

    #[test]
    fn the_mapping_preserves_arcs() {
        let mut left = CustomGraph::new();
        let a: Vec<Node> = (0..5).map(|_| left.add_node().unwrap()).collect();
        for (u, v) in [(0, 1), (0, 2), (1, 3), (2, 4), (3, 4)] {
            left.add_arc(a[u], a[v], Directedness::Directed).unwrap();
        }
        // the same shape under a different node numbering
        let mut right = CustomGraph::new();
        let b: Vec<Node> = (0..5).map(|_| right.add_node().unwrap()).collect();
        for (u, v) in [(4, 3), (4, 2), (3, 1), (2, 0), (1, 0)] {
            right.add_arc(b[u], b[v], Directedness::Directed).unwrap();
        }

        match isomorphism(&left, &right) {
            IsomorphismResult::Isomorphic(map) => {
                use arcgraph_core::ArcFilter;
                for arc in left.arcs(ArcFilter::All) {
                    let (u, v) = left.endpoints(arc);
                    let mapped = right
                        .arcs_between(map[&u], map[&v], ArcFilter::All)
                        .any(|image| right.u(image) == map[&u]);
                    assert!(mapped);
                }
            }
            other => panic!("expected an isomorphism, got {other:?}"),
        }
    }

    #[test]
    fn different_shapes_with_equal_counts_are_distinguished() {
        // both graphs: 6 nodes, 6 edges; a 6-cycle vs two triangles
        let mut one_cycle = CustomGraph::new();
        let a: Vec<Node> = (0..6).map(|_| one_cycle.add_node().unwrap()).collect();
        for i in 0..6 {
            one_cycle
                .add_arc(a[i], a[(i + 1) % 6], Directedness::Edge)
                .unwrap();
        }
        let mut triangles = CustomGraph::new();
        let b: Vec<Node> = (0..6).map(|_| triangles.add_node().unwrap()).collect();
        for (u, v) in [(0, 1), (1, 2), (2, 0), (3, 4), (4, 5), (5, 3)] {
            triangles.add_arc(b[u], b[v], Directedness::Edge).unwrap();
        }

        assert_eq!(
            isomorphism(&one_cycle, &triangles),
            IsomorphismResult::NotIsomorphic
        );
    }

    #[test]
    fn orientation_differences_are_distinguished() {
        // a directed 4-cycle against a directed path closed the wrong way
        let cycle_graph = cycle(4, 0);
        let mut zigzag = CustomGraph::new();
        let nodes: Vec<Node> = (0..4).map(|_| zigzag.add_node().unwrap()).collect();
        for (u, v) in [(0, 1), (1, 2), (3, 2), (3, 0)] {
            zigzag
                .add_arc(nodes[u], nodes[v], Directedness::Directed)
                .unwrap();
        }

        assert_eq!(
            isomorphism(&cycle_graph, &zigzag),
            IsomorphismResult::NotIsomorphic
        );
    }

    #[test]
    fn regular_graphs_stay_indeterminate() {
        // color refinement cannot separate the nodes of a cycle
        assert_eq!(
            isomorphism(&cycle(5, 0), &cycle(5, 2)),
            IsomorphismResult::Indeterminate
        );
        assert_eq!(
            isomorphism(
                &CompleteGraph::new(4, Directedness::Edge),
                &CompleteGraph::new(4, Directedness::Edge)
            ),
            IsomorphismResult::Indeterminate
        );
    }
}
