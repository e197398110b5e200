//! The kernels must see the outermost view's semantics, whatever the
//! stack underneath.
#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;
use alloc::vec::Vec;

use arcgraph_algorithms::{
    components::{connected_components, strong_components},
    shortest_paths::{Dijkstra, DijkstraMode},
    traversal::Bfs,
};
use arcgraph_core::{
    Arc, ArcFilter, ContractedGraph, CustomGraph, Directedness, Graph, Node, ReverseGraph,
    Subgraph, Supergraph, UndirectedGraph,
};
use hashbrown::HashMap;

fn chain(n: usize) -> (CustomGraph, Vec<Node>, Vec<Arc>) {
    let mut graph = CustomGraph::new();
    let nodes: Vec<Node> = (0..n).map(|_| graph.add_node().unwrap()).collect();
    let arcs = nodes
        .windows(2)
        .map(|pair| {
            graph
                .add_arc(pair[0], pair[1], Directedness::Directed)
                .unwrap()
        })
        .collect();
    (graph, nodes, arcs)
}

#[test]
fn dijkstra_on_a_reversed_graph_walks_backwards() {
    let (graph, nodes, _) = chain(4);
    let reversed = ReverseGraph::new(&graph);

    let mut dijkstra = Dijkstra::new(&reversed, DijkstraMode::Sum, |_| 1.0);
    dijkstra.add_source(nodes[3]).unwrap();
    dijkstra.run().unwrap();

    for (i, &node) in nodes.iter().enumerate() {
        assert_eq!(dijkstra.distance(node), (3 - i) as f64);
    }
}

#[test]
fn disabling_an_arc_reroutes_the_search() {
    // a short route and a long detour; the subgraph hides the short one
    let mut graph = CustomGraph::new();
    let nodes: Vec<Node> = (0..4).map(|_| graph.add_node().unwrap()).collect();
    let mut costs: HashMap<Arc, f64> = HashMap::new();
    let short = graph
        .add_arc(nodes[0], nodes[3], Directedness::Directed)
        .unwrap();
    costs.insert(short, 1.0);
    for pair in nodes.windows(2) {
        let arc = graph
            .add_arc(pair[0], pair[1], Directedness::Directed)
            .unwrap();
        costs.insert(arc, 1.0);
    }

    let mut view = Subgraph::new(&graph);
    view.enable_arc(short, false);

    let mut dijkstra = Dijkstra::new(&view, DijkstraMode::Sum, |arc| costs[&arc]);
    dijkstra.add_source(nodes[0]).unwrap();
    dijkstra.run().unwrap();
    assert_eq!(dijkstra.distance(nodes[3]), 3.0);

    // on the unfiltered graph the shortcut wins
    let mut direct = Dijkstra::new(&graph, DijkstraMode::Sum, |arc| costs[&arc]);
    direct.add_source(nodes[0]).unwrap();
    direct.run().unwrap();
    assert_eq!(direct.distance(nodes[3]), 1.0);
}

#[test]
fn contraction_shortens_distances() {
    let (graph, nodes, _) = chain(5);
    let mut contracted = ContractedGraph::new(&graph);
    contracted.merge(nodes[1], nodes[3]);

    let source = contracted.representative(nodes[0]);
    let mut bfs = Bfs::new(&contracted);
    bfs.add_source(source).unwrap();
    bfs.run();

    // 0 -> {1,3} -> 4 is now two hops
    assert_eq!(bfs.level(contracted.representative(nodes[4])), Some(2));
}

#[test]
fn an_undirected_view_makes_strong_components_collapse() {
    let (graph, nodes, _) = chain(4);
    let directed = strong_components(&graph);
    assert_eq!(directed.count(), 4);

    let undirected = UndirectedGraph::new(&graph);
    let collapsed = strong_components(&undirected);
    assert_eq!(collapsed.count(), 1);
    assert!(collapsed.same_component(nodes[0], nodes[3]));
}

#[test]
fn a_full_stack_behaves_like_a_graph() {
    // Subgraph(Contracted(Supergraph(CustomGraph)))
    let mut base = CustomGraph::new();
    let a = base.add_node().unwrap();
    let b = base.add_node().unwrap();
    let ab = base.add_arc(a, b, Directedness::Edge).unwrap();

    let mut layered = Supergraph::new(&base);
    let c = layered.add_node().unwrap();
    let bc = layered.add_arc(b, c, Directedness::Edge).unwrap();
    let ca = layered.add_arc(c, a, Directedness::Edge).unwrap();

    let mut contracted = ContractedGraph::new(&layered);
    contracted.merge(a, b);
    let merged = contracted.representative(a);

    let mut stack = Subgraph::new(&contracted);
    stack.enable_arc(ab, false); // now a loop on the merged class

    assert_eq!(stack.node_count(), 2);
    assert_eq!(stack.arc_count(ArcFilter::All), 2);

    // handles from the bottom layer stay valid at the top
    assert!(stack.has_arc(bc));
    assert!(stack.has_arc(ca));
    assert!(!stack.has_arc(ab));
    assert_eq!(stack.other(bc, merged), c);

    for filter in [
        ArcFilter::All,
        ArcFilter::Edge,
        ArcFilter::Forward,
        ArcFilter::Backward,
    ] {
        assert_eq!(stack.arc_count(filter), stack.arcs(filter).count());
        for node in stack.nodes().collect::<Vec<_>>() {
            assert_eq!(
                stack.arc_count_at(node, filter),
                stack.arcs_at(node, filter).count()
            );
        }
    }

    let components = connected_components(&stack);
    assert_eq!(components.count(), 1);
    assert!(components.same_component(merged, c));

    let mut bfs = Bfs::new(&stack);
    bfs.add_source(merged).unwrap();
    bfs.run();
    assert_eq!(bfs.level(c), Some(1));
}

#[test]
fn supergraph_extends_a_search_space() {
    let (graph, nodes, _) = chain(3);
    let mut extended = Supergraph::new(&graph);
    let shortcut_hub = extended.add_node().unwrap();
    extended
        .add_arc(nodes[0], shortcut_hub, Directedness::Directed)
        .unwrap();
    extended
        .add_arc(shortcut_hub, nodes[2], Directedness::Directed)
        .unwrap();

    // on the base graph the distance is 2; the added hub does not shorten
    // it, but widens the reachable set
    let mut dijkstra = Dijkstra::new(&extended, DijkstraMode::Sum, |_| 1.0);
    dijkstra.add_source(nodes[0]).unwrap();
    dijkstra.run().unwrap();
    assert_eq!(dijkstra.distance(nodes[2]), 2.0);
    assert_eq!(dijkstra.distance(shortcut_hub), 1.0);
}
