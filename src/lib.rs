/*!
`arcgraph` is a graph data structure and algorithms library.

A graph is a set of integer-identified nodes joined by *arcs*, each either
directed or an undirected *edge*. The library is built around three layers:

* [`arcgraph_core`], the substrate: the [`Graph`] contract, concrete graph
  types ([`CustomGraph`], [`CompleteGraph`], [`PathGraph`]), and stackable
  non-owning views ([`Subgraph`], [`ContractedGraph`], [`ReverseGraph`],
  [`RedirectedGraph`], [`UndirectedGraph`], [`Supergraph`], [`Path`],
  [`Matching`]) that all satisfy the same contract, with handles staying
  valid across the whole stack.
* [`arcgraph_algorithms`], the kernels: hooked DFS and level-recording
  BFS, shortest paths (Dijkstra, Bellman-Ford, A*), connectivity
  decompositions, spanning forests, push-relabel maximum flow, a network
  simplex for minimum-cost circulations, bipartite matching, and color
  refinement isomorphism.
* this crate, a facade re-exporting both.

# Overview

```
use arcgraph::{CustomGraph, Directedness, Graph};
use arcgraph::algorithms::shortest_paths::{Dijkstra, DijkstraMode};

let mut graph = CustomGraph::new();
let a = graph.add_node().unwrap();
let b = graph.add_node().unwrap();
let c = graph.add_node().unwrap();
graph.add_arc(a, b, Directedness::Edge).unwrap();
graph.add_arc(b, c, Directedness::Directed).unwrap();

let mut dijkstra = Dijkstra::new(&graph, DijkstraMode::Sum, |_| 1.0);
dijkstra.add_source(a).unwrap();
dijkstra.run().unwrap();
assert_eq!(dijkstra.distance(c), 2.0);
```

Algorithms run unchanged on any view stack: a filtered [`Subgraph`] of a
[`ContractedGraph`] of a [`Supergraph`] is as good a graph as the one it
wraps.
*/
#![cfg_attr(not(feature = "std"), no_std)]

pub use arcgraph_algorithms as algorithms;
pub use arcgraph_core::{
    Arc, ArcFilter, CompleteBipartiteGraph, CompleteGraph, ContractedGraph, CustomGraph,
    Directedness, DisjointSet, Graph,
    GraphError, IdAllocator, Matching, MatchingError, Node, Path, PathError, PathGraph,
    PriorityQueue, PropertyGraph, PropertyValue, RedirectedGraph, Redirection, ReverseGraph,
    Subgraph, Supergraph, Topology, TotalOrd, UndirectedGraph,
};

/// The most commonly used items in one import.
pub mod prelude {
    pub use arcgraph_algorithms::{
        components::{connected_components, strong_components, topological_order},
        shortest_paths::{BellmanFord, Dijkstra, DijkstraMode},
        traversal::{Bfs, Dfs, DfsVisitor},
    };
    pub use arcgraph_core::{
        Arc, ArcFilter, CompleteGraph, CustomGraph, Directedness, Graph, Node, PathGraph,
    };
}
