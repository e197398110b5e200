//! Non-owning view adapters over any [`Graph`](crate::Graph).
//!
//! Views are stackable: each one satisfies the same contract as the graph it
//! wraps, node and arc handles stay valid across the stack, and an algorithm
//! running on the outermost view sees that view's semantics. A view borrows
//! its underlying graph (wrap a `&G`; the blanket `Graph for &G` impl makes
//! that a graph) and never extends its lifetime.
mod contracted;
mod matching;
mod path;
mod redirected;
mod reverse;
mod subgraph;
mod supergraph;
mod undirected;

pub use self::{
    contracted::ContractedGraph,
    matching::{Matching, MatchingError},
    path::{Path, PathError},
    redirected::{RedirectedGraph, Redirection},
    reverse::ReverseGraph,
    subgraph::Subgraph,
    supergraph::Supergraph,
    undirected::UndirectedGraph,
};
