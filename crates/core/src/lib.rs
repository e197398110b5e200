//! The graph substrate: value-type handles, an object-safe [`Graph`]
//! contract, concrete graph types, stackable non-owning views, and the
//! support structures the algorithm kernels are built on.
//!
//! Everything in this crate agrees on one identity model: nodes and arcs are
//! opaque handles wrapping a signed 64-bit id, and a handle stays valid
//! across every view stacked on top of the graph that issued it.
#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(feature = "alloc")]
extern crate alloc;

pub mod arc;
pub mod disjoint_set;
pub mod error;
pub mod graph;
pub mod id_allocator;
pub mod node;
pub mod priority_queue;
pub mod properties;
pub mod total_ord;
pub mod view;

pub use self::{
    arc::{Arc, ArcFilter, Directedness},
    disjoint_set::DisjointSet,
    error::GraphError,
    graph::{
        ArcIter, CompleteBipartiteGraph, CompleteGraph, CustomGraph, Graph, NodeIter, PathGraph,
        Topology,
    },
    id_allocator::IdAllocator,
    node::Node,
    priority_queue::PriorityQueue,
    properties::{PropertyGraph, PropertyValue},
    total_ord::TotalOrd,
    view::{
        ContractedGraph, Matching, MatchingError, Path, PathError, RedirectedGraph, Redirection,
        ReverseGraph, Subgraph, Supergraph, UndirectedGraph,
    },
};
