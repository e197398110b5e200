//! Algorithm kernels over the [`arcgraph_core`] graph contract.
//!
//! Every kernel is generic over `G: Graph + ?Sized`, so it runs unchanged on
//! a concrete graph, a filtered subgraph, a contracted graph, a reversed or
//! redirected view, or any stack of those. Kernels read the graph through
//! shared references and never mutate it; mutable working state lives inside
//! the algorithm instance.
#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

pub mod components;
pub mod flows;
pub mod isomorphism;
pub mod matching;
pub mod shortest_paths;
pub mod simplex;
pub mod traversal;
pub mod tree;
