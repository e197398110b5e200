//! Connectivity decompositions, all built on the traversal framework.
mod bi_edge;
mod bi_node;
mod bipartition;
mod connected;
mod strong;
mod topological;

pub use self::{
    bi_edge::{bi_edge_connected_components, BiEdgeConnectedComponents},
    bi_node::{bi_node_connected_components, BiNodeConnectedComponents},
    bipartition::{bipartition, Bipartition},
    connected::{connected_components, ConnectedComponents},
    strong::{strong_components, StrongComponents},
    topological::{topological_order, TopologicalOrder},
};
