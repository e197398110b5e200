//! Cheapest-path kernels: Dijkstra, Bellman-Ford and A*.
//!
//! Costs are `f64`: `f64::INFINITY` marks an impassable arc, and the
//! Maximum mode of Dijkstra starts its sources at `f64::NEG_INFINITY`.
mod astar;
mod bellman_ford;
mod dijkstra;

use arcgraph_core::Arc;

pub use self::{
    astar::AStar,
    bellman_ford::{BellmanFord, BellmanFordError},
    dijkstra::{Dijkstra, DijkstraError, DijkstraMode},
};

/// A per-arc cost supplier.
///
/// Implemented for every `Fn(Arc) -> f64` closure; algorithm adapters that
/// need the graph to derive a cost (like the reduced costs of A*)
/// implement it directly.
pub trait ArcCost<G: ?Sized> {
    fn cost(&self, graph: &G, arc: Arc) -> f64;
}

impl<G, F> ArcCost<G> for F
where
    G: ?Sized,
    F: Fn(Arc) -> f64,
{
    fn cost(&self, _graph: &G, arc: Arc) -> f64 {
        self(arc)
    }
}
