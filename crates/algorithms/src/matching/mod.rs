//! Bipartite matching kernels.
mod bipartite;
mod min_cost;

pub use self::{
    bipartite::{BipartiteMatchingError, BipartiteMaximumMatching},
    min_cost::{BipartiteMinimumCostMatching, MinCostMatchingError},
};
