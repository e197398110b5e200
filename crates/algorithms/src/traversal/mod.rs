//! Configurable graph traversal: a hooked depth-first search and a
//! level-recording breadth-first search.
mod bfs;
mod dfs;
mod lowpoint;

pub use self::{
    bfs::{Bfs, BfsError},
    dfs::{Dfs, DfsVisitor},
    lowpoint::{LowpointDfs, Lowpoints},
};
