//! Minimum-cost spanning forests.
mod kruskal;
mod prim;

pub use self::{
    kruskal::{Kruskal, KruskalError},
    prim::Prim,
};
