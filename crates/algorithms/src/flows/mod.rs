//! Maximum-flow kernels: the exact integer push-relabel solver and its
//! real-valued scaling wrapper.
mod preflow;
mod scaling;

pub use self::{
    preflow::{IntegerPreflow, PreflowError},
    scaling::Preflow,
};
