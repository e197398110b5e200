use core::fmt::{self, Display, Formatter};

use error_stack::Context;

/// Contract violations of the graph substrate.
///
/// These are programming errors reported fail-fast at the call site; the
/// receiving object is left unchanged whenever feasible.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GraphError {
    /// A node id was supplied that is already live in the graph.
    DuplicateNode,
    /// The reserved id `0` was supplied for a new entity.
    InvalidId,
    /// An operation referenced a node the graph does not contain.
    NodeNotFound,
    /// An operation referenced an arc the graph does not contain.
    ArcNotFound,
    /// Adding the entity would push the node or arc count past `u32::MAX`.
    CapacityExhausted,
    /// The 64-bit id space has no free id left.
    IdSpaceExhausted,
    /// A deletion targeted an entity the receiver does not own (e.g. an
    /// underlying node seen through a supergraph).
    NotOwned,
}

impl Display for GraphError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::DuplicateNode => f.write_str("node id is already in use"),
            Self::InvalidId => f.write_str("id 0 is reserved for the invalid sentinel"),
            Self::NodeNotFound => f.write_str("node not found"),
            Self::ArcNotFound => f.write_str("arc not found"),
            Self::CapacityExhausted => f.write_str("entity count limit exceeded"),
            Self::IdSpaceExhausted => f.write_str("id space exhausted"),
            Self::NotOwned => f.write_str("entity is not owned by this graph"),
        }
    }
}

impl Context for GraphError {}
