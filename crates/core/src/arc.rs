use core::fmt::{self, Display, Formatter};

/// An opaque handle to an arc (directed or undirected) of a graph.
///
/// Same identity model as [`Node`](crate::Node): a signed 64-bit id with `0`
/// as the invalid sentinel, equality by id, validity scoped to one graph
/// family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Arc(i64);

impl Arc {
    /// The invalid sentinel, returned where no arc applies (e.g. the parent
    /// arc of a traversal root, or the predecessor arc at a path endpoint).
    pub const INVALID: Self = Self(0);

    #[must_use]
    pub const fn new(id: i64) -> Self {
        Self(id)
    }

    /// The raw id of this handle.
    #[must_use]
    pub const fn id(self) -> i64 {
        self.0
    }

    #[must_use]
    pub const fn is_valid(self) -> bool {
        self.0 != 0
    }

    #[must_use]
    pub const fn is_invalid(self) -> bool {
        self.0 == 0
    }
}

impl Default for Arc {
    fn default() -> Self {
        Self::INVALID
    }
}

impl Display for Arc {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        if self.is_invalid() {
            f.write_str("-")
        } else {
            write!(f, "{}", self.0)
        }
    }
}

/// The kind of an arc, fixed at creation time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Directedness {
    /// An ordered connection from `u` to `v`.
    Directed,
    /// An unordered connection; the stored `(u, v)` order is canonical but
    /// carries no semantics.
    Edge,
}

impl Directedness {
    #[must_use]
    pub const fn is_edge(self) -> bool {
        matches!(self, Self::Edge)
    }
}

/// Selects which arcs an incidence enumeration reports for a node.
///
/// * `All`: every incident arc.
/// * `Edge`: undirected arcs only.
/// * `Forward`: outgoing directed arcs plus all edges.
/// * `Backward`: incoming directed arcs plus all edges.
///
/// Global enumerations (`Graph::arcs`) only discriminate `Edge`; under
/// `All`, `Forward` and `Backward` they report every arc, since globally
/// every directed arc is outgoing from its tail and incoming at its head.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ArcFilter {
    #[default]
    All,
    Edge,
    Forward,
    Backward,
}

impl ArcFilter {
    /// Whether an arc passes this filter as seen from one of its endpoints.
    ///
    /// `outgoing` is the orientation of the arc relative to the viewing
    /// node: `true` iff the node is the arc's `u`. Edges pass every filter.
    #[must_use]
    pub const fn admits(self, is_edge: bool, outgoing: bool) -> bool {
        match self {
            Self::All => true,
            Self::Edge => is_edge,
            Self::Forward => is_edge || outgoing,
            Self::Backward => is_edge || !outgoing,
        }
    }

    /// The filter seeing every arc from the opposite orientation.
    #[must_use]
    pub const fn reversed(self) -> Self {
        match self {
            Self::Forward => Self::Backward,
            Self::Backward => Self::Forward,
            other => other,
        }
    }
}
