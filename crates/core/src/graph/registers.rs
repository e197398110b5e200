use alloc::vec::Vec;

use crate::{Arc, ArcFilter};

/// The four per-node incidence registers kept by the mutable graph types:
/// one list per [`ArcFilter`] so incidence enumeration and counting are a
/// slice walk.
#[derive(Debug, Clone, Default)]
pub(crate) struct Registers {
    all: Vec<Arc>,
    edge: Vec<Arc>,
    forward: Vec<Arc>,
    backward: Vec<Arc>,
}

impl Registers {
    pub(crate) fn slice(&self, filter: ArcFilter) -> &[Arc] {
        match filter {
            ArcFilter::All => &self.all,
            ArcFilter::Edge => &self.edge,
            ArcFilter::Forward => &self.forward,
            ArcFilter::Backward => &self.backward,
        }
    }

    /// Registers `arc` as seen from one endpoint. A loop arc must be
    /// registered once, with both orientation flags set.
    pub(crate) fn insert(&mut self, arc: Arc, is_edge: bool, outgoing: bool, incoming: bool) {
        self.all.push(arc);
        if is_edge {
            self.edge.push(arc);
            self.forward.push(arc);
            self.backward.push(arc);
        } else {
            if outgoing {
                self.forward.push(arc);
            }
            if incoming {
                self.backward.push(arc);
            }
        }
    }

    pub(crate) fn remove(&mut self, arc: Arc) {
        self.all.retain(|&a| a != arc);
        self.edge.retain(|&a| a != arc);
        self.forward.retain(|&a| a != arc);
        self.backward.retain(|&a| a != arc);
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.all.is_empty()
    }
}
