use error_stack::{Report, Result};

use crate::GraphError;

/// Allocates unused 64-bit ids.
///
/// The allocator owns nothing but a cursor; liveness is probed through the
/// predicate supplied per call, so the allocator never holds a back-pointer
/// to the graph it serves. Id `0` is never handed out. When the cursor
/// wraps all the way around without finding a free id the id space is
/// exhausted and an error is reported.
#[derive(Debug, Clone, Default)]
pub struct IdAllocator {
    last: i64,
}

impl IdAllocator {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns an id for which `is_live` is `false`, advancing the cursor
    /// past it.
    pub fn allocate<F>(&mut self, mut is_live: F) -> Result<i64, GraphError>
    where
        F: FnMut(i64) -> bool,
    {
        let start = self.last;
        loop {
            self.last = if self.last == i64::MAX {
                i64::MIN
            } else {
                self.last + 1
            };
            if self.last != 0 && !is_live(self.last) {
                return Ok(self.last);
            }
            if self.last == start {
                return Err(Report::new(GraphError::IdSpaceExhausted));
            }
        }
    }

    /// Moves the cursor so that allocation continues after `id`. Used when
    /// an id was claimed explicitly rather than allocated.
    pub fn mark_used(&mut self, id: i64) {
        if id > self.last {
            self.last = id;
        }
    }

    pub fn reset(&mut self) {
        self.last = 0;
    }
}
