//! A disjoint-set (union-find) structure over arbitrary hashable elements.
use core::hash::Hash;

use fxhash::FxBuildHasher;
use hashbrown::HashMap;

/// Tracks a partition of elements into equivalence classes, with
/// enumeration of the members of a class.
///
/// Elements not yet touched by [`union`](Self::union) form singleton
/// classes implicitly and cost no memory. Alongside the classic
/// parent/rank forest, every class threads its members on a circular
/// next-in-class ring, so [`members`](Self::members) runs in time linear in
/// the class size.
///
/// The amortized cost per operation is O(α(n)) plus hashing.
#[derive(Debug, Clone)]
pub struct DisjointSet<T> {
    parent: HashMap<T, T, FxBuildHasher>,
    rank: HashMap<T, u8, FxBuildHasher>,
    // Circular successor ring per class; absent elements are alone.
    next: HashMap<T, T, FxBuildHasher>,
    union_count: usize,
}

impl<T> Default for DisjointSet<T> {
    fn default() -> Self {
        Self {
            parent: HashMap::default(),
            rank: HashMap::default(),
            next: HashMap::default(),
            union_count: 0,
        }
    }
}

impl<T> DisjointSet<T>
where
    T: Copy + Eq + Hash,
{
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The representative of the class containing `x`, without mutating the
    /// structure.
    #[must_use]
    pub fn find(&self, x: T) -> T {
        let mut x = x;
        while let Some(&parent) = self.parent.get(&x) {
            if parent == x {
                break;
            }
            x = parent;
        }
        x
    }

    /// The representative of the class containing `x`.
    ///
    /// Writes back the found representative, flattening the forest to
    /// quicken future lookups.
    pub fn find_mut(&mut self, x: T) -> T {
        let root = self.find(x);
        let mut x = x;
        while let Some(&parent) = self.parent.get(&x) {
            if parent == x {
                break;
            }
            self.parent.insert(x, root);
            x = parent;
        }
        root
    }

    /// Whether `x` and `y` are in the same class.
    #[must_use]
    pub fn equiv(&self, x: T, y: T) -> bool {
        self.find(x) == self.find(y)
    }

    /// Unifies the classes containing `x` and `y`.
    ///
    /// Returns `false` if they already were the same class, `true` if a
    /// merge happened.
    pub fn union(&mut self, x: T, y: T) -> bool {
        let xrep = self.find_mut(x);
        let yrep = self.find_mut(y);
        if xrep == yrep {
            return false;
        }

        let xrank = self.rank.get(&xrep).copied().unwrap_or(0);
        let yrank = self.rank.get(&yrep).copied().unwrap_or(0);
        let (root, child) = match xrank.cmp(&yrank) {
            core::cmp::Ordering::Less => (yrep, xrep),
            core::cmp::Ordering::Greater => (xrep, yrep),
            core::cmp::Ordering::Equal => {
                self.rank.insert(xrep, xrank + 1);
                (xrep, yrep)
            }
        };
        self.parent.insert(child, root);

        // splice the two member rings together
        let root_next = self.next.get(&root).copied().unwrap_or(root);
        let child_next = self.next.get(&child).copied().unwrap_or(child);
        self.next.insert(root, child_next);
        self.next.insert(child, root_next);

        self.union_count += 1;
        true
    }

    /// The number of merges performed since construction or
    /// [`reset`](Self::reset).
    #[must_use]
    pub fn union_count(&self) -> usize {
        self.union_count
    }

    /// Enumerates the members of the class containing `x`, starting at `x`.
    pub fn members(&self, x: T) -> Members<'_, T> {
        Members {
            next: &self.next,
            start: x,
            current: Some(x),
        }
    }

    /// Dissolves every class back into singletons.
    pub fn reset(&mut self) {
        self.parent.clear();
        self.rank.clear();
        self.next.clear();
        self.union_count = 0;
    }
}

pub struct Members<'a, T> {
    next: &'a HashMap<T, T, FxBuildHasher>,
    start: T,
    current: Option<T>,
}

impl<T> Iterator for Members<'_, T>
where
    T: Copy + Eq + Hash,
{
    type Item = T;

    fn next(&mut self) -> Option<T> {
        let current = self.current?;
        let successor = self.next.get(&current).copied().unwrap_or(current);
        self.current = if successor == self.start {
            None
        } else {
            Some(successor)
        };
        Some(current)
    }
}
