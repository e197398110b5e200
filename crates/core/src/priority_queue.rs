//! An indexed min-heap with decrease-key by key lookup.
use core::hash::Hash;

use alloc::vec::Vec;

use fxhash::FxBuildHasher;
use hashbrown::HashMap;

use crate::TotalOrd;

struct Entry<K, P> {
    key: K,
    priority: P,
    // Monotone insertion stamp; ties across equal priorities resolve in
    // insertion order.
    stamp: u64,
}

/// A binary min-heap over `(priority, insertion order)` that supports
/// changing the priority of an element through its key.
///
/// A position map from key to heap slot is folded into the queue itself, so
/// `push` doubles as decrease-key (or increase-key) when the key is already
/// present, and arbitrary elements can be removed. All operations are
/// O(log n) plus hashing; `peek`, `contains` and `priority` are O(1).
pub struct PriorityQueue<K, P> {
    heap: Vec<Entry<K, P>>,
    position: HashMap<K, usize, FxBuildHasher>,
    next_stamp: u64,
}

impl<K, P> Default for PriorityQueue<K, P> {
    fn default() -> Self {
        Self {
            heap: Vec::new(),
            position: HashMap::default(),
            next_stamp: 0,
        }
    }
}

impl<K, P> PriorityQueue<K, P>
where
    K: Copy + Eq + Hash,
    P: TotalOrd,
{
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.heap.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    #[must_use]
    pub fn contains(&self, key: K) -> bool {
        self.position.contains_key(&key)
    }

    /// The current priority of `key`, if queued.
    #[must_use]
    pub fn priority(&self, key: K) -> Option<&P> {
        self.position
            .get(&key)
            .map(|&slot| &self.heap[slot].priority)
    }

    /// Inserts `key` with `priority`, or re-prioritizes it if already
    /// queued. Re-prioritizing keeps the original insertion stamp.
    pub fn push(&mut self, key: K, priority: P) {
        if let Some(&slot) = self.position.get(&key) {
            let up = priority.total_cmp(&self.heap[slot].priority).is_lt();
            self.heap[slot].priority = priority;
            if up {
                self.sift_up(slot);
            } else {
                self.sift_down(slot);
            }
            return;
        }

        let slot = self.heap.len();
        self.heap.push(Entry {
            key,
            priority,
            stamp: self.next_stamp,
        });
        self.next_stamp += 1;
        self.position.insert(key, slot);
        self.sift_up(slot);
    }

    /// The minimal element, without removing it.
    #[must_use]
    pub fn peek(&self) -> Option<(K, &P)> {
        self.heap.first().map(|entry| (entry.key, &entry.priority))
    }

    /// Removes and returns the minimal element.
    pub fn pop(&mut self) -> Option<(K, P)> {
        self.remove_slot(0)
    }

    /// Removes `key` from the queue, returning its priority.
    pub fn remove(&mut self, key: K) -> Option<P> {
        let slot = self.position.get(&key).copied()?;
        self.remove_slot(slot).map(|(_, priority)| priority)
    }

    pub fn clear(&mut self) {
        self.heap.clear();
        self.position.clear();
        self.next_stamp = 0;
    }

    fn remove_slot(&mut self, slot: usize) -> Option<(K, P)> {
        if slot >= self.heap.len() {
            return None;
        }
        let last = self.heap.len() - 1;
        self.heap.swap(slot, last);
        let entry = self.heap.pop()?;
        self.position.remove(&entry.key);
        if slot < self.heap.len() {
            self.position.insert(self.heap[slot].key, slot);
            self.sift_down(slot);
            self.sift_up(slot);
        }
        Some((entry.key, entry.priority))
    }

    fn before(&self, a: usize, b: usize) -> bool {
        let (a, b) = (&self.heap[a], &self.heap[b]);
        a.priority
            .total_cmp(&b.priority)
            .then(a.stamp.cmp(&b.stamp))
            .is_lt()
    }

    fn sift_up(&mut self, mut slot: usize) {
        while slot > 0 {
            let parent = (slot - 1) / 2;
            if !self.before(slot, parent) {
                break;
            }
            self.swap_slots(slot, parent);
            slot = parent;
        }
    }

    fn sift_down(&mut self, mut slot: usize) {
        loop {
            let mut smallest = slot;
            for child in [2 * slot + 1, 2 * slot + 2] {
                if child < self.heap.len() && self.before(child, smallest) {
                    smallest = child;
                }
            }
            if smallest == slot {
                break;
            }
            self.swap_slots(slot, smallest);
            slot = smallest;
        }
    }

    fn swap_slots(&mut self, a: usize, b: usize) {
        self.heap.swap(a, b);
        self.position.insert(self.heap[a].key, a);
        self.position.insert(self.heap[b].key, b);
    }
}
