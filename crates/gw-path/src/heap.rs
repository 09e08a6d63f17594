//! Binary min-heap of search node ids keyed by an external cost array.
//!
//! The heap stores node ids only.  Keys live in the search's `path_lengths`
//! array and are passed in on every operation, so a decrease-key is "write the
//! new cost, then sift the node up".  A node-id → slot side table makes that
//! sift O(log n) with no linear scan for the node's slot.
//!
//! Layout is the usual 0-indexed array: children of slot `i` are `2i + 1` and
//! `2i + 2`.  Sifting up moves a node past parents with an equal key, so among
//! equal keys the most recently pushed or improved node pops first.

/// Sentinel slot for ids not currently in the heap.
const NOT_IN_HEAP: u32 = u32::MAX;

#[derive(Debug, Default, Clone)]
pub struct OpenHeap {
    slots:    Vec<u32>,
    position: Vec<u32>,
}

impl OpenHeap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(n: usize) -> Self {
        Self { slots: Vec::with_capacity(n), position: Vec::with_capacity(n) }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    #[inline]
    pub fn contains(&self, id: u32) -> bool {
        self.position.get(id as usize).is_some_and(|p| *p != NOT_IN_HEAP)
    }

    /// Id with the smallest key, without removing it.
    #[inline]
    pub fn peek(&self) -> Option<u32> {
        self.slots.first().copied()
    }

    /// Empty the heap, keeping its allocations.
    pub fn clear(&mut self) {
        self.slots.clear();
        self.position.clear();
    }

    /// Insert `id` (not already present) with key `keys[id]`.
    pub fn push(&mut self, id: u32, keys: &[u32]) {
        debug_assert!(!self.contains(id), "node {id} pushed twice");
        let idx = id as usize;
        if self.position.len() <= idx {
            self.position.resize(idx + 1, NOT_IN_HEAP);
        }
        let slot = self.slots.len();
        self.slots.push(id);
        self.position[idx] = slot as u32;
        self.sift_up(slot, keys);
    }

    /// Remove and return the id with the smallest key.
    pub fn pop_min(&mut self, keys: &[u32]) -> Option<u32> {
        let last = self.slots.len().checked_sub(1)?;
        self.swap(0, last);
        let min = self.slots.pop()?;
        self.position[min as usize] = NOT_IN_HEAP;
        if !self.slots.is_empty() {
            self.sift_down(0, keys);
        }
        Some(min)
    }

    /// Restore heap order after `keys[id]` was lowered.  Keys may only
    /// decrease, so the node only ever moves toward the root.
    pub fn decrease_key(&mut self, id: u32, keys: &[u32]) {
        debug_assert!(self.contains(id), "decrease_key on absent node {id}");
        let slot = self.position[id as usize] as usize;
        self.sift_up(slot, keys);
    }

    fn sift_up(&mut self, mut slot: usize, keys: &[u32]) {
        while slot > 0 {
            let parent = (slot - 1) / 2;
            if keys[self.slots[slot] as usize] <= keys[self.slots[parent] as usize] {
                self.swap(slot, parent);
                slot = parent;
            } else {
                break;
            }
        }
    }

    fn sift_down(&mut self, mut slot: usize, keys: &[u32]) {
        let n = self.slots.len();
        loop {
            let first = 2 * slot + 1;
            if first >= n {
                break;
            }
            let second = first + 1;
            let key = |s: usize| keys[self.slots[s] as usize];
            let child = if second < n && key(second) < key(first) { second } else { first };
            if key(child) < key(slot) {
                self.swap(slot, child);
                slot = child;
            } else {
                break;
            }
        }
    }

    #[inline]
    fn swap(&mut self, a: usize, b: usize) {
        self.slots.swap(a, b);
        self.position[self.slots[a] as usize] = a as u32;
        self.position[self.slots[b] as usize] = b as u32;
    }
}
