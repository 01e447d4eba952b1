//! Indexed binary heap with in-place priority updates.
//!
//! The heap stores arena indices, not items. Items live in a caller-owned
//! slice and carry their own heap slot, so membership tests and
//! decrease-key updates are O(1) lookups followed by an O(log n) sift.
//!
//! Invariant: for every arena index `i` in the heap,
//! `slots[items[i].heap_slot()] == i`.

use std::cmp::Ordering;
use std::fmt;
use std::marker::PhantomData;

/// An item that can sit in an [`IndexedHeap`].
pub trait HeapItem {
    /// Slot last assigned by the heap holding this item.
    fn heap_slot(&self) -> usize;

    fn set_heap_slot(&mut self, slot: usize);

    /// `Greater` means `self` is dequeued before `other`.
    fn cmp_priority(&self, other: &Self) -> Ordering;
}

/// Contract violations reported by [`IndexedHeap`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeapError {
    /// `pop_best` on an empty heap.
    Empty,
    /// `push` with every preallocated slot already taken.
    CapacityExceeded { capacity: usize },
}

impl fmt::Display for HeapError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "heap: pop from an empty heap"),
            Self::CapacityExceeded { capacity } => {
                write!(f, "heap: capacity of {capacity} items exceeded")
            }
        }
    }
}

impl std::error::Error for HeapError {}

/// A fixed-capacity binary heap over indices into a slice of `T`.
///
/// Ordering comes from [`HeapItem::cmp_priority`], so the same structure
/// serves as a min-heap or a max-heap depending on the item type.
pub struct IndexedHeap<T> {
    slots: Vec<usize>,
    capacity: usize,
    _items: PhantomData<fn(&T)>,
}

impl<T: HeapItem> IndexedHeap<T> {
    /// Create an empty heap that can hold up to `capacity` items.
    pub fn new(capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity),
            capacity,
            _items: PhantomData,
        }
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
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Drop every entry. Slot fields on the items are left stale, which
    /// [`contains`](Self::contains) tolerates.
    #[inline]
    pub fn clear(&mut self) {
        self.slots.clear();
    }

    /// Grow the preallocated capacity to at least `capacity`.
    pub fn reserve_to(&mut self, capacity: usize) {
        if capacity > self.capacity {
            self.slots.reserve(capacity - self.slots.len());
            self.capacity = capacity;
        }
    }

    /// Index of the best item without removing it.
    #[inline]
    pub fn peek_best(&self) -> Option<usize> {
        self.slots.first().copied()
    }

    /// Insert `items[index]`.
    pub fn push(&mut self, items: &mut [T], index: usize) -> Result<(), HeapError> {
        if self.slots.len() >= self.capacity {
            return Err(HeapError::CapacityExceeded {
                capacity: self.capacity,
            });
        }
        let slot = self.slots.len();
        self.slots.push(index);
        items[index].set_heap_slot(slot);
        self.sift_up(items, slot);
        Ok(())
    }

    /// Remove and return the index of the highest-priority item.
    pub fn pop_best(&mut self, items: &mut [T]) -> Result<usize, HeapError> {
        let last = self.slots.pop().ok_or(HeapError::Empty)?;
        if self.slots.is_empty() {
            return Ok(last);
        }
        let best = self.slots[0];
        self.slots[0] = last;
        items[last].set_heap_slot(0);
        self.sift_down(items, 0);
        Ok(best)
    }

    /// Whether `items[index]` is currently in this heap.
    #[inline]
    pub fn contains(&self, items: &[T], index: usize) -> bool {
        let slot = items[index].heap_slot();
        self.slots.get(slot) == Some(&index)
    }

    /// Restore heap order after `items[index]` gained priority.
    ///
    /// Only sifts up: lowering an item's priority in place is not
    /// supported.
    pub fn on_cost_changed(&mut self, items: &mut [T], index: usize) {
        debug_assert!(self.contains(items, index), "item {index} is not in the heap");
        let slot = items[index].heap_slot();
        self.sift_up(items, slot);
    }

    fn sift_up(&mut self, items: &mut [T], mut slot: usize) {
        while slot > 0 {
            let parent = (slot - 1) / 2;
            let (child_item, parent_item) = (&items[self.slots[slot]], &items[self.slots[parent]]);
            if child_item.cmp_priority(parent_item) != Ordering::Greater {
                break;
            }
            self.swap(items, slot, parent);
            slot = parent;
        }
    }

    fn sift_down(&mut self, items: &mut [T], mut slot: usize) {
        let len = self.slots.len();
        loop {
            let left = slot * 2 + 1;
            if left >= len {
                break;
            }
            let right = left + 1;
            let mut best = left;
            if right < len
                && items[self.slots[right]].cmp_priority(&items[self.slots[left]])
                    == Ordering::Greater
            {
                best = right;
            }
            if items[self.slots[best]].cmp_priority(&items[self.slots[slot]]) != Ordering::Greater {
                break;
            }
            self.swap(items, slot, best);
            slot = best;
        }
    }

    #[inline]
    fn swap(&mut self, items: &mut [T], a: usize, b: usize) {
        self.slots.swap(a, b);
        items[self.slots[a]].set_heap_slot(a);
        items[self.slots[b]].set_heap_slot(b);
    }

    #[cfg(test)]
    fn is_valid(&self, items: &[T]) -> bool {
        self.slots.iter().enumerate().all(|(slot, &idx)| {
            let synced = items[idx].heap_slot() == slot;
            let ordered = slot == 0
                || items[self.slots[(slot - 1) / 2]].cmp_priority(&items[idx]) != Ordering::Less;
            synced && ordered
        })
    }
}
