//! LRU Core Module
//!
//! Fixed-capacity, recency-ordered key/value map with O(1) get, put, delete
//! and eviction.
//!
//! Entries live in a slot arena (`Vec<Slot>`). The recency order is a doubly
//! linked list threaded through the arena by slot index:
//! - `head` = most recently used
//! - `tail` = least recently used
//!
//! The index maps each key to its slot. Vacated slots are chained into a free
//! list and reused, so the arena never grows past `capacity` slots.

use std::collections::HashMap;
use std::hash::Hash;

use thiserror::Error;

use crate::cache::{CacheEntry, CacheStats};

/// Null link.
const NIL: usize = usize::MAX;

#[derive(Debug)]
struct Slot<K, V> {
    /// `None` while the slot sits on the free list
    entry: Option<CacheEntry<K, V>>,
    prev: usize,
    next: usize,
}

// == Invariant Violation ==
/// Structural inconsistency found by [`LruCache::check_invariants`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InvariantViolation {
    #[error("{len} resident entries exceed capacity {capacity}")]
    OverCapacity { len: usize, capacity: usize },

    #[error("index holds {index} keys but the recency order links {order}")]
    LengthMismatch { index: usize, order: usize },

    #[error("slot {slot} is linked into the recency order but holds no entry")]
    EmptyLinkedSlot { slot: usize },

    #[error("slot {slot} back-link does not point at its predecessor")]
    BrokenBackLink { slot: usize },

    #[error("key in slot {slot} is not indexed to that slot")]
    DanglingHandle { slot: usize },

    #[error("tail does not point at the last linked slot")]
    TailMismatch,

    #[error("recency order contains a cycle")]
    Cycle,

    #[error("{live} linked plus {free} free slots do not cover the {slots} slot arena")]
    LeakedSlots { live: usize, free: usize, slots: usize },
}

// == LRU Cache ==
/// Single-threaded LRU core.
///
/// Use [`SharedCache`](crate::cache::SharedCache) to share one instance
/// across threads.
pub struct LruCache<K, V> {
    capacity: usize,
    /// Key -> slot index
    index: HashMap<K, usize>,
    slots: Vec<Slot<K, V>>,
    head: usize,
    tail: usize,
    free_head: usize,
    stats: CacheStats,
}

impl<K, V> std::fmt::Debug for LruCache<K, V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LruCache")
            .field("capacity", &self.capacity)
            .field("len", &self.index.len())
            .field("stats", &self.stats)
            .finish()
    }
}

impl<K: Hash + Eq + Clone, V> LruCache<K, V> {
    // == Constructor ==
    /// Creates an empty cache holding at most `capacity` entries.
    ///
    /// # Panics
    /// Panics if `capacity` is 0.
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "LruCache capacity must be > 0");
        Self {
            capacity,
            index: HashMap::with_capacity(capacity),
            slots: Vec::with_capacity(capacity),
            head: NIL,
            tail: NIL,
            free_head: NIL,
            stats: CacheStats::new(capacity),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    // == Stats ==
    /// Returns a snapshot of the cache statistics.
    pub fn stats(&self) -> CacheStats {
        let mut stats = self.stats.clone();
        stats.set_total_entries(self.index.len());
        stats
    }

    // == Get ==
    /// Looks up `key` and marks it most recently used.
    ///
    /// A miss leaves the structure untouched.
    pub fn get(&mut self, key: &K) -> Option<&V> {
        match self.index.get(key).copied() {
            Some(idx) => {
                self.move_to_front(idx);
                self.stats.record_hit();
                self.slots[idx].entry.as_ref().map(|e| &e.value)
            }
            None => {
                self.stats.record_miss();
                None
            }
        }
    }

    /// Looks up `key` without touching the recency order or the counters.
    #[cfg(test)]
    pub(crate) fn peek(&self, key: &K) -> Option<&V> {
        self.index
            .get(key)
            .and_then(|&idx| self.slots[idx].entry.as_ref())
            .map(|e| &e.value)
    }

    #[cfg(test)]
    pub(crate) fn contains(&self, key: &K) -> bool {
        self.index.contains_key(key)
    }

    // == Put ==
    /// Inserts or replaces the value for `key` and marks it most recently used.
    ///
    /// Replacing a resident key never evicts. Inserting a new key into a full
    /// cache first evicts the least recently used entry, which is returned.
    pub fn put(&mut self, key: K, value: V) -> Option<CacheEntry<K, V>> {
        if let Some(&idx) = self.index.get(&key) {
            if let Some(entry) = self.slots[idx].entry.as_mut() {
                entry.value = value;
            }
            self.move_to_front(idx);
            self.stats.record_update();
            return None;
        }

        let evicted = if self.index.len() >= self.capacity {
            self.evict()
        } else {
            None
        };

        let idx = self.alloc(CacheEntry::new(key.clone(), value));
        self.push_front(idx);
        self.index.insert(key, idx);
        self.stats.record_insertion();

        evicted
    }

    // == Delete ==
    /// Removes `key` if present. Absent keys are a no-op.
    pub fn delete(&mut self, key: &K) {
        self.remove(key);
    }

    /// Removes `key`, returning its value.
    fn remove(&mut self, key: &K) -> Option<V> {
        let idx = self.index.remove(key)?;
        self.unlink(idx);
        let entry = self.release(idx);
        self.stats.record_removal();
        entry.map(|e| e.value)
    }

    // == Evict ==
    /// Removes the least recently used entry. No-op on an empty cache.
    fn evict(&mut self) -> Option<CacheEntry<K, V>> {
        if self.tail == NIL {
            return None;
        }
        let idx = self.tail;
        self.unlink(idx);
        let entry = self.release(idx)?;
        self.index.remove(&entry.key);
        self.stats.record_eviction();
        Some(entry)
    }

    // == Iteration ==
    /// Iterates entries from most to least recently used.
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            slots: &self.slots,
            current: self.head,
            remaining: self.index.len(),
        }
    }

    /// Keys from most to least recently used.
    pub fn keys_mru(&self) -> Vec<K> {
        self.iter().map(|(k, _)| k.clone()).collect()
    }

    // == Invariant Check ==
    /// Walks the whole structure and verifies that the index and the recency
    /// order describe the same set of entries.
    pub fn check_invariants(&self) -> Result<(), InvariantViolation> {
        if self.index.len() > self.capacity {
            return Err(InvariantViolation::OverCapacity {
                len: self.index.len(),
                capacity: self.capacity,
            });
        }

        let mut linked = 0;
        let mut prev = NIL;
        let mut current = self.head;
        while current != NIL {
            if linked >= self.slots.len() {
                return Err(InvariantViolation::Cycle);
            }
            let slot = &self.slots[current];
            let entry = slot
                .entry
                .as_ref()
                .ok_or(InvariantViolation::EmptyLinkedSlot { slot: current })?;
            if slot.prev != prev {
                return Err(InvariantViolation::BrokenBackLink { slot: current });
            }
            if self.index.get(&entry.key) != Some(&current) {
                return Err(InvariantViolation::DanglingHandle { slot: current });
            }
            linked += 1;
            prev = current;
            current = slot.next;
        }

        if self.tail != prev {
            return Err(InvariantViolation::TailMismatch);
        }
        if linked != self.index.len() {
            return Err(InvariantViolation::LengthMismatch {
                index: self.index.len(),
                order: linked,
            });
        }

        let mut free = 0;
        let mut current = self.free_head;
        while current != NIL {
            if free >= self.slots.len() {
                return Err(InvariantViolation::Cycle);
            }
            free += 1;
            current = self.slots[current].next;
        }
        if linked + free != self.slots.len() {
            return Err(InvariantViolation::LeakedSlots {
                live: linked,
                free,
                slots: self.slots.len(),
            });
        }

        Ok(())
    }

    // == Internal List Operations ==

    fn move_to_front(&mut self, idx: usize) {
        if self.head == idx {
            return;
        }
        self.unlink(idx);
        self.push_front(idx);
    }

    fn push_front(&mut self, idx: usize) {
        self.slots[idx].prev = NIL;
        self.slots[idx].next = self.head;
        if self.head != NIL {
            self.slots[self.head].prev = idx;
        }
        self.head = idx;
        if self.tail == NIL {
            self.tail = idx;
        }
    }

    fn unlink(&mut self, idx: usize) {
        let prev = self.slots[idx].prev;
        let next = self.slots[idx].next;

        if prev != NIL {
            self.slots[prev].next = next;
        } else {
            self.head = next;
        }
        if next != NIL {
            self.slots[next].prev = prev;
        } else {
            self.tail = prev;
        }

        self.slots[idx].prev = NIL;
        self.slots[idx].next = NIL;
    }

    /// Places `entry` in a free slot, growing the arena only when none is free.
    fn alloc(&mut self, entry: CacheEntry<K, V>) -> usize {
        if self.free_head != NIL {
            let idx = self.free_head;
            self.free_head = self.slots[idx].next;
            self.slots[idx] = Slot {
                entry: Some(entry),
                prev: NIL,
                next: NIL,
            };
            idx
        } else {
            self.slots.push(Slot {
                entry: Some(entry),
                prev: NIL,
                next: NIL,
            });
            self.slots.len() - 1
        }
    }

    /// Empties an unlinked slot and pushes it on the free list.
    fn release(&mut self, idx: usize) -> Option<CacheEntry<K, V>> {
        let entry = self.slots[idx].entry.take();
        self.slots[idx].next = self.free_head;
        self.free_head = idx;
        entry
    }
}

// == Iterator ==
/// Iterator over `(key, value)` pairs in recency order.
pub struct Iter<'a, K, V> {
    slots: &'a [Slot<K, V>],
    current: usize,
    remaining: usize,
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        if self.current == NIL || self.remaining == 0 {
            return None;
        }
        let slot = &self.slots[self.current];
        self.current = slot.next;
        self.remaining -= 1;
        slot.entry.as_ref().map(|e| (&e.key, &e.value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}
