//! One-shot deferred callbacks keyed by fire time
//!
//! Entries fire in order of fire time; entries with the same fire time fire
//! in the order they were scheduled. Nothing is polled: the owner drains the
//! due entries once per tick with [`Scheduler::pop_due`].

use std::cmp::Ordering;
use std::collections::BinaryHeap;

struct Entry<T> {
    fire_at: f32,
    seq: u64,
    item: T,
}

// Reversed so the max-heap pops the earliest entry first.
impl<T> Ord for Entry<T> {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .fire_at
            .total_cmp(&self.fire_at)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

impl<T> PartialOrd for Entry<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T> PartialEq for Entry<T> {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl<T> Eq for Entry<T> {}

/// Priority queue of pending one-shot callbacks.
pub struct Scheduler<T> {
    entries: BinaryHeap<Entry<T>>,
    seq: u64,
}

impl<T> Default for Scheduler<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Scheduler<T> {
    pub fn new() -> Self {
        Self {
            entries: BinaryHeap::new(),
            seq: 0,
        }
    }

    /// Schedule `item` to fire once time reaches `fire_at`.
    pub fn schedule(&mut self, fire_at: f32, item: T) {
        self.seq += 1;
        self.entries.push(Entry {
            fire_at,
            seq: self.seq,
            item,
        });
    }

    /// Remove the earliest entry if it is due at `now`.
    pub fn pop_due(&mut self, now: f32) -> Option<(f32, T)> {
        if self.entries.peek()?.fire_at > now {
            return None;
        }
        self.entries.pop().map(|entry| (entry.fire_at, entry.item))
    }

    /// Fire time of the earliest pending entry.
    pub fn next_fire_at(&self) -> Option<f32> {
        self.entries.peek().map(|entry| entry.fire_at)
    }

    /// Drop every pending entry.
    pub fn cancel_all(&mut self) -> usize {
        let cancelled = self.entries.len();
        self.entries.clear();
        cancelled
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
