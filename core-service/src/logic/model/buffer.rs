//! History Buffer - bounded prediction history
//!
//! Fixed-capacity ring buffer in insertion order. Pushing onto a full buffer
//! evicts the oldest entry.

use std::collections::VecDeque;

#[derive(Debug, Clone)]
pub struct HistoryBuffer<T> {
    entries: VecDeque<T>,
    capacity: usize,
}

impl<T> HistoryBuffer<T> {
    /// `capacity` is raised to at least 1
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Push an entry, returning the evicted one if the buffer was full
    pub fn push(&mut self, entry: T) -> Option<T> {
        let evicted = if self.entries.len() == self.capacity {
            self.entries.pop_front()
        } else {
            None
        };
        self.entries.push_back(entry);
        evicted
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn is_full(&self) -> bool {
        self.entries.len() == self.capacity
    }

    /// Most recent entry
    pub fn latest(&self) -> Option<&T> {
        self.entries.back()
    }

    /// Oldest -> newest
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &T> {
        self.entries.iter()
    }

    /// Newest -> oldest
    pub fn latest_first(&self) -> impl Iterator<Item = &T> {
        self.entries.iter().rev()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn fill(&self) -> HistoryFill {
        HistoryFill {
            entries: self.entries.len(),
            capacity: self.capacity,
            percent: (self.entries.len() * 100 / self.capacity) as u8,
        }
    }
}

/// How much of the history window is populated
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HistoryFill {
    pub entries: usize,
    pub capacity: usize,
    pub percent: u8,
}
