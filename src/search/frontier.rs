//! Min-priority frontier for cost-ordered searches.
//!
//! Entries pop in ascending `(cost, hash, insertion sequence)` order. The
//! state hash and the sequence number make ties resolve the same way on
//! every run, independent of the payload type.

use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;

/// Heap entry. Only the key participates in ordering.
#[derive(Debug)]
struct Entry<T> {
    cost: u32,
    hash: u64,
    seq: u64,
    item: T,
}

impl<T> Entry<T> {
    fn key(&self) -> (u32, u64, u64) {
        (self.cost, self.hash, self.seq)
    }
}

impl<T> PartialEq for Entry<T> {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl<T> Eq for Entry<T> {}

impl<T> Ord for Entry<T> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.key().cmp(&other.key())
    }
}

impl<T> PartialOrd for Entry<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// A min-priority queue keyed by cost.
#[derive(Debug)]
pub struct PriorityQueue<T> {
    heap: BinaryHeap<Reverse<Entry<T>>>,
    next_seq: u64,
}

impl<T> Default for PriorityQueue<T> {
    fn default() -> Self {
        Self {
            heap: BinaryHeap::new(),
            next_seq: 0,
        }
    }
}

impl<T> PriorityQueue<T> {
    /// Create an empty queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert `item` with priority `cost`. `hash` breaks ties between equal costs.
    pub fn push(&mut self, cost: u32, hash: u64, item: T) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.heap.push(Reverse(Entry {
            cost,
            hash,
            seq,
            item,
        }));
    }

    /// Remove and return the cheapest entry as `(cost, item)`.
    pub fn pop(&mut self) -> Option<(u32, T)> {
        self.heap.pop().map(|Reverse(e)| (e.cost, e.item))
    }

    /// Cost of the cheapest entry.
    #[must_use]
    pub fn peek_cost(&self) -> Option<u32> {
        self.heap.peek().map(|Reverse(e)| e.cost)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.heap.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pops_cheapest_first() {
        let mut q = PriorityQueue::new();
        q.push(5, 0, "five");
        q.push(1, 0, "one");
        q.push(3, 0, "three");

        assert_eq!(q.len(), 3);
        assert_eq!(q.peek_cost(), Some(1));
        assert_eq!(q.pop(), Some((1, "one")));
        assert_eq!(q.pop(), Some((3, "three")));
        assert_eq!(q.pop(), Some((5, "five")));
        assert_eq!(q.pop(), None);
        assert!(q.is_empty());
    }

    #[test]
    fn test_ties_break_on_hash_then_insertion() {
        let mut q = PriorityQueue::new();
        q.push(2, 9, 'a');
        q.push(2, 4, 'b');
        q.push(2, 4, 'c');
        q.push(2, 7, 'd');

        let order: Vec<char> = std::iter::from_fn(|| q.pop().map(|(_, c)| c)).collect();
        assert_eq!(order, vec!['b', 'c', 'd', 'a']);
    }

    #[test]
    fn test_payload_needs_no_ordering() {
        struct Opaque;
        let mut q = PriorityQueue::new();
        q.push(1, 0, Opaque);
        q.push(0, 0, Opaque);
        assert_eq!(q.pop().map(|(c, _)| c), Some(0));
    }
}
