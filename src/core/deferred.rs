//! Timestamp-compared deferred actions
//!
//! Replaces scheduled callbacks: an action is stored with the scene time at
//! which it becomes due, and the tick loop drains everything that is due.
//! Nothing runs on its own, so dropping the queue cancels every pending action.

use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;

use ordered_float::OrderedFloat;

use crate::core::types::Seconds;

#[derive(Debug)]
struct Pending<T> {
    due: OrderedFloat<Seconds>,
    /// Insertion order, keeps equal due times FIFO
    seq: u64,
    action: T,
}

impl<T> PartialEq for Pending<T> {
    fn eq(&self, other: &Self) -> bool {
        self.due == other.due && self.seq == other.seq
    }
}

impl<T> Eq for Pending<T> {}

impl<T> PartialOrd for Pending<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T> Ord for Pending<T> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.due
            .cmp(&other.due)
            .then_with(|| self.seq.cmp(&other.seq))
    }
}

/// Min-heap of actions keyed by due time
#[derive(Debug)]
pub struct DeferredQueue<T> {
    heap: BinaryHeap<Reverse<Pending<T>>>,
    next_seq: u64,
}

impl<T> DeferredQueue<T> {
    pub fn new() -> Self {
        Self {
            heap: BinaryHeap::new(),
            next_seq: 0,
        }
    }

    /// Schedule an action to become due at `due`
    pub fn schedule(&mut self, due: Seconds, action: T) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.heap.push(Reverse(Pending {
            due: OrderedFloat(due),
            seq,
            action,
        }));
    }

    /// Remove and return every action due at or before `now`, earliest first
    pub fn drain_due(&mut self, now: Seconds) -> Vec<T> {
        let mut due = Vec::new();
        while let Some(Reverse(next)) = self.heap.peek() {
            if next.due.0 > now {
                break;
            }
            if let Some(Reverse(pending)) = self.heap.pop() {
                due.push(pending.action);
            }
        }
        due
    }

    /// Remove and return every pending action regardless of due time
    pub fn drain_all(&mut self) -> Vec<T> {
        let mut all = Vec::with_capacity(self.heap.len());
        while let Some(Reverse(pending)) = self.heap.pop() {
            all.push(pending.action);
        }
        all
    }

    /// Due time of the earliest pending action
    pub fn next_due(&self) -> Option<Seconds> {
        self.heap.peek().map(|Reverse(p)| p.due.0)
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }
}

impl<T> Default for DeferredQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_drains_only_due_actions() {
        let mut queue = DeferredQueue::new();
        queue.schedule(2.0, "late");
        queue.schedule(1.0, "early");

        assert!(queue.drain_due(0.5).is_empty());
        assert_eq!(queue.drain_due(1.0), vec!["early"]);
        assert_eq!(queue.next_due(), Some(2.0));
        assert_eq!(queue.drain_due(5.0), vec!["late"]);
        assert!(queue.is_empty());
    }

    #[test]
    fn test_equal_due_times_are_fifo() {
        let mut queue = DeferredQueue::new();
        queue.schedule(1.0, 'a');
        queue.schedule(1.0, 'b');
        queue.schedule(0.5, 'z');
        queue.schedule(1.0, 'c');

        assert_eq!(queue.drain_due(1.0), vec!['z', 'a', 'b', 'c']);
    }

    #[test]
    fn test_drain_all_ignores_due_time() {
        let mut queue = DeferredQueue::new();
        queue.schedule(10.0, 1);
        queue.schedule(3.0, 2);
        assert_eq!(queue.len(), 2);
        assert_eq!(queue.drain_all(), vec![2, 1]);
        assert_eq!(queue.next_due(), None);
    }
}
