// model = "claude-opus-4-5"
// created = 2026-10-19
// modified = 2026-10-19
// driver = "Isaac Clayton"

//! Max-priority queue on top of a treap.
//!
//! Entries are keyed by `Reverse(priority)`, so the most urgent entry is the
//! leftmost node. Equal priorities are stored to the right of existing ones
//! and therefore pop in the order they were pushed.

use std::cmp::Reverse;

use crate::aggregate::NoAggregate;
use crate::config::Config;
use crate::error::Error;
use crate::error::Result;
use crate::policy::AllowDuplicates;
use crate::treap::Treap;

/// A queue yielding the highest priority first, ties in push order.
#[derive(Clone, Debug)]
pub struct PriorityQueue<P, T> {
    tree: Treap<Reverse<P>, T, NoAggregate, AllowDuplicates>,
    len: usize,
}

impl<P: Ord, T> PriorityQueue<P, T> {
    pub fn new() -> Self {
        return PriorityQueue {
            tree: Treap::new(),
            len: 0,
        };
    }

    pub fn with_seed(seed: u64) -> Self {
        return PriorityQueue {
            tree: Treap::with_seed(seed),
            len: 0,
        };
    }

    pub fn from_config(config: &Config) -> Self {
        return PriorityQueue {
            tree: Treap::from_config(config),
            len: 0,
        };
    }

    pub fn push(&mut self, priority: P, item: T) {
        let outcome = self.tree.insert(Reverse(priority), item);
        debug_assert!(outcome.is_added());
        self.len += 1;
        debug_assert_eq!(self.len, self.tree.len());
    }

    /// The entry `pop` would return next.
    pub fn peek(&self) -> Option<(&P, &T)> {
        return self.tree.first().map(|(Reverse(p), item)| (p, item));
    }

    /// Remove the highest-priority entry.
    pub fn pop(&mut self) -> Result<(P, T)> {
        let Some((Reverse(priority), item)) = self.tree.remove_first() else {
            log::debug!("pop on an empty priority queue");
            return Err(Error::EmptyQueue);
        };
        self.len -= 1;
        debug_assert_eq!(self.len, self.tree.len());
        return Ok((priority, item));
    }

    #[inline]
    pub fn len(&self) -> usize {
        return self.len;
    }

    pub fn is_empty(&self) -> bool {
        return self.len == 0;
    }

    pub fn clear(&mut self) {
        self.tree.clear();
        self.len = 0;
    }

    /// Entries in pop order, without removing them.
    pub fn iter(&self) -> impl Iterator<Item = (&P, &T)> {
        return self.tree.iter().map(|(Reverse(p), item)| (p, item));
    }
}

impl<P: Ord, T> Default for PriorityQueue<P, T> {
    fn default() -> Self {
        return Self::new();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pops_highest_first() {
        let mut queue = PriorityQueue::with_seed(1);
        for p in [10, 30, 20, 50, 5] {
            queue.push(p, p * 100);
        }
        assert_eq!(queue.peek(), Some((&50, &5000)));
        let mut order = vec![];
        while let Ok((p, item)) = queue.pop() {
            assert_eq!(item, p * 100);
            order.push(p);
        }
        assert_eq!(order, vec![50, 30, 20, 10, 5]);
    }

    #[test]
    fn empty_pop_is_an_error() {
        let mut queue: PriorityQueue<u8, ()> = PriorityQueue::with_seed(1);
        assert_eq!(queue.pop(), Err(Error::EmptyQueue));
        assert_eq!(queue.peek(), None);
        queue.push(1, ());
        assert!(queue.pop().is_ok());
        assert_eq!(queue.pop(), Err(Error::EmptyQueue));
        assert_eq!(queue.len(), 0);
    }

    #[test]
    fn ties_pop_in_push_order() {
        let mut queue = PriorityQueue::with_seed(9);
        queue.push(2, "first");
        queue.push(7, "urgent");
        queue.push(2, "second");
        queue.push(2, "third");
        let drained: Vec<_> = std::iter::from_fn(|| queue.pop().ok()).map(|(_, s)| s).collect();
        assert_eq!(drained, vec!["urgent", "first", "second", "third"]);
    }

    #[test]
    fn len_tracks_pushes_and_pops() {
        let mut queue = PriorityQueue::with_seed(4);
        for p in 0..100u32 {
            queue.push(p % 7, p);
        }
        assert_eq!(queue.len(), 100);
        for _ in 0..40 {
            queue.pop().unwrap();
        }
        assert_eq!(queue.len(), 60);
        assert_eq!(queue.iter().count(), 60);
        queue.clear();
        assert!(queue.is_empty());
    }

    #[test]
    fn iter_matches_pop_order() {
        let mut queue = PriorityQueue::with_seed(12);
        for (p, s) in [(1, 'a'), (3, 'b'), (3, 'c'), (0, 'd')] {
            queue.push(p, s);
        }
        let listed: Vec<char> = queue.iter().map(|(_, s)| *s).collect();
        assert_eq!(listed, vec!['b', 'c', 'a', 'd']);
    }
}
