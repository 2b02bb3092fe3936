// model = "claude-opus-4-5"
// created = 2026-10-19
// modified = 2026-10-19
// driver = "Isaac Clayton"

//! Closed intervals and the overlap query.
//!
//! Intervals are keyed by `(start, end)` and every node caches the largest
//! `end` in its subtree ([`MaxEnd`]). A query `q` descends left only when the
//! left subtree reaches `q.start`, and right only when the current node starts
//! no later than `q.end`, since everything to the right starts later still.

use std::fmt::Debug;

use smallvec::SmallVec;

use crate::aggregate::MaxEnd;
use crate::config::Config;
use crate::error::Error;
use crate::error::Result;
use crate::node::Idx;
use crate::node::NULL;
use crate::policy::AllowDuplicates;
use crate::policy::DuplicatePolicy;
use crate::treap::Treap;

/// Closed interval `[start, end]`. Ordered by start, then end.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Interval<T> {
    pub start: T,
    pub end: T,
}

impl<T: Ord> Interval<T> {
    pub fn new(start: T, end: T) -> Result<Interval<T>> {
        if start > end {
            return Err(Error::InvalidInterval);
        }
        return Ok(Interval { start, end });
    }

    /// Whether the two closed intervals share at least one point.
    #[inline]
    pub fn overlaps(&self, other: &Interval<T>) -> bool {
        return !(self.end < other.start || other.end < self.start);
    }

    fn is_valid(&self) -> bool {
        return self.start <= self.end;
    }
}

impl<T, V, P> Treap<Interval<T>, V, MaxEnd<T>, P>
where
    T: Ord + Clone + Debug,
    P: DuplicatePolicy<V>,
{
    /// Every stored interval overlapping `query`, ordered by start.
    pub fn overlapping(&self, query: &Interval<T>) -> Vec<(&Interval<T>, &V)> {
        let mut out = Vec::new();
        let mut stack: SmallVec<[Idx; 32]> = SmallVec::new();
        let mut idx = self.root();
        loop {
            while idx != NULL {
                stack.push(idx);
                let left = self.node(idx).left;
                idx = if left != NULL && self.node(left).agg.0 >= query.start {
                    left
                } else {
                    NULL
                };
            }
            let Some(top) = stack.pop() else {
                break;
            };
            let node = self.node(top);
            if node.key.overlaps(query) {
                out.push((&node.key, &node.value));
            }
            idx = if node.key.start <= query.end {
                node.right
            } else {
                NULL
            };
        }
        return out;
    }
}

/// A multiset of intervals, each carrying a payload.
///
/// Identical intervals may be stored more than once.
#[derive(Clone, Debug)]
pub struct IntervalTreap<T, V = ()> {
    tree: Treap<Interval<T>, V, MaxEnd<T>, AllowDuplicates>,
}

impl<T, V> IntervalTreap<T, V>
where
    T: Ord + Clone + Debug,
{
    pub fn new() -> Self {
        return IntervalTreap { tree: Treap::new() };
    }

    pub fn with_seed(seed: u64) -> Self {
        return IntervalTreap {
            tree: Treap::with_seed(seed),
        };
    }

    pub fn from_config(config: &Config) -> Self {
        return IntervalTreap {
            tree: Treap::from_config(config),
        };
    }

    pub fn len(&self) -> usize {
        return self.tree.len();
    }

    pub fn is_empty(&self) -> bool {
        return self.tree.is_empty();
    }

    /// Store `interval`. Fails if its start is after its end.
    pub fn insert(&mut self, interval: Interval<T>, value: V) -> Result<()> {
        if !interval.is_valid() {
            log::debug!("interval insert rejected: {:?}", interval);
            return Err(Error::InvalidInterval);
        }
        self.tree.insert(interval, value);
        return Ok(());
    }

    /// Remove one stored copy of `interval`, returning its payload.
    pub fn remove(&mut self, interval: &Interval<T>) -> Option<V> {
        return self.tree.remove(interval);
    }

    pub fn contains(&self, interval: &Interval<T>) -> bool {
        return self.tree.contains_key(interval);
    }

    /// Every stored interval overlapping `query`, ordered by start.
    pub fn overlapping(&self, query: &Interval<T>) -> Vec<(&Interval<T>, &V)> {
        return self.tree.overlapping(query);
    }

    /// Largest end point of any stored interval.
    pub fn max_end(&self) -> Option<&T> {
        return self.tree.aggregate().map(|agg| &agg.0);
    }

    /// Intervals in `(start, end)` order.
    pub fn iter(&self) -> impl Iterator<Item = (&Interval<T>, &V)> {
        return self.tree.iter();
    }

    pub fn check_invariants(&self) -> Result<()> {
        return self.tree.check_invariants();
    }
}

impl<T, V> Default for IntervalTreap<T, V>
where
    T: Ord + Clone + Debug,
{
    fn default() -> Self {
        return Self::new();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn iv(start: i32, end: i32) -> Interval<i32> {
        return Interval::new(start, end).unwrap();
    }

    fn sample() -> IntervalTreap<i32> {
        let mut tree = IntervalTreap::with_seed(21);
        for (s, e) in [(15, 20), (10, 30), (17, 19), (5, 20), (12, 15), (30, 40)] {
            tree.insert(iv(s, e), ()).unwrap();
        }
        return tree;
    }

    #[test]
    fn rejects_reversed_interval() {
        assert_eq!(Interval::new(5, 1), Err(Error::InvalidInterval));
        let mut tree: IntervalTreap<i32> = IntervalTreap::with_seed(1);
        let bad = Interval { start: 5, end: 1 };
        assert_eq!(tree.insert(bad, ()), Err(Error::InvalidInterval));
        assert!(tree.is_empty());
    }

    #[test]
    fn point_intervals_are_valid() {
        let point = iv(4, 4);
        assert!(point.overlaps(&iv(4, 9)));
        assert!(point.overlaps(&iv(0, 4)));
        assert!(!point.overlaps(&iv(5, 9)));
    }

    #[test]
    fn overlap_query_scenario() {
        let tree = sample();
        let hits: Vec<_> = tree
            .overlapping(&iv(14, 16))
            .into_iter()
            .map(|(i, _)| (i.start, i.end))
            .collect();
        assert_eq!(hits, vec![(5, 20), (10, 30), (12, 15), (15, 20)]);
        tree.check_invariants().unwrap();
    }

    #[test]
    fn touching_endpoints_overlap() {
        let tree = sample();
        let hits = tree.overlapping(&iv(40, 50));
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].0, &iv(30, 40));
    }

    #[test]
    fn disjoint_query_finds_nothing() {
        let tree = sample();
        assert!(tree.overlapping(&iv(41, 100)).is_empty());
        assert!(tree.overlapping(&iv(0, 4)).is_empty());
    }

    #[test]
    fn max_end_tracks_removals() {
        let mut tree = sample();
        assert_eq!(tree.max_end(), Some(&40));
        assert_eq!(tree.remove(&iv(30, 40)), Some(()));
        assert_eq!(tree.max_end(), Some(&30));
        assert_eq!(tree.remove(&iv(30, 40)), None);
        tree.check_invariants().unwrap();
    }

    #[test]
    fn overlap_query_on_degenerate_chain() {
        let n = 100_000;
        let mut tree: Treap<Interval<i32>, (), MaxEnd<i32>, AllowDuplicates> =
            Treap::with_seed(0);
        for k in 0..n {
            tree.insert_with_priority(iv(k, k + 1), (), k as u64);
        }
        let hits: Vec<_> = tree
            .overlapping(&iv(0, 1))
            .into_iter()
            .map(|(i, _)| (i.start, i.end))
            .collect();
        assert_eq!(hits, vec![(0, 1), (1, 2)]);
        assert_eq!(tree.overlapping(&iv(n, n + 5)).len(), 1);
        assert_eq!(tree.remove(&iv(0, 1)), Some(()));
        tree.check_invariants().unwrap();
    }

    #[test]
    fn identical_intervals_are_kept() {
        let mut tree: IntervalTreap<i32, &str> = IntervalTreap::with_seed(2);
        tree.insert(iv(1, 3), "a").unwrap();
        tree.insert(iv(1, 3), "b").unwrap();
        assert_eq!(tree.len(), 2);
        let payloads: Vec<_> = tree.overlapping(&iv(2, 2)).into_iter().map(|(_, v)| *v).collect();
        assert_eq!(payloads, vec!["a", "b"]);
        assert!(tree.remove(&iv(1, 3)).is_some());
        assert_eq!(tree.len(), 1);
        assert!(tree.contains(&iv(1, 3)));
    }
}
