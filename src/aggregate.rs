// model = "claude-opus-4-5"
// created = 2026-10-19
// modified = 2026-10-19
// driver = "Isaac Clayton"

//! Per-node aggregates.
//!
//! Every node caches `combine(own, left, right)` for one aggregate, recomputed
//! bottom-up whenever the node or either child changes. Subtree size is always
//! tracked alongside, so the aggregate here is the *extra* summary a variant
//! needs:
//!
//! - `NoAggregate`: plain map, order statistics only.
//! - `MaxValue`: largest payload in the subtree, for range-maximum queries.
//! - `MaxEnd`: largest interval end in the subtree, for overlap queries.

use std::fmt::Debug;

use crate::interval::Interval;

/// A summary of a subtree, built from its entries.
pub trait Aggregate<K, V>: Clone + Debug {
    /// The aggregate of a single entry.
    fn from_entry(key: &K, value: &V) -> Self;

    /// Combine two aggregates.
    fn combine(&self, other: &Self) -> Self;
}

/// Tracks nothing beyond subtree size.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct NoAggregate;

impl<K, V> Aggregate<K, V> for NoAggregate {
    #[inline]
    fn from_entry(_key: &K, _value: &V) -> Self {
        return NoAggregate;
    }

    #[inline]
    fn combine(&self, _other: &Self) -> Self {
        return NoAggregate;
    }
}

/// Maximum payload in a subtree.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MaxValue<V>(pub V);

impl<K, V: Ord + Clone + Debug> Aggregate<K, V> for MaxValue<V> {
    fn from_entry(_key: &K, value: &V) -> Self {
        return MaxValue(value.clone());
    }

    fn combine(&self, other: &Self) -> Self {
        if other.0 > self.0 {
            return other.clone();
        }
        return self.clone();
    }
}

/// Maximum interval end in a subtree.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MaxEnd<T>(pub T);

impl<T: Ord + Clone + Debug, V> Aggregate<Interval<T>, V> for MaxEnd<T> {
    fn from_entry(key: &Interval<T>, _value: &V) -> Self {
        return MaxEnd(key.end.clone());
    }

    fn combine(&self, other: &Self) -> Self {
        if other.0 > self.0 {
            return other.clone();
        }
        return self.clone();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn max_value_combine() {
        let a = MaxValue(5);
        let b = MaxValue(3);
        assert_eq!(Aggregate::<u8, i32>::combine(&a, &b), MaxValue(5));
        assert_eq!(Aggregate::<u8, i32>::combine(&b, &a), MaxValue(5));
    }

    #[test]
    fn max_value_from_entry_ignores_key() {
        let agg: MaxValue<i32> = Aggregate::<&str, i32>::from_entry(&"k", &-7);
        assert_eq!(agg, MaxValue(-7));
    }

    #[test]
    fn max_end_reads_interval_end() {
        let interval = Interval::new(3, 11).unwrap();
        let a: MaxEnd<i32> = Aggregate::<Interval<i32>, ()>::from_entry(&interval, &());
        assert_eq!(a, MaxEnd(11));
        let b = MaxEnd(20);
        assert_eq!(Aggregate::<Interval<i32>, ()>::combine(&a, &b), MaxEnd(20));
    }
}
