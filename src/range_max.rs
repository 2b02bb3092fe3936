// model = "claude-opus-4-5"
// created = 2026-10-19
// modified = 2026-10-19
// driver = "Isaac Clayton"

//! Maximum payload over a key range.
//!
//! With [`MaxValue`] cached at every node, `max_in_range(lo, hi)` costs one
//! descent plus two boundary walks:
//!
//! 1. Descend from the root to the first node whose key lies in `[lo, hi]`.
//!    Every key below it on the left is `<= hi`, every key on the right is
//!    `>= lo`.
//! 2. Walk the left subtree toward `lo`. A node with key `>= lo` is in range
//!    along with its whole right subtree, so fold its value and the right
//!    child's cached maximum, then go left. A node below `lo` is out, go right.
//! 3. Mirror step 2 on the right subtree toward `hi`.
//!
//! Expected O(log n) nodes are visited regardless of how many keys fall in the
//! range.

use std::fmt::Debug;

use crate::aggregate::MaxValue;
use crate::node::NULL;
use crate::policy::DuplicatePolicy;
use crate::treap::Treap;

impl<K, V, P> Treap<K, V, MaxValue<V>, P>
where
    K: Ord,
    V: Ord + Clone + Debug,
    P: DuplicatePolicy<V>,
{
    /// Largest payload among entries with `lo <= key <= hi`, or `None` when
    /// no key falls in the range.
    pub fn max_in_range(&self, lo: &K, hi: &K) -> Option<&V> {
        if lo > hi {
            return None;
        }

        let mut idx = self.root();
        while idx != NULL {
            let node = self.node(idx);
            if node.key < *lo {
                idx = node.right;
            } else if node.key > *hi {
                idx = node.left;
            } else {
                break;
            }
        }
        if idx == NULL {
            return None;
        }

        let split = self.node(idx);
        let mut best = &split.value;

        let mut cur = split.left;
        while cur != NULL {
            let node = self.node(cur);
            if node.key < *lo {
                cur = node.right;
                continue;
            }
            if node.value > *best {
                best = &node.value;
            }
            if node.right != NULL {
                let agg = &self.node(node.right).agg.0;
                if *agg > *best {
                    best = agg;
                }
            }
            cur = node.left;
        }

        let mut cur = split.right;
        while cur != NULL {
            let node = self.node(cur);
            if node.key > *hi {
                cur = node.left;
                continue;
            }
            if node.value > *best {
                best = &node.value;
            }
            if node.left != NULL {
                let agg = &self.node(node.left).agg.0;
                if *agg > *best {
                    best = agg;
                }
            }
            cur = node.right;
        }

        return Some(best);
    }
}

#[cfg(test)]
mod tests {
    use crate::aggregate::MaxValue;
    use crate::policy::AllowDuplicates;
    use crate::policy::Overwrite;
    use crate::treap::Treap;

    type MaxTree = Treap<i32, i32, MaxValue<i32>, Overwrite>;

    fn brute(entries: &[(i32, i32)], lo: i32, hi: i32) -> Option<i32> {
        return entries
            .iter()
            .filter(|(k, _)| *k >= lo && *k <= hi)
            .map(|(_, v)| *v)
            .max();
    }

    #[test]
    fn empty_tree_has_no_max() {
        let tree: MaxTree = Treap::with_seed(1);
        assert_eq!(tree.max_in_range(&0, &100), None);
    }

    #[test]
    fn range_outside_keys() {
        let mut tree: MaxTree = Treap::with_seed(1);
        for k in [10, 20, 30] {
            tree.insert(k, k);
        }
        assert_eq!(tree.max_in_range(&31, &40), None);
        assert_eq!(tree.max_in_range(&11, &19), None);
        assert_eq!(tree.max_in_range(&30, &10), None);
    }

    #[test]
    fn single_key_range() {
        let mut tree: MaxTree = Treap::with_seed(1);
        for k in [10, 20, 30] {
            tree.insert(k, k * 2);
        }
        assert_eq!(tree.max_in_range(&20, &20), Some(&40));
    }

    #[test]
    fn matches_scan_on_every_range() {
        let entries: Vec<(i32, i32)> = (0..60).map(|k| (k * 3, (k * 37) % 101)).collect();
        let mut tree: MaxTree = Treap::with_seed(6);
        for (k, v) in &entries {
            tree.insert(*k, *v);
        }
        for lo in -2..182 {
            for hi in lo..182 {
                assert_eq!(
                    tree.max_in_range(&lo, &hi).copied(),
                    brute(&entries, lo, hi),
                    "range [{}, {}]",
                    lo,
                    hi
                );
            }
        }
    }

    #[test]
    fn overwrite_refreshes_maximum() {
        let mut tree: MaxTree = Treap::with_seed(3);
        for k in 0..20 {
            tree.insert(k, 1);
        }
        tree.insert(7, 99);
        assert_eq!(tree.max_in_range(&0, &19), Some(&99));
        tree.insert(7, 0);
        assert_eq!(tree.max_in_range(&0, &19), Some(&1));
        tree.remove(&7);
        tree.check_invariants().unwrap();
    }

    #[test]
    fn duplicates_are_all_counted() {
        let mut tree: Treap<i32, i32, MaxValue<i32>, AllowDuplicates> = Treap::with_seed(5);
        for v in [3, 9, 4] {
            tree.insert(5, v);
        }
        tree.insert(4, 100);
        tree.insert(6, 200);
        assert_eq!(tree.max_in_range(&5, &5), Some(&9));
        tree.check_invariants().unwrap();
    }
}
