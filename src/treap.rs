// model = "claude-opus-4-5"
// created = 2026-10-19
// modified = 2026-10-19
// driver = "Isaac Clayton"

//! Randomized balanced search tree.
//!
//! A treap is a binary search tree on keys that is simultaneously a max-heap
//! on random priorities. Because priorities are drawn independently, the tree
//! has the shape of a BST built from a random insertion order, which gives
//! expected O(log n) height.
//!
//! # Operations
//!
//! - `insert(key, value)`: O(log n) expected - descend, then rotate the new
//!   leaf up while its priority beats its parent's
//! - `remove(key)`: O(log n) expected - rotate the node down toward the
//!   higher-priority child until it has at most one child, then splice
//! - `get(key)`: O(log n) expected
//! - `select(rank)`: O(log n) expected - uses subtree sizes
//! - `len()`: O(1)
//!
//! # Structure
//!
//! Nodes live in an arena and refer to their children by index, so rotations
//! only rewrite indices. Every node caches its subtree size and an
//! [`Aggregate`]; both are recomputed bottom-up on every return path of every
//! mutation, child before parent.
//!
//! ```text
//!        rotate_right(q)
//!      q               p
//!     / \             / \
//!    p   c    ==>    a   q
//!   / \                 / \
//!  a   b               b   c
//! ```

use std::cmp::Ordering;
use std::marker::PhantomData;

use rand::RngCore;
use rand::SeedableRng;
use rand::rngs::StdRng;
use smallvec::SmallVec;

use crate::aggregate::Aggregate;
use crate::aggregate::NoAggregate;
use crate::config::Config;
use crate::error::Error;
use crate::error::Result;
use crate::node::Idx;
use crate::node::NULL;
use crate::node::Node;
use crate::policy::Collision;
use crate::policy::DuplicatePolicy;
use crate::policy::InsertOutcome;
use crate::policy::Overwrite;

/// Which child a descent took.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Side {
    Left,
    Right,
}

/// Ancestors of the node being worked on, root first, with the side taken
/// below each. Mutations walk this back up instead of recursing, so a
/// degenerate tree (possible with caller-chosen priorities) cannot exhaust
/// the call stack.
type Path = SmallVec<[(Idx, Side); 32]>;

/// A treap mapping `K` to `V`, tracking aggregate `A`, resolving duplicate
/// keys with policy `P`.
#[derive(Clone, Debug)]
pub struct Treap<K, V, A = NoAggregate, P = Overwrite> {
    /// Arena of nodes. `None` marks a free slot.
    nodes: Vec<Option<Node<K, V, A>>>,
    /// Index of the root, or `NULL` when empty.
    root: Idx,
    /// Free list for reusing removed node slots.
    free_list: Vec<Idx>,
    /// Source of node priorities.
    rng: StdRng,
    _policy: PhantomData<P>,
}

// --- Arena access and read-only traversal ---

impl<K, V, A, P> Treap<K, V, A, P> {
    #[inline]
    pub(crate) fn node(&self, idx: Idx) -> &Node<K, V, A> {
        match self.nodes.get(idx as usize) {
            Some(Some(node)) => node,
            _ => panic!("dangling node index {}", idx),
        }
    }

    #[inline]
    fn node_mut(&mut self, idx: Idx) -> &mut Node<K, V, A> {
        match self.nodes.get_mut(idx as usize) {
            Some(Some(node)) => node,
            _ => panic!("dangling node index {}", idx),
        }
    }

    #[inline]
    pub(crate) fn root(&self) -> Idx {
        return self.root;
    }

    fn alloc(&mut self, node: Node<K, V, A>) -> Idx {
        if let Some(idx) = self.free_list.pop() {
            self.nodes[idx as usize] = Some(node);
            return idx;
        }
        let idx = self.nodes.len() as Idx;
        assert!(idx != NULL, "treap arena is full");
        self.nodes.push(Some(node));
        return idx;
    }

    fn free(&mut self, idx: Idx) -> Node<K, V, A> {
        let node = match self.nodes.get_mut(idx as usize).and_then(Option::take) {
            Some(node) => node,
            None => panic!("freeing dangling node index {}", idx),
        };
        self.free_list.push(idx);
        return node;
    }

    #[inline]
    fn size_of(&self, idx: Idx) -> usize {
        if idx == NULL {
            return 0;
        }
        return self.node(idx).size;
    }

    /// Number of entries.
    #[inline]
    pub fn len(&self) -> usize {
        return self.size_of(self.root);
    }

    pub fn is_empty(&self) -> bool {
        return self.root == NULL;
    }

    /// Remove every entry. The priority generator keeps its state.
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.free_list.clear();
        self.root = NULL;
    }

    /// Number of nodes on the longest root-to-leaf path.
    pub fn height(&self) -> usize {
        let mut height = 0;
        let mut stack: SmallVec<[(Idx, usize); 32]> = SmallVec::new();
        if self.root != NULL {
            stack.push((self.root, 1));
        }
        while let Some((idx, depth)) = stack.pop() {
            height = height.max(depth);
            let node = self.node(idx);
            for child in [node.left, node.right] {
                if child != NULL {
                    stack.push((child, depth + 1));
                }
            }
        }
        return height;
    }

    #[inline]
    fn child(&self, idx: Idx, side: Side) -> Idx {
        let node = self.node(idx);
        return match side {
            Side::Left => node.left,
            Side::Right => node.right,
        };
    }

    /// Point the last node on `path` (or the root) at `child`.
    fn link(&mut self, path: &Path, child: Idx) {
        match path.last() {
            None => self.root = child,
            Some(&(parent, Side::Left)) => self.node_mut(parent).left = child,
            Some(&(parent, Side::Right)) => self.node_mut(parent).right = child,
        }
    }

    /// The aggregate of the whole tree.
    pub fn aggregate(&self) -> Option<&A> {
        if self.root == NULL {
            return None;
        }
        return Some(&self.node(self.root).agg);
    }

    /// Entry with the smallest key.
    pub fn first(&self) -> Option<(&K, &V)> {
        let mut idx = self.root;
        if idx == NULL {
            return None;
        }
        while self.node(idx).left != NULL {
            idx = self.node(idx).left;
        }
        let node = self.node(idx);
        return Some((&node.key, &node.value));
    }

    /// Entry with the largest key.
    pub fn last(&self) -> Option<(&K, &V)> {
        let mut idx = self.root;
        if idx == NULL {
            return None;
        }
        while self.node(idx).right != NULL {
            idx = self.node(idx).right;
        }
        let node = self.node(idx);
        return Some((&node.key, &node.value));
    }

    /// In-order iterator over entries.
    pub fn iter(&self) -> Iter<'_, K, V, A> {
        let mut iter = Iter {
            nodes: &self.nodes,
            stack: SmallVec::new(),
            remaining: self.len(),
        };
        iter.push_left(self.root);
        return iter;
    }

    /// All entries in ascending key order.
    pub fn to_vec(&self) -> Vec<(K, V)>
    where
        K: Clone,
        V: Clone,
    {
        return self.iter().map(|(k, v)| (k.clone(), v.clone())).collect();
    }
}

// --- Mutation and keyed queries ---

impl<K, V, A, P> Treap<K, V, A, P>
where
    K: Ord,
    A: Aggregate<K, V>,
    P: DuplicatePolicy<V>,
{
    /// An empty treap with priorities drawn from OS entropy.
    pub fn new() -> Self {
        return Self::with_rng(StdRng::from_entropy());
    }

    /// An empty treap with a deterministic priority sequence.
    pub fn with_seed(seed: u64) -> Self {
        return Self::with_rng(StdRng::seed_from_u64(seed));
    }

    pub fn with_rng(rng: StdRng) -> Self {
        return Treap {
            nodes: Vec::new(),
            root: NULL,
            free_list: Vec::new(),
            rng,
            _policy: PhantomData,
        };
    }

    pub fn from_config(config: &Config) -> Self {
        return Self::with_rng(config.rng(0));
    }

    // --- Balancing primitives ---

    /// Recompute size and aggregate of `idx` from its children.
    fn update(&mut self, idx: Idx) {
        let node = self.node(idx);
        let (left, right) = (node.left, node.right);
        let mut size = 1;
        let mut agg = A::from_entry(&node.key, &node.value);
        if left != NULL {
            let child = self.node(left);
            size += child.size;
            agg = agg.combine(&child.agg);
        }
        if right != NULL {
            let child = self.node(right);
            size += child.size;
            agg = agg.combine(&child.agg);
        }
        let node = self.node_mut(idx);
        node.size = size;
        node.agg = agg;
    }

    /// Lift the left child of `q` above it. Returns the new subtree root.
    fn rotate_right(&mut self, q: Idx) -> Idx {
        let p = self.node(q).left;
        assert!(p != NULL, "rotate_right on a node without a left child");
        let inner = self.node(p).right;
        self.node_mut(q).left = inner;
        self.node_mut(p).right = q;
        self.update(q);
        self.update(p);
        return p;
    }

    /// Lift the right child of `p` above it. Returns the new subtree root.
    fn rotate_left(&mut self, p: Idx) -> Idx {
        let q = self.node(p).right;
        assert!(q != NULL, "rotate_left on a node without a right child");
        let inner = self.node(q).left;
        self.node_mut(p).right = inner;
        self.node_mut(q).left = p;
        self.update(p);
        self.update(q);
        return q;
    }

    // --- Insert ---

    /// Insert with a freshly drawn priority.
    pub fn insert(&mut self, key: K, value: V) -> InsertOutcome<V> {
        let priority = self.rng.next_u64();
        return self.insert_with_priority(key, value, priority);
    }

    /// Insert with a caller-chosen priority. The priority is ignored when the
    /// key collides and the policy does not create a new node.
    ///
    /// Descends to a leaf slot recording the path, attaches the new node, then
    /// rotates it up while its priority beats its parent's. Ancestors above
    /// the last rotation get their size and aggregate refreshed.
    pub fn insert_with_priority(&mut self, key: K, value: V, priority: u64) -> InsertOutcome<V> {
        let mut path = Path::new();
        let mut idx = self.root;
        while idx != NULL {
            let side = match key.cmp(&self.node(idx).key) {
                Ordering::Less => Side::Left,
                Ordering::Greater => Side::Right,
                Ordering::Equal => match P::on_collision(&self.node(idx).value, &value) {
                    Collision::Replace => {
                        let old = std::mem::replace(&mut self.node_mut(idx).value, value);
                        self.update(idx);
                        self.update_path(&path);
                        return InsertOutcome::Replaced(old);
                    }
                    Collision::Keep => return InsertOutcome::Rejected(value),
                    Collision::Duplicate => Side::Right,
                },
            };
            path.push((idx, side));
            idx = self.child(idx, side);
        }

        let agg = A::from_entry(&key, &value);
        let mut cur = self.alloc(Node::new(key, value, priority, agg));
        self.link(&path, cur);

        while let Some(&(parent, side)) = path.last() {
            if self.node(cur).priority <= self.node(parent).priority {
                break;
            }
            path.pop();
            cur = match side {
                Side::Left => self.rotate_right(parent),
                Side::Right => self.rotate_left(parent),
            };
            self.link(&path, cur);
        }
        self.update_path(&path);
        return InsertOutcome::Added;
    }

    /// Refresh every node on `path`, deepest first.
    fn update_path(&mut self, path: &Path) {
        for &(idx, _) in path.iter().rev() {
            self.update(idx);
        }
    }

    // --- Erase ---

    /// Remove `key`, returning its payload. Removing an absent key is a no-op.
    pub fn remove(&mut self, key: &K) -> Option<V> {
        let mut path = Path::new();
        let mut idx = self.root;
        loop {
            if idx == NULL {
                log::trace!("remove: key not present ({} entries)", self.len());
                return None;
            }
            let side = match key.cmp(&self.node(idx).key) {
                Ordering::Less => Side::Left,
                Ordering::Greater => Side::Right,
                Ordering::Equal => break,
            };
            path.push((idx, side));
            idx = self.child(idx, side);
        }
        let (_, value) = self.delete_at(path, idx);
        return Some(value);
    }

    /// Remove the entry with the smallest key.
    pub fn remove_first(&mut self) -> Option<(K, V)> {
        if self.root == NULL {
            return None;
        }
        let mut path = Path::new();
        let mut idx = self.root;
        while self.node(idx).left != NULL {
            path.push((idx, Side::Left));
            idx = self.node(idx).left;
        }
        return Some(self.delete_at(path, idx));
    }

    /// Delete `idx`, reached from the root through `path`.
    ///
    /// A node with two children is rotated toward its higher-priority child,
    /// which takes its place, and the deletion continues one level down. Once
    /// the node has at most one child it is spliced out and the path is
    /// refreshed bottom-up.
    fn delete_at(&mut self, mut path: Path, idx: Idx) -> (K, V) {
        loop {
            let (left, right) = {
                let node = self.node(idx);
                (node.left, node.right)
            };

            if left == NULL || right == NULL {
                let child = if left == NULL { right } else { left };
                self.link(&path, child);
                let node = self.free(idx);
                self.update_path(&path);
                return (node.key, node.value);
            }

            let (top, side) = if self.node(left).priority > self.node(right).priority {
                (self.rotate_right(idx), Side::Right)
            } else {
                (self.rotate_left(idx), Side::Left)
            };
            self.link(&path, top);
            path.push((top, side));
        }
    }

    // --- Lookup ---

    fn find(&self, key: &K) -> Idx {
        let mut idx = self.root;
        while idx != NULL {
            let node = self.node(idx);
            idx = match key.cmp(&node.key) {
                Ordering::Less => node.left,
                Ordering::Greater => node.right,
                Ordering::Equal => return idx,
            };
        }
        return NULL;
    }

    pub fn get(&self, key: &K) -> Option<&V> {
        let idx = self.find(key);
        if idx == NULL {
            return None;
        }
        return Some(&self.node(idx).value);
    }

    pub fn contains_key(&self, key: &K) -> bool {
        return self.find(key) != NULL;
    }

    /// The entry with 1-indexed rank `rank` in key order.
    ///
    /// Ranks outside `1..=len` fail with [`Error::RankOutOfRange`].
    pub fn select(&self, rank: usize) -> Result<(&K, &V)> {
        let len = self.len();
        if rank == 0 || rank > len {
            log::debug!("select: rank {} outside 1..={}", rank, len);
            return Err(Error::RankOutOfRange { rank, len });
        }

        let mut idx = self.root;
        let mut rank = rank;
        loop {
            let node = self.node(idx);
            let left_size = self.size_of(node.left);
            if rank == left_size + 1 {
                return Ok((&node.key, &node.value));
            }
            if rank <= left_size {
                idx = node.left;
            } else {
                rank -= left_size + 1;
                idx = node.right;
            }
        }
    }

    /// All entries with `lo <= key <= hi`, in key order.
    pub fn range(&self, lo: &K, hi: &K) -> Vec<(&K, &V)> {
        let mut out = Vec::new();
        if lo > hi {
            return out;
        }
        // In-order walk that skips subtrees entirely below `lo` and stops at
        // the first key above `hi`.
        let mut stack: SmallVec<[Idx; 32]> = SmallVec::new();
        let mut idx = self.root;
        loop {
            while idx != NULL {
                let node = self.node(idx);
                if node.key < *lo {
                    idx = node.right;
                } else {
                    stack.push(idx);
                    idx = node.left;
                }
            }
            let Some(top) = stack.pop() else {
                break;
            };
            let node = self.node(top);
            if node.key > *hi {
                break;
            }
            out.push((&node.key, &node.value));
            idx = node.right;
        }
        return out;
    }

    // --- Invariant checking ---

    /// Verify BST order, heap order, subtree sizes and aggregates for every
    /// node, and that the arena holds no unreachable nodes.
    ///
    /// Keys must be strictly ordered unless the policy keeps duplicates. Each
    /// node's cached size and aggregate are checked against its children's
    /// cached values, which by induction checks them against a full
    /// recomputation.
    pub fn check_invariants(&self) -> Result<()>
    where
        A: PartialEq,
    {
        let live = self.nodes.iter().filter(|slot| slot.is_some()).count();
        let mut reachable = 0;
        let mut stack: SmallVec<[(Idx, Option<&K>, Option<&K>); 32]> = SmallVec::new();
        if self.root != NULL {
            stack.push((self.root, None, None));
        }

        while let Some((idx, lo, hi)) = stack.pop() {
            reachable += 1;
            if reachable > live {
                return Err(Error::Invariant("node reachable twice".to_string()));
            }
            let node = self.node(idx);

            let below = match lo {
                Some(lo) if P::ALLOWS_DUPLICATES => node.key < *lo,
                Some(lo) => node.key <= *lo,
                None => false,
            };
            let above = match hi {
                Some(hi) if P::ALLOWS_DUPLICATES => node.key > *hi,
                Some(hi) => node.key >= *hi,
                None => false,
            };
            if below || above {
                return Err(Error::Invariant("key out of search order".to_string()));
            }

            let mut size = 1;
            let mut agg = A::from_entry(&node.key, &node.value);
            for child in [node.left, node.right] {
                if child == NULL {
                    continue;
                }
                let child_node = self.node(child);
                if child_node.priority > node.priority {
                    return Err(Error::Invariant(format!(
                        "child priority {} above parent priority {}",
                        child_node.priority, node.priority
                    )));
                }
                size += child_node.size;
                agg = agg.combine(&child_node.agg);
            }
            if node.size != size {
                return Err(Error::Invariant(format!(
                    "cached size {} but children imply {}",
                    node.size, size
                )));
            }
            if agg != node.agg {
                return Err(Error::Invariant("stale aggregate".to_string()));
            }

            if node.left != NULL {
                stack.push((node.left, lo, Some(&node.key)));
            }
            if node.right != NULL {
                stack.push((node.right, Some(&node.key), hi));
            }
        }

        if reachable != live {
            return Err(Error::Invariant(format!(
                "{} nodes reachable but {} allocated",
                reachable, live
            )));
        }
        return Ok(());
    }
}

impl<K, V, A, P> Default for Treap<K, V, A, P>
where
    K: Ord,
    A: Aggregate<K, V>,
    P: DuplicatePolicy<V>,
{
    fn default() -> Self {
        return Self::new();
    }
}

/// In-order iterator over a treap.
pub struct Iter<'a, K, V, A> {
    nodes: &'a [Option<Node<K, V, A>>],
    /// Ancestors whose key has not been yielded yet.
    stack: SmallVec<[Idx; 32]>,
    remaining: usize,
}

impl<'a, K, V, A> Iter<'a, K, V, A> {
    fn node(&self, idx: Idx) -> &'a Node<K, V, A> {
        let nodes = self.nodes;
        match nodes.get(idx as usize) {
            Some(Some(node)) => node,
            _ => panic!("dangling node index {}", idx),
        }
    }

    fn push_left(&mut self, mut idx: Idx) {
        while idx != NULL {
            self.stack.push(idx);
            idx = self.node(idx).left;
        }
    }
}

impl<'a, K, V, A> Iterator for Iter<'a, K, V, A> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        let idx = self.stack.pop()?;
        let node = self.node(idx);
        self.push_left(node.right);
        self.remaining -= 1;
        return Some((&node.key, &node.value));
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        return (self.remaining, Some(self.remaining));
    }
}

impl<'a, K, V, A> ExactSizeIterator for Iter<'a, K, V, A> {}

impl<'a, K, V, A, P> IntoIterator for &'a Treap<K, V, A, P> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V, A>;

    fn into_iter(self) -> Self::IntoIter {
        return self.iter();
    }
}
