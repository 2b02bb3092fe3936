// model = "claude-opus-4-5"
// created = 2026-10-19
// modified = 2026-10-19
// driver = "Isaac Clayton"

//! Tree nodes, stored in an arena and linked by index.

/// Node index type. u32 saves space vs usize on 64-bit.
pub(crate) type Idx = u32;

/// Null index marker.
pub(crate) const NULL: Idx = Idx::MAX;

/// A node in the treap.
///
/// Each node exclusively owns its two subtrees; no index appears as a child of
/// more than one node.
#[derive(Clone, Debug)]
pub(crate) struct Node<K, V, A> {
    pub(crate) key: K,
    pub(crate) value: V,
    /// Heap key. A node's priority is never below either child's.
    pub(crate) priority: u64,
    pub(crate) left: Idx,
    pub(crate) right: Idx,
    /// Number of nodes in this subtree, including this one.
    pub(crate) size: usize,
    /// `combine(own, left.agg, right.agg)`.
    pub(crate) agg: A,
}

impl<K, V, A> Node<K, V, A> {
    pub(crate) fn new(key: K, value: V, priority: u64, agg: A) -> Self {
        return Node {
            key,
            value,
            priority,
            left: NULL,
            right: NULL,
            size: 1,
            agg,
        };
    }
}
