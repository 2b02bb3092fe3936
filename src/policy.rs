// model = "claude-opus-4-5"
// created = 2026-10-19
// modified = 2026-10-19
// driver = "Isaac Clayton"

//! What an insert does when its key is already present.

/// Resolution of a key collision during insert.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Collision {
    /// Overwrite the stored payload in place.
    Replace,
    /// Keep the stored payload, discard the incoming one.
    Keep,
    /// Store the incoming entry as a separate node to the right.
    Duplicate,
}

/// Decides how a colliding insert is resolved.
pub trait DuplicatePolicy<V> {
    /// Whether a tree under this policy may hold equal keys. Must be true
    /// exactly when `on_collision` can return `Collision::Duplicate`.
    const ALLOWS_DUPLICATES: bool = false;

    fn on_collision(existing: &V, incoming: &V) -> Collision;
}

/// Plain map semantics: the newest payload wins.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Overwrite;

impl<V> DuplicatePolicy<V> for Overwrite {
    #[inline]
    fn on_collision(_existing: &V, _incoming: &V) -> Collision {
        return Collision::Replace;
    }
}

/// Multiset semantics: equal keys are kept, later ones to the right.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct AllowDuplicates;

impl<V> DuplicatePolicy<V> for AllowDuplicates {
    const ALLOWS_DUPLICATES: bool = true;

    #[inline]
    fn on_collision(_existing: &V, _incoming: &V) -> Collision {
        return Collision::Duplicate;
    }
}

/// A payload carrying a logical version.
pub trait Versioned {
    fn version(&self) -> u64;
}

/// Last writer wins by version. Equal versions keep the stored payload, so
/// replaying the same records is a no-op.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct HigherVersionWins;

impl<V: Versioned> DuplicatePolicy<V> for HigherVersionWins {
    #[inline]
    fn on_collision(existing: &V, incoming: &V) -> Collision {
        if incoming.version() > existing.version() {
            return Collision::Replace;
        }
        return Collision::Keep;
    }
}

/// A payload stamped with the version that wrote it.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Stamped<V> {
    pub value: V,
    pub version: u64,
}

impl<V> Stamped<V> {
    pub fn new(value: V, version: u64) -> Stamped<V> {
        return Stamped { value, version };
    }
}

impl<V> Versioned for Stamped<V> {
    #[inline]
    fn version(&self) -> u64 {
        return self.version;
    }
}

/// What an insert did.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum InsertOutcome<V> {
    /// A new node was created.
    Added,
    /// The key was present; this is the payload that was overwritten.
    Replaced(V),
    /// The key was present and kept; this is the incoming payload.
    Rejected(V),
}

impl<V> InsertOutcome<V> {
    /// Whether the tree gained a node.
    pub fn is_added(&self) -> bool {
        return matches!(self, InsertOutcome::Added);
    }
}
