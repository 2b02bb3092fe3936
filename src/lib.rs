// model = "claude-opus-4-5"
// created = 2026-10-19
// modified = 2026-10-19
// driver = "Isaac Clayton"

//! Augtreap - randomized balanced search trees with cached subtree summaries.
//!
//! One treap engine ([`Treap`]) is specialised by two type parameters: an
//! [`Aggregate`] every node caches over its subtree, and a [`DuplicatePolicy`]
//! deciding what an insert does when its key already exists. On top of it:
//!
//! - order statistics (`select`) from cached subtree sizes
//! - range maxima (`max_in_range`) with [`MaxValue`]
//! - interval overlap queries with [`IntervalTreap`]
//! - a max-priority queue with FIFO ties, [`PriorityQueue`]
//! - a reader/writer locked tree, [`ConcurrentTreap`]
//! - hash-sharded trees with version-based merge, [`ShardedTreap`]
//!
//! # Quick Start
//!
//! ```
//! use augtreap::Treap;
//!
//! let mut tree: Treap<i32, &str> = Treap::with_seed(7);
//! for (key, name) in [(50, "e"), (30, "c"), (20, "b"), (40, "d"), (70, "g")] {
//!     tree.insert(key, name);
//! }
//!
//! assert_eq!(tree.get(&40), Some(&"d"));
//! assert_eq!(tree.select(3).unwrap(), (&40, &"d"));
//!
//! tree.remove(&30);
//! let keys: Vec<i32> = tree.iter().map(|(k, _)| *k).collect();
//! assert_eq!(keys, vec![20, 40, 50, 70]);
//! ```
//!
//! Range maxima need the payload maximum cached per node:
//!
//! ```
//! use augtreap::{MaxValue, Overwrite, Treap};
//!
//! let mut prices: Treap<u32, u64, MaxValue<u64>, Overwrite> = Treap::with_seed(1);
//! for (day, price) in [(1, 10), (2, 40), (3, 15), (4, 60), (5, 5)] {
//!     prices.insert(day, price);
//! }
//! assert_eq!(prices.max_in_range(&1, &3), Some(&40));
//! assert_eq!(prices.max_in_range(&6, &9), None);
//! ```

pub mod aggregate;
pub mod clock;
pub mod concurrent;
pub mod config;
pub mod error;
pub mod interval;
mod node;
pub mod policy;
pub mod queue;
pub mod range_max;
pub mod shard;
pub mod treap;

pub use aggregate::Aggregate;
pub use aggregate::MaxEnd;
pub use aggregate::MaxValue;
pub use aggregate::NoAggregate;
pub use clock::VersionClock;
pub use concurrent::ConcurrentTreap;
pub use config::Config;
pub use error::Error;
pub use error::Result;
pub use interval::Interval;
pub use interval::IntervalTreap;
pub use policy::AllowDuplicates;
pub use policy::DuplicatePolicy;
pub use policy::HigherVersionWins;
pub use policy::InsertOutcome;
pub use policy::Overwrite;
pub use policy::Stamped;
pub use queue::PriorityQueue;
pub use shard::MergeStats;
pub use shard::Record;
pub use shard::ShardKey;
pub use shard::ShardedTreap;
pub use treap::Treap;
