// model = "claude-opus-4-5"
// created = 2026-10-19
// modified = 2026-10-19
// driver = "Isaac Clayton"

//! Hash-sharded treaps with version-based conflict resolution.
//!
//! A key lives in shard `route(key) mod n`. Every stored payload carries a
//! version, and a colliding insert only lands when its version is strictly
//! higher than the stored one. Merging replays one shard's records into
//! another through that same rule, so merges are idempotent and commute
//! whenever versions are distinct.
//!
//! Merge copies, it does not move: the source keeps its records and nothing
//! is rehashed to the shard its key routes to.

use std::hash::Hash;
use std::hash::Hasher;

use parking_lot::Mutex;
use rustc_hash::FxHasher;

use crate::aggregate::NoAggregate;
use crate::clock::VersionClock;
use crate::concurrent::ConcurrentTreap;
use crate::config::Config;
use crate::error::Error;
use crate::error::Result;
use crate::policy::HigherVersionWins;
use crate::policy::InsertOutcome;
use crate::policy::Stamped;
use crate::treap::Treap;

/// Maps a key to a shard deterministically.
pub trait ShardKey {
    /// Shard index in `0..shards`. `shards` is never zero.
    fn route(&self, shards: usize) -> usize;
}

macro_rules! route_unsigned {
    ($($t:ty),*) => {$(
        impl ShardKey for $t {
            #[inline]
            fn route(&self, shards: usize) -> usize {
                return (*self as u128 % shards as u128) as usize;
            }
        }
    )*};
}

macro_rules! route_signed {
    ($($t:ty),*) => {$(
        impl ShardKey for $t {
            /// Non-negative remainder, so `-1` lands in the last shard.
            #[inline]
            fn route(&self, shards: usize) -> usize {
                return (*self as i128).rem_euclid(shards as i128) as usize;
            }
        }
    )*};
}

route_unsigned!(u8, u16, u32, u64, u128, usize);
route_signed!(i8, i16, i32, i64, i128, isize);

fn fx_route<T: Hash + ?Sized>(key: &T, shards: usize) -> usize {
    let mut hasher = FxHasher::default();
    key.hash(&mut hasher);
    return (hasher.finish() % shards as u64) as usize;
}

impl ShardKey for str {
    fn route(&self, shards: usize) -> usize {
        return fx_route(self, shards);
    }
}

impl ShardKey for String {
    fn route(&self, shards: usize) -> usize {
        return fx_route(self.as_str(), shards);
    }
}

impl<T: ShardKey + ?Sized> ShardKey for &T {
    fn route(&self, shards: usize) -> usize {
        return (**self).route(shards);
    }
}

/// A key with its payload and the version that wrote it.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Record<K, V> {
    pub key: K,
    pub value: V,
    pub version: u64,
}

impl<K, V> Record<K, V> {
    pub fn new(key: K, value: V, version: u64) -> Record<K, V> {
        return Record {
            key,
            value,
            version,
        };
    }

    fn from_stamped(key: K, stamped: Stamped<V>) -> Record<K, V> {
        return Record::new(key, stamped.value, stamped.version);
    }
}

/// What a merge did to the destination shard.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MergeStats {
    /// Records read from the source.
    pub scanned: usize,
    /// Keys the destination did not hold.
    pub added: usize,
    /// Keys whose stored record lost to a higher version.
    pub replaced: usize,
    /// Keys whose stored record was kept.
    pub kept: usize,
}

type Shard<K, V> = ConcurrentTreap<K, Stamped<V>, NoAggregate, HigherVersionWins>;

/// A fixed set of independently locked shards.
#[derive(Debug)]
pub struct ShardedTreap<K, V> {
    shards: Vec<Shard<K, V>>,
    clock: Mutex<VersionClock>,
}

impl<K, V> ShardedTreap<K, V>
where
    K: Ord + ShardKey,
{
    /// `shards` empty shards with entropy-seeded priorities.
    pub fn new(shards: usize) -> Result<Self> {
        return Self::build(&Config {
            seed: None,
            shards,
        });
    }

    /// Deterministic shard set: shard `i` draws priorities from `seed + i`.
    pub fn with_seed(shards: usize, seed: u64) -> Result<Self> {
        return Self::build(&Config {
            seed: Some(seed),
            shards,
        });
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        config.validate()?;
        return Self::build(config);
    }

    fn build(config: &Config) -> Result<Self> {
        if config.shards == 0 {
            return Err(Error::NoShards);
        }
        let shards = (0..config.shards)
            .map(|i| ConcurrentTreap::from_treap(Treap::with_rng(config.rng(i as u64))))
            .collect();
        log::debug!(
            "sharded treap: {} shards, seed {:?}",
            config.shards,
            config.seed
        );
        return Ok(ShardedTreap {
            shards,
            clock: Mutex::new(VersionClock::new()),
        });
    }

    pub fn shard_count(&self) -> usize {
        return self.shards.len();
    }

    /// The shard `key` routes to.
    #[inline]
    pub fn shard_for(&self, key: &K) -> usize {
        return key.route(self.shards.len());
    }

    fn shard(&self, index: usize) -> Result<&Shard<K, V>> {
        let count = self.shards.len();
        let Some(shard) = self.shards.get(index) else {
            log::debug!("shard {} requested of {}", index, count);
            return Err(Error::ShardOutOfRange { index, count });
        };
        return Ok(shard);
    }

    /// Insert with an explicit version. Lands only if no record for `key`
    /// exists or the stored one has a lower version.
    pub fn insert(&self, key: K, value: V, version: u64) -> InsertOutcome<Stamped<V>> {
        self.clock.lock().observe(version);
        let index = self.shard_for(&key);
        return self.shards[index].insert(key, Stamped::new(value, version));
    }

    pub fn insert_record(&self, record: Record<K, V>) -> InsertOutcome<Stamped<V>> {
        return self.insert(record.key, record.value, record.version);
    }

    /// Insert stamped with the next local version, which is higher than any
    /// version this set has seen. Returns that version.
    pub fn put(&self, key: K, value: V) -> u64 {
        let version = self.clock.lock().tick();
        let index = self.shard_for(&key);
        self.shards[index].insert(key, Stamped::new(value, version));
        return version;
    }

    pub fn remove(&self, key: &K) -> Option<Stamped<V>> {
        return self.shards[self.shard_for(key)].remove(key);
    }

    pub fn get(&self, key: &K) -> Option<Record<K, V>>
    where
        K: Clone,
        V: Clone,
    {
        let stamped = self.shards[self.shard_for(key)].get(key)?;
        return Some(Record::from_stamped(key.clone(), stamped));
    }

    pub fn contains_key(&self, key: &K) -> bool {
        return self.shards[self.shard_for(key)].contains_key(key);
    }

    /// Total records over all shards.
    pub fn len(&self) -> usize {
        return self.shards.iter().map(|shard| shard.len()).sum();
    }

    pub fn is_empty(&self) -> bool {
        return self.shards.iter().all(|shard| shard.is_empty());
    }

    /// The last version issued or observed.
    pub fn version(&self) -> u64 {
        return self.clock.lock().time();
    }

    /// Replay every record of shard `src` into shard `dst`.
    ///
    /// The source is read under its lock into a snapshot first, then the
    /// destination is written, so `src == dst` is allowed and changes nothing.
    pub fn merge_shards(&self, src: usize, dst: usize) -> Result<MergeStats>
    where
        K: Clone,
        V: Clone,
    {
        let source = self.shard(src)?;
        let dest = self.shard(dst)?;

        let snapshot = source.to_vec();
        let mut stats = MergeStats {
            scanned: snapshot.len(),
            ..MergeStats::default()
        };
        dest.write(|tree| {
            for (key, stamped) in snapshot {
                match tree.insert(key, stamped) {
                    InsertOutcome::Added => stats.added += 1,
                    InsertOutcome::Replaced(_) => stats.replaced += 1,
                    InsertOutcome::Rejected(_) => stats.kept += 1,
                }
            }
        });

        log::debug!("merged shard {} into {}: {:?}", src, dst, stats);
        return Ok(stats);
    }

    /// Records of one shard in key order.
    pub fn records_in(&self, index: usize) -> Result<Vec<Record<K, V>>>
    where
        K: Clone,
        V: Clone,
    {
        let shard = self.shard(index)?;
        let records = shard
            .to_vec()
            .into_iter()
            .map(|(key, stamped)| Record::from_stamped(key, stamped))
            .collect();
        return Ok(records);
    }

    /// Every record, shard by shard. Key-ordered within a shard only.
    pub fn all_records(&self) -> Vec<Record<K, V>>
    where
        K: Clone,
        V: Clone,
    {
        let mut out = Vec::with_capacity(self.len());
        for shard in &self.shards {
            for (key, stamped) in shard.to_vec() {
                out.push(Record::from_stamped(key, stamped));
            }
        }
        return out;
    }
}
