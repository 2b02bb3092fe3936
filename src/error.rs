// model = "claude-opus-4-5"
// created = 2026-10-19
// modified = 2026-10-19
// driver = "Isaac Clayton"

//! Errors returned by caller-contract violations.
//!
//! Lookups that can legitimately miss return `Option`. Only operations with a
//! precondition the caller can break (rank bounds, popping an empty queue,
//! addressing a shard that does not exist) return `Err`.

use thiserror::Error as ThisError;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Clone, PartialEq, Eq, ThisError)]
pub enum Error {
    #[error("rank {rank} is outside 1..={len}")]
    RankOutOfRange { rank: usize, len: usize },

    #[error("priority queue is empty")]
    EmptyQueue,

    #[error("shard {index} does not exist ({count} shards)")]
    ShardOutOfRange { index: usize, count: usize },

    #[error("shard count must be positive")]
    NoShards,

    #[error("interval start is greater than its end")]
    InvalidInterval,

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("invariant violated: {0}")]
    Invariant(String),
}

impl From<toml::de::Error> for Error {
    fn from(error: toml::de::Error) -> Self {
        Error::Config(format!("{}", error))
    }
}
