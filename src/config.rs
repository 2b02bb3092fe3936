// model = "claude-opus-4-5"
// created = 2026-10-19
// modified = 2026-10-19
// driver = "Isaac Clayton"

//! Construction-time configuration.
//!
//! ```
//! use augtreap::config::Config;
//!
//! let config = Config::from_toml_str("seed = 7\nshards = 8").unwrap();
//! assert_eq!(config.seed, Some(7));
//! assert_eq!(config.shards, 8);
//! ```

use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::Deserialize;
use serde::Serialize;

use crate::error::Error;
use crate::error::Result;

/// Default number of shards for a sharded tree.
pub const DEFAULT_SHARDS: usize = 4;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Seed for every priority generator. `None` draws from OS entropy.
    pub seed: Option<u64>,
    /// Shard count used by `ShardedTreap::from_config`.
    pub shards: usize,
}

impl Default for Config {
    fn default() -> Self {
        return Config {
            seed: None,
            shards: DEFAULT_SHARDS,
        };
    }
}

impl Config {
    /// A default config with a fixed seed.
    pub fn seeded(seed: u64) -> Config {
        return Config {
            seed: Some(seed),
            ..Config::default()
        };
    }

    /// Parse and validate a TOML document. Missing fields take defaults.
    pub fn from_toml_str(input: &str) -> Result<Config> {
        let config: Config = toml::from_str(input)?;
        config.validate()?;
        return Ok(config);
    }

    pub fn validate(&self) -> Result<()> {
        if self.shards == 0 {
            return Err(Error::NoShards);
        }
        return Ok(());
    }

    /// Generator for one tree. `stream` separates the shards of a seeded set.
    pub(crate) fn rng(&self, stream: u64) -> StdRng {
        return match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed.wrapping_add(stream)),
            None => StdRng::from_entropy(),
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::RngCore;

    #[test]
    fn empty_document_is_default() {
        let config = Config::from_toml_str("").unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn zero_shards_rejected() {
        let err = Config::from_toml_str("shards = 0").unwrap_err();
        assert_eq!(err, Error::NoShards);
    }

    #[test]
    fn wrong_type_rejected() {
        let err = Config::from_toml_str("seed = \"abc\"").unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn seeded_streams_are_deterministic_and_distinct() {
        let config = Config::seeded(42);
        let a = config.rng(0).next_u64();
        let b = config.rng(0).next_u64();
        let c = config.rng(1).next_u64();
        assert_eq!(a, b);
        assert_ne!(a, c);
    }
}
