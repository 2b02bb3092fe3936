// model = "claude-opus-4-5"
// created = 2026-10-19
// modified = 2026-10-19
// driver = "Isaac Clayton"

//! Logical clock for record versions.
//!
//! A Lamport-style counter. Each local write takes the next tick; every
//! version seen from elsewhere (an explicit version on insert, a record
//! arriving through a merge) is observed so later ticks stay above it.
//!
//! Complexity:
//! - tick: O(1)
//! - observe: O(1)

use std::cmp::Ordering;

/// Monotonic version counter.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct VersionClock {
    time: u64,
}

impl VersionClock {
    /// A clock that has issued nothing. The first tick is 1.
    pub fn new() -> VersionClock {
        return VersionClock { time: 0 };
    }

    /// A clock whose last issued version is `time`.
    pub fn with_time(time: u64) -> VersionClock {
        return VersionClock { time };
    }

    /// The last issued or observed version.
    #[inline]
    pub fn time(&self) -> u64 {
        return self.time;
    }

    /// Issue the next version.
    #[inline]
    pub fn tick(&mut self) -> u64 {
        self.time = self.time.saturating_add(1);
        return self.time;
    }

    /// Record that `version` exists, so the next tick exceeds it.
    #[inline]
    pub fn observe(&mut self, version: u64) {
        self.time = self.time.max(version);
    }
}

impl PartialOrd for VersionClock {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        return Some(self.cmp(other));
    }
}

impl Ord for VersionClock {
    fn cmp(&self, other: &Self) -> Ordering {
        return self.time.cmp(&other.time);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ticks_start_at_one() {
        let mut clock = VersionClock::new();
        assert_eq!(clock.time(), 0);
        assert_eq!(clock.tick(), 1);
        assert_eq!(clock.tick(), 2);
    }

    #[test]
    fn observe_moves_forward_only() {
        let mut clock = VersionClock::with_time(4);
        clock.observe(9);
        assert_eq!(clock.time(), 9);
        clock.observe(2);
        assert_eq!(clock.time(), 9);
        assert_eq!(clock.tick(), 10);
    }

    #[test]
    fn tick_saturates() {
        let mut clock = VersionClock::with_time(u64::MAX);
        assert_eq!(clock.tick(), u64::MAX);
    }

    #[test]
    fn ordering_follows_time() {
        assert!(VersionClock::with_time(3) < VersionClock::with_time(5));
        assert_eq!(VersionClock::with_time(5), VersionClock::with_time(5));
    }
}
