//! Parse hit/miss counters
//!
//! Extractors only ever increment through [`StatisticsSink`]; reading the
//! totals back is left to whoever owns the [`Statistics`] value.

use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicUsize, Ordering};

/// Counter identifiers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatKey {
    ParsingHits,
    ParsingMisses,
}

/// Write-only counter interface handed to the extractors
pub trait StatisticsSink: Send + Sync {
    fn increment(&self, key: StatKey);
}

/// Thread-safe counters for one analysis run
#[derive(Debug, Default)]
pub struct Statistics {
    parsing_hits: AtomicUsize,
    parsing_misses: AtomicUsize,
}

impl Statistics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: StatKey) -> usize {
        self.counter(key).load(Ordering::Relaxed)
    }

    pub fn snapshot(&self) -> StatisticsSnapshot {
        StatisticsSnapshot {
            parsing_hits: self.get(StatKey::ParsingHits),
            parsing_misses: self.get(StatKey::ParsingMisses),
        }
    }

    fn counter(&self, key: StatKey) -> &AtomicUsize {
        match key {
            StatKey::ParsingHits => &self.parsing_hits,
            StatKey::ParsingMisses => &self.parsing_misses,
        }
    }
}

impl StatisticsSink for Statistics {
    fn increment(&self, key: StatKey) {
        self.counter(key).fetch_add(1, Ordering::Relaxed);
    }
}

/// Plain copy of the counters at one point in time
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatisticsSnapshot {
    pub parsing_hits: usize,
    pub parsing_misses: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rayon::prelude::*;

    #[test]
    fn test_increment_and_read_back() {
        let stats = Statistics::new();
        stats.increment(StatKey::ParsingHits);
        stats.increment(StatKey::ParsingHits);
        stats.increment(StatKey::ParsingMisses);

        assert_eq!(stats.get(StatKey::ParsingHits), 2);
        assert_eq!(
            stats.snapshot(),
            StatisticsSnapshot {
                parsing_hits: 2,
                parsing_misses: 1
            }
        );
    }

    #[test]
    fn test_concurrent_increments() {
        let stats = Statistics::new();
        (0..1000).into_par_iter().for_each(|_| stats.increment(StatKey::ParsingMisses));
        assert_eq!(stats.get(StatKey::ParsingMisses), 1000);
    }
}
