//! Deduplication strategies for extracted credentials
//!
//! - Memory: exact in-memory HashSet (default, grows with the number of distinct lines)
//! - Bloom: probabilistic bloom filter (fixed memory, small false positive rate)
//! - NoOp: deduplication disabled, every line passes

use crate::cli::DedupStrategy;
use crate::error::ExtractError;
use ahash::RandomState;
use hashbrown::HashSet;
use std::hash::{BuildHasher, Hash, Hasher};

/// False positive rate used for the bloom strategy (0.1%)
pub const BLOOM_FALSE_POSITIVE_RATE: f64 = 0.001;

/// Trait for deduplication implementations
pub trait Deduplicator {
    /// Record an item; returns true if it had not been seen before
    fn insert(&mut self, item: &str) -> bool;

    /// Number of unique items recorded
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Approximate memory usage in bytes
    fn memory_usage(&self) -> usize;
}

/// In-memory HashSet-based deduplicator
///
/// Exact, but holds every distinct line for the whole run.
pub struct MemoryDeduplicator {
    set: HashSet<Box<str>, RandomState>,
    bytes: usize,
}

impl MemoryDeduplicator {
    pub fn new() -> Self {
        Self {
            set: HashSet::with_hasher(RandomState::new()),
            bytes: 0,
        }
    }
}

impl Default for MemoryDeduplicator {
    fn default() -> Self {
        Self::new()
    }
}

impl Deduplicator for MemoryDeduplicator {
    fn insert(&mut self, item: &str) -> bool {
        if self.set.contains(item) {
            return false;
        }
        self.bytes += item.len();
        self.set.insert(item.into())
    }

    fn len(&self) -> usize {
        self.set.len()
    }

    fn memory_usage(&self) -> usize {
        // Box<str> header + hashbrown control byte per slot
        self.bytes + self.set.len() * 16 + self.set.capacity() * 17
    }
}

/// Bloom filter-based deduplicator
///
/// Uses a fixed bit array. False positives mean some unique lines are
/// reported as duplicates and dropped.
pub struct BloomDeduplicator {
    bits: Vec<u64>,
    num_hashes: usize,
    hasher: RandomState,
    estimated_count: usize,
}

impl BloomDeduplicator {
    /// Create a new bloom filter
    ///
    /// # Arguments
    /// * `expected_items` - Expected number of unique items
    /// * `false_positive_rate` - Desired false positive rate (e.g., 0.001 for 0.1%)
    pub fn new(expected_items: usize, false_positive_rate: f64) -> Result<Self, ExtractError> {
        if expected_items == 0 {
            return Err(ExtractError::InvalidOptions(
                "bloom filter needs a non-zero expected item count".to_string(),
            ));
        }
        if !(false_positive_rate > 0.0 && false_positive_rate < 1.0) {
            return Err(ExtractError::InvalidOptions(format!(
                "bloom false positive rate must be in (0, 1), got {}",
                false_positive_rate
            )));
        }

        let ln2 = std::f64::consts::LN_2;
        let ln2_squared = ln2 * ln2;

        // m = -n * ln(p) / (ln(2)^2)
        let num_bits = -(expected_items as f64) * false_positive_rate.ln() / ln2_squared;
        let num_bits = (num_bits.ceil() as usize).max(64);

        // k = (m/n) * ln(2)
        let num_hashes = ((num_bits as f64 / expected_items as f64) * ln2).ceil() as usize;
        let num_hashes = num_hashes.clamp(1, 16);

        Ok(Self {
            bits: vec![0; (num_bits + 63) / 64],
            num_hashes,
            hasher: RandomState::new(),
            estimated_count: 0,
        })
    }

    fn hash_indices(&self, item: &str) -> impl Iterator<Item = usize> {
        let num_bits = self.bits.len() * 64;

        // Double hashing
        let mut hasher1 = self.hasher.build_hasher();
        item.hash(&mut hasher1);
        let h1 = hasher1.finish() as usize;

        let mut hasher2 = self.hasher.build_hasher();
        hasher2.write_usize(h1);
        item.hash(&mut hasher2);
        let h2 = hasher2.finish() as usize;

        (0..self.num_hashes).map(move |i| h1.wrapping_add(i.wrapping_mul(h2)) % num_bits)
    }

    fn get_bit(&self, index: usize) -> bool {
        self.bits[index / 64] & (1u64 << (index % 64)) != 0
    }

    fn set_bit(&mut self, index: usize) {
        self.bits[index / 64] |= 1u64 << (index % 64);
    }
}

impl Deduplicator for BloomDeduplicator {
    fn insert(&mut self, item: &str) -> bool {
        let indices: Vec<usize> = self.hash_indices(item).collect();

        if indices.iter().all(|&i| self.get_bit(i)) {
            return false;
        }

        for index in indices {
            self.set_bit(index);
        }
        self.estimated_count += 1;
        true
    }

    fn len(&self) -> usize {
        self.estimated_count
    }

    fn memory_usage(&self) -> usize {
        self.bits.len() * 8
    }
}

/// No-op deduplicator for when deduplication is disabled
#[derive(Default)]
pub struct NoOpDeduplicator {
    count: usize,
}

impl NoOpDeduplicator {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Deduplicator for NoOpDeduplicator {
    fn insert(&mut self, _item: &str) -> bool {
        self.count += 1;
        true
    }

    fn len(&self) -> usize {
        self.count
    }

    fn memory_usage(&self) -> usize {
        0
    }
}

/// Build the deduplicator for a run
///
/// `expected_items` sizes the bloom filter; the memory set grows on demand.
pub fn create_deduplicator(
    remove_duplicates: bool,
    strategy: DedupStrategy,
    expected_items: usize,
) -> Result<Box<dyn Deduplicator>, ExtractError> {
    if !remove_duplicates {
        return Ok(Box::new(NoOpDeduplicator::new()));
    }

    Ok(match strategy {
        DedupStrategy::Memory => Box::new(MemoryDeduplicator::new()),
        DedupStrategy::Bloom => Box::new(BloomDeduplicator::new(
            expected_items,
            BLOOM_FALSE_POSITIVE_RATE,
        )?),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_deduplicator() {
        let mut dedup = MemoryDeduplicator::new();
        assert!(dedup.is_empty());

        assert!(dedup.insert("a@b.com:pw"));
        assert!(dedup.insert("a@b.com:pw2"));
        assert!(!dedup.insert("a@b.com:pw"));

        assert_eq!(dedup.len(), 2);
        assert!(!dedup.is_empty());
        assert!(dedup.memory_usage() > 0);
    }

    #[test]
    fn test_memory_deduplicator_is_case_sensitive() {
        let mut dedup = MemoryDeduplicator::new();

        assert!(dedup.insert("Bob:pw"));
        assert!(dedup.insert("bob:pw"));
    }

    #[test]
    fn test_bloom_deduplicator() {
        let mut dedup = BloomDeduplicator::new(1000, 0.01).unwrap();

        assert!(dedup.insert("test1"));
        assert!(dedup.insert("test2"));
        assert!(!dedup.insert("test1"));
        assert_eq!(dedup.len(), 2);
    }

    #[test]
    fn test_bloom_rejects_bad_params() {
        assert!(BloomDeduplicator::new(0, 0.01).is_err());
        assert!(BloomDeduplicator::new(10, 0.0).is_err());
        assert!(BloomDeduplicator::new(10, 1.5).is_err());
    }

    #[test]
    fn test_noop_deduplicator() {
        let mut dedup = NoOpDeduplicator::new();

        assert!(dedup.insert("test1"));
        assert!(dedup.insert("test1"));
        assert_eq!(dedup.len(), 2);
    }

    #[test]
    fn test_create_deduplicator() {
        let mut off = create_deduplicator(false, DedupStrategy::Memory, 16).unwrap();
        assert!(off.insert("x"));
        assert!(off.insert("x"));

        let mut on = create_deduplicator(true, DedupStrategy::Memory, 16).unwrap();
        assert!(on.insert("x"));
        assert!(!on.insert("x"));

        assert!(create_deduplicator(true, DedupStrategy::Bloom, 0).is_err());
    }
}
