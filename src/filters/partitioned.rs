//! Partitioned counting Bloom filter with deletion support.
//!
//! # Overview
//!
//! [`PartitionedCountingFilter`] divides its bit array into `k` equal
//! partitions, one per hash function. Each partition owns a bit vector for
//! fast membership checks and a parallel vector of saturating 4-bit
//! counters that track how many insertions touched each position, which is
//! what makes deletion possible.
//!
//! Hash function `j` indexes only into partition `j`, so every key sets
//! exactly one bit per partition. Compared to an unpartitioned counting
//! filter this gives slightly worse theoretical false-positive behavior
//! but a more uniform fill pattern and a trivially parallel layout.
//!
//! # Deletion Semantics
//!
//! Deletion is all-or-nothing. [`delete`](PartitionedCountingFilter::delete)
//! first verifies that every partition reports the key present; only then
//! does it decrement counters. A delete of an absent key returns
//! [`BloomScaleError::NotPresent`] and leaves the filter untouched, so a
//! failed delete can never corrupt state for other keys.
//!
//! Counting filters still inherit the classic caveat: deleting a key that
//! was never inserted but happens to be a false positive will decrement
//! counters belonging to other keys, which can introduce false negatives.
//! Callers that require strict correctness should only delete keys they
//! know were inserted.
//!
//! # Examples
//!
//! ```
//! use bloomscale::filters::PartitionedCountingFilter;
//!
//! let mut filter = PartitionedCountingFilter::new(1000, 0.01).unwrap();
//!
//! filter.add(b"session-42");
//! assert!(filter.query(b"session-42"));
//!
//! filter.delete(b"session-42").unwrap();
//! assert!(!filter.query(b"session-42"));
//!
//! assert!(filter.delete(b"never-added").is_err());
//! ```

#![allow(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::cast_precision_loss)]

use crate::core::bitvec::BitVec;
use crate::core::filter::{DeletableFilter, MembershipFilter};
use crate::core::params::FilterParameters;
use crate::error::{BloomScaleError, Result};
use crate::hash::{FilterHasher, XxSeedHasher};

/// Maximum value of a per-position counter.
///
/// Counters are conceptually 4-bit and saturate here instead of wrapping.
/// A saturated counter is pinned: further increments and decrements leave
/// it at this value, because the true count is no longer known.
pub const COUNTER_MAX: u8 = 15;

/// One hash function's slice of the filter: a bit vector plus parallel
/// counters.
///
/// Invariant: `bits.get(i)` is true exactly when `counts[i] > 0`. Every
/// mutation path in this module maintains it.
#[derive(Debug, Clone)]
struct Partition {
    bits: BitVec,
    counts: Vec<u8>,
}

impl Partition {
    fn new(size: usize) -> Result<Self> {
        Ok(Self {
            bits: BitVec::new(size)?,
            counts: vec![0u8; size],
        })
    }

    /// Increment the counter at `index`, saturating at [`COUNTER_MAX`].
    /// Returns true if the increment saturated (hit or was already at max).
    fn increment(&mut self, index: usize) -> bool {
        let count = &mut self.counts[index];
        if *count >= COUNTER_MAX {
            return true;
        }
        *count += 1;
        self.bits.set(index);
        *count == COUNTER_MAX
    }

    /// Decrement the counter at `index`, clearing the bit when it reaches
    /// zero. Saturated counters are left pinned at [`COUNTER_MAX`].
    fn decrement(&mut self, index: usize) {
        let count = &mut self.counts[index];
        if *count == 0 || *count == COUNTER_MAX {
            return;
        }
        *count -= 1;
        if *count == 0 {
            self.bits.clear_bit(index);
        }
    }

    fn clear(&mut self) {
        self.bits.clear();
        self.counts.fill(0);
    }
}

/// Counting Bloom filter split into one partition per hash function.
///
/// Construction derives the bit-array size and hash count from the target
/// capacity and false-positive rate via the standard formulas; see
/// [`FilterParameters`]. Both are fixed for the lifetime of the filter.
/// For a structure that grows past its initial capacity, use
/// [`ScalableFilterChain`](crate::filters::ScalableFilterChain).
///
/// Keys are arbitrary byte slices. Hashing a `String`, integer, or struct
/// means serializing it to bytes first; for integers, `to_le_bytes()` is
/// the conventional choice.
///
/// # Examples
///
/// ```
/// use bloomscale::filters::PartitionedCountingFilter;
///
/// let mut filter = PartitionedCountingFilter::new(20, 0.08).unwrap();
/// assert_eq!(filter.hash_count(), 4);
/// assert_eq!(filter.partition_size(), 26);
/// ```
#[derive(Debug, Clone)]
pub struct PartitionedCountingFilter {
    partitions: Vec<Partition>,
    params: FilterParameters,
    hasher: XxSeedHasher,
    item_count: usize,
    saturation_events: u64,
}

impl PartitionedCountingFilter {
    /// Create a filter sized for `expected_items` at `target_fp_rate`.
    ///
    /// # Errors
    ///
    /// Returns an error if `expected_items` is zero or `target_fp_rate`
    /// is outside `(0, 1)`.
    ///
    /// # Examples
    ///
    /// ```
    /// use bloomscale::filters::PartitionedCountingFilter;
    ///
    /// let filter = PartitionedCountingFilter::new(10_000, 0.001).unwrap();
    /// assert!(filter.is_empty());
    ///
    /// assert!(PartitionedCountingFilter::new(0, 0.01).is_err());
    /// assert!(PartitionedCountingFilter::new(100, 1.5).is_err());
    /// ```
    pub fn new(expected_items: usize, target_fp_rate: f64) -> Result<Self> {
        let params = FilterParameters::derive(expected_items, target_fp_rate)?;
        Self::from_params(params)
    }

    /// Create a filter from already-derived parameters.
    pub fn from_params(params: FilterParameters) -> Result<Self> {
        let partitions = (0..params.hash_count)
            .map(|_| Partition::new(params.partition_size))
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            partitions,
            params,
            hasher: XxSeedHasher::new(),
            item_count: 0,
            saturation_events: 0,
        })
    }

    /// Index of `key` within partition `j`.
    #[inline]
    fn index(&self, key: &[u8], j: usize) -> usize {
        (self.hasher.hash_with_seed(key, j as u64) % self.params.partition_size as u64) as usize
    }

    /// Insert a key, incrementing one counter in every partition.
    ///
    /// Inserting the same key repeatedly is allowed; each insertion
    /// increments the counters, and one [`delete`](Self::delete) undoes
    /// one insertion. Counters saturate at [`COUNTER_MAX`] rather than
    /// overflowing; saturation is recorded and visible through
    /// [`saturation_events`](Self::saturation_events).
    ///
    /// # Examples
    ///
    /// ```
    /// use bloomscale::filters::PartitionedCountingFilter;
    ///
    /// let mut filter = PartitionedCountingFilter::new(100, 0.01).unwrap();
    /// filter.add(b"item");
    /// assert_eq!(filter.len(), 1);
    /// ```
    pub fn add(&mut self, key: &[u8]) {
        for j in 0..self.partitions.len() {
            let idx = self.index(key, j);
            if self.partitions[j].increment(idx) {
                self.saturation_events += 1;
            }
        }
        self.item_count += 1;
    }

    /// Test membership.
    ///
    /// Returns true if every partition has the key's bit set. False
    /// positives occur at roughly the configured rate while the filter is
    /// at or under capacity; false negatives cannot occur unless a
    /// false-positive key was deleted (see module docs).
    ///
    /// # Examples
    ///
    /// ```
    /// use bloomscale::filters::PartitionedCountingFilter;
    ///
    /// let mut filter = PartitionedCountingFilter::new(100, 0.01).unwrap();
    /// filter.add(b"present");
    /// assert!(filter.query(b"present"));
    /// assert!(!filter.query(b"absent"));
    /// ```
    #[must_use]
    pub fn query(&self, key: &[u8]) -> bool {
        for (j, partition) in self.partitions.iter().enumerate() {
            let idx = self.index(key, j);
            if !partition.bits.get(idx) {
                return false;
            }
        }
        true
    }

    /// Remove one insertion of `key`.
    ///
    /// The operation runs in two phases. Phase one is a read-only
    /// membership check across all partitions; if any partition reports
    /// the key absent, the delete fails with
    /// [`BloomScaleError::NotPresent`] and no counter is modified. Phase
    /// two decrements the key's counter in every partition, clearing bits
    /// whose counters reach zero.
    ///
    /// # Errors
    ///
    /// Returns [`BloomScaleError::NotPresent`] if the key is not in the
    /// filter. The filter state is unchanged in that case.
    ///
    /// # Examples
    ///
    /// ```
    /// use bloomscale::filters::PartitionedCountingFilter;
    ///
    /// let mut filter = PartitionedCountingFilter::new(100, 0.01).unwrap();
    /// filter.add(b"key");
    /// filter.add(b"key");
    ///
    /// filter.delete(b"key").unwrap();
    /// assert!(filter.query(b"key"));
    ///
    /// filter.delete(b"key").unwrap();
    /// assert!(!filter.query(b"key"));
    /// ```
    pub fn delete(&mut self, key: &[u8]) -> Result<()> {
        // Phase one: verify before touching anything. A partial decrement
        // would corrupt counters shared with other keys.
        if !self.query(key) {
            return Err(BloomScaleError::not_present());
        }

        // Phase two: decrement everywhere.
        for j in 0..self.partitions.len() {
            let idx = self.index(key, j);
            self.partitions[j].decrement(idx);
        }
        self.item_count = self.item_count.saturating_sub(1);
        Ok(())
    }

    /// Number of insertions minus successful deletions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.item_count
    }

    /// True if no insertions are outstanding.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.item_count == 0
    }

    /// Capacity the filter was sized for.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.params.expected_items
    }

    /// False-positive rate the filter was sized for.
    #[must_use]
    pub fn target_fp_rate(&self) -> f64 {
        self.params.target_fp_rate
    }

    /// True once the tracked item count has reached the design capacity.
    ///
    /// Additions past this point are accepted but degrade the
    /// false-positive rate beyond the configured target.
    #[must_use]
    pub fn capacity_reached(&self) -> bool {
        self.item_count >= self.params.expected_items
    }

    /// Number of hash functions, equal to the number of partitions.
    #[must_use]
    pub fn hash_count(&self) -> usize {
        self.params.hash_count
    }

    /// Slots per partition.
    #[must_use]
    pub fn partition_size(&self) -> usize {
        self.params.partition_size
    }

    /// Total addressable bits across all partitions.
    #[must_use]
    pub fn bit_count(&self) -> usize {
        self.params.allocated_bits()
    }

    /// Fraction of bits currently set, averaged over partitions.
    ///
    /// At design capacity this approaches `1 - e^(-1)` per the partitioned
    /// sizing math; values well above that indicate overfill.
    #[must_use]
    pub fn fill_rate(&self) -> f64 {
        let total_set: usize = self.partitions.iter().map(|p| p.bits.count_ones()).sum();
        total_set as f64 / self.bit_count() as f64
    }

    /// Estimated current false-positive probability from the observed
    /// fill of each partition.
    ///
    /// The probability that a random key passes partition `j` is that
    /// partition's fill fraction; a false positive must pass all of them.
    #[must_use]
    pub fn estimate_fpr(&self) -> f64 {
        self.partitions
            .iter()
            .map(|p| p.bits.count_ones() as f64 / self.params.partition_size as f64)
            .product()
    }

    /// Number of non-zero counters across all partitions.
    ///
    /// An approximate measure of how many positions are occupied; by the
    /// bit-counter invariant this equals the number of set bits.
    #[must_use]
    pub fn count_nonzero(&self) -> usize {
        self.partitions.iter().map(|p| p.bits.count_ones()).sum()
    }

    /// Largest counter value present in any partition.
    #[must_use]
    pub fn max_counter_value(&self) -> u8 {
        self.partitions
            .iter()
            .flat_map(|p| p.counts.iter().copied())
            .max()
            .unwrap_or(0)
    }

    /// Number of increments that hit an already-saturated counter or
    /// pushed one to [`COUNTER_MAX`].
    #[must_use]
    pub fn saturation_events(&self) -> u64 {
        self.saturation_events
    }

    /// True if any counter ever saturated.
    ///
    /// A saturated filter can no longer guarantee that deletions fully
    /// clear a key, since pinned counters never decrement.
    #[must_use]
    pub fn has_saturated(&self) -> bool {
        self.saturation_events > 0
    }

    /// Reset the filter to empty. Sizing parameters are retained.
    pub fn clear(&mut self) {
        for partition in &mut self.partitions {
            partition.clear();
        }
        self.item_count = 0;
        self.saturation_events = 0;
    }

    /// Insert every key in `keys`.
    pub fn add_batch<K: AsRef<[u8]>>(&mut self, keys: &[K]) {
        for key in keys {
            self.add(key.as_ref());
        }
    }

    /// Delete every key in `keys`, skipping keys that are not present.
    ///
    /// # Returns
    ///
    /// Number of keys successfully deleted.
    pub fn delete_batch<K: AsRef<[u8]>>(&mut self, keys: &[K]) -> usize {
        keys.iter()
            .filter(|key| self.delete(key.as_ref()).is_ok())
            .count()
    }

    /// Membership test for every key in `keys`, in order.
    #[must_use]
    pub fn contains_batch<K: AsRef<[u8]>>(&self, keys: &[K]) -> Vec<bool> {
        keys.iter().map(|key| self.query(key.as_ref())).collect()
    }

    /// Approximate heap memory used by the filter, in bytes.
    #[must_use]
    pub fn memory_usage(&self) -> usize {
        self.partitions
            .iter()
            .map(|p| p.bits.memory_usage() + p.counts.capacity())
            .sum()
    }
}

impl MembershipFilter for PartitionedCountingFilter {
    fn insert(&mut self, key: &[u8]) {
        self.add(key);
    }

    fn contains(&self, key: &[u8]) -> bool {
        self.query(key)
    }

    fn len(&self) -> usize {
        self.item_count
    }

    fn expected_items(&self) -> usize {
        self.params.expected_items
    }

    fn bit_count(&self) -> usize {
        self.params.allocated_bits()
    }

    fn hash_count(&self) -> usize {
        self.params.hash_count
    }
}

impl DeletableFilter for PartitionedCountingFilter {
    fn delete(&mut self, key: &[u8]) -> Result<()> {
        PartitionedCountingFilter::delete(self, key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_derives_documented_parameters() {
        let filter = PartitionedCountingFilter::new(20, 0.08).unwrap();
        assert_eq!(filter.hash_count(), 4);
        assert_eq!(filter.partition_size(), 26);
        assert_eq!(filter.bit_count(), 104);
        assert_eq!(filter.capacity(), 20);
    }

    #[test]
    fn test_new_rejects_invalid_parameters() {
        assert!(PartitionedCountingFilter::new(0, 0.01).is_err());
        assert!(PartitionedCountingFilter::new(100, 0.0).is_err());
        assert!(PartitionedCountingFilter::new(100, 1.0).is_err());
        assert!(PartitionedCountingFilter::new(100, -0.5).is_err());
    }

    #[test]
    fn test_add_then_query() {
        let mut filter = PartitionedCountingFilter::new(100, 0.01).unwrap();
        filter.add(b"hello");
        assert!(filter.query(b"hello"));
        assert_eq!(filter.len(), 1);
    }

    #[test]
    fn test_no_false_negatives() {
        let mut filter = PartitionedCountingFilter::new(1000, 0.01).unwrap();
        for i in 0..1000u32 {
            filter.add(&i.to_le_bytes());
        }
        for i in 0..1000u32 {
            assert!(filter.query(&i.to_le_bytes()), "false negative for {}", i);
        }
    }

    #[test]
    fn test_empty_filter_contains_nothing() {
        let filter = PartitionedCountingFilter::new(100, 0.01).unwrap();
        assert!(!filter.query(b"anything"));
        assert!(!filter.query(b""));
        assert!(filter.is_empty());
    }

    #[test]
    fn test_delete_removes_key() {
        let mut filter = PartitionedCountingFilter::new(100, 0.01).unwrap();
        filter.add(b"key");
        filter.delete(b"key").unwrap();
        assert!(!filter.query(b"key"));
        assert_eq!(filter.len(), 0);
    }

    #[test]
    fn test_delete_absent_key_fails() {
        let mut filter = PartitionedCountingFilter::new(100, 0.01).unwrap();
        let err = filter.delete(b"never added").unwrap_err();
        assert!(matches!(err, BloomScaleError::NotPresent));
    }

    #[test]
    fn test_failed_delete_leaves_state_untouched() {
        let mut filter = PartitionedCountingFilter::new(100, 0.01).unwrap();
        for i in 0..50u32 {
            filter.add(&i.to_le_bytes());
        }

        let counts_before: Vec<Vec<u8>> =
            filter.partitions.iter().map(|p| p.counts.clone()).collect();
        let len_before = filter.len();

        assert!(filter.delete(b"absent key").is_err());

        let counts_after: Vec<Vec<u8>> =
            filter.partitions.iter().map(|p| p.counts.clone()).collect();
        assert_eq!(counts_before, counts_after, "failed delete mutated counters");
        assert_eq!(filter.len(), len_before);
    }

    #[test]
    fn test_delete_does_not_affect_other_keys() {
        let mut filter = PartitionedCountingFilter::new(1000, 0.01).unwrap();
        for i in 0..500u32 {
            filter.add(&i.to_le_bytes());
        }

        for i in 0..250u32 {
            filter.delete(&i.to_le_bytes()).unwrap();
        }

        for i in 250..500u32 {
            assert!(
                filter.query(&i.to_le_bytes()),
                "delete of other keys removed {}",
                i
            );
        }
    }

    #[test]
    fn test_duplicate_adds_need_matching_deletes() {
        let mut filter = PartitionedCountingFilter::new(100, 0.01).unwrap();
        filter.add(b"dup");
        filter.add(b"dup");
        filter.add(b"dup");

        filter.delete(b"dup").unwrap();
        assert!(filter.query(b"dup"));
        filter.delete(b"dup").unwrap();
        assert!(filter.query(b"dup"));
        filter.delete(b"dup").unwrap();
        assert!(!filter.query(b"dup"));
    }

    #[test]
    fn test_counter_saturation_is_observable() {
        let mut filter = PartitionedCountingFilter::new(100, 0.01).unwrap();
        for _ in 0..20 {
            filter.add(b"hot key");
        }
        assert!(filter.has_saturated());
        assert_eq!(filter.max_counter_value(), COUNTER_MAX);
        // Still queryable after saturation
        assert!(filter.query(b"hot key"));
    }

    #[test]
    fn test_saturated_counter_stays_pinned_on_delete() {
        let mut filter = PartitionedCountingFilter::new(100, 0.01).unwrap();
        for _ in 0..20 {
            filter.add(b"hot key");
        }
        // 20 deletes: decrements stop at the pinned value, so the key
        // remains reported present.
        for _ in 0..20 {
            let _ = filter.delete(b"hot key");
        }
        assert!(filter.query(b"hot key"));
        assert_eq!(filter.max_counter_value(), COUNTER_MAX);
    }

    #[test]
    fn test_bit_counter_invariant_holds() {
        let mut filter = PartitionedCountingFilter::new(200, 0.01).unwrap();
        for i in 0..150u32 {
            filter.add(&i.to_le_bytes());
        }
        for i in 0..75u32 {
            filter.delete(&i.to_le_bytes()).unwrap();
        }

        for partition in &filter.partitions {
            for (i, &count) in partition.counts.iter().enumerate() {
                assert_eq!(
                    partition.bits.get(i),
                    count > 0,
                    "bit/counter mismatch at slot {}",
                    i
                );
            }
        }
    }

    #[test]
    fn test_capacity_reached() {
        let mut filter = PartitionedCountingFilter::new(10, 0.01).unwrap();
        assert!(!filter.capacity_reached());
        for i in 0..10u32 {
            filter.add(&i.to_le_bytes());
        }
        assert!(filter.capacity_reached());
    }

    #[test]
    fn test_clear_resets_everything() {
        let mut filter = PartitionedCountingFilter::new(100, 0.01).unwrap();
        for _ in 0..20 {
            filter.add(b"x");
        }
        filter.clear();
        assert!(filter.is_empty());
        assert!(!filter.query(b"x"));
        assert_eq!(filter.saturation_events(), 0);
        assert_eq!(filter.max_counter_value(), 0);
        // Sizing retained
        assert_eq!(filter.capacity(), 100);
    }

    #[test]
    fn test_fill_rate_and_fpr_estimate() {
        let mut filter = PartitionedCountingFilter::new(1000, 0.01).unwrap();
        assert_eq!(filter.fill_rate(), 0.0);
        assert_eq!(filter.estimate_fpr(), 0.0);

        for i in 0..1000u32 {
            filter.add(&i.to_le_bytes());
        }
        let fill = filter.fill_rate();
        assert!(fill > 0.3 && fill < 0.8, "fill rate {} out of range", fill);

        let fpr = filter.estimate_fpr();
        assert!(fpr > 0.0 && fpr < 0.1, "estimated fpr {} out of range", fpr);
    }

    #[test]
    fn test_batch_operations() {
        let mut filter = PartitionedCountingFilter::new(100, 0.01).unwrap();
        let keys: Vec<&[u8]> = vec![b"a", b"b", b"c"];
        filter.add_batch(&keys);
        assert_eq!(filter.contains_batch(&keys), vec![true, true, true]);
        assert_eq!(filter.len(), 3);
    }

    #[test]
    fn test_delete_batch_counts_successes() {
        let mut filter = PartitionedCountingFilter::new(100, 0.01).unwrap();
        let keys: Vec<&[u8]> = vec![b"a", b"b", b"c"];
        filter.add_batch(&keys);

        let mixed: Vec<&[u8]> = vec![b"a", b"not there", b"c"];
        assert_eq!(filter.delete_batch(&mixed), 2);
        assert_eq!(filter.contains_batch(&keys), vec![false, true, false]);
        assert_eq!(filter.len(), 1);
    }

    #[test]
    fn test_count_nonzero_tracks_occupancy() {
        let mut filter = PartitionedCountingFilter::new(100, 0.01).unwrap();
        assert_eq!(filter.count_nonzero(), 0);

        filter.add(b"x");
        let occupied = filter.count_nonzero();
        assert!(occupied >= 1 && occupied <= filter.hash_count());

        filter.delete(b"x").unwrap();
        assert_eq!(filter.count_nonzero(), 0);
    }

    #[test]
    fn test_trait_object_usage() {
        let mut filter = PartitionedCountingFilter::new(100, 0.01).unwrap();
        {
            let f: &mut dyn DeletableFilter = &mut filter;
            f.insert(b"via trait");
            assert!(f.contains(b"via trait"));
            f.delete(b"via trait").unwrap();
        }
        assert!(!filter.query(b"via trait"));
    }

    #[test]
    fn test_empty_key_is_a_valid_key() {
        let mut filter = PartitionedCountingFilter::new(100, 0.01).unwrap();
        filter.add(b"");
        assert!(filter.query(b""));
        filter.delete(b"").unwrap();
        assert!(!filter.query(b""));
    }
}
