//! Core membership filter trait definitions.
//!
//! Two traits form the seam between callers and filter implementations:
//!
//! ```text
//! MembershipFilter        (insert/contains over opaque byte keys)
//!     └── DeletableFilter (adds two-phase delete for counting filters)
//! ```
//!
//! # Design Principles
//!
//! 1. **No False Negatives**: if a key was inserted and not deleted,
//!    `contains()` MUST return `true`
//! 2. **Bounded False Positives**: the false positive rate matches the
//!    configured parameters
//! 3. **Opaque Keys**: keys are byte slices; how they were produced (file
//!    line, prompt, network request) is irrelevant to the filter
//!
//! # Concurrency Contract
//!
//! Mutating methods take `&mut self`: a single writer at a time, enforced by
//! the borrow checker. `contains()` takes `&self` and is safe to run
//! concurrently with other queries. For shared mutation, wrap the filter in
//! `Arc<Mutex<_>>` or `Arc<RwLock<_>>`; the bit-and-counter pair of a slot
//! must be updated as one unit, which exclusive access guarantees.

#![allow(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

use crate::error::Result;

/// Byte-keyed probabilistic membership filter.
///
/// # Guarantees
///
/// ```text
/// filter.insert(key);
/// assert!(filter.contains(key)); // MUST hold (no false negatives)
/// ```
///
/// # Examples
///
/// ```
/// use bloomscale::core::MembershipFilter;
/// use bloomscale::filters::PartitionedCountingFilter;
///
/// let mut filter = PartitionedCountingFilter::new(1000, 0.01).unwrap();
/// filter.insert(b"alice");
/// assert!(filter.contains(b"alice"));
/// assert!(!filter.contains(b"bob"));
/// ```
pub trait MembershipFilter: Send + Sync {
    /// Insert a key into the filter.
    ///
    /// After this call, `contains(key)` is guaranteed to return `true`.
    fn insert(&mut self, key: &[u8]);

    /// Check whether a key might be in the filter.
    ///
    /// # Returns
    ///
    /// * `true` - Key **might** be present (bounded false positive chance)
    /// * `false` - Key is **definitely** not present
    #[must_use]
    fn contains(&self, key: &[u8]) -> bool;

    /// Number of keys currently accounted as inserted.
    #[must_use]
    fn len(&self) -> usize;

    /// `true` if no keys are accounted as inserted.
    #[must_use]
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Designed-for capacity in keys.
    #[must_use]
    fn expected_items(&self) -> usize;

    /// Total bits across the filter's bit state.
    #[must_use]
    fn bit_count(&self) -> usize;

    /// Number of hash functions (equals the partition count).
    #[must_use]
    fn hash_count(&self) -> usize;
}

/// Membership filter supporting safe deletion via reference counts.
///
/// Deletion is two-phase: membership is verified read-only first, and only
/// then are all partitions decremented. A failed delete mutates nothing.
///
/// # Examples
///
/// ```
/// use bloomscale::core::{DeletableFilter, MembershipFilter};
/// use bloomscale::filters::PartitionedCountingFilter;
///
/// let mut filter = PartitionedCountingFilter::new(1000, 0.01).unwrap();
/// filter.insert(b"key");
/// assert!(filter.delete(b"key").is_ok());
/// assert!(!filter.contains(b"key"));
/// assert!(filter.delete(b"key").is_err());
/// ```
pub trait DeletableFilter: MembershipFilter {
    /// Remove one insertion of `key` from the filter.
    ///
    /// # Errors
    ///
    /// Returns [`crate::BloomScaleError::NotPresent`] if the filter does not
    /// report the key as present; no state is modified in that case.
    fn delete(&mut self, key: &[u8]) -> Result<()>;
}
