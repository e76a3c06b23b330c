//! Hash functions for partitioned filters.
//!
//! A partitioned filter needs one statistically independent index per
//! partition. Rather than k distinct hash algorithms, the crate uses a
//! single well-distributed 64-bit hash parameterized by a per-partition
//! seed: partition `j` computes `hash(key, seed = j) mod partition_size`.
//! Seeded xxh3 exhibits avalanche behavior across seeds, so the indices
//! are independent enough for the false-positive formula to hold.
//!
//! # Design Philosophy
//!
//! 1. **Byte-Oriented**: hashers consume `&[u8]`, giving callers explicit
//!    control over serialization
//! 2. **Seed-Parameterized**: one algorithm, many independent functions
//! 3. **Non-Cryptographic**: speed and distribution, not collision
//!    resistance against adversaries
//!
//! # Examples
//!
//! ```
//! use bloomscale::hash::{FilterHasher, XxSeedHasher};
//!
//! let hasher = XxSeedHasher::new();
//! let h0 = hasher.hash_with_seed(b"key", 0);
//! let h1 = hasher.hash_with_seed(b"key", 1);
//! assert_ne!(h0, h1);
//! ```

#![allow(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

use xxhash_rust::xxh3::xxh3_64_with_seed;

/// Seeded hash function trait for filter index derivation.
///
/// # Requirements
///
/// Implementations must provide:
/// - **Determinism**: same `(bytes, seed)` → same output, across runs
/// - **Avalanche**: a single-bit input change flips ~50% of output bits
/// - **Seed independence**: outputs under different seeds are statistically
///   independent (correlation below noise for filter sizing purposes)
///
/// # Thread Safety
///
/// Implementations must be `Send + Sync`; hashing is read-only.
pub trait FilterHasher: Send + Sync {
    /// Hash `bytes` under the given `seed` to a 64-bit value.
    fn hash_with_seed(&self, bytes: &[u8], seed: u64) -> u64;

    /// Human-readable name for diagnostics.
    fn name(&self) -> &'static str;
}

/// Default hasher: xxh3 with native seeding.
///
/// xxh3 is a fast non-cryptographic hash with excellent distribution; its
/// native seed parameter gives independent functions per partition without
/// ad-hoc seed mixing.
///
/// An optional instance-level `base_seed` shifts the whole seed space,
/// useful when two filters must not share index patterns for the same keys.
///
/// # Examples
///
/// ```
/// use bloomscale::hash::{FilterHasher, XxSeedHasher};
///
/// let hasher = XxSeedHasher::new();
/// assert_eq!(
///     hasher.hash_with_seed(b"stable", 3),
///     hasher.hash_with_seed(b"stable", 3),
/// );
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct XxSeedHasher {
    base_seed: u64,
}

impl XxSeedHasher {
    /// Create a hasher with base seed 0.
    #[must_use]
    pub fn new() -> Self {
        Self { base_seed: 0 }
    }

    /// Create a hasher whose seed space is offset by `base_seed`.
    ///
    /// # Examples
    ///
    /// ```
    /// use bloomscale::hash::{FilterHasher, XxSeedHasher};
    ///
    /// let a = XxSeedHasher::with_base_seed(1);
    /// let b = XxSeedHasher::with_base_seed(2);
    /// assert_ne!(a.hash_with_seed(b"key", 0), b.hash_with_seed(b"key", 0));
    /// ```
    #[must_use]
    pub fn with_base_seed(base_seed: u64) -> Self {
        Self { base_seed }
    }
}

impl FilterHasher for XxSeedHasher {
    #[inline]
    fn hash_with_seed(&self, bytes: &[u8], seed: u64) -> u64 {
        xxh3_64_with_seed(bytes, self.base_seed.wrapping_add(seed))
    }

    #[inline]
    fn name(&self) -> &'static str {
        "XxSeedHasher"
    }
}
