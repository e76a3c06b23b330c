//! Optimal parameter calculation for partitioned counting filters.
//!
//! Implements the closed-form sizing formulas from Bloom's 1970 analysis,
//! plus the partition split used by [`crate::filters::PartitionedCountingFilter`].
//!
//! # Mathematical Background
//!
//! Given:
//! - `n`: Expected number of elements
//! - `ε`: Target false positive rate
//!
//! Optimal parameters:
//! - `m = ⌈-n × ln(ε) / (ln 2)²⌉` (bits in filter)
//! - `k = round((m/n) × ln 2)` (number of hash functions), clamped to [1, 32]
//! - `s = ⌊m / k⌋` (bits per partition), at least 1
//!
//! Expected false positive rate after `n` inserts:
//! - `p = (1 - e^(-kn/m))^k`
//!
//! The partition size is fixed once at construction. All index arithmetic
//! downstream is integer arithmetic against that fixed `s`; nothing is
//! recomputed per call.
//!
//! # References
//!
//! - Bloom, Burton H. (1970). "Space/Time Trade-offs in Hash Coding with Allowable Errors"
//! - Almeida, P., Baquero, C., Preguiça, N., & Hutchison, D. (2007). "Scalable Bloom Filters"

#![allow(clippy::pedantic)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_precision_loss)]

use crate::error::{BloomScaleError, Result};
use std::f64::consts::LN_2;

/// Mathematical constant: (ln 2)² ≈ 0.4804530139182014
const LN2_SQUARED: f64 = LN_2 * LN_2;

/// Maximum practical number of hash functions (and partitions).
///
/// Beyond 32 the computational cost exceeds the marginal improvement in
/// false positive rate.
pub const MAX_HASH_FUNCTIONS: usize = 32;

/// Minimum number of hash functions.
pub const MIN_HASH_FUNCTIONS: usize = 1;

/// Calculate the optimal number of bits for given constraints.
///
/// Implements the formula: `m = ⌈-n × ln(ε) / (ln 2)²⌉`
///
/// # Arguments
///
/// * `n` - Expected number of elements to insert (must be > 0)
/// * `fp_rate` - Target false positive rate (must be in range (0, 1))
///
/// # Errors
///
/// - [`BloomScaleError::InvalidItemCount`] if `n == 0`
/// - [`BloomScaleError::FalsePositiveRateOutOfBounds`] if `fp_rate` not in (0, 1)
/// - [`BloomScaleError::InvalidParameters`] if the result exceeds system limits
///
/// # Examples
///
/// ```
/// use bloomscale::core::params::optimal_bit_count;
///
/// // For 1000 items with 1% false positive rate
/// let bits = optimal_bit_count(1000, 0.01).unwrap();
/// assert!(bits >= 9585 && bits <= 9586);
/// ```
pub fn optimal_bit_count(n: usize, fp_rate: f64) -> Result<usize> {
    if n == 0 {
        return Err(BloomScaleError::invalid_item_count(n));
    }

    if fp_rate <= 0.0 || fp_rate >= 1.0 {
        return Err(BloomScaleError::fp_rate_out_of_bounds(fp_rate));
    }

    let m = -(n as f64) * fp_rate.ln() / LN2_SQUARED;

    // Round up so the realized FP rate meets (or beats) the target
    let m_final = m.ceil().max(1.0) as usize;

    if m_final > usize::MAX / 2 {
        return Err(BloomScaleError::invalid_parameters(format!(
            "Calculated filter size {} exceeds reasonable bounds. \
             Consider increasing the false positive rate or reducing item count.",
            m_final
        )));
    }

    Ok(m_final)
}

/// Calculate the optimal number of hash functions.
///
/// Implements the formula: `k = round((m/n) × ln 2)`, clamped to
/// [[`MIN_HASH_FUNCTIONS`], [`MAX_HASH_FUNCTIONS`]].
///
/// # Errors
///
/// - [`BloomScaleError::InvalidFilterSize`] if `m == 0`
/// - [`BloomScaleError::InvalidItemCount`] if `n == 0`
///
/// # Examples
///
/// ```
/// use bloomscale::core::params::optimal_hash_count;
///
/// let k = optimal_hash_count(9586, 1000).unwrap();
/// assert_eq!(k, 7);
/// ```
pub fn optimal_hash_count(m: usize, n: usize) -> Result<usize> {
    if m == 0 {
        return Err(BloomScaleError::invalid_filter_size(m));
    }

    if n == 0 {
        return Err(BloomScaleError::invalid_item_count(n));
    }

    let k = (m as f64 / n as f64) * LN_2;
    let k_final = (k.round() as usize).clamp(MIN_HASH_FUNCTIONS, MAX_HASH_FUNCTIONS);

    Ok(k_final)
}

/// Calculate the expected false positive rate for given parameters.
///
/// Implements the formula: `p = (1 - e^(-kn/m))^k`
///
/// # Errors
///
/// - [`BloomScaleError::InvalidFilterSize`] if `m == 0`
/// - [`BloomScaleError::InvalidHashCount`] if `k` is outside valid bounds
///
/// # Examples
///
/// ```
/// use bloomscale::core::params::expected_fp_rate;
///
/// let fp = expected_fp_rate(9586, 1000, 7).unwrap();
/// assert!((fp - 0.01).abs() < 0.001);
/// ```
pub fn expected_fp_rate(m: usize, n: usize, k: usize) -> Result<f64> {
    if m == 0 {
        return Err(BloomScaleError::invalid_filter_size(m));
    }

    if !(MIN_HASH_FUNCTIONS..=MAX_HASH_FUNCTIONS).contains(&k) {
        return Err(BloomScaleError::invalid_hash_count(
            k,
            MIN_HASH_FUNCTIONS,
            MAX_HASH_FUNCTIONS,
        ));
    }

    if n == 0 {
        return Ok(0.0);
    }

    let exponent = -((k * n) as f64) / m as f64;
    let prob_bit_one = 1.0 - exponent.exp();
    let fp_rate = prob_bit_one.powf(k as f64);

    Ok(fp_rate.clamp(0.0, 1.0))
}

/// Immutable parameter set for one [`crate::filters::PartitionedCountingFilter`].
///
/// Derived once at construction from `(expected_items, target_fp_rate)` and
/// never recomputed. The filter owns exactly `hash_count` partitions of
/// exactly `partition_size` bits each.
///
/// # Examples
///
/// ```
/// use bloomscale::core::FilterParameters;
///
/// let params = FilterParameters::derive(20, 0.08).unwrap();
/// assert_eq!(params.bit_array_size, 106);
/// assert_eq!(params.hash_count, 4);
/// assert_eq!(params.partition_size, 26);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FilterParameters {
    /// Designed-for number of elements (n).
    pub expected_items: usize,
    /// Designed-for false positive probability (ε).
    pub target_fp_rate: f64,
    /// Total bit budget (m) before the partition split.
    pub bit_array_size: usize,
    /// Number of hash functions, equal to the number of partitions (k).
    pub hash_count: usize,
    /// Bits per partition: ⌊m / k⌋, at least 1.
    pub partition_size: usize,
}

impl FilterParameters {
    /// Derive the full parameter set from capacity and target FP rate.
    ///
    /// # Errors
    ///
    /// - [`BloomScaleError::InvalidItemCount`] if `expected_items == 0`
    /// - [`BloomScaleError::FalsePositiveRateOutOfBounds`] if `target_fp_rate`
    ///   is not in (0, 1)
    pub fn derive(expected_items: usize, target_fp_rate: f64) -> Result<Self> {
        let bit_array_size = optimal_bit_count(expected_items, target_fp_rate)?;
        let hash_count = optimal_hash_count(bit_array_size, expected_items)?;

        // Floor division, clamped so a tiny m never yields an empty partition
        let partition_size = (bit_array_size / hash_count).max(1);

        Ok(Self {
            expected_items,
            target_fp_rate,
            bit_array_size,
            hash_count,
            partition_size,
        })
    }

    /// Total bits actually allocated across all partitions.
    ///
    /// This is `hash_count × partition_size`, which may be slightly below
    /// `bit_array_size` because of the floor in the partition split.
    #[must_use]
    pub fn allocated_bits(&self) -> usize {
        self.hash_count * self.partition_size
    }
}
