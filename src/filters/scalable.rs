//! Scalable filter chain with bounded compound false-positive rate.
//!
//! # Overview
//!
//! A single Bloom filter degrades sharply once it is filled past its
//! design capacity. [`ScalableFilterChain`] avoids that by holding a
//! series of [`PartitionedCountingFilter`]s: when the newest filter
//! reaches capacity, a new one is appended with a larger capacity and a
//! tighter false-positive rate, and subsequent insertions land there.
//!
//! The per-filter rates form a geometric series. With tightening ratio
//! `r`, the first filter targets `error_rate * (1 - r)` and each
//! successor multiplies by `r`, so the union bound over any number of
//! filters stays below the configured `error_rate`.
//!
//! # Examples
//!
//! ```
//! use bloomscale::filters::ScalableFilterChain;
//!
//! let mut chain = ScalableFilterChain::new(10, 0.01).unwrap();
//! for i in 0..100u32 {
//!     chain.add(&i.to_le_bytes());
//! }
//! assert!(chain.filter_count() > 1);
//! assert!(chain.contains(&42u32.to_le_bytes()));
//! assert!(chain.max_fpr() < 0.01);
//! ```

#![allow(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]

use crate::error::{BloomScaleError, Result};
use crate::filters::PartitionedCountingFilter;

/// Default capacity multiplier between consecutive filters.
pub const DEFAULT_GROWTH_RATIO: f64 = 4.0;

/// Default false-positive tightening ratio between consecutive filters.
pub const DEFAULT_TIGHTENING_RATIO: f64 = 0.9;

/// Floor for per-filter false-positive targets.
///
/// Repeated tightening drives the target toward zero geometrically; below
/// this floor the sizing math would demand absurd bit counts for no
/// practical gain.
pub const MIN_FPR: f64 = 1e-15;

/// Append-only chain of partitioned counting filters that grows on demand.
///
/// The chain starts with no filters at all; the first insert allocates
/// the first filter, and each later insert that finds the newest filter
/// at capacity appends another. Lookups scan filters newest-first, since
/// recently added keys live in the newest filter. Insertion is
/// idempotent at the chain level: a key already present anywhere in the
/// chain is not inserted again.
///
/// The chain deliberately exposes no delete operation. A key may be a
/// false positive in an older filter while genuinely stored in a newer
/// one; deleting from the wrong filter would corrupt shared counters.
/// Deletion belongs on a single [`PartitionedCountingFilter`].
#[derive(Debug, Clone)]
pub struct ScalableFilterChain {
    filters: Vec<PartitionedCountingFilter>,
    initial_capacity: usize,
    error_rate: f64,
    growth_ratio: f64,
    tightening_ratio: f64,
}

impl ScalableFilterChain {
    /// Create a chain with the default growth ratio
    /// ([`DEFAULT_GROWTH_RATIO`]) and tightening ratio
    /// ([`DEFAULT_TIGHTENING_RATIO`]).
    ///
    /// `initial_capacity` sizes the first filter, which is allocated on
    /// the first insert rather than here; `error_rate` bounds the
    /// compound false-positive rate of the whole chain, however many
    /// filters it grows to.
    ///
    /// # Errors
    ///
    /// Returns an error if `initial_capacity` is zero or `error_rate` is
    /// outside `(0, 1)`.
    ///
    /// # Examples
    ///
    /// ```
    /// use bloomscale::filters::ScalableFilterChain;
    ///
    /// let mut chain = ScalableFilterChain::new(1000, 0.001).unwrap();
    /// assert_eq!(chain.filter_count(), 0);
    /// assert_eq!(chain.capacity(), 0);
    ///
    /// chain.add(b"first");
    /// assert_eq!(chain.filter_count(), 1);
    /// assert_eq!(chain.capacity(), 1000);
    /// ```
    pub fn new(initial_capacity: usize, error_rate: f64) -> Result<Self> {
        Self::with_ratios(
            initial_capacity,
            error_rate,
            DEFAULT_GROWTH_RATIO,
            DEFAULT_TIGHTENING_RATIO,
        )
    }

    /// Create a chain with explicit growth and tightening ratios.
    ///
    /// # Errors
    ///
    /// Returns an error if `initial_capacity` is zero, `error_rate` is
    /// outside `(0, 1)`, `growth_ratio` is not greater than 1, or
    /// `tightening_ratio` is outside `(0, 1)`.
    pub fn with_ratios(
        initial_capacity: usize,
        error_rate: f64,
        growth_ratio: f64,
        tightening_ratio: f64,
    ) -> Result<Self> {
        if initial_capacity == 0 {
            return Err(BloomScaleError::invalid_item_count(0));
        }
        if !error_rate.is_finite() || error_rate <= 0.0 || error_rate >= 1.0 {
            return Err(BloomScaleError::fp_rate_out_of_bounds(error_rate));
        }
        if !growth_ratio.is_finite() || growth_ratio <= 1.0 {
            return Err(BloomScaleError::invalid_parameters(format!(
                "growth ratio must be greater than 1, got {growth_ratio}"
            )));
        }
        if !tightening_ratio.is_finite() || tightening_ratio <= 0.0 || tightening_ratio >= 1.0 {
            return Err(BloomScaleError::invalid_parameters(format!(
                "tightening ratio must be in (0, 1), got {tightening_ratio}"
            )));
        }

        Ok(Self {
            filters: Vec::new(),
            initial_capacity,
            error_rate,
            growth_ratio,
            tightening_ratio,
        })
    }

    /// Insert a key unless it is already present somewhere in the chain.
    ///
    /// Returns `Ok(true)` if the key was already present (no mutation),
    /// `Ok(false)` if it was inserted. The first insert allocates the
    /// first filter; later inserts that find the newest filter at
    /// capacity append a new one and the key lands there.
    ///
    /// # Errors
    ///
    /// Returns an error if a growth filter cannot be constructed. With
    /// valid ratios this does not occur in practice.
    ///
    /// # Examples
    ///
    /// ```
    /// use bloomscale::filters::ScalableFilterChain;
    ///
    /// let mut chain = ScalableFilterChain::new(100, 0.01).unwrap();
    /// assert!(!chain.add_checked(b"key").unwrap());
    /// assert!(chain.add_checked(b"key").unwrap());
    /// assert_eq!(chain.len(), 1);
    /// ```
    pub fn add_checked(&mut self, key: &[u8]) -> Result<bool> {
        if self.contains(key) {
            return Ok(true);
        }

        let needs_filter = match self.filters.last() {
            None => true,
            Some(active) => active.capacity_reached(),
        };
        if needs_filter {
            self.grow()?;
        }
        if let Some(active) = self.filters.last_mut() {
            active.add(key);
        }
        Ok(false)
    }

    /// Insert a key, returning true if it was already present.
    ///
    /// Convenience wrapper over [`add_checked`](Self::add_checked). If
    /// growth fails (which valid ratios rule out), the key is stored in
    /// the current filter past its capacity rather than dropped, trading
    /// false-positive rate for completeness.
    pub fn add(&mut self, key: &[u8]) -> bool {
        match self.add_checked(key) {
            Ok(already_present) => already_present,
            Err(_) => {
                if let Some(active) = self.filters.last_mut() {
                    active.add(key);
                }
                false
            }
        }
    }

    /// Test membership across the chain, newest filter first.
    ///
    /// # Examples
    ///
    /// ```
    /// use bloomscale::filters::ScalableFilterChain;
    ///
    /// let mut chain = ScalableFilterChain::new(100, 0.01).unwrap();
    /// chain.add(b"present");
    /// assert!(chain.contains(b"present"));
    /// assert!(!chain.contains(b"absent"));
    /// ```
    #[must_use]
    pub fn contains(&self, key: &[u8]) -> bool {
        self.filters.iter().rev().any(|f| f.query(key))
    }

    /// Append the next filter in the series.
    ///
    /// The first filter takes the (1 - r) share of the error budget;
    /// each successor scales capacity by the growth ratio and tightens
    /// its target by r.
    fn grow(&mut self) -> Result<()> {
        let filter = match self.filters.last() {
            None => {
                let first_fp = (self.error_rate * (1.0 - self.tightening_ratio)).max(MIN_FPR);
                PartitionedCountingFilter::new(self.initial_capacity, first_fp)?
            }
            Some(active) => {
                let next_capacity =
                    ((active.capacity() as f64) * self.growth_ratio).ceil() as usize;
                let next_capacity = next_capacity.max(active.capacity() + 1);
                let next_fp = (active.target_fp_rate() * self.tightening_ratio).max(MIN_FPR);
                PartitionedCountingFilter::new(next_capacity, next_fp)?
            }
        };
        self.filters.push(filter);
        Ok(())
    }

    /// Number of distinct keys inserted.
    #[must_use]
    pub fn len(&self) -> usize {
        self.filters.iter().map(PartitionedCountingFilter::len).sum()
    }

    /// Number of distinct keys inserted. Alias for [`len`](Self::len).
    #[must_use]
    pub fn count(&self) -> usize {
        self.len()
    }

    /// True if no keys have been inserted.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.filters.iter().all(PartitionedCountingFilter::is_empty)
    }

    /// Capacity the first filter is sized for.
    #[must_use]
    pub fn initial_capacity(&self) -> usize {
        self.initial_capacity
    }

    /// Total design capacity across the filters allocated so far.
    ///
    /// Zero until the first insert allocates the first filter.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.filters
            .iter()
            .map(PartitionedCountingFilter::capacity)
            .sum()
    }

    /// Number of filters currently in the chain.
    #[must_use]
    pub fn filter_count(&self) -> usize {
        self.filters.len()
    }

    /// Configured compound false-positive bound.
    #[must_use]
    pub fn error_rate(&self) -> f64 {
        self.error_rate
    }

    /// Growth ratio applied when a new filter is appended.
    #[must_use]
    pub fn growth_ratio(&self) -> f64 {
        self.growth_ratio
    }

    /// Tightening ratio applied to each successive filter's target.
    #[must_use]
    pub fn tightening_ratio(&self) -> f64 {
        self.tightening_ratio
    }

    /// Union bound on the chain's current false-positive probability:
    /// the sum of each filter's target rate.
    ///
    /// Always below [`error_rate`](Self::error_rate) by construction.
    #[must_use]
    pub fn max_fpr(&self) -> f64 {
        self.filters
            .iter()
            .map(PartitionedCountingFilter::target_fp_rate)
            .sum()
    }

    /// Approximate heap memory used by the whole chain, in bytes.
    #[must_use]
    pub fn memory_usage(&self) -> usize {
        self.filters
            .iter()
            .map(PartitionedCountingFilter::memory_usage)
            .sum()
    }
}
