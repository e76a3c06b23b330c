//! Fluent builders for filter construction.
//!
//! The builders collect configuration incrementally and validate it once
//! at [`build`](PartitionedFilterBuilder::build) time, which reads better
//! than positional constructors when more than two knobs are involved.
//!
//! # Examples
//!
//! ```
//! use bloomscale::builder::ScalableChainBuilder;
//!
//! let chain = ScalableChainBuilder::new()
//!     .initial_capacity(1000)
//!     .error_rate(0.001)
//!     .growth_ratio(2.0)
//!     .build()
//!     .unwrap();
//! assert_eq!(chain.initial_capacity(), 1000);
//! ```

#![allow(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

use crate::error::Result;
use crate::filters::{
    PartitionedCountingFilter, ScalableFilterChain, DEFAULT_GROWTH_RATIO,
    DEFAULT_TIGHTENING_RATIO,
};

/// Shared parameter validation used by every builder.
pub mod validation {
    use crate::error::{BloomScaleError, Result};

    /// Reject a zero expected-item count.
    pub fn validate_item_count(count: usize) -> Result<()> {
        if count == 0 {
            return Err(BloomScaleError::invalid_item_count(count));
        }
        Ok(())
    }

    /// Reject false-positive rates outside the open interval `(0, 1)`.
    pub fn validate_fp_rate(fp_rate: f64) -> Result<()> {
        if !fp_rate.is_finite() || fp_rate <= 0.0 || fp_rate >= 1.0 {
            return Err(BloomScaleError::fp_rate_out_of_bounds(fp_rate));
        }
        Ok(())
    }

    /// Reject growth ratios not strictly greater than 1.
    pub fn validate_growth_ratio(ratio: f64) -> Result<()> {
        if !ratio.is_finite() || ratio <= 1.0 {
            return Err(BloomScaleError::invalid_parameters(format!(
                "growth ratio must be greater than 1, got {ratio}"
            )));
        }
        Ok(())
    }

    /// Reject tightening ratios outside the open interval `(0, 1)`.
    pub fn validate_tightening_ratio(ratio: f64) -> Result<()> {
        if !ratio.is_finite() || ratio <= 0.0 || ratio >= 1.0 {
            return Err(BloomScaleError::invalid_parameters(format!(
                "tightening ratio must be in (0, 1), got {ratio}"
            )));
        }
        Ok(())
    }
}

/// Builder for [`PartitionedCountingFilter`].
///
/// # Examples
///
/// ```
/// use bloomscale::builder::PartitionedFilterBuilder;
///
/// let filter = PartitionedFilterBuilder::new()
///     .expected_items(5000)
///     .target_fp_rate(0.01)
///     .build()
///     .unwrap();
/// assert_eq!(filter.capacity(), 5000);
/// ```
#[derive(Debug, Clone)]
pub struct PartitionedFilterBuilder {
    expected_items: usize,
    target_fp_rate: f64,
}

impl PartitionedFilterBuilder {
    /// Start a builder with defaults of 1000 items at 1% false positives.
    #[must_use]
    pub fn new() -> Self {
        Self {
            expected_items: 1000,
            target_fp_rate: 0.01,
        }
    }

    /// Set the capacity the filter is sized for.
    #[must_use]
    pub fn expected_items(mut self, count: usize) -> Self {
        self.expected_items = count;
        self
    }

    /// Set the target false-positive rate.
    #[must_use]
    pub fn target_fp_rate(mut self, fp_rate: f64) -> Self {
        self.target_fp_rate = fp_rate;
        self
    }

    /// Validate the configuration and construct the filter.
    ///
    /// # Errors
    ///
    /// Returns an error if the item count is zero or the false-positive
    /// rate is outside `(0, 1)`.
    pub fn build(self) -> Result<PartitionedCountingFilter> {
        validation::validate_item_count(self.expected_items)?;
        validation::validate_fp_rate(self.target_fp_rate)?;
        PartitionedCountingFilter::new(self.expected_items, self.target_fp_rate)
    }
}

impl Default for PartitionedFilterBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for [`ScalableFilterChain`].
#[derive(Debug, Clone)]
pub struct ScalableChainBuilder {
    initial_capacity: usize,
    error_rate: f64,
    growth_ratio: f64,
    tightening_ratio: f64,
}

impl ScalableChainBuilder {
    /// Start a builder with defaults of 1000 initial items, 1% compound
    /// error rate, and the standard growth and tightening ratios.
    #[must_use]
    pub fn new() -> Self {
        Self {
            initial_capacity: 1000,
            error_rate: 0.01,
            growth_ratio: DEFAULT_GROWTH_RATIO,
            tightening_ratio: DEFAULT_TIGHTENING_RATIO,
        }
    }

    /// Set the first filter's capacity.
    #[must_use]
    pub fn initial_capacity(mut self, capacity: usize) -> Self {
        self.initial_capacity = capacity;
        self
    }

    /// Set the compound false-positive bound for the whole chain.
    #[must_use]
    pub fn error_rate(mut self, rate: f64) -> Self {
        self.error_rate = rate;
        self
    }

    /// Set the capacity multiplier applied on growth.
    #[must_use]
    pub fn growth_ratio(mut self, ratio: f64) -> Self {
        self.growth_ratio = ratio;
        self
    }

    /// Set the false-positive tightening ratio applied on growth.
    #[must_use]
    pub fn tightening_ratio(mut self, ratio: f64) -> Self {
        self.tightening_ratio = ratio;
        self
    }

    /// Validate the configuration and construct the chain.
    ///
    /// # Errors
    ///
    /// Returns an error if any parameter is out of range; see
    /// [`ScalableFilterChain::with_ratios`].
    pub fn build(self) -> Result<ScalableFilterChain> {
        validation::validate_item_count(self.initial_capacity)?;
        validation::validate_fp_rate(self.error_rate)?;
        validation::validate_growth_ratio(self.growth_ratio)?;
        validation::validate_tightening_ratio(self.tightening_ratio)?;
        ScalableFilterChain::with_ratios(
            self.initial_capacity,
            self.error_rate,
            self.growth_ratio,
            self.tightening_ratio,
        )
    }
}

impl Default for ScalableChainBuilder {
    fn default() -> Self {
        Self::new()
    }
}
