//! Error types for bloomscale operations.
//!
//! All fallible operations in the crate return [`Result<T>`] with
//! [`BloomScaleError`] as the error type. Errors are structured enums with
//! enough context to diagnose the failure without a debugger.
//!
//! # Error Propagation
//!
//! ```
//! use bloomscale::{Result, BloomScaleError};
//! use bloomscale::core::params::{optimal_bit_count, optimal_hash_count};
//!
//! fn derive_params(n: usize, fp: f64) -> Result<(usize, usize)> {
//!     let m = optimal_bit_count(n, fp)?;
//!     let k = optimal_hash_count(m, n)?;
//!     Ok((m, k))
//! }
//! # assert!(derive_params(1000, 0.01).is_ok());
//! ```

#![allow(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

use std::fmt;

/// Result type alias for bloomscale operations.
///
/// # Examples
/// ```
/// use bloomscale::{Result, BloomScaleError};
///
/// fn check_capacity(n: usize) -> Result<()> {
///     if n == 0 {
///         return Err(BloomScaleError::invalid_item_count(n));
///     }
///     Ok(())
/// }
/// # assert!(check_capacity(10).is_ok());
/// ```
pub type Result<T> = std::result::Result<T, BloomScaleError>;

/// Errors that can occur while constructing or operating on a filter.
///
/// # Design Notes
/// - `Clone` + `PartialEq` enable testing and error comparison
/// - Every variant carries the offending value(s) for diagnostics
#[derive(Debug, Clone, PartialEq)]
pub enum BloomScaleError {
    /// Filter parameters don't satisfy the construction constraints.
    InvalidParameters {
        /// Human-readable description of what's invalid.
        message: String,
    },

    /// False positive rate outside the open interval (0, 1).
    ///
    /// A rate of 0 would require infinite memory; a rate of 1 accepts
    /// everything; values outside [0, 1] are not probabilities.
    FalsePositiveRateOutOfBounds {
        /// The invalid rate that was provided.
        fp_rate: f64,
    },

    /// Expected item count of zero.
    ///
    /// The sizing formulas divide by `n`, so `n == 0` is rejected at
    /// construction rather than producing a degenerate filter.
    InvalidItemCount {
        /// The invalid count that was provided.
        count: usize,
    },

    /// Bit array size of zero or beyond memory limits.
    InvalidFilterSize {
        /// The invalid size in bits.
        size: usize,
    },

    /// Hash function count outside practical bounds.
    InvalidHashCount {
        /// The invalid hash count provided.
        count: usize,
        /// Minimum allowed value.
        min: usize,
        /// Maximum allowed value.
        max: usize,
    },

    /// Delete was requested for a key the filter does not contain.
    ///
    /// Raised before any mutation: a failed delete leaves every bit and
    /// counter untouched. Recoverable; the caller decides whether to treat
    /// this as a no-op or surface it.
    NotPresent,
}

impl fmt::Display for BloomScaleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidParameters { message } => {
                write!(f, "Invalid filter parameters: {}.", message)
            }
            Self::FalsePositiveRateOutOfBounds { fp_rate } => {
                write!(
                    f,
                    "False positive rate {} is out of bounds. Must be in range (0, 1).",
                    fp_rate
                )
            }
            Self::InvalidItemCount { count } => {
                write!(
                    f,
                    "Invalid item count: {}. Expected items must be greater than 0.",
                    count
                )
            }
            Self::InvalidFilterSize { size } => {
                write!(
                    f,
                    "Invalid filter size: {} bits. Must be positive and within memory limits.",
                    size
                )
            }
            Self::InvalidHashCount { count, min, max } => {
                write!(
                    f,
                    "Invalid hash function count: {}. Must be in range [{}, {}].",
                    count, min, max
                )
            }
            Self::NotPresent => {
                write!(f, "Key is not present in the filter; nothing was deleted.")
            }
        }
    }
}

impl std::error::Error for BloomScaleError {}

impl BloomScaleError {
    /// Create an `InvalidParameters` error with a formatted message.
    ///
    /// # Examples
    /// ```
    /// use bloomscale::BloomScaleError;
    ///
    /// let err = BloomScaleError::invalid_parameters(
    ///     format!("partition size {} must be at least 1", 0)
    /// );
    /// ```
    #[must_use]
    pub fn invalid_parameters(message: impl Into<String>) -> Self {
        Self::InvalidParameters {
            message: message.into(),
        }
    }

    /// Create a `FalsePositiveRateOutOfBounds` error.
    #[must_use]
    pub fn fp_rate_out_of_bounds(fp_rate: f64) -> Self {
        Self::FalsePositiveRateOutOfBounds { fp_rate }
    }

    /// Create an `InvalidItemCount` error.
    #[must_use]
    pub fn invalid_item_count(count: usize) -> Self {
        Self::InvalidItemCount { count }
    }

    /// Create an `InvalidFilterSize` error.
    #[must_use]
    pub fn invalid_filter_size(size: usize) -> Self {
        Self::InvalidFilterSize { size }
    }

    /// Create an `InvalidHashCount` error.
    #[must_use]
    pub fn invalid_hash_count(count: usize, min: usize, max: usize) -> Self {
        Self::InvalidHashCount { count, min, max }
    }

    /// Create a `NotPresent` error.
    #[must_use]
    pub fn not_present() -> Self {
        Self::NotPresent
    }
}
