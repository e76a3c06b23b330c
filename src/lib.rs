//! # bloomscale
//!
//! Partitioned counting Bloom filters with dynamic capacity scaling.
//!
//! This crate provides approximate set-membership structures built on a
//! partitioned layout: the bit array is split into one equal partition
//! per hash function, and each key sets exactly one bit per partition.
//! Parallel 4-bit counters make deletion possible, and a scalable chain
//! lifts the fixed-capacity limit while keeping the compound
//! false-positive rate under a configured bound.
//!
//! ## Quick Start
//!
//! ```
//! use bloomscale::prelude::*;
//!
//! // Fixed-capacity filter with deletion.
//! let mut filter = PartitionedCountingFilter::new(10_000, 0.01).unwrap();
//! filter.add(b"user:1001");
//! assert!(filter.query(b"user:1001"));
//! filter.delete(b"user:1001").unwrap();
//! assert!(!filter.query(b"user:1001"));
//!
//! // Chain that grows past its initial capacity.
//! let mut chain = ScalableFilterChain::new(100, 0.01).unwrap();
//! for i in 0..1000u32 {
//!     chain.add(&i.to_le_bytes());
//! }
//! assert!(chain.contains(&500u32.to_le_bytes()));
//! assert!(chain.max_fpr() < 0.01);
//! ```
//!
//! ## Choosing a Structure
//!
//! | Structure | Capacity | Deletion | Use when |
//! |-----------|----------|----------|----------|
//! | [`PartitionedCountingFilter`] | fixed | yes | the working set size is known up front |
//! | [`ScalableFilterChain`] | grows | no | the working set is unbounded or unknown |
//!
//! ## Keys
//!
//! All operations take keys as `&[u8]`. Callers serialize their own
//! types; for integers `to_le_bytes()` is the conventional encoding, and
//! `str::as_bytes()` covers strings.
//!
//! ## Guarantees
//!
//! - No false negatives, as long as deletes are only issued for keys that
//!   were actually inserted
//! - False positives at roughly the configured rate while within capacity
//! - Deletion is all-or-nothing: a failed delete changes nothing
//!
//! ## Thread Safety
//!
//! Filters are plain `Send + Sync` values with `&mut self` mutation.
//! Callers that share a filter across threads wrap it in the lock of
//! their choice; the crate imposes none.

#![warn(missing_docs)]
#![warn(rust_2018_idioms)]
#![allow(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod builder;
pub mod core;
pub mod error;
pub mod filters;
pub mod hash;

pub use crate::builder::{PartitionedFilterBuilder, ScalableChainBuilder};
pub use crate::core::filter::{DeletableFilter, MembershipFilter};
pub use crate::core::params::FilterParameters;
pub use crate::error::{BloomScaleError, Result};
pub use crate::filters::{PartitionedCountingFilter, ScalableFilterChain};

/// Convenience re-exports for common usage.
///
/// ```
/// use bloomscale::prelude::*;
///
/// let filter = PartitionedFilterBuilder::new()
///     .expected_items(100)
///     .build()
///     .unwrap();
/// assert!(filter.is_empty());
/// ```
pub mod prelude {
    pub use crate::builder::{PartitionedFilterBuilder, ScalableChainBuilder};
    pub use crate::core::filter::{DeletableFilter, MembershipFilter};
    pub use crate::error::{BloomScaleError, Result};
    pub use crate::filters::{PartitionedCountingFilter, ScalableFilterChain};
}
