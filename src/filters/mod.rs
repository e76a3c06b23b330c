//! Filter implementations.
//!
//! Two variants are provided:
//!
//! - [`PartitionedCountingFilter`]: fixed capacity, supports deletion
//! - [`ScalableFilterChain`]: grows past its initial capacity, no deletion
//!
//! Both take keys as byte slices and share the sizing math in
//! [`crate::core::params`].

#![allow(clippy::pedantic)]

pub mod partitioned;
pub mod scalable;

pub use partitioned::{PartitionedCountingFilter, COUNTER_MAX};
pub use scalable::{
    ScalableFilterChain, DEFAULT_GROWTH_RATIO, DEFAULT_TIGHTENING_RATIO, MIN_FPR,
};
