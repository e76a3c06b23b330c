//! Core types, traits, and sizing math.
//!
//! # Module Organization
//!
//! ```text
//! core/
//! ├── filter.rs    - MembershipFilter / DeletableFilter traits
//! ├── bitvec.rs    - Word-packed bit vector
//! ├── params.rs    - Closed-form parameter calculation
//! └── mod.rs       - This file (public API)
//! ```
//!
//! # Design Principles
//!
//! 1. **Separation of Concerns**: traits, bit storage, and sizing math are
//!    independent modules
//! 2. **Parameters Fixed at Construction**: all sizing and rounding decisions
//!    happen once, in [`params::FilterParameters::derive`]; operations only do
//!    integer arithmetic against the frozen values
//! 3. **Explicit Construction**: no ambient singletons; callers own their
//!    filter instances and pass them across every interface boundary

pub mod bitvec;
pub mod filter;
pub mod params;

pub use bitvec::BitVec;
pub use filter::{DeletableFilter, MembershipFilter};
pub use params::FilterParameters;
