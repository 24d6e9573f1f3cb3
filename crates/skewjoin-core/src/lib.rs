#![forbid(unsafe_code)]
//! skewjoin-core: shared kernel for the skewjoin engine.
//!
//! This crate contains only *pure* types and small helpers. There is
//! **no I/O**, **no randomness**, and **no execution** here, by design.
//!
//! Crates that use this:
//! - skewjoin-backend: partitioned record-collection abstraction and the
//!   local reference backend.
//! - skewjoin-planner: the multi-way join planner and its skew-mitigation
//!   helpers.

pub mod error;
pub mod hash;
pub mod row;
pub mod schema;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
