//! skewjoin-planner: plans and drives a multi-way join over partitioned
//! record collections.
//!
//! A `JoinRequest` names N participants, each independently required or
//! optional. The planner walks them in order, deriving the join kind per
//! step, rewriting the active join key as required stages are consumed,
//! salting/exploding the sides of a skewed step, and assigning physical
//! partitions, then projects the requested output fields.
//!
//! The planner itself performs no row-level computation beyond what the
//! backend's collection primitives do; it is stateless across requests.

pub mod derive;
pub mod keys;
pub mod partition;
pub mod planner;
pub mod project;
pub mod request;
pub mod skew;

pub use planner::JoinPlanner;
pub use request::{DistributionConfig, JoinField, JoinRequest, JoinStage};
