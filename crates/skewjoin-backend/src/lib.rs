//! skewjoin-backend: the seam between the join planner and whatever engine
//! actually shuffles and joins rows.
//!
//! `RecordCollection` is the abstraction the planner drives; `LocalCollection`
//! is the in-process reference backend used by the tests. A distributed
//! backend implements the same trait against its own shuffle layer.

pub mod collection;
pub mod join;
pub mod metrics;
pub mod partition;
