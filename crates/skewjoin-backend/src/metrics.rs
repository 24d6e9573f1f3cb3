//! Per-stage record counters the planner reports into.
//!
//! The planner counts records-in per source stage as it reads inputs and
//! records-out for the join stage at final projection. Embedders plug in
//! their own sink; `CountingMetrics` is the in-memory one used by tests.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

pub trait MetricsSink: Send + Sync {
    fn records_in(&self, stage: &str, n: u64);
    fn records_out(&self, stage: &str, n: u64);
}

/// Sink that drops everything.
pub struct NoopMetrics;

impl MetricsSink for NoopMetrics {
    fn records_in(&self, _stage: &str, _n: u64) {}
    fn records_out(&self, _stage: &str, _n: u64) {}
}

/// In-memory per-stage counters.
#[derive(Default)]
pub struct CountingMetrics {
    records_in: Mutex<HashMap<String, u64>>,
    records_out: Mutex<HashMap<String, u64>>,
}

/// Counts survive a panicked counting thread; the map itself is always
/// consistent, so poisoning carries no information here.
fn counters(map: &Mutex<HashMap<String, u64>>) -> MutexGuard<'_, HashMap<String, u64>> {
    map.lock().unwrap_or_else(PoisonError::into_inner)
}

impl CountingMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn in_for(&self, stage: &str) -> u64 {
        *counters(&self.records_in).get(stage).unwrap_or(&0)
    }

    pub fn out_for(&self, stage: &str) -> u64 {
        *counters(&self.records_out).get(stage).unwrap_or(&0)
    }

    /// Total records-in across all stages; zero means no input was ever read.
    pub fn total_in(&self) -> u64 {
        counters(&self.records_in).values().sum()
    }
}

impl MetricsSink for CountingMetrics {
    fn records_in(&self, stage: &str, n: u64) {
        *counters(&self.records_in).entry(stage.to_string()).or_insert(0) += n;
    }

    fn records_out(&self, stage: &str, n: u64) {
        *counters(&self.records_out).entry(stage.to_string()).or_insert(0) += n;
    }
}
