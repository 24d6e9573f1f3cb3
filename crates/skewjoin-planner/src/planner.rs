//! The join planner/executor.
//!
//! Walks the participants in request order. Per step it derives the join
//! kind, salts/explodes the sides when the distribution config targets the
//! step, builds the (possibly salted) conjunction predicate, assigns
//! partitions, and executes the pairwise join, threading the active join
//! key forward between steps.

use std::sync::Arc;

use rand::rngs::StdRng;
use rand::SeedableRng;

use skewjoin_backend::collection::RecordCollection;
use skewjoin_backend::join::JoinPredicate;
use skewjoin_backend::metrics::{MetricsSink, NoopMetrics};
use skewjoin_core::error::Result;
use skewjoin_core::schema::{Field, Schema};

use crate::derive::JoinTypeDeriver;
use crate::keys::JoinKeyTracker;
use crate::partition::repartition_on_key;
use crate::project::project;
use crate::request::{qualified_name, JoinRequest, JoinStage};
use crate::skew;

pub struct JoinPlanner {
    metrics: Arc<dyn MetricsSink>,
    rng: StdRng,
}

impl Default for JoinPlanner {
    fn default() -> Self {
        Self::new()
    }
}

impl JoinPlanner {
    pub fn new() -> Self {
        Self::with_metrics(Arc::new(NoopMetrics))
    }

    pub fn with_metrics(metrics: Arc<dyn MetricsSink>) -> Self {
        Self {
            metrics,
            rng: StdRng::from_entropy(),
        }
    }

    /// Fix the salt source, for reproducible runs.
    pub fn with_rng_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    /// Plan and execute one join request against its backend collections.
    ///
    /// All configuration errors surface here before any backend call is
    /// issued; backend errors pass through opaque and unretried.
    pub fn plan<C: RecordCollection>(&mut self, request: JoinRequest<C>) -> Result<C> {
        request.validate()?;

        let JoinRequest {
            stage_name,
            left,
            to_join,
            distribution,
            num_partitions,
            null_safe,
            fields,
            output_schema,
        } = request;

        let left_stage = left.stage.clone();
        let mut joined = self.materialize(left.data, &left.stage, &left.schema);
        let mut tracker = JoinKeyTracker::new(qualify_all(&left.stage, &left.key));
        let mut deriver = JoinTypeDeriver::new(left.required);

        for (step, participant) in to_join.into_iter().enumerate() {
            let JoinStage {
                stage,
                data,
                schema,
                key,
                required,
                broadcast,
            } = participant;

            let kind = deriver.next(required);
            let mut right = self.materialize(data, &stage, &schema);
            let participant_key = qualify_all(&stage, &key);

            let mut left_key = tracker.active().to_vec();
            let mut right_key = participant_key.clone();

            // Mitigate skew on the step that involves the hot stage: salt
            // the skewed side, explode the other, and join on the salt too.
            if let Some(dist) = distribution
                .as_ref()
                .filter(|d| d.skewed_stage == left_stage || d.skewed_stage == stage)
            {
                let salt_column = skew::salt_column_name(joined.schema(), right.schema());
                if dist.skewed_stage == stage {
                    right = skew::salt(right, &salt_column, dist.distribution_factor, &mut self.rng);
                    joined = skew::explode(joined, &salt_column, dist.distribution_factor);
                } else {
                    joined = skew::salt(joined, &salt_column, dist.distribution_factor, &mut self.rng);
                    right = skew::explode(right, &salt_column, dist.distribution_factor);
                }
                left_key.push(salt_column.clone());
                right_key.push(salt_column);
            }

            let predicate = JoinPredicate::new(
                left_key.iter().cloned().zip(right_key.iter().cloned()).collect(),
                null_safe,
            );

            if broadcast {
                right = right.broadcast();
            } else if let Some(partitions) = num_partitions {
                // Co-partition both sides on the join key up front so the
                // join step runs at the requested parallelism instead of
                // the backend default. Later steps skip the accumulated
                // side: the previous join already left it partitioned on
                // its key.
                right = repartition_on_key(right, &right_key, null_safe, partitions)?;
                if step == 0 {
                    joined = repartition_on_key(joined, &left_key, null_safe, partitions)?;
                }
            }

            tracing::debug!(
                stage = %stage,
                kind = kind.as_str(),
                broadcast,
                "join step"
            );
            joined = joined.join(right, &predicate, kind)?;
            tracker.advance(required, &participant_key);
        }

        let output = project(joined, &fields, output_schema)?;
        // Counting rides along with the rows so the output stays as lazy
        // as the backend makes it.
        let out_schema = output.schema().clone();
        let metrics = Arc::clone(&self.metrics);
        Ok(output.map(out_schema, move |row| {
            metrics.records_out(&stage_name, 1);
            row
        }))
    }

    /// Bring one stage into the join: qualify its columns as
    /// `stage.field` and count records-in per row as the backend reads
    /// them.
    fn materialize<C: RecordCollection>(&self, data: C, stage: &str, schema: &Schema) -> C {
        let qualified = Schema::new(
            schema
                .fields
                .iter()
                .map(|f| Field::new(qualified_name(stage, &f.name), f.data_type, f.nullable))
                .collect(),
        );
        tracing::trace!(stage, "read join input");
        let metrics = Arc::clone(&self.metrics);
        let stage = stage.to_string();
        data.map(qualified, move |row| {
            metrics.records_in(&stage, 1);
            row
        })
    }
}

fn qualify_all(stage: &str, key: &[String]) -> Vec<String> {
    key.iter().map(|k| qualified_name(stage, k)).collect()
}
