//! Join request model: the sole input contract of the planner.
//!
//! A request is built once per logical join, consumed entirely by
//! `JoinPlanner::plan`, and discarded. Nothing in it changes mid-plan.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use skewjoin_backend::collection::RecordCollection;
use skewjoin_core::error::{Error, Result};
use skewjoin_core::schema::Schema;

/// Marks one stage of the join as hot-keyed and sets the salt cardinality
/// used to spread it across partitions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DistributionConfig {
    pub skewed_stage: String,
    pub distribution_factor: u32,
}

impl DistributionConfig {
    pub fn new(skewed_stage: impl Into<String>, distribution_factor: u32) -> Self {
        Self {
            skewed_stage: skewed_stage.into(),
            distribution_factor,
        }
    }
}

/// One requested output field: which stage it comes from, its name there,
/// and an optional output alias.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JoinField {
    pub stage: String,
    pub field: String,
    pub alias: Option<String>,
}

impl JoinField {
    pub fn new(stage: impl Into<String>, field: impl Into<String>) -> Self {
        Self {
            stage: stage.into(),
            field: field.into(),
            alias: None,
        }
    }

    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }

    /// The name this field carries in the output.
    pub fn output_name(&self) -> &str {
        self.alias.as_deref().unwrap_or(&self.field)
    }
}

/// One participant of the join: a named collection, its key, and how it
/// takes part. Both flags are decided at request construction and never
/// re-inspected downstream.
#[derive(Debug, Clone)]
pub struct JoinStage<C> {
    pub stage: String,
    pub data: C,
    pub schema: Schema,
    pub key: Vec<String>,
    pub required: bool,
    pub broadcast: bool,
}

impl<C> JoinStage<C> {
    pub fn new(
        stage: impl Into<String>,
        data: C,
        schema: Schema,
        key: Vec<String>,
        required: bool,
    ) -> Self {
        Self {
            stage: stage.into(),
            data,
            schema,
            key,
            required,
            broadcast: false,
        }
    }

    pub fn broadcast(mut self) -> Self {
        self.broadcast = true;
        self
    }
}

/// A complete N-way join description. `left` is the driving side
/// (its `broadcast` flag is ignored); `to_join` are the remaining
/// participants in join order.
#[derive(Debug, Clone)]
pub struct JoinRequest<C> {
    /// Name of the join operation itself, used for records-out accounting.
    pub stage_name: String,
    pub left: JoinStage<C>,
    pub to_join: Vec<JoinStage<C>>,
    pub distribution: Option<DistributionConfig>,
    pub num_partitions: Option<usize>,
    pub null_safe: bool,
    pub fields: Vec<JoinField>,
    pub output_schema: Schema,
}

/// Qualified column name a stage's fields carry inside the join chain, so
/// projection can tell apart same-named fields from different stages.
pub fn qualified_name(stage: &str, field: &str) -> String {
    format!("{stage}.{field}")
}

impl<C: RecordCollection> JoinRequest<C> {
    /// Eager configuration checks. Runs before any backend call; every
    /// failure names the offending stage or field.
    pub fn validate(&self) -> Result<()> {
        let arity = self.left.key.len();
        if arity == 0 {
            return Err(Error::Config(format!(
                "stage '{}' has an empty join key",
                self.left.stage
            )));
        }
        if self.to_join.is_empty() {
            return Err(Error::Config("join request has no participants".into()));
        }
        if self.fields.is_empty() {
            return Err(Error::Config("join request selects no output fields".into()));
        }

        let mut names = BTreeSet::new();
        names.insert(self.left.stage.as_str());
        validate_key(&self.left.stage, &self.left.schema, &self.left.key)?;
        for stage in &self.to_join {
            if !names.insert(stage.stage.as_str()) {
                return Err(Error::Config(format!(
                    "duplicate stage name '{}' in join request",
                    stage.stage
                )));
            }
            if stage.key.len() != arity {
                return Err(Error::Config(format!(
                    "join key arity mismatch: stage '{}' has {} key fields, stage '{}' has {}",
                    stage.stage,
                    stage.key.len(),
                    self.left.stage,
                    arity
                )));
            }
            validate_key(&stage.stage, &stage.schema, &stage.key)?;
            for (pos, (left_field, right_field)) in
                self.left.key.iter().zip(stage.key.iter()).enumerate()
            {
                let lt = self.left.schema.field_named(left_field).map(|f| f.data_type);
                let rt = stage.schema.field_named(right_field).map(|f| f.data_type);
                if lt != rt {
                    return Err(Error::Config(format!(
                        "join key position {pos} is not comparable: '{}.{left_field}' and \
                         '{}.{right_field}' have different types",
                        self.left.stage, stage.stage
                    )));
                }
            }
        }

        if let Some(partitions) = self.num_partitions {
            if partitions == 0 {
                return Err(Error::Config("number of partitions must be positive".into()));
            }
        }

        if let Some(dist) = &self.distribution {
            if dist.distribution_factor == 0 {
                return Err(Error::Config(format!(
                    "distribution factor must be positive, got {}",
                    dist.distribution_factor
                )));
            }
            if !names.contains(dist.skewed_stage.as_str()) {
                return Err(Error::Config(format!(
                    "skewed stage '{}' is not part of the join",
                    dist.skewed_stage
                )));
            }
        }

        if self.output_schema.len() != self.fields.len() {
            return Err(Error::Config(format!(
                "output schema has {} fields but {} were selected",
                self.output_schema.len(),
                self.fields.len()
            )));
        }
        for field in &self.fields {
            let schema = if field.stage == self.left.stage {
                &self.left.schema
            } else {
                match self.to_join.iter().find(|s| s.stage == field.stage) {
                    Some(stage) => &stage.schema,
                    None => {
                        return Err(Error::Config(format!(
                            "output field '{}' references unknown stage '{}'",
                            field.field, field.stage
                        )))
                    }
                }
            };
            if schema.index_of(&field.field).is_none() {
                return Err(Error::Config(format!(
                    "output field '{}' does not exist in stage '{}'",
                    field.field, field.stage
                )));
            }
        }
        Ok(())
    }
}

fn validate_key(stage: &str, schema: &Schema, key: &[String]) -> Result<()> {
    for field in key {
        if schema.index_of(field).is_none() {
            return Err(Error::Config(format!(
                "join key field '{field}' does not exist in stage '{stage}'"
            )));
        }
    }
    Ok(())
}
