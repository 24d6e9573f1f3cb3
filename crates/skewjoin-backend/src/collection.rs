//! Partitioned record collections.
//!
//! `RecordCollection` is what the planner configures: a lazy-by-contract,
//! partitioned sequence of rows with a pairwise join primitive. The planner
//! never inspects row values beyond the key columns it introduces.
//!
//! `LocalCollection` is the in-process reference backend: vectors of rows
//! per partition, hash routing on repartition, and a build/probe pairwise
//! join over the whole collection.

use std::collections::HashMap;

use skewjoin_core::error::{Error, Result};
use skewjoin_core::hash::hash_scalars;
use skewjoin_core::row::{Row, Scalar};
use skewjoin_core::schema::Schema;

use crate::join::{JoinPredicate, JoinType};
use crate::partition::PartitionKey;

pub trait RecordCollection: Sized + Clone {
    fn schema(&self) -> &Schema;

    fn num_partitions(&self) -> usize;

    fn num_rows(&self) -> usize;

    /// Per-row transform; `schema` describes the transformed rows (the
    /// transform may add or rename columns).
    fn map(self, schema: Schema, f: impl FnMut(Row) -> Row) -> Self;

    /// Per-row multiplication; used to explode one side of a skewed join.
    fn flat_map(self, schema: Schema, f: impl FnMut(Row) -> Vec<Row>) -> Self;

    /// Shuffle rows into `partitions` buckets keyed on `keys`.
    fn repartition(self, keys: &[PartitionKey], partitions: usize) -> Result<Self>;

    /// Hint that this (small) side should be replicated to every worker
    /// instead of shuffled. Purely advisory.
    fn broadcast(self) -> Self;

    fn is_broadcast(&self) -> bool;

    /// Pairwise join. The output schema is the left fields followed by the
    /// right fields, and the output is partitioned on the predicate's left
    /// key columns.
    fn join(self, right: Self, predicate: &JoinPredicate, kind: JoinType) -> Result<Self>;

    /// Materialize every row, in partition order.
    fn rows(&self) -> Vec<Row>;
}

/// In-process reference backend.
#[derive(Debug, Clone)]
pub struct LocalCollection {
    schema: Schema,
    partitions: Vec<Vec<Row>>,
    broadcast: bool,
}

impl LocalCollection {
    /// A single-partition collection, the state of freshly read input.
    pub fn new(schema: Schema, rows: Vec<Row>) -> Self {
        Self {
            schema,
            partitions: vec![rows],
            broadcast: false,
        }
    }

    pub fn with_partitions(schema: Schema, partitions: Vec<Vec<Row>>) -> Self {
        Self {
            schema,
            partitions,
            broadcast: false,
        }
    }

    pub fn partition_sizes(&self) -> Vec<usize> {
        self.partitions.iter().map(|p| p.len()).collect()
    }

    fn column_index(&self, name: &str) -> Result<usize> {
        self.schema
            .index_of(name)
            .ok_or_else(|| Error::Backend(format!("unknown column '{name}'")))
    }
}

impl RecordCollection for LocalCollection {
    fn schema(&self) -> &Schema {
        &self.schema
    }

    fn num_partitions(&self) -> usize {
        self.partitions.len()
    }

    fn num_rows(&self) -> usize {
        self.partitions.iter().map(|p| p.len()).sum()
    }

    fn map(mut self, schema: Schema, mut f: impl FnMut(Row) -> Row) -> Self {
        for part in &mut self.partitions {
            *part = part.drain(..).map(&mut f).collect();
        }
        self.schema = schema;
        self
    }

    fn flat_map(mut self, schema: Schema, mut f: impl FnMut(Row) -> Vec<Row>) -> Self {
        for part in &mut self.partitions {
            *part = part.drain(..).flat_map(&mut f).collect();
        }
        self.schema = schema;
        self
    }

    fn repartition(self, keys: &[PartitionKey], partitions: usize) -> Result<Self> {
        if partitions == 0 {
            return Err(Error::Backend("partition count must be positive".into()));
        }
        let resolved: Vec<(usize, Option<&Scalar>)> = keys
            .iter()
            .map(|key| match key {
                PartitionKey::Column(name) => Ok((self.column_index(name)?, None)),
                PartitionKey::Coalesce(name, default) => {
                    Ok((self.column_index(name)?, Some(default)))
                }
            })
            .collect::<Result<_>>()?;

        let Self {
            schema,
            partitions: old,
            broadcast,
        } = self;
        let mut parts: Vec<Vec<Row>> = vec![Vec::new(); partitions];
        for row in old.into_iter().flatten() {
            let key: Vec<Scalar> = resolved
                .iter()
                .map(|&(idx, default)| match (&row.values[idx], default) {
                    (Scalar::Null, Some(d)) => d.clone(),
                    (v, _) => v.clone(),
                })
                .collect();
            let bucket = (hash_scalars(&key) % partitions as u64) as usize;
            parts[bucket].push(row);
        }
        Ok(Self {
            schema,
            partitions: parts,
            broadcast,
        })
    }

    fn broadcast(mut self) -> Self {
        self.broadcast = true;
        self
    }

    fn is_broadcast(&self) -> bool {
        self.broadcast
    }

    fn join(self, right: Self, predicate: &JoinPredicate, kind: JoinType) -> Result<Self> {
        if predicate.on.is_empty() {
            return Err(Error::Backend("join predicate is empty".into()));
        }
        let left_idx: Vec<usize> = predicate
            .on
            .iter()
            .map(|(l, _)| self.column_index(l))
            .collect::<Result<_>>()?;
        let right_idx: Vec<usize> = predicate
            .on
            .iter()
            .map(|(_, r)| right.column_index(r))
            .collect::<Result<_>>()?;

        // A zero-partition left side still produces output for right- and
        // full-outer joins; give it one bucket to land in.
        let out_partitions = self.num_partitions().max(1);
        let left_width = self.schema.len();
        let right_width = right.schema.len();
        let schema = joined_schema(&self.schema, &right.schema);

        let left_rows = self.rows();
        let right_rows = right.rows();

        // Build phase: hash table over the right side's key values.
        let mut table: HashMap<u64, Vec<usize>> = HashMap::new();
        for (idx, row) in right_rows.iter().enumerate() {
            let key: Vec<Scalar> = right_idx.iter().map(|&i| row.values[i].clone()).collect();
            table.entry(hash_scalars(&key)).or_default().push(idx);
        }

        let matches = |l: &Row, r: &Row| {
            left_idx.iter().zip(&right_idx).all(|(&li, &ri)| {
                if predicate.null_safe {
                    l.values[li].eq_null_safe(&r.values[ri])
                } else {
                    l.values[li].eq_value(&r.values[ri])
                }
            })
        };

        // Probe phase: scan the left side; candidates come from the hash
        // bucket, the predicate settles collisions and null semantics.
        let mut pairs: Vec<(Option<usize>, Option<usize>)> = Vec::new();
        let mut right_matched = vec![false; right_rows.len()];
        for (li, lrow) in left_rows.iter().enumerate() {
            let key: Vec<Scalar> = left_idx.iter().map(|&i| lrow.values[i].clone()).collect();
            let mut hit = false;
            if let Some(candidates) = table.get(&hash_scalars(&key)) {
                for &ri in candidates {
                    if matches(lrow, &right_rows[ri]) {
                        pairs.push((Some(li), Some(ri)));
                        right_matched[ri] = true;
                        hit = true;
                    }
                }
            }
            if !hit && kind.keeps_left() {
                pairs.push((Some(li), None));
            }
        }
        if kind.keeps_right() {
            for (ri, &matched) in right_matched.iter().enumerate() {
                if !matched {
                    pairs.push((None, Some(ri)));
                }
            }
        }

        // Assemble joined rows, padding the absent side with nulls, and
        // hash-partition the output on the left key columns.
        let mut parts: Vec<Vec<Row>> = vec![Vec::new(); out_partitions];
        for (li, ri) in pairs {
            let mut values = Vec::with_capacity(left_width + right_width);
            match li {
                Some(li) => values.extend(left_rows[li].values.iter().cloned()),
                None => values.extend(std::iter::repeat(Scalar::Null).take(left_width)),
            }
            match ri {
                Some(ri) => values.extend(right_rows[ri].values.iter().cloned()),
                None => values.extend(std::iter::repeat(Scalar::Null).take(right_width)),
            }
            let row = Row::new(values);
            let key: Vec<Scalar> = left_idx.iter().map(|&i| row.values[i].clone()).collect();
            let bucket = (hash_scalars(&key) % out_partitions as u64) as usize;
            parts[bucket].push(row);
        }
        Ok(Self {
            schema,
            partitions: parts,
            broadcast: false,
        })
    }

    fn rows(&self) -> Vec<Row> {
        self.partitions.iter().flatten().cloned().collect()
    }
}

/// Join output schema: left fields then right fields, with a `_right`
/// suffix on any right field whose name collides.
fn joined_schema(left: &Schema, right: &Schema) -> Schema {
    let mut fields = left.fields.clone();
    for field in &right.fields {
        let mut field = field.clone();
        if fields.iter().any(|f| f.name == field.name) {
            field.name = format!("{}_right", field.name);
        }
        fields.push(field);
    }
    Schema::new(fields)
}
