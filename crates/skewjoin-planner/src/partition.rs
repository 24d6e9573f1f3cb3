//! Physical partition assignment per join step.

use skewjoin_backend::collection::RecordCollection;
use skewjoin_backend::partition::PartitionKey;
use skewjoin_core::error::{Error, Result};
use skewjoin_core::schema::Schema;

/// Repartition keys for one side: raw columns, or null-coalesced columns
/// when the join is null-safe. Coalescing routes null keys to the
/// partition of the column type's default value so they stay joinable
/// under the null-safe equality predicate.
pub fn partition_keys(
    schema: &Schema,
    key: &[String],
    null_safe: bool,
) -> Result<Vec<PartitionKey>> {
    if !null_safe {
        return Ok(key
            .iter()
            .map(|name| PartitionKey::Column(name.clone()))
            .collect());
    }
    key.iter()
        .map(|name| {
            let field = schema
                .field_named(name)
                .ok_or_else(|| Error::Schema(format!("unknown partition column '{name}'")))?;
            Ok(PartitionKey::Coalesce(
                name.clone(),
                field.data_type.default_value(),
            ))
        })
        .collect()
}

/// Issue the repartition call for one side of a join step.
pub fn repartition_on_key<C: RecordCollection>(
    data: C,
    key: &[String],
    null_safe: bool,
    partitions: usize,
) -> Result<C> {
    let keys = partition_keys(data.schema(), key, null_safe)?;
    data.repartition(&keys, partitions)
}
