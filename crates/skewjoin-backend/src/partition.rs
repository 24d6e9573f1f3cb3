//! Partition key expressions for repartition calls.

use skewjoin_core::row::Scalar;

/// One column of a repartition key.
#[derive(Debug, Clone, PartialEq)]
pub enum PartitionKey {
    /// Partition on the raw column value.
    Column(String),

    /// Partition on the column value with a non-null default substituted
    /// for nulls. Used under null-safe joins so null keys land in one
    /// partition and stay joinable.
    Coalesce(String, Scalar),
}

impl PartitionKey {
    pub fn column(&self) -> &str {
        match self {
            PartitionKey::Column(name) => name,
            PartitionKey::Coalesce(name, _) => name,
        }
    }
}
