//! Final field selection and aliasing.

use skewjoin_backend::collection::RecordCollection;
use skewjoin_core::error::{Error, Result};
use skewjoin_core::row::Row;
use skewjoin_core::schema::Schema;

use crate::request::{qualified_name, JoinField};

/// Select the requested fields, in request order, out of the accumulated
/// join result. Fields resolve via their `stage.field` qualified name;
/// aliases are carried by the caller-supplied output schema. Salt columns
/// are never requested, so this is also where they get stripped.
pub fn project<C: RecordCollection>(
    accumulated: C,
    fields: &[JoinField],
    output_schema: Schema,
) -> Result<C> {
    let mut indices = Vec::with_capacity(fields.len());
    for field in fields {
        let name = qualified_name(&field.stage, &field.field);
        let idx = accumulated.schema().index_of(&name).ok_or_else(|| {
            Error::Schema(format!(
                "cannot resolve output field '{}' from stage '{}'",
                field.field, field.stage
            ))
        })?;
        indices.push(idx);
    }
    Ok(accumulated.map(output_schema, move |row| {
        Row::new(indices.iter().map(|&i| row.values[i].clone()).collect())
    }))
}
