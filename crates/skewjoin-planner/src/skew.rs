//! Hot-key mitigation: salt the skewed side, explode the other.
//!
//! A single hot key hashes every one of its rows into the same partition.
//! Salting appends a random integer in `[0, F)` to the skewed side's key so
//! the hot key spreads across F buckets; the other side is row-multiplied
//! over every value in `[0, F)` so each bucket still finds its match. The
//! salt changes physical placement only, never the logical join result.

use rand::Rng;
use uuid::Uuid;

use skewjoin_backend::collection::RecordCollection;
use skewjoin_core::row::Scalar;
use skewjoin_core::schema::{DataType, Field, Schema};

/// Fresh salt column name for one join step. Drawn per step, never reused,
/// and re-drawn if it collides with an existing field on either side.
pub fn salt_column_name(left: &Schema, right: &Schema) -> String {
    loop {
        let name = format!("__salt_{}", Uuid::new_v4());
        let taken = left
            .fields
            .iter()
            .chain(right.fields.iter())
            .any(|f| f.name == name);
        if !taken {
            return name;
        }
    }
}

fn with_salt_field(schema: &Schema, column: &str) -> Schema {
    let mut fields = schema.fields.clone();
    fields.push(Field::new(column, DataType::Int32, false));
    Schema::new(fields)
}

/// Append a salt column with a uniformly random value in `[0, factor)`,
/// drawn independently per row from the injected source.
pub fn salt<C: RecordCollection>(
    data: C,
    column: &str,
    factor: u32,
    rng: &mut impl Rng,
) -> C {
    let schema = with_salt_field(data.schema(), column);
    data.map(schema, |mut row| {
        row.values.push(Scalar::I32(rng.gen_range(0..factor) as i32));
        row
    })
}

/// Append a salt column ranging deterministically over `0..factor`,
/// multiplying every row `factor` times.
pub fn explode<C: RecordCollection>(data: C, column: &str, factor: u32) -> C {
    let schema = with_salt_field(data.schema(), column);
    data.flat_map(schema, |row| {
        (0..factor)
            .map(|salt| {
                let mut copy = row.clone();
                copy.values.push(Scalar::I32(salt as i32));
                copy
            })
            .collect()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use skewjoin_backend::collection::LocalCollection;
    use skewjoin_core::row::Row;

    fn one_column(rows: Vec<i32>) -> LocalCollection {
        LocalCollection::new(
            Schema::new(vec![Field::new("id", DataType::Int32, false)]),
            rows.into_iter()
                .map(|v| Row::new(vec![Scalar::I32(v)]))
                .collect(),
        )
    }

    #[test]
    fn salt_values_stay_in_range() {
        let mut rng = StdRng::seed_from_u64(7);
        let salted = salt(one_column(vec![1; 200]), "s", 8, &mut rng);
        assert_eq!(salted.num_rows(), 200);
        for row in salted.rows() {
            match row.values[1] {
                Scalar::I32(v) => assert!((0..8).contains(&v)),
                ref other => panic!("expected an i32 salt, got {other:?}"),
            }
        }
    }

    #[test]
    fn explode_multiplies_rows_by_the_factor() {
        let exploded = explode(one_column(vec![1, 2, 3]), "s", 4);
        assert_eq!(exploded.num_rows(), 12);
        // Every salt value in [0, 4) appears for every original row.
        let mut salts: Vec<i32> = exploded
            .rows()
            .iter()
            .filter(|r| r.values[0] == Scalar::I32(1))
            .map(|r| match r.values[1] {
                Scalar::I32(v) => v,
                ref other => panic!("expected an i32 salt, got {other:?}"),
            })
            .collect();
        salts.sort_unstable();
        assert_eq!(salts, vec![0, 1, 2, 3]);
    }

    #[test]
    fn salt_column_names_are_unique_per_step() {
        let schema = Schema::new(vec![Field::new("id", DataType::Int32, false)]);
        let a = salt_column_name(&schema, &schema);
        let b = salt_column_name(&schema, &schema);
        assert_ne!(a, b);
        assert!(a.starts_with("__salt_"));
    }
}
