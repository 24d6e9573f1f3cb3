//! Salting affects physical placement only: for any distribution factor the
//! joined rows must be the same multiset as the unsalted join's.

use skewjoin_backend::collection::{LocalCollection, RecordCollection};
use skewjoin_core::row::{Row, Scalar};
use skewjoin_core::schema::{DataType, Field, Schema};
use skewjoin_planner::{DistributionConfig, JoinField, JoinPlanner, JoinRequest, JoinStage};

/// Left side with a hot key: most rows share id=1.
fn hot_side() -> LocalCollection {
    let mut rows: Vec<Row> = (0..20)
        .map(|i| Row::new(vec![Scalar::I32(1), Scalar::I32(i)]))
        .collect();
    rows.push(Row::new(vec![Scalar::I32(2), Scalar::I32(100)]));
    rows.push(Row::new(vec![Scalar::I32(3), Scalar::I32(200)]));
    LocalCollection::new(
        Schema::new(vec![
            Field::new("id", DataType::Int32, false),
            Field::new("v", DataType::Int32, false),
        ]),
        rows,
    )
}

fn other_side() -> LocalCollection {
    LocalCollection::new(
        Schema::new(vec![
            Field::new("id", DataType::Int32, false),
            Field::new("w", DataType::Int32, false),
        ]),
        vec![
            Row::new(vec![Scalar::I32(1), Scalar::I32(-1)]),
            Row::new(vec![Scalar::I32(1), Scalar::I32(-2)]),
            Row::new(vec![Scalar::I32(2), Scalar::I32(-3)]),
        ],
    )
}

fn request(distribution: Option<DistributionConfig>) -> JoinRequest<LocalCollection> {
    let left_schema = hot_side().schema().clone();
    let right_schema = other_side().schema().clone();
    JoinRequest {
        stage_name: "joiner".into(),
        left: JoinStage::new("hot", hot_side(), left_schema, vec!["id".into()], true),
        to_join: vec![JoinStage::new(
            "dim",
            other_side(),
            right_schema,
            vec!["id".into()],
            true,
        )],
        distribution,
        num_partitions: Some(8),
        null_safe: false,
        fields: vec![
            JoinField::new("hot", "id"),
            JoinField::new("hot", "v"),
            JoinField::new("dim", "w"),
        ],
        output_schema: Schema::new(vec![
            Field::new("id", DataType::Int32, false),
            Field::new("v", DataType::Int32, false),
            Field::new("w", DataType::Int32, false),
        ]),
    }
}

fn sorted_rows(collection: &LocalCollection) -> Vec<Vec<Scalar>> {
    let mut rows: Vec<Vec<Scalar>> = collection.rows().into_iter().map(|r| r.values).collect();
    rows.sort_by_key(|values| format!("{values:?}"));
    rows
}

#[test]
fn salted_join_result_is_identical_to_unsalted() {
    let baseline = JoinPlanner::new().plan(request(None)).unwrap();
    for factor in [1u32, 2, 8] {
        let salted = JoinPlanner::new()
            .with_rng_seed(42)
            .plan(request(Some(DistributionConfig::new("hot", factor))))
            .unwrap();
        assert_eq!(
            sorted_rows(&salted),
            sorted_rows(&baseline),
            "distribution factor {factor} changed the join result"
        );
    }
}

#[test]
fn skew_on_the_participant_side_is_also_result_preserving() {
    let baseline = JoinPlanner::new().plan(request(None)).unwrap();
    for factor in [1u32, 2, 8] {
        let salted = JoinPlanner::new()
            .with_rng_seed(7)
            .plan(request(Some(DistributionConfig::new("dim", factor))))
            .unwrap();
        assert_eq!(sorted_rows(&salted), sorted_rows(&baseline));
    }
}

#[test]
fn salt_column_never_reaches_the_output() {
    let output = JoinPlanner::new()
        .with_rng_seed(1)
        .plan(request(Some(DistributionConfig::new("hot", 8))))
        .unwrap();
    assert_eq!(output.schema().len(), 3);
    assert!(output
        .schema()
        .fields
        .iter()
        .all(|f| !f.name.starts_with("__salt_")));
    for row in output.rows() {
        assert_eq!(row.values.len(), 3);
    }
}

#[test]
fn salting_spreads_the_hot_key_across_partitions() {
    // Without salting, every id=1 row of the salted side hashes to one
    // bucket; with factor 8 the hot key occupies several.
    let unsalted = JoinPlanner::new().plan(request(None)).unwrap();
    let salted = JoinPlanner::new()
        .with_rng_seed(3)
        .plan(request(Some(DistributionConfig::new("hot", 8))))
        .unwrap();
    assert_eq!(unsalted.num_rows(), salted.num_rows());
    let occupied = |c: &LocalCollection| c.partition_sizes().iter().filter(|&&n| n > 0).count();
    assert!(occupied(&salted) > occupied(&unsalted));
}
