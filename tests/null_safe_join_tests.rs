//! Null-safe joins: null keys match each other only when asked to.

use skewjoin_backend::collection::{LocalCollection, RecordCollection};
use skewjoin_core::row::{Row, Scalar};
use skewjoin_core::schema::{DataType, Field, Schema};
use skewjoin_planner::{JoinField, JoinPlanner, JoinRequest, JoinStage};

fn left_side() -> LocalCollection {
    LocalCollection::new(
        Schema::new(vec![
            Field::new("id", DataType::Int32, true),
            Field::new("tag", DataType::Utf8, false),
        ]),
        vec![
            Row::new(vec![Scalar::Null, Scalar::Str("l-null".into())]),
            Row::new(vec![Scalar::I32(1), Scalar::Str("l-one".into())]),
        ],
    )
}

fn right_side() -> LocalCollection {
    LocalCollection::new(
        Schema::new(vec![
            Field::new("id", DataType::Int32, true),
            Field::new("tag", DataType::Utf8, false),
        ]),
        vec![
            Row::new(vec![Scalar::Null, Scalar::Str("r-null".into())]),
            Row::new(vec![Scalar::I32(2), Scalar::Str("r-two".into())]),
        ],
    )
}

fn request(null_safe: bool, num_partitions: Option<usize>) -> JoinRequest<LocalCollection> {
    let left_schema = left_side().schema().clone();
    let right_schema = right_side().schema().clone();
    JoinRequest {
        stage_name: "joiner".into(),
        left: JoinStage::new("l", left_side(), left_schema, vec!["id".into()], true),
        to_join: vec![JoinStage::new(
            "r",
            right_side(),
            right_schema,
            vec!["id".into()],
            true,
        )],
        distribution: None,
        num_partitions,
        null_safe,
        fields: vec![JoinField::new("l", "tag"), JoinField::new("r", "tag")],
        output_schema: Schema::new(vec![
            Field::new("l_tag", DataType::Utf8, false),
            Field::new("r_tag", DataType::Utf8, false),
        ]),
    }
}

#[test]
fn null_keys_match_when_null_safe() {
    let output = JoinPlanner::new().plan(request(true, None)).unwrap();
    let rows = output.rows();
    assert_eq!(rows.len(), 1);
    assert_eq!(
        rows[0].values,
        vec![Scalar::Str("l-null".into()), Scalar::Str("r-null".into())]
    );
}

#[test]
fn null_keys_never_match_without_null_safety() {
    let output = JoinPlanner::new().plan(request(false, None)).unwrap();
    assert_eq!(output.num_rows(), 0);
}

#[test]
fn null_safe_matching_survives_explicit_repartitioning() {
    // Null keys repartition on the coalesced default, so both null rows
    // co-locate and still find each other.
    let output = JoinPlanner::new().plan(request(true, Some(8))).unwrap();
    assert_eq!(output.num_rows(), 1);
}
