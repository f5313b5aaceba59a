//! Tests for default propagation and layered default sources.

use rstest::{fixture, rstest};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use super::*;
use crate::ArgShape;
use crate::describe::{Describe, LiteralSet, ScalarKind};
use crate::shape::decompose;

#[derive(ArgShape, Serialize, Deserialize)]
enum Pet {
    Cat { lives: u8 },
    Rock,
}

#[fixture]
fn pet() -> UnionShape {
    match decompose(&Pet::describe(), "pet") {
        Ok(decomposed) => match decomposed.shape {
            TypeShape::UnionOfRecords(union) => union,
            other => panic!("expected a union, got {other:?}"),
        },
        Err(err) => panic!("decompose failed: {err}"),
    }
}

fn ambiguous_reason(err: SchemaError) -> (String, String) {
    match err {
        SchemaError::AmbiguousDefault { path, reason } => (path, reason),
        other => panic!("expected AmbiguousDefault, got {other}"),
    }
}

#[test]
fn field_slice_follows_the_key() {
    let record = json!({ "epochs": 3 });
    let slice = field_slice(Some(&record), "epochs", "epochs", false);
    assert_eq!(slice.ok().flatten(), Some(&json!(3)));
    assert_eq!(field_slice(None, "epochs", "epochs", false).ok().flatten(), None);
}

#[test]
fn missing_keys_fall_back_when_the_field_allows() {
    let record = json!({ "epochs": 3 });
    let slice = field_slice(Some(&record), "label", "label", true);
    assert_eq!(slice, Ok(None));
    let optional = TypeShape::Optional(Box::new(TypeShape::Scalar(ScalarKind::Str)));
    assert!(has_fallback(&optional, &FieldDefault::Absent));
    let required = TypeShape::Scalar(ScalarKind::Str);
    assert!(!has_fallback(&required, &FieldDefault::Absent));
    assert!(has_fallback(&required, &FieldDefault::Value(json!("x"))));
}

#[rstest]
#[case::missing_key(json!({}), "opt.lr", "no value for field 'lr'")]
#[case::not_a_record(json!(4), "opt", "expected a record, found a number")]
fn field_slice_rejects_mismatches(
    #[case] record: Value,
    #[case] expected_path: &str,
    #[case] expected_reason: &str,
) {
    let err = field_slice(Some(&record), "lr", "opt.lr", false).expect_err("mismatch must fail");
    assert_eq!(
        ambiguous_reason(err),
        (expected_path.to_owned(), expected_reason.to_owned())
    );
}

#[test]
fn instance_beats_declared_default() {
    let shape = TypeShape::Scalar(ScalarKind::Int { bits: 32, signed: false });
    let declared = FieldDefault::Value(json!(1));
    let instance = json!(5);
    let chosen = leaf_default(&shape, Some(&instance), &declared, "epochs");
    assert_eq!(chosen.ok().flatten(), Some(json!(5)));
    let fallback = leaf_default(&shape, None, &declared, "epochs");
    assert_eq!(fallback.ok().flatten(), Some(json!(1)));
}

#[test]
fn optional_leaves_default_to_null() {
    let shape = TypeShape::Optional(Box::new(TypeShape::Scalar(ScalarKind::Str)));
    let absent = FieldDefault::Absent;
    let chosen = leaf_default(&shape, None, &absent, "label");
    assert_eq!(chosen.ok().flatten(), Some(Value::Null));
}

#[test]
fn required_leaves_have_no_default() {
    let shape = TypeShape::Scalar(ScalarKind::Bool);
    let absent = FieldDefault::Absent;
    assert_eq!(leaf_default(&shape, None, &absent, "flag").ok().flatten(), None);
}

#[test]
fn unserializable_declared_defaults_are_reported() {
    let shape = TypeShape::Scalar(ScalarKind::Str);
    let declared = FieldDefault::Unserializable("boom".to_owned());
    let err = leaf_default(&shape, None, &declared, "name").expect_err("must fail");
    assert_eq!(
        ambiguous_reason(err).1,
        "declared default cannot be serialized: boom"
    );
}

#[rstest]
#[case::char_too_long(TypeShape::Scalar(ScalarKind::Char), json!("ab"))]
#[case::negative_unsigned(TypeShape::Scalar(ScalarKind::Int { bits: 8, signed: false }), json!(-1))]
#[case::literal(TypeShape::Literal(LiteralSet::strings(&["fast", "slow"])), json!("medium"))]
#[case::tuple_length(
    TypeShape::FixedTuple(vec![TypeShape::Scalar(ScalarKind::Bool)]),
    json!([true, false]),
)]
#[case::sequence_item(
    TypeShape::Sequence(Box::new(TypeShape::Scalar(ScalarKind::Str))),
    json!(["a", 1]),
)]
fn check_leaf_rejects_misfits(#[case] shape: TypeShape, #[case] value: Value) {
    assert!(check_leaf(&shape, &value, "field").is_err());
}

#[rstest]
#[case::float_accepts_int(TypeShape::Scalar(ScalarKind::Float { bits: 64 }), json!(3))]
#[case::optional_null(TypeShape::Optional(Box::new(TypeShape::Scalar(ScalarKind::Path))), Value::Null)]
#[case::mapping(
    TypeShape::Mapping(
        Box::new(TypeShape::Scalar(ScalarKind::Str)),
        Box::new(TypeShape::Scalar(ScalarKind::Int { bits: 64, signed: true })),
    ),
    json!({ "a": -1, "b": 2 }),
)]
fn check_leaf_accepts_fits(#[case] shape: TypeShape, #[case] value: Value) {
    assert!(check_leaf(&shape, &value, "field").is_ok());
}

#[test]
fn check_leaf_names_both_sides() {
    let err = check_leaf(&TypeShape::Scalar(ScalarKind::Bool), &json!("yes"), "verbose")
        .expect_err("must fail");
    assert_eq!(
        err.to_string(),
        "default value does not match 'verbose': a string cannot be used as a scalar"
    );
}

#[rstest]
fn union_default_reads_record_tags(pet: UnionShape) {
    let instance = json!({ "Cat": { "lives": 9 } });
    let absent = FieldDefault::Absent;
    let selected = union_default(&pet, false, Some(&instance), &absent, "pet")
        .unwrap_or_else(|err| panic!("selection failed: {err}"));
    let Some(SelectedVariant::Variant { variant, payload }) = selected else {
        panic!("expected a variant, got {selected:?}");
    };
    assert_eq!(variant.name, "cat");
    assert_eq!(payload, Some(&json!({ "lives": 9 })));
}

#[rstest]
fn union_default_reads_unit_tags(pet: UnionShape) {
    let declared = FieldDefault::Value(json!("Rock"));
    let selected = union_default(&pet, false, None, &declared, "pet")
        .unwrap_or_else(|err| panic!("selection failed: {err}"));
    assert!(matches!(
        selected,
        Some(SelectedVariant::Variant { variant, payload: None }) if variant.name == "rock"
    ));
}

#[rstest]
#[case::implicit(None, true)]
#[case::explicit_null(Some(Value::Null), true)]
#[case::required(None, false)]
fn union_default_handles_absence(
    pet: UnionShape,
    #[case] instance: Option<Value>,
    #[case] optional: bool,
) {
    let absent = FieldDefault::Absent;
    let selected = union_default(&pet, optional, instance.as_ref(), &absent, "pet")
        .unwrap_or_else(|err| panic!("selection failed: {err}"));
    if optional {
        assert_eq!(selected, Some(SelectedVariant::Absent));
    } else {
        assert_eq!(selected, None);
    }
}

#[rstest]
#[case::unknown_tag(json!("Dog"), "unknown variant 'Dog'")]
#[case::unit_without_payload(json!("Cat"), "variant 'Cat' carries a record but no payload was given")]
#[case::unit_with_payload(json!({ "Rock": {} }), "variant 'Rock' has no fields but a payload was given")]
#[case::wrong_kind(json!(3), "expected an externally tagged variant of `")]
fn union_default_rejects_mismatches(
    pet: UnionShape,
    #[case] instance: Value,
    #[case] expected: &str,
) {
    let absent = FieldDefault::Absent;
    let err = union_default(&pet, false, Some(&instance), &absent, "pet")
        .expect_err("mismatch must fail");
    let (path, reason) = ambiguous_reason(err);
    assert_eq!(path, "pet");
    assert!(reason.starts_with(expected), "unexpected reason: {reason}");
}

#[derive(Debug, Deserialize, PartialEq)]
struct Optimizer {
    lr: f64,
    momentum: f64,
}

#[derive(Debug, Deserialize, PartialEq)]
struct Train {
    epochs: u32,
    optimizer: Optimizer,
}

#[derive(Serialize)]
struct Seed {
    epochs: u32,
    optimizer: SeedOptimizer,
}

#[derive(Serialize)]
struct SeedOptimizer {
    lr: f64,
    momentum: f64,
}

#[test]
fn sources_layer_in_order() {
    figment::Jail::expect_with(|jail| {
        jail.create_file("train.toml", "epochs = 20\n[optimizer]\nmomentum = 0.5\n")?;
        jail.set_env("TRAIN_OPTIMIZER__LR", "0.25");
        let seed = Seed {
            epochs: 1,
            optimizer: SeedOptimizer {
                lr: 0.1,
                momentum: 0.9,
            },
        };
        let train: Train = DefaultsSource::new()
            .value(&seed)
            .toml_file("train.toml")
            .env_prefixed("TRAIN_")
            .extract()
            .map_err(|err| err.to_string())?;
        assert_eq!(
            train,
            Train {
                epochs: 20,
                optimizer: Optimizer {
                    lr: 0.25,
                    momentum: 0.5,
                },
            }
        );
        Ok(())
    });
}

#[test]
fn missing_fields_fail_extraction() {
    figment::Jail::expect_with(|_jail| {
        let result: Result<Train, DefaultsError> = DefaultsSource::new()
            .toml_file("absent.toml")
            .extract();
        let Err(err) = result else {
            return Err("extraction should fail".into());
        };
        assert!(err.to_string().starts_with("Failed to gather defaults"));
        Ok(())
    });
}
