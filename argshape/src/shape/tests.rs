//! Tests for type decomposition.

use std::collections::BTreeMap;

use rstest::rstest;
use serde_json::json;

use super::*;
use crate::describe::{Describe, LiteralSet, VariantDesc};

fn int(bits: u8, signed: bool) -> TypeShape {
    TypeShape::Scalar(ScalarKind::Int { bits, signed })
}

fn unsupported(desc: &TypeDesc) -> String {
    match decompose(desc, "field") {
        Err(SchemaError::UnsupportedType { reason, .. }) => reason,
        other => panic!("expected UnsupportedType, got {other:?}"),
    }
}

#[rstest]
#[case::scalar(i32::describe(), int(32, true))]
#[case::optional(
    <Option<String>>::describe(),
    TypeShape::Optional(Box::new(TypeShape::Scalar(ScalarKind::Str))),
)]
#[case::sequence(<Vec<u16>>::describe(), TypeShape::Sequence(Box::new(int(16, false))))]
#[case::tuple(
    <(i64, f32)>::describe(),
    TypeShape::FixedTuple(vec![int(64, true), TypeShape::Scalar(ScalarKind::Float { bits: 32 })]),
)]
#[case::array(<[u8; 2]>::describe(), TypeShape::FixedTuple(vec![int(8, false), int(8, false)]))]
#[case::boxed_slice(<Box<[bool]>>::describe(), TypeShape::VariableTuple(Box::new(TypeShape::Scalar(ScalarKind::Bool))))]
#[case::mapping(
    <BTreeMap<String, u8>>::describe(),
    TypeShape::Mapping(Box::new(TypeShape::Scalar(ScalarKind::Str)), Box::new(int(8, false))),
)]
#[case::optional_sequence(
    <Option<Vec<char>>>::describe(),
    TypeShape::Optional(Box::new(TypeShape::Sequence(Box::new(TypeShape::Scalar(ScalarKind::Char))))),
)]
fn classifies_supported_shapes(#[case] desc: TypeDesc, #[case] expected: TypeShape) {
    let decomposed = decompose(&desc, "field").unwrap_or_else(|err| panic!("{err}"));
    assert_eq!(decomposed.shape, expected);
    assert!(!decomposed.fixed);
}

#[test]
fn strips_markers_and_resolves_type_vars() {
    let desc = TypeDesc::Fixed(Box::new(TypeDesc::annotated(
        TypeDesc::type_var("T", u8::describe()),
        "bounded",
    )));
    let decomposed = decompose(&desc, "value").unwrap_or_else(|err| panic!("{err}"));
    assert_eq!(decomposed.shape, int(8, false));
    assert!(decomposed.fixed);
    assert_eq!(decomposed.help, Some("bounded"));
}

#[rstest]
#[case::nested_optional(<Option<Option<u8>>>::describe(), "optional values may only appear directly as a field")]
#[case::nested_sequence(<Vec<Vec<u8>>>::describe(), "sequences cannot be nested in another container")]
#[case::optional_items(<Vec<Option<u8>>>::describe(), "optional values may only appear directly as a field")]
#[case::empty_tuple(TypeDesc::FixedTuple(Vec::new()), "empty tuples carry no value")]
#[case::wide_int(i128::describe(), "`i128` cannot be expressed on the command line")]
#[case::inner_fixed(
    TypeDesc::Sequence(Box::new(TypeDesc::Fixed(Box::new(u8::describe())))),
    "a fixed marker must wrap the whole field",
)]
fn rejects_unsupported_shapes(#[case] desc: TypeDesc, #[case] expected: &str) {
    assert_eq!(unsupported(&desc), expected);
}

#[rstest]
#[case::empty(LiteralSet::new(Vec::new()), "literal set has no values")]
#[case::mixed(LiteralSet::new(vec![json!("a"), json!(1)]), "literal values must all have the same kind")]
#[case::duplicate(LiteralSet::strings(&["a", "a"]), "literal value 'a' is listed twice")]
#[case::object(LiteralSet::new(vec![json!({})]), "literal values must be scalars")]
fn validates_literal_sets(#[case] set: LiteralSet, #[case] expected: &str) {
    assert_eq!(unsupported(&TypeDesc::Literal(set)), expected);
}

#[test]
fn numeric_literals_are_accepted() {
    let desc = TypeDesc::Literal(LiteralSet::new(vec![json!(1), json!(2), json!(4)]));
    let decomposed = decompose(&desc, "level").unwrap_or_else(|err| panic!("{err}"));
    let TypeShape::Literal(set) = decomposed.shape else {
        panic!("expected literal shape");
    };
    assert_eq!(set.find("4"), Some(&json!(4)));
    assert_eq!(set.find("3"), None);
}

#[test]
fn union_variants_must_carry_records() {
    let union = UnionDesc::new("demo::Choice")
        .variant(VariantDesc::unit("off", "Off"))
        .variant(VariantDesc::record("level", "Level", u8::describe()));
    assert_eq!(
        unsupported(&TypeDesc::Union(union)),
        "variant 'level' must carry a record"
    );
}

#[test]
fn union_variant_names_are_unique() {
    let union = UnionDesc::new("demo::Choice")
        .variant(VariantDesc::unit("off", "Off"))
        .variant(VariantDesc::unit("off", "Disabled"));
    assert_eq!(
        unsupported(&TypeDesc::Union(union)),
        "variant name 'off' is used twice"
    );
}

#[test]
fn unions_cannot_be_container_items() {
    let union = UnionDesc::new("demo::Choice").variant(VariantDesc::unit("off", "Off"));
    let desc = TypeDesc::Sequence(Box::new(TypeDesc::Union(union)));
    assert_eq!(
        unsupported(&desc),
        "union `demo::Choice` cannot be nested in a container"
    );
}

#[test]
fn optional_union_is_kept() {
    let union = UnionDesc::new("demo::Choice").variant(VariantDesc::unit("off", "Off"));
    let desc = TypeDesc::Optional(Box::new(TypeDesc::Union(union)));
    let decomposed = decompose(&desc, "choice").unwrap_or_else(|err| panic!("{err}"));
    let TypeShape::Optional(inner) = decomposed.shape else {
        panic!("expected optional shape");
    };
    assert!(matches!(*inner, TypeShape::UnionOfRecords(_)));
}
