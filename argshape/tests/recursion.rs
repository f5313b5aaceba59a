//! Records that contain themselves are rejected while building.

use argshape::{ArgShape, Describe, SchemaError, SpecBuilder};
use rstest::rstest;

#[derive(ArgShape)]
#[expect(dead_code, reason = "only the description is exercised")]
struct List {
    value: i32,
    next: Box<List>,
}

#[derive(ArgShape)]
#[expect(dead_code, reason = "only the description is exercised")]
struct Outer {
    inner: Inner,
}

#[derive(ArgShape)]
#[expect(dead_code, reason = "only the description is exercised")]
struct Inner {
    label: String,
    back: Box<Outer>,
}

#[derive(ArgShape)]
#[expect(dead_code, reason = "only the description is exercised")]
enum Tree {
    Leaf { value: i32 },
    Branch(Fork),
}

#[derive(ArgShape)]
#[expect(dead_code, reason = "only the description is exercised")]
struct Fork {
    left: Box<Tree>,
}

#[derive(ArgShape)]
#[expect(dead_code, reason = "only the description is exercised")]
struct Twice {
    first: Inner2,
    second: Inner2,
}

#[derive(ArgShape)]
#[expect(dead_code, reason = "only the description is exercised")]
struct Inner2 {
    value: u8,
}

#[rstest]
#[case::direct(List::describe(), "next", "List")]
#[case::indirect(Outer::describe(), "inner.back", "Outer")]
fn cycles_name_the_repeated_record(
    #[case] desc: argshape::TypeDesc,
    #[case] expected_path: &str,
    #[case] expected_type: &str,
) {
    let err = SpecBuilder::new()
        .build(&desc, None)
        .expect_err("recursion must fail");
    let SchemaError::RecursiveType { path, type_name } = err else {
        panic!("unexpected error: {err}");
    };
    assert_eq!(path, expected_path);
    assert!(type_name.ends_with(expected_type), "unexpected type: {type_name}");
}

#[test]
fn cycles_through_unions_are_rejected() {
    let err = SpecBuilder::new()
        .build(&Tree::describe(), None)
        .expect_err("recursion through a variant must fail");
    assert!(matches!(err, SchemaError::RecursiveType { .. }), "{err}");
}

#[test]
fn sibling_fields_may_share_a_type() {
    let spec = SpecBuilder::new().build(&Twice::describe(), None);
    assert!(spec.is_ok(), "unexpected error: {spec:?}");
}
