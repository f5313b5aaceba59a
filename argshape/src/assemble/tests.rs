//! Tests for assembly, instantiation and token rendering.

use rstest::{fixture, rstest};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use super::*;
use crate::ArgShape;
use crate::describe::Describe;
use crate::spec::SpecBuilder;

#[derive(Debug, ArgShape, Serialize, Deserialize, PartialEq)]
enum Shape {
    Circle { r: f64 },
    Square { s: f64 },
    Point,
}

#[derive(Debug, ArgShape, Serialize, Deserialize, PartialEq)]
struct Style {
    #[arg_shape(default = 1)]
    width: u8,
    colour: Option<String>,
}

#[derive(Debug, ArgShape, Serialize, Deserialize, PartialEq)]
struct Draw {
    name: String,
    style: Style,
    shape: Shape,
    #[arg_shape(fixed, default = 3)]
    version: u8,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(try_from = "u8")]
struct Percent(u8);

impl TryFrom<u8> for Percent {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        if value <= 100 {
            Ok(Self(value))
        } else {
            Err(format!("{value} is above 100"))
        }
    }
}

#[derive(Debug, Deserialize)]
#[expect(dead_code, reason = "only deserialization is exercised")]
struct Opacity {
    level: Percent,
}

#[fixture]
fn draw() -> ParserSpecification {
    SpecBuilder::new()
        .build(&Draw::describe(), None)
        .unwrap_or_else(|err| panic!("build failed: {err}"))
}

fn circle_values() -> ParsedValues {
    let mut parsed = ParsedValues::new();
    parsed.insert("name", json!("logo"));
    parsed.insert("shape.r", json!(2.5));
    parsed.select("shape", "circle");
    parsed
}

#[rstest]
fn assembles_children_and_defaults(draw: ParserSpecification) {
    let assembled = assemble(&draw, &circle_values())
        .unwrap_or_else(|err| panic!("assembly failed: {err}"));
    assert_eq!(
        assembled.value,
        json!({
            "name": "logo",
            "style": { "width": 1, "colour": null },
            "shape": { "Circle": { "r": 2.5 } },
            "version": 3,
        })
    );
    let built: Draw = instantiate(assembled.value).unwrap_or_else(|err| panic!("{err}"));
    assert_eq!(built.shape, Shape::Circle { r: 2.5 });
    assert!(assembled.consumed.contains_value("shape.r"));
    assert!(assembled.consumed.contains_selection("shape"));
}

#[rstest]
fn unit_variants_assemble_to_their_tag(draw: ParserSpecification) {
    let mut parsed = ParsedValues::new();
    parsed.insert("name", json!("dot"));
    parsed.select("shape", "point");
    let assembled = assemble(&draw, &parsed).unwrap_or_else(|err| panic!("{err}"));
    assert_eq!(assembled.value.get("shape"), Some(&json!("Point")));
}

#[rstest]
fn fixed_fields_ignore_parsed_values(draw: ParserSpecification) {
    let mut parsed = circle_values();
    parsed.insert("version", json!(9));
    let assembled = assemble(&draw, &parsed).unwrap_or_else(|err| panic!("{err}"));
    assert_eq!(assembled.value.get("version"), Some(&json!(3)));
    assert_eq!(assembled.consumed.unused(&parsed), ["version"]);
}

#[rstest]
fn inactive_variant_values_are_reported_unused(draw: ParserSpecification) {
    let mut parsed = circle_values();
    parsed.insert("shape.s", json!(1.0));
    let assembled = assemble(&draw, &parsed).unwrap_or_else(|err| panic!("{err}"));
    assert_eq!(assembled.consumed.unused(&parsed), ["shape.s"]);
}

#[rstest]
#[case::missing_value(
    { let mut parsed = ParsedValues::new(); parsed.select("shape", "point"); parsed },
    InstantiationError::missing("name"),
)]
#[case::missing_variant(
    { let mut parsed = ParsedValues::new(); parsed.insert("name", json!("x")); parsed },
    InstantiationError::missing_variant("shape"),
)]
#[case::unknown_variant(
    {
        let mut parsed = ParsedValues::new();
        parsed.insert("name", json!("x"));
        parsed.select("shape", "hexagon");
        parsed
    },
    InstantiationError::unknown_variant("shape", "hexagon"),
)]
fn incomplete_values_fail(
    draw: ParserSpecification,
    #[case] parsed: ParsedValues,
    #[case] expected: InstantiationError,
) {
    assert_eq!(assemble(&draw, &parsed), Err(expected));
}

#[test]
fn default_variant_fills_missing_selection() {
    let defaults = json!({
        "name": "seed",
        "style": { "width": 2, "colour": "red" },
        "shape": { "Square": { "s": 4.0 } },
        "version": 3,
    });
    let spec = SpecBuilder::new()
        .build(&Draw::describe(), Some(&defaults))
        .unwrap_or_else(|err| panic!("build failed: {err}"));
    let assembled = assemble(&spec, &ParsedValues::new()).unwrap_or_else(|err| panic!("{err}"));
    assert_eq!(assembled.value, defaults);
}

#[test]
fn pinned_variants_wrap_their_payload() {
    let defaults = json!({
        "name": "seed",
        "style": { "width": 2, "colour": null },
        "shape": { "Circle": { "r": 1.0 } },
        "version": 3,
    });
    let spec = SpecBuilder::new()
        .avoid_subparsers(true)
        .build(&Draw::describe(), Some(&defaults))
        .unwrap_or_else(|err| panic!("build failed: {err}"));
    let mut parsed = ParsedValues::new();
    parsed.insert("shape.r", json!(6.0));
    let assembled = assemble(&spec, &parsed).unwrap_or_else(|err| panic!("{err}"));
    assert_eq!(assembled.value.get("shape"), Some(&json!({ "Circle": { "r": 6.0 } })));
}

#[test]
fn root_unions_assemble_directly() {
    let spec = SpecBuilder::new()
        .build(&Shape::describe(), None)
        .unwrap_or_else(|err| panic!("build failed: {err}"));
    let mut parsed = ParsedValues::new();
    parsed.insert("s", json!(1.0));
    parsed.select("", "square");
    let assembled = assemble(&spec, &parsed).unwrap_or_else(|err| panic!("{err}"));
    assert_eq!(assembled.value, json!({ "Square": { "s": 1.0 } }));
}

#[test]
fn constructor_failures_carry_the_field_path() {
    let err = instantiate::<Opacity>(json!({ "level": 140 })).expect_err("validation must fail");
    assert_eq!(
        err,
        InstantiationError::Constructor {
            path: "level".to_owned(),
            message: "140 is above 100".to_owned(),
        }
    );
}

#[rstest]
fn tokens_spell_the_value(draw: ParserSpecification) {
    let value = json!({
        "name": "logo",
        "style": { "width": 4, "colour": null },
        "shape": { "Circle": { "r": 2.5 } },
        "version": 3,
    });
    let tokens = to_tokens(&draw, &value).unwrap_or_else(|err| panic!("{err}"));
    assert_eq!(
        tokens,
        ["--name", "logo", "--style.width", "4", "circle", "--r", "2.5"]
    );
}

#[rstest]
fn disassembly_rejects_unknown_tags(draw: ParserSpecification) {
    let value = json!({
        "name": "logo",
        "style": { "width": 4, "colour": null },
        "shape": { "Hexagon": {} },
        "version": 3,
    });
    assert!(matches!(
        disassemble(&draw, &value),
        Err(InstantiationError::UnknownVariant { .. })
    ));
}

#[test]
fn disassembly_matches_assembly() {
    let value: Value = json!({
        "name": "logo",
        "style": { "width": 4, "colour": "blue" },
        "shape": "Point",
        "version": 3,
    });
    let spec = SpecBuilder::new()
        .build(&Draw::describe(), None)
        .unwrap_or_else(|err| panic!("build failed: {err}"));
    let parsed = disassemble(&spec, &value).unwrap_or_else(|err| panic!("{err}"));
    let assembled = assemble(&spec, &parsed).unwrap_or_else(|err| panic!("{err}"));
    assert_eq!(assembled.value, value);
    assert!(assembled.consumed.unused(&parsed).is_empty());
}
