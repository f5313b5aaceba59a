//! End-to-end scenarios for flat records and a single union.

mod common;

use anyhow::{Result, ensure};
use argshape::{ArgShapeCli, CliError};
use clap::error::ErrorKind;
use common::fixtures::{Point, Shape};
use common::parse_args;
use rstest::rstest;

#[rstest]
#[case::required_only(&["--x", "3"], Point { x: 3, y: None })]
#[case::with_label(&["--x", "3", "--y", "hi"], Point { x: 3, y: Some("hi".to_owned()) })]
#[case::negative(&["--y", "lo", "--x", "-8"], Point { x: -8, y: Some("lo".to_owned()) })]
fn parses_points(#[case] args: &[&str], #[case] expected: Point) -> Result<()> {
    let point = parse_args(&ArgShapeCli::<Point>::new(), args)?;
    ensure!(point == expected, "unexpected point: {point:?}");
    Ok(())
}

#[test]
fn missing_x_is_reported_by_clap() -> Result<()> {
    let err = parse_args(&ArgShapeCli::<Point>::new(), &["--y", "hi"])
        .err()
        .ok_or_else(|| anyhow::anyhow!("parsing should fail"))?;
    let Some(parse) = err.as_parse_error() else {
        anyhow::bail!("unexpected error: {err}");
    };
    ensure!(parse.kind() == ErrorKind::MissingRequiredArgument);
    ensure!(parse.to_string().contains("--x <INT>"), "{parse}");
    Ok(())
}

#[rstest]
#[case::circle(&["circle", "--r", "2.0"], Shape::Circle { r: 2.0 })]
#[case::square(&["square", "--s", "1.0"], Shape::Square { s: 1.0 })]
fn parses_root_unions(#[case] args: &[&str], #[case] expected: Shape) -> Result<()> {
    let shape = parse_args(&ArgShapeCli::<Shape>::new(), args)?;
    ensure!(shape == expected, "unexpected shape: {shape:?}");
    Ok(())
}

#[test]
fn root_unions_require_a_variant() {
    let err = parse_args(&ArgShapeCli::<Shape>::new(), &[]).expect_err("a variant is required");
    let kind = err.as_parse_error().map(clap::Error::kind);
    assert_eq!(kind, Some(ErrorKind::MissingSubcommand));
}

#[test]
fn variant_flags_stay_inside_their_subcommand() {
    let err = parse_args(&ArgShapeCli::<Shape>::new(), &["circle", "--s", "1.0"])
        .expect_err("--s belongs to square");
    assert!(matches!(
        err.as_parse_error().map(clap::Error::kind),
        Some(ErrorKind::UnknownArgument)
    ));
}

#[test]
fn malformed_numbers_are_value_errors() {
    let err = parse_args(&ArgShapeCli::<Point>::new(), &["--x", "3.5"])
        .expect_err("3.5 is not an integer");
    let CliError::Parse(parse) = err else {
        panic!("unexpected error: {err}");
    };
    assert_eq!(parse.kind(), ErrorKind::ValueValidation);
    assert!(parse.to_string().contains("'3.5' is not an integer"), "{parse}");
}
