//! Shared test fixtures for integration tests.
//!
//! These types are imported by several test files so the scenarios stay in
//! one place.

pub mod fixtures;

use argshape::{ArgShapeCli, CliError, Describe};
use serde::de::DeserializeOwned;

/// Parses `args` after a fixed program name.
///
/// # Errors
///
/// Propagates any [`CliError`] raised while parsing.
pub fn parse_args<T: Describe + DeserializeOwned>(
    cli: &ArgShapeCli<T>,
    args: &[&str],
) -> Result<T, CliError> {
    cli.try_parse_from(std::iter::once("prog").chain(args.iter().copied()))
}
