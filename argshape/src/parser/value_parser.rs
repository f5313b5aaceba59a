//! Clap value parser converting tokens by leaf shape.

use std::ffi::OsStr;

use clap::builder::{PossibleValue, TypedValueParser};
use clap::error::ErrorKind;
use clap::{Arg, Command};
use serde_json::Value;

use super::convert::convert_leaf;
use crate::describe::ScalarKind;
use crate::shape::TypeShape;

/// Converts each token of a flag into a [`Value`] of one scalar or literal
/// shape, so clap reports malformed input with its own usage output.
#[derive(Debug, Clone)]
pub struct ShapeValueParser {
    shape: TypeShape,
}

impl ShapeValueParser {
    /// Creates a parser for values of `shape`.
    #[must_use]
    pub const fn new(shape: TypeShape) -> Self {
        Self { shape }
    }
}

impl TypedValueParser for ShapeValueParser {
    type Value = Value;

    fn parse_ref(
        &self,
        cmd: &Command,
        arg: Option<&Arg>,
        value: &OsStr,
    ) -> Result<Self::Value, clap::Error> {
        let Some(token) = value.to_str() else {
            return Err(clap::Error::new(ErrorKind::InvalidUtf8).with_cmd(cmd));
        };
        convert_leaf(&self.shape, token).map_err(|message| {
            let flag = arg.map_or_else(|| "...".to_owned(), ToString::to_string);
            clap::Error::raw(
                ErrorKind::ValueValidation,
                format!("invalid value '{token}' for '{flag}': {message}\n"),
            )
            .with_cmd(cmd)
        })
    }

    fn possible_values(&self) -> Option<Box<dyn Iterator<Item = PossibleValue> + '_>> {
        match self.shape.strip_optional() {
            TypeShape::Literal(set) => Some(Box::new(set.tokens().map(PossibleValue::new))),
            TypeShape::Scalar(ScalarKind::Bool) => {
                Some(Box::new(["true", "false"].into_iter().map(PossibleValue::new)))
            }
            _ => None,
        }
    }
}
