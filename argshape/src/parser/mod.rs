//! Bridge between parser specifications and `clap`.
//!
//! [`render_command`] turns a [`ParserSpecification`] into a
//! [`clap::Command`]: one `--flag` per visible argument and one layer of
//! sub-commands per union. Several unions in one scope are chained, so the
//! second union's sub-commands hang below each variant of the first.
//! [`collect_matches`] walks the same structure over the resulting
//! [`ArgMatches`] and produces flat [`ParsedValues`].
//!
//! Sub-command names take precedence over the values of multi-value flags,
//! so `--dashes 3 1 circle` ends the list before `circle`.

use std::collections::BTreeMap;

use clap::parser::ValueSource;
use clap::{Arg, ArgAction, ArgMatches, Command, error::ErrorKind};
use serde_json::Value;
use tracing::trace;

use crate::describe::{ScalarKind, literal_token};
use crate::shape::TypeShape;
use crate::spec::{ArgumentSpec, ParserSpecification, UnionSpec};

mod convert;
mod value_parser;

pub use value_parser::ShapeValueParser;

/// Flat result of a parse: converted values by dotted path and the selected
/// sub-command of each union on the chosen path.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedValues {
    values: BTreeMap<String, Value>,
    selections: BTreeMap<String, String>,
}

impl ParsedValues {
    /// Creates an empty result.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the value parsed for `path`.
    pub fn insert(&mut self, path: impl Into<String>, value: Value) {
        self.values.insert(path.into(), value);
    }

    /// Records the sub-command selected for the union at `path`.
    pub fn select(&mut self, path: impl Into<String>, variant: impl Into<String>) {
        self.selections.insert(path.into(), variant.into());
    }

    /// Returns the value parsed for `path`.
    #[must_use]
    pub fn value(&self, path: &str) -> Option<&Value> {
        self.values.get(path)
    }

    /// Returns the sub-command selected for the union at `path`.
    #[must_use]
    pub fn selection(&self, path: &str) -> Option<&str> {
        self.selections.get(path).map(String::as_str)
    }

    /// Iterates over the dotted paths that carry a value.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    /// Iterates over the union paths that carry a selection.
    pub fn selected_unions(&self) -> impl Iterator<Item = &str> {
        self.selections.keys().map(String::as_str)
    }

    /// Returns `true` when nothing was parsed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty() && self.selections.is_empty()
    }
}

/// Unions reachable from `node`, followed by those still pending from the
/// enclosing scopes.
fn union_chain<'a>(node: &'a ParserSpecification, pending: &[&'a UnionSpec]) -> Vec<&'a UnionSpec> {
    let mut unions = node.scope_unions();
    unions.extend_from_slice(pending);
    unions
}

/// Renders `spec` as a clap command called `name`.
#[must_use]
pub fn render_command(spec: &ParserSpecification, name: &str) -> Command {
    let mut cmd = Command::new(name.to_owned());
    if let Some(description) = &spec.description {
        cmd = cmd.about(description.clone());
    }
    apply(cmd, spec, &[])
}

fn apply(mut cmd: Command, node: &ParserSpecification, pending: &[&UnionSpec]) -> Command {
    for argument in node.visible_arguments() {
        cmd = cmd.arg(flag(argument));
    }
    let unions = union_chain(node, pending);
    let Some((first, rest)) = unions.split_first() else {
        return cmd;
    };
    for variant in &first.variants {
        let mut sub = Command::new(variant.name.clone());
        if let Some(help) = &variant.help {
            sub = sub.about(help.clone());
        }
        cmd = cmd.subcommand(apply(sub, &variant.node, rest));
    }
    let required = unions.iter().any(|union| union.default.is_none());
    let value_name = if first.key.is_empty() {
        "COMMAND".to_owned()
    } else {
        first.key.to_uppercase()
    };
    cmd.subcommand_required(required)
        .subcommand_value_name(value_name)
        .subcommand_precedence_over_arg(true)
}

fn help_text(argument: &ArgumentSpec) -> String {
    let status = match &argument.default {
        None => "(required)".to_owned(),
        Some(Value::Null) => "(optional)".to_owned(),
        Some(default) => format!("(default: {})", display_default(default)),
    };
    match &argument.help {
        Some(help) => format!("{help} {status}"),
        None => status,
    }
}

fn display_default(value: &Value) -> String {
    match value {
        Value::Array(items) => items.iter().map(literal_token).collect::<Vec<_>>().join(" "),
        Value::Object(entries) => entries
            .iter()
            .map(|(key, item)| format!("{key} {}", literal_token(item)))
            .collect::<Vec<_>>()
            .join(" "),
        other => literal_token(other),
    }
}

fn flag(argument: &ArgumentSpec) -> Arg {
    let base = Arg::new(argument.path.clone())
        .long(argument.name.replace('_', "-"))
        .required(argument.is_required())
        .help(help_text(argument));
    match argument.shape.strip_optional() {
        TypeShape::Scalar(ScalarKind::Bool) if argument.default == Some(Value::Bool(false)) => {
            base.action(ArgAction::SetTrue)
        }
        leaf @ (TypeShape::Scalar(_) | TypeShape::Literal(_)) => base
            .num_args(1)
            .allow_negative_numbers(true)
            .value_name(leaf.metavar())
            .value_parser(ShapeValueParser::new(leaf.clone())),
        TypeShape::Sequence(item) | TypeShape::Set(item) | TypeShape::VariableTuple(item) => base
            .num_args(0..)
            .action(ArgAction::Set)
            .allow_negative_numbers(true)
            .value_name(item.metavar())
            .value_parser(ShapeValueParser::new((**item).clone())),
        TypeShape::FixedTuple(items) => base
            .num_args(items.len())
            .action(ArgAction::Set)
            .allow_negative_numbers(true)
            .value_names(items.iter().map(TypeShape::metavar)),
        TypeShape::Mapping(..) => base
            .num_args(0..)
            .action(ArgAction::Set)
            .allow_negative_numbers(true)
            .value_name(argument.shape.strip_optional().metavar()),
        TypeShape::Optional(_) | TypeShape::Record(_) | TypeShape::UnionOfRecords(_) => base,
    }
}

/// Flattens the matches of a command rendered by [`render_command`].
///
/// Only values given on the command line are collected; everything else is
/// left to the defaults recorded in the specification.
///
/// # Errors
///
/// Returns an [`ErrorKind::InvalidValue`] error when a tuple or mapping flag
/// carries tokens that do not convert.
pub fn collect_matches(
    spec: &ParserSpecification,
    matches: &ArgMatches,
) -> Result<ParsedValues, clap::Error> {
    let mut parsed = ParsedValues::new();
    collect(spec, matches, &[], &mut parsed)?;
    Ok(parsed)
}

fn collect(
    node: &ParserSpecification,
    matches: &ArgMatches,
    pending: &[&UnionSpec],
    parsed: &mut ParsedValues,
) -> Result<(), clap::Error> {
    for argument in node.visible_arguments() {
        if matches.value_source(&argument.path) != Some(ValueSource::CommandLine) {
            continue;
        }
        if let Some(value) = read_argument(argument, matches)? {
            trace!(path = %argument.path, "parsed value");
            parsed.insert(argument.path.clone(), value);
        }
    }
    let unions = union_chain(node, pending);
    let Some((first, rest)) = unions.split_first() else {
        return Ok(());
    };
    let Some((name, sub_matches)) = matches.subcommand() else {
        return Ok(());
    };
    parsed.select(first.path.clone(), name);
    match first.variant(name) {
        Some(variant) => collect(&variant.node, sub_matches, rest, parsed),
        None => Ok(()),
    }
}

fn read_argument(argument: &ArgumentSpec, matches: &ArgMatches) -> Result<Option<Value>, clap::Error> {
    let id = argument.path.as_str();
    match argument.shape.strip_optional() {
        TypeShape::Scalar(ScalarKind::Bool) if argument.default == Some(Value::Bool(false)) => {
            let set = matches
                .try_get_one::<bool>(id)
                .map_err(|err| lookup_error(argument, &err))?
                .copied()
                .unwrap_or(false);
            Ok(Some(Value::Bool(set)))
        }
        TypeShape::Scalar(_) | TypeShape::Literal(_) => Ok(matches
            .try_get_one::<Value>(id)
            .map_err(|err| lookup_error(argument, &err))?
            .cloned()),
        TypeShape::Sequence(_) | TypeShape::Set(_) | TypeShape::VariableTuple(_) => {
            let values = matches
                .try_get_many::<Value>(id)
                .map_err(|err| lookup_error(argument, &err))?;
            Ok(Some(Value::Array(
                values.map(|items| items.cloned().collect()).unwrap_or_default(),
            )))
        }
        TypeShape::FixedTuple(items) => {
            let tokens = raw_tokens(argument, matches)?;
            convert::convert_tuple(items, &tokens)
                .map(Some)
                .map_err(|message| conversion_error(argument, &tokens, &message))
        }
        TypeShape::Mapping(key, value) => {
            let tokens = raw_tokens(argument, matches)?;
            convert::convert_mapping(key, value, &tokens)
                .map(Some)
                .map_err(|message| conversion_error(argument, &tokens, &message))
        }
        TypeShape::Optional(_) | TypeShape::Record(_) | TypeShape::UnionOfRecords(_) => Ok(None),
    }
}

fn raw_tokens(argument: &ArgumentSpec, matches: &ArgMatches) -> Result<Vec<String>, clap::Error> {
    Ok(matches
        .try_get_many::<String>(&argument.path)
        .map_err(|err| lookup_error(argument, &err))?
        .map(|values| values.cloned().collect())
        .unwrap_or_default())
}

fn lookup_error(argument: &ArgumentSpec, err: &clap::parser::MatchesError) -> clap::Error {
    clap::Error::raw(
        ErrorKind::InvalidValue,
        format!("cannot read '--{}': {err}\n", argument.name),
    )
}

fn conversion_error(argument: &ArgumentSpec, tokens: &[String], message: &str) -> clap::Error {
    clap::Error::raw(
        ErrorKind::InvalidValue,
        format!(
            "invalid value '{}' for '--{}': {message}\n",
            tokens.join(" "),
            argument.name.replace('_', "-")
        ),
    )
}
